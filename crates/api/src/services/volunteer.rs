use charity_auth::validation::{present, validate_email};
use charity_auth::Claims;
use charity_database::{
    ApplicationRecord, ApplicationStatus, NewApplication, NewOpportunity, OpportunityListing,
    OpportunityStatus, OpportunityWithApplications, VolunteerApplication, VolunteerOpportunity,
    VolunteerRepository,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use super::organization::resolve_for;
use crate::routes::models::{ApplyRequest, CreateOpportunityRequest, UpdateApplicationRequest};
use crate::util::normalize_date;

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<OpportunityListing>, ServiceError> {
    Ok(VolunteerRepository::new(pool.clone())
        .list_opportunities()
        .await?)
}

pub async fn list_public(pool: &SqlitePool) -> Result<Vec<OpportunityListing>, ServiceError> {
    Ok(VolunteerRepository::new(pool.clone())
        .list_public_opportunities()
        .await?)
}

pub async fn organization_opportunities(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<Vec<OpportunityWithApplications>, ServiceError> {
    let organization = resolve_for(pool, claims).await?;
    Ok(VolunteerRepository::new(pool.clone())
        .list_with_applications(&organization.id)
        .await?)
}

pub async fn create_opportunity(
    pool: &SqlitePool,
    claims: &Claims,
    req: CreateOpportunityRequest,
) -> Result<VolunteerOpportunity, ServiceError> {
    let required_skills = req
        .required_skills
        .map(|skills| skills.into_vec())
        .unwrap_or_default();
    let (Some(title), Some(description), Some(date), Some(location)) = (
        present(&req.title),
        present(&req.description),
        present(&req.date),
        present(&req.location),
    ) else {
        return Err(ServiceError::bad_request("All fields are required"));
    };
    if required_skills.is_empty() {
        return Err(ServiceError::bad_request("All fields are required"));
    }

    let date = normalize_date(date)
        .ok_or_else(|| ServiceError::bad_request("Invalid opportunity date"))?;

    let organization = resolve_for(pool, claims).await?;
    let opportunity = VolunteerRepository::new(pool.clone())
        .create_opportunity(&NewOpportunity {
            organization_id: organization.id,
            title: title.to_string(),
            description: description.to_string(),
            date,
            location: location.to_string(),
            required_skills,
        })
        .await?;
    Ok(opportunity)
}

/// Submit an application. No account is needed to volunteer.
pub async fn apply(
    pool: &SqlitePool,
    req: ApplyRequest,
) -> Result<VolunteerApplication, ServiceError> {
    let (Some(opportunity_id), Some(organization_id), Some(name), Some(email)) = (
        present(&req.opportunity_id),
        present(&req.organization_id),
        present(&req.name),
        present(&req.email),
    ) else {
        return Err(ServiceError::bad_request("Missing required fields"));
    };
    validate_email(email)?;

    let repo = VolunteerRepository::new(pool.clone());
    let opportunity = repo
        .find_opportunity(opportunity_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Volunteer opportunity not found"))?;

    if opportunity.status != OpportunityStatus::Open {
        return Err(ServiceError::bad_request(
            "This opportunity is no longer accepting applications",
        ));
    }
    if opportunity.organization_id != organization_id {
        return Err(ServiceError::bad_request(
            "Opportunity does not belong to this organization",
        ));
    }

    let application = repo
        .create_application(&NewApplication {
            opportunity_id: opportunity.id,
            organization_id: opportunity.organization_id,
            name: name.to_string(),
            email: email.to_string(),
        })
        .await?;
    Ok(application)
}

pub async fn applications(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<Vec<ApplicationRecord>, ServiceError> {
    let organization = resolve_for(pool, claims).await?;
    Ok(VolunteerRepository::new(pool.clone())
        .list_applications(&organization.id)
        .await?)
}

pub async fn review_application(
    pool: &SqlitePool,
    claims: &Claims,
    req: UpdateApplicationRequest,
) -> Result<VolunteerApplication, ServiceError> {
    let (Some(application_id), Some(status)) =
        (present(&req.application_id), present(&req.status))
    else {
        return Err(ServiceError::bad_request("Application ID and status are required"));
    };
    let status: ApplicationStatus = status
        .parse()
        .map_err(|_| ServiceError::bad_request("Invalid application status"))?;

    let organization = resolve_for(pool, claims).await?;
    let application = VolunteerRepository::new(pool.clone())
        .update_application_status(&organization.id, application_id, status)
        .await?;
    Ok(application)
}
