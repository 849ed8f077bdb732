use charity_auth::validation::{present, validate_email};
use charity_auth::Claims;
use charity_database::{
    CampaignRepository, DonationRecord, DonationRepository, Event, EventRepository, NewEvent,
    NewOrganization, Organization, OrganizationRepository, OrganizationSettings,
    OrganizationSettingsUpdate, VolunteerRepository,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::{CreateEventRequest, OrganizationReport, OrganizationRequest};
use crate::util::normalize_date;

/// The organization a caller acts for.
///
/// Uses the organization id carried in the token, falling back to the
/// organization owned by the calling user.
pub async fn resolve_for(pool: &SqlitePool, claims: &Claims) -> Result<Organization, ServiceError> {
    let repo = OrganizationRepository::new(pool.clone());

    let from_token = match claims.organization_id.as_deref() {
        Some(id) => repo.find_by_id(id).await?,
        None => None,
    };

    let organization = match from_token {
        Some(organization) => Some(organization),
        None => repo.find_by_user_id(&claims.user_id).await?,
    };

    organization.ok_or_else(|| ServiceError::not_found("Organization not found"))
}

pub async fn own(pool: &SqlitePool, claims: &Claims) -> Result<Organization, ServiceError> {
    OrganizationRepository::new(pool.clone())
        .find_by_user_id(&claims.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Organization not found"))
}

pub async fn create(
    pool: &SqlitePool,
    claims: &Claims,
    req: OrganizationRequest,
) -> Result<Organization, ServiceError> {
    let (Some(name), Some(description)) = (present(&req.name), present(&req.description)) else {
        return Err(ServiceError::bad_request("Name and description are required"));
    };

    let repo = OrganizationRepository::new(pool.clone());
    if repo.find_by_user_id(&claims.user_id).await?.is_some() {
        return Err(ServiceError::bad_request("User already has an organization"));
    }

    let organization = repo
        .create(&NewOrganization {
            user_id: claims.user_id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            website: present(&req.website).map(str::to_string),
            email: Some(claims.email.clone()),
            ..Default::default()
        })
        .await?;
    Ok(organization)
}

pub async fn update(
    pool: &SqlitePool,
    claims: &Claims,
    req: OrganizationRequest,
) -> Result<Organization, ServiceError> {
    let (Some(name), Some(description)) = (present(&req.name), present(&req.description)) else {
        return Err(ServiceError::bad_request("Name and description are required"));
    };

    let organization = own(pool, claims).await?;
    let update = OrganizationSettingsUpdate {
        name: Some(name.to_string()),
        description: Some(description.to_string()),
        website: present(&req.website).map(str::to_string),
        ..Default::default()
    };

    let updated = OrganizationRepository::new(pool.clone())
        .update_settings(&organization.id, &update)
        .await?;
    Ok(updated)
}

pub async fn settings(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<OrganizationSettings, ServiceError> {
    Ok(resolve_for(pool, claims).await?.settings())
}

pub async fn update_settings(
    pool: &SqlitePool,
    claims: &Claims,
    update: OrganizationSettingsUpdate,
) -> Result<OrganizationSettings, ServiceError> {
    if update.is_empty() {
        return Err(ServiceError::bad_request("No settings provided"));
    }
    if let Some(email) = update.email.as_deref() {
        validate_email(email.trim())?;
    }

    let organization = resolve_for(pool, claims).await?;
    let updated = OrganizationRepository::new(pool.clone())
        .update_settings(&organization.id, &update)
        .await?;
    Ok(updated.settings())
}

pub async fn report(pool: &SqlitePool, claims: &Claims) -> Result<OrganizationReport, ServiceError> {
    let organization = resolve_for(pool, claims).await?;
    let id = organization.id.as_str();

    let totals = DonationRepository::new(pool.clone()).totals(Some(id)).await?;
    let total_campaigns = CampaignRepository::new(pool.clone()).count(Some(id)).await?;
    let total_applications = VolunteerRepository::new(pool.clone())
        .count_applications(id)
        .await?;
    let total_events = EventRepository::new(pool.clone())
        .count_by_organization(id)
        .await?;

    Ok(OrganizationReport {
        total_donations: totals.total_amount,
        donation_count: totals.total_donations,
        total_campaigns,
        total_applications,
        total_events,
    })
}

pub async fn donations(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<Vec<DonationRecord>, ServiceError> {
    let organization = resolve_for(pool, claims).await?;
    let donations = DonationRepository::new(pool.clone())
        .list_by_organization(&organization.id)
        .await?;
    Ok(donations)
}

pub async fn events(pool: &SqlitePool, claims: &Claims) -> Result<Vec<Event>, ServiceError> {
    let organization = resolve_for(pool, claims).await?;
    let events = EventRepository::new(pool.clone())
        .list_by_organization(&organization.id)
        .await?;
    Ok(events)
}

pub async fn create_event(
    pool: &SqlitePool,
    claims: &Claims,
    req: CreateEventRequest,
) -> Result<Event, ServiceError> {
    let (Some(title), Some(description), Some(date), Some(location)) = (
        present(&req.title),
        present(&req.description),
        present(&req.date),
        present(&req.location),
    ) else {
        return Err(ServiceError::bad_request(
            "Title, description, date, and location are required",
        ));
    };

    let date = normalize_date(date).ok_or_else(|| ServiceError::bad_request("Invalid event date"))?;
    if matches!(req.max_attendees, Some(max) if max <= 0) {
        return Err(ServiceError::bad_request("Max attendees must be greater than zero"));
    }

    let organization = resolve_for(pool, claims).await?;
    let event = EventRepository::new(pool.clone())
        .create(&NewEvent {
            organization_id: organization.id,
            title: title.to_string(),
            description: description.to_string(),
            date,
            location: location.to_string(),
            max_attendees: req.max_attendees,
        })
        .await?;
    Ok(event)
}
