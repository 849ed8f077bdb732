use charity_database::{
    Campaign, CampaignRepository, Organization, OrganizationImpact, OrganizationRepository,
    OrganizationStatus, UserRepository,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::{NgoDetail, NgoSummary, ProjectProgress};

fn impact_of(campaigns: &[Campaign]) -> OrganizationImpact {
    OrganizationImpact::from_campaigns(
        campaigns
            .iter()
            .map(|campaign| (campaign.current_amount, campaign.target_amount)),
    )
}

async fn load(
    pool: &SqlitePool,
    organization: Organization,
) -> Result<(NgoSummary, Vec<Campaign>), ServiceError> {
    let campaigns = CampaignRepository::new(pool.clone())
        .list_by_organization(&organization.id)
        .await?;
    let owner = UserRepository::new(pool.clone())
        .find_by_id(&organization.user_id)
        .await?;

    let summary = NgoSummary {
        impact: impact_of(&campaigns),
        email: owner.map(|user| user.email),
        id: organization.id,
        name: organization.name,
        description: organization.description,
        website: organization.website,
        logo: organization.logo,
        status: organization.status,
        created_at: organization.created_at,
    };
    Ok((summary, campaigns))
}

pub async fn summarize_all(
    pool: &SqlitePool,
    organizations: Vec<Organization>,
) -> Result<Vec<NgoSummary>, ServiceError> {
    let mut summaries = Vec::with_capacity(organizations.len());
    for organization in organizations {
        let (summary, _) = load(pool, organization).await?;
        summaries.push(summary);
    }
    Ok(summaries)
}

pub async fn list_approved(pool: &SqlitePool) -> Result<Vec<NgoSummary>, ServiceError> {
    let organizations = OrganizationRepository::new(pool.clone())
        .list_by_status(OrganizationStatus::Approved)
        .await?;
    summarize_all(pool, organizations).await
}

pub async fn detail(pool: &SqlitePool, id: &str) -> Result<NgoDetail, ServiceError> {
    let organization = OrganizationRepository::new(pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("NGO not found"))?;

    let (summary, campaigns) = load(pool, organization).await?;
    let current_projects = campaigns
        .into_iter()
        .map(|campaign| ProjectProgress {
            progress: campaign.progress(),
            status: campaign.status.as_str().to_lowercase(),
            id: campaign.id,
            name: campaign.title,
            description: campaign.description,
        })
        .collect();

    Ok(NgoDetail {
        summary,
        current_projects,
    })
}
