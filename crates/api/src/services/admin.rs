use charity_database::{
    CampaignRepository, DonationRepository, Organization, OrganizationRepository,
    OrganizationStatus,
};
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use super::ngo::summarize_all;
use crate::routes::models::{NgoSummary, OrganizationCounts, PlatformAnalytics};

pub async fn pending_ngos(pool: &SqlitePool) -> Result<Vec<NgoSummary>, ServiceError> {
    let organizations = OrganizationRepository::new(pool.clone())
        .list_by_status(OrganizationStatus::Pending)
        .await?;
    summarize_all(pool, organizations).await
}

pub async fn review_ngo(
    pool: &SqlitePool,
    id: Option<&str>,
    status: OrganizationStatus,
) -> Result<Organization, ServiceError> {
    let id = id.ok_or_else(|| ServiceError::bad_request("NGO id is required"))?;
    let organization = OrganizationRepository::new(pool.clone())
        .update_status(id, status)
        .await
        .map_err(|err| match err {
            charity_database::DatabaseError::NotFound(_) => ServiceError::not_found("NGO not found"),
            other => other.into(),
        })?;

    info!(organization_id = %organization.id, status = %status, "ngo reviewed");
    Ok(organization)
}

pub async fn analytics(pool: &SqlitePool) -> Result<PlatformAnalytics, ServiceError> {
    let donations = DonationRepository::new(pool.clone()).totals(None).await?;
    let total_campaigns = CampaignRepository::new(pool.clone()).count(None).await?;

    let mut organizations = OrganizationCounts::default();
    for (status, count) in OrganizationRepository::new(pool.clone())
        .count_by_status()
        .await?
    {
        match status {
            OrganizationStatus::Pending => organizations.pending = count,
            OrganizationStatus::Approved => organizations.approved = count,
            OrganizationStatus::Rejected => organizations.rejected = count,
        }
    }

    Ok(PlatformAnalytics {
        donations,
        total_campaigns,
        organizations,
    })
}
