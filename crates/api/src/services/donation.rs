use charity_auth::validation::present;
use charity_auth::Claims;
use charity_database::{
    CampaignRepository, Donation, DonationRecord, DonationRepository, NewDonation, UserRole,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use super::organization::resolve_for;
use crate::routes::models::CreateDonationRequest;

pub async fn donate(
    pool: &SqlitePool,
    claims: &Claims,
    req: CreateDonationRequest,
) -> Result<Donation, ServiceError> {
    let (Some(amount), Some(campaign_id)) = (req.amount.as_ref(), present(&req.campaign_id)) else {
        return Err(ServiceError::bad_request("Amount and campaignId are required"));
    };

    let amount = amount
        .value()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| ServiceError::bad_request("Amount must be a positive number"))?;

    let campaign = CampaignRepository::new(pool.clone())
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Campaign not found"))?;
    if !campaign.accepts_donations() {
        return Err(ServiceError::bad_request("Campaign is not accepting donations"));
    }

    let donation = DonationRepository::new(pool.clone())
        .record(&NewDonation {
            amount,
            message: present(&req.message).map(str::to_string),
            campaign_id: campaign.id,
            user_id: claims.user_id.clone(),
        })
        .await?;
    Ok(donation)
}

/// Every donation for admins; otherwise donations to the caller's organization.
pub async fn list_visible(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<Vec<DonationRecord>, ServiceError> {
    let repo = DonationRepository::new(pool.clone());
    if claims.has_role(UserRole::Admin) {
        return Ok(repo.list_all().await?);
    }

    let organization = resolve_for(pool, claims).await?;
    Ok(repo.list_by_organization(&organization.id).await?)
}

pub async fn list_own(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<Vec<DonationRecord>, ServiceError> {
    let donations = DonationRepository::new(pool.clone())
        .list_by_user(&claims.user_id)
        .await?;
    Ok(donations)
}
