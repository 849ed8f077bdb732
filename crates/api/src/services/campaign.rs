use charity_auth::validation::present;
use charity_auth::{require_owner_or_admin, Claims};
use charity_database::{CampaignRepository, CampaignStatus, CampaignUpdate, NewCampaign};
use chrono::Utc;
use sqlx::SqlitePool;

use super::error::ServiceError;
use super::organization::resolve_for;
use crate::routes::models::{CampaignView, CreateCampaignRequest, UpdateCampaignRequest};
use crate::util::parse_date;

fn positive_target(target: f64) -> Result<f64, ServiceError> {
    if target.is_finite() && target > 0.0 {
        Ok(target)
    } else {
        Err(ServiceError::bad_request("Target amount must be greater than zero"))
    }
}

pub async fn list_for_organization(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<Vec<CampaignView>, ServiceError> {
    let organization = resolve_for(pool, claims).await?;
    let campaigns = CampaignRepository::new(pool.clone())
        .list_by_organization(&organization.id)
        .await?;
    Ok(campaigns.into_iter().map(CampaignView::from).collect())
}

pub async fn list_public(pool: &SqlitePool) -> Result<Vec<CampaignView>, ServiceError> {
    let campaigns = CampaignRepository::new(pool.clone()).list_public().await?;
    Ok(campaigns.into_iter().map(CampaignView::from).collect())
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<CampaignView, ServiceError> {
    CampaignRepository::new(pool.clone())
        .find_by_id(id)
        .await?
        .map(CampaignView::from)
        .ok_or_else(|| ServiceError::not_found("Campaign not found"))
}

pub async fn create(
    pool: &SqlitePool,
    claims: &Claims,
    req: CreateCampaignRequest,
) -> Result<CampaignView, ServiceError> {
    let (Some(title), Some(description), Some(target_amount), Some(end_date)) = (
        present(&req.title),
        present(&req.description),
        req.target_amount,
        present(&req.end_date),
    ) else {
        return Err(ServiceError::bad_request(
            "Title, description, target amount, and end date are required",
        ));
    };
    let target_amount = positive_target(target_amount)?;

    let end_date =
        parse_date(end_date).ok_or_else(|| ServiceError::bad_request("Invalid end date"))?;
    let start_date = match present(&req.start_date) {
        Some(value) => {
            let start =
                parse_date(value).ok_or_else(|| ServiceError::bad_request("Invalid start date"))?;
            if end_date <= start {
                return Err(ServiceError::bad_request("End date must be after start date"));
            }
            start
        }
        None => Utc::now(),
    };

    let organization = resolve_for(pool, claims).await?;
    let campaign = CampaignRepository::new(pool.clone())
        .create(&NewCampaign {
            organization_id: organization.id,
            user_id: claims.user_id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            target_amount,
            start_date: start_date.to_rfc3339(),
            end_date: end_date.to_rfc3339(),
            image: present(&req.image).map(str::to_string),
        })
        .await?;
    Ok(campaign.into())
}

/// Apply a partial update. Only the campaign's creator or an admin may edit it.
pub async fn update(
    pool: &SqlitePool,
    claims: &Claims,
    id: &str,
    req: UpdateCampaignRequest,
) -> Result<CampaignView, ServiceError> {
    let repo = CampaignRepository::new(pool.clone());
    let campaign = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Campaign not found"))?;
    require_owner_or_admin(claims, &campaign.user_id)?;

    let target_amount = req.target_amount.map(positive_target).transpose()?;
    let status = present(&req.status)
        .map(|value| value.parse::<CampaignStatus>())
        .transpose()
        .map_err(|_| ServiceError::bad_request("Invalid campaign status"))?;
    let start_date = present(&req.start_date)
        .map(|value| parse_date(value).ok_or_else(|| ServiceError::bad_request("Invalid start date")))
        .transpose()?;
    let end_date = present(&req.end_date)
        .map(|value| parse_date(value).ok_or_else(|| ServiceError::bad_request("Invalid end date")))
        .transpose()?;

    let update = CampaignUpdate {
        title: present(&req.title).map(str::to_string),
        description: present(&req.description).map(str::to_string),
        target_amount,
        start_date: start_date.map(|date| date.to_rfc3339()),
        end_date: end_date.map(|date| date.to_rfc3339()),
        image: present(&req.image).map(str::to_string),
        status,
    };

    let updated = repo.update(id, &update).await?;
    Ok(updated.into())
}

pub async fn delete(pool: &SqlitePool, claims: &Claims, id: &str) -> Result<(), ServiceError> {
    let repo = CampaignRepository::new(pool.clone());
    let campaign = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Campaign not found"))?;
    require_owner_or_admin(claims, &campaign.user_id)?;

    repo.delete(id).await?;
    Ok(())
}
