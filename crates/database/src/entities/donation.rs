//! Donations and the joined views served to donors and organizations

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub amount: f64,
    pub message: Option<String>,
    pub campaign_id: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub amount: f64,
    pub message: Option<String>,
    pub campaign_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: String,
    pub title: String,
    pub organization_id: String,
    pub organization_name: String,
}

/// A donation joined with its donor and campaign.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub id: String,
    pub amount: f64,
    pub message: Option<String>,
    pub created_at: String,
    pub donor: DonorSummary,
    pub campaign: CampaignSummary,
}

/// Sum and count of donations in some scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationTotals {
    pub total_amount: f64,
    pub total_donations: i64,
    pub unique_donors: i64,
}

impl FromRow<'_, SqliteRow> for Donation {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            amount: row.try_get("amount")?,
            message: row.try_get("message")?,
            campaign_id: row.try_get("campaign_id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for DonationRecord {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            amount: row.try_get("amount")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
            donor: DonorSummary {
                id: row.try_get("donor_id")?,
                name: row.try_get("donor_name")?,
                email: row.try_get("donor_email")?,
            },
            campaign: CampaignSummary {
                id: row.try_get("campaign_id")?,
                title: row.try_get("campaign_title")?,
                organization_id: row.try_get("organization_id")?,
                organization_name: row.try_get("organization_name")?,
            },
        })
    }
}

impl FromRow<'_, SqliteRow> for DonationTotals {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            total_amount: row.try_get("total_amount")?,
            total_donations: row.try_get("total_donations")?,
            unique_donors: row.try_get("unique_donors")?,
        })
    }
}
