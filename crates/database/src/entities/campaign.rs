//! Fundraising campaigns

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

use super::impact::progress_percent;
use super::decode_text;

text_enum! {
    CampaignStatus ("campaign status") {
        Active => "ACTIVE",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub image: Option<String>,
    pub status: CampaignStatus,
    pub created_at: String,
    pub updated_at: String,
    /// Name of the owning organization when the query joined it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

impl Campaign {
    /// Whole-number percentage of the target raised so far.
    pub fn progress(&self) -> i64 {
        progress_percent(self.current_amount, self.target_amount)
    }

    pub fn accepts_donations(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub organization_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub image: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
    pub status: Option<CampaignStatus>,
}

impl FromRow<'_, SqliteRow> for Campaign {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let organization_name = match row.try_get("organization_name") {
            Ok(name) => name,
            Err(sqlx::Error::ColumnNotFound(_)) => None,
            Err(error) => return Err(error),
        };

        Ok(Self {
            id: row.try_get("id")?,
            organization_id: row.try_get("organization_id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            target_amount: row.try_get("target_amount")?,
            current_amount: row.try_get("current_amount")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            image: row.try_get("image")?,
            status: decode_text(row, "status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            organization_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(current: f64, target: f64, status: CampaignStatus) -> Campaign {
        Campaign {
            id: "c1".into(),
            organization_id: "o1".into(),
            user_id: "u1".into(),
            title: "Wells".into(),
            description: "Clean water".into(),
            target_amount: target,
            current_amount: current,
            start_date: "2024-01-01T00:00:00+00:00".into(),
            end_date: "2024-12-31T00:00:00+00:00".into(),
            image: None,
            status,
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
            organization_name: None,
        }
    }

    #[test]
    fn progress_rounds_to_whole_percent() {
        assert_eq!(campaign(333.0, 1000.0, CampaignStatus::Active).progress(), 33);
        assert_eq!(campaign(2.0, 3.0, CampaignStatus::Active).progress(), 67);
    }

    #[test]
    fn only_active_campaigns_accept_donations() {
        assert!(campaign(0.0, 10.0, CampaignStatus::Active).accepts_donations());
        assert!(!campaign(0.0, 10.0, CampaignStatus::Completed).accepts_donations());
        assert!(!campaign(0.0, 10.0, CampaignStatus::Cancelled).accepts_donations());
    }
}
