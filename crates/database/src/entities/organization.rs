//! Registered nonprofit organizations

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

use super::decode_text;

text_enum! {
    /// Review state set by an administrator.
    OrganizationStatus ("organization status") {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: OrganizationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Organization {
    pub fn settings(&self) -> OrganizationSettings {
        OrganizationSettings {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            description: self.description.clone(),
            website: self.website.clone(),
            logo: self.logo.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewOrganization {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Contact and profile fields an organization edits from its settings page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSettings {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSettingsUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
}

impl OrganizationSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.description.is_none()
            && self.website.is_none()
            && self.logo.is_none()
    }
}

impl FromRow<'_, SqliteRow> for Organization {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            website: row.try_get("website")?,
            logo: row.try_get("logo")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            status: decode_text(row, "status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
