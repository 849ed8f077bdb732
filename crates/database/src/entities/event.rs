//! Organization events

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub organization_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub max_attendees: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organization_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub max_attendees: Option<i64>,
}

impl FromRow<'_, SqliteRow> for Event {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            organization_id: row.try_get("organization_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            location: row.try_get("location")?,
            max_attendees: row.try_get("max_attendees")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
