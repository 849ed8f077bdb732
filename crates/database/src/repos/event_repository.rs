//! Repository for organization events.

use sqlx::SqlitePool;

use crate::entities::event::{Event, NewEvent};
use crate::types::{DatabaseError, DatabaseResult};
use crate::{new_id, now};

const EVENT_COLUMNS: &str =
    "id, organization_id, title, description, date, location, max_attendees, created_at";

#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_event: &NewEvent) -> DatabaseResult<Event> {
        let id = new_id();
        sqlx::query(
            "INSERT INTO events (id, organization_id, title, description, date, location, max_attendees, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_event.organization_id)
        .bind(&new_event.title)
        .bind(&new_event.description)
        .bind(&new_event.date)
        .bind(&new_event.location)
        .bind(new_event.max_attendees)
        .bind(now())
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or(DatabaseError::NotFound("Event"))
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    /// Events of one organization, soonest first.
    pub async fn list_by_organization(&self, organization_id: &str) -> DatabaseResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organization_id = ? ORDER BY date ASC"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn count_by_organization(&self, organization_id: &str) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE organization_id = ?")
            .bind(organization_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
