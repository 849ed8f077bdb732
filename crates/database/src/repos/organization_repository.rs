//! Repository for organizations and their review status.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::organization::{
    NewOrganization, Organization, OrganizationSettingsUpdate, OrganizationStatus,
};
use crate::types::{DatabaseError, DatabaseResult};
use crate::{new_id, now};

const ORGANIZATION_COLUMNS: &str = "id, user_id, name, description, website, logo, email, phone, \
                                    address, status, created_at, updated_at";

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: SqlitePool,
}

impl OrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a `PENDING` organization on an existing connection.
    pub async fn insert(
        conn: &mut SqliteConnection,
        new_org: &NewOrganization,
    ) -> DatabaseResult<Organization> {
        let id = new_id();
        let timestamp = now();
        sqlx::query(
            "INSERT INTO organizations
                (id, user_id, name, description, website, logo, email, phone, address, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_org.user_id)
        .bind(&new_org.name)
        .bind(&new_org.description)
        .bind(&new_org.website)
        .bind(&new_org.logo)
        .bind(&new_org.email)
        .bind(&new_org.phone)
        .bind(&new_org.address)
        .bind(OrganizationStatus::Pending.as_str())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&mut *conn)
        .await?;

        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = ?"
        ))
        .bind(&id)
        .fetch_one(&mut *conn)
        .await?;

        info!(organization_id = %organization.id, user_id = %organization.user_id, "organization registered");
        Ok(organization)
    }

    pub async fn create(&self, new_org: &NewOrganization) -> DatabaseResult<Organization> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(&mut conn, new_org).await
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> DatabaseResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    /// Organizations in the given review state, newest first.
    pub async fn list_by_status(
        &self,
        status: OrganizationStatus,
    ) -> DatabaseResult<Vec<Organization>> {
        let organizations = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations
             WHERE status = ?
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(organizations)
    }

    pub async fn list_all(&self) -> DatabaseResult<Vec<Organization>> {
        let organizations = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(organizations)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: OrganizationStatus,
    ) -> DatabaseResult<Organization> {
        let result = sqlx::query("UPDATE organizations SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Organization"));
        }

        info!(organization_id = %id, status = %status, "organization status changed");
        self.fetch(id).await
    }

    /// Apply the provided fields and keep the rest.
    pub async fn update_settings(
        &self,
        id: &str,
        update: &OrganizationSettingsUpdate,
    ) -> DatabaseResult<Organization> {
        let result = sqlx::query(
            "UPDATE organizations SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                description = COALESCE(?, description),
                website = COALESCE(?, website),
                logo = COALESCE(?, logo),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(&update.description)
        .bind(&update.website)
        .bind(&update.logo)
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Organization"));
        }

        self.fetch(id).await
    }

    async fn fetch(&self, id: &str) -> DatabaseResult<Organization> {
        self.find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Organization"))
    }

    /// Number of organizations per review state; absent states count zero.
    pub async fn count_by_status(&self) -> DatabaseResult<Vec<(OrganizationStatus, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM organizations GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        Ok(OrganizationStatus::ALL
            .iter()
            .map(|status| {
                let count = rows
                    .iter()
                    .find(|(raw, _)| raw == status.as_str())
                    .map_or(0, |(_, count)| *count);
                (*status, count)
            })
            .collect())
    }
}
