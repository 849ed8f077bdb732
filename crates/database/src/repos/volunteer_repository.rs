//! Repository for volunteer opportunities and applications.

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::organization::OrganizationStatus;
use crate::entities::volunteer::{
    ApplicationRecord, ApplicationStatus, NewApplication, NewOpportunity, OpportunityListing,
    OpportunityStatus, OpportunityWithApplications, VolunteerApplication, VolunteerOpportunity,
};
use crate::types::{DatabaseError, DatabaseResult};
use crate::{new_id, now};

const OPPORTUNITY_COLUMNS: &str = "id, organization_id, title, description, date, location, \
                                   required_skills, status, created_at, updated_at";

const LISTING_SELECT: &str = "SELECT v.id, v.organization_id, v.title, v.description, v.date,
        v.location, v.required_skills, v.status, v.created_at, v.updated_at,
        o.name AS organization_name, o.logo AS organization_logo
     FROM volunteer_opportunities v
     JOIN organizations o ON o.id = v.organization_id";

const APPLICATION_COLUMNS: &str =
    "id, opportunity_id, organization_id, name, email, status, applied_at";

#[derive(Clone)]
pub struct VolunteerRepository {
    pool: SqlitePool,
}

impl VolunteerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_opportunity(
        &self,
        new_opportunity: &NewOpportunity,
    ) -> DatabaseResult<VolunteerOpportunity> {
        let id = new_id();
        let skills = serde_json::to_string(&new_opportunity.required_skills)?;
        let timestamp = now();

        sqlx::query(
            "INSERT INTO volunteer_opportunities
                (id, organization_id, title, description, date, location, required_skills, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_opportunity.organization_id)
        .bind(&new_opportunity.title)
        .bind(&new_opportunity.description)
        .bind(&new_opportunity.date)
        .bind(&new_opportunity.location)
        .bind(skills)
        .bind(OpportunityStatus::Open.as_str())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&self.pool)
        .await?;

        info!(opportunity_id = %id, organization_id = %new_opportunity.organization_id, "volunteer opportunity posted");
        self.find_opportunity(&id)
            .await?
            .ok_or(DatabaseError::NotFound("Opportunity"))
    }

    pub async fn find_opportunity(&self, id: &str) -> DatabaseResult<Option<VolunteerOpportunity>> {
        let opportunity = sqlx::query_as::<_, VolunteerOpportunity>(&format!(
            "SELECT {OPPORTUNITY_COLUMNS} FROM volunteer_opportunities WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(opportunity)
    }

    /// Every opportunity with its organization, soonest first.
    pub async fn list_opportunities(&self) -> DatabaseResult<Vec<OpportunityListing>> {
        let listings = sqlx::query_as::<_, OpportunityListing>(&format!(
            "{LISTING_SELECT} ORDER BY v.date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(listings)
    }

    /// Open opportunities of approved organizations, soonest first.
    pub async fn list_public_opportunities(&self) -> DatabaseResult<Vec<OpportunityListing>> {
        let listings = sqlx::query_as::<_, OpportunityListing>(&format!(
            "{LISTING_SELECT} WHERE v.status = ? AND o.status = ? ORDER BY v.date ASC"
        ))
        .bind(OpportunityStatus::Open.as_str())
        .bind(OrganizationStatus::Approved.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(listings)
    }

    /// One organization's opportunities, each with the applications it received.
    pub async fn list_with_applications(
        &self,
        organization_id: &str,
    ) -> DatabaseResult<Vec<OpportunityWithApplications>> {
        let opportunities = sqlx::query_as::<_, VolunteerOpportunity>(&format!(
            "SELECT {OPPORTUNITY_COLUMNS} FROM volunteer_opportunities
             WHERE organization_id = ? ORDER BY date ASC"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        let applications = sqlx::query_as::<_, VolunteerApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM volunteer_applications
             WHERE organization_id = ? ORDER BY applied_at DESC, rowid DESC"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_opportunity: HashMap<String, Vec<VolunteerApplication>> = HashMap::new();
        for application in applications {
            by_opportunity
                .entry(application.opportunity_id.clone())
                .or_default()
                .push(application);
        }

        Ok(opportunities
            .into_iter()
            .map(|opportunity| OpportunityWithApplications {
                applications: by_opportunity.remove(&opportunity.id).unwrap_or_default(),
                opportunity,
            })
            .collect())
    }

    pub async fn create_application(
        &self,
        new_application: &NewApplication,
    ) -> DatabaseResult<VolunteerApplication> {
        let id = new_id();
        sqlx::query(&format!(
            "INSERT INTO volunteer_applications ({APPLICATION_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&id)
        .bind(&new_application.opportunity_id)
        .bind(&new_application.organization_id)
        .bind(&new_application.name)
        .bind(new_application.email.trim().to_lowercase())
        .bind(ApplicationStatus::Pending.as_str())
        .bind(now())
        .execute(&self.pool)
        .await?;

        info!(application_id = %id, opportunity_id = %new_application.opportunity_id, "volunteer application received");
        self.find_application(&id).await
    }

    async fn find_application(&self, id: &str) -> DatabaseResult<VolunteerApplication> {
        sqlx::query_as::<_, VolunteerApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM volunteer_applications WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DatabaseError::NotFound("Application"))
    }

    /// Applications to one organization, newest first.
    pub async fn list_applications(
        &self,
        organization_id: &str,
    ) -> DatabaseResult<Vec<ApplicationRecord>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            "SELECT a.id, a.opportunity_id, a.organization_id, a.name, a.email, a.status, a.applied_at,
                    v.title AS opportunity_title
             FROM volunteer_applications a
             JOIN volunteer_opportunities v ON v.id = a.opportunity_id
             WHERE a.organization_id = ?
             ORDER BY a.applied_at DESC, a.rowid DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Change an application's status, only within the given organization.
    pub async fn update_application_status(
        &self,
        organization_id: &str,
        application_id: &str,
        status: ApplicationStatus,
    ) -> DatabaseResult<VolunteerApplication> {
        let result = sqlx::query(
            "UPDATE volunteer_applications SET status = ? WHERE id = ? AND organization_id = ?",
        )
        .bind(status.as_str())
        .bind(application_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Application"));
        }

        info!(application_id = %application_id, status = %status, "volunteer application reviewed");
        self.find_application(application_id).await
    }

    pub async fn count_applications(&self, organization_id: &str) -> DatabaseResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM volunteer_applications WHERE organization_id = ?")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_database, seed_organization};

    fn opportunity(organization_id: &str, title: &str, date: &str) -> NewOpportunity {
        NewOpportunity {
            organization_id: organization_id.to_string(),
            title: title.to_string(),
            description: "Help out".to_string(),
            date: date.to_string(),
            location: "Community centre".to_string(),
            required_skills: vec!["cooking".to_string(), "driving".to_string()],
        }
    }

    async fn close_opportunity(pool: &SqlitePool, id: &str) {
        sqlx::query("UPDATE volunteer_opportunities SET status = ? WHERE id = ?")
            .bind(OpportunityStatus::Closed.as_str())
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_opportunity_round_trips_skills() {
        let (pool, _temp_dir) = create_test_database().await;
        let org = seed_organization(&pool, "org@example.org", OrganizationStatus::Approved).await;
        let repo = VolunteerRepository::new(pool);

        let created = repo
            .create_opportunity(&opportunity(&org.id, "Kitchen", "2024-06-01T09:00:00+00:00"))
            .await
            .unwrap();
        assert_eq!(created.status, OpportunityStatus::Open);

        let found = repo.find_opportunity(&created.id).await.unwrap().unwrap();
        assert_eq!(found.required_skills, vec!["cooking", "driving"]);
    }

    #[tokio::test]
    async fn test_public_listing_filters_status() {
        let (pool, _temp_dir) = create_test_database().await;
        let approved = seed_organization(&pool, "a@example.org", OrganizationStatus::Approved).await;
        let pending = seed_organization(&pool, "p@example.org", OrganizationStatus::Pending).await;
        let repo = VolunteerRepository::new(pool.clone());

        let later = repo
            .create_opportunity(&opportunity(&approved.id, "Later", "2024-08-01T09:00:00+00:00"))
            .await
            .unwrap();
        let sooner = repo
            .create_opportunity(&opportunity(&approved.id, "Sooner", "2024-07-01T09:00:00+00:00"))
            .await
            .unwrap();
        let closed = repo
            .create_opportunity(&opportunity(&approved.id, "Closed", "2024-07-15T09:00:00+00:00"))
            .await
            .unwrap();
        repo.create_opportunity(&opportunity(&pending.id, "Hidden", "2024-07-02T09:00:00+00:00"))
            .await
            .unwrap();
        close_opportunity(&pool, &closed.id).await;

        let public: Vec<String> = repo
            .list_public_opportunities()
            .await
            .unwrap()
            .into_iter()
            .map(|listing| listing.opportunity.id)
            .collect();
        assert_eq!(public, vec![sooner.id, later.id]);

        let all = repo.list_opportunities().await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].opportunity.title, "Sooner");
    }

    #[tokio::test]
    async fn test_application_status_is_scoped_to_organization() {
        let (pool, _temp_dir) = create_test_database().await;
        let owner = seed_organization(&pool, "a@example.org", OrganizationStatus::Approved).await;
        let other = seed_organization(&pool, "b@example.org", OrganizationStatus::Approved).await;
        let repo = VolunteerRepository::new(pool);

        let posted = repo
            .create_opportunity(&opportunity(&owner.id, "Kitchen", "2024-06-01T09:00:00+00:00"))
            .await
            .unwrap();
        let application = repo
            .create_application(&NewApplication {
                opportunity_id: posted.id.clone(),
                organization_id: owner.id.clone(),
                name: "Val Volunteer".to_string(),
                email: "val@example.org".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);

        let denied = repo
            .update_application_status(&other.id, &application.id, ApplicationStatus::Accepted)
            .await
            .unwrap_err();
        assert!(denied.is_not_found());

        let accepted = repo
            .update_application_status(&owner.id, &application.id, ApplicationStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, ApplicationStatus::Accepted);

        let grouped = repo.list_with_applications(&owner.id).await.unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].applications.len(), 1);

        let records = repo.list_applications(&owner.id).await.unwrap();
        assert_eq!(records[0].opportunity_title, "Kitchen");
        assert_eq!(repo.count_applications(&owner.id).await.unwrap(), 1);
        assert_eq!(repo.count_applications(&other.id).await.unwrap(), 0);
    }
}
