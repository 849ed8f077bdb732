//! Charity Platform Database Crate
//!
//! Connection management, embedded migrations, entity definitions and the
//! repositories the HTTP layer reads and writes through.

use charity_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::{
    CampaignRepository, DonationRepository, EventRepository, OrganizationRepository,
    UserRepository, VolunteerRepository,
};

pub use entities::{
    campaign::{Campaign, CampaignStatus, CampaignUpdate, NewCampaign},
    donation::{CampaignSummary, Donation, DonationRecord, DonationTotals, DonorSummary, NewDonation},
    event::{Event, NewEvent},
    impact::{funding_ratio, progress_percent, OrganizationImpact},
    organization::{
        NewOrganization, Organization, OrganizationSettings, OrganizationSettingsUpdate,
        OrganizationStatus,
    },
    user::{NewUser, User, UserRole},
    volunteer::{
        ApplicationRecord, ApplicationStatus, NewApplication, NewOpportunity, OpportunityListing,
        OpportunityStatus, OpportunityWithApplications, OrganizationBrief, VolunteerApplication,
        VolunteerOpportunity,
    },
    UnknownVariant,
};

pub use types::{DatabaseError, DatabaseResult};

/// Connect to the configured database and apply pending migrations.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

/// Fresh identifier for a new row.
pub(crate) fn new_id() -> String {
    cuid2::create_id()
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    pub async fn create_test_database() -> (SqlitePool, TempDir) {
        create_test_database_with(2).await
    }

    pub async fn create_test_database_with(max_connections: u32) -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }

    pub async fn seed_user(pool: &SqlitePool, email: &str, role: UserRole) -> User {
        UserRepository::new(pool.clone())
            .create(&NewUser {
                email: email.to_string(),
                name: format!("User {email}"),
                password_hash: "hash".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    pub async fn seed_organization(
        pool: &SqlitePool,
        email: &str,
        status: OrganizationStatus,
    ) -> Organization {
        let owner = seed_user(pool, email, UserRole::Organization).await;
        let repo = OrganizationRepository::new(pool.clone());
        let organization = repo
            .create(&NewOrganization {
                user_id: owner.id,
                name: format!("Org {email}"),
                description: "Test organization".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        repo.update_status(&organization.id, status).await.unwrap()
    }

    pub async fn seed_campaign(
        pool: &SqlitePool,
        organization: &Organization,
        target_amount: f64,
    ) -> Campaign {
        CampaignRepository::new(pool.clone())
            .create(&NewCampaign {
                organization_id: organization.id.clone(),
                user_id: organization.user_id.clone(),
                title: "Seeded campaign".to_string(),
                description: "Seeded".to_string(),
                target_amount,
                start_date: "2024-01-01T00:00:00+00:00".to_string(),
                end_date: "2030-01-01T00:00:00+00:00".to_string(),
                image: None,
            })
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{create_test_database, create_test_database_with, seed_organization};
    use super::*;

    #[tokio::test]
    async fn test_database_initialization_creates_schema() {
        let (pool, _temp_dir) = create_test_database().await;

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();

        for expected in [
            "campaigns",
            "donations",
            "events",
            "organizations",
            "users",
            "volunteer_applications",
            "volunteer_opportunities",
        ] {
            assert!(names.contains(&expected), "missing table {expected}");
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = create_test_database().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(result.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_writes_are_visible_across_pooled_connections() {
        let (pool, _temp_dir) = create_test_database_with(4).await;
        let organizations = OrganizationRepository::new(pool.clone());
        let campaigns = CampaignRepository::new(pool.clone());

        for round in 0..20 {
            let organization =
                seed_organization(&pool, &format!("org{round}@example.org"), OrganizationStatus::Pending)
                    .await;
            organizations
                .update_status(&organization.id, OrganizationStatus::Approved)
                .await
                .unwrap();

            let reread = organizations.find_by_id(&organization.id).await.unwrap().unwrap();
            assert_eq!(reread.status, OrganizationStatus::Approved, "round {round}");

            let campaign = campaigns
                .create(&NewCampaign {
                    organization_id: organization.id.clone(),
                    user_id: organization.user_id.clone(),
                    title: format!("Campaign {round}"),
                    description: "Round trip".to_string(),
                    target_amount: 100.0,
                    start_date: "2024-01-01T00:00:00+00:00".to_string(),
                    end_date: "2030-01-01T00:00:00+00:00".to_string(),
                    image: None,
                })
                .await
                .unwrap();
            campaigns
                .update(
                    &campaign.id,
                    &CampaignUpdate {
                        title: Some(format!("Renamed {round}")),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let public = campaigns.list_public().await.unwrap();
            assert_eq!(public.len(), round + 1, "round {round}");
            assert!(public.iter().all(|campaign| campaign.title.starts_with("Renamed")));
        }

        let counts = organizations.count_by_status().await.unwrap();
        assert!(counts.contains(&(OrganizationStatus::Approved, 20)));
        assert!(counts.contains(&(OrganizationStatus::Pending, 0)));
    }
}
