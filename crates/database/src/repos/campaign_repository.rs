//! Repository for fundraising campaigns.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::campaign::{Campaign, CampaignStatus, CampaignUpdate, NewCampaign};
use crate::entities::organization::OrganizationStatus;
use crate::types::{DatabaseError, DatabaseResult};
use crate::{new_id, now};

const JOINED_COLUMNS: &str = "c.id, c.organization_id, c.user_id, c.title, c.description, \
                              c.target_amount, c.current_amount, c.start_date, c.end_date, c.image, \
                              c.status, c.created_at, c.updated_at, o.name AS organization_name";

#[derive(Clone)]
pub struct CampaignRepository {
    pool: SqlitePool,
}

impl CampaignRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_campaign: &NewCampaign) -> DatabaseResult<Campaign> {
        let id = new_id();
        let timestamp = now();
        sqlx::query(
            "INSERT INTO campaigns
                (id, organization_id, user_id, title, description, target_amount, current_amount,
                 start_date, end_date, image, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_campaign.organization_id)
        .bind(&new_campaign.user_id)
        .bind(&new_campaign.title)
        .bind(&new_campaign.description)
        .bind(new_campaign.target_amount)
        .bind(&new_campaign.start_date)
        .bind(&new_campaign.end_date)
        .bind(&new_campaign.image)
        .bind(CampaignStatus::Active.as_str())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&self.pool)
        .await?;

        info!(campaign_id = %id, organization_id = %new_campaign.organization_id, "campaign created");
        self.fetch(&id).await
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Campaign>> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {JOINED_COLUMNS}
             FROM campaigns c JOIN organizations o ON o.id = c.organization_id
             WHERE c.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    /// Campaigns of one organization, newest first.
    pub async fn list_by_organization(&self, organization_id: &str) -> DatabaseResult<Vec<Campaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {JOINED_COLUMNS}
             FROM campaigns c JOIN organizations o ON o.id = c.organization_id
             WHERE c.organization_id = ?
             ORDER BY c.created_at DESC, c.rowid DESC"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    /// Active campaigns run by approved organizations, newest first.
    pub async fn list_public(&self) -> DatabaseResult<Vec<Campaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {JOINED_COLUMNS}
             FROM campaigns c JOIN organizations o ON o.id = c.organization_id
             WHERE c.status = ? AND o.status = ?
             ORDER BY c.created_at DESC, c.rowid DESC"
        ))
        .bind(CampaignStatus::Active.as_str())
        .bind(OrganizationStatus::Approved.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    pub async fn list_all(&self) -> DatabaseResult<Vec<Campaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {JOINED_COLUMNS}
             FROM campaigns c JOIN organizations o ON o.id = c.organization_id
             ORDER BY o.name COLLATE NOCASE, c.created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    /// Apply the provided fields and keep the rest.
    pub async fn update(&self, id: &str, update: &CampaignUpdate) -> DatabaseResult<Campaign> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                target_amount = COALESCE(?, target_amount),
                start_date = COALESCE(?, start_date),
                end_date = COALESCE(?, end_date),
                image = COALESCE(?, image),
                status = COALESCE(?, status),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.target_amount)
        .bind(&update.start_date)
        .bind(&update.end_date)
        .bind(&update.image)
        .bind(update.status.map(|status| status.as_str()))
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Campaign"));
        }

        info!(campaign_id = %id, "campaign updated");
        self.fetch(id).await
    }

    async fn fetch(&self, id: &str) -> DatabaseResult<Campaign> {
        self.find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Campaign"))
    }

    /// Delete a campaign and, through the foreign key, its donations.
    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Campaign"));
        }

        info!(campaign_id = %id, "campaign deleted");
        Ok(())
    }

    pub async fn count(&self, organization_id: Option<&str>) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM campaigns WHERE ?1 IS NULL OR organization_id = ?1",
        )
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

    fn new_campaign(organization_id: &str, user_id: &str, title: &str) -> NewCampaign {
        NewCampaign {
            organization_id: organization_id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: "Raise funds".to_string(),
            target_amount: 1000.0,
            start_date: "2024-01-01T00:00:00+00:00".to_string(),
            end_date: "2024-12-31T00:00:00+00:00".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_campaign() {
        let (pool, _temp_dir) = create_test_database().await;
        let org = seed_organization(&pool, "org@example.org", OrganizationStatus::Approved).await;
        let repo = CampaignRepository::new(pool);

        let created = repo.create(&new_campaign(&org.id, &org.user_id, "Wells")).await.unwrap();
        assert_eq!(created.current_amount, 0.0);
        assert_eq!(created.status, CampaignStatus::Active);
        assert_eq!(created.organization_name.as_deref(), Some(org.name.as_str()));

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.organization_name.as_deref(), Some(org.name.as_str()));
        assert_eq!(repo.count(Some(&org.id)).await.unwrap(), 1);
        assert_eq!(repo.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_public_listing_requires_active_and_approved() {
        let (pool, _temp_dir) = create_test_database().await;
        let approved = seed_organization(&pool, "a@example.org", OrganizationStatus::Approved).await;
        let pending = seed_organization(&pool, "p@example.org", OrganizationStatus::Pending).await;
        let repo = CampaignRepository::new(pool);

        let visible = repo.create(&new_campaign(&approved.id, &approved.user_id, "Visible")).await.unwrap();
        let finished = repo.create(&new_campaign(&approved.id, &approved.user_id, "Done")).await.unwrap();
        repo.create(&new_campaign(&pending.id, &pending.user_id, "Hidden")).await.unwrap();
        repo.update(
            &finished.id,
            &CampaignUpdate {
                status: Some(CampaignStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let public = repo.list_public().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, visible.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (pool, _temp_dir) = create_test_database().await;
        let org = seed_organization(&pool, "org@example.org", OrganizationStatus::Approved).await;
        let repo = CampaignRepository::new(pool);
        let created = repo.create(&new_campaign(&org.id, &org.user_id, "Wells")).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                &CampaignUpdate {
                    title: Some("Deep wells".to_string()),
                    target_amount: Some(2500.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Deep wells");
        assert_eq!(updated.target_amount, 2500.0);
        assert_eq!(updated.description, "Raise funds");

        repo.delete(&created.id).await.unwrap();
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
        assert!(repo.delete(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_by_organization_is_newest_first() {
        let (pool, _temp_dir) = create_test_database().await;
        let org = seed_organization(&pool, "org@example.org", OrganizationStatus::Approved).await;
        let repo = CampaignRepository::new(pool);

        repo.create(&new_campaign(&org.id, &org.user_id, "First")).await.unwrap();
        repo.create(&new_campaign(&org.id, &org.user_id, "Second")).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_organization(&org.id)
            .await
            .unwrap()
            .into_iter()
            .map(|campaign| campaign.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }
}
