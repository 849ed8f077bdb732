//! Repository for donations.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::donation::{Donation, DonationRecord, DonationTotals, NewDonation};
use crate::types::{DatabaseError, DatabaseResult};
use crate::{new_id, now};

const RECORD_SELECT: &str = "SELECT d.id, d.amount, d.message, d.created_at,
        u.id AS donor_id, u.name AS donor_name, u.email AS donor_email,
        c.id AS campaign_id, c.title AS campaign_title,
        o.id AS organization_id, o.name AS organization_name
     FROM donations d
     JOIN users u ON u.id = d.user_id
     JOIN campaigns c ON c.id = d.campaign_id
     JOIN organizations o ON o.id = c.organization_id";

#[derive(Clone)]
pub struct DonationRepository {
    pool: SqlitePool,
}

impl DonationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a donation and add its amount to the campaign total atomically.
    pub async fn record(&self, new_donation: &NewDonation) -> DatabaseResult<Donation> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE campaigns SET current_amount = current_amount + ?, updated_at = ? WHERE id = ?",
        )
        .bind(new_donation.amount)
        .bind(now())
        .bind(&new_donation.campaign_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Campaign"));
        }

        let id = new_id();
        sqlx::query(
            "INSERT INTO donations (id, amount, message, campaign_id, user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(new_donation.amount)
        .bind(&new_donation.message)
        .bind(&new_donation.campaign_id)
        .bind(&new_donation.user_id)
        .bind(now())
        .execute(&mut *tx)
        .await?;

        let donation = sqlx::query_as::<_, Donation>(
            "SELECT id, amount, message, campaign_id, user_id, created_at FROM donations WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            donation_id = %donation.id,
            campaign_id = %donation.campaign_id,
            amount = donation.amount,
            "donation recorded"
        );
        Ok(donation)
    }

    /// Every donation on the platform, newest first.
    pub async fn list_all(&self) -> DatabaseResult<Vec<DonationRecord>> {
        let records = sqlx::query_as::<_, DonationRecord>(&format!(
            "{RECORD_SELECT} ORDER BY d.created_at DESC, d.rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Donations to campaigns of one organization, newest first.
    pub async fn list_by_organization(
        &self,
        organization_id: &str,
    ) -> DatabaseResult<Vec<DonationRecord>> {
        let records = sqlx::query_as::<_, DonationRecord>(&format!(
            "{RECORD_SELECT} WHERE c.organization_id = ? ORDER BY d.created_at DESC, d.rowid DESC"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Donations made by one user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DatabaseResult<Vec<DonationRecord>> {
        let records = sqlx::query_as::<_, DonationRecord>(&format!(
            "{RECORD_SELECT} WHERE d.user_id = ? ORDER BY d.created_at DESC, d.rowid DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Totals across the platform, or one organization's campaigns.
    pub async fn totals(&self, organization_id: Option<&str>) -> DatabaseResult<DonationTotals> {
        let totals = sqlx::query_as::<_, DonationTotals>(
            "SELECT CAST(COALESCE(SUM(d.amount), 0) AS REAL) AS total_amount,
                    COUNT(d.id) AS total_donations,
                    COUNT(DISTINCT d.user_id) AS unique_donors
             FROM donations d
             JOIN campaigns c ON c.id = d.campaign_id
             WHERE ?1 IS NULL OR c.organization_id = ?1",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::organization::OrganizationStatus;
    use crate::test_support::{create_test_database, seed_campaign, seed_organization, seed_user};
    use crate::UserRole;

    #[tokio::test]
    async fn test_record_increments_campaign_total() {
        let (pool, _temp_dir) = create_test_database().await;
        let org = seed_organization(&pool, "org@example.org", OrganizationStatus::Approved).await;
        let campaign = seed_campaign(&pool, &org, 1000.0).await;
        let donor = seed_user(&pool, "donor@example.org", UserRole::Donor).await;
        let repo = DonationRepository::new(pool.clone());

        for amount in [25.0, 75.0] {
            repo.record(&NewDonation {
                amount,
                message: Some("Keep going".to_string()),
                campaign_id: campaign.id.clone(),
                user_id: donor.id.clone(),
            })
            .await
            .unwrap();
        }

        let (current,): (f64,) = sqlx::query_as("SELECT current_amount FROM campaigns WHERE id = ?")
            .bind(&campaign.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(current, 100.0);

        let totals = repo.totals(Some(&org.id)).await.unwrap();
        assert_eq!(totals.total_amount, 100.0);
        assert_eq!(totals.total_donations, 2);
        assert_eq!(totals.unique_donors, 1);
    }

    #[tokio::test]
    async fn test_record_for_unknown_campaign_leaves_no_row() {
        let (pool, _temp_dir) = create_test_database().await;
        let donor = seed_user(&pool, "donor@example.org", UserRole::Donor).await;
        let repo = DonationRepository::new(pool.clone());

        let error = repo
            .record(&NewDonation {
                amount: 10.0,
                message: None,
                campaign_id: "missing".to_string(),
                user_id: donor.id,
            })
            .await
            .unwrap_err();
        assert!(error.is_not_found());

        let totals = repo.totals(None).await.unwrap();
        assert_eq!(totals, DonationTotals::default());
    }

    #[tokio::test]
    async fn test_records_are_scoped() {
        let (pool, _temp_dir) = create_test_database().await;
        let first = seed_organization(&pool, "a@example.org", OrganizationStatus::Approved).await;
        let second = seed_organization(&pool, "b@example.org", OrganizationStatus::Approved).await;
        let first_campaign = seed_campaign(&pool, &first, 100.0).await;
        let second_campaign = seed_campaign(&pool, &second, 100.0).await;
        let donor = seed_user(&pool, "donor@example.org", UserRole::Donor).await;
        let repo = DonationRepository::new(pool);

        for campaign_id in [&first_campaign.id, &second_campaign.id] {
            repo.record(&NewDonation {
                amount: 5.0,
                message: None,
                campaign_id: campaign_id.clone(),
                user_id: donor.id.clone(),
            })
            .await
            .unwrap();
        }

        let scoped = repo.list_by_organization(&first.id).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].campaign.organization_name, first.name);
        assert_eq!(scoped[0].donor.email, "donor@example.org");

        assert_eq!(repo.list_by_user(&donor.id).await.unwrap().len(), 2);
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
