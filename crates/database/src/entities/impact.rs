//! Progress and impact arithmetic over campaign totals

use serde::Serialize;
use utoipa::ToSchema;

/// Fraction of the target raised. Zero when the target is not positive.
pub fn funding_ratio(current_amount: f64, target_amount: f64) -> f64 {
    if target_amount > 0.0 && target_amount.is_finite() {
        current_amount / target_amount
    } else {
        0.0
    }
}

/// `round(current / target * 100)`, or `0` for a non-positive target.
pub fn progress_percent(current_amount: f64, target_amount: f64) -> i64 {
    (funding_ratio(current_amount, target_amount) * 100.0).round() as i64
}

/// Impact figures shown on an organization's public profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationImpact {
    /// Sum of per-campaign completion percentages, unrounded.
    pub beneficiaries: f64,
    pub projects: i64,
    /// Mean completion ratio as a whole percentage.
    pub success_rate: i64,
}

impl OrganizationImpact {
    /// Build from `(current_amount, target_amount)` pairs, one per campaign.
    pub fn from_campaigns<I>(campaigns: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let ratios: Vec<f64> = campaigns
            .into_iter()
            .map(|(current, target)| funding_ratio(current, target))
            .collect();

        if ratios.is_empty() {
            return Self::default();
        }

        let total: f64 = ratios.iter().sum();
        Self {
            beneficiaries: total * 100.0,
            projects: ratios.len() as i64,
            success_rate: (total / ratios.len() as f64 * 100.0).round() as i64,
        }
    }
}
