use charity_database::{
    Campaign, DonationTotals, Organization, OrganizationImpact, OrganizationStatus,
    VolunteerApplication,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A campaign together with its rounded funding percentage.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub progress: i64,
}

impl From<Campaign> for CampaignView {
    fn from(campaign: Campaign) -> Self {
        let progress = campaign.progress();
        Self { campaign, progress }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    /// Only read by `PUT /api/campaigns`; the path form takes the id from the URL.
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IdRequest {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// A donation amount sent either as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Amount>,
    pub message: Option<String>,
    pub campaign_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub role: charity_database::UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrganizationMessage {
    pub message: String,
    pub organization: Organization,
}

/// Public profile of an organization.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Login email of the owning account.
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub status: OrganizationStatus,
    pub created_at: String,
    pub impact: OrganizationImpact,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub progress: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoDetail {
    #[serde(flatten)]
    pub summary: NgoSummary,
    pub current_projects: Vec<ProjectProgress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrganizationCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub donations: DonationTotals,
    pub total_campaigns: i64,
    pub organizations: OrganizationCounts,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationReport {
    pub total_donations: f64,
    pub donation_count: i64,
    pub total_campaigns: i64,
    pub total_applications: i64,
    pub total_events: i64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub application_id: Option<String>,
    pub status: Option<String>,
}

/// Skills may arrive as a list or as one comma separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    Many(Vec<String>),
    One(String),
}

impl SkillList {
    pub fn into_vec(self) -> Vec<String> {
        let raw = match self {
            Self::Many(skills) => skills,
            Self::One(skill) => skill.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub required_skills: Option<SkillList>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub opportunity_id: Option<String>,
    pub organization_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationSubmitted {
    pub message: String,
    pub application: VolunteerApplication,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_list_accepts_single_string() {
        let request: CreateOpportunityRequest =
            serde_json::from_str(r#"{"requiredSkills":"first aid, driving"}"#).unwrap();
        let skills = request.required_skills.unwrap().into_vec();
        assert_eq!(skills, vec!["first aid".to_string(), "driving".to_string()]);
    }

    #[test]
    fn amount_accepts_numeric_strings() {
        let request: CreateDonationRequest =
            serde_json::from_str(r#"{"amount":"25.5","campaignId":"c1"}"#).unwrap();
        assert_eq!(request.amount.and_then(|a| a.value()), Some(25.5));

        let request: CreateDonationRequest = serde_json::from_str(r#"{"amount":"lots"}"#).unwrap();
        assert_eq!(request.amount.and_then(|a| a.value()), None);
    }
}
