//! Volunteer opportunities and the applications submitted against them

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

use super::decode_text;

text_enum! {
    OpportunityStatus ("opportunity status") {
        Open => "OPEN",
        Closed => "CLOSED",
    }
}

text_enum! {
    ApplicationStatus ("application status") {
        Pending => "PENDING",
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerOpportunity {
    pub id: String,
    pub organization_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub required_skills: Vec<String>,
    pub status: OpportunityStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewOpportunity {
    pub organization_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationBrief {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
}

/// An opportunity with the organization that posted it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityListing {
    #[serde(flatten)]
    pub opportunity: VolunteerOpportunity,
    pub organization: OrganizationBrief,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerApplication {
    pub id: String,
    pub opportunity_id: String,
    pub organization_id: String,
    pub name: String,
    pub email: String,
    pub status: ApplicationStatus,
    pub applied_at: String,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub opportunity_id: String,
    pub organization_id: String,
    pub name: String,
    pub email: String,
}

/// An opportunity together with every application it received.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityWithApplications {
    #[serde(flatten)]
    pub opportunity: VolunteerOpportunity,
    pub applications: Vec<VolunteerApplication>,
}

/// An application with the title of the opportunity it targets.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(flatten)]
    pub application: VolunteerApplication,
    pub opportunity_title: String,
}

impl FromRow<'_, SqliteRow> for VolunteerOpportunity {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let skills: String = row.try_get("required_skills")?;
        let required_skills =
            serde_json::from_str(&skills).map_err(|error| sqlx::Error::ColumnDecode {
                index: "required_skills".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            organization_id: row.try_get("organization_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            location: row.try_get("location")?,
            required_skills,
            status: decode_text(row, "status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for OpportunityListing {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            opportunity: VolunteerOpportunity::from_row(row)?,
            organization: OrganizationBrief {
                id: row.try_get("organization_id")?,
                name: row.try_get("organization_name")?,
                logo: row.try_get("organization_logo")?,
            },
        })
    }
}

impl FromRow<'_, SqliteRow> for VolunteerApplication {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            opportunity_id: row.try_get("opportunity_id")?,
            organization_id: row.try_get("organization_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            status: decode_text(row, "status")?,
            applied_at: row.try_get("applied_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for ApplicationRecord {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            application: VolunteerApplication::from_row(row)?,
            opportunity_title: row.try_get("opportunity_title")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_flattens_opportunity_fields() {
        let listing = OpportunityListing {
            opportunity: VolunteerOpportunity {
                id: "op1".into(),
                organization_id: "org1".into(),
                title: "Food drive".into(),
                description: "Sort donations".into(),
                date: "2024-06-01T09:00:00+00:00".into(),
                location: "Warehouse".into(),
                required_skills: vec!["lifting".into()],
                status: OpportunityStatus::Open,
                created_at: "2024-05-01T00:00:00+00:00".into(),
                updated_at: "2024-05-01T00:00:00+00:00".into(),
            },
            organization: OrganizationBrief {
                id: "org1".into(),
                name: "Food Bank".into(),
                logo: None,
            },
        };

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["title"], "Food drive");
        assert_eq!(json["requiredSkills"][0], "lifting");
        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["organization"]["name"], "Food Bank");
    }
}
