use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::verify_token,
        crate::routes::auth::register_ngo,
        crate::routes::campaigns::list_campaigns,
        crate::routes::campaigns::create_campaign,
        crate::routes::campaigns::update_campaign_by_body,
        crate::routes::campaigns::delete_campaign,
        crate::routes::campaigns::list_public_campaigns,
        crate::routes::campaigns::get_campaign,
        crate::routes::campaigns::update_campaign,
        crate::routes::donations::create_donation,
        crate::routes::donations::list_donations,
        crate::routes::donations::my_donations,
        crate::routes::admin::pending_ngos,
        crate::routes::admin::approve_ngo,
        crate::routes::admin::reject_ngo,
        crate::routes::admin::analytics,
        crate::routes::ngos::list_ngos,
        crate::routes::ngos::get_ngo,
        crate::routes::organization::get_organization,
        crate::routes::organization::create_organization,
        crate::routes::organization::update_organization,
        crate::routes::organization::get_settings,
        crate::routes::organization::update_settings,
        crate::routes::organization::get_report,
        crate::routes::organization::list_donations,
        crate::routes::organization::list_events,
        crate::routes::organization::create_event,
        crate::routes::organization::list_volunteers,
        crate::routes::organization::update_volunteer,
        crate::routes::organization::list_opportunities,
        crate::routes::organization::create_opportunity,
        crate::routes::volunteer::list_opportunities,
        crate::routes::volunteer::list_public_opportunities,
        crate::routes::volunteer::apply
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::models::CampaignView,
            crate::routes::models::CreateCampaignRequest,
            crate::routes::models::UpdateCampaignRequest,
            crate::routes::models::IdRequest,
            crate::routes::models::MessageResponse,
            crate::routes::models::CreateDonationRequest,
            crate::routes::models::LoginRequest,
            crate::routes::models::VerifyTokenRequest,
            crate::routes::models::VerifyTokenResponse,
            crate::routes::models::OrganizationMessage,
            crate::routes::models::NgoSummary,
            crate::routes::models::NgoDetail,
            crate::routes::models::ProjectProgress,
            crate::routes::models::OrganizationCounts,
            crate::routes::models::PlatformAnalytics,
            crate::routes::models::OrganizationRequest,
            crate::routes::models::OrganizationReport,
            crate::routes::models::CreateEventRequest,
            crate::routes::models::UpdateApplicationRequest,
            crate::routes::models::CreateOpportunityRequest,
            crate::routes::models::ApplyRequest,
            crate::routes::models::ApplicationSubmitted,
            charity_auth::RegisterAccount,
            charity_auth::NgoRegistration,
            charity_auth::Registration,
            charity_auth::Session,
            charity_database::User,
            charity_database::UserRole,
            charity_database::Organization,
            charity_database::OrganizationStatus,
            charity_database::OrganizationSettings,
            charity_database::OrganizationSettingsUpdate,
            charity_database::OrganizationImpact,
            charity_database::Campaign,
            charity_database::CampaignStatus,
            charity_database::Donation,
            charity_database::DonationRecord,
            charity_database::DonorSummary,
            charity_database::CampaignSummary,
            charity_database::DonationTotals,
            charity_database::Event,
            charity_database::VolunteerOpportunity,
            charity_database::OpportunityStatus,
            charity_database::OpportunityListing,
            charity_database::OrganizationBrief,
            charity_database::OpportunityWithApplications,
            charity_database::VolunteerApplication,
            charity_database::ApplicationStatus,
            charity_database::ApplicationRecord
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, login and token checks"),
        (name = "Campaigns", description = "Fundraising campaigns"),
        (name = "Donations", description = "Donating and donation history"),
        (name = "Admin", description = "NGO review and platform analytics"),
        (name = "NGOs", description = "Public organization directory"),
        (name = "Organization", description = "Managing the caller's organization"),
        (name = "Volunteering", description = "Volunteer opportunities and applications")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("JWT".to_string());
        }

        schemes.insert("bearerAuth".to_string(), scheme);
    }
}
