use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use charity_database::{
    ApplicationRecord, DonationRecord, Event, Organization, OrganizationSettings,
    OrganizationSettingsUpdate, OpportunityWithApplications, UserRole, VolunteerApplication,
    VolunteerOpportunity,
};

use crate::{
    routes::models::{
        CreateEventRequest, CreateOpportunityRequest, OrganizationReport, OrganizationRequest,
        UpdateApplicationRequest,
    },
    services::{organization, volunteer},
    ApiError, AppState,
};

const MANAGERS: &[UserRole] = &[UserRole::Organization, UserRole::Admin];

#[utoipa::path(
    get,
    path = "/api/organization",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller's organization", body = Organization),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Caller has no organization", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Organization>, ApiError> {
    let claims = state.authenticate(&headers)?;
    Ok(Json(organization::own(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    post,
    path = "/api/organization",
    tag = "Organization",
    security(("bearerAuth" = [])),
    request_body = OrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = Organization),
        (status = 400, description = "Missing fields or organization already exists", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<OrganizationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let claims = state.authenticate(&headers)?;
    let Json(req) = body?;
    let created = organization::create(state.db_pool(), &claims, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/organization",
    tag = "Organization",
    security(("bearerAuth" = [])),
    request_body = OrganizationRequest,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Caller has no organization", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<OrganizationRequest>, JsonRejection>,
) -> Result<Json<Organization>, ApiError> {
    let claims = state.authenticate(&headers)?;
    let Json(req) = body?;
    Ok(Json(organization::update(state.db_pool(), &claims, req).await?))
}

#[utoipa::path(
    get,
    path = "/api/organization/settings",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Organization settings", body = OrganizationSettings),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrganizationSettings>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    Ok(Json(organization::settings(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    patch,
    path = "/api/organization/settings",
    tag = "Organization",
    security(("bearerAuth" = [])),
    request_body = OrganizationSettingsUpdate,
    responses(
        (status = 200, description = "Settings updated", body = OrganizationSettings),
        (status = 400, description = "Nothing to update or invalid email", body = crate::error::ErrorResponse),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<OrganizationSettingsUpdate>, JsonRejection>,
) -> Result<Json<OrganizationSettings>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    let Json(update) = body?;
    Ok(Json(
        organization::update_settings(state.db_pool(), &claims, update).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/organization/reports",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Organization totals", body = OrganizationReport),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrganizationReport>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    Ok(Json(organization::report(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    get,
    path = "/api/organization/donations",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Donations to the organization", body = [DonationRecord]),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_donations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DonationRecord>>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    Ok(Json(organization::donations(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    get,
    path = "/api/organization/events",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Events, soonest first", body = [Event]),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Event>>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    Ok(Json(organization::events(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    post,
    path = "/api/organization/events",
    tag = "Organization",
    security(("bearerAuth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    let Json(req) = body?;
    let event = organization::create_event(state.db_pool(), &claims, req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/organization/volunteers",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Volunteer applications, newest first", body = [ApplicationRecord]),
        (status = 403, description = "Organization or admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_volunteers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ApplicationRecord>>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    Ok(Json(volunteer::applications(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    patch,
    path = "/api/organization/volunteers",
    tag = "Organization",
    security(("bearerAuth" = [])),
    request_body = UpdateApplicationRequest,
    responses(
        (status = 200, description = "Application status changed", body = VolunteerApplication),
        (status = 400, description = "Missing fields or unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Application not found in this organization", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_volunteer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<UpdateApplicationRequest>, JsonRejection>,
) -> Result<Json<VolunteerApplication>, ApiError> {
    let claims = state.authorize(&headers, MANAGERS)?;
    let Json(req) = body?;
    Ok(Json(
        volunteer::review_application(state.db_pool(), &claims, req).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/organization/volunteer-opportunities",
    tag = "Organization",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Opportunities with their applications", body = [OpportunityWithApplications]),
        (status = 403, description = "Organization role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_opportunities(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<OpportunityWithApplications>>, ApiError> {
    let claims = state.authorize(&headers, &[UserRole::Organization])?;
    Ok(Json(
        volunteer::organization_opportunities(state.db_pool(), &claims).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/organization/volunteer-opportunities",
    tag = "Organization",
    security(("bearerAuth" = [])),
    request_body = CreateOpportunityRequest,
    responses(
        (status = 201, description = "Opportunity created", body = VolunteerOpportunity),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Organization role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_opportunity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateOpportunityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VolunteerOpportunity>), ApiError> {
    let claims = state.authorize(&headers, &[UserRole::Organization])?;
    let Json(req) = body?;
    let opportunity = volunteer::create_opportunity(state.db_pool(), &claims, req).await?;
    Ok((StatusCode::CREATED, Json(opportunity)))
}
