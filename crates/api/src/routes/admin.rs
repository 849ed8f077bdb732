use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use charity_auth::validation::present;
use charity_database::{OrganizationStatus, UserRole};

use crate::{
    routes::models::{IdRequest, NgoSummary, OrganizationMessage, PlatformAnalytics},
    services::admin,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/ngos",
    tag = "Admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Organizations awaiting review", body = [NgoSummary]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn pending_ngos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<NgoSummary>>, ApiError> {
    state.authorize(&headers, &[UserRole::Admin])?;
    Ok(Json(admin::pending_ngos(state.db_pool()).await?))
}

async fn review(
    state: AppState,
    headers: HeaderMap,
    body: Result<Json<IdRequest>, JsonRejection>,
    status: OrganizationStatus,
    message: &str,
) -> Result<Json<OrganizationMessage>, ApiError> {
    state.authorize(&headers, &[UserRole::Admin])?;
    let Json(req) = body?;
    let organization = admin::review_ngo(state.db_pool(), present(&req.id), status).await?;
    Ok(Json(OrganizationMessage {
        message: message.to_string(),
        organization,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/ngos/approve",
    tag = "Admin",
    security(("bearerAuth" = [])),
    request_body = IdRequest,
    responses(
        (status = 200, description = "Organization approved", body = OrganizationMessage),
        (status = 400, description = "Missing id", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_ngo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<IdRequest>, JsonRejection>,
) -> Result<Json<OrganizationMessage>, ApiError> {
    review(state, headers, body, OrganizationStatus::Approved, "NGO approved successfully").await
}

#[utoipa::path(
    post,
    path = "/api/admin/ngos/reject",
    tag = "Admin",
    security(("bearerAuth" = [])),
    request_body = IdRequest,
    responses(
        (status = 200, description = "Organization rejected", body = OrganizationMessage),
        (status = 400, description = "Missing id", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_ngo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<IdRequest>, JsonRejection>,
) -> Result<Json<OrganizationMessage>, ApiError> {
    review(state, headers, body, OrganizationStatus::Rejected, "NGO rejected").await
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    tag = "Admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Platform totals", body = PlatformAnalytics),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PlatformAnalytics>, ApiError> {
    state.authorize(&headers, &[UserRole::Admin])?;
    Ok(Json(admin::analytics(state.db_pool()).await?))
}
