use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use charity_database::{Donation, DonationRecord, UserRole};

use crate::{routes::models::CreateDonationRequest, services::donation, ApiError, AppState};

#[utoipa::path(
    post,
    path = "/api/donations",
    tag = "Donations",
    security(("bearerAuth" = [])),
    request_body = CreateDonationRequest,
    responses(
        (status = 201, description = "Donation recorded", body = Donation),
        (status = 400, description = "Invalid amount, missing campaign, or campaign closed", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Role may not donate", body = crate::error::ErrorResponse),
        (status = 404, description = "Campaign not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_donation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    let claims = state.authorize(
        &headers,
        &[UserRole::Donor, UserRole::Admin, UserRole::Organization],
    )?;
    let Json(req) = body?;
    let donation = donation::donate(state.db_pool(), &claims, req).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

#[utoipa::path(
    get,
    path = "/api/donations",
    tag = "Donations",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Donations visible to the caller", body = [DonationRecord]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin or organization role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_donations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DonationRecord>>, ApiError> {
    let claims = state.authorize(&headers, &[UserRole::Admin, UserRole::Organization])?;
    Ok(Json(donation::list_visible(state.db_pool(), &claims).await?))
}

#[utoipa::path(
    get,
    path = "/api/donations/my-donations",
    tag = "Donations",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller's own donations", body = [DonationRecord]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_donations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DonationRecord>>, ApiError> {
    let claims = state.authenticate(&headers)?;
    Ok(Json(donation::list_own(state.db_pool(), &claims).await?))
}
