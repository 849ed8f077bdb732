use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use charity_database::OpportunityListing;

use crate::{
    routes::models::{ApplicationSubmitted, ApplyRequest},
    services::volunteer,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/volunteer/opportunities",
    tag = "Volunteering",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Every opportunity with its organization", body = [OpportunityListing]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_opportunities(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<OpportunityListing>>, ApiError> {
    state.authenticate(&headers)?;
    Ok(Json(volunteer::list_all(state.db_pool()).await?))
}

#[utoipa::path(
    get,
    path = "/api/volunteer/opportunities/public",
    tag = "Volunteering",
    responses(
        (status = 200, description = "Open opportunities of approved organizations", body = [OpportunityListing])
    )
)]
pub async fn list_public_opportunities(
    State(state): State<AppState>,
) -> Result<Json<Vec<OpportunityListing>>, ApiError> {
    Ok(Json(volunteer::list_public(state.db_pool()).await?))
}

#[utoipa::path(
    post,
    path = "/api/volunteer/applications",
    tag = "Volunteering",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationSubmitted),
        (status = 400, description = "Missing fields, closed opportunity, or organization mismatch", body = crate::error::ErrorResponse),
        (status = 404, description = "Opportunity not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn apply(
    State(state): State<AppState>,
    body: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApplicationSubmitted>), ApiError> {
    let Json(req) = body?;
    let application = volunteer::apply(state.db_pool(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationSubmitted {
            message: "Application submitted successfully".to_string(),
            application,
        }),
    ))
}
