use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use charity_auth::validation::present;
use charity_database::UserRole;

use crate::{
    routes::models::{
        CampaignView, CreateCampaignRequest, IdRequest, MessageResponse, UpdateCampaignRequest,
    },
    services::campaign,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Campaigns of the caller's organization", body = [CampaignView]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Organization role required", body = crate::error::ErrorResponse),
        (status = 404, description = "Caller has no organization", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_campaigns(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CampaignView>>, ApiError> {
    let claims = state.authorize(&headers, &[UserRole::Organization])?;
    let campaigns = campaign::list_for_organization(state.db_pool(), &claims).await?;
    Ok(Json(campaigns))
}

#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "Campaigns",
    security(("bearerAuth" = [])),
    request_body = CreateCampaignRequest,
    responses(
        (status = 201, description = "Campaign created", body = CampaignView),
        (status = 400, description = "Invalid campaign payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Organization role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CampaignView>), ApiError> {
    let claims = state.authorize(&headers, &[UserRole::Organization])?;
    let Json(req) = body?;
    let created = campaign::create(state.db_pool(), &claims, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/campaigns",
    tag = "Campaigns",
    security(("bearerAuth" = [])),
    request_body = UpdateCampaignRequest,
    responses(
        (status = 200, description = "Campaign updated", body = CampaignView),
        (status = 400, description = "Missing id or invalid fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the campaign owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Campaign not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_campaign_by_body(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<UpdateCampaignRequest>, JsonRejection>,
) -> Result<Json<CampaignView>, ApiError> {
    let claims = state.authenticate(&headers)?;
    let Json(req) = body?;
    let id = present(&req.id)
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Campaign ID is required"))?;

    let updated = campaign::update(state.db_pool(), &claims, &id, req).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/campaigns",
    tag = "Campaigns",
    security(("bearerAuth" = [])),
    request_body = IdRequest,
    responses(
        (status = 200, description = "Campaign deleted", body = MessageResponse),
        (status = 400, description = "Missing id", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the campaign owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Campaign not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<IdRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let claims = state.authenticate(&headers)?;
    let Json(req) = body?;
    let id = present(&req.id).ok_or_else(|| ApiError::bad_request("Campaign ID is required"))?;

    campaign::delete(state.db_pool(), &claims, id).await?;
    Ok(Json(MessageResponse {
        message: "Campaign deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/campaigns/public",
    tag = "Campaigns",
    responses(
        (status = 200, description = "Active campaigns of approved organizations", body = [CampaignView])
    )
)]
pub async fn list_public_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<CampaignView>>, ApiError> {
    Ok(Json(campaign::list_public(state.db_pool()).await?))
}

#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Campaign identifier")),
    responses(
        (status = 200, description = "Campaign with progress", body = CampaignView),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Campaign not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CampaignView>, ApiError> {
    state.authenticate(&headers)?;
    Ok(Json(campaign::get(state.db_pool(), &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Campaign identifier")),
    request_body = UpdateCampaignRequest,
    responses(
        (status = 200, description = "Campaign updated", body = CampaignView),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the campaign owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Campaign not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<UpdateCampaignRequest>, JsonRejection>,
) -> Result<Json<CampaignView>, ApiError> {
    let claims = state.authenticate(&headers)?;
    let Json(req) = body?;
    Ok(Json(campaign::update(state.db_pool(), &claims, &id, req).await?))
}
