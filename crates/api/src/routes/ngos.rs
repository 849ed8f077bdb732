use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    routes::models::{NgoDetail, NgoSummary},
    services::ngo,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/ngos",
    tag = "NGOs",
    responses((status = 200, description = "Approved organizations with impact", body = [NgoSummary]))
)]
pub async fn list_ngos(State(state): State<AppState>) -> Result<Json<Vec<NgoSummary>>, ApiError> {
    Ok(Json(ngo::list_approved(state.db_pool()).await?))
}

#[utoipa::path(
    get,
    path = "/api/ngos/{id}",
    tag = "NGOs",
    params(("id" = String, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Organization profile with current projects", body = NgoDetail),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_ngo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NgoDetail>, ApiError> {
    Ok(Json(ngo::detail(state.db_pool(), &id).await?))
}
