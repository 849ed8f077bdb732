use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use charity_auth::validation::present;
use charity_auth::{AuthError, NgoRegistration, RegisterAccount, Registration, Session};

use crate::{
    routes::models::{
        LoginRequest, OrganizationMessage, VerifyTokenRequest, VerifyTokenResponse,
    },
    ApiError, AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterAccount,
    responses(
        (status = 201, description = "Account created", body = Registration),
        (status = 400, description = "Missing, invalid, or duplicate fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin accounts cannot self-register", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterAccount>, JsonRejection>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let Json(account) = body?;
    let registration = state.authenticator().register(account).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = Session),
        (status = 400, description = "Email or password missing", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(req) = body?;
    let session = state
        .authenticator()
        .login(req.email.as_deref(), req.password.as_deref())
        .await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify",
    tag = "Auth",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = VerifyTokenResponse),
        (status = 400, description = "Token missing", body = crate::error::ErrorResponse),
        (status = 401, description = "Token invalid or expired", body = crate::error::ErrorResponse)
    )
)]
pub async fn verify_token(
    State(state): State<AppState>,
    body: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let Json(req) = body?;
    let token = present(&req.token)
        .ok_or_else(|| ApiError::bad_request(AuthError::MissingToken.to_string()))?;

    let claims = state.authenticator().verify(token)?;
    Ok(Json(VerifyTokenResponse {
        valid: true,
        role: claims.role,
    }))
}

#[utoipa::path(
    post,
    path = "/api/ngo/register",
    tag = "Auth",
    request_body = NgoRegistration,
    responses(
        (status = 200, description = "NGO registered and awaiting review", body = OrganizationMessage),
        (status = 400, description = "Missing fields or email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_ngo(
    State(state): State<AppState>,
    body: Result<Json<NgoRegistration>, JsonRejection>,
) -> Result<Json<OrganizationMessage>, ApiError> {
    let Json(ngo) = body?;
    let registration = state.authenticator().register_ngo(ngo).await?;
    let organization = registration
        .organization
        .ok_or_else(|| ApiError::internal_server_error("Organization was not created"))?;

    Ok(Json(OrganizationMessage {
        message: "NGO registered successfully".to_string(),
        organization,
    }))
}
