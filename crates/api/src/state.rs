use axum::http::HeaderMap;
use charity_auth::{require_role, Authenticator, Claims};
use charity_database::UserRole;
use sqlx::SqlitePool;

use crate::util::require_bearer;
use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    authenticator: Authenticator,
}

impl AppState {
    pub fn new(pool: SqlitePool, authenticator: Authenticator) -> Self {
        Self {
            pool,
            authenticator,
        }
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Verify the bearer token on a request.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, ApiError> {
        let token = require_bearer(headers)?;
        self.authenticator.verify(&token).map_err(ApiError::from)
    }

    /// Verify the bearer token and require one of `allowed` roles.
    pub fn authorize(&self, headers: &HeaderMap, allowed: &[UserRole]) -> Result<Claims, ApiError> {
        let claims = self.authenticate(headers)?;
        require_role(&claims, allowed)?;
        Ok(claims)
    }
}
