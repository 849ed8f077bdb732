use charity_auth::AuthError;
use charity_database::DatabaseError;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    BadRequest(String),
    Database(DatabaseError),
    Auth(AuthError),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<ServiceError> for crate::ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => crate::ApiError::not_found(msg),
            ServiceError::BadRequest(msg) => crate::ApiError::bad_request(msg),
            ServiceError::Database(db_err) => crate::ApiError::from(db_err),
            ServiceError::Auth(auth_err) => crate::ApiError::from(auth_err),
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => Self::NotFound(err.to_string()),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}
