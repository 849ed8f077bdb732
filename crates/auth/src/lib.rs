//! Accounts, password hashing and access tokens.
//!
//! [`Authenticator`] owns the registration and login flows; [`JwtManager`]
//! issues and verifies the bearer tokens the HTTP layer checks with the
//! [`guard`] helpers.

use charity_config::AuthConfig;
use charity_database::{
    DatabaseError, NewOrganization, NewUser, Organization, OrganizationRepository, User,
    UserRepository, UserRole,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

pub mod guard;
pub mod jwt;
pub mod password;
pub mod validation;

pub use guard::{require_owner_or_admin, require_role};
pub use jwt::{Claims, JwtManager};

use validation::{present, validate_email, validate_password};

const DEFAULT_ORGANIZATION_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists")]
    UserExists,
    #[error("Administrator accounts cannot be self-registered")]
    AdminSelfRegistration,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Forbidden")]
    Forbidden,
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("token encoding failed: {0}")]
    Token(jsonwebtoken::errors::Error),
    #[error("token lifetime of {0} seconds is out of range")]
    TokenLifetime(u64),
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database(error.into())
    }
}

/// Self-service sign-up body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccount {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    /// One of `DONOR`, `ORGANIZATION` or `VOLUNTEER`.
    pub role: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Sign-up body for the dedicated NGO registration form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoRegistration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user: User,
    pub organization: Option<Organization>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct Authenticator {
    pool: SqlitePool,
    users: UserRepository,
    organizations: OrganizationRepository,
    jwt: JwtManager,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self {
            users: UserRepository::new(pool.clone()),
            organizations: OrganizationRepository::new(pool.clone()),
            jwt: JwtManager::new(&config.jwt_secret, config.token_ttl_seconds)?,
            pool,
        })
    }

    /// Create an account and, for organizations, a pending organization record.
    pub async fn register(&self, account: RegisterAccount) -> Result<Registration, AuthError> {
        let (Some(email), Some(password), Some(name), Some(role)) = (
            present(&account.email),
            account.password.as_deref().filter(|p| !p.is_empty()),
            present(&account.name),
            present(&account.role),
        ) else {
            return Err(AuthError::Validation("All fields are required".into()));
        };

        validate_email(email)?;
        validate_password(password)?;

        let role: UserRole = role
            .parse()
            .map_err(|_| AuthError::Validation("Invalid role".into()))?;
        if role == UserRole::Admin {
            warn!(email, "rejected self-registration as administrator");
            return Err(AuthError::AdminSelfRegistration);
        }

        let organization = (role == UserRole::Organization).then(|| NewOrganization {
            name: name.to_string(),
            description: present(&account.description)
                .unwrap_or(DEFAULT_ORGANIZATION_DESCRIPTION)
                .to_string(),
            website: present(&account.website).map(str::to_owned),
            ..Default::default()
        });

        self.create_account(email, name, password, role, organization)
            .await
    }

    /// Register an NGO: an `ORGANIZATION` user plus its pending organization.
    pub async fn register_ngo(&self, ngo: NgoRegistration) -> Result<Registration, AuthError> {
        let (Some(name), Some(email), Some(password), Some(description)) = (
            present(&ngo.name),
            present(&ngo.email),
            ngo.password.as_deref().filter(|p| !p.is_empty()),
            present(&ngo.description),
        ) else {
            return Err(AuthError::Validation("Missing required fields".into()));
        };

        validate_email(email)?;
        validate_password(password)?;

        let organization = NewOrganization {
            name: name.to_string(),
            description: description.to_string(),
            website: present(&ngo.website).map(str::to_owned),
            logo: present(&ngo.logo).map(str::to_owned),
            email: Some(email.to_lowercase()),
            phone: present(&ngo.phone).map(str::to_owned),
            address: present(&ngo.address).map(str::to_owned),
            ..Default::default()
        };

        self.create_account(email, name, password, UserRole::Organization, Some(organization))
            .await
    }

    /// Provision an administrator. Only reachable from the command line.
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let (email, name) = (email.trim(), name.trim());
        if email.is_empty() || name.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("All fields are required".into()));
        }
        validate_email(email)?;
        validate_password(password)?;

        let registration = self
            .create_account(email, name, password, UserRole::Admin, None)
            .await?;
        Ok(registration.user)
    }

    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Session, AuthError> {
        let (Some(email), Some(password)) = (
            email.map(str::trim).filter(|e| !e.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::Validation("Email and password are required".into()));
        };

        let Some(user) = self.users.find_by_email(email).await? else {
            warn!(email, "login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let organization_id = match user.role {
            UserRole::Organization => self
                .organizations
                .find_by_user_id(&user.id)
                .await?
                .map(|organization| organization.id),
            _ => None,
        };

        let token = self.jwt.issue(&user, organization_id.as_deref())?;
        info!(user_id = %user.id, role = %user.role, "user logged in");
        Ok(Session { user, token })
    }

    /// Verify a bearer token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.jwt.verify(token.trim())
    }

    async fn create_account(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: UserRole,
        organization: Option<NewOrganization>,
    ) -> Result<Registration, AuthError> {
        if self.users.email_exists(email).await? {
            return Err(AuthError::UserExists);
        }

        let password_hash = password::hash_password(password)?;
        let mut tx = self.pool.begin().await?;

        let user = UserRepository::insert(
            &mut tx,
            &NewUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                role,
            },
        )
        .await
        .map_err(duplicate_as_user_exists)?;

        let organization = match organization {
            Some(new_org) => Some(
                OrganizationRepository::insert(
                    &mut tx,
                    &NewOrganization {
                        user_id: user.id.clone(),
                        ..new_org
                    },
                )
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;

        let token = self
            .jwt
            .issue(&user, organization.as_ref().map(|org| org.id.as_str()))?;

        info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(Registration {
            user,
            organization,
            token,
        })
    }
}

fn duplicate_as_user_exists(error: DatabaseError) -> AuthError {
    match error {
        DatabaseError::Duplicate(_) => AuthError::UserExists,
        other => AuthError::Database(other),
    }
}
