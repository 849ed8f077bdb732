use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "charity.toml",
    "config/charity.toml",
    "crates/config/charity.toml",
    "../charity.toml",
    "../config/charity.toml",
];

/// Signing secret used when no `auth.jwt_secret` is configured. Only suitable for development.
pub const DEVELOPMENT_JWT_SECRET: &str = "charity-platform-development-jwt-secret";

/// Largest `auth.token_ttl_seconds` that still fits a signed millisecond duration.
pub const MAX_TOKEN_TTL_SECONDS: u64 = (i64::MAX / 1_000) as u64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://charity.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Token signing options.
///
/// ```
/// use charity_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.token_ttl_seconds, 86_400);
/// assert!(auth.uses_development_secret());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    fn default_secret() -> String {
        DEVELOPMENT_JWT_SECRET.to_string()
    }

    const fn default_token_ttl() -> u64 {
        86_400
    }

    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_secret(),
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use charity_config::load;
///
/// std::env::remove_var("CHARITY_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let token_ttl = i64::try_from(defaults.auth.token_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.jwt_secret", defaults.auth.jwt_secret.clone())?
        .set_default("auth.token_ttl_seconds", token_ttl)?;

    let environment_overrides = config::Environment::with_prefix("CHARITY").separator("__");

    if let Ok(path) = std::env::var("CHARITY_CONFIG") {
        debug!(path, "loading configuration via CHARITY_CONFIG");
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
    } else {
        let fallback = std::env::current_dir().ok().and_then(|cwd| {
            DEFAULT_CONFIG_FILES
                .iter()
                .map(|candidate| cwd.join(candidate))
                .find(|path| path.exists())
        });

        match fallback {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                debug!("no configuration file found, relying on defaults and environment overrides")
            }
        }
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    anyhow::ensure!(
        config.auth.token_ttl_seconds <= MAX_TOKEN_TTL_SECONDS,
        "auth.token_ttl_seconds must not exceed {MAX_TOKEN_TTL_SECONDS}"
    );

    debug!(
        http = ?config.http,
        database = ?config.database,
        token_ttl_seconds = config.auth.token_ttl_seconds,
        "loaded backend configuration"
    );
    Ok(config)
}
