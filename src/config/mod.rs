use serde::Deserialize;
use std::env;
use std::str::FromStr;

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: Option<AuthConfig>,
    pub features: FeatureFlags,
}

// Which backend this process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Booking,
    Trivia,
    Coffee,
}

impl FromStr for Service {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "booking" | "fyyur" => Ok(Service::Booking),
            "trivia" => Ok(Service::Trivia),
            "coffee" | "coffee_shop" | "coffee-shop" => Ok(Service::Coffee),
            _ => Err(ConfigError::Invalid {
                key: "SERVICE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub service: Service,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Identity provider settings for bearer-token checks
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub issuer: String,
    pub jwks_url: String,
    pub jwks_cache_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_auth: bool,
    pub enable_db_reset: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let service: Service = parse_or(&var, "SERVICE", Service::Trivia)?;
        let features = FeatureFlags {
            enable_auth: parse_or(&var, "ENABLE_AUTH", true)?,
            enable_db_reset: parse_or(&var, "ENABLE_DB_RESET", false)?,
        };

        let auth = match var("AUTH0_DOMAIN") {
            Some(domain) => {
                let domain = domain
                    .trim()
                    .trim_start_matches("https://")
                    .trim_end_matches('/')
                    .to_string();
                let audience = var("API_AUDIENCE").ok_or(ConfigError::Missing("API_AUDIENCE"))?;
                Some(AuthConfig {
                    issuer: format!("https://{}/", domain),
                    jwks_url: var("AUTH_JWKS_URL")
                        .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", domain)),
                    jwks_cache_seconds: parse_or(&var, "JWKS_CACHE_SECONDS", 3600)?,
                    domain,
                    audience,
                })
            }
            None => None,
        };

        if service == Service::Coffee && features.enable_auth && auth.is_none() {
            return Err(ConfigError::Missing("AUTH0_DOMAIN"));
        }

        Ok(Config {
            app: AppConfig {
                service,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&var, "PORT", 5000)?,
                environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
                rust_log: var("RUST_LOG")
                    .unwrap_or_else(|| "campus_services=debug,tower_http=debug".to_string()),
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                pool_size: parse_or(&var, "DB_POOL_SIZE", 10)?,
            },
            auth,
            features,
        })
    }
}

fn parse_or<T, V>(var: &V, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    V: Fn(&'static str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
