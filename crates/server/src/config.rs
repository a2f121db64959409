use std::{env, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_addr: String,
    /// Directory stored resource files are resolved against
    pub media_root: PathBuf,
    /// JWT role granting administrator access
    pub admin_role: String,
}

impl AppConfig {
    const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3000";
    const DEFAULT_MEDIA_ROOT: &'static str = "./media";
    const DEFAULT_ADMIN_ROLE: &'static str = "admin";

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_addr: optional("BIND_ADDR", Self::DEFAULT_BIND_ADDR),
            media_root: optional("MEDIA_ROOT", Self::DEFAULT_MEDIA_ROOT).into(),
            admin_role: optional("ADMIN_ROLE", Self::DEFAULT_ADMIN_ROLE),
        })
    }
}
