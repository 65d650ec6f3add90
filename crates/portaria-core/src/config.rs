//! Console configuration.
//!
//! Values come from a TOML file (see [`PortariaConfig::resolve_config_path`])
//! and are then overridden by environment variables, so deployments can keep
//! secrets out of the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::clock::SystemClock;
use crate::{Error, Result};

/// Project name, used for the config directory.
pub const PROJECT_NAME: &str = "portaria";

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PORTARIA_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortariaConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Hosted backend connection.
    pub backend: BackendConfig,
    /// Request authentication.
    pub auth: AuthSettings,
    /// Facility clock.
    pub clock: ClockConfig,
    /// Bootstrap account for the in-memory backend.
    pub seed: SeedConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Which backend implementation to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted Supabase project.
    Supabase,
    /// In-process tables; data is lost on restart.
    #[default]
    Memory,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "memory" => Ok(BackendKind::Memory),
            other => Err(Error::config(format!(
                "unknown backend '{other}' (expected 'supabase' or 'memory')"
            ))),
        }
    }
}

/// Hosted backend connection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend implementation.
    pub kind: BackendKind,
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: Option<String>,
    /// Public API key, sent as `apikey` on sign-in.
    pub anon_key: Option<String>,
    /// Service-role key used for table and admin calls.
    pub service_role_key: Option<String>,
}

/// Request authentication settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// When false every request is treated as coming from an administrator.
    pub enabled: bool,
    /// Expected `aud` claim.
    pub audience: String,
    /// HS256 secret used to sign access tokens.
    pub jwt_secret: Option<String>,
    /// Domain of the synthetic login e-mails (`username@domain`).
    pub login_domain: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            audience: "authenticated".to_string(),
            jwt_secret: None,
            login_domain: "fake.local".to_string(),
        }
    }
}

/// Facility clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// IANA timezone in which "today" is evaluated.
    pub timezone: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

/// Bootstrap administrator for the in-memory backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Username of the seeded administrator.
    pub admin_username: Option<String>,
    /// Password of the seeded administrator.
    pub admin_password: Option<String>,
}

impl PortariaConfig {
    /// Default config file location (`<config dir>/portaria/config.toml`).
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Resolves the config file: explicit path, then `PORTARIA_CONFIG`, then the default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit
            .map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
            .or_else(Self::default_config_path)
    }

    /// Loads the config file (if present), applies the process environment,
    /// and validates the result.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                if explicit.is_some() {
                    return Err(Error::config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                log::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file without applying the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Overrides fields from environment variables, looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("PORTARIA_BIND") {
            self.server.bind = bind;
        }
        if let Some(kind) = lookup("PORTARIA_BACKEND") {
            self.backend.kind = kind.parse()?;
        }
        if let Some(url) = lookup("SUPABASE_URL") {
            self.backend.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            self.backend.anon_key = Some(key);
        }
        if let Some(key) = lookup("SUPABASE_SERVICE_ROLE_KEY") {
            self.backend.service_role_key = Some(key);
        }
        if let Some(secret) = lookup("SUPABASE_JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(enabled) = lookup("PORTARIA_AUTH_ENABLED") {
            self.auth.enabled = parse_bool("PORTARIA_AUTH_ENABLED", &enabled)?;
        }
        if let Some(domain) = lookup("PORTARIA_LOGIN_DOMAIN") {
            self.auth.login_domain = domain;
        }
        if let Some(tz) = lookup("PORTARIA_TIMEZONE") {
            self.clock.timezone = tz;
        }
        if let Some(username) = lookup("PORTARIA_ADMIN_USERNAME") {
            self.seed.admin_username = Some(username);
        }
        if let Some(password) = lookup("PORTARIA_ADMIN_PASSWORD") {
            self.seed.admin_password = Some(password);
        }
        Ok(())
    }

    /// Checks cross-field requirements.
    pub fn validate(&self) -> Result<()> {
        SystemClock::from_name(&self.clock.timezone)?;

        if self.auth.login_domain.trim().is_empty() {
            return Err(Error::config("auth.login_domain must not be empty"));
        }

        if self.backend.kind == BackendKind::Supabase {
            let missing: Vec<&str> = [
                ("backend.url", &self.backend.url),
                ("backend.anon_key", &self.backend.anon_key),
                ("backend.service_role_key", &self.backend.service_role_key),
            ]
            .into_iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect();
            if !missing.is_empty() {
                return Err(Error::config(format!(
                    "supabase backend requires {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// The environment variables that reproduce this configuration.
    pub fn to_env_vars(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            ("PORTARIA_BIND".to_string(), self.server.bind.clone()),
            (
                "PORTARIA_BACKEND".to_string(),
                match self.backend.kind {
                    BackendKind::Supabase => "supabase",
                    BackendKind::Memory => "memory",
                }
                .to_string(),
            ),
            (
                "PORTARIA_AUTH_ENABLED".to_string(),
                self.auth.enabled.to_string(),
            ),
            (
                "PORTARIA_LOGIN_DOMAIN".to_string(),
                self.auth.login_domain.clone(),
            ),
            ("PORTARIA_TIMEZONE".to_string(), self.clock.timezone.clone()),
        ];

        let optional = [
            ("SUPABASE_URL", &self.backend.url),
            ("SUPABASE_ANON_KEY", &self.backend.anon_key),
            ("SUPABASE_SERVICE_ROLE_KEY", &self.backend.service_role_key),
            ("SUPABASE_JWT_SECRET", &self.auth.jwt_secret),
            ("PORTARIA_ADMIN_USERNAME", &self.seed.admin_username),
            ("PORTARIA_ADMIN_PASSWORD", &self.seed.admin_password),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                vars.push((key.to_string(), value.clone()));
            }
        }

        vars
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}
