use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::config::env_provider::EnvironmentProvider;

/// Runtime configuration, constructed once at process start and passed by
/// dependency injection into the services that need it.
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret_key: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub bcrypt_cost: u32,
    pub bind_address: String,
}

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {setting}: {message}")]
    Invalid {
        setting: &'static str,
        message: String,
    },
}

impl Settings {
    /// Load settings from the given environment provider
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when a required variable is absent or a
    /// value fails validation.
    pub fn from_provider(env: &impl EnvironmentProvider) -> Result<Self, SettingsError> {
        let database_url = env
            .var("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://medboard.db?mode=rwc".to_string());

        let jwt_secret_key = env
            .var("JWT_SECRET_KEY")
            .ok_or(SettingsError::Missing("JWT_SECRET_KEY"))?;
        if jwt_secret_key.len() < 32 {
            return Err(SettingsError::Invalid {
                setting: "JWT_SECRET_KEY",
                message: "must be at least 32 characters".to_string(),
            });
        }

        let jwt_algorithm = match env.var("JWT_ALGORITHM") {
            Some(raw) => Algorithm::from_str(&raw).map_err(|_| SettingsError::Invalid {
                setting: "JWT_ALGORITHM",
                message: format!("unsupported algorithm: {raw}"),
            })?,
            None => Algorithm::HS256,
        };

        let access_token_expire_minutes = Self::parse_ranged(
            env,
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            15,
            1..=1440,
        )?;

        let refresh_token_expire_days =
            Self::parse_ranged(env, "REFRESH_TOKEN_EXPIRE_DAYS", 7, 1..=365)?;

        let bcrypt_cost = Self::parse_ranged(env, "BCRYPT_COST", 12, 4..=31)? as u32;

        let bind_address = env
            .var("BIND_ADDRESS")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            jwt_secret_key,
            jwt_algorithm,
            access_token_expire_minutes,
            refresh_token_expire_days,
            bcrypt_cost,
            bind_address,
        })
    }

    fn parse_ranged(
        env: &impl EnvironmentProvider,
        key: &'static str,
        default: i64,
        range: std::ops::RangeInclusive<i64>,
    ) -> Result<i64, SettingsError> {
        let value = match env.var(key) {
            Some(raw) => raw.parse::<i64>().map_err(|_| SettingsError::Invalid {
                setting: key,
                message: "must be a positive integer".to_string(),
            })?,
            None => default,
        };

        if !range.contains(&value) {
            return Err(SettingsError::Invalid {
                setting: key,
                message: format!("must be between {} and {}", range.start(), range.end()),
            });
        }

        Ok(value)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("jwt_secret_key", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("refresh_token_expire_days", &self.refresh_token_expire_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_provider::MapEnvironment;

    fn base_env() -> MapEnvironment {
        MapEnvironment::new().set("JWT_SECRET_KEY", "test-secret-key-minimum-32-characters-long")
    }

    #[test]
    fn test_defaults_applied_when_unset() {
        let settings = Settings::from_provider(&base_env()).unwrap();

        assert_eq!(settings.access_token_expire_minutes, 15);
        assert_eq!(settings.refresh_token_expire_days, 7);
        assert_eq!(settings.bcrypt_cost, 12);
        assert_eq!(settings.jwt_algorithm, Algorithm::HS256);
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        let result = Settings::from_provider(&MapEnvironment::new());
        assert!(matches!(result, Err(SettingsError::Missing("JWT_SECRET_KEY"))));
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let env = MapEnvironment::new().set("JWT_SECRET_KEY", "too-short");
        let result = Settings::from_provider(&env);
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                setting: "JWT_SECRET_KEY",
                ..
            })
        ));
    }

    #[test]
    fn test_ttl_range_validation() {
        let env = base_env().set("ACCESS_TOKEN_EXPIRE_MINUTES", "0");
        assert!(Settings::from_provider(&env).is_err());

        let env = base_env().set("REFRESH_TOKEN_EXPIRE_DAYS", "366");
        assert!(Settings::from_provider(&env).is_err());

        let env = base_env().set("ACCESS_TOKEN_EXPIRE_MINUTES", "30");
        let settings = Settings::from_provider(&env).unwrap();
        assert_eq!(settings.access_token_expire_minutes, 30);
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let env = base_env().set("JWT_ALGORITHM", "none");
        assert!(Settings::from_provider(&env).is_err());
    }

    #[test]
    fn test_debug_redacts_jwt_secret() {
        let settings = Settings::from_provider(&base_env()).unwrap();
        let debug_output = format!("{:?}", settings);

        assert!(!debug_output.contains("test-secret-key"));
        assert!(debug_output.contains("<redacted>"));
    }
}
