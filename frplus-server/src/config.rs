use std::env;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub static_dir: String,
    pub db_max_connections: u32,

    pub allow_reset: bool,
    pub seed_admin_on_start: bool,
    pub admin: AdminSeed,
}

/// Credentials used to seed the admin account. The password arrives hashed.
#[derive(Clone, Debug, Default)]
pub struct AdminSeed {
    pub name: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            server_port: parse_or("PORT", 8080),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),

            allow_reset: flag("ALLOW_RESET"),
            seed_admin_on_start: flag("SEED_ADMIN_ON_START"),
            admin: AdminSeed {
                name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string()),
                email: non_empty("ADMIN_EMAIL"),
                password_hash: non_empty("ADMIN_PASSWORD_HASH"),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', defaulting to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn flag(key: &str) -> bool {
    env::var(key).map(|v| v == "true").unwrap_or(false)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names; tests run in parallel.

    #[test]
    fn test_parse_or_invalid_falls_back() {
        env::set_var("FRPLUS_TEST_PORT_INVALID", "abc");
        assert_eq!(parse_or("FRPLUS_TEST_PORT_INVALID", 8080u16), 8080);
    }

    #[test]
    fn test_parse_or_valid_and_unset() {
        env::set_var("FRPLUS_TEST_MAX_CONN", "25");
        assert_eq!(parse_or("FRPLUS_TEST_MAX_CONN", 10u32), 25);
        assert_eq!(parse_or("FRPLUS_TEST_MAX_CONN_UNSET", 10u32), 10);
    }

    #[test]
    fn test_parse_or_out_of_range_falls_back() {
        env::set_var("FRPLUS_TEST_PORT_RANGE", "70000");
        assert_eq!(parse_or("FRPLUS_TEST_PORT_RANGE", 8080u16), 8080);
    }

    #[test]
    fn test_flag_only_true() {
        env::set_var("FRPLUS_TEST_FLAG_TRUE", "true");
        env::set_var("FRPLUS_TEST_FLAG_ONE", "1");
        env::set_var("FRPLUS_TEST_FLAG_UPPER", "TRUE");

        assert!(flag("FRPLUS_TEST_FLAG_TRUE"));
        assert!(!flag("FRPLUS_TEST_FLAG_ONE"));
        assert!(!flag("FRPLUS_TEST_FLAG_UPPER"));
        assert!(!flag("FRPLUS_TEST_FLAG_UNSET"));
    }

    #[test]
    fn test_non_empty_blank_is_none() {
        env::set_var("FRPLUS_TEST_ADMIN_EMAIL_BLANK", "   ");
        env::set_var("FRPLUS_TEST_ADMIN_EMAIL", "admin@frplus.local");

        assert_eq!(non_empty("FRPLUS_TEST_ADMIN_EMAIL_BLANK"), None);
        assert_eq!(
            non_empty("FRPLUS_TEST_ADMIN_EMAIL").as_deref(),
            Some("admin@frplus.local")
        );
        assert_eq!(non_empty("FRPLUS_TEST_ADMIN_EMAIL_UNSET"), None);
    }

    #[test]
    fn test_missing_message() {
        assert_eq!(
            ConfigError::Missing("DATABASE_URL").to_string(),
            "DATABASE_URL must be set"
        );
    }
}
