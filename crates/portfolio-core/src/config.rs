use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PORTFOLIO_ENV", "development"))?;
    let log_level = or_default("PORTFOLIO_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default("PORTFOLIO_CATALOG_PATH", "./data/catalog.json"));
    let governance_path = PathBuf::from(or_default(
        "PORTFOLIO_GOVERNANCE_PATH",
        "./config/governance.yaml",
    ));
    let export_dir = PathBuf::from(or_default("PORTFOLIO_EXPORT_DIR", "./exports"));

    let api_base_url = optional("PORTFOLIO_API_BASE_URL");
    let api_token = optional("PORTFOLIO_API_TOKEN");

    let request_timeout_secs = parse_u64("PORTFOLIO_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("PORTFOLIO_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PORTFOLIO_RETRY_BACKOFF_BASE_MS", "500")?;
    let ingest_poll_interval_ms = parse_u64("PORTFOLIO_INGEST_POLL_INTERVAL_MS", "2000")?;
    let ingest_max_polls = parse_u32("PORTFOLIO_INGEST_MAX_POLLS", "60")?;

    if ingest_max_polls == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PORTFOLIO_INGEST_MAX_POLLS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        catalog_path,
        governance_path,
        export_dir,
        api_base_url,
        api_token,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        ingest_poll_interval_ms,
        ingest_max_polls,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PORTFOLIO_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
