use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("DSCOUT_LOG_LEVEL", "info");
    let user_agent = or_default("DSCOUT_USER_AGENT", "dscout/0.1 (demand-discovery)");
    let request_timeout_secs = parse_u64("DSCOUT_REQUEST_TIMEOUT_SECS", "10")?;
    let pace_delay_ms = parse_u64("DSCOUT_PACE_DELAY_MS", "2000")?;
    let output_dir = PathBuf::from(or_default("DSCOUT_OUTPUT_DIR", "."));
    let producthunt_token = lookup("DSCOUT_PRODUCTHUNT_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());

    Ok(AppConfig {
        log_level,
        user_agent,
        request_timeout_secs,
        pace_delay_ms,
        output_dir,
        producthunt_token,
    })
}
