//! Configuration resolution for cablecheck-dv
//!
//! Provides multi-tier resolution with Database → ENV → TOML priority for
//! the oracle API key, and ENV → TOML → default resolution for the rest of
//! the service settings.

use cablecheck_common::config::{write_toml_config, TomlConfig, ValidationPolicy};
use cablecheck_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{info, warn};

use crate::services::OracleClient;

/// ENV override for the oracle API key
pub const ORACLE_API_KEY_ENV: &str = "CABLECHECK_ORACLE_API_KEY";
/// ENV override for the oracle endpoint URL
pub const ORACLE_ENDPOINT_ENV: &str = "CABLECHECK_ORACLE_ENDPOINT";
/// ENV override for the oracle model name
pub const ORACLE_MODEL_ENV: &str = "CABLECHECK_ORACLE_MODEL";
/// ENV override for the validation policy
pub const VALIDATION_POLICY_ENV: &str = "CABLECHECK_VALIDATION_POLICY";
/// ENV override for the HTTP listen port
pub const PORT_ENV: &str = "CABLECHECK_DV_PORT";

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5731;

/// Resolve the oracle API key from 3-tier configuration.
///
/// **Priority:** Database → ENV → TOML. The database tier is authoritative
/// because the settings endpoint writes there; ENV and TOML exist so a fresh
/// deployment can come up without a prior settings call.
pub async fn resolve_oracle_api_key(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<String> {
    let db_key = crate::db::settings::get_oracle_api_key(db).await?;
    let env_key = std::env::var(ORACLE_API_KEY_ENV).ok();
    let toml_key = toml_config.oracle_api_key.clone();

    // In priority order; only non-blank values count as present
    let candidates: Vec<(&str, Option<String>)> = vec![
        ("database", db_key),
        ("environment", env_key),
        ("TOML", toml_key),
    ];

    let found: Vec<(&str, String)> = candidates
        .into_iter()
        .filter_map(|(source, key)| key.filter(|k| is_valid_key(k)).map(|k| (source, k)))
        .collect();

    // More than one configured source usually means a stale leftover
    if found.len() > 1 {
        let names: Vec<&str> = found.iter().map(|(source, _)| *source).collect();
        warn!(
            "Oracle API key found in multiple sources: {}. Using {} (highest priority).",
            names.join(", "),
            names[0]
        );
    }

    match found.into_iter().next() {
        Some((source, key)) => {
            info!("Oracle API key loaded from {}", source);
            Ok(key)
        }
        None => Err(Error::Config(format!(
            "Oracle API key not configured. Please configure using one of:\n\
             1. API: POST http://localhost:{}/api/settings/oracle_api_key\n\
             2. Environment: {}=your-key-here\n\
             3. TOML config: ~/.config/cablecheck/cablecheck-dv.toml (oracle_api_key = \"your-key\")",
            DEFAULT_PORT, ORACLE_API_KEY_ENV
        ))),
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the oracle endpoint URL (ENV → TOML → compiled default)
pub fn resolve_oracle_endpoint(toml_config: &TomlConfig) -> String {
    std::env::var(ORACLE_ENDPOINT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| toml_config.oracle_endpoint.clone())
        .unwrap_or_else(|| OracleClient::default_endpoint().to_string())
}

/// Resolve the oracle model name (ENV → TOML → compiled default)
pub fn resolve_oracle_model(toml_config: &TomlConfig) -> String {
    std::env::var(ORACLE_MODEL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| toml_config.oracle_model.clone())
        .unwrap_or_else(|| OracleClient::default_model().to_string())
}

/// Resolve the validation policy (ENV → TOML → strict default).
///
/// An unparseable policy string warns and falls back to the default rather
/// than preventing startup.
pub fn resolve_validation_policy(toml_config: &TomlConfig) -> ValidationPolicy {
    let raw = std::env::var(VALIDATION_POLICY_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| toml_config.validation_policy.clone());

    match raw {
        Some(value) => match value.parse() {
            Ok(policy) => policy,
            Err(e) => {
                warn!("{}. Falling back to the strict policy.", e);
                ValidationPolicy::default()
            }
        },
        None => ValidationPolicy::default(),
    }
}

/// Resolve the HTTP listen port (CLI → ENV → TOML → default)
pub fn resolve_port(cli_port: Option<u16>, toml_config: &TomlConfig) -> u16 {
    if let Some(port) = cli_port {
        return port;
    }

    if let Some(port) = std::env::var(PORT_ENV).ok().and_then(|v| v.parse().ok()) {
        return port;
    }

    toml_config.port.unwrap_or(DEFAULT_PORT)
}

/// Write the oracle API key back to the TOML file, preserving every other
/// key already in it. Best-effort: a failed write is logged and swallowed,
/// since the database copy is the one resolution actually trusts first.
pub fn sync_api_key_to_toml(api_key: &str, toml_path: &Path) {
    let mut config = TomlConfig::load_or_default(toml_path);
    config.oracle_api_key = Some(api_key.to_string());

    match write_toml_config(&config, toml_path) {
        Ok(()) => info!("Oracle API key synced to TOML: {}", toml_path.display()),
        Err(e) => warn!("TOML write failed (database write succeeded): {}", e),
    }
}
