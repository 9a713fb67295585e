//! Settings database operations
//!
//! Get/set accessors for the key/value settings table. The settings table is
//! the authoritative tier of the oracle API key resolution; ENV and TOML are
//! fallbacks handled in `crate::config`.

use cablecheck_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use std::fmt::Display;
use std::str::FromStr;

const ORACLE_API_KEY_SETTING: &str = "oracle_api_key";

/// Get the oracle API key from the database
///
/// **Returns:** Some(key) if set, None otherwise
pub async fn get_oracle_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, ORACLE_API_KEY_SETTING).await
}

/// Set the oracle API key in the database
pub async fn set_oracle_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, ORACLE_API_KEY_SETTING, key).await
}

/// Read a typed setting; None when the key is not present
pub async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match value {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Setting '{}' failed to parse: {}", key, e))),
        None => Ok(None),
    }
}

/// Write a setting, replacing any previous value
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value.to_string())
        .execute(db)
        .await?;
    Ok(())
}
