//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CABLECHECK_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CABLECHECK_ROOT_FOLDER";

/// Compiled per-platform defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/cablecheck (or /var/lib/cablecheck for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("cablecheck"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/cablecheck"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/cablecheck
        dirs::data_dir()
            .map(|d| d.join("cablecheck"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/cablecheck"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\cablecheck
        dirs::data_local_dir()
            .map(|d| d.join("cablecheck"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\cablecheck"))
    } else {
        PathBuf::from("./cablecheck_data")
    }
}

/// Logging section of the TOML config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Per-module TOML config file contents
///
/// All keys are optional; absent keys fall back to environment variables or
/// compiled defaults. Unknown keys are preserved-by-ignoring so older files
/// keep loading after upgrades.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Reasoning-oracle endpoint URL (chat-completions style)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_endpoint: Option<String>,

    /// Model name submitted to the oracle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_model: Option<String>,

    /// Oracle API key (lowest priority; database and ENV win)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_api_key: Option<String>,

    /// "strict" or "permissive" (default strict)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_policy: Option<String>,

    /// HTTP listen port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Load a TOML config file, falling back to defaults when the file is
    /// missing or unreadable. Missing config files never prevent startup.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!("Loaded config file: {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Config file {} failed to parse, using defaults: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// Per-module config file path: `~/.config/cablecheck/<module>.toml`
pub fn config_file_path(module_name: &str) -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cablecheck").join(format!("{}.toml", module_name)))
        .unwrap_or_else(|| PathBuf::from(format!("{}.toml", module_name)))
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("TOML serialization failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Config may hold an API key; keep it owner-readable only
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// Root folder resolution following the documented priority order
pub struct RootFolderResolver {
    module_name: String,
    toml_config: TomlConfig,
}

impl RootFolderResolver {
    /// Create a resolver for the named module, loading its TOML config file
    pub fn new(module_name: &str) -> Self {
        let toml_config = TomlConfig::load_or_default(&config_file_path(module_name));
        Self {
            module_name: module_name.to_string(),
            toml_config,
        }
    }

    /// Create a resolver with an explicit TOML config (used by tests)
    pub fn with_config(module_name: &str, toml_config: TomlConfig) -> Self {
        Self {
            module_name: module_name.to_string(),
            toml_config,
        }
    }

    pub fn toml_config(&self) -> &TomlConfig {
        &self.toml_config
    }

    /// Resolve the root folder, with an optional command-line override
    pub fn resolve(&self, cli_arg: Option<&str>) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            debug!("{}: root folder from command line", self.module_name);
            return PathBuf::from(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!("{}: root folder from {}", self.module_name, ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_config.root_folder {
            debug!("{}: root folder from TOML config", self.module_name);
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Root folder initialization: directory creation and database placement
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder directory if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("cablecheck.db")
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }
}

/// Response-normalization strictness selected at deployment time.
///
/// Two incompatible policies were observed in production use; neither is
/// obviously "the" right one, so the choice is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Unverified implies failed: entries missing a status default to FAIL,
    /// and the oracle prompt forbids inferring values
    #[default]
    Strict,
    /// Entries missing a status default to PASS, and the oracle prompt is
    /// allowed to infer values aggressively
    Permissive,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPolicy::Strict => "strict",
            ValidationPolicy::Permissive => "permissive",
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "permissive" => Ok(ValidationPolicy::Permissive),
            other => Err(Error::Config(format!(
                "Unknown validation policy '{}' (expected 'strict' or 'permissive')",
                other
            ))),
        }
    }
}
