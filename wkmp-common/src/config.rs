//! Configuration loading and root folder resolution
//!
//! Missing or unreadable TOML files are never fatal: callers get defaults
//! and a warning in the log.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variables consulted for the root folder, highest priority first
pub const ROOT_FOLDER_ENV_VARS: [&str; 2] = ["WKMP_ROOT_FOLDER", "WKMP_ROOT"];

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `tracing` filter directive (e.g. "info", "wkmp_te=debug")
    pub level: String,
    /// Optional log file; stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

/// TOML configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Music library root folder
    pub root_folder: Option<PathBuf>,
    /// Default operation profile
    pub profile: Option<PathBuf>,
    /// Default field selection; standard fields when unset
    pub selected_fields: Option<Vec<String>>,
    pub logging: LoggingConfig,
}

/// Platform defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
        }
    }
}

/// Root folder resolution in priority order:
/// 1. Command-line argument
/// 2. `WKMP_ROOT_FOLDER`, then `WKMP_ROOT`
/// 3. TOML config `root_folder`
/// 4. OS-dependent compiled default
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_config: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_config = Some(config.clone());
        self
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            debug!(module = %self.module_name, "Root folder from command line");
            return path.clone();
        }

        // Priority 2: Environment variables
        for var in ROOT_FOLDER_ENV_VARS {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    debug!(module = %self.module_name, var, "Root folder from environment");
                    return PathBuf::from(path);
                }
            }
        }

        // Priority 3: TOML config file
        if let Some(root) = self
            .toml_config
            .as_ref()
            .and_then(|c| c.root_folder.clone())
        {
            debug!(module = %self.module_name, "Root folder from TOML config");
            return root;
        }

        // Priority 4: OS-dependent compiled default
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Default configuration file path for a module: `<config_dir>/wkmp/<module>.toml`
pub fn default_config_path(module_name: &str) -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("wkmp").join(format!("{}.toml", module_name)))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load a TOML config, falling back to defaults when absent or invalid
pub fn load_toml_config_or_default(path: &Path) -> TomlConfig {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return TomlConfig::default();
    }

    match load_toml_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Create a config file, refusing to replace an existing one unless `force`
pub fn init_toml_config(config: &TomlConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    write_toml_config(config, path)?;
    info!("Wrote config file {}", path.display());
    Ok(())
}

/// Write a TOML config atomically (temp file + rename)
///
/// On Unix the file is created with mode 0600.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

/// OS-dependent default root folder (the user's music directory)
fn default_root_folder() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
        .unwrap_or_else(|| PathBuf::from("./Music"))
}
