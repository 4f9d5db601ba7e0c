//! Configuration Vault – reads/writes `~/.talairach/config.toml`.
//!
//! Lets users record the client jar location once instead of passing
//! `--client` on every run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use talairach_daemon::DEFAULT_CUBE_RANGE;
use talairach_runtime::DEFAULT_TAL_FILE;

/// Persisted user configuration stored in `~/.talairach/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the Talairach Daemon client (`talairach.jar`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<PathBuf>,

    /// Java launcher used to run the client.
    #[serde(default = "default_java")]
    pub java: PathBuf,

    /// Cube range for the area search.
    #[serde(default = "default_cube_range")]
    pub cube_range: u32,

    /// Intermediate Talairach coordinates file.
    #[serde(default = "default_tal_file")]
    pub tal_file: PathBuf,
}

fn default_java() -> PathBuf {
    PathBuf::from("java")
}
fn default_cube_range() -> u32 {
    DEFAULT_CUBE_RANGE
}
fn default_tal_file() -> PathBuf {
    PathBuf::from(DEFAULT_TAL_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: None,
            java: default_java(),
            cube_range: default_cube_range(),
            tal_file: default_tal_file(),
        }
    }
}

/// Return the path to `~/.talairach/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".talairach").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
    Ok(Some(cfg))
}

/// Apply `TAL_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `TAL_CLIENT` | `client` |
/// | `TAL_JAVA` | `java` |
/// | `TAL_CUBE_RANGE` | `cube_range` (ignored unless a positive integer) |
/// | `TAL_FILE` | `tal_file` |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides_from(cfg, |key| std::env::var(key).ok());
}

/// Same as [`apply_env_overrides`] with an injectable variable source.
pub(crate) fn apply_overrides_from(cfg: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("TAL_CLIENT") {
        cfg.client = Some(PathBuf::from(v));
    }
    if let Some(v) = var("TAL_JAVA") {
        cfg.java = PathBuf::from(v);
    }
    if let Some(v) = var("TAL_CUBE_RANGE")
        && let Ok(range) = v.trim().parse::<u32>()
        && range > 0
    {
        cfg.cube_range = range;
    }
    if let Some(v) = var("TAL_FILE") {
        cfg.tal_file = PathBuf::from(v);
    }
}

/// Save the config to disk, creating `~/.talairach/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Restrict the config directory to the owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Write the file with owner-only read/write (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
