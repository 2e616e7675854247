// SPDX-License-Identifier: MPL-2.0
//! Config directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override**: parameter to [`get_app_config_dir_with_override`] (tests)
//! 2. **CLI argument** `--config-dir`, set once via [`init_cli_overrides`]
//! 3. **Environment variable** `VID_COMPARE_CONFIG_DIR`
//! 4. **Platform default** via the `dirs` crate

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "VidCompare";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "VID_COMPARE_CONFIG_DIR";

static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Serializes tests that touch the process environment.
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Records the `--config-dir` argument.
///
/// Only the first call takes effect; later calls are logged and ignored.
pub fn init_cli_overrides(config_dir: Option<String>) {
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        log::warn!("config dir override already initialized, ignoring");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Returns the directory holding `settings.toml`.
///
/// Platform defaults:
/// - Linux: `~/.config/VidCompare/`
/// - macOS: `~/Library/Application Support/VidCompare/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\VidCompare\`
///
/// Returns `None` if no config directory can be determined.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Same as [`get_app_config_dir`], with `override_path` taking precedence
/// over every other source.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = get_cli_config_dir() {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
