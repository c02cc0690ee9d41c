//! Config file location.
//!
//! An explicit directory wins. Otherwise the file lives in `oneapi/` under
//! `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{OneApiError, Result};

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory under the base config directory.
const APP_DIR_NAME: &str = "oneapi";

/// Resolves the config file path.
///
/// # Errors
///
/// Returns `OneApiError::Configuration` if `dir` is `None` and neither
/// `XDG_CONFIG_HOME` nor `HOME` is usable.
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    let config_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => default_config_dir(
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("HOME"),
        )?,
    };
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Picks `$XDG_CONFIG_HOME/oneapi` or `$HOME/.config/oneapi`.
///
/// Relative or empty `XDG_CONFIG_HOME` values are ignored.
fn default_config_dir(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(base) = xdg_config_home.map(PathBuf::from).filter(|p| p.is_absolute()) {
        return Ok(base.join(APP_DIR_NAME));
    }

    home.filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(".config").join(APP_DIR_NAME))
        .ok_or_else(|| {
            OneApiError::Configuration(String::from(
                "cannot locate the config directory: HOME is not set",
            ))
        })
}
