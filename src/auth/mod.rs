//! Credentials for the code host and the issue tracker
//!
//! Each credential can come from an explicit value, a file path, or the
//! user's config file, in that order of precedence.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved credentials for one run
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Code-host token; optional, raises API rate limits when present
    pub github_token: Option<String>,
    /// Tracker API key; required
    pub tracker_key: String,
}

/// Where each credential may come from, before resolution
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    /// GitHub token given directly
    pub github_token: Option<String>,
    /// Path to a file holding the GitHub token
    pub github_token_file: Option<PathBuf>,
    /// Tracker key given directly
    pub tracker_key: Option<String>,
    /// Path to a file holding the tracker key
    pub tracker_key_file: Option<PathBuf>,
}

/// Shape of the optional config file
/// (`~/.config/backport-resolve/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    github_token: Option<String>,
    tracker_key: Option<String>,
}

fn read_secret_file(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read credential file {}: {e}", path.display()))
    })?;
    let secret = contents.trim();
    if secret.is_empty() {
        return Err(Error::Config(format!(
            "credential file {} is empty",
            path.display()
        )));
    }
    Ok(secret.to_string())
}

fn load_config_file() -> Result<ConfigFile> {
    let Some(path) = dirs::config_dir().map(|d| d.join("backport-resolve/config.toml")) else {
        return Ok(ConfigFile::default());
    };
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    let config = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Resolve credentials from explicit values, files, and the config file.
///
/// A missing tracker key is a fatal startup condition: the engine cannot
/// read tracker issues without one. A missing GitHub token is allowed.
pub fn resolve_credentials(sources: &CredentialSources) -> Result<Credentials> {
    let config = load_config_file()?;

    let github_token = match (&sources.github_token, &sources.github_token_file) {
        (Some(token), _) => Some(token.clone()),
        (None, Some(path)) => Some(read_secret_file(path)?),
        (None, None) => config.github_token,
    };

    let tracker_key = match (&sources.tracker_key, &sources.tracker_key_file) {
        (Some(key), _) => Some(key.clone()),
        (None, Some(path)) => Some(read_secret_file(path)?),
        (None, None) => config.tracker_key,
    }
    .ok_or_else(|| {
        Error::Config(
            "no tracker API key: pass --tracker-key, --tracker-key-file, or set tracker_key in the config file"
                .to_string(),
        )
    })?;

    Ok(Credentials {
        github_token,
        tracker_key,
    })
}
