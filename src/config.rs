use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://production.api.ezygo.app/api/v1/Xcr45_salt";
pub const DEFAULT_ORIGIN: &str = "https://edu.ezygo.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    /// Sent as `Origin` on login; the `Referer` is this value plus a trailing slash.
    pub origin: String,
    pub timeout: Duration,
    pub state_path: PathBuf,
}

impl Config {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("EZYGO_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let origin = lookup("EZYGO_ORIGIN")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        let timeout_secs = match lookup("EZYGO_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("EZYGO_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "EZYGO_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let state_path = match lookup("ATTENDANCE_STATE_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_state_path()?,
        };

        Ok(Self {
            base_url: trim_base_url(&base_url),
            origin: origin.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            state_path,
        })
    }

    /// Config pointing at `base_url`, used against local or mock upstreams.
    pub fn with_base_url(base_url: impl Into<String>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: trim_base_url(&base_url.into()),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_path: state_path.into(),
        }
    }

    pub fn referer(&self) -> String {
        format!("{}/", self.origin)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_state_path() -> Result<PathBuf, AppError> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| AppError::Config("could not determine a data directory".to_string()))?;
    Ok(base.join("attendance").join("state.json"))
}
