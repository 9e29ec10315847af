use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;
use crate::storage::LocalStore;

pub const CUTOFF_KEY: &str = "attendance_cutoff";

/// Minimum attendance percentage the user wants to stay above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Cutoff(u32);

impl Cutoff {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 100;

    pub fn new(percent: u32) -> Result<Self, AppError> {
        if (Self::MIN..=Self::MAX).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(AppError::InvalidCutoff(percent))
        }
    }

    pub fn percent(self) -> u32 {
        self.0
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Self(75)
    }
}

impl TryFrom<u32> for Cutoff {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cutoff> for u32 {
    fn from(cutoff: Cutoff) -> Self {
        cutoff.0
    }
}

impl FromStr for Cutoff {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%');
        let percent = trimmed
            .parse::<u32>()
            .map_err(|_| AppError::Config(format!("invalid cutoff: {}", s)))?;
        Self::new(percent)
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Preferences {
    store: Arc<LocalStore>,
}

impl Preferences {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn cutoff(&self) -> Cutoff {
        match self.store.get(CUTOFF_KEY) {
            None => Cutoff::default(),
            Some(raw) => raw.parse::<Cutoff>().unwrap_or_else(|e| {
                warn!("ignoring stored cutoff {:?}: {}", raw, e);
                Cutoff::default()
            }),
        }
    }

    pub fn set_cutoff(&self, cutoff: Cutoff) -> Result<(), AppError> {
        self.store.set(CUTOFF_KEY, &cutoff.percent().to_string())
    }
}
