//! Named run profiles.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use storefront_core::{Config, StorefrontError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Parallel scenarios with retries.
    #[default]
    Default,
    /// A visible browser slowed down for watching.
    Headed,
    /// Binds and parses every step without a browser.
    DryRun,
    /// Only the scenarios that failed in the previous run.
    Rerun,
}

const HEADED_SLOW_MO: Duration = Duration::from_millis(100);

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Default => "default",
            Profile::Headed => "headed",
            Profile::DryRun => "dryrun",
            Profile::Rerun => "rerun",
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Profile::DryRun)
    }

    pub fn is_rerun(&self) -> bool {
        matches!(self, Profile::Rerun)
    }

    /// A dry run must bind every step, so an undefined one fails it.
    pub fn requires_bound_steps(&self) -> bool {
        self.is_dry_run()
    }

    /// Scenarios running at once.
    pub fn concurrency(&self, config: &Config) -> usize {
        match self {
            Profile::Headed => 1,
            _ => config.parallel.max(1),
        }
    }

    /// Whole-scenario retries; a dry run never retries.
    pub fn retries(&self, config: &Config) -> usize {
        match self {
            Profile::DryRun => 0,
            _ => config.retry.retries,
        }
    }

    pub fn apply(&self, config: &mut Config) {
        if let Profile::Headed = self {
            config.headless = false;
            config.slow_mo = HEADED_SLOW_MO;
        }
    }
}

impl FromStr for Profile {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Profile::Default),
            "headed" => Ok(Profile::Headed),
            "dryrun" | "dry-run" => Ok(Profile::DryRun),
            "rerun" => Ok(Profile::Rerun),
            other => Err(StorefrontError::Config {
                key: "profile".to_string(),
                reason: format!("unknown profile '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
