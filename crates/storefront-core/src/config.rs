//! Environment-driven run configuration

use crate::error::{Result, StorefrontError};
use crate::fixtures;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://opencart.abstracta.us/";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 720,
};
pub const LAUNCH_ARGS: [&str; 2] = ["--start-maximized", "--disable-notifications"];

/// Browser engines the suite can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Chromium,
    Firefox,
    Webkit,
}

impl Engine {
    /// Unknown names fall back to Chromium, matching the historical default.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("Unknown browser '{}', falling back to chromium", name);
            Engine::Chromium
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Chromium => "chromium",
            Engine::Firefox => "firefox",
            Engine::Webkit => "webkit",
        }
    }
}

impl FromStr for Engine {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Engine::Chromium),
            "firefox" => Ok(Engine::Firefox),
            "webkit" | "safari" => Ok(Engine::Webkit),
            other => Err(StorefrontError::Config {
                key: "BROWSER".to_string(),
                reason: format!("unsupported browser '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Deployment environment, selects which credential variables apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn from_name(name: &str) -> Self {
        match name {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    fn credential_prefix(&self) -> &'static str {
        match self {
            Environment::Development => "DEV",
            Environment::Test => "TEST",
            Environment::Production => "PROD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub retries: usize,
    pub min_timeout: Duration,
    pub max_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub screenshot: bool,
    pub video: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: Engine,
    pub base_url: String,
    pub headless: bool,
    pub slow_mo: Duration,
    pub timeout: Duration,
    pub launch_args: Vec<String>,
    pub viewport: Viewport,
    pub parallel: usize,
    pub retry: RetryConfig,
    pub media: MediaConfig,
    pub reports_dir: PathBuf,
    pub test_data_dir: PathBuf,
    pub webdriver_url: String,
    pub chrome_path: Option<String>,
    pub environment: Environment,
    pub credentials: Credentials,
    pub tags: Vec<String>,
}

impl Config {
    /// Reads the process environment, loading `.env` first if one exists.
    pub fn from_env() -> Result<Self> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = Environment::from_name(
            get("TEST_ENV").as_deref().unwrap_or("development"),
        );
        let prefix = environment.credential_prefix();
        let default_user = fixtures::users().valid;
        let credentials = Credentials {
            email: get(&format!("{prefix}_USER_EMAIL")).unwrap_or(default_user.email),
            password: get(&format!("{prefix}_USER_PASSWORD")).unwrap_or(default_user.password),
        };

        let tags = get("TAGS")
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().trim_start_matches('@').to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            engine: Engine::from_name(get("BROWSER").as_deref().unwrap_or("chrome")),
            base_url: get("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            headless: get("HEADLESS").as_deref() == Some("true"),
            slow_mo: Duration::from_millis(parse_number(&get, "SLOW_MO", 0)?),
            timeout: Duration::from_millis(parse_number(&get, "TIMEOUT", 30_000)?),
            launch_args: LAUNCH_ARGS.iter().map(|a| a.to_string()).collect(),
            viewport: VIEWPORT,
            parallel: parse_number(&get, "PARALLEL", 2)?.max(1) as usize,
            retry: RetryConfig {
                retries: parse_number(&get, "RETRIES", 1)? as usize,
                min_timeout: Duration::from_millis(parse_number(&get, "MIN_TIMEOUT", 5_000)?),
                max_timeout: Duration::from_millis(parse_number(&get, "MAX_TIMEOUT", 10_000)?),
            },
            media: MediaConfig {
                screenshot: get("SCREENSHOT").as_deref() == Some("true"),
                video: get("VIDEO").as_deref() == Some("true"),
            },
            reports_dir: PathBuf::from(get("REPORTS_DIR").unwrap_or_else(|| "reports".into())),
            test_data_dir: PathBuf::from(
                get("TEST_DATA_DIR").unwrap_or_else(|| "fixtures".into()),
            ),
            webdriver_url: get("WEBDRIVER_URL").unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.into()),
            chrome_path: get("CHROME_PATH"),
            environment,
            credentials,
            tags,
        })
    }

    /// Joins a route query (e.g. `?route=checkout/cart`) onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.reports_dir.join("screenshots")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.reports_dir.join("videos")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.reports_dir.join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        // Every key has a default, so an empty lookup cannot fail.
        Self::from_lookup(|_| None).unwrap_or_else(|_| unreachable!("defaults always parse"))
    }
}

fn parse_number<F>(get: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| StorefrontError::Config {
            key: key.to_string(),
            reason: format!("'{raw}' is not a non-negative integer"),
        }),
    }
}
