//! # Storefront Core
//!
//! Core types for the storefront end-to-end suite: the error taxonomy,
//! environment configuration, store constants, fixtures and the typed data
//! that steps of one scenario hand to each other.

pub mod artifacts;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod fixtures;
pub mod scenario_data;
pub mod tags;

pub use config::{Config, Credentials, Engine, Environment, MediaConfig, RetryConfig, Viewport};
pub use error::{ensure, Result, StorefrontError};
pub use fixtures::{Address, BillingDetails, Login, UserDetails};
pub use scenario_data::ScenarioData;

/// Current suite version, recorded in result documents
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information for logs and reports
pub const BUILD_INFO: &str = concat!(
    "Storefront E2E ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);
