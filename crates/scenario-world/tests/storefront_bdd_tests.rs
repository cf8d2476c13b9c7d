//! The live suite against the configured store.
//!
//! Needs a browser and network access, so it only runs with
//! `STOREFRONT_E2E=1`. `STOREFRONT_PROFILE` picks the profile.

use scenario_report::render_text;
use scenario_world::{run, Profile, RunOptions};
use storefront_core::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if std::env::var("STOREFRONT_E2E").as_deref() != Ok("1") {
        println!("storefront suite skipped, set STOREFRONT_E2E=1 to run it");
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("storefront configuration");
    let profile: Profile = std::env::var("STOREFRONT_PROFILE")
        .unwrap_or_default()
        .parse()
        .expect("known profile");

    let features = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features");
    let document = run(config, RunOptions::new(profile, features))
        .await
        .expect("suite runs to the end");

    assert!(
        document.summary.is_success(),
        "{}",
        render_text(&document.summary, &document.outcomes())
    );
}
