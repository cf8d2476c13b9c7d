//! Runs the feature files under a profile.
//!
//! cucumber drives the scenarios; its before/after hooks call into
//! [`hooks`], which reach the shared run through [`RunState::current`].

use crate::context::{ScenarioContext, ScenarioInfo};
use crate::hooks;
use crate::profile::Profile;
use crate::run_state::RunState;
use cucumber::{cli, event, gherkin, writer, World as _, WriterExt as _};
use scenario_report::{read_rerun, RunDocument, ScenarioStatus, RERUN_FILE};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use storefront_core::{artifacts, tags, Config, Result, StorefrontError};
use tracing::{info, instrument};

pub const FEATURES_DIR: &str = "tests/features";
pub const CUCUMBER_REPORT_FILE: &str = "cucumber-report.json";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub profile: Profile,
    pub features: PathBuf,
    /// Added to the tags configured through `TAGS`.
    pub tags: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            profile: Profile::Default,
            features: PathBuf::from(FEATURES_DIR),
            tags: Vec::new(),
        }
    }
}

impl RunOptions {
    pub fn new(profile: Profile, features: impl Into<PathBuf>) -> Self {
        Self {
            profile,
            features: features.into(),
            tags: Vec::new(),
        }
    }
}

/// Which scenarios a run admits.
#[derive(Debug, Clone, Default)]
pub struct ScenarioFilter {
    include: Vec<String>,
    /// Entries of the rerun list, when rerunning.
    rerun: Option<Vec<String>>,
}

impl ScenarioFilter {
    pub fn new(include: Vec<String>, rerun: Option<Vec<String>>) -> Self {
        Self { include, rerun }
    }

    pub fn admits(&self, tags: &[String], name: &str, location: Option<&str>) -> bool {
        if !tags::admits(tags, self.include.as_slice()) {
            return false;
        }
        match &self.rerun {
            None => true,
            Some(entries) => entries.iter().any(|entry| {
                entry == name || location.is_some_and(|location| location_matches(entry, location))
            }),
        }
    }
}

/// `features/cart.feature:12` matches the same scenario under any prefix.
pub fn location_matches(entry: &str, location: &str) -> bool {
    let entry = entry.trim();
    !entry.is_empty()
        && (entry == location
            || location.ends_with(&format!("/{entry}"))
            || entry.ends_with(&format!("/{location}")))
}

/// Runs every admitted scenario and returns the run's result document.
#[instrument(skip_all, fields(profile = %options.profile, features = %options.features.display()))]
pub async fn run(mut config: Config, options: RunOptions) -> Result<RunDocument> {
    let profile = options.profile;
    profile.apply(&mut config);

    let mut include = config.tags.clone();
    include.extend(options.tags.iter().cloned());
    let rerun = if profile.is_rerun() {
        let entries = read_rerun(&config.reports_dir.join(RERUN_FILE))?;
        info!("Rerunning {} failed scenario(s)", entries.len());
        Some(entries)
    } else {
        None
    };
    let filter = ScenarioFilter::new(include, rerun);

    artifacts::create_dir_if_missing(&config.reports_dir)?;
    let report = File::create(config.reports_dir.join(CUCUMBER_REPORT_FILE))?;
    let concurrency = profile.concurrency(&config);
    let retries = profile.retries(&config);
    let retry_after = config.retry.min_timeout;

    hooks::run_start(config, profile).await?;
    execute(
        options.features,
        filter,
        concurrency,
        retries,
        retry_after,
        report,
        profile.requires_bound_steps(),
    )
    .await;
    hooks::run_end()
        .await?
        .ok_or_else(|| StorefrontError::misuse("run state was taken before the run ended"))
}

async fn execute(
    features: PathBuf,
    filter: ScenarioFilter,
    concurrency: usize,
    retries: usize,
    retry_after: Duration,
    report: File,
    requires_bound_steps: bool,
) {
    let cucumber = ScenarioContext::cucumber()
        .max_concurrent_scenarios(concurrency)
        .retries(retries)
        .retry_after(retry_after)
        .before(|feature, _rule, scenario, world| Box::pin(before_scenario(feature, scenario, world)))
        .after(|_feature, _rule, _scenario, finished, world| {
            Box::pin(after_scenario(finished, world))
        })
        .with_writer(
            writer::Basic::raw(io::stdout(), writer::Coloring::Never, 0)
                .summarized()
                .tee::<ScenarioContext, _>(writer::Json::for_tee(report))
                .normalized(),
        );

    let admits = move |feature: &gherkin::Feature,
                       _rule: Option<&gherkin::Rule>,
                       scenario: &gherkin::Scenario| {
        let info = scenario_info(feature, scenario);
        filter.admits(&info.tags, &info.name, info.location.as_deref())
    };

    if requires_bound_steps {
        cucumber
            .fail_on_skipped()
            .with_cli(cli::Opts::<_, _, _, cli::Empty>::default())
            .filter_run(features, admits)
            .await;
    } else {
        cucumber
            .with_cli(cli::Opts::<_, _, _, cli::Empty>::default())
            .filter_run(features, admits)
            .await;
    }
}

async fn before_scenario(
    feature: &gherkin::Feature,
    scenario: &gherkin::Scenario,
    world: &mut ScenarioContext,
) {
    let run = match RunState::current() {
        Ok(run) => run,
        Err(err) => panic!("{err}"),
    };
    if let Err(err) = hooks::scenario_start(world, run, scenario_info(feature, scenario)).await {
        panic!("Scenario set up failed: {err}");
    }
}

async fn after_scenario(finished: &event::ScenarioFinished, world: Option<&mut ScenarioContext>) {
    let Some(world) = world else {
        return;
    };
    let (status, error) = outcome(finished);
    if let Err(err) = hooks::scenario_end(world, status, error).await {
        panic!("Scenario tear down failed: {err}");
    }
}

fn outcome(finished: &event::ScenarioFinished) -> (ScenarioStatus, Option<String>) {
    match finished {
        event::ScenarioFinished::StepPassed => (ScenarioStatus::Passed, None),
        event::ScenarioFinished::StepSkipped => (ScenarioStatus::Skipped, None),
        event::ScenarioFinished::StepFailed(.., err) => {
            (ScenarioStatus::Failed, Some(err.to_string()))
        }
        _ => (ScenarioStatus::Failed, None),
    }
}

/// Feature tags apply to every scenario of the feature.
fn scenario_info(feature: &gherkin::Feature, scenario: &gherkin::Scenario) -> ScenarioInfo {
    let mut info = ScenarioInfo::new(&feature.name, &scenario.name);
    info.tags = feature
        .tags
        .iter()
        .chain(scenario.tags.iter())
        .cloned()
        .collect();
    info.location = feature
        .path
        .as_ref()
        .map(|path| format!("{}:{}", path.display(), scenario.position.line));
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_state::CURRENT_RUN_TEST_LOCK;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn rerun_entries_match_by_location_suffix() {
        let location = "/work/shop/tests/features/cart.feature:12";
        assert!(location_matches("tests/features/cart.feature:12", location));
        assert!(location_matches(location, location));
        assert!(!location_matches("features/cart.feature:1", location));
        assert!(!location_matches("cart.feature:120", location));
        assert!(!location_matches("", location));
    }

    #[test]
    fn skip_tags_are_never_admitted() {
        let filter = ScenarioFilter::default();
        assert!(filter.admits(&tags(&["smoke"]), "Search", None));
        assert!(!filter.admits(&tags(&["smoke", "skip"]), "Search", None));
    }

    #[test]
    fn include_tags_narrow_the_run() {
        let filter = ScenarioFilter::new(tags(&["@smoke"]), None);
        assert!(filter.admits(&tags(&["cart", "smoke"]), "Add", None));
        assert!(!filter.admits(&tags(&["cart"]), "Add", None));
    }

    #[test]
    fn reruns_admit_only_listed_scenarios() {
        let filter = ScenarioFilter::new(
            Vec::new(),
            Some(tags(&["features/cart.feature:12", "Guest checkout"])),
        );
        assert!(filter.admits(&[], "Add", Some("/repo/features/cart.feature:12")));
        assert!(filter.admits(&[], "Guest checkout", None));
        assert!(!filter.admits(&[], "Add", Some("/repo/features/cart.feature:30")));

        let nothing = ScenarioFilter::new(Vec::new(), Some(Vec::new()));
        assert!(!nothing.admits(&[], "Add", None));
    }

    #[tokio::test]
    async fn dry_run_passes_every_bundled_scenario() {
        let _current = CURRENT_RUN_TEST_LOCK.lock().await;
        let reports = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.reports_dir = reports.path().to_path_buf();
        config.tags.clear();

        let features = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features");
        let document = run(config, RunOptions::new(Profile::DryRun, features))
            .await
            .unwrap();

        assert!(document.summary.total > 0);
        assert_eq!(document.summary.failed, 0);
        assert_eq!(document.summary.skipped, 0);
        assert_eq!(document.summary.passed, document.summary.total);
        assert!(reports.path().join(CUCUMBER_REPORT_FILE).exists());
        assert!(RunState::current().is_err());
    }
}
