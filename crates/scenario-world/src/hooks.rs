//! # Lifecycle hooks
//!
//! Bind the [`ScenarioContext`] state machine to the run:
//!
//! - run start: prepare output directories, probe the store, launch the
//!   shared browser and install the [`RunState`]
//! - scenario start: record the attempt and set the context up
//! - scenario end: capture evidence, finish the record, tear down
//! - run end: write the result document and rerun list, close the browser
//!
//! Evidence capture is best-effort. Its errors are logged as
//! `ArtifactCapture` and never change the scenario's outcome. Tear down and
//! browser close errors are returned, since they mean a leaked session.

use crate::context::{ScenarioContext, ScenarioInfo};
use crate::profile::Profile;
use crate::run_state::RunState;
use browser_driver::{Browser, Page};
use chrono::Utc;
use scenario_report::{render_text, write_rerun, Attachment, RunDocument, ScenarioStatus};
use scenario_report::{RERUN_FILE, RESULTS_FILE};
use std::sync::Arc;
use std::time::Duration;
use storefront_core::artifacts::{self, console_log_content, console_log_file_name, screenshot_file_name};
use storefront_core::{Config, Result, StorefrontError};
use tracing::{debug, error, info, instrument, warn};

const REACHABILITY_ATTEMPTS: usize = 30;
const REACHABILITY_INTERVAL: Duration = Duration::from_millis(100);

/// Prepares the run and launches its shared browser (none in a dry run).
#[instrument(skip_all, fields(profile = %profile, engine = %config.engine))]
pub async fn run_start(config: Config, profile: Profile) -> Result<Arc<RunState>> {
    let browser = if profile.is_dry_run() {
        None
    } else {
        if !wait_for_store(&config.base_url).await {
            warn!(
                "{} did not answer after {} attempts, scenarios will fail on navigation",
                config.base_url, REACHABILITY_ATTEMPTS
            );
        }
        Some(browser_driver::launch(&config).await?)
    };
    run_start_on(config, browser, profile.is_dry_run())
}

/// Installs a run around an already launched browser.
pub fn run_start_on(
    config: Config,
    browser: Option<Arc<dyn Browser>>,
    dry_run: bool,
) -> Result<Arc<RunState>> {
    for dir in artifacts::prepare_directories(&config)? {
        debug!("Prepared {}", dir.display());
    }
    info!("Test run started against {}", config.base_url);
    Ok(RunState::install(RunState::new(config, browser, dry_run)))
}

async fn wait_for_store(url: &str) -> bool {
    let client = reqwest::Client::new();
    for _ in 0..REACHABILITY_ATTEMPTS {
        if let Ok(response) = client.get(url).send().await {
            if response.status().is_success() || response.status().is_redirection() {
                return true;
            }
        }
        tokio::time::sleep(REACHABILITY_INTERVAL).await;
    }
    false
}

/// Writes the run's results and closes the shared browser.
///
/// Returns `None` when no run was started.
#[instrument(skip_all)]
pub async fn run_end() -> Result<Option<RunDocument>> {
    let Some(run) = RunState::take() else {
        warn!("Run end without a run start");
        return Ok(None);
    };

    let document = RunDocument::from_recorder(run.recorder());
    let written = write_results(&run, &document);
    info!(
        "Test run finished\n{}",
        render_text(&document.summary, &document.outcomes())
    );

    if let Some(browser) = run.take_browser() {
        browser
            .close()
            .await
            .map_err(|err| StorefrontError::ResourceRelease {
                reason: format!("shared {} browser did not close: {err}", browser.engine()),
            })?;
        debug!("Closed the shared browser");
    }
    written?;
    Ok(Some(document))
}

fn write_results(run: &RunState, document: &RunDocument) -> Result<()> {
    let reports = &run.config().reports_dir;
    document.write(&reports.join(RESULTS_FILE))?;
    write_rerun(&reports.join(RERUN_FILE), &run.recorder().failed())
}

/// Records a new attempt and sets the context up for it.
///
/// A failed set up finishes the attempt as failed before returning.
#[instrument(skip_all, fields(scenario = %info.name))]
pub async fn scenario_start(
    world: &mut ScenarioContext,
    run: Arc<RunState>,
    mut info: ScenarioInfo,
) -> Result<()> {
    info.attempt = run.next_attempt(&info.key());
    let id = run.recorder().start(
        &info.feature,
        &info.name,
        info.tags.clone(),
        info.location.clone(),
        info.attempt,
    );
    info.record = Some(id);
    info!(
        "Starting scenario: {} (attempt {}) {}",
        info.name,
        info.attempt,
        info.tags.join(" ")
    );

    if let Err(err) = world.set_up(run.clone(), info).await {
        if let Err(finish_err) =
            run.recorder()
                .finish(id, ScenarioStatus::Failed, Some(err.to_string()))
        {
            warn!("Could not record the failed set up: {}", finish_err);
        }
        return Err(err);
    }
    Ok(())
}

/// Captures evidence, finishes the record and tears the context down.
///
/// `error` is the runner's description of a failed step; the context's own
/// last error is used when the runner has none.
#[instrument(skip_all, fields(status = %status))]
pub async fn scenario_end(
    world: &mut ScenarioContext,
    status: ScenarioStatus,
    error: Option<String>,
) -> Result<()> {
    if let (Some(run), Some(info)) = (world.run().cloned(), world.info().cloned()) {
        capture_artifacts(world, &run, &info, status).await;

        let error = error.or_else(|| world.last_error().map(str::to_string));
        if let Some(id) = info.record {
            if let Err(err) = run.recorder().finish(id, status, error) {
                warn!("Could not record the outcome of '{}': {}", info.name, err);
            }
        }
        info!("Scenario '{}' finished: {}", info.name, status);
    }
    world.tear_down().await
}

async fn capture_artifacts(
    world: &ScenarioContext,
    run: &RunState,
    info: &ScenarioInfo,
    status: ScenarioStatus,
) {
    let Some(page) = world.page() else {
        return;
    };

    if let Err(err) = capture_screenshot(page.as_ref(), run, info, status).await {
        log_capture_error("screenshot", err);
    }
    if !status.is_failure() {
        return;
    }
    if let Err(err) = capture_console_errors(world, run, info).await {
        log_capture_error("console errors", err);
    }
    if let Err(err) = capture_url(page.as_ref(), run, info).await {
        log_capture_error("page URL", err);
    }
}

fn log_capture_error(what: &str, err: StorefrontError) {
    let err = StorefrontError::ArtifactCapture {
        reason: format!("{what}: {err}"),
    };
    error!("{}", err);
}

async fn capture_screenshot(
    page: &dyn Page,
    run: &RunState,
    info: &ScenarioInfo,
    status: ScenarioStatus,
) -> Result<()> {
    let png = page.screenshot(true).await?;
    let path = run
        .config()
        .screenshots_dir()
        .join(screenshot_file_name(&info.name, status.as_str()));
    artifacts::write_file(&path, &png)?;
    info!("Screenshot saved to {}", path.display());
    attach(run, info, Attachment::png(&png))
}

async fn capture_console_errors(
    world: &ScenarioContext,
    run: &RunState,
    info: &ScenarioInfo,
) -> Result<()> {
    let errors = world.diagnostics().await;
    if errors.is_empty() {
        return Ok(());
    }
    let path = run
        .config()
        .logs_dir()
        .join(console_log_file_name(&info.name));
    artifacts::write_file(&path, console_log_content(&info.name, Utc::now(), &errors))?;
    info!("Console errors saved to {}", path.display());
    attach(
        run,
        info,
        Attachment::plain(format!("Console errors during test:\n{}", errors.join("\n"))),
    )
}

async fn capture_url(page: &dyn Page, run: &RunState, info: &ScenarioInfo) -> Result<()> {
    let url = page.url().await?;
    attach(run, info, Attachment::plain(format!("Failed at URL: {url}")))
}

fn attach(run: &RunState, info: &ScenarioInfo, attachment: Attachment) -> Result<()> {
    match info.record {
        Some(id) => run.recorder().attach(id, attachment),
        None => Ok(()),
    }
}
