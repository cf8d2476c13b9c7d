//! # Scenario Context
//!
//! One [`ScenarioContext`] exists per scenario. It is UNINITIALIZED until
//! [`ScenarioContext::set_up`] opens an isolated browser context and page on
//! the run's shared browser, ACTIVE until [`ScenarioContext::tear_down`]
//! closes them again, and never reused afterwards. Page objects, scenario
//! data and actions are only reachable while it is ACTIVE.

use crate::action::Action;
use crate::handlers;
use crate::run_state::RunState;
use browser_driver::{BrowserContext, ContextOptions, Page};
use cucumber::World;
use page_objects::{PageFactory, WebActions};
use std::sync::Arc;
use storefront_core::{Result, ScenarioData, StorefrontError};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Metadata of the scenario a context belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioInfo {
    pub feature: String,
    pub name: String,
    pub tags: Vec<String>,
    /// `path:line` of the scenario in its feature file.
    pub location: Option<String>,
    pub attempt: usize,
    /// Id of the scenario's record in the run's report.
    pub record: Option<Uuid>,
}

impl ScenarioInfo {
    pub fn new(feature: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            name: name.into(),
            attempt: 1,
            ..Default::default()
        }
    }

    /// Identifies the scenario across retries.
    pub fn key(&self) -> String {
        self.location
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.feature, self.name))
    }
}

struct BrowserSession {
    context: Box<dyn BrowserContext>,
    page: Arc<dyn Page>,
    pages: PageFactory,
}

struct Session {
    run: Arc<RunState>,
    info: ScenarioInfo,
    /// Absent in a dry run.
    browser: Option<BrowserSession>,
}

#[derive(World)]
#[world(init = Self::new)]
pub struct ScenarioContext {
    session: Option<Session>,
    data: ScenarioData,
    last_error: Option<String>,
}

impl std::fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("ScenarioContext");
        match &self.session {
            Some(session) => debug
                .field("scenario", &session.info.name)
                .field("attempt", &session.info.attempt)
                .field(
                    "context",
                    &session.browser.as_ref().map(|browser| browser.context.id()),
                ),
            None => debug.field("scenario", &None::<String>),
        };
        debug
            .field("data", &self.data)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self {
            session: None,
            data: ScenarioData::default(),
            last_error: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Opens a fresh context and page on the run's shared browser.
    ///
    /// Fails with `Misuse` when the context is already ACTIVE.
    #[instrument(skip_all, fields(scenario = %info.name, attempt = info.attempt))]
    pub async fn set_up(&mut self, run: Arc<RunState>, info: ScenarioInfo) -> Result<()> {
        if let Some(session) = &self.session {
            return Err(StorefrontError::misuse(format!(
                "set up '{}' while '{}' is still active",
                info.name, session.info.name
            )));
        }

        self.data.clear();
        self.last_error = None;

        let browser = if run.is_dry_run() {
            debug!("Dry run, no browser context opened");
            None
        } else {
            Some(open_browser_session(&run).await?)
        };
        if let Some(browser) = &browser {
            info!("Opened browser context {}", browser.context.id());
        }

        self.session = Some(Session { run, info, browser });
        Ok(())
    }

    /// Closes the scenario's browser context; a no-op when never set up.
    ///
    /// The context is UNINITIALIZED afterwards even when closing fails; the
    /// failure is reported as `ResourceRelease`.
    #[instrument(skip_all)]
    pub async fn tear_down(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            debug!("Tear down without set up");
            return Ok(());
        };
        self.data.clear();

        let Some(browser) = session.browser else {
            return Ok(());
        };
        let id = browser.context.id().to_string();
        drop(browser.pages);
        browser
            .context
            .close()
            .await
            .map_err(|err| StorefrontError::ResourceRelease {
                reason: format!(
                    "browser context {id} of '{}' did not close: {err}",
                    session.info.name
                ),
            })?;
        debug!("Closed browser context {}", id);
        Ok(())
    }

    /// The memoizing page object factory of the current scenario.
    pub fn pages(&self) -> Result<&PageFactory> {
        let session = self.session()?;
        session
            .browser
            .as_ref()
            .map(|browser| &browser.pages)
            .ok_or_else(|| StorefrontError::misuse("page objects requested during a dry run"))
    }

    pub fn page(&self) -> Option<Arc<dyn Page>> {
        self.session
            .as_ref()
            .and_then(|session| session.browser.as_ref())
            .map(|browser| browser.page.clone())
    }

    pub fn data(&self) -> Result<&ScenarioData> {
        self.session()?;
        Ok(&self.data)
    }

    pub fn data_mut(&mut self) -> Result<&mut ScenarioData> {
        self.session()?;
        Ok(&mut self.data)
    }

    pub fn info(&self) -> Option<&ScenarioInfo> {
        self.session.as_ref().map(|session| &session.info)
    }

    pub fn run(&self) -> Option<&Arc<RunState>> {
        self.session.as_ref().map(|session| &session.run)
    }

    /// The error of the last failed action, kept until the next set up.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Console and page errors captured since set up.
    pub async fn diagnostics(&self) -> Vec<String> {
        let Some(page) = self.page() else {
            return Vec::new();
        };
        if let Err(err) = page.collect_diagnostics().await {
            warn!("Could not collect console errors: {}", err);
        }
        page.diagnostics().messages()
    }

    /// Runs one action against the scenario's pages.
    pub async fn perform(&mut self, action: Action) -> Result<()> {
        let Some(session) = self.session.as_ref() else {
            return Err(StorefrontError::misuse(format!(
                "{} performed outside of a scenario",
                action.name()
            )));
        };
        let Some(browser) = &session.browser else {
            debug!("Dry run, skipped {}", action.name());
            return Ok(());
        };

        debug!("Performing {}", action.name());
        let result =
            handlers::execute(&browser.pages, session.run.config(), &mut self.data, action).await;
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| StorefrontError::misuse("scenario context used outside of set up and tear down"))
    }
}

async fn open_browser_session(run: &RunState) -> Result<BrowserSession> {
    let browser = run.browser()?;
    let context = browser
        .new_context(&ContextOptions::from_config(run.config()))
        .await?;
    let page = match context.new_page().await {
        Ok(page) => page,
        Err(err) => {
            if let Err(close_err) = context.close().await {
                warn!("Could not close context {} after a failed page: {}", context.id(), close_err);
            }
            return Err(err.into());
        }
    };
    page.diagnostics().clear();
    let pages = PageFactory::new(WebActions::new(page.clone(), run.config()));
    Ok(BrowserSession {
        context,
        page,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use browser_driver::memory::{MemoryBrowser, MemorySite};
    use browser_driver::Browser;
    use storefront_core::Config;

    fn config() -> Config {
        let mut config = Config::default();
        config.base_url = "https://shop.test/".to_string();
        config
    }

    fn run_on(browser: &MemoryBrowser) -> Arc<RunState> {
        Arc::new(RunState::new(config(), Some(Arc::new(browser.clone())), false))
    }

    fn info(name: &str) -> ScenarioInfo {
        ScenarioInfo::new("Shopping Cart", name)
    }

    #[tokio::test]
    async fn one_context_per_scenario_cycle() {
        let browser = MemoryBrowser::with_site(MemorySite::new().title("Your Store"));
        let run = run_on(&browser);
        let mut context = ScenarioContext::new();
        assert!(!context.is_active());

        context.set_up(run.clone(), info("Add to cart")).await.unwrap();
        assert!(context.is_active());
        assert_eq!(browser.open_contexts(), 1);
        assert!(context.page().is_some());

        context.tear_down().await.unwrap();
        assert!(!context.is_active());
        assert_eq!(browser.contexts_closed(), 1);
        assert!(context.page().is_none());
        assert!(browser.last_page().unwrap().is_closed());
    }

    #[tokio::test]
    async fn set_up_twice_is_misuse() {
        let browser = MemoryBrowser::new();
        let run = run_on(&browser);
        let mut context = ScenarioContext::new();
        context.set_up(run.clone(), info("first")).await.unwrap();

        let err = context.set_up(run, info("second")).await.unwrap_err();
        assert!(err.is_misuse());
        assert_eq!(context.info().unwrap().name, "first");
        assert_eq!(browser.contexts_opened(), 1);
    }

    #[tokio::test]
    async fn tear_down_without_set_up_is_a_no_op() {
        let mut context = ScenarioContext::new();
        context.tear_down().await.unwrap();
        context.tear_down().await.unwrap();
    }

    #[tokio::test]
    async fn data_starts_empty_and_is_unreachable_outside_the_window() {
        let browser = MemoryBrowser::new();
        let run = run_on(&browser);
        let mut context = ScenarioContext::new();
        assert!(context.data().unwrap_err().is_misuse());

        context.set_up(run.clone(), info("one")).await.unwrap();
        assert!(context.data().unwrap().is_empty());
        context.data_mut().unwrap().last_search_term = Some("iphone".into());
        context.tear_down().await.unwrap();
        assert!(context.data_mut().unwrap_err().is_misuse());

        context.set_up(run, info("two")).await.unwrap();
        assert!(context.data().unwrap().is_empty());
    }

    #[tokio::test]
    async fn factory_is_memoized_per_scenario_only() {
        let browser = MemoryBrowser::new();
        let run = run_on(&browser);

        let mut first = ScenarioContext::new();
        first.set_up(run.clone(), info("first")).await.unwrap();
        let home = first.pages().unwrap().home().unwrap();
        assert!(Arc::ptr_eq(&home, &first.pages().unwrap().home().unwrap()));

        let mut second = ScenarioContext::new();
        second.set_up(run, info("second")).await.unwrap();
        let other = second.pages().unwrap().home().unwrap();
        assert!(!Arc::ptr_eq(&home, &other));

        first.tear_down().await.unwrap();
        assert!(first.pages().unwrap_err().is_misuse());
        second.tear_down().await.unwrap();
    }

    #[tokio::test]
    async fn failed_close_is_a_resource_release_error() {
        let browser = MemoryBrowser::new();
        let run = run_on(&browser);
        let mut context = ScenarioContext::new();
        context.set_up(run, info("leaky")).await.unwrap();

        browser.fail_context_close(true);
        let err = context.tear_down().await.unwrap_err();
        assert!(matches!(err, StorefrontError::ResourceRelease { .. }));
        assert!(err.to_string().contains("leaky"));
        assert!(!context.is_active());
    }

    #[tokio::test]
    async fn closed_browser_cannot_host_new_scenarios() {
        let browser = MemoryBrowser::new();
        let run = run_on(&browser);
        browser.close().await.unwrap();

        let mut context = ScenarioContext::new();
        let err = context.set_up(run, info("late")).await.unwrap_err();
        assert!(err.is_misuse());
        assert!(!context.is_active());
    }

    #[tokio::test]
    async fn actions_only_run_inside_the_window() {
        let mut context = ScenarioContext::new();
        let err = context.perform(Action::OpenHomepage).await.unwrap_err();
        assert!(err.is_misuse());

        let browser = MemoryBrowser::with_site(MemorySite::new().title("Your Store"));
        context.set_up(run_on(&browser), info("home")).await.unwrap();
        context.perform(Action::OpenHomepage).await.unwrap();
        assert_eq!(
            browser.last_page().unwrap().actions(),
            vec!["goto https://shop.test/".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_actions_are_remembered_until_the_next_set_up() {
        let browser = MemoryBrowser::with_site(MemorySite::new().title("Maintenance"));
        let run = run_on(&browser);
        let mut context = ScenarioContext::new();
        context.set_up(run.clone(), info("down")).await.unwrap();

        assert!(context.perform(Action::OpenHomepage).await.is_err());
        context.tear_down().await.unwrap();
        assert!(context.last_error().unwrap().contains("Your Store"));

        context.set_up(run, info("again")).await.unwrap();
        assert!(context.last_error().is_none());
    }

    #[tokio::test]
    async fn dry_runs_bind_without_a_browser() {
        let mut context = ScenarioContext::new();
        let run = Arc::new(RunState::dry(config()));
        context.set_up(run, info("dry")).await.unwrap();

        assert!(context.page().is_none());
        assert!(context.pages().unwrap_err().is_misuse());
        context.perform(Action::OpenHomepage).await.unwrap();
        assert!(context.diagnostics().await.is_empty());
        context.tear_down().await.unwrap();
    }
}
