//! Memoizing page object factory.
//!
//! One factory exists per scenario session. The first request for a page
//! kind builds it around the session's page; later requests return the same
//! instance. The factory is dropped with the session, so nothing it built
//! outlives the scenario.

use crate::pages::{
    CartPage, CheckoutPage, ComparisonPage, HomePage, LoginPage, ProductPage, RegisterPage,
    SearchResultPage,
};
use crate::state::StateHelper;
use crate::web_actions::WebActions;
use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;
use storefront_core::{Result, StorefrontError};
use tracing::debug;

/// A page object the factory can build.
pub trait PageObject: Any + Send + Sync {
    fn create(actions: WebActions) -> Self
    where
        Self: Sized;
}

pub struct PageFactory {
    actions: WebActions,
    pages: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for PageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFactory")
            .field("cached_pages", &self.pages.len())
            .field("page_closed", &self.actions.page().is_closed())
            .finish()
    }
}

impl PageFactory {
    pub fn new(actions: WebActions) -> Self {
        Self {
            actions,
            pages: DashMap::new(),
        }
    }

    /// Returns the cached `P`, building it on first request.
    ///
    /// Fails with `Misuse` once the session's page is closed.
    pub fn get<P: PageObject>(&self) -> Result<Arc<P>> {
        if self.actions.page().is_closed() {
            return Err(StorefrontError::misuse(format!(
                "{} requested after the browser page was closed",
                short_name::<P>()
            )));
        }

        let cached = self
            .pages
            .entry(TypeId::of::<P>())
            .or_insert_with(|| {
                debug!("Creating {}", short_name::<P>());
                let page: Arc<dyn Any + Send + Sync> = Arc::new(P::create(self.actions.clone()));
                page
            })
            .clone();

        cached.downcast::<P>().map_err(|_| {
            StorefrontError::misuse(format!("page cache holds the wrong type for {}", short_name::<P>()))
        })
    }

    /// Number of page kinds built so far.
    pub fn cached(&self) -> usize {
        self.pages.len()
    }

    pub fn actions(&self) -> &WebActions {
        &self.actions
    }

    pub fn state_helper(&self) -> StateHelper {
        StateHelper::new(self.actions.clone())
    }

    pub fn home(&self) -> Result<Arc<HomePage>> {
        self.get()
    }

    pub fn login(&self) -> Result<Arc<LoginPage>> {
        self.get()
    }

    pub fn product(&self) -> Result<Arc<ProductPage>> {
        self.get()
    }

    pub fn cart(&self) -> Result<Arc<CartPage>> {
        self.get()
    }

    pub fn search_results(&self) -> Result<Arc<SearchResultPage>> {
        self.get()
    }

    pub fn comparison(&self) -> Result<Arc<ComparisonPage>> {
        self.get()
    }

    pub fn checkout(&self) -> Result<Arc<CheckoutPage>> {
        self.get()
    }

    pub fn register(&self) -> Result<Arc<RegisterPage>> {
        self.get()
    }
}

fn short_name<P>() -> &'static str {
    let name = type_name::<P>();
    name.rsplit("::").next().unwrap_or(name)
}
