//! # Page Objects
//!
//! Page objects for the OpenCart storefront, the [`WebActions`] they are
//! built on, the [`StateHelper`] for URL-driven setup, and the
//! [`PageFactory`] that hands each scenario one memoized instance per page.

pub mod base;
pub mod factory;
pub mod money;
pub mod pages;
pub mod state;
pub mod web_actions;

pub use base::BasePage;
pub use factory::{PageFactory, PageObject};
pub use pages::{
    CartPage, CheckoutPage, ComparisonPage, HomePage, LoginPage, ProductPage, RegisterPage,
    SearchResultPage,
};
pub use state::StateHelper;
pub use web_actions::WebActions;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::web_actions::WebActions;
    use browser_driver::memory::{MemoryPage, MemorySite};
    use std::sync::Arc;
    use std::time::Duration;
    use storefront_core::Config;

    pub const BASE_URL: &str = "https://shop.test/";

    pub fn site() -> MemorySite {
        MemorySite::new().title("Your Store")
    }

    /// A memory page over `site` with short waits and no settle pause.
    pub fn actions_for(site: MemorySite) -> (Arc<MemoryPage>, WebActions) {
        let mut config = Config::default();
        config.base_url = BASE_URL.to_string();
        config.timeout = Duration::from_millis(200);

        let page = Arc::new(MemoryPage::from_site(site));
        let actions = WebActions::new(page.clone(), &config).with_settle(Duration::ZERO);
        (page, actions)
    }
}
