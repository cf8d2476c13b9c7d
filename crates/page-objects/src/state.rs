//! Direct application-state setup, bypassing the UI.

use crate::pages::cart::REMOVE_BUTTONS;
use crate::web_actions::WebActions;
use storefront_core::constants::{messages, routes};
use storefront_core::Result;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct StateHelper {
    actions: WebActions,
}

impl StateHelper {
    pub fn new(actions: WebActions) -> Self {
        Self { actions }
    }

    fn store_url(&self, route: &str, query: &str) -> String {
        self.actions
            .url_for(&format!("index.php?route={route}{query}"))
    }

    #[instrument(skip(self))]
    pub async fn add_product_to_cart(&self, product_id: u32, quantity: u32) -> Result<()> {
        let url = self.store_url(
            routes::CART_ADD,
            &format!("&product_id={product_id}&quantity={quantity}"),
        );
        self.actions.navigate_to(&url).await?;
        info!("Added product {} x{} to the cart", product_id, quantity);
        Ok(())
    }

    /// Removes every cart row, one at a time.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<()> {
        self.actions
            .navigate_to(&self.store_url(routes::CART, ""))
            .await?;

        let rows = self.actions.count(REMOVE_BUTTONS).await?;
        if rows == 0 {
            debug!("{}", messages::EMPTY_CART);
            return Ok(());
        }
        for _ in 0..rows {
            self.actions.click_nth(REMOVE_BUTTONS, 0, "Cart item").await?;
            self.actions.wait_for_load().await?;
        }
        info!("Removed {} cart rows", rows);
        Ok(())
    }

    pub async fn set_cookie(&self, name: &str, value: &str) -> Result<()> {
        self.actions.page().set_cookie(name, value).await?;
        Ok(())
    }

    pub async fn clear_cookies(&self) -> Result<()> {
        self.actions.page().clear_cookies().await?;
        Ok(())
    }

    pub async fn set_language(&self, language: &str) -> Result<()> {
        let url = self.store_url(routes::HOME, &format!("&language={language}"));
        self.actions.navigate_to(&url).await
    }

    /// `currency` is an ISO code such as `USD`, `EUR` or `GBP`.
    pub async fn set_currency(&self, currency: &str) -> Result<()> {
        let url = self.store_url(routes::HOME, &format!("&currency={currency}"));
        self.actions.navigate_to(&url).await
    }
}
