//! Search results and category listings.

use crate::base::BasePage;
use crate::factory::PageObject;
use crate::money;
use crate::web_actions::WebActions;
use storefront_core::constants::routes;
use storefront_core::Result;
use tracing::info;

pub const SEARCH_CRITERIA: &str = "#input-search";
pub const SEARCH_IN_DESCRIPTION: &str = "#description";
pub const SEARCH_IN_SUBCATEGORIES: &str = "#sub_category";
pub const SEARCH_BUTTON: &str = "#button-search";
pub const PRODUCT_CARDS: &str = ".product-layout";
pub const PRODUCT_NAMES: &str = ".product-layout .caption h4 a";
pub const PRODUCT_PRICES: &str = ".product-layout .price";
pub const SORT_BY: &str = "#input-sort";
pub const SHOW_LIMIT: &str = "#input-limit";
pub const NO_RESULTS_MESSAGE: &str = "#content p:not([class])";
pub const BREADCRUMB_ITEMS: &str = ".breadcrumb li";
pub const GRID_VIEW_BUTTON: &str = "#grid-view";
pub const LIST_VIEW_BUTTON: &str = "#list-view";
pub const ADD_TO_CART_BUTTONS: &str = "button[onclick*=\"cart.add\"]";
pub const WISHLIST_BUTTONS: &str = "button[data-original-title=\"Add to Wish List\"]";
pub const COMPARE_BUTTONS: &str = "button[data-original-title=\"Compare this Product\"]";

pub const SORT_PRICE_HIGH_TO_LOW: &str = "Price (High > Low)";

#[derive(Debug, Clone)]
pub struct SearchResultPage {
    actions: WebActions,
}

impl PageObject for SearchResultPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for SearchResultPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl SearchResultPage {
    pub async fn navigate_to_search(&self) -> Result<()> {
        self.navigate_to(&routes::path(routes::SEARCH)).await
    }

    /// Runs a search from the advanced search form.
    pub async fn search(&self, keyword: &str, in_description: bool, in_subcategories: bool) -> Result<()> {
        info!(
            "Advanced search for '{}' (description: {}, subcategories: {})",
            keyword, in_description, in_subcategories
        );
        self.type_text(SEARCH_CRITERIA, keyword).await?;
        if in_description {
            self.actions.check(SEARCH_IN_DESCRIPTION).await?;
        }
        if in_subcategories {
            self.actions.check(SEARCH_IN_SUBCATEGORIES).await?;
        }
        self.click(SEARCH_BUTTON).await
    }

    pub async fn result_count(&self) -> Result<usize> {
        self.actions.count(PRODUCT_CARDS).await
    }

    pub async fn product_names(&self) -> Result<Vec<String>> {
        self.actions.texts(PRODUCT_NAMES).await
    }

    /// Listed prices in page order; labels without an amount are skipped.
    pub async fn product_prices(&self) -> Result<Vec<f64>> {
        let labels = self.actions.texts(PRODUCT_PRICES).await?;
        Ok(labels.iter().filter_map(|l| money::parse_price(l)).collect())
    }

    pub async fn sort_by(&self, label: &str) -> Result<()> {
        self.actions.select_option(SORT_BY, label).await
    }

    pub async fn set_show_limit(&self, limit: &str) -> Result<()> {
        self.actions.select_option(SHOW_LIMIT, limit).await
    }

    pub async fn has_no_results(&self) -> Result<bool> {
        if self.is_visible(NO_RESULTS_MESSAGE).await? {
            let message = self.get_text(NO_RESULTS_MESSAGE).await?;
            return Ok(message.contains("no products"));
        }
        Ok(false)
    }

    pub async fn click_grid_view(&self) -> Result<()> {
        self.click(GRID_VIEW_BUTTON).await
    }

    pub async fn click_list_view(&self) -> Result<()> {
        self.click(LIST_VIEW_BUTTON).await
    }

    pub async fn add_product_to_cart_by_index(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(ADD_TO_CART_BUTTONS, index, "Product")
            .await
    }

    pub async fn add_product_to_wishlist_by_index(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(WISHLIST_BUTTONS, index, "Product")
            .await
    }

    pub async fn add_product_to_compare_by_index(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(COMPARE_BUTTONS, index, "Product")
            .await
    }

    pub async fn click_product_by_index(&self, index: usize) -> Result<()> {
        self.actions.click_nth(PRODUCT_NAMES, index, "Product").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actions_for, site};
    use browser_driver::memory::MemoryElement;
    use storefront_core::StorefrontError;

    fn results_site() -> browser_driver::memory::MemorySite {
        site()
            .elements(PRODUCT_CARDS, [MemoryElement::text(""), MemoryElement::text("")])
            .elements(
                PRODUCT_NAMES,
                [MemoryElement::text("iPhone"), MemoryElement::text("iPod Classic")],
            )
            .elements(
                PRODUCT_PRICES,
                [
                    MemoryElement::text("$101.00 Ex Tax: $80.00"),
                    MemoryElement::text("$122.00 Ex Tax: $101.00"),
                ],
            )
            .elements(
                ADD_TO_CART_BUTTONS,
                [MemoryElement::text(""), MemoryElement::text("")],
            )
            .element(
                SORT_BY,
                MemoryElement::select(&["Default", "Price (Low > High)", SORT_PRICE_HIGH_TO_LOW]),
            )
    }

    #[tokio::test]
    async fn reads_names_counts_and_prices() {
        let (_, actions) = actions_for(results_site());
        let results = SearchResultPage::create(actions);

        assert_eq!(results.result_count().await.unwrap(), 2);
        assert_eq!(results.product_names().await.unwrap(), vec!["iPhone", "iPod Classic"]);
        let prices = results.product_prices().await.unwrap();
        assert_eq!(prices, vec![101.0, 122.0]);
        assert!(money::is_ascending(&prices));
        assert!(!results.has_no_results().await.unwrap());
    }

    #[tokio::test]
    async fn sorting_and_adding_by_index() {
        let (page, actions) = actions_for(results_site());
        let results = SearchResultPage::create(actions);

        results.sort_by(SORT_PRICE_HIGH_TO_LOW).await.unwrap();
        results.add_product_to_cart_by_index(1).await.unwrap();
        assert_eq!(
            page.actions(),
            vec![
                format!("select {SORT_BY}={SORT_PRICE_HIGH_TO_LOW}"),
                format!("click {ADD_TO_CART_BUTTONS}[1]"),
            ]
        );

        let err = results.add_product_to_compare_by_index(0).await.unwrap_err();
        assert!(matches!(err, StorefrontError::IndexOutOfRange { len: 0, .. }));
    }

    #[tokio::test]
    async fn empty_search_reports_no_results() {
        let (_, actions) = actions_for(site().element(
            NO_RESULTS_MESSAGE,
            MemoryElement::text("There is no product that matches the search criteria."),
        ));
        let results = SearchResultPage::create(actions);
        // OpenCart says "no product that matches"; only "no products" counts.
        assert!(!results.has_no_results().await.unwrap());

        let (_, actions) = actions_for(site().element(
            NO_RESULTS_MESSAGE,
            MemoryElement::text("There are no products to list in this category."),
        ));
        let results = SearchResultPage::create(actions);
        assert!(results.has_no_results().await.unwrap());
        assert_eq!(results.result_count().await.unwrap(), 0);
    }
}
