use crate::base::BasePage;
use crate::factory::PageObject;
use crate::web_actions::WebActions;
use storefront_core::constants::routes;
use storefront_core::Result;

pub const COMPARISON_TABLE: &str = "#content table";
pub const PRODUCT_NAMES: &str = "#content table tr:nth-child(1) td a strong";
pub const PRODUCT_PRICES: &str = "#content table tr:nth-child(3) td:not(:first-child)";
pub const ADD_TO_CART_BUTTONS: &str = "#content table .btn-primary";
pub const REMOVE_BUTTONS: &str = "#content table .btn-danger";
pub const EMPTY_COMPARISON_MESSAGE: &str = "#content p";

#[derive(Debug, Clone)]
pub struct ComparisonPage {
    actions: WebActions,
}

impl PageObject for ComparisonPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for ComparisonPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl ComparisonPage {
    pub async fn navigate_to_comparison(&self) -> Result<()> {
        self.navigate_to(&routes::path(routes::COMPARE)).await
    }

    pub async fn is_table_visible(&self) -> Result<bool> {
        self.is_visible(COMPARISON_TABLE).await
    }

    pub async fn product_count(&self) -> Result<usize> {
        Ok(self.product_names().await?.len())
    }

    pub async fn product_names(&self) -> Result<Vec<String>> {
        if self.is_visible(PRODUCT_NAMES).await? {
            return self.actions.texts(PRODUCT_NAMES).await;
        }
        Ok(Vec::new())
    }

    pub async fn product_prices(&self) -> Result<Vec<String>> {
        self.actions.texts(PRODUCT_PRICES).await
    }

    pub async fn add_to_cart_by_index(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(ADD_TO_CART_BUTTONS, index, "Compared product")
            .await
    }

    pub async fn remove_product_by_index(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(REMOVE_BUTTONS, index, "Compared product")
            .await
    }

    pub async fn is_comparison_empty(&self) -> Result<bool> {
        if self.is_visible(EMPTY_COMPARISON_MESSAGE).await? {
            let message = self.get_text(EMPTY_COMPARISON_MESSAGE).await?;
            return Ok(message.contains("no products")
                || message.contains("not chosen any products"));
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actions_for, site};
    use browser_driver::memory::MemoryElement;

    #[tokio::test]
    async fn lists_compared_products() {
        let (page, actions) = actions_for(
            site()
                .element(COMPARISON_TABLE, MemoryElement::text(""))
                .elements(
                    PRODUCT_NAMES,
                    [MemoryElement::text("iPhone"), MemoryElement::text("MacBook")],
                )
                .elements(
                    ADD_TO_CART_BUTTONS,
                    [MemoryElement::text("Add to Cart"), MemoryElement::text("Add to Cart")],
                ),
        );
        let comparison = ComparisonPage::create(actions);

        assert!(comparison.is_table_visible().await.unwrap());
        assert_eq!(comparison.product_count().await.unwrap(), 2);
        comparison.add_to_cart_by_index(0).await.unwrap();
        assert_eq!(page.actions(), vec![format!("click {ADD_TO_CART_BUTTONS}[0]")]);
    }

    #[tokio::test]
    async fn empty_comparison_has_no_products() {
        let (_, actions) = actions_for(site().element(
            EMPTY_COMPARISON_MESSAGE,
            MemoryElement::text("You have not chosen any products to compare."),
        ));
        let comparison = ComparisonPage::create(actions);

        assert_eq!(comparison.product_count().await.unwrap(), 0);
        assert!(comparison.is_comparison_empty().await.unwrap());
    }
}
