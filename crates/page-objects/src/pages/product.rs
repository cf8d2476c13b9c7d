use crate::base::BasePage;
use crate::factory::PageObject;
use crate::pages::login::alert_text;
use crate::web_actions::WebActions;
use storefront_core::constants::routes;
use storefront_core::Result;
use tracing::info;

pub const PRODUCT_TITLE: &str = "h1";
pub const PRODUCT_PRICE: &str = ".price-new, .price:not(.price-new)";
pub const QUANTITY_INPUT: &str = "#input-quantity";
pub const ADD_TO_CART_BUTTON: &str = "#button-cart";
pub const DESCRIPTION_TAB: &str = "a[href=\"#tab-description\"]";
pub const SPECIFICATION_TAB: &str = "a[href=\"#tab-specification\"]";
pub const REVIEWS_TAB: &str = "a[href=\"#tab-review\"]";
pub const REVIEW_AUTHOR_INPUT: &str = "#input-name";
pub const REVIEW_TEXT_INPUT: &str = "#input-review";
pub const RATING_INPUTS: &str = "input[name=\"rating\"]";
pub const SUBMIT_REVIEW_BUTTON: &str = "#button-review";
pub const SUCCESS_ALERT: &str = ".alert-success";
pub const WARNING_ALERT: &str = ".alert-danger";
pub const RELATED_PRODUCTS: &str = ".product-related .product-layout";
pub const WISHLIST_BUTTON: &str = "button[data-original-title=\"Add to Wish List\"]";
pub const COMPARE_BUTTON: &str = "button[data-original-title=\"Compare this Product\"]";

#[derive(Debug, Clone)]
pub struct ProductPage {
    actions: WebActions,
}

impl PageObject for ProductPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for ProductPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl ProductPage {
    pub async fn navigate_to_product(&self, product_id: u32) -> Result<()> {
        let path = format!("{}&product_id={product_id}", routes::path(routes::PRODUCT));
        self.navigate_to(&path).await
    }

    pub async fn product_title(&self) -> Result<String> {
        self.get_text(PRODUCT_TITLE).await
    }

    pub async fn product_price(&self) -> Result<String> {
        self.get_text(PRODUCT_PRICE).await
    }

    /// Quantity 1 is the form default and is left untouched.
    pub async fn add_to_cart(&self, quantity: u32) -> Result<()> {
        if quantity > 1 {
            self.type_text(QUANTITY_INPUT, &quantity.to_string()).await?;
        }
        self.click(ADD_TO_CART_BUTTON).await
    }

    pub async fn click_description_tab(&self) -> Result<()> {
        self.click(DESCRIPTION_TAB).await
    }

    pub async fn click_specification_tab(&self) -> Result<()> {
        self.click(SPECIFICATION_TAB).await
    }

    pub async fn click_reviews_tab(&self) -> Result<()> {
        self.click(REVIEWS_TAB).await
    }

    /// Submits a review; `rating` is clamped to 1..=5.
    pub async fn submit_review(&self, name: &str, text: &str, rating: u8) -> Result<()> {
        info!("Submitting a {}-star review as {}", rating, name);
        self.click_reviews_tab().await?;
        self.type_text(REVIEW_AUTHOR_INPUT, name).await?;
        self.type_text(REVIEW_TEXT_INPUT, text).await?;
        self.actions
            .click_nth(RATING_INPUTS, rating_index(rating), "Rating")
            .await?;
        self.click(SUBMIT_REVIEW_BUTTON).await
    }

    pub async fn success_message(&self) -> Result<Option<String>> {
        alert_text(self, SUCCESS_ALERT).await
    }

    pub async fn warning_message(&self) -> Result<Option<String>> {
        alert_text(self, WARNING_ALERT).await
    }

    pub async fn add_to_wishlist(&self) -> Result<()> {
        self.click(WISHLIST_BUTTON).await
    }

    pub async fn add_to_compare(&self) -> Result<()> {
        self.click(COMPARE_BUTTON).await
    }

    pub async fn related_products_count(&self) -> Result<usize> {
        self.actions.count(RELATED_PRODUCTS).await
    }
}

fn rating_index(rating: u8) -> usize {
    usize::from(rating.clamp(1, 5)) - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actions_for, site};
    use browser_driver::memory::MemoryElement;

    #[test]
    fn ratings_are_clamped() {
        assert_eq!(rating_index(0), 0);
        assert_eq!(rating_index(3), 2);
        assert_eq!(rating_index(9), 4);
    }

    #[tokio::test]
    async fn quantity_is_only_typed_above_one() {
        let (page, actions) = actions_for(
            site()
                .element(QUANTITY_INPUT, MemoryElement::input("1"))
                .element(ADD_TO_CART_BUTTON, MemoryElement::text("Add to Cart")),
        );
        let product = ProductPage::create(actions);

        product.add_to_cart(1).await.unwrap();
        product.add_to_cart(3).await.unwrap();
        assert_eq!(
            page.actions(),
            vec![
                format!("click {ADD_TO_CART_BUTTON}[0]"),
                format!("fill {QUANTITY_INPUT}[0]=3"),
                format!("click {ADD_TO_CART_BUTTON}[0]"),
            ]
        );
    }

    #[tokio::test]
    async fn navigates_by_product_id() {
        let (page, actions) = actions_for(site().element(PRODUCT_TITLE, MemoryElement::text("iPhone")));
        let product = ProductPage::create(actions);

        product.navigate_to_product(40).await.unwrap();
        assert_eq!(
            page.actions(),
            vec!["goto https://shop.test/?route=product/product&product_id=40"]
        );
        assert_eq!(product.product_title().await.unwrap(), "iPhone");
    }
}
