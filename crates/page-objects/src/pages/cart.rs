use crate::base::BasePage;
use crate::factory::PageObject;
use crate::pages::login::alert_text;
use crate::web_actions::WebActions;
use storefront_core::constants::routes;
use storefront_core::Result;
use tracing::info;

pub const CART_ROWS: &str = ".table-responsive tbody tr";
pub const PRODUCT_NAMES: &str = ".table-responsive tbody tr td:nth-child(2) a";
pub const PRODUCT_QUANTITIES: &str = "input[name^=\"quantity\"]";
pub const UPDATE_BUTTONS: &str = "button[data-original-title=\"Update\"]";
pub const REMOVE_BUTTONS: &str = "button[data-original-title=\"Remove\"]";
pub const CART_TOTAL: &str = ".table-responsive tfoot tr:last-child td:last-child";
pub const CHECKOUT_BUTTON: &str = ".buttons a[href*=\"checkout/checkout\"]";
pub const CONTINUE_SHOPPING_BUTTON: &str = ".buttons a[href*=\"common/home\"]";
pub const EMPTY_CART_MESSAGE: &str = "#content p";
pub const COUPON_INPUT: &str = "#input-coupon";
pub const APPLY_COUPON_BUTTON: &str = "#button-coupon";
pub const WARNING_ALERT: &str = ".alert-danger";
pub const SUCCESS_ALERT: &str = ".alert-success";

#[derive(Debug, Clone)]
pub struct CartPage {
    actions: WebActions,
}

impl PageObject for CartPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for CartPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl CartPage {
    pub async fn navigate_to_cart(&self) -> Result<()> {
        self.navigate_to(&routes::path(routes::CART)).await
    }

    pub async fn item_count(&self) -> Result<usize> {
        self.actions.count(CART_ROWS).await
    }

    pub async fn product_names(&self) -> Result<Vec<String>> {
        self.actions.texts(PRODUCT_NAMES).await
    }

    /// The value in the `index`-th quantity box.
    pub async fn quantity(&self, index: usize) -> Result<String> {
        self.actions
            .value_nth(PRODUCT_QUANTITIES, index, "Cart item")
            .await
    }

    /// Types a quantity without submitting it.
    pub async fn set_quantity(&self, index: usize, quantity: &str) -> Result<()> {
        self.actions
            .fill_nth(PRODUCT_QUANTITIES, index, quantity, "Cart item")
            .await
    }

    /// Types a quantity and submits that row.
    pub async fn update_quantity(&self, index: usize, quantity: u32) -> Result<()> {
        info!("Setting cart item {} quantity to {}", index, quantity);
        self.set_quantity(index, &quantity.to_string()).await?;
        self.actions
            .click_nth(UPDATE_BUTTONS, index, "Cart item")
            .await
    }

    /// Submits every pending quantity change.
    pub async fn update_cart(&self) -> Result<()> {
        self.actions.click_nth(UPDATE_BUTTONS, 0, "Cart item").await
    }

    pub async fn remove_product(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(REMOVE_BUTTONS, index, "Cart item")
            .await
    }

    pub async fn cart_total(&self) -> Result<String> {
        self.get_text(CART_TOTAL).await
    }

    pub async fn proceed_to_checkout(&self) -> Result<()> {
        self.click(CHECKOUT_BUTTON).await
    }

    pub async fn continue_shopping(&self) -> Result<()> {
        self.click(CONTINUE_SHOPPING_BUTTON).await
    }

    pub async fn empty_cart_message(&self) -> Result<String> {
        self.get_text(EMPTY_CART_MESSAGE).await
    }

    pub async fn is_cart_empty(&self) -> Result<bool> {
        if self.is_visible(EMPTY_CART_MESSAGE).await? {
            return Ok(self.empty_cart_message().await?.contains("empty"));
        }
        Ok(false)
    }

    pub async fn apply_coupon(&self, code: &str) -> Result<()> {
        info!("Applying coupon {}", code);
        self.type_text(COUPON_INPUT, code).await?;
        self.click(APPLY_COUPON_BUTTON).await
    }

    pub async fn warning_message(&self) -> Result<Option<String>> {
        alert_text(self, WARNING_ALERT).await
    }

    pub async fn success_message(&self) -> Result<Option<String>> {
        alert_text(self, SUCCESS_ALERT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money;
    use crate::test_support::{actions_for, site};
    use browser_driver::memory::MemoryElement;
    use storefront_core::StorefrontError;

    fn cart_site() -> browser_driver::memory::MemorySite {
        site()
            .element(CART_ROWS, MemoryElement::text(""))
            .element(PRODUCT_NAMES, MemoryElement::text("iPhone"))
            .element(PRODUCT_QUANTITIES, MemoryElement::input("1"))
            .element(UPDATE_BUTTONS, MemoryElement::text(""))
            .element(REMOVE_BUTTONS, MemoryElement::text(""))
            .element(CART_TOTAL, MemoryElement::text("$123.20"))
            .element(COUPON_INPUT, MemoryElement::input(""))
            .element(APPLY_COUPON_BUTTON, MemoryElement::text(""))
            .element(
                WARNING_ALERT,
                MemoryElement::text("Warning: Coupon is either invalid, expired or reached its usage limit!"),
            )
    }

    #[tokio::test]
    async fn quantity_updates_are_submitted_per_row() {
        let (page, actions) = actions_for(cart_site());
        let cart = CartPage::create(actions);

        cart.update_quantity(0, 2).await.unwrap();
        assert_eq!(cart.quantity(0).await.unwrap(), "2");
        assert_eq!(
            page.actions(),
            vec![
                format!("fill {PRODUCT_QUANTITIES}[0]=2"),
                format!("click {UPDATE_BUTTONS}[0]"),
            ]
        );

        let err = cart.remove_product(1).await.unwrap_err();
        assert!(matches!(err, StorefrontError::IndexOutOfRange { index: 1, len: 1, .. }));
    }

    #[tokio::test]
    async fn unknown_coupon_leaves_a_well_formed_total() {
        let (_, actions) = actions_for(cart_site());
        let cart = CartPage::create(actions);

        cart.apply_coupon("TEST2023").await.unwrap();
        assert!(cart.warning_message().await.unwrap().is_some());

        let total = cart.cart_total().await.unwrap();
        assert!(total.chars().any(|c| c.is_ascii_digit()));
        assert_eq!(money::parse_price(&total), Some(123.2));
        assert_eq!(cart.product_names().await.unwrap(), vec!["iPhone"]);
        assert!(!cart.is_cart_empty().await.unwrap());
    }

    #[tokio::test]
    async fn empty_cart_is_detected_from_the_message() {
        let (_, actions) = actions_for(
            site().element(EMPTY_CART_MESSAGE, MemoryElement::text("Your shopping cart is empty!")),
        );
        let cart = CartPage::create(actions);
        assert!(cart.is_cart_empty().await.unwrap());
        assert_eq!(cart.item_count().await.unwrap(), 0);
    }
}
