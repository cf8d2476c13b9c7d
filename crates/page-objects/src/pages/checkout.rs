//! The one-page checkout: account option, billing, delivery, payment, confirm.
//!
//! OpenCart renders each section as a collapsible panel with its own
//! "Continue" button; the methods below map onto those buttons.

use crate::base::{BasePage, ELEMENT_TIMEOUT};
use crate::factory::PageObject;
use crate::web_actions::WebActions;
use browser_driver::ElementState;
use storefront_core::constants::{messages, routes};
use storefront_core::{Address, BillingDetails, Result, UserDetails};
use tracing::info;

pub const GUEST_CHECKOUT_OPTION: &str = "input[value=\"guest\"]";
pub const REGISTER_OPTION: &str = "input[value=\"register\"]";
pub const ACCOUNT_CONTINUE_BUTTON: &str = "#button-account";

pub const FIRST_NAME_INPUT: &str = "#input-payment-firstname";
pub const LAST_NAME_INPUT: &str = "#input-payment-lastname";
pub const EMAIL_INPUT: &str = "#input-payment-email";
pub const TELEPHONE_INPUT: &str = "#input-payment-telephone";
pub const ADDRESS1_INPUT: &str = "#input-payment-address-1";
pub const CITY_INPUT: &str = "#input-payment-city";
pub const POSTCODE_INPUT: &str = "#input-payment-postcode";
pub const COUNTRY_SELECT: &str = "#input-payment-country";
pub const REGION_SELECT: &str = "#input-payment-zone";
pub const GUEST_CONTINUE_BUTTON: &str = "#button-guest";

pub const USE_EXISTING_ADDRESS: &str = "input[name=\"payment_address\"][value=\"existing\"]";
pub const PAYMENT_ADDRESS_CONTINUE_BUTTON: &str = "#button-payment-address";
pub const SHIPPING_ADDRESS_CONTINUE_BUTTON: &str = "#button-shipping-address";

pub const SHIPPING_METHODS: &str = "input[name=\"shipping_method\"]";
pub const SHIPPING_METHOD_CONTINUE_BUTTON: &str = "#button-shipping-method";
pub const PAYMENT_METHODS: &str = "input[name=\"payment_method\"]";
pub const TERMS_CHECKBOX: &str = "input[name=\"agree\"]";
pub const PAYMENT_METHOD_CONTINUE_BUTTON: &str = "#button-payment-method";
pub const CONFIRM_ORDER_BUTTON: &str = "#button-confirm";

pub const ORDER_SUCCESS_HEADING: &str = "#content h1";
pub const ORDER_SUCCESS_DETAILS: &str = "#content p";
pub const SUCCESS_ALERT: &str = ".alert-success";

#[derive(Debug, Clone)]
pub struct CheckoutPage {
    actions: WebActions,
}

impl PageObject for CheckoutPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for CheckoutPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl CheckoutPage {
    pub async fn navigate_to_checkout(&self) -> Result<()> {
        self.navigate_to(&routes::path(routes::CHECKOUT)).await
    }

    pub async fn select_guest_checkout(&self) -> Result<()> {
        info!("Checking out as guest");
        self.click(GUEST_CHECKOUT_OPTION).await?;
        self.click(ACCOUNT_CONTINUE_BUTTON).await
    }

    /// Fills the contact half of the guest billing form.
    pub async fn enter_guest_details(&self, user: &UserDetails) -> Result<()> {
        self.wait_for_element(FIRST_NAME_INPUT).await?;
        self.type_text(FIRST_NAME_INPUT, &user.first_name).await?;
        self.type_text(LAST_NAME_INPUT, &user.last_name).await?;
        self.type_text(EMAIL_INPUT, &user.email).await?;
        self.type_text(TELEPHONE_INPUT, &user.telephone).await
    }

    /// Fills the address half of the guest billing form.
    ///
    /// Regions are loaded after the country changes, so the region select is
    /// waited for before choosing one.
    pub async fn enter_billing_address(&self, address: &Address) -> Result<()> {
        self.type_text(ADDRESS1_INPUT, &address.address1).await?;
        self.type_text(CITY_INPUT, &address.city).await?;
        self.type_text(POSTCODE_INPUT, &address.postcode).await?;
        self.actions
            .select_option(COUNTRY_SELECT, &address.country)
            .await?;
        self.actions.settle().await;
        self.actions
            .wait_for_state(REGION_SELECT, ElementState::Visible, ELEMENT_TIMEOUT)
            .await?;
        self.actions
            .select_option(REGION_SELECT, &address.region)
            .await
    }

    pub async fn fill_billing_details(&self, details: &BillingDetails) -> Result<()> {
        info!(
            "Filling billing details for {} {}",
            details.first_name, details.last_name
        );
        let contact = UserDetails {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.clone(),
            telephone: details.telephone.clone(),
            password: String::new(),
        };
        self.enter_guest_details(&contact).await?;
        self.enter_billing_address(&details.address).await
    }

    pub async fn continue_to_delivery_details(&self) -> Result<()> {
        self.click(GUEST_CONTINUE_BUTTON).await
    }

    /// Keeps the preselected delivery address.
    pub async fn continue_with_shipping_address(&self) -> Result<()> {
        self.click(SHIPPING_ADDRESS_CONTINUE_BUTTON).await
    }

    /// Guests whose delivery address is their billing address never see the
    /// delivery-address panel; continue only when it is shown.
    pub async fn use_existing_shipping_address(&self) -> Result<()> {
        if self.is_visible(SHIPPING_ADDRESS_CONTINUE_BUTTON).await? {
            self.continue_with_shipping_address().await?;
        }
        Ok(())
    }

    pub async fn select_default_shipping_method(&self) -> Result<()> {
        self.select_first_choice(SHIPPING_METHODS).await
    }

    pub async fn continue_with_delivery_method(&self) -> Result<()> {
        self.click(SHIPPING_METHOD_CONTINUE_BUTTON).await
    }

    pub async fn select_default_payment_method(&self) -> Result<()> {
        self.select_first_choice(PAYMENT_METHODS).await
    }

    pub async fn agree_to_terms(&self) -> Result<()> {
        self.actions.check(TERMS_CHECKBOX).await
    }

    pub async fn continue_to_payment_method(&self) -> Result<()> {
        self.click(PAYMENT_METHOD_CONTINUE_BUTTON).await
    }

    pub async fn confirm_order(&self) -> Result<()> {
        info!("Confirming order");
        self.click(CONFIRM_ORDER_BUTTON).await?;
        self.wait_for_page_load().await
    }

    pub async fn is_order_successful(&self) -> Result<bool> {
        self.wait_for_element(ORDER_SUCCESS_HEADING).await?;
        let heading = self.get_text(ORDER_SUCCESS_HEADING).await?;
        Ok(heading.contains(messages::ORDER_PLACED))
    }

    /// The order number quoted on the success page, when there is one.
    pub async fn order_number(&self) -> Result<Option<String>> {
        let paragraphs = self.actions.texts(ORDER_SUCCESS_DETAILS).await?;
        Ok(paragraphs.iter().find_map(|p| extract_order_number(p)))
    }

    /// Registered customers reuse their saved payment address.
    pub async fn use_saved_address(&self) -> Result<()> {
        self.wait_for_element(USE_EXISTING_ADDRESS).await?;
        self.actions.check(USE_EXISTING_ADDRESS).await?;
        self.click(PAYMENT_ADDRESS_CONTINUE_BUTTON).await
    }

    /// Radio groups are preselected when the store offers one choice; pick
    /// the first when none is.
    async fn select_first_choice(&self, selector: &str) -> Result<()> {
        if self.actions.count(selector).await? > 0 {
            self.actions.check(selector).await?;
        }
        Ok(())
    }
}

/// Pulls `123` out of text like `Your order ID is #123.`
pub fn extract_order_number(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let anchor = lower.find("order")?;
    let rest = &text[anchor..];
    let start = rest.find(|c: char| c.is_ascii_digit())?;
    let digits: String = rest[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    Some(digits)
}
