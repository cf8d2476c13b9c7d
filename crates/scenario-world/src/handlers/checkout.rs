use page_objects::pages::checkout::USE_EXISTING_ADDRESS;
use page_objects::{BasePage, PageFactory};
use storefront_core::constants::routes;
use storefront_core::{data, ensure, BillingDetails, Result, ScenarioData, StorefrontError};
use tracing::info;

pub(super) async fn proceed(pages: &PageFactory) -> Result<()> {
    pages.cart()?.proceed_to_checkout().await
}

pub(super) async fn choose_guest(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.select_guest_checkout().await
}

pub(super) async fn fill_billing_details(
    pages: &PageFactory,
    data: &mut ScenarioData,
    details: BillingDetails,
) -> Result<()> {
    pages.checkout()?.fill_billing_details(&details).await?;
    data.billing_details = Some(details);
    Ok(())
}

pub(super) async fn continue_to_delivery_details(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.continue_to_delivery_details().await
}

pub(super) async fn continue_with_delivery_method(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.continue_with_delivery_method().await
}

pub(super) async fn agree_to_terms(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.agree_to_terms().await
}

pub(super) async fn continue_to_payment_method(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.continue_to_payment_method().await
}

pub(super) async fn confirm_order(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.confirm_order().await
}

pub(super) async fn expect_confirmation(pages: &PageFactory) -> Result<()> {
    let checkout = pages.checkout()?;
    let placed = checkout.is_order_successful().await?;
    ensure(placed, "an order confirmation", checkout.current_url().await?)
}

pub(super) async fn continue_with_saved_address(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.use_saved_address().await
}

pub(super) async fn expect_order_in_history(pages: &PageFactory, data: &ScenarioData) -> Result<()> {
    let checkout = pages.checkout()?;
    checkout
        .navigate_to(&routes::path(routes::ORDER_HISTORY))
        .await?;
    info!("Opened order history (last order: {:?})", data.order_number);
    let url = checkout.current_url().await?;
    ensure(
        url.contains(routes::ORDER_HISTORY),
        "the order history page",
        url,
    )
}

pub(super) async fn enter_customer_details(pages: &PageFactory, data: &mut ScenarioData) -> Result<()> {
    let user = data::random_user();
    pages.checkout()?.enter_guest_details(&user).await?;
    data.guest_user = Some(user);
    Ok(())
}

/// Reuses an address stored earlier in the scenario, else invents one.
pub(super) async fn enter_billing_address(pages: &PageFactory, data: &mut ScenarioData) -> Result<()> {
    let address = data.address.clone().unwrap_or_else(data::random_address);
    let checkout = pages.checkout()?;
    checkout.enter_billing_address(&address).await?;
    checkout.continue_to_delivery_details().await?;
    data.address = Some(address);
    Ok(())
}

pub(super) async fn enter_shipping_address(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.use_existing_shipping_address().await
}

pub(super) async fn select_shipping_method(pages: &PageFactory) -> Result<()> {
    let checkout = pages.checkout()?;
    checkout.select_default_shipping_method().await?;
    checkout.continue_with_delivery_method().await
}

pub(super) async fn select_payment_method(pages: &PageFactory) -> Result<()> {
    let checkout = pages.checkout()?;
    checkout.select_default_payment_method().await?;
    checkout.agree_to_terms().await?;
    checkout.continue_to_payment_method().await
}

/// Customers with a saved address reuse it; guests get a generated one.
pub(super) async fn confirm_billing_details(pages: &PageFactory, data: &mut ScenarioData) -> Result<()> {
    let checkout = pages.checkout()?;
    if data.registration_details.is_some() || checkout.is_visible(USE_EXISTING_ADDRESS).await? {
        return checkout.use_saved_address().await;
    }

    let user = data::random_user();
    let address = data::random_address();
    let details = BillingDetails {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        telephone: user.telephone,
        address: address.clone(),
    };
    checkout.fill_billing_details(&details).await?;
    checkout.continue_to_delivery_details().await?;
    data.address = Some(address);
    data.billing_details = Some(details);
    Ok(())
}

pub(super) async fn confirm_delivery_details(pages: &PageFactory) -> Result<()> {
    pages.checkout()?.continue_with_shipping_address().await
}

pub(super) async fn expect_order_number(pages: &PageFactory, data: &mut ScenarioData) -> Result<()> {
    let number = pages
        .checkout()?
        .order_number()
        .await?
        .ok_or_else(|| StorefrontError::assertion("an order number", "none on the page"))?;
    info!("Order confirmed with number {}", number);
    data.order_number = Some(number);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use browser_driver::memory::MemoryElement;
    use page_objects::pages::checkout::{ORDER_SUCCESS_DETAILS, ORDER_SUCCESS_HEADING};

    #[tokio::test]
    async fn order_number_is_stored_for_later_steps() {
        let (_page, pages) = factory(
            site()
                .element(
                    ORDER_SUCCESS_HEADING,
                    MemoryElement::text("Your order has been placed!"),
                )
                .elements(
                    ORDER_SUCCESS_DETAILS,
                    [
                        MemoryElement::text("Your order has been successfully processed!"),
                        MemoryElement::text("Your order ID is #2045."),
                    ],
                ),
        );
        let mut data = ScenarioData::default();

        expect_confirmation(&pages).await.unwrap();
        expect_order_number(&pages, &mut data).await.unwrap();
        assert_eq!(data.order_number.as_deref(), Some("2045"));
    }

    #[tokio::test]
    async fn missing_order_number_fails_the_step() {
        let (_page, pages) = factory(site());
        let mut data = ScenarioData::default();
        let err = expect_order_number(&pages, &mut data).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Assertion { .. }));
        assert!(data.order_number.is_none());
    }
}
