use super::first_row;
use crate::action::Action;
use crate::context::ScenarioContext;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use storefront_core::{BillingDetails, Result};

#[when("I proceed to checkout")]
async fn proceed(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ProceedToCheckout).await
}

#[when("I choose to checkout as a guest")]
async fn as_a_guest(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ChooseGuestCheckout).await
}

#[when("I choose to checkout as guest")]
async fn as_guest(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ChooseGuestCheckout).await
}

#[when("I fill in the following billing details:")]
async fn billing_details(world: &mut ScenarioContext, step: &Step) -> Result<()> {
    let row = first_row(step)?;
    let details = BillingDetails::from_row(|key| row.get(key).map(String::as_str));
    world.perform(Action::FillBillingDetails(details)).await
}

#[when("I continue to the delivery details")]
async fn to_delivery_details(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ContinueToDeliveryDetails).await
}

#[when("I continue with the default delivery method")]
async fn default_delivery_method(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ContinueWithDeliveryMethod).await
}

#[when("I confirm my delivery method")]
async fn confirm_delivery_method(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ContinueWithDeliveryMethod).await
}

#[when("I agree to the terms and conditions")]
async fn agree_to_terms(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::AgreeToTerms).await
}

#[when("I continue to the payment method")]
async fn to_payment_method(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ContinueToPaymentMethod).await
}

#[when("I confirm the order")]
async fn confirm_the_order(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ConfirmOrder).await
}

#[when("I confirm my order")]
async fn confirm_my_order(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ConfirmOrder).await
}

#[then("I should see an order confirmation")]
async fn order_confirmation(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectOrderConfirmation).await
}

#[then("I should see a confirmation that my order has been placed")]
async fn order_placed(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectOrderConfirmation).await
}

#[given("I am logged in with valid credentials")]
async fn logged_in(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::LogInWithValidCredentials).await
}

#[when("I continue with my saved address")]
async fn saved_address(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ContinueWithSavedAddress).await
}

#[then("I should see the order in my order history")]
async fn order_history(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectOrderInHistory).await
}

#[when("I enter my customer details")]
async fn customer_details(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::EnterCustomerDetails).await
}

#[when("I enter my billing address")]
async fn billing_address(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::EnterBillingAddress).await
}

#[when("I enter my shipping address")]
async fn shipping_address(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::EnterShippingAddress).await
}

#[when("I select a shipping method")]
async fn shipping_method(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::SelectShippingMethod).await
}

#[when("I select a payment method")]
async fn payment_method(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::SelectPaymentMethod).await
}

#[when("I confirm my billing details")]
async fn confirm_billing(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ConfirmBillingDetails).await
}

#[when("I confirm my delivery details")]
async fn confirm_delivery(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ConfirmDeliveryDetails).await
}

#[then("I should see an order number")]
async fn order_number(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectOrderNumber).await
}
