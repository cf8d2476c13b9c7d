use crate::action::Action;
use crate::context::ScenarioContext;
use cucumber::{given, then, when};
use storefront_core::Result;

/// Accepted by the store's coupon form, never guaranteed to exist.
const COUPON_CODE: &str = "TEST2023";

#[when("I add the first product to the cart")]
async fn add_first(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::AddFirstResultToCart).await
}

#[given(expr = "I have added an {string} to my cart")]
async fn added_an(world: &mut ScenarioContext, product: String) -> Result<()> {
    world.perform(Action::AddProductToCart { product }).await
}

#[given(expr = "I have added a {string} to my cart")]
async fn added_a(world: &mut ScenarioContext, product: String) -> Result<()> {
    world.perform(Action::AddProductToCart { product }).await
}

#[when("I navigate to the shopping cart")]
async fn navigate_to_cart(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::OpenCart).await
}

#[when("I view my shopping cart")]
async fn view_cart(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::OpenCart).await
}

#[then(expr = "the cart should contain {int} item(s)")]
async fn cart_contains(world: &mut ScenarioContext, count: usize) -> Result<()> {
    world
        .perform(Action::ExpectCartCount {
            count,
            open_cart: true,
        })
        .await
}

#[then(expr = "I should see {int} products in my cart")]
async fn products_in_cart(world: &mut ScenarioContext, count: usize) -> Result<()> {
    world
        .perform(Action::ExpectCartCount {
            count,
            open_cart: false,
        })
        .await
}

#[when(expr = "I update the quantity of the first product to {int}")]
async fn update_quantity(world: &mut ScenarioContext, quantity: u32) -> Result<()> {
    world.perform(Action::UpdateFirstQuantity { quantity }).await
}

#[when(expr = "I update the quantity of the first product to {string}")]
async fn set_quantity(world: &mut ScenarioContext, quantity: String) -> Result<()> {
    world.perform(Action::SetFirstQuantity { quantity }).await
}

#[when("I update the cart")]
async fn update_cart(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::UpdateCart).await
}

#[then("the cart should reflect the updated quantity")]
async fn reflects_quantity(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectUpdatedQuantity).await
}

#[then("the cart total should be recalculated")]
async fn total_recalculated(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectCartTotalRecalculated).await
}

#[then("I should see the updated cart total")]
async fn updated_total(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectPositiveCartTotal).await
}

#[when("I remove the first product from my cart")]
async fn remove_first(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::RemoveFirstProduct).await
}

#[then("I should see the product in my cart")]
async fn product_in_cart(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectProductInCart).await
}

#[then("the cart should be empty")]
async fn cart_empty(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectCartEmpty).await
}

#[then("I should see a message indicating my cart is empty")]
async fn empty_message(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectEmptyCartMessage).await
}

#[when("I apply a valid coupon code")]
async fn apply_coupon(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::ApplyCoupon {
            code: COUPON_CODE.to_string(),
        })
        .await
}

#[when(expr = "I apply the coupon code {string}")]
async fn apply_named_coupon(world: &mut ScenarioContext, code: String) -> Result<()> {
    world.perform(Action::ApplyCoupon { code }).await
}

#[then("I should see the discount applied in the order summary")]
async fn discount_summary(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectDiscountSummary).await
}
