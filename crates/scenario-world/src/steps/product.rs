use crate::action::{Action, SuccessKind};
use crate::context::ScenarioContext;
use cucumber::{given, then, when};
use storefront_core::Result;

#[given(expr = "I am on the product page for product {int}")]
async fn product_page(world: &mut ScenarioContext, id: u32) -> Result<()> {
    world.perform(Action::OpenProduct { id }).await
}

#[when(expr = "I add {int} of this product to my cart")]
async fn add_quantity(world: &mut ScenarioContext, quantity: u32) -> Result<()> {
    world.perform(Action::AddToCartFromProduct { quantity }).await
}

#[then(expr = "the product title should contain {string}")]
async fn title_contains(world: &mut ScenarioContext, text: String) -> Result<()> {
    world.perform(Action::ExpectProductTitle { text }).await
}

#[when(expr = "I write a {int} star review as {string} saying {string}")]
async fn write_review(
    world: &mut ScenarioContext,
    rating: u8,
    author: String,
    text: String,
) -> Result<()> {
    world
        .perform(Action::SubmitReview {
            author,
            text,
            rating,
        })
        .await
}

#[then("I should see a confirmation that my review was received")]
async fn review_received(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::ExpectSuccessMessage(SuccessKind::Review))
        .await
}
