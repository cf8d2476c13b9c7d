use super::table_hashes;
use crate::action::{Action, ComparisonEntry, SuccessKind};
use crate::context::ScenarioContext;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use storefront_core::{Result, StorefrontError};

#[when("I add the first product to the comparison")]
async fn add_first(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::AddFirstResultToComparison).await
}

#[then("I should see success messages for comparison")]
async fn comparison_message(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::ExpectSuccessMessage(SuccessKind::Comparison))
        .await
}

#[given("I have added the following products to comparison:")]
async fn add_products(world: &mut ScenarioContext, step: &Step) -> Result<()> {
    let entries = table_hashes(step)?
        .into_iter()
        .map(|row| {
            let search_term = row.get("search term").cloned().unwrap_or_default();
            let index = row
                .get("product index")
                .and_then(|index| index.parse().ok())
                .ok_or_else(|| {
                    StorefrontError::misuse(format!(
                        "comparison row for '{search_term}' needs a numeric product index"
                    ))
                })?;
            Ok(ComparisonEntry { search_term, index })
        })
        .collect::<Result<Vec<_>>>()?;
    world.perform(Action::AddProductsToComparison(entries)).await
}

#[when("I navigate to the product comparison page")]
async fn open_comparison(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::OpenComparison).await
}

#[then("I should see both products in the comparison table")]
async fn both_products(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::ExpectComparisonCount { count: 2 })
        .await
}

#[then("I should see product details for comparison")]
async fn product_details(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectComparisonDetails).await
}

#[when("I add the first product from comparison to the cart")]
async fn compared_to_cart(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::AddFirstComparedToCart).await
}
