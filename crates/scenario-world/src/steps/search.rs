use super::first_row;
use crate::action::{Action, SuccessKind};
use crate::context::ScenarioContext;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use page_objects::pages::search_result::SORT_PRICE_HIGH_TO_LOW;
use storefront_core::Result;

#[given("I am on the OpenCart homepage")]
async fn on_homepage(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::OpenHomepage).await
}

#[when("I return to the homepage")]
async fn return_to_homepage(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ReturnToHomepage).await
}

#[when(expr = "I search for {string}")]
async fn search_for(world: &mut ScenarioContext, term: String) -> Result<()> {
    world.perform(Action::Search { term }).await
}

#[when("I search with the following criteria:")]
async fn search_with_criteria(world: &mut ScenarioContext, step: &Step) -> Result<()> {
    let criteria = first_row(step)?;
    let keyword = criteria.get("keyword").cloned().unwrap_or_default();
    let in_description = criteria
        .get("description")
        .is_some_and(|value| value == "true");
    world
        .perform(Action::SearchWithCriteria {
            keyword,
            in_description,
        })
        .await
}

#[then("I should see search results")]
async fn see_results(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectSearchResults).await
}

#[then(expr = "I should see search results containing {string}")]
async fn see_results_containing(world: &mut ScenarioContext, keyword: String) -> Result<()> {
    world.perform(Action::ExpectResultsContaining { keyword }).await
}

#[then(expr = "the search results should contain {string}")]
async fn results_contain(world: &mut ScenarioContext, keyword: String) -> Result<()> {
    world.perform(Action::ExpectResultsContaining { keyword }).await
}

#[then(expr = "I should see at least {int} product(s) in the results")]
async fn see_at_least(world: &mut ScenarioContext, count: usize) -> Result<()> {
    world.perform(Action::ExpectAtLeastResults { count }).await
}

#[when("I sort the products from high to low price")]
async fn sort_high_to_low(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::SortBy {
            label: SORT_PRICE_HIGH_TO_LOW.to_string(),
        })
        .await
}

#[when(expr = "I sort products by {string}")]
async fn sort_by(world: &mut ScenarioContext, label: String) -> Result<()> {
    world.perform(Action::SortBy { label }).await
}

#[then("products should be displayed in ascending price order")]
async fn ascending_prices(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectAscendingPrices).await
}

#[when(expr = "I change the display limit to {string}")]
async fn display_limit(world: &mut ScenarioContext, limit: String) -> Result<()> {
    world.perform(Action::SetDisplayLimit { limit }).await
}

#[then(expr = "the page should display up to {int} products per page")]
async fn at_most_per_page(world: &mut ScenarioContext, limit: usize) -> Result<()> {
    world.perform(Action::ExpectAtMostResults { limit }).await
}

#[then("I should see a success message")]
async fn success_message(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::ExpectSuccessMessage(SuccessKind::Any))
        .await
}

#[then("I should see a success message that the product was added")]
async fn added_message(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::ExpectSuccessMessage(SuccessKind::AddedToCart))
        .await
}
