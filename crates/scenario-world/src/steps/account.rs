use crate::action::Action;
use crate::context::ScenarioContext;
use cucumber::{given, then, when};
use storefront_core::Result;

#[when("I navigate to the register page")]
async fn register_page(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::OpenRegisterPage).await
}

#[when("I fill in the registration form with valid details")]
async fn valid_details(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::FillRegistrationWithValidDetails).await
}

#[when("I fill in the registration form with an existing email")]
async fn existing_email(world: &mut ScenarioContext) -> Result<()> {
    world
        .perform(Action::FillRegistrationWithExistingEmail)
        .await
}

#[when("I agree to the privacy policy")]
async fn privacy_policy(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::AgreeToPrivacyPolicy).await
}

#[when("I submit the registration form")]
async fn submit(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::SubmitRegistration).await
}

#[when("I submit the registration form without filling it")]
async fn submit_empty(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::SubmitRegistration).await
}

#[then("I should see a confirmation that my account has been created")]
async fn account_created(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectAccountCreated).await
}

#[then("I should be logged in")]
async fn logged_in(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectLoggedIn).await
}

#[then("I should see an error message that the email is already registered")]
async fn already_registered(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectEmailAlreadyRegistered).await
}

#[then("I should see validation errors for required fields")]
async fn required_fields(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectRequiredFieldErrors).await
}

#[given("I am on the login page")]
async fn login_page(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::OpenLoginPage).await
}

#[when(expr = "I log in with {string} and {string}")]
async fn log_in(world: &mut ScenarioContext, email: String, password: String) -> Result<()> {
    world.perform(Action::LogIn { email, password }).await
}

#[then("I should see a login warning")]
async fn login_warning(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectLoginWarning).await
}

#[then("I should not be logged in")]
async fn not_logged_in(world: &mut ScenarioContext) -> Result<()> {
    world.perform(Action::ExpectLoggedOut).await
}
