use page_objects::PageFactory;
use storefront_core::constants::messages;
use storefront_core::{data, ensure, fixtures, Config, Result, ScenarioData};
use tracing::info;

/// Only rendered in the account menu of a signed-in customer.
pub(crate) const LOGOUT_LINK: &str = "a[href*=\"account/logout\"]";

/// Fields the empty registration form must flag.
const REQUIRED_FIELDS: [&str; 2] = ["firstName", "password"];

pub(super) async fn open_login_page(pages: &PageFactory) -> Result<()> {
    pages.login()?.navigate_to_login_page().await
}

pub(super) async fn log_in_with_valid_credentials(pages: &PageFactory, config: &Config) -> Result<()> {
    pages.home()?.navigate_to_login().await?;
    let login = pages.login()?;
    login
        .login(&config.credentials.email, &config.credentials.password)
        .await?;
    ensure(
        login.is_logged_in().await?,
        format!("{} to be logged in", config.credentials.email),
        "still on the login page",
    )
}

pub(super) async fn log_in(pages: &PageFactory, email: &str, password: &str) -> Result<()> {
    pages.login()?.login(email, password).await
}

pub(super) async fn expect_login_warning(pages: &PageFactory) -> Result<()> {
    let warning = pages.login()?.warning_message().await?;
    ensure(
        warning.as_deref().is_some_and(|text| !text.trim().is_empty()),
        "a login warning",
        "no warning shown",
    )
}

pub(super) async fn expect_logged_out(pages: &PageFactory) -> Result<()> {
    let login = pages.login()?;
    ensure(
        !login.is_logged_in().await?,
        "to remain logged out",
        "the account page",
    )
}

pub(super) async fn open_register_page(pages: &PageFactory) -> Result<()> {
    pages.home()?.navigate_to_register().await
}

pub(super) async fn fill_with_new_user(pages: &PageFactory, data: &mut ScenarioData) -> Result<()> {
    let user = data::random_user();
    pages.register()?.fill_registration_form(&user, false).await?;
    info!(
        "Generated user for registration: {} {} <{}>",
        user.first_name, user.last_name, user.email
    );
    data.registration_details = Some(user);
    Ok(())
}

pub(super) async fn fill_with_existing_account(
    pages: &PageFactory,
    data: &mut ScenarioData,
) -> Result<()> {
    let user = fixtures::existing_account();
    pages.register()?.fill_registration_form(&user, false).await?;
    data.registration_details = Some(user);
    Ok(())
}

pub(super) async fn agree_to_privacy_policy(pages: &PageFactory) -> Result<()> {
    pages.register()?.agree_to_privacy_policy().await
}

pub(super) async fn submit_registration(pages: &PageFactory) -> Result<()> {
    pages.register()?.submit_registration().await
}

pub(super) async fn expect_account_created(pages: &PageFactory) -> Result<()> {
    ensure(
        pages.register()?.is_registration_successful().await?,
        format!("'{}'", messages::ACCOUNT_CREATED),
        "a different heading",
    )
}

pub(super) async fn expect_logged_in(pages: &PageFactory) -> Result<()> {
    let links = pages.actions().count(LOGOUT_LINK).await?;
    ensure(links > 0, "a logout link in the account menu", "none")
}

pub(super) async fn expect_email_already_registered(pages: &PageFactory) -> Result<()> {
    let error = pages.register()?.error_message().await?;
    ensure(
        error
            .as_deref()
            .is_some_and(|text| text.contains(messages::EMAIL_REGISTERED)),
        format!("an error containing '{}'", messages::EMAIL_REGISTERED),
        format!("{error:?}"),
    )
}

pub(super) async fn expect_required_field_errors(pages: &PageFactory) -> Result<()> {
    let errors = pages.register()?.validation_errors().await?;
    ensure(!errors.is_empty(), "field validation errors", "none")?;
    for field in REQUIRED_FIELDS {
        ensure(
            errors.contains_key(field),
            format!("a validation error for {field}"),
            format!("errors for {:?}", errors.keys().collect::<Vec<_>>()),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use browser_driver::memory::MemoryElement;
    use page_objects::pages::login::{EMAIL_INPUT, LOGIN_BUTTON, PASSWORD_INPUT, WARNING_ALERT};
    use page_objects::pages::register::field_error_selector;
    use storefront_core::StorefrontError;

    #[tokio::test]
    async fn invalid_login_warns_and_stays_logged_out() {
        let (page, pages) = factory(
            site()
                .element(EMAIL_INPUT, MemoryElement::input(""))
                .element(PASSWORD_INPUT, MemoryElement::input(""))
                .element(LOGIN_BUTTON, MemoryElement::text("Login"))
                .element(
                    WARNING_ALERT,
                    MemoryElement::text(messages::LOGIN_INVALID),
                ),
        );
        open_login_page(&pages).await.unwrap();
        log_in(&pages, "invalid@test.com", "wrongpassword").await.unwrap();

        expect_login_warning(&pages).await.unwrap();
        expect_logged_out(&pages).await.unwrap();
        assert!(page
            .actions()
            .contains(&format!("fill {EMAIL_INPUT}[0]=invalid@test.com")));
    }

    #[tokio::test]
    async fn empty_form_must_flag_first_name_and_password() {
        let (_page, pages) = factory(
            site()
                .element(
                    &field_error_selector("firstname"),
                    MemoryElement::text("First Name must be between 1 and 32 characters!"),
                )
                .element(
                    &field_error_selector("password"),
                    MemoryElement::text("Password must be between 4 and 20 characters!"),
                ),
        );
        expect_required_field_errors(&pages).await.unwrap();

        let (_page, pages) = factory(site().element(
            &field_error_selector("email"),
            MemoryElement::text("E-Mail Address does not appear to be valid!"),
        ));
        let err = expect_required_field_errors(&pages).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Assertion { .. }));
        assert!(err.to_string().contains("firstName"));
    }

    #[tokio::test]
    async fn logged_in_means_a_logout_link() {
        let (_page, pages) = factory(site().element(LOGOUT_LINK, MemoryElement::text("Logout")));
        expect_logged_in(&pages).await.unwrap();

        let (_page, pages) = factory(site());
        assert!(expect_logged_in(&pages).await.is_err());
    }
}
