use crate::base::BasePage;
use crate::factory::PageObject;
use crate::web_actions::WebActions;
use storefront_core::constants::routes;
use storefront_core::Result;
use tracing::info;

pub const EMAIL_INPUT: &str = "#input-email";
pub const PASSWORD_INPUT: &str = "#input-password";
pub const LOGIN_BUTTON: &str = "input[type=\"submit\"][value=\"Login\"]";
pub const FORGOT_PASSWORD_LINK: &str = "a[href*=\"account/forgotten\"]";
pub const WARNING_ALERT: &str = ".alert-danger";
pub const SUCCESS_ALERT: &str = ".alert-success";
pub const REGISTER_ACCOUNT_LINK: &str = "a[href*=\"account/register\"]";

#[derive(Debug, Clone)]
pub struct LoginPage {
    actions: WebActions,
}

impl PageObject for LoginPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for LoginPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl LoginPage {
    pub async fn navigate_to_login_page(&self) -> Result<()> {
        self.navigate_to(&routes::path(routes::LOGIN)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        info!("Logging in as {}", email);
        self.type_text(EMAIL_INPUT, email).await?;
        self.type_text(PASSWORD_INPUT, password).await?;
        self.click(LOGIN_BUTTON).await
    }

    pub async fn click_forgotten_password(&self) -> Result<()> {
        self.click(FORGOT_PASSWORD_LINK).await
    }

    pub async fn click_register_account(&self) -> Result<()> {
        self.click(REGISTER_ACCOUNT_LINK).await
    }

    pub async fn warning_message(&self) -> Result<Option<String>> {
        alert_text(self, WARNING_ALERT).await
    }

    pub async fn success_message(&self) -> Result<Option<String>> {
        alert_text(self, SUCCESS_ALERT).await
    }

    /// A successful login lands on the account page.
    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.current_url().await?.contains(routes::ACCOUNT))
    }
}

/// Text of `selector` if it shows up within the visibility probe.
pub(crate) async fn alert_text<P: BasePage + ?Sized>(page: &P, selector: &str) -> Result<Option<String>> {
    if page.is_visible(selector).await? {
        Ok(Some(page.get_text(selector).await?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actions_for, site};
    use browser_driver::memory::MemoryElement;
    use storefront_core::fixtures;

    #[tokio::test]
    async fn invalid_credentials_show_a_warning_and_stay_logged_out() {
        let invalid = fixtures::users().invalid;
        let (page, actions) = actions_for(
            site()
                .element(EMAIL_INPUT, MemoryElement::input(""))
                .element(PASSWORD_INPUT, MemoryElement::input(""))
                .element(LOGIN_BUTTON, MemoryElement::text(""))
                .element(
                    WARNING_ALERT,
                    MemoryElement::text(" Warning: No match for E-Mail Address and/or Password."),
                )
                .navigate_on_click(LOGIN_BUTTON, "https://shop/index.php?route=account/login"),
        );
        let login = LoginPage::create(actions);

        login.login(&invalid.email, &invalid.password).await.unwrap();

        let warning = login.warning_message().await.unwrap().unwrap();
        assert!(warning.starts_with("Warning: No match"));
        assert!(!login.is_logged_in().await.unwrap());
        assert_eq!(
            page.elements(PASSWORD_INPUT)[0].value,
            "wrongpassword".to_string()
        );
    }

    #[tokio::test]
    async fn valid_login_lands_on_the_account_page() {
        let (_, actions) = actions_for(
            site()
                .element(EMAIL_INPUT, MemoryElement::input(""))
                .element(PASSWORD_INPUT, MemoryElement::input(""))
                .element(LOGIN_BUTTON, MemoryElement::text(""))
                .navigate_on_click(LOGIN_BUTTON, "https://shop/index.php?route=account/account"),
        );
        let login = LoginPage::create(actions);

        login.login("test@test.com", "test123").await.unwrap();
        assert!(login.is_logged_in().await.unwrap());
        assert_eq!(login.success_message().await.unwrap(), None);
    }
}
