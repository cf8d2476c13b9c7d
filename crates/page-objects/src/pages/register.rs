use crate::base::BasePage;
use crate::factory::PageObject;
use crate::web_actions::WebActions;
use std::collections::BTreeMap;
use storefront_core::constants::{messages, routes};
use storefront_core::{Result, UserDetails};
use tracing::info;

pub const FIRST_NAME_INPUT: &str = "#input-firstname";
pub const LAST_NAME_INPUT: &str = "#input-lastname";
pub const EMAIL_INPUT: &str = "#input-email";
pub const TELEPHONE_INPUT: &str = "#input-telephone";
pub const PASSWORD_INPUT: &str = "#input-password";
pub const CONFIRM_PASSWORD_INPUT: &str = "#input-confirm";
pub const PRIVACY_POLICY_CHECKBOX: &str = "input[name=\"agree\"]";
pub const CONTINUE_BUTTON: &str = "input[type=\"submit\"][value=\"Continue\"]";
pub const NEWSLETTER_YES: &str = "input[name=\"newsletter\"][value=\"1\"]";
pub const NEWSLETTER_NO: &str = "input[name=\"newsletter\"][value=\"0\"]";
pub const SUCCESS_HEADING: &str = "#content h1";
pub const ERROR_ALERT: &str = ".alert-danger";

/// Form fields that can carry a validation error, keyed the way the form
/// names them.
pub const VALIDATED_FIELDS: [(&str, &str); 6] = [
    ("firstName", "firstname"),
    ("lastName", "lastname"),
    ("email", "email"),
    ("telephone", "telephone"),
    ("password", "password"),
    ("confirmPassword", "confirm"),
];

/// Selector of the error shown under `#input-<field>`.
pub fn field_error_selector(field: &str) -> String {
    format!("#input-{field} + .text-danger")
}

#[derive(Debug, Clone)]
pub struct RegisterPage {
    actions: WebActions,
}

impl PageObject for RegisterPage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for RegisterPage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl RegisterPage {
    pub async fn navigate_to_register(&self) -> Result<()> {
        self.navigate_to(&routes::path(routes::REGISTER)).await
    }

    pub async fn fill_registration_form(&self, user: &UserDetails, subscribe: bool) -> Result<()> {
        info!("Registering {} {} <{}>", user.first_name, user.last_name, user.email);
        self.type_text(FIRST_NAME_INPUT, &user.first_name).await?;
        self.type_text(LAST_NAME_INPUT, &user.last_name).await?;
        self.type_text(EMAIL_INPUT, &user.email).await?;
        self.type_text(TELEPHONE_INPUT, &user.telephone).await?;
        self.type_text(PASSWORD_INPUT, &user.password).await?;
        self.type_text(CONFIRM_PASSWORD_INPUT, &user.password).await?;
        self.click(if subscribe { NEWSLETTER_YES } else { NEWSLETTER_NO })
            .await
    }

    pub async fn agree_to_privacy_policy(&self) -> Result<()> {
        self.actions.check(PRIVACY_POLICY_CHECKBOX).await
    }

    pub async fn submit_registration(&self) -> Result<()> {
        self.click(CONTINUE_BUTTON).await
    }

    pub async fn is_registration_successful(&self) -> Result<bool> {
        self.wait_for_element(SUCCESS_HEADING).await?;
        let heading = self.get_text(SUCCESS_HEADING).await?;
        Ok(heading.contains(messages::ACCOUNT_CREATED))
    }

    /// Page-level error, e.g. an email that is already registered.
    pub async fn error_message(&self) -> Result<Option<String>> {
        crate::pages::login::alert_text(self, ERROR_ALERT).await
    }

    /// Every visible field error, keyed `firstName`, `lastName`, `email`,
    /// `telephone`, `password`, `confirmPassword`.
    pub async fn validation_errors(&self) -> Result<BTreeMap<&'static str, String>> {
        let mut errors = BTreeMap::new();
        for (key, field) in VALIDATED_FIELDS {
            if let Some(message) = self.field_error(field).await? {
                errors.insert(key, message);
            }
        }
        Ok(errors)
    }

    /// The error under `#input-<field>`, if one is shown.
    ///
    /// Errors are rendered with the page after a submit, so a missing one is
    /// not waited for.
    pub async fn field_error(&self, field: &str) -> Result<Option<String>> {
        let selector = field_error_selector(field);
        if self.actions.count(&selector).await? == 0 {
            return Ok(None);
        }
        Ok(self.actions.texts(&selector).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actions_for, site};
    use browser_driver::memory::MemoryElement;
    use storefront_core::data;

    fn form() -> browser_driver::memory::MemorySite {
        site()
            .element(FIRST_NAME_INPUT, MemoryElement::input(""))
            .element(LAST_NAME_INPUT, MemoryElement::input(""))
            .element(EMAIL_INPUT, MemoryElement::input(""))
            .element(TELEPHONE_INPUT, MemoryElement::input(""))
            .element(PASSWORD_INPUT, MemoryElement::input(""))
            .element(CONFIRM_PASSWORD_INPUT, MemoryElement::input(""))
            .element(NEWSLETTER_YES, MemoryElement::input("1"))
            .element(NEWSLETTER_NO, MemoryElement::input("0"))
            .element(PRIVACY_POLICY_CHECKBOX, MemoryElement::input("1"))
            .element(CONTINUE_BUTTON, MemoryElement::text(""))
    }

    #[tokio::test]
    async fn password_is_typed_twice() {
        let (page, actions) = actions_for(form());
        let register = RegisterPage::create(actions);
        let user = data::random_user();

        register.fill_registration_form(&user, false).await.unwrap();
        register.agree_to_privacy_policy().await.unwrap();

        assert_eq!(page.elements(PASSWORD_INPUT)[0].value, user.password);
        assert_eq!(page.elements(CONFIRM_PASSWORD_INPUT)[0].value, user.password);
        assert!(page.elements(PRIVACY_POLICY_CHECKBOX)[0].checked);
        assert!(page
            .actions()
            .contains(&format!("click {NEWSLETTER_NO}[0]")));
    }

    #[tokio::test]
    async fn empty_submission_reports_required_fields() {
        let (_, actions) = actions_for(
            form()
                .element(
                    &field_error_selector("firstname"),
                    MemoryElement::text("First Name must be between 1 and 32 characters!"),
                )
                .element(
                    &field_error_selector("password"),
                    MemoryElement::text("Password must be between 4 and 20 characters!"),
                ),
        );
        let register = RegisterPage::create(actions);

        register.submit_registration().await.unwrap();
        let errors = register.validation_errors().await.unwrap();

        assert!(!errors.is_empty());
        assert!(errors.contains_key("firstName"));
        assert!(errors.contains_key("password"));
        assert!(!errors.contains_key("email"));
        assert_eq!(
            register.field_error("password").await.unwrap().as_deref(),
            Some("Password must be between 4 and 20 characters!")
        );
    }

    #[tokio::test]
    async fn fields_without_errors_are_not_waited_for() {
        let site = form().element(
            &field_error_selector("email"),
            MemoryElement::text("E-Mail Address does not appear to be valid!"),
        );
        let mut config = storefront_core::Config::default();
        config.timeout = std::time::Duration::from_secs(2);
        let page = std::sync::Arc::new(browser_driver::memory::MemoryPage::from_site(site));
        let register = RegisterPage::create(WebActions::new(page, &config));

        let errors = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            register.validation_errors(),
        )
        .await
        .expect("field errors are read without waiting")
        .unwrap();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("email"));
    }
}
