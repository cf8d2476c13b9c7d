//! Handlers for every [`Action`], grouped by the part of the store they
//! drive.

mod account;
mod cart;
mod catalog;
mod checkout;
mod comparison;

use crate::action::{Action, SuccessKind};
use page_objects::PageFactory;
use storefront_core::{ensure, Config, Result, ScenarioData};

pub(crate) const SUCCESS_ALERT: &str = ".alert-success";

/// Executes one action against the scenario's pages.
pub(crate) async fn execute(
    pages: &PageFactory,
    config: &Config,
    data: &mut ScenarioData,
    action: Action,
) -> Result<()> {
    match action {
        Action::OpenHomepage => catalog::open_homepage(pages).await,
        Action::ReturnToHomepage => catalog::return_to_homepage(pages).await,
        Action::Search { term } => catalog::search(pages, data, term).await,
        Action::SearchWithCriteria {
            keyword,
            in_description,
        } => catalog::search_with_criteria(pages, data, keyword, in_description).await,
        Action::ExpectSearchResults => catalog::expect_search_results(pages).await,
        Action::ExpectResultsContaining { keyword } => {
            catalog::expect_results_containing(pages, &keyword).await
        }
        Action::ExpectAtLeastResults { count } => {
            catalog::expect_at_least_results(pages, count).await
        }
        Action::ExpectAtMostResults { limit } => catalog::expect_at_most_results(pages, limit).await,
        Action::SortBy { label } => catalog::sort_by(pages, &label).await,
        Action::ExpectAscendingPrices => catalog::expect_ascending_prices(pages).await,
        Action::SetDisplayLimit { limit } => catalog::set_display_limit(pages, &limit).await,
        Action::ExpectSuccessMessage(kind) => expect_success_message(pages, kind).await,

        Action::AddFirstResultToCart => cart::add_first_result_to_cart(pages, data).await,
        Action::AddProductToCart { product } => cart::add_product_to_cart(pages, data, product).await,
        Action::OpenCart => cart::open_cart(pages).await,
        Action::UpdateFirstQuantity { quantity } => {
            cart::update_first_quantity(pages, data, quantity).await
        }
        Action::SetFirstQuantity { quantity } => {
            cart::set_first_quantity(pages, data, quantity).await
        }
        Action::UpdateCart => cart::update_cart(pages).await,
        Action::ExpectUpdatedQuantity => cart::expect_updated_quantity(pages, data).await,
        Action::ExpectCartTotalRecalculated => cart::expect_total_recalculated(pages).await,
        Action::ExpectPositiveCartTotal => cart::expect_positive_total(pages).await,
        Action::RemoveFirstProduct => cart::remove_first_product(pages).await,
        Action::ExpectCartCount { count, open_cart } => {
            cart::expect_count(pages, count, open_cart).await
        }
        Action::ExpectProductInCart => cart::expect_product_in_cart(pages, data).await,
        Action::ExpectCartEmpty => cart::expect_empty(pages).await,
        Action::ExpectEmptyCartMessage => cart::expect_empty_message(pages).await,
        Action::ApplyCoupon { code } => cart::apply_coupon(pages, data, code).await,
        Action::ExpectDiscountSummary => cart::expect_discount_summary(pages).await,

        Action::ProceedToCheckout => checkout::proceed(pages).await,
        Action::ChooseGuestCheckout => checkout::choose_guest(pages).await,
        Action::FillBillingDetails(details) => {
            checkout::fill_billing_details(pages, data, details).await
        }
        Action::ContinueToDeliveryDetails => checkout::continue_to_delivery_details(pages).await,
        Action::ContinueWithDeliveryMethod => checkout::continue_with_delivery_method(pages).await,
        Action::AgreeToTerms => checkout::agree_to_terms(pages).await,
        Action::ContinueToPaymentMethod => checkout::continue_to_payment_method(pages).await,
        Action::ConfirmOrder => checkout::confirm_order(pages).await,
        Action::ExpectOrderConfirmation => checkout::expect_confirmation(pages).await,
        Action::ContinueWithSavedAddress => checkout::continue_with_saved_address(pages).await,
        Action::ExpectOrderInHistory => checkout::expect_order_in_history(pages, data).await,
        Action::EnterCustomerDetails => checkout::enter_customer_details(pages, data).await,
        Action::EnterBillingAddress => checkout::enter_billing_address(pages, data).await,
        Action::EnterShippingAddress => checkout::enter_shipping_address(pages).await,
        Action::SelectShippingMethod => checkout::select_shipping_method(pages).await,
        Action::SelectPaymentMethod => checkout::select_payment_method(pages).await,
        Action::ConfirmBillingDetails => checkout::confirm_billing_details(pages, data).await,
        Action::ConfirmDeliveryDetails => checkout::confirm_delivery_details(pages).await,
        Action::ExpectOrderNumber => checkout::expect_order_number(pages, data).await,

        Action::OpenLoginPage => account::open_login_page(pages).await,
        Action::LogInWithValidCredentials => account::log_in_with_valid_credentials(pages, config).await,
        Action::LogIn { email, password } => account::log_in(pages, &email, &password).await,
        Action::ExpectLoginWarning => account::expect_login_warning(pages).await,
        Action::ExpectLoggedOut => account::expect_logged_out(pages).await,
        Action::OpenRegisterPage => account::open_register_page(pages).await,
        Action::FillRegistrationWithValidDetails => account::fill_with_new_user(pages, data).await,
        Action::FillRegistrationWithExistingEmail => {
            account::fill_with_existing_account(pages, data).await
        }
        Action::AgreeToPrivacyPolicy => account::agree_to_privacy_policy(pages).await,
        Action::SubmitRegistration => account::submit_registration(pages).await,
        Action::ExpectAccountCreated => account::expect_account_created(pages).await,
        Action::ExpectLoggedIn => account::expect_logged_in(pages).await,
        Action::ExpectEmailAlreadyRegistered => account::expect_email_already_registered(pages).await,
        Action::ExpectRequiredFieldErrors => account::expect_required_field_errors(pages).await,

        Action::AddFirstResultToComparison => comparison::add_first_result(pages, data).await,
        Action::AddProductsToComparison(entries) => {
            comparison::add_products(pages, data, entries).await
        }
        Action::OpenComparison => comparison::open(pages).await,
        Action::ExpectComparisonCount { count } => comparison::expect_count(pages, count).await,
        Action::ExpectComparisonDetails => comparison::expect_details(pages, data).await,
        Action::AddFirstComparedToCart => comparison::add_first_to_cart(pages).await,

        Action::OpenProduct { id } => catalog::open_product(pages, id).await,
        Action::AddToCartFromProduct { quantity } => {
            catalog::add_to_cart_from_product(pages, data, quantity).await
        }
        Action::ExpectProductTitle { text } => catalog::expect_product_title(pages, &text).await,
        Action::SubmitReview {
            author,
            text,
            rating,
        } => catalog::submit_review(pages, &author, &text, rating).await,
    }
}

/// Success alerts are shared by every page, so they are read directly.
async fn expect_success_message(pages: &PageFactory, kind: SuccessKind) -> Result<()> {
    let actions = pages.actions();
    actions.wait_for_visible(SUCCESS_ALERT).await?;
    let text = actions.get_text(SUCCESS_ALERT).await?;
    let lower = text.to_lowercase();
    for fragment in kind.fragments() {
        ensure(
            lower.contains(fragment),
            format!("a success message containing '{fragment}'"),
            format!("'{}'", text.trim()),
        )?;
    }
    Ok(())
}

/// Case-insensitive containment used by every name check.
pub(crate) fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
pub(crate) mod test_support {
    use browser_driver::memory::{MemoryPage, MemorySite};
    use page_objects::{PageFactory, WebActions};
    use std::sync::Arc;
    use std::time::Duration;
    use storefront_core::Config;

    pub fn config() -> Config {
        let mut config = Config::default();
        config.base_url = "https://shop.test/".to_string();
        config.timeout = Duration::from_millis(200);
        config
    }

    pub fn site() -> MemorySite {
        MemorySite::new().title("Your Store")
    }

    pub fn factory(site: MemorySite) -> (Arc<MemoryPage>, PageFactory) {
        let page = Arc::new(MemoryPage::from_site(site));
        let actions = WebActions::new(page.clone(), &config()).with_settle(Duration::ZERO);
        (page, PageFactory::new(actions))
    }
}
