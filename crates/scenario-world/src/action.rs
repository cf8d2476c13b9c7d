//! The closed set of things a scenario step can ask for.
//!
//! Step definitions translate step text into an [`Action`]; the scenario
//! context executes it with an exhaustive match, so adding a variant without
//! a handler does not compile.

use storefront_core::BillingDetails;

/// Which success alert a step expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessKind {
    /// Any alert mentioning "Success".
    Any,
    /// A product was added to the comparison.
    Comparison,
    /// "Success: You have added ... to your shopping cart".
    AddedToCart,
    /// A product review was accepted for moderation.
    Review,
}

impl SuccessKind {
    /// Lower-case fragments the alert text must contain.
    pub fn fragments(&self) -> &'static [&'static str] {
        match self {
            SuccessKind::Any => &["success"],
            SuccessKind::Comparison => &["comparison"],
            SuccessKind::AddedToCart => &["success: you have added", "to your shopping cart"],
            SuccessKind::Review => &["thank you for your review"],
        }
    }
}

/// One row of a "products to comparison" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonEntry {
    pub search_term: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Home and search
    OpenHomepage,
    ReturnToHomepage,
    Search { term: String },
    SearchWithCriteria { keyword: String, in_description: bool },
    ExpectSearchResults,
    ExpectResultsContaining { keyword: String },
    ExpectAtLeastResults { count: usize },
    ExpectAtMostResults { limit: usize },
    SortBy { label: String },
    ExpectAscendingPrices,
    SetDisplayLimit { limit: String },
    ExpectSuccessMessage(SuccessKind),

    // Cart
    AddFirstResultToCart,
    AddProductToCart { product: String },
    OpenCart,
    UpdateFirstQuantity { quantity: u32 },
    SetFirstQuantity { quantity: String },
    UpdateCart,
    ExpectUpdatedQuantity,
    ExpectCartTotalRecalculated,
    ExpectPositiveCartTotal,
    RemoveFirstProduct,
    ExpectCartCount { count: usize, open_cart: bool },
    ExpectProductInCart,
    ExpectCartEmpty,
    ExpectEmptyCartMessage,
    ApplyCoupon { code: String },
    ExpectDiscountSummary,

    // Checkout
    ProceedToCheckout,
    ChooseGuestCheckout,
    FillBillingDetails(BillingDetails),
    ContinueToDeliveryDetails,
    ContinueWithDeliveryMethod,
    AgreeToTerms,
    ContinueToPaymentMethod,
    ConfirmOrder,
    ExpectOrderConfirmation,
    ContinueWithSavedAddress,
    ExpectOrderInHistory,
    EnterCustomerDetails,
    EnterBillingAddress,
    EnterShippingAddress,
    SelectShippingMethod,
    SelectPaymentMethod,
    ConfirmBillingDetails,
    ConfirmDeliveryDetails,
    ExpectOrderNumber,

    // Account
    OpenLoginPage,
    LogInWithValidCredentials,
    LogIn { email: String, password: String },
    ExpectLoginWarning,
    ExpectLoggedOut,
    OpenRegisterPage,
    FillRegistrationWithValidDetails,
    FillRegistrationWithExistingEmail,
    AgreeToPrivacyPolicy,
    SubmitRegistration,
    ExpectAccountCreated,
    ExpectLoggedIn,
    ExpectEmailAlreadyRegistered,
    ExpectRequiredFieldErrors,

    // Comparison
    AddFirstResultToComparison,
    AddProductsToComparison(Vec<ComparisonEntry>),
    OpenComparison,
    ExpectComparisonCount { count: usize },
    ExpectComparisonDetails,
    AddFirstComparedToCart,

    // Product page
    OpenProduct { id: u32 },
    AddToCartFromProduct { quantity: u32 },
    ExpectProductTitle { text: String },
    SubmitReview { author: String, text: String, rating: u8 },
}

impl Action {
    /// Short name for logs, without the payload.
    pub fn name(&self) -> String {
        let debug = format!("{self:?}");
        debug
            .split(|c: char| c == ' ' || c == '(' || c == '{')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Whether the action only inspects the page.
    pub fn is_expectation(&self) -> bool {
        self.name().starts_with("Expect")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_drop_the_payload() {
        assert_eq!(Action::OpenHomepage.name(), "OpenHomepage");
        assert_eq!(
            Action::Search {
                term: "iphone".into()
            }
            .name(),
            "Search"
        );
        assert_eq!(
            Action::ExpectSuccessMessage(SuccessKind::Comparison).name(),
            "ExpectSuccessMessage"
        );
    }

    #[test]
    fn expectations_are_recognized() {
        assert!(Action::ExpectCartEmpty.is_expectation());
        assert!(Action::ExpectCartCount {
            count: 1,
            open_cart: true
        }
        .is_expectation());
        assert!(!Action::RemoveFirstProduct.is_expectation());
    }

    #[test]
    fn added_to_cart_needs_both_fragments() {
        assert_eq!(SuccessKind::AddedToCart.fragments().len(), 2);
    }
}
