//! One page object per OpenCart page, each holding its selectors as
//! constants.

pub mod cart;
pub mod checkout;
pub mod comparison;
pub mod home;
pub mod login;
pub mod product;
pub mod register;
pub mod search_result;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use comparison::ComparisonPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use product::ProductPage;
pub use register::RegisterPage;
pub use search_result::SearchResultPage;
