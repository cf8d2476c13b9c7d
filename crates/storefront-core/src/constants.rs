//! Shared constants for the OpenCart demo store

use std::time::Duration;

/// Wait buckets used by step handlers.
pub mod time {
    use super::Duration;

    pub const XS: Duration = Duration::from_secs(1);
    pub const S: Duration = Duration::from_secs(3);
    pub const M: Duration = Duration::from_secs(5);
    pub const L: Duration = Duration::from_secs(10);
    pub const XL: Duration = Duration::from_secs(30);
    pub const XXL: Duration = Duration::from_secs(60);
}

pub mod product_ids {
    pub const IPHONE: u32 = 40;
    pub const MACBOOK: u32 = 43;
    pub const MACBOOK_AIR: u32 = 44;
    pub const MACBOOK_PRO: u32 = 45;
    pub const SAMSUNG_TAB: u32 = 49;
    pub const SONY_VAIO: u32 = 46;
    pub const HP_LP3065: u32 = 47;
    pub const CANON_EOS: u32 = 30;
}

pub mod messages {
    pub const EMPTY_CART: &str = "Your shopping cart is empty!";
    pub const LOGIN_INVALID: &str = "Warning: No match for E-Mail Address and/or Password";
    pub const REQUIRED_FIELD: &str = "This field is required";
    pub const ACCOUNT_CREATED: &str = "Your Account Has Been Created";
    pub const ORDER_PLACED: &str = "Your order has been placed";
    pub const EMAIL_REGISTERED: &str = "already registered";
}

pub mod validation {
    pub const MIN_PASSWORD_LENGTH: usize = 4;
    pub const MAX_TELEPHONE_LENGTH: usize = 32;
}

/// OpenCart `route=` values.
pub mod routes {
    pub const HOME: &str = "common/home";
    pub const LOGIN: &str = "account/login";
    pub const REGISTER: &str = "account/register";
    pub const ACCOUNT: &str = "account/account";
    pub const ORDER_HISTORY: &str = "account/order";
    pub const CART: &str = "checkout/cart";
    pub const CART_ADD: &str = "checkout/cart/add";
    pub const CHECKOUT: &str = "checkout/checkout";
    pub const PRODUCT: &str = "product/product";
    pub const CATEGORY: &str = "product/category";
    pub const SEARCH: &str = "product/search";
    pub const COMPARE: &str = "product/compare";

    /// Builds the `?route=...` suffix appended to the base URL.
    pub fn path(route: &str) -> String {
        format!("?route={route}")
    }
}
