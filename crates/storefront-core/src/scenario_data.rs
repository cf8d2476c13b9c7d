//! Typed data passed between the steps of one scenario

use crate::fixtures::{Address, BillingDetails, UserDetails};
use serde::{Deserialize, Serialize};

/// Values produced by earlier steps and consumed by later ones.
///
/// Every field is named and typed, so a step reading a value another step
/// never wrote sees `None` rather than a silently mistyped key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub last_search_term: Option<String>,
    pub product_added: Option<String>,
    pub last_added_product_name: Option<String>,
    pub updated_quantity: Option<u32>,
    pub billing_details: Option<BillingDetails>,
    pub registration_details: Option<UserDetails>,
    pub comparison_products: Vec<String>,
    pub coupon_applied: Option<String>,
    pub guest_user: Option<UserDetails>,
    pub address: Option<Address>,
    pub order_number: Option<String>,
}

impl ScenarioData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The product the cart should contain: the name captured from the
    /// results page, else the search term used to add it.
    pub fn expected_cart_product(&self) -> Option<&str> {
        self.last_added_product_name
            .as_deref()
            .or(self.product_added.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_clears() {
        let mut data = ScenarioData::default();
        assert!(data.is_empty());

        data.last_search_term = Some("iphone".to_string());
        data.comparison_products.push("iPhone".to_string());
        assert!(!data.is_empty());

        data.clear();
        assert!(data.is_empty());
    }

    #[test]
    fn expected_cart_product_prefers_captured_name() {
        let mut data = ScenarioData {
            product_added: Some("mac".to_string()),
            ..Default::default()
        };
        assert_eq!(data.expected_cart_product(), Some("mac"));

        data.last_added_product_name = Some("MacBook Air".to_string());
        assert_eq!(data.expected_cart_product(), Some("MacBook Air"));

        data.last_added_product_name = Some("  ".to_string());
        data.product_added = None;
        assert_eq!(data.expected_cart_product(), None);
    }
}
