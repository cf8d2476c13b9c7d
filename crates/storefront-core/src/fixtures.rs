//! Static test data for the demo store

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Everything the registration form asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub region: String,
}

/// Guest checkout billing form: contact details plus address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub address: Address,
}

impl BillingDetails {
    /// Reads a table row keyed by column header (`firstName`, `lastName`, ...).
    /// Missing columns fall back to the guest fixture.
    pub fn from_row<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let fallback = checkout().guest;
        let pick = |key: &str, default: String| {
            lookup(key).map(str::to_string).unwrap_or(default)
        };
        Self {
            first_name: pick("firstName", fallback.first_name),
            last_name: pick("lastName", fallback.last_name),
            email: pick("email", fallback.email),
            telephone: pick("telephone", fallback.telephone),
            address: Address {
                address1: pick("address1", fallback.address.address1),
                city: pick("city", fallback.address.city),
                postcode: pick("postcode", fallback.address.postcode),
                country: pick("country", fallback.address.country),
                region: pick("region", fallback.address.region),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub model: String,
    pub price: String,
    pub id: Option<u32>,
}

pub struct Users {
    pub valid: Login,
    pub invalid: Login,
    pub new: UserDetails,
}

pub struct Checkout {
    pub guest: BillingDetails,
    pub billing: BillingDetails,
}

pub const SEARCH_TERMS_VALID: [&str; 4] = ["iphone", "mac", "camera", "tablet"];
pub const SEARCH_TERMS_INVALID: [&str; 2] = ["xyz123", "nonexistentproduct"];
pub const PAYMENT_CASH_ON_DELIVERY: &str = "Cash On Delivery";
pub const SHIPPING_FLAT_RATE: &str = "Flat Shipping Rate";
pub const EXISTING_ACCOUNT_EMAIL: &str = "test@test.com";

pub fn users() -> Users {
    Users {
        valid: Login {
            email: "test@test.com".to_string(),
            password: "test123".to_string(),
        },
        invalid: Login {
            email: "invalid@test.com".to_string(),
            password: "wrongpassword".to_string(),
        },
        new: UserDetails {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!(
                "test.user.{}@example.com",
                chrono::Utc::now().timestamp_millis()
            ),
            telephone: "1234567890".to_string(),
            password: "Password123".to_string(),
        },
    }
}

pub fn products() -> Vec<Product> {
    vec![
        Product {
            name: "iPhone".to_string(),
            model: "product 11".to_string(),
            price: "$123.20".to_string(),
            id: Some(40),
        },
        Product {
            name: "MacBook".to_string(),
            model: "Product 16".to_string(),
            price: "$602.00".to_string(),
            id: Some(43),
        },
        Product {
            name: "Samsung".to_string(),
            model: "SAM1".to_string(),
            price: "$241.99".to_string(),
            id: None,
        },
    ]
}

/// Registration details for an account the demo store already knows.
pub fn existing_account() -> UserDetails {
    UserDetails {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: EXISTING_ACCOUNT_EMAIL.to_string(),
        telephone: "1234567890".to_string(),
        password: "Password123".to_string(),
    }
}

pub fn checkout() -> Checkout {
    Checkout {
        guest: BillingDetails {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            telephone: "1234567890".to_string(),
            address: Address {
                address1: "123 Test Street".to_string(),
                city: "Test City".to_string(),
                postcode: "12345".to_string(),
                country: "United States".to_string(),
                region: "Florida".to_string(),
            },
        },
        billing: BillingDetails {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            telephone: "9876543210".to_string(),
            address: Address {
                address1: "456 Sample Avenue".to_string(),
                city: "Sample City".to_string(),
                postcode: "54321".to_string(),
                country: "United States".to_string(),
                region: "California".to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn billing_row_overrides_guest_defaults() {
        let row: HashMap<&str, &str> =
            [("firstName", "Ada"), ("city", "London"), ("region", "Greater London")]
                .into_iter()
                .collect();
        let details = BillingDetails::from_row(|key| row.get(key).copied());

        assert_eq!(details.first_name, "Ada");
        assert_eq!(details.address.city, "London");
        assert_eq!(details.last_name, "Doe");
        assert_eq!(details.address.country, "United States");
    }

    #[test]
    fn fixture_users_and_products_are_seeded() {
        assert!(users().new.email.starts_with("test.user."));
        assert_eq!(products()[0].id, Some(40));
    }
}
