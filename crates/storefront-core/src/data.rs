//! Random test data generation

use crate::fixtures::{Address, UserDetails};
use rand::distributions::Alphanumeric;
use rand::Rng;

pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Inclusive on both ends.
pub fn random_number(min: u32, max: u32) -> u32 {
    rand::thread_rng().gen_range(min..=max)
}

pub fn random_email(domain: &str) -> String {
    format!(
        "test_user_{}_{}@{}",
        random_string(6).to_ascii_lowercase(),
        chrono::Utc::now().timestamp_millis(),
        domain
    )
}

pub fn random_phone_number() -> String {
    format!(
        "{}{}{}",
        random_number(100, 999),
        random_number(100, 999),
        random_number(1000, 9999)
    )
}

pub fn random_user() -> UserDetails {
    UserDetails {
        first_name: format!("TestUser{}", random_string(4)),
        last_name: format!("LastName{}", random_string(4)),
        email: random_email("example.com"),
        telephone: random_phone_number(),
        password: format!("Password{}", random_number(100, 999)),
    }
}

pub fn random_address() -> Address {
    Address {
        address1: format!("{} Test Street", random_number(1, 9999)),
        city: format!("Test City {}", random_string(3)),
        postcode: random_number(10_000, 99_999).to_string(),
        country: "United States".to_string(),
        region: "Florida".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::validation;

    #[test]
    fn random_user_satisfies_form_validation() {
        let user = random_user();
        assert!(user.password.len() >= validation::MIN_PASSWORD_LENGTH);
        assert!(user.telephone.len() <= validation::MAX_TELEPHONE_LENGTH);
        assert_eq!(user.telephone.len(), 10);
        assert!(user.email.ends_with("@example.com"));
        assert_ne!(random_user().email, user.email);
    }

    #[test]
    fn random_number_stays_in_bounds() {
        for _ in 0..100 {
            let n = random_number(3, 5);
            assert!((3..=5).contains(&n));
        }
        assert_eq!(random_string(12).len(), 12);
    }

    #[test]
    fn random_address_has_numeric_postcode() {
        let address = random_address();
        assert_eq!(address.postcode.len(), 5);
        assert!(address.postcode.chars().all(|c| c.is_ascii_digit()));
    }
}
