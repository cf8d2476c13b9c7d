//! Property tests for artifact naming and tag handling

use proptest::prelude::*;
use storefront_core::{artifacts, tags};

proptest! {
    #[test]
    fn sanitized_names_are_filesystem_safe(name in ".*") {
        let sanitized = artifacts::sanitize_name(&name);
        prop_assert_eq!(sanitized.chars().count(), name.chars().count());
        prop_assert!(sanitized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn screenshot_names_carry_status(name in "[a-zA-Z0-9 ]{1,40}", status in "(passed|failed|skipped)") {
        let file = artifacts::screenshot_file_name(&name, &status);
        let expected_suffix = format!("-{}.png", status);
        prop_assert!(file.ends_with(&expected_suffix));
        prop_assert!(!file.contains(' '));
    }

    #[test]
    fn skip_tag_is_never_admitted(extra in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
        let mut scenario_tags = extra.clone();
        scenario_tags.push("skip".to_string());
        prop_assert!(!tags::admits(&scenario_tags, &extra));
    }
}
