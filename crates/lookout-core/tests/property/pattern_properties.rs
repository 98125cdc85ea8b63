use lookout_core::patterns::any_match;
use lookout_core::IgnorePattern;
use proptest::prelude::*;

proptest! {
    #[test]
    fn substring_matches_any_superstring(prefix in ".{0,20}", needle in ".{1,20}", suffix in ".{0,20}") {
        let pattern = IgnorePattern::substring(needle.clone());
        let haystack = format!("{prefix}{needle}{suffix}");
        prop_assert!(pattern.matches(&haystack));
    }

    #[test]
    fn escaped_regex_agrees_with_substring(needle in "[a-zA-Z0-9 .*+?()]{1,16}", haystack in "[a-zA-Z0-9 .*+?()]{0,40}") {
        let regex = IgnorePattern::regex(&regex::escape(&needle)).unwrap();
        let substring = IgnorePattern::substring(needle);
        prop_assert_eq!(regex.matches(&haystack), substring.matches(&haystack));
    }

    #[test]
    fn empty_list_never_matches(haystack in ".*") {
        prop_assert!(!any_match(&[], &haystack));
    }

    #[test]
    fn json_form_survives_serde(needle in "[a-z]{1,12}") {
        let pattern = IgnorePattern::regex(&format!("^{needle}$")).unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        let back: IgnorePattern = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, pattern);
    }
}
