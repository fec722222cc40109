use naming_convention::{StringFilter, StringMatchType};

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: [&str; 8] = [
        "SomeTestString",
        "TestSomeString",
        "SomeStringTest",
        "SometestString",
        "testSomeString",
        "SomeStringtest",
        "Test",
        "test",
    ];

    // Helper checking a filter against every candidate, in CANDIDATES order
    fn check(match_type: StringMatchType, pattern: &str, ignore_case: bool, expected: [bool; 8]) {
        let filter = StringFilter::new(match_type, pattern, ignore_case).unwrap();
        for (candidate, expected) in CANDIDATES.iter().zip(expected) {
            assert_eq!(
                filter.is_match(candidate),
                expected,
                "{match_type:?} '{pattern}' (ignore case: {ignore_case}) against '{candidate}'"
            );
        }
    }

    #[test]
    fn test_contains() {
        check(StringMatchType::Contains, "Test", true, [true, true, true, true, true, true, true, true]);
        check(StringMatchType::Contains, "Test", false, [true, true, true, false, false, false, true, false]);
    }

    #[test]
    fn test_starts_with() {
        check(StringMatchType::StartsWith, "Test", true, [false, true, false, false, true, false, true, true]);
        check(StringMatchType::StartsWith, "Test", false, [false, true, false, false, false, false, true, false]);
    }

    #[test]
    fn test_ends_with() {
        check(StringMatchType::EndsWith, "Test", true, [false, false, true, false, false, true, true, true]);
        check(StringMatchType::EndsWith, "Test", false, [false, false, true, false, false, false, true, false]);
    }

    #[test]
    fn test_equals() {
        check(StringMatchType::Equals, "Test", true, [false, false, false, false, false, false, true, true]);
        check(StringMatchType::Equals, "Test", false, [false, false, false, false, false, false, true, false]);
    }

    #[test]
    fn test_wildcard() {
        check(StringMatchType::Wildcard, "T*t", true, [false, true, false, false, true, false, true, true]);
        check(StringMatchType::Wildcard, "T*t", false, [false, true, false, false, false, false, true, false]);
    }

    #[test]
    fn test_wildcard_single_character() {
        let filter = StringFilter::new(StringMatchType::Wildcard, "T?st", false).unwrap();
        assert!(filter.is_match("Test"));
        assert!(filter.is_match("Tost_01"));
        assert!(!filter.is_match("Tst"));
    }

    #[test]
    fn test_regex() {
        check(StringMatchType::Regex, "(test)+", true, [true, true, true, true, true, true, true, true]);
        check(StringMatchType::Regex, "(test)+", false, [false, false, false, true, true, true, false, true]);

        let filter = StringFilter::new(StringMatchType::Regex, "(test)+", true).unwrap();
        assert!(!filter.is_match("someString"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        assert!(StringFilter::new(StringMatchType::Regex, "(unclosed", false).is_err());
    }

    #[test]
    fn test_deserialize_filter() {
        let filter: StringFilter =
            serde_yaml::from_str("{ match_type: starts_with, pattern: Test, ignore_case: true }").unwrap();
        assert_eq!(filter.match_type(), StringMatchType::StartsWith);
        assert!(filter.is_match("testSomeString"));

        // Contains is the default match type
        let filter: StringFilter = serde_yaml::from_str("{ pattern: Test }").unwrap();
        assert_eq!(filter.match_type(), StringMatchType::Contains);
        assert!(!filter.ignore_case());
    }
}
