//! Property-based tests for variable expansion and literal escaping.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::env::{escape_for_literal_match, EnvVars};
    use proptest::prelude::*;
    use regex::Regex;

    // ============================================================================
    // expand property tests
    // ============================================================================

    proptest! {
        /// Property: with no variables defined, expansion changes nothing
        #[test]
        fn expand_with_empty_env_is_identity(input in ".*") {
            let env = EnvVars::new();
            prop_assert_eq!(env.expand(&input), input);
        }

        /// Property: text without a `${` opener is never changed
        #[test]
        fn expand_without_references_is_identity(input in "[^$]*") {
            let env: EnvVars = [("A", "x"), ("B", "y")].into_iter().collect();
            prop_assert_eq!(env.expand(&input), input);
        }

        /// Property: a defined reference is replaced by exactly its value
        #[test]
        fn expand_substitutes_defined_reference(
            prefix in "[a-z ]*",
            name in "[A-Z_][A-Z0-9_]{0,8}",
            value in ".*",
            suffix in "[a-z ]*",
        ) {
            let mut env = EnvVars::new();
            env.insert(name.clone(), value.clone());
            let input = format!("{}${{{}}}{}", prefix, name, suffix);
            prop_assert_eq!(env.expand(&input), format!("{}{}{}", prefix, value, suffix));
        }

        /// Property: an undefined reference survives verbatim
        #[test]
        fn expand_keeps_undefined_reference(name in "[A-Z_][A-Z0-9_]{0,8}") {
            let env: EnvVars = [("DEFINED_ELSEWHERE_", "x")].into_iter().collect();
            let input = format!("${{{}}}", name);
            prop_assert_eq!(env.expand(&input), input);
        }

        /// Property: a value inserted into a replacement template comes out
        /// of capture expansion unchanged, whatever `$` it contains
        #[test]
        fn expand_replacement_keeps_values_literal(value in ".*") {
            let mut env = EnvVars::new();
            env.insert("V", value.clone());
            let regex = Regex::new("(x)").unwrap();
            let caps = regex.captures("x").unwrap();
            let mut out = String::new();
            caps.expand(&env.expand_replacement("${V}"), &mut out);
            prop_assert_eq!(out, value);
        }

        /// Property: expansion is deterministic
        #[test]
        fn expand_is_deterministic(input in ".*") {
            let env: EnvVars = [("A", "${B}"), ("B", "z")].into_iter().collect();
            prop_assert_eq!(env.expand(&input), env.expand(&input));
        }
    }

    // ============================================================================
    // escape_for_literal_match property tests
    // ============================================================================

    proptest! {
        /// Property: escaped text compiles and matches only itself
        #[test]
        fn escaped_text_matches_itself_literally(input in "[a-z0-9 ${}]{1,24}") {
            let escaped = escape_for_literal_match(&input);
            let regex = Regex::new(&format!("^(?:{})$", escaped));
            prop_assert!(regex.is_ok(), "{:?} did not compile", escaped);
            let regex = regex.unwrap();
            prop_assert!(regex.is_match(&input));
            let longer = format!("{}x", input);
            prop_assert!(!regex.is_match(&longer));
        }

        /// Property: escaping only adds backslashes before `{` and `$`
        #[test]
        fn escape_adds_one_backslash_per_special_char(input in ".*") {
            let escaped = escape_for_literal_match(&input);
            let specials = input.chars().filter(|c| *c == '{' || *c == '$').count();
            prop_assert_eq!(escaped.chars().count(), input.chars().count() + specials);
            let unescaped: String = escaped.chars().filter(|c| *c != '\\').collect();
            let original: String = input.chars().filter(|c| *c != '\\').collect();
            prop_assert_eq!(unescaped, original);
        }
    }
}
