// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Label key and value syntax validation
//!
//! Keys are `[prefix/]name` where the optional prefix is a lowercase
//! RFC 1123 subdomain of at most 253 characters and the name part is a
//! qualified name of at most 63 characters. Values are at most 63
//! characters and may be empty.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

/// Maximum length of a key's name part and of a label value.
const MAX_NAME_LEN: usize = 63;

/// Maximum length of a key's prefix part.
const MAX_PREFIX_LEN: usize = 253;

/// Qualified name: alphanumeric ends, `-`, `_`, `.` and alphanumerics inside.
/// Label values use the same shape (the empty value is handled separately).
static QUALIFIED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$").expect("qualified name pattern")
});

/// RFC 1123 subdomain: lowercase alphanumeric labels joined by dots.
static SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("subdomain pattern")
});

const NAME_SYNTAX: &str = "must consist of alphanumeric characters, '-', '_' or '.', \
     and must start and end with an alphanumeric character";

pub(crate) fn validate_label_key(key: &str) -> Result<(), ParseError> {
    let invalid = |reason: String| ParseError::InvalidKey {
        key: key.to_string(),
        reason,
    };

    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if name.contains('/') {
        return Err(invalid(
            "must have at most one '/' separating prefix and name".to_string(),
        ));
    }

    if let Some(prefix) = prefix {
        if prefix.is_empty() {
            return Err(invalid("prefix part must not be empty".to_string()));
        }
        if prefix.len() > MAX_PREFIX_LEN {
            return Err(invalid(format!(
                "prefix part must be no more than {} characters",
                MAX_PREFIX_LEN
            )));
        }
        if !SUBDOMAIN_RE.is_match(prefix) {
            return Err(invalid(
                "prefix part must be a lowercase RFC 1123 subdomain".to_string(),
            ));
        }
    }

    if name.is_empty() {
        return Err(invalid("name part must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(format!(
            "name part must be no more than {} characters",
            MAX_NAME_LEN
        )));
    }
    if !QUALIFIED_NAME_RE.is_match(name) {
        return Err(invalid(format!("name part {}", NAME_SYNTAX)));
    }

    Ok(())
}

pub(crate) fn validate_label_value(key: &str, value: &str) -> Result<(), ParseError> {
    let invalid = |reason: String| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    // The empty value is legal.
    if value.is_empty() {
        return Ok(());
    }

    if value.len() > MAX_NAME_LEN {
        return Err(invalid(format!(
            "must be no more than {} characters",
            MAX_NAME_LEN
        )));
    }
    if !QUALIFIED_NAME_RE.is_match(value) {
        return Err(invalid(NAME_SYNTAX.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for key in [
            "app",
            "app.kubernetes.io/name",
            "pod-security.kubernetes.io/enforce",
            "a",
            "A_b.c-d",
            "example.com/MyName",
        ] {
            assert!(validate_label_key(key).is_ok(), "key {:?} should be valid", key);
        }
    }

    #[test]
    fn test_invalid_keys() {
        for key in [
            "",
            "-app",
            "app-",
            "app/",
            "/app",
            "a/b/c",
            "app name",
            "Example.Com/name",
            "app..x!",
        ] {
            assert!(
                validate_label_key(key).is_err(),
                "key {:?} should be invalid",
                key
            );
        }
    }

    #[test]
    fn test_key_name_length_limit() {
        let max = "a".repeat(63);
        assert!(validate_label_key(&max).is_ok());
        let too_long = "a".repeat(64);
        assert!(validate_label_key(&too_long).is_err());
    }

    #[test]
    fn test_key_prefix_length_limit() {
        let max = format!("{}/name", "a".repeat(253));
        assert!(validate_label_key(&max).is_ok());
        let too_long = format!("{}/name", "a".repeat(254));
        assert!(validate_label_key(&too_long).is_err());
    }

    #[test]
    fn test_valid_values() {
        for value in ["", "prod", "v1.2.3", "my_value", "A-b"] {
            assert!(
                validate_label_value("key", value).is_ok(),
                "value {:?} should be valid",
                value
            );
        }
    }

    #[test]
    fn test_invalid_values() {
        for value in ["-prod", "prod-", "pr od", "a/b"] {
            assert!(
                validate_label_value("key", value).is_err(),
                "value {:?} should be invalid",
                value
            );
        }
        let too_long = "a".repeat(64);
        assert!(validate_label_value("key", &too_long).is_err());
    }

    #[test]
    fn test_error_carries_key_and_value() {
        let err = validate_label_value("env", "-bad").unwrap_err();
        match err {
            ParseError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "env");
                assert_eq!(value, "-bad");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
