// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Label set type and parsing
//!
//! A label set is the string-to-string metadata map attached to a
//! Kubernetes object. `BTreeMap` gives structural equality (same keys and
//! values, independent of insertion order), which the change detector
//! relies on for its fast path, and matches the map type the API objects
//! themselves use for `metadata.labels`.

use std::collections::BTreeMap;

use crate::error::ParseError;
use crate::selector::validation::{validate_label_key, validate_label_value};

/// Labels attached to a resource at one point in time.
pub type LabelSet = BTreeMap<String, String>;

/// Parse a comma-separated `key=value` list into a label set.
///
/// This is the textual form the Kubernetes API accepts for equality-based
/// label selection (e.g. `app=nginx,env=prod`). Keys and values are
/// validated with the usual label syntax rules. Empty input yields an
/// empty label set; a repeated key keeps its last value.
pub fn parse_label_set(input: &str) -> Result<LabelSet, ParseError> {
    let mut labels = LabelSet::new();

    if input.trim().is_empty() {
        return Ok(labels);
    }

    for pair in input.split(',') {
        let pair = pair.trim();
        let Some((key, value)) = pair.split_once('=') else {
            return Err(ParseError::UnexpectedToken {
                found: pair.to_string(),
                expected: "'key=value' pair",
            });
        };
        let key = key.trim();
        let value = value.trim();
        validate_label_key(key)?;
        validate_label_value(key, value)?;
        labels.insert(key.to_string(), value.to_string());
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_set_basic() {
        let labels = parse_label_set("app=nginx,env=prod").unwrap();
        assert_eq!(labels.get("app"), Some(&"nginx".to_string()));
        assert_eq!(labels.get("env"), Some(&"prod".to_string()));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_parse_label_set_empty_input() {
        assert!(parse_label_set("").unwrap().is_empty());
        assert!(parse_label_set("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_label_set_whitespace_tolerant() {
        let labels = parse_label_set(" app = nginx , env = prod ").unwrap();
        assert_eq!(labels.get("app"), Some(&"nginx".to_string()));
        assert_eq!(labels.get("env"), Some(&"prod".to_string()));
    }

    #[test]
    fn test_parse_label_set_empty_value() {
        // An empty value is legal; it is distinct from an absent key.
        let labels = parse_label_set("app=").unwrap();
        assert_eq!(labels.get("app"), Some(&String::new()));
    }

    #[test]
    fn test_parse_label_set_prefixed_key() {
        let labels = parse_label_set("pod-security.kubernetes.io/enforce=restricted").unwrap();
        assert_eq!(
            labels.get("pod-security.kubernetes.io/enforce"),
            Some(&"restricted".to_string())
        );
    }

    #[test]
    fn test_parse_label_set_missing_separator() {
        let err = parse_label_set("app=nginx,env").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_parse_label_set_invalid_key() {
        let err = parse_label_set("-app=nginx").unwrap_err();
        assert!(matches!(err, ParseError::InvalidKey { .. }));
    }

    #[test]
    fn test_parse_label_set_repeated_key_keeps_last() {
        let labels = parse_label_set("app=nginx,app=httpd").unwrap();
        assert_eq!(labels.get("app"), Some(&"httpd".to_string()));
        assert_eq!(labels.len(), 1);
    }
}
