// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Selector outcome change detection

use tracing::trace;

use crate::error::CompileError;
use crate::labels::LabelSet;
use crate::selector::RawSelector;

/// Returns true if the selector doesn't yield the same matching outcome for
/// the old and new label sets.
///
/// Identical label sets short-circuit before the selector is compiled, so
/// an unusable selector paired with an unchanged label set is not an
/// error. Compilation failure is the only error path; it carries the
/// selector's textual form and is never collapsed into a boolean.
///
/// Pure and deterministic: no I/O, no shared state, safe to call from any
/// number of tasks concurrently.
pub fn label_selection_has_changed<S>(
    old: &LabelSet,
    new: &LabelSet,
    selector: &S,
) -> Result<bool, CompileError>
where
    S: RawSelector + ?Sized,
{
    // If the labels haven't changed, the selector can't yield different
    // outcomes.
    if old == new {
        return Ok(false);
    }

    let compiled = selector.compile().map_err(|source| CompileError {
        selector: selector.display_form(),
        source,
    })?;

    // An unrestricted selector matches both sides.
    if compiled.is_empty() {
        return Ok(false);
    }

    let matches_old = compiled.matches(old);
    let matches_new = compiled.matches(new);
    trace!(
        selector = %compiled,
        matches_old,
        matches_new,
        "Evaluated selector against old and new labels"
    );

    Ok(matches_old != matches_new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
        LabelSelector, LabelSelectorRequirement,
    };

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_identical_labels_are_unchanged() {
        let old = labels(&[("env", "prod"), ("team", "a")]);
        let new = old.clone();
        assert!(!label_selection_has_changed(&old, &new, "env=prod").unwrap());
    }

    #[test]
    fn test_identical_labels_skip_compilation() {
        // The equality fast path must short-circuit before the selector is
        // compiled, so even an unparsable selector is not an error here.
        let old = labels(&[("env", "prod")]);
        let new = old.clone();
        assert!(!label_selection_has_changed(&old, &new, "env in (prod").unwrap());
    }

    #[test]
    fn test_empty_expression_is_unchanged() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        assert!(!label_selection_has_changed(&old, &new, "").unwrap());
    }

    #[test]
    fn test_none_selector_is_unchanged() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        let raw: Option<&LabelSelector> = None;
        assert!(!label_selection_has_changed(&old, &new, &raw).unwrap());
    }

    #[test]
    fn test_default_label_selector_is_unchanged() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        let raw = LabelSelector::default();
        assert!(!label_selection_has_changed(&old, &new, &raw).unwrap());
    }

    #[test]
    fn test_outcome_diverges() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        assert!(label_selection_has_changed(&old, &new, "env=prod").unwrap());
    }

    #[test]
    fn test_outcome_stable_with_differing_labels() {
        // Both sides keep matching; the selector doesn't care which team.
        let old = labels(&[("env", "prod"), ("team", "a")]);
        let new = labels(&[("env", "prod"), ("team", "b")]);
        assert!(!label_selection_has_changed(&old, &new, "env=prod").unwrap());
    }

    #[test]
    fn test_outcome_stable_when_neither_matches() {
        let old = labels(&[("env", "dev")]);
        let new = labels(&[("env", "staging")]);
        assert!(!label_selection_has_changed(&old, &new, "env=prod").unwrap());
    }

    #[test]
    fn test_malformed_selector_is_an_error() {
        let old = labels(&[("a", "1")]);
        let new = labels(&[("a", "2")]);
        let err = label_selection_has_changed(&old, &new, "env in (prod").unwrap_err();
        assert_eq!(err.selector, "env in (prod");
        assert!(err.to_string().contains("env in (prod"));
    }

    #[test]
    fn test_deterministic() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        let first = label_selection_has_changed(&old, &new, "env=prod").unwrap();
        let second = label_selection_has_changed(&old, &new, "env=prod").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_label_selector_struct_form() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        let raw = LabelSelector {
            match_labels: Some([("env".to_string(), "prod".to_string())].into()),
            ..Default::default()
        };
        assert!(label_selection_has_changed(&old, &new, &raw).unwrap());
    }

    #[test]
    fn test_label_selector_struct_compile_failure() {
        let old = labels(&[("a", "1")]);
        let new = labels(&[("a", "2")]);
        let raw = LabelSelector {
            match_expressions: Some(vec![LabelSelectorRequirement {
                key: "env".to_string(),
                operator: "In".to_string(),
                values: None,
            }]),
            ..Default::default()
        };
        let err = label_selection_has_changed(&old, &new, &raw).unwrap_err();
        assert!(err.selector.contains("env"));
    }

    #[test]
    fn test_set_based_divergence() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "dev")]);
        assert!(label_selection_has_changed(&old, &new, "env in (prod,staging)").unwrap());
    }

    #[test]
    fn test_exists_divergence() {
        let old = labels(&[("team", "a")]);
        let new = LabelSet::new();
        assert!(label_selection_has_changed(&old, &new, "team").unwrap());
    }

    #[test]
    fn test_precompiled_selector_form() {
        let old = labels(&[("env", "prod")]);
        let new = labels(&[("env", "staging")]);
        let compiled = crate::selector::Selector::parse("env=prod").unwrap();
        assert!(label_selection_has_changed(&old, &new, &compiled).unwrap());
    }
}
