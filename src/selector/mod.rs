// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Label selector compilation and evaluation
//!
//! A [`Selector`] is a conjunction of [`Requirement`]s over a label set. It
//! compiles from two raw forms: the standard string expression grammar
//! (`"app=nginx,env in (prod,staging)"`) and the Kubernetes `LabelSelector`
//! API type. A selector with no requirements matches every label set.
//! Evaluation is total; only compilation can fail.

mod convert;
mod parse;
pub(crate) mod validation;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;

use crate::error::ParseError;
use crate::labels::LabelSet;

/// One clause of a label selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// `key=value`: the key is present with exactly this value.
    Equals { key: String, value: String },
    /// `key!=value`: satisfied by a different value or an absent key.
    NotEquals { key: String, value: String },
    /// `key in (v1,v2)`: the key is present with one of these values.
    In { key: String, values: BTreeSet<String> },
    /// `key notin (v1,v2)`: satisfied by a value outside the set or an
    /// absent key.
    NotIn { key: String, values: BTreeSet<String> },
    /// `key`: the key is present, any value.
    Exists { key: String },
    /// `!key`: the key is absent.
    DoesNotExist { key: String },
}

impl Requirement {
    /// The label key this requirement constrains.
    pub fn key(&self) -> &str {
        match self {
            Requirement::Equals { key, .. }
            | Requirement::NotEquals { key, .. }
            | Requirement::In { key, .. }
            | Requirement::NotIn { key, .. }
            | Requirement::Exists { key }
            | Requirement::DoesNotExist { key } => key,
        }
    }

    pub fn matches(&self, labels: &LabelSet) -> bool {
        match self {
            Requirement::Equals { key, value } => labels.get(key) == Some(value),
            Requirement::NotEquals { key, value } => labels.get(key) != Some(value),
            Requirement::In { key, values } => {
                labels.get(key).is_some_and(|v| values.contains(v))
            }
            Requirement::NotIn { key, values } => {
                labels.get(key).is_none_or(|v| !values.contains(v))
            }
            Requirement::Exists { key } => labels.contains_key(key),
            Requirement::DoesNotExist { key } => !labels.contains_key(key),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |values: &BTreeSet<String>| {
            values
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            Requirement::Equals { key, value } => write!(f, "{}={}", key, value),
            Requirement::NotEquals { key, value } => write!(f, "{}!={}", key, value),
            Requirement::In { key, values } => write!(f, "{} in ({})", key, join(values)),
            Requirement::NotIn { key, values } => write!(f, "{} notin ({})", key, join(values)),
            Requirement::Exists { key } => write!(f, "{}", key),
            Requirement::DoesNotExist { key } => write!(f, "!{}", key),
        }
    }
}

/// A compiled label selector: a conjunction of requirements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// The unrestricted selector. Matches every label set.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Requirements are kept sorted by key so `Display` output and
    /// comparisons are stable regardless of input order.
    pub(crate) fn new(mut requirements: Vec<Requirement>) -> Self {
        requirements.sort_by(|a, b| a.key().cmp(b.key()));
        Self { requirements }
    }

    /// Compile a selector expression, e.g. `"app=nginx,env in (prod,staging)"`.
    pub fn parse(expression: &str) -> Result<Self, ParseError> {
        parse::parse(expression)
    }

    /// True when the selector has no requirements and therefore matches
    /// every label set.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Evaluate the selector against a label set.
    pub fn matches(&self, labels: &LabelSet) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        Selector::parse(expression)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .requirements
            .iter()
            .map(Requirement::to_string)
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(","))
    }
}

/// A raw selector form that can be compiled into an executable [`Selector`].
///
/// The change detector accepts any raw form so callers can hand over
/// whatever they hold: an expression string, the `LabelSelector` API type
/// (possibly behind an `Option`, where `None` means "no restriction"), or a
/// selector that was already compiled.
pub trait RawSelector {
    /// Compile into an executable selector.
    fn compile(&self) -> Result<Selector, ParseError>;

    /// Textual form of the raw selector, used in compile failure
    /// diagnostics.
    fn display_form(&self) -> String;
}

impl RawSelector for str {
    fn compile(&self) -> Result<Selector, ParseError> {
        Selector::parse(self)
    }

    fn display_form(&self) -> String {
        self.to_string()
    }
}

impl RawSelector for String {
    fn compile(&self) -> Result<Selector, ParseError> {
        self.as_str().compile()
    }

    fn display_form(&self) -> String {
        self.clone()
    }
}

impl RawSelector for LabelSelector {
    fn compile(&self) -> Result<Selector, ParseError> {
        Selector::try_from(self)
    }

    fn display_form(&self) -> String {
        format!("{:?}", self)
    }
}

impl RawSelector for Option<&LabelSelector> {
    fn compile(&self) -> Result<Selector, ParseError> {
        match self {
            Some(selector) => selector.compile(),
            None => Ok(Selector::everything()),
        }
    }

    fn display_form(&self) -> String {
        match self {
            Some(selector) => selector.display_form(),
            None => "<none>".to_string(),
        }
    }
}

impl RawSelector for Selector {
    fn compile(&self) -> Result<Selector, ParseError> {
        Ok(self.clone())
    }

    fn display_form(&self) -> String {
        self.to_string()
    }
}
