// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Compilation from the Kubernetes `LabelSelector` API type
//!
//! `matchLabels` entries become equality requirements, `matchExpressions`
//! map by operator name. `In`/`NotIn` require a non-empty value list,
//! `Exists`/`DoesNotExist` take none, and any other operator is invalid. A
//! default (empty) selector compiles to the unrestricted selector.

use std::collections::BTreeSet;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};

use super::validation::{validate_label_key, validate_label_value};
use super::{Requirement, Selector};
use crate::error::ParseError;

impl TryFrom<&LabelSelector> for Selector {
    type Error = ParseError;

    fn try_from(selector: &LabelSelector) -> Result<Self, Self::Error> {
        let mut requirements = Vec::new();

        if let Some(match_labels) = &selector.match_labels {
            for (key, value) in match_labels {
                validate_label_key(key)?;
                validate_label_value(key, value)?;
                requirements.push(Requirement::Equals {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }

        if let Some(expressions) = &selector.match_expressions {
            for expression in expressions {
                requirements.push(convert_expression(expression)?);
            }
        }

        Ok(Selector::new(requirements))
    }
}

fn convert_expression(expression: &LabelSelectorRequirement) -> Result<Requirement, ParseError> {
    let key = expression.key.clone();
    validate_label_key(&key)?;

    let values = expression.values.clone().unwrap_or_default();

    match expression.operator.as_str() {
        "In" | "NotIn" => {
            if values.is_empty() {
                return Err(ParseError::MissingValues {
                    key,
                    operator: expression.operator.clone(),
                });
            }
            for value in &values {
                validate_label_value(&key, value)?;
            }
            let values: BTreeSet<String> = values.into_iter().collect();
            if expression.operator == "In" {
                Ok(Requirement::In { key, values })
            } else {
                Ok(Requirement::NotIn { key, values })
            }
        }
        "Exists" | "DoesNotExist" => {
            if !values.is_empty() {
                return Err(ParseError::UnexpectedValues {
                    key,
                    operator: expression.operator.clone(),
                });
            }
            if expression.operator == "Exists" {
                Ok(Requirement::Exists { key })
            } else {
                Ok(Requirement::DoesNotExist { key })
            }
        }
        other => Err(ParseError::InvalidOperator {
            operator: other.to_string(),
        }),
    }
}
