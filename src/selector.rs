// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Label selector compilation and matching
//!
//! PodDisruptionBudgets pick their targets with the standard Kubernetes
//! label selector: an equality map (`matchLabels`) and/or a list of
//! expression requirements (`matchExpressions`). Both surface forms compile
//! through [`LabelSelector::compile`] into a single conjunction of
//! requirements, the same folding `metav1.LabelSelectorAsSelector` performs
//! server-side. Matching is a pure function of the compiled selector and a
//! label set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selector validation failures, surfaced at compile time rather than being
/// silently treated as non-matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unknown selector operator {0:?}")]
    UnknownOperator(String),

    #[error("operator {operator} on key {key:?} requires at least one value")]
    MissingValues { key: String, operator: String },

    #[error("operator {operator} on key {key:?} does not take values")]
    UnexpectedValues { key: String, operator: String },
}

/// Wire form of a label selector as it appears in the claim bundle.
///
/// Both fields are optional; a selector with neither matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
    #[serde(default)]
    pub match_expressions: Vec<SelectorRequirement>,
}

/// One `matchExpressions` entry, operator still unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorRequirement {
    pub key: String,
    pub operator: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[derive(Debug, Clone)]
struct Requirement {
    key: String,
    operator: Operator,
    values: Vec<String>,
}

impl Requirement {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self.operator {
            Operator::Exists => labels.contains_key(&self.key),
            Operator::DoesNotExist => !labels.contains_key(&self.key),
            Operator::In => labels
                .get(&self.key)
                .is_some_and(|value| self.values.iter().any(|allowed| allowed == value)),
            // NotIn also holds when the key is absent
            Operator::NotIn => labels
                .get(&self.key)
                .is_none_or(|value| self.values.iter().all(|excluded| excluded != value)),
        }
    }
}

/// A validated selector, ready to evaluate against pod-template labels.
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    requirements: Vec<Requirement>,
}

impl CompiledSelector {
    /// True iff every requirement holds. Zero requirements matches any
    /// label set, including the empty one.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|req| req.matches(labels))
    }
}

impl LabelSelector {
    /// Compile into a predicate, validating every requirement.
    ///
    /// `matchLabels` pairs become single-value `In` requirements, so the
    /// predicate is one conjunction regardless of which surface form (or
    /// mix of both) the selector used.
    pub fn compile(&self) -> Result<CompiledSelector, SelectorError> {
        let mut requirements =
            Vec::with_capacity(self.match_labels.len() + self.match_expressions.len());

        for (key, value) in &self.match_labels {
            requirements.push(Requirement {
                key: key.clone(),
                operator: Operator::In,
                values: vec![value.clone()],
            });
        }

        for expr in &self.match_expressions {
            requirements.push(expr.validate()?);
        }

        Ok(CompiledSelector { requirements })
    }
}

impl SelectorRequirement {
    fn validate(&self) -> Result<Requirement, SelectorError> {
        let operator = match self.operator.as_str() {
            "In" => Operator::In,
            "NotIn" => Operator::NotIn,
            "Exists" => Operator::Exists,
            "DoesNotExist" => Operator::DoesNotExist,
            other => return Err(SelectorError::UnknownOperator(other.to_string())),
        };

        match operator {
            Operator::In | Operator::NotIn if self.values.is_empty() => {
                return Err(SelectorError::MissingValues {
                    key: self.key.clone(),
                    operator: self.operator.clone(),
                });
            }
            Operator::Exists | Operator::DoesNotExist if !self.values.is_empty() => {
                return Err(SelectorError::UnexpectedValues {
                    key: self.key.clone(),
                    operator: self.operator.clone(),
                });
            }
            _ => {}
        }

        Ok(Requirement {
            key: self.key.clone(),
            operator,
            values: self.values.clone(),
        })
    }
}
