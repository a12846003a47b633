// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Claim bundle loading
//!
//! Input is a certsuite-style claim file: one JSON document carrying the
//! PodDisruptionBudgets under test plus the candidate Deployments and
//! StatefulSets. Only the fields the resolver needs are deserialized
//! (identity, disruption tolerance, selector, replica count, pod-template
//! labels); everything else in the bundle is ignored. Records are extracted
//! once at startup and are immutable for the rest of the run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::selector::LabelSelector;

/// Which kind of workload a candidate is. A tag for reporting, not a
/// subtype distinction: both kinds are matched identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadKind::Deployment => write!(f, "deployment"),
            WorkloadKind::StatefulSet => write!(f, "statefulset"),
        }
    }
}

/// `minAvailable` / `maxUnavailable` as declared: an absolute count or a
/// percentage string. Carried opaquely and rendered verbatim; never
/// evaluated against replica counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    String(String),
}

impl fmt::Display for IntOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntOrString::Int(n) => write!(f, "{}", n),
            IntOrString::String(s) => write!(f, "{}", s),
        }
    }
}

/// One PodDisruptionBudget, flattened to what resolution needs.
///
/// `selector: None` means the bundle carried no selector field at all; that
/// matches nothing, while an explicitly empty selector matches everything.
#[derive(Debug, Clone)]
pub struct PdbRecord {
    pub name: String,
    pub min_available: Option<IntOrString>,
    pub max_unavailable: Option<IntOrString>,
    pub selector: Option<LabelSelector>,
}

/// One candidate workload: identity, declared scale, and the labels of its
/// pod template (the labels PDB selectors are evaluated against).
#[derive(Debug, Clone)]
pub struct Workload {
    pub name: String,
    pub kind: WorkloadKind,
    pub replicas: i32,
    pub labels: BTreeMap<String, String>,
}

/// The loaded bundle, ready for resolution. Input order is preserved.
#[derive(Debug, Clone)]
pub struct Claim {
    pub pdbs: Vec<PdbRecord>,
    pub deployments: Vec<Workload>,
    pub stateful_sets: Vec<Workload>,
}

/// Load and flatten a claim file.
pub fn load_claim(path: &Path) -> Result<Claim> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read claim file: {}", path.display()))?;
    let bundle: Bundle = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse claim file: {}", path.display()))?;
    Ok(bundle.into_claim())
}

// Raw wire shapes below. Field names mirror the bundle, so serde renames
// are concentrated here and the rest of the crate sees flat records.

#[derive(Debug, Deserialize)]
struct Bundle {
    claim: BundleClaim,
}

#[derive(Debug, Deserialize)]
struct BundleClaim {
    #[serde(default)]
    configurations: Configurations,
}

#[derive(Debug, Default, Deserialize)]
struct Configurations {
    #[serde(rename = "PodDisruptionBudgets", default)]
    pod_disruption_budgets: Vec<RawPdb>,
    #[serde(rename = "testDeployments", default)]
    test_deployments: Vec<RawWorkload>,
    #[serde(rename = "testStatefulSets", default)]
    test_stateful_sets: Vec<RawWorkload>,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawPdb {
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    spec: RawPdbSpec,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPdbSpec {
    min_available: Option<IntOrString>,
    max_unavailable: Option<IntOrString>,
    selector: Option<LabelSelector>,
}

#[derive(Debug, Deserialize)]
struct RawWorkload {
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    spec: RawWorkloadSpec,
}

#[derive(Debug, Default, Deserialize)]
struct RawWorkloadSpec {
    replicas: Option<i32>,
    #[serde(default)]
    template: PodTemplate,
}

#[derive(Debug, Default, Deserialize)]
struct PodTemplate {
    #[serde(default)]
    metadata: TemplateMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct TemplateMetadata {
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

impl Bundle {
    fn into_claim(self) -> Claim {
        let configurations = self.claim.configurations;
        Claim {
            pdbs: configurations
                .pod_disruption_budgets
                .into_iter()
                .map(|pdb| PdbRecord {
                    name: pdb.metadata.name,
                    min_available: pdb.spec.min_available,
                    max_unavailable: pdb.spec.max_unavailable,
                    selector: pdb.spec.selector,
                })
                .collect(),
            deployments: configurations
                .test_deployments
                .into_iter()
                .map(|w| w.into_workload(WorkloadKind::Deployment))
                .collect(),
            stateful_sets: configurations
                .test_stateful_sets
                .into_iter()
                .map(|w| w.into_workload(WorkloadKind::StatefulSet))
                .collect(),
        }
    }
}

impl RawWorkload {
    fn into_workload(self, kind: WorkloadKind) -> Workload {
        Workload {
            name: self.metadata.name,
            kind,
            // Kubernetes defaults spec.replicas to 1 when omitted
            replicas: self.spec.replicas.unwrap_or(1),
            labels: self.spec.template.metadata.labels,
        }
    }
}
