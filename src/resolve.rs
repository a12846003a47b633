// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Target resolution
//!
//! For each PDB: compile its selector, evaluate it against every candidate
//! workload's pod-template labels (deployments first, then stateful sets,
//! both in input order), and decide:
//!
//! - zero matches: an unresolved binding, reported as such;
//! - exactly one match: the binding carries that workload;
//! - more than one match (within a kind or across kinds): an ambiguous
//!   target, a configuration inconsistency rather than a normal outcome.
//!
//! Every PDB is resolved independently; [`resolve_all`] collects all
//! failures instead of aborting at the first one, so a single bad budget
//! never hides the diagnostics for the rest of the bundle.

use thiserror::Error;
use tracing::debug;

use crate::claim::{PdbRecord, Workload, WorkloadKind};
use crate::selector::SelectorError;

/// Per-PDB resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("pdb {pdb}: invalid selector: {source}")]
    SelectorCompilation {
        pdb: String,
        #[source]
        source: SelectorError,
    },

    #[error("pdb {pdb}: selector matches more than one workload ({first} and {second})")]
    AmbiguousTarget {
        pdb: String,
        first: String,
        second: String,
    },
}

/// All resolution failures from one pass over the bundle.
#[derive(Debug, Error)]
#[error("{} PDB(s) could not be resolved", .0.len())]
pub struct ResolveErrors(pub Vec<ResolveError>);

/// The candidate workloads, read-only and in input order. Order matters:
/// it determines which workloads an ambiguity error names.
#[derive(Debug)]
pub struct CandidatePool {
    deployments: Vec<Workload>,
    stateful_sets: Vec<Workload>,
}

impl CandidatePool {
    pub fn new(deployments: Vec<Workload>, stateful_sets: Vec<Workload>) -> Self {
        Self {
            deployments,
            stateful_sets,
        }
    }

    /// Deployments first, then stateful sets, each in input order.
    fn iter(&self) -> impl Iterator<Item = &Workload> {
        self.deployments.iter().chain(self.stateful_sets.iter())
    }

    pub fn len(&self) -> usize {
        self.deployments.len() + self.stateful_sets.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty() && self.stateful_sets.is_empty()
    }
}

/// The workload a PDB governs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: WorkloadKind,
    pub name: String,
    pub replicas: i32,
}

/// Resolution result for one PDB. `target: None` means no candidate
/// matched, an expected and reportable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub pdb: String,
    pub target: Option<Target>,
}

/// Resolve a single PDB against the candidate pool.
pub fn resolve(pdb: &PdbRecord, pool: &CandidatePool) -> Result<Binding, ResolveError> {
    // A PDB with no selector field selects nothing (nil-selector
    // semantics); an explicitly empty selector matches everything.
    let Some(selector) = &pdb.selector else {
        debug!(pdb = %pdb.name, "no selector, leaving unresolved");
        return Ok(Binding {
            pdb: pdb.name.clone(),
            target: None,
        });
    };

    let compiled = selector
        .compile()
        .map_err(|source| ResolveError::SelectorCompilation {
            pdb: pdb.name.clone(),
            source,
        })?;

    // Collect all matches before deciding, so the zero/one/many policy is
    // applied atomically per PDB.
    let matches: Vec<&Workload> = pool
        .iter()
        .filter(|workload| compiled.matches(&workload.labels))
        .collect();

    match matches.as_slice() {
        [] => {
            debug!(pdb = %pdb.name, "no matching workload");
            Ok(Binding {
                pdb: pdb.name.clone(),
                target: None,
            })
        }
        [workload] => {
            debug!(pdb = %pdb.name, target = %workload.name, kind = %workload.kind, "resolved");
            Ok(Binding {
                pdb: pdb.name.clone(),
                target: Some(Target {
                    kind: workload.kind,
                    name: workload.name.clone(),
                    replicas: workload.replicas,
                }),
            })
        }
        [first, second, ..] => Err(ResolveError::AmbiguousTarget {
            pdb: pdb.name.clone(),
            first: format!("{}/{}", first.kind, first.name),
            second: format!("{}/{}", second.kind, second.name),
        }),
    }
}

/// Resolve every PDB in input order.
///
/// Either all bindings succeed, or the complete list of failures is
/// returned; a partial report is never produced.
pub fn resolve_all(pdbs: &[PdbRecord], pool: &CandidatePool) -> Result<Vec<Binding>, ResolveErrors> {
    let mut bindings = Vec::with_capacity(pdbs.len());
    let mut errors = Vec::new();

    for pdb in pdbs {
        match resolve(pdb, pool) {
            Ok(binding) => bindings.push(binding),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(bindings)
    } else {
        Err(ResolveErrors(errors))
    }
}
