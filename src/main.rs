// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod claim;
mod cli;
mod output;
mod report;
mod resolve;
mod selector;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;

use cli::Args;
use resolve::CandidatePool;

/// Initialize logging to stderr, keeping stdout clean for the report
fn init_logging(verbose: bool) {
    let filter = if verbose { "pdbmap=debug" } else { "pdbmap=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let claim = claim::load_claim(&args.claim)?;
    tracing::debug!(
        pdbs = claim.pdbs.len(),
        deployments = claim.deployments.len(),
        stateful_sets = claim.stateful_sets.len(),
        "claim loaded"
    );

    let pool = CandidatePool::new(claim.deployments, claim.stateful_sets);
    tracing::debug!(candidates = pool.len(), "candidate pool built");

    let bindings = match resolve::resolve_all(&claim.pdbs, &pool) {
        Ok(bindings) => bindings,
        Err(errors) => {
            for error in &errors.0 {
                eprintln!("Error: {}", error);
            }
            eprintln!("Error: {}", errors);
            std::process::exit(1);
        }
    };

    let result = report::build(&claim.pdbs, &bindings);
    println!("{}", result.format(&args.output, args.no_headers));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::OutputFormat;

    // End-to-end over a bundle exercising all three binding outcomes the
    // resolver can produce for well-formed input.
    const CLAIM: &str = r#"{
        "claim": {
            "configurations": {
                "PodDisruptionBudgets": [
                    {
                        "metadata": {"name": "pdb-a"},
                        "spec": {
                            "minAvailable": 1,
                            "selector": {"matchLabels": {"app": "x"}}
                        }
                    },
                    {
                        "metadata": {"name": "pdb-b"},
                        "spec": {
                            "maxUnavailable": "25%",
                            "selector": {"matchLabels": {"app": "y"}}
                        }
                    },
                    {
                        "metadata": {"name": "pdb-c"},
                        "spec": {
                            "minAvailable": "50%",
                            "selector": {
                                "matchExpressions": [
                                    {"key": "app", "operator": "In", "values": ["z"]}
                                ]
                            }
                        }
                    }
                ],
                "testDeployments": [
                    {
                        "metadata": {"name": "dep-a"},
                        "spec": {
                            "replicas": 3,
                            "template": {"metadata": {"labels": {"app": "x"}}}
                        }
                    }
                ],
                "testStatefulSets": [
                    {
                        "metadata": {"name": "sts-z"},
                        "spec": {
                            "replicas": 2,
                            "template": {"metadata": {"labels": {"app": "z"}}}
                        }
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn test_end_to_end_csv_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("claim.json");
        std::fs::write(&path, CLAIM).unwrap();

        let claim = claim::load_claim(&path).unwrap();
        let pool = CandidatePool::new(claim.deployments, claim.stateful_sets);
        let bindings = resolve::resolve_all(&claim.pdbs, &pool).unwrap();
        let result = report::build(&claim.pdbs, &bindings);

        let csv = result.format(&OutputFormat::Csv, false);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "pdb-name,pdb-minAvailable,pdb-maxUnavailable,target-type,target-name,target-replicas",
                "pdb-a,1,,deployment,dep-a,3",
                "pdb-b,,25%,TARGET-NOT-FOUND,TARGET-NOT-FOUND,-1",
                "pdb-c,50%,,statefulset,sts-z,2",
            ]
        );
    }

    #[test]
    fn test_end_to_end_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("claim.json");
        std::fs::write(&path, CLAIM).unwrap();

        let claim = claim::load_claim(&path).unwrap();
        let pool = CandidatePool::new(claim.deployments.clone(), claim.stateful_sets.clone());

        let first = report::build(&claim.pdbs, &resolve::resolve_all(&claim.pdbs, &pool).unwrap());
        let second = report::build(&claim.pdbs, &resolve::resolve_all(&claim.pdbs, &pool).unwrap());
        assert_eq!(first, second);
    }
}
