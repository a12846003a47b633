//! Report shaping
//!
//! Projects resolved bindings into the fixed six-column report, one row per
//! PDB in input order. Pure projection: all matching decisions were made by
//! the resolver, and the `TARGET-NOT-FOUND` / `-1` sentinels exist only
//! here, as rendering of an unresolved binding.

use crate::claim::PdbRecord;
use crate::output::Report;
use crate::resolve::Binding;

/// Sentinel for the type and name columns of an unresolved PDB.
pub const TARGET_NOT_FOUND: &str = "TARGET-NOT-FOUND";

/// Replica-count sentinel for an unresolved PDB.
pub const NO_REPLICAS: &str = "-1";

/// Column names, in report order. The names and their order are the
/// compatibility contract with existing consumers of the CSV report.
pub const COLUMNS: [&str; 6] = [
    "pdb-name",
    "pdb-minAvailable",
    "pdb-maxUnavailable",
    "target-type",
    "target-name",
    "target-replicas",
];

/// Build the report. `bindings` must be the resolver's output for `pdbs`,
/// in the same order.
pub fn build(pdbs: &[PdbRecord], bindings: &[Binding]) -> Report {
    let rows = pdbs
        .iter()
        .zip(bindings)
        .map(|(pdb, binding)| row(pdb, binding))
        .collect();

    Report {
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

fn row(pdb: &PdbRecord, binding: &Binding) -> Vec<String> {
    let min_available = pdb
        .min_available
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_default();
    let max_unavailable = pdb
        .max_unavailable
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_default();

    let (target_type, target_name, target_replicas) = match &binding.target {
        Some(target) => (
            target.kind.to_string(),
            target.name.clone(),
            target.replicas.to_string(),
        ),
        None => (
            TARGET_NOT_FOUND.to_string(),
            TARGET_NOT_FOUND.to_string(),
            NO_REPLICAS.to_string(),
        ),
    };

    vec![
        pdb.name.clone(),
        min_available,
        max_unavailable,
        target_type,
        target_name,
        target_replicas,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{IntOrString, WorkloadKind};
    use crate::resolve::Target;

    fn pdb(name: &str, min: Option<IntOrString>, max: Option<IntOrString>) -> PdbRecord {
        PdbRecord {
            name: name.to_string(),
            min_available: min,
            max_unavailable: max,
            selector: None,
        }
    }

    #[test]
    fn test_resolved_row() {
        let pdbs = vec![pdb("pdb-a", Some(IntOrString::Int(1)), None)];
        let bindings = vec![Binding {
            pdb: "pdb-a".to_string(),
            target: Some(Target {
                kind: WorkloadKind::Deployment,
                name: "dep-a".to_string(),
                replicas: 3,
            }),
        }];

        let report = build(&pdbs, &bindings);
        assert_eq!(
            report.rows,
            vec![vec![
                "pdb-a".to_string(),
                "1".to_string(),
                "".to_string(),
                "deployment".to_string(),
                "dep-a".to_string(),
                "3".to_string(),
            ]]
        );
    }

    #[test]
    fn test_unresolved_row_uses_sentinels() {
        let pdbs = vec![pdb(
            "pdb-b",
            None,
            Some(IntOrString::String("25%".to_string())),
        )];
        let bindings = vec![Binding {
            pdb: "pdb-b".to_string(),
            target: None,
        }];

        let report = build(&pdbs, &bindings);
        assert_eq!(
            report.rows[0],
            vec!["pdb-b", "", "25%", TARGET_NOT_FOUND, TARGET_NOT_FOUND, "-1"]
        );
    }

    #[test]
    fn test_rows_preserve_pdb_order() {
        let pdbs = vec![pdb("z", None, None), pdb("a", None, None)];
        let bindings = vec![
            Binding {
                pdb: "z".to_string(),
                target: None,
            },
            Binding {
                pdb: "a".to_string(),
                target: None,
            },
        ];

        let report = build(&pdbs, &bindings);
        assert_eq!(report.rows[0][0], "z");
        assert_eq!(report.rows[1][0], "a");
    }

    #[test]
    fn test_column_contract() {
        let report = build(&[], &[]);
        assert_eq!(
            report.columns,
            vec![
                "pdb-name",
                "pdb-minAvailable",
                "pdb-maxUnavailable",
                "target-type",
                "target-name",
                "target-replicas",
            ]
        );
        assert!(report.is_empty());
    }

    #[test]
    fn test_statefulset_kind_rendering() {
        let pdbs = vec![pdb("pdb-s", None, None)];
        let bindings = vec![Binding {
            pdb: "pdb-s".to_string(),
            target: Some(Target {
                kind: WorkloadKind::StatefulSet,
                name: "sts-a".to_string(),
                replicas: 5,
            }),
        }];

        let report = build(&pdbs, &bindings);
        assert_eq!(report.rows[0][3], "statefulset");
        assert_eq!(report.rows[0][5], "5");
    }
}
