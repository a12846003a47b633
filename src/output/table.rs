use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};

use super::Report;

pub struct TableFormatter;

impl TableFormatter {
    pub fn format(report: &Report, no_headers: bool) -> String {
        if report.rows.is_empty() {
            return "(0 rows)".to_string();
        }

        let mut table = Table::new();
        // ASCII_BORDERS_ONLY_CONDENSED is close to psql style
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);

        if !no_headers {
            table.set_header(&report.columns);
        }

        for row in &report.rows {
            table.add_row(row);
        }

        let output = table.to_string();
        format!("{}\n({} rows)", output, report.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report {
            columns: vec!["pdb-name".to_string(), "target-name".to_string()],
            rows: vec![
                vec!["pdb-a".to_string(), "dep-a".to_string()],
                vec!["pdb-b".to_string(), "TARGET-NOT-FOUND".to_string()],
            ],
        }
    }

    #[test]
    fn test_table_has_header_and_footer() {
        let out = TableFormatter::format(&report(), false);
        assert!(out.contains("pdb-name"));
        assert!(out.contains("dep-a"));
        assert!(out.ends_with("(2 rows)"));
    }

    #[test]
    fn test_table_no_headers() {
        let out = TableFormatter::format(&report(), true);
        assert!(!out.contains("pdb-name"));
        assert!(out.contains("pdb-a"));
    }

    #[test]
    fn test_empty_table() {
        let empty = Report {
            columns: vec!["pdb-name".to_string()],
            rows: vec![],
        };
        assert_eq!(TableFormatter::format(&empty, false), "(0 rows)");
    }
}
