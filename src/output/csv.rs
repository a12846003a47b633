use super::Report;

pub struct CsvFormatter;

impl CsvFormatter {
    pub fn format(report: &Report, no_headers: bool) -> String {
        let mut lines = Vec::new();

        if !no_headers {
            lines.push(report.columns.join(","));
        }

        for row in &report.rows {
            let escaped: Vec<String> = row
                .iter()
                .map(|val| {
                    if val.contains(',') || val.contains('"') || val.contains('\n') {
                        format!("\"{}\"", val.replace('"', "\"\""))
                    } else {
                        val.clone()
                    }
                })
                .collect();
            lines.push(escaped.join(","));
        }

        lines.join("\n")
    }
}
