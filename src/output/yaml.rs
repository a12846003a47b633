use super::Report;

pub struct YamlFormatter;

impl YamlFormatter {
    pub fn format(report: &Report) -> String {
        let rows = report.to_json_rows();
        serde_yaml::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
    }
}
