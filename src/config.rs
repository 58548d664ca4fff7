// On-disk JSON configuration for scheduled scan runs

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// One scan: which routes to cover, over which date windows, and who
// receives the resulting report. Date fields stay as strings here; the
// date range expander validates them when the scan runs.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub depart_start: String,
    pub depart_end: String,
    pub return_start: String,
    pub return_end: String,
    pub report_emails: Vec<String>,
}

pub fn parse_configs(json: &str) -> Result<Vec<SearchConfig>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

// Load the config file once at startup. Any failure here is fatal to the
// run; there is nothing useful to scan without it.
pub fn load_configs(path: &Path) -> Result<Vec<SearchConfig>, ConfigError> {
    parse_configs(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIGS: &str = r#"[
        {
            "origins": ["JFK", "BOS"],
            "destinations": ["LHR"],
            "depart_start": "2024-01-01",
            "depart_end": "2024-01-05",
            "return_start": "2024-01-10",
            "return_end": "2024-01-12",
            "report_emails": ["alerts@example.com", "backup@example.com"]
        }
    ]"#;

    #[test]
    fn test_parse_sample_configs() {
        let configs = parse_configs(SAMPLE_CONFIGS).unwrap();
        assert_eq!(configs.len(), 1);

        let config = &configs[0];
        assert_eq!(config.origins, vec!["JFK", "BOS"]);
        assert_eq!(config.destinations, vec!["LHR"]);
        assert_eq!(config.depart_start, "2024-01-01");
        assert_eq!(config.return_end, "2024-01-12");
        assert_eq!(config.report_emails.len(), 2);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_configs("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(parse_configs("{not json").is_err());
        assert!(parse_configs(r#"[{"origins": ["JFK"]}]"#).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(load_configs(Path::new("/nonexistent/configs.json")).is_err());
    }
}
