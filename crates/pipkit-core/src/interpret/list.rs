//! `pip list` output.
//!
//! JSON (`--format=json`) is authoritative. When it is missing or broken the
//! parser falls back to the column layout, and finally to the pre-10 legacy
//! `name (version[, location])` layout.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::is_notice_line;
use crate::domain::PackageRecord;

#[derive(Debug, Deserialize)]
struct JsonEntry {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    editable_project_location: Option<String>,
    #[serde(default)]
    latest_version: Option<String>,
}

impl From<JsonEntry> for PackageRecord {
    fn from(entry: JsonEntry) -> Self {
        let editable = entry.editable_project_location.is_some();
        Self {
            name: entry.name,
            version: entry.version.filter(|v| !v.is_empty()),
            location: entry.editable_project_location.or(entry.location),
            editable,
            latest_version: entry.latest_version,
        }
    }
}

static LEGACY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+\(([^,()]+)(?:,\s*([^()]+))?\)\s*$").expect("legacy list pattern")
});

/// Parse `pip list` output into package records.
pub fn parse_list(output: &str) -> Vec<PackageRecord> {
    if output.trim().is_empty() {
        return Vec::new();
    }
    if let Some(records) = parse_json(output) {
        return records;
    }
    debug!("pip list output is not JSON, falling back to column layout");
    parse_columns(output)
}

fn parse_json(output: &str) -> Option<Vec<PackageRecord>> {
    let entries: Vec<JsonEntry> = serde_json::from_str(output.trim()).ok().or_else(|| {
        // pip may print notices around the array
        output.match_indices('[').find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&output[start..])
                .into_iter::<Vec<JsonEntry>>()
                .next()?
                .ok()
        })
    })?;
    Some(
        entries
            .into_iter()
            .filter(|entry| !entry.name.trim().is_empty())
            .map(PackageRecord::from)
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThirdColumn {
    Location,
    EditableLocation,
    Latest,
}

fn parse_columns(output: &str) -> Vec<PackageRecord> {
    let mut third = ThirdColumn::Location;
    let mut records = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_notice_line(trimmed) || is_rule(trimmed) {
            continue;
        }
        if trimmed.starts_with("Package ") || trimmed == "Package" {
            third = header_layout(trimmed);
            continue;
        }
        if let Some(record) = parse_legacy_row(trimmed) {
            records.push(record);
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();
        let Some((version, extra)) = rest.split_first() else {
            debug!(line = trimmed, "skipping list row without version");
            continue;
        };

        let mut record = PackageRecord::new(name, Some((*version).to_string()));
        let extra: Vec<&str> = extra
            .iter()
            .copied()
            .filter(|token| {
                if token.eq_ignore_ascii_case("editable") {
                    record.editable = true;
                    false
                } else {
                    true
                }
            })
            .collect();

        match third {
            ThirdColumn::Latest => {
                record.latest_version = extra.first().map(|v| (*v).to_string());
            }
            ThirdColumn::EditableLocation | ThirdColumn::Location if !extra.is_empty() => {
                // locations may contain spaces
                record.location = Some(extra.join(" "));
                record.editable |= third == ThirdColumn::EditableLocation;
            }
            _ => {}
        }
        records.push(record);
    }
    records
}

fn header_layout(header: &str) -> ThirdColumn {
    let lower = header.to_ascii_lowercase();
    if lower.contains("latest") {
        ThirdColumn::Latest
    } else if lower.contains("editable") {
        ThirdColumn::EditableLocation
    } else {
        ThirdColumn::Location
    }
}

fn is_rule(line: &str) -> bool {
    line.chars().all(|c| c == '-' || c.is_whitespace())
}

fn parse_legacy_row(line: &str) -> Option<PackageRecord> {
    let caps = LEGACY_ROW.captures(line)?;
    let mut record = PackageRecord::new(&caps[1], Some(caps[2].trim().to_string()));
    if let Some(location) = caps.get(3) {
        // legacy output only printed a location for editable installs
        record.location = Some(location.as_str().trim().to_string());
        record.editable = true;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_list("").is_empty());
        assert!(parse_list("  \n").is_empty());
    }

    #[test]
    fn test_json_array() {
        let records = parse_list(r#"[{"name":"pip","version":"23.2.1"}]"#);
        assert_eq!(records, vec![PackageRecord::new("pip", Some("23.2.1".into()))]);
    }

    #[test]
    fn test_json_with_surrounding_notice() {
        let output = "[{\"name\": \"requests\", \"version\": \"2.31.0\", \"editable_project_location\": \"/src/requests\"}]\n\n[notice] A new release of pip is available";
        let records = parse_list(output);
        assert_eq!(records.len(), 1);
        assert!(records[0].editable);
        assert_eq!(records[0].location.as_deref(), Some("/src/requests"));
    }

    #[test]
    fn test_json_outdated_fields() {
        let records = parse_list(
            r#"[{"name":"idna","version":"3.3","latest_version":"3.6","latest_filetype":"wheel"}]"#,
        );
        assert_eq!(records[0].latest_version.as_deref(), Some("3.6"));
    }

    #[test]
    fn test_tabular_single_row() {
        let output = "Package    Version\n---------- -------\nrequests   2.31.0\n";
        let records = parse_list(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "requests");
        assert_eq!(records[0].version.as_deref(), Some("2.31.0"));
        assert!(!records[0].editable);
    }

    #[test]
    fn test_tabular_editable_location_column() {
        let output = "\
Package    Version Editable project location
---------- ------- -------------------------
mytool     0.1.0   /home/dev/My Projects/mytool
six        1.16.0
";
        let records = parse_list(output);
        assert_eq!(records.len(), 2);
        assert!(records[0].editable);
        assert_eq!(
            records[0].location.as_deref(),
            Some("/home/dev/My Projects/mytool")
        );
        assert!(!records[1].editable);
        assert!(records[1].location.is_none());
    }

    #[test]
    fn test_tabular_outdated_and_notices() {
        let output = "\
Package Version Latest Type
------- ------- ------ -----
idna    3.3     3.6    wheel

[notice] A new release of pip is available: 23.2.1 -> 24.0
WARNING: You are using pip version 23.2.1
";
        let records = parse_list(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latest_version.as_deref(), Some("3.6"));
    }

    #[test]
    fn test_editable_marker_token() {
        let records = parse_list("Package Version\n------- -------\nfoo 1.0 editable\n");
        assert!(records[0].editable);
        assert!(records[0].location.is_none());
    }

    #[test]
    fn test_legacy_layout() {
        let output = "pip (9.0.1)\nmylib (0.2, /src/mylib)\n";
        let records = parse_list(output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].version.as_deref(), Some("9.0.1"));
        assert!(records[1].editable);
        assert_eq!(records[1].location.as_deref(), Some("/src/mylib"));
    }

    #[test]
    fn test_row_without_version_is_skipped() {
        let records = parse_list("Package Version\n------- -------\norphan\nok 1.0\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ok");
    }
}
