//! Rendering of package records and details.

use std::fmt::Write as _;

use pipkit_core::{PackageDetail, PackageRecord};
use pipkit_runtime::InstallReport;
use pipkit_runtime::install::AttemptOutcome;

use super::tables::{format_optional, separator, truncate_string};

/// Installed packages as an aligned table.
pub fn package_table(records: &[PackageRecord]) -> String {
    let show_latest = records.iter().any(|r| r.latest_version.is_some());
    let mut out = String::new();

    if show_latest {
        let _ = writeln!(out, "{:<30} {:<14} {:<14} Location", "Package", "Version", "Latest");
    } else {
        let _ = writeln!(out, "{:<30} {:<14} Location", "Package", "Version");
    }
    let _ = writeln!(out, "{}", separator(if show_latest { 75 } else { 60 }));

    for record in records {
        let version = format_optional(record.version.as_ref(), "--");
        let location = match (&record.location, record.editable) {
            (Some(location), true) => format!("{location} (editable)"),
            (Some(location), false) => location.clone(),
            (None, true) => "(editable)".to_string(),
            (None, false) => String::new(),
        };
        if show_latest {
            let latest = format_optional(record.latest_version.as_ref(), "--");
            let _ = writeln!(
                out,
                "{:<30} {:<14} {:<14} {location}",
                truncate_string(&record.name, 29),
                truncate_string(&version, 13),
                truncate_string(&latest, 13),
            );
        } else {
            let _ = writeln!(
                out,
                "{:<30} {:<14} {location}",
                truncate_string(&record.name, 29),
                truncate_string(&version, 13),
            );
        }
    }
    out.trim_end().to_string()
}

/// Requirements-file lines, one per record.
pub fn requirement_lines(records: &[PackageRecord]) -> String {
    records
        .iter()
        .map(|record| {
            if record.editable {
                format!("-e {}", record.location.as_deref().unwrap_or(&record.name))
            } else {
                match &record.version {
                    Some(version) if version.starts_with(|c: char| c.is_ascii_digit()) => {
                        format!("{}=={version}", record.name)
                    }
                    Some(version) => format!("{}{version}", record.name),
                    None => record.name.clone(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `pip show`-style block for one package.
pub fn detail_block(detail: &PackageDetail) -> String {
    let mut out = String::new();
    let mut field = |key: &str, value: Option<&String>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "{key}: {value}");
        }
    };
    let name = Some(detail.name.clone());
    field("Name", name.as_ref());
    field("Version", detail.version.as_ref());
    field("Summary", detail.summary.as_ref());
    field("Home-page", detail.home_page.as_ref());
    field("Author", detail.author.as_ref());
    field("License", detail.license.as_ref());
    field("Location", detail.location.as_ref());

    let _ = writeln!(out, "Requires: {}", detail.requires.join(", "));
    let _ = writeln!(out, "Required-by: {}", detail.required_by.join(", "));
    if !detail.files.is_empty() {
        let _ = writeln!(out, "Files:");
        for file in &detail.files {
            let _ = writeln!(out, "  {file}");
        }
    }
    out.trim_end().to_string()
}

/// One line per attempted strategy.
pub fn install_report(report: &InstallReport) -> String {
    if report.was_already_installed() {
        return "pip is already installed".to_string();
    }
    let mut out = String::new();
    for attempt in &report.attempts {
        let status = match &attempt.outcome {
            AttemptOutcome::Succeeded => "ok".to_string(),
            AttemptOutcome::Unavailable { reason, .. } => format!("skipped ({reason})"),
            AttemptOutcome::Failed { kind, message } => format!("failed [{kind}] {message}"),
        };
        let _ = writeln!(out, "  {:<28} {status}", attempt.strategy);
    }
    let _ = write!(
        out,
        "Installed pip with {} in {:.1}s",
        report.strategy.as_deref().unwrap_or("unknown strategy"),
        report.duration.as_secs_f64()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_record() {
        let records = vec![
            PackageRecord::new("requests", Some("2.31.0".into())),
            PackageRecord {
                location: Some("/src/mypkg".into()),
                ..PackageRecord::editable("mypkg")
            },
        ];
        let table = package_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Package"));
        assert!(!lines[0].contains("Latest"));
        assert!(lines[3].contains("/src/mypkg (editable)"));
    }

    #[test]
    fn test_table_shows_latest_column_for_outdated() {
        let records = vec![PackageRecord {
            latest_version: Some("2.32.0".into()),
            ..PackageRecord::new("requests", Some("2.31.0".into()))
        }];
        assert!(package_table(&records).contains("Latest"));
    }

    #[test]
    fn test_requirement_lines() {
        let records = vec![
            PackageRecord::new("requests", Some("2.31.0".into())),
            PackageRecord::new("flask", Some(">=2.0".into())),
            PackageRecord::editable("mypkg"),
        ];
        assert_eq!(
            requirement_lines(&records),
            "requests==2.31.0\nflask>=2.0\n-e mypkg"
        );
    }

    #[test]
    fn test_detail_block_skips_empty_fields() {
        let detail = PackageDetail {
            name: "requests".into(),
            version: Some("2.31.0".into()),
            requires: vec!["idna".into(), "certifi".into()],
            ..PackageDetail::default()
        };
        let block = detail_block(&detail);
        assert!(block.starts_with("Name: requests\nVersion: 2.31.0"));
        assert!(!block.contains("Summary"));
        assert!(block.contains("Requires: idna, certifi"));
    }
}
