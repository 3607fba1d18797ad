//! `pip show` output.
//!
//! Each record is a block of `Key: value` fields. Indented lines continue
//! the previous field; records are separated by a `---` line.

use super::is_notice_line;
use crate::domain::PackageDetail;

/// Parse the first record of `pip show` output.
///
/// Returns `None` when the output holds no record with a `Name` field.
pub fn parse_show(output: &str) -> Option<PackageDetail> {
    parse_show_many(output).into_iter().next()
}

/// Parse every `---`-separated record of `pip show` output.
pub fn parse_show_many(output: &str) -> Vec<PackageDetail> {
    split_records(output)
        .into_iter()
        .filter_map(|block| build_detail(&collect_fields(&block)))
        .collect()
}

fn split_records(output: &str) -> Vec<Vec<&str>> {
    let mut records = vec![Vec::new()];
    for line in output.lines() {
        if line.trim() == "---" {
            records.push(Vec::new());
        } else if let Some(current) = records.last_mut() {
            current.push(line);
        }
    }
    records
}

/// Scan a record into ordered `(key, value)` pairs with continuations folded in.
fn collect_fields(lines: &[&str]) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in lines {
        let indented = line.starts_with([' ', '\t']);
        if line.trim().is_empty() || (!indented && is_notice_line(line)) {
            continue;
        }
        if !indented {
            if let Some((key, value)) = split_key(line) {
                fields.push((key.to_string(), value.trim().to_string()));
                continue;
            }
        }
        // Continuation of the current field; text before the first key is dropped.
        if let Some((_, value)) = fields.last_mut() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line.trim());
        }
    }
    fields
}

fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let valid = !key.is_empty()
        && key.starts_with(|c: char| c.is_ascii_alphabetic())
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '));
    valid.then_some((key, value))
}

fn build_detail(fields: &[(String, String)]) -> Option<PackageDetail> {
    let mut detail = PackageDetail::default();

    for (key, value) in fields {
        let text = || (!value.is_empty()).then(|| value.clone());
        match key.to_ascii_lowercase().as_str() {
            "name" => detail.name = value.clone(),
            "version" => detail.version = text(),
            "summary" => detail.summary = text(),
            "home-page" => detail.home_page = text(),
            "author" => detail.author = text(),
            "author-email" => detail.author_email = text(),
            "license" => detail.license = text(),
            "location" => detail.location = text(),
            "requires" => detail.requires = split_list(value),
            "required-by" => detail.required_by = split_list(value),
            "files" => {
                detail.files = value
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {
                detail.metadata.insert(key.clone(), value.clone());
            }
        }
    }

    (!detail.name.is_empty()).then_some(detail)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
