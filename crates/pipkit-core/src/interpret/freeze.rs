//! `pip freeze` / requirements-style output.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::PackageRecord;

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)(?:\[[^\]]*\])?\s*(?:(?P<op>===|==|~=|!=|>=|<=|>|<)\s*(?P<rest>[^;\s]+))?\s*(?:;.*)?$",
    )
    .expect("requirement pattern")
});

/// Parse `pip freeze` output into package records.
pub fn parse_freeze(output: &str) -> Vec<PackageRecord> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<PackageRecord> {
    let line = strip_comment(line.trim());
    if line.is_empty() {
        return None;
    }

    if let Some(target) = editable_target(line) {
        return editable_name(target).map(PackageRecord::editable);
    }
    if line.starts_with('-') {
        // -i, -r, -c, --find-links, ...
        return None;
    }

    if let Some((name, _url)) = line.split_once(" @ ") {
        let name = name.trim();
        return (!name.is_empty()).then(|| PackageRecord::new(name, None));
    }

    let caps = REQUIREMENT.captures(line)?;
    let version = match (caps.name("op"), caps.name("rest")) {
        (Some(op), Some(rest)) if op.as_str() == "==" => Some(rest.as_str().to_string()),
        (Some(op), Some(rest)) => Some(format!("{}{}", op.as_str(), rest.as_str())),
        _ => None,
    };
    Some(PackageRecord::new(&caps["name"], version))
}

/// Drop a trailing ` # comment`. A `#` without leading whitespace is a URL
/// fragment (`#egg=`), not a comment.
fn strip_comment(line: &str) -> &str {
    if line.starts_with('#') {
        return "";
    }
    line.find(" #")
        .or_else(|| line.find("\t#"))
        .map_or(line, |idx| line[..idx].trim_end())
}

fn editable_target(line: &str) -> Option<&str> {
    ["-e ", "-e\t", "--editable ", "--editable="]
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(str::trim)
        .filter(|target| !target.is_empty())
}

/// Name of an editable requirement: the `#egg=` fragment for VCS URLs,
/// otherwise the last path component.
fn editable_name(target: &str) -> Option<String> {
    if let Some((_, fragment)) = target.split_once("#egg=") {
        let name = fragment.split('&').next().unwrap_or_default().trim();
        return (!name.is_empty()).then(|| name.to_string());
    }
    let path = target
        .split_once('#')
        .map_or(target, |(path, _)| path)
        .trim_end_matches(['/', '\\']);
    let tail = path.rsplit(['/', '\\']).next().unwrap_or_default();
    (!tail.is_empty() && tail != "." && tail != "..").then(|| tail.to_string())
}
