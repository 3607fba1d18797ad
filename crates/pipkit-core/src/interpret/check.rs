//! `pip check` output.

use super::is_notice_line;

/// Problems reported by `pip check`, one per line.
///
/// An empty result means every installed package has compatible dependencies.
pub fn parse_check(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !is_notice_line(line)
                && !line.starts_with("No broken requirements found")
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_environment() {
        assert!(parse_check("No broken requirements found.\n").is_empty());
    }

    #[test]
    fn test_conflicts_are_listed() {
        let output = "\
flask 2.0.0 has requirement click>=7.1.2, but you have click 7.0.
sphinx 4.0.0 requires docutils, which is not installed.
";
        let problems = parse_check(output);
        assert_eq!(problems.len(), 2);
        assert!(problems[1].contains("docutils"));
    }
}
