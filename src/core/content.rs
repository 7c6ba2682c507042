//! Content heuristics - test-file detection and substance threshold
//!
//! Both checks are substring/line heuristics, not parsers. The line counter
//! only understands `#` and `//` comment markers, so languages with other
//! comment syntaxes are undercounted; that is a documented limitation.

/// Minimum number of substantive lines for a file to be worth packing
pub const MIN_CONTENT_LINES: usize = 10;

/// Does the decoded text look like a test file for the given tag?
/// Unknown tags have no markers and are never flagged.
pub fn is_test_file(content: &str, tag: &str) -> bool {
    let markers: &[&str] = match tag {
        "python" | "mojo" => &[
            "import unittest",
            "import pytest",
            "from unittest",
            "from pytest",
        ],
        "go" => &["import testing", "func Test"],
        "js" => &["describe(", "it(", "test(", "expect(", "jest", "mocha"],
        _ => &[],
    };
    markers.iter().any(|m| content.contains(m))
}

/// Count lines that are non-blank after trimming and do not start with a
/// comment marker; accept iff the count reaches the threshold.
pub fn has_sufficient_content(content: &str, min_lines: usize) -> bool {
    let substantive = content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .count();
    substantive >= min_lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python_test_imports() {
        assert!(is_test_file("import pytest\n\ndef test_x(): pass\n", "python"));
        assert!(is_test_file("from unittest import TestCase\n", "python"));
        assert!(!is_test_file("import os\n", "python"));
    }

    #[test]
    fn detects_go_test_markers() {
        assert!(is_test_file("func TestThing(t *testing.T) {}\n", "go"));
        assert!(!is_test_file("func Thing() {}\n", "go"));
    }

    #[test]
    fn unknown_tag_is_never_a_test() {
        assert!(!is_test_file("describe( it( test( expect(", "ruby"));
    }

    #[test]
    fn sufficiency_counts_only_substantive_lines() {
        let text = "x = 1\n# comment\n\n// comment\ny = 2\n";
        assert!(!has_sufficient_content(text, 3));
        assert!(has_sufficient_content(text, 2));
    }

    #[test]
    fn sufficiency_is_threshold_monotonic() {
        let qualifying: String = (0..MIN_CONTENT_LINES)
            .map(|i| format!("value_{} = {}\n", i, i))
            .collect();
        assert!(has_sufficient_content(&qualifying, MIN_CONTENT_LINES));

        let truncated: String = qualifying
            .lines()
            .take(MIN_CONTENT_LINES - 1)
            .map(|l| format!("{}\n", l))
            .collect();
        assert!(!has_sufficient_content(&truncated, MIN_CONTENT_LINES));
    }

    #[test]
    fn indented_comments_do_not_count() {
        let text = "    # indented\n\t// also indented\ncode()\n";
        assert!(has_sufficient_content(text, 1));
        assert!(!has_sufficient_content(text, 2));
    }
}
