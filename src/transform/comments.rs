//! Python comment and docstring stripping
//!
//! A line scanner, not a parser: it tracks string state well enough to leave
//! `#` inside literals alone and to drop docstrings that open a module,
//! class or function body. Output is approximate by design. If the scanner
//! loses track (unterminated triple-quoted string) it reports an error and
//! the caller keeps the original content.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{PackError, Result};

static DOCSTRING_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[rRbBuUfF]{0,2}("""|''')"#).unwrap());

static DEF_OR_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(async\s+def|def|class)\b").unwrap());

/// Strip `#` comments and docstrings from Python source
pub fn strip_comments_and_docstrings(source: &str) -> Result<String> {
    let mut out = String::new();
    // A docstring may follow the module start or a def/class header.
    let mut expect_docstring = true;
    // Some(delim, dropping) while inside a triple-quoted string.
    let mut triple: Option<(&'static str, bool)> = None;

    for line in source.split('\n') {
        if let Some((delim, dropping)) = triple {
            match line.find(delim) {
                Some(_) => {
                    triple = None;
                    if dropping {
                        expect_docstring = false;
                    } else {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                None => {
                    if !dropping {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
            continue;
        }

        let trimmed = line.trim_start();

        if expect_docstring {
            if let Some(caps) = DOCSTRING_OPENER.captures(trimmed) {
                let delim: &'static str = if &caps[1] == "\"\"\"" { "\"\"\"" } else { "'''" };
                let after = &trimmed[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
                if after.contains(delim) {
                    // One-line docstring, drop the whole line.
                    expect_docstring = false;
                } else {
                    triple = Some((delim, true));
                }
                continue;
            }
        }

        let (kept, entered) = scan_code_line(line);
        if let Some(delim) = entered {
            triple = Some((delim, false));
            out.push_str(kept.trim_end());
            out.push('\n');
            continue;
        }

        let stripped = kept.trim_end();
        if stripped.trim().is_empty() {
            if !line.trim().is_empty() {
                // The whole line was a comment; drop it entirely.
                continue;
            }
            out.push('\n');
            continue;
        }

        out.push_str(stripped);
        out.push('\n');

        let logical = stripped.trim();
        expect_docstring = DEF_OR_CLASS.is_match(logical) && logical.ends_with(':');
    }

    if triple.is_some() {
        return Err(PackError::CommentStrip(
            "unterminated triple-quoted string".to_string(),
        ));
    }

    // split('\n') yields one trailing empty element for newline-terminated
    // input; avoid doubling the final newline.
    if out.ends_with('\n') && !source.ends_with('\n') {
        out.pop();
    } else if out.ends_with("\n\n") && source.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Scan one code line: cut `#` comments outside strings, report a
/// triple-quoted string left open at end of line.
fn scan_code_line(line: &str) -> (&str, Option<&'static str>) {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut simple_quote: Option<u8> = None;

    while i < bytes.len() {
        let c = bytes[i];
        match simple_quote {
            Some(q) => {
                if c == b'\\' {
                    i += 1;
                } else if c == q {
                    simple_quote = None;
                }
            }
            None => match c {
                b'"' | b'\'' => {
                    let delim: &'static str = if c == b'"' { "\"\"\"" } else { "'''" };
                    if bytes[i..].starts_with(delim.as_bytes()) {
                        // Triple-quoted string; closed on this line?
                        match line[i + 3..].find(delim) {
                            Some(close) => {
                                i += 3 + close + 2;
                            }
                            None => return (line, Some(delim)),
                        }
                    } else {
                        simple_quote = Some(c);
                    }
                }
                b'#' => return (&line[..i], None),
                _ => {}
            },
        }
        i += 1;
    }
    (line, None)
}
