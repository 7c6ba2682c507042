//! Input traversal
//!
//! Every input kind (remote repo archive, local zip bundle, directory tree)
//! is reduced to the same shape: an ordered list of slash-separated relative
//! paths plus a way to read each one. The packing driver walks that list and
//! never needs to know where the bytes come from.

pub mod dir;
pub mod fetch;
pub mod tree;
pub mod zip;

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::classify::classify;
use crate::core::content::{has_sufficient_content, is_test_file, MIN_CONTENT_LINES};
use crate::core::error::Result;
use crate::core::policy::Policy;
use crate::sink::{OutputSink, Record};
use crate::transform::comments::strip_comments_and_docstrings;
use crate::transform::notebook::convert_notebook;
use crate::transform::pdf::{extract_pdf_text, PDF_PLACEHOLDER};

/// A candidate file pinned to a real filesystem path, for handing to
/// external tools. Archive entries are spilled to a temp file that lives
/// until the value drops.
pub enum Materialized {
    OnDisk(PathBuf),
    Temp(NamedTempFile),
}

impl Materialized {
    pub fn path(&self) -> &Path {
        match self {
            Materialized::OnDisk(path) => path,
            Materialized::Temp(file) => file.path(),
        }
    }
}

/// Uniform view over an input: archives and directories alike
pub trait Source {
    /// Human-readable name of the input, for logging
    fn label(&self) -> String;

    /// Relative candidate paths in this source's canonical order
    fn entries(&mut self) -> Result<Vec<String>>;

    fn read(&mut self, path: &str) -> Result<Vec<u8>>;

    fn materialize(&mut self, path: &str) -> Result<Materialized>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PackStats {
    pub seen: usize,
    pub packed: usize,
    pub skipped: usize,
}

/// Walk a source and write every qualifying file into the sink.
///
/// Per-file failures (unreadable entry, undecodable bytes, broken notebook)
/// skip that file and the run continues; only sink I/O errors abort.
pub fn pack_source(
    source: &mut dyn Source,
    policy: &Policy,
    sink: &mut OutputSink,
) -> Result<PackStats> {
    let mut stats = PackStats::default();
    log::debug!("packing {}", source.label());

    for path in source.entries()? {
        if path.ends_with('/') {
            continue;
        }
        stats.seen += 1;

        let reasons = classify(&path, policy);
        if !reasons.is_empty() {
            log::debug!("skipping {path}: {reasons:?}");
            stats.skipped += 1;
            continue;
        }

        let file_tags = policy.registry.tags_for(&path);

        let program_output = match &policy.program {
            Some(spec) if spec.applies_to(&file_tags) => match source.materialize(&path) {
                Ok(local) => spec.run_on_file(local.path()),
                Err(err) => {
                    log::debug!("cannot materialize {path} for program run: {err}");
                    None
                }
            },
            _ => None,
        };

        let is_pdf = file_tags.iter().any(|t| t == "pdf");
        let content = if is_pdf {
            if policy.pdf_text_mode {
                let extracted = source
                    .materialize(&path)
                    .ok()
                    .and_then(|local| extract_pdf_text(local.path()));
                match extracted {
                    Some(text) => text,
                    None => {
                        log::debug!("skipping {path}: text extraction failed");
                        stats.skipped += 1;
                        continue;
                    }
                }
            } else {
                PDF_PLACEHOLDER.to_string()
            }
        } else {
            let bytes = match source.read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::debug!("cannot read {path}: {err}");
                    stats.skipped += 1;
                    continue;
                }
            };
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    log::debug!("skipping {path}: not valid UTF-8");
                    stats.skipped += 1;
                    continue;
                }
            };
            if path.ends_with(".ipynb") && policy.convert_notebooks {
                match convert_notebook(&text) {
                    Ok(converted) => converted,
                    Err(err) => {
                        log::debug!("skipping {path}: {err}");
                        stats.skipped += 1;
                        continue;
                    }
                }
            } else {
                text
            }
        };

        // Content heuristics apply to real source text, not placeholders.
        if !is_pdf {
            if policy.tags.iter().any(|tag| is_test_file(&content, tag)) {
                log::debug!("skipping {path}: test file");
                stats.skipped += 1;
                continue;
            }
            if !has_sufficient_content(&content, MIN_CONTENT_LINES) {
                log::debug!("skipping {path}: insufficient content");
                stats.skipped += 1;
                continue;
            }
        }

        // Stripping is opted into by requesting the "python" tag; aliases
        // like "py" select python files without rewriting them.
        let python_requested = policy.tags.iter().any(|t| t == "python");
        let is_python = file_tags
            .iter()
            .any(|t| matches!(t.as_str(), "python" | "py" | "ipython" | "ipynb"));
        let content = if python_requested && is_python && !policy.keep_comments {
            match strip_comments_and_docstrings(&content) {
                Ok(stripped) => stripped,
                Err(err) => {
                    log::debug!("keeping comments in {path}: {err}");
                    content
                }
            }
        } else {
            content
        };

        sink.write_record(&Record {
            path: &path,
            content: &content,
            program_output: program_output.as_deref(),
        })?;
        stats.packed += 1;
    }

    Ok(stats)
}
