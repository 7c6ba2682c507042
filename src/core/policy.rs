//! Selection policy - immutable per-run filtering and transform options
//!
//! Built once from CLI input and read-only afterwards. Construction merges
//! the excluded directory names into the exclude glob patterns, so a
//! directory name can never slip back in through an extension match alone.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::core::error::{PackError, Result};
use crate::core::registry::ExtensionRegistry;
use crate::transform::program::ProgramSpec;

/// Raw options as collected by the CLI, before reconciliation
#[derive(Debug, Clone, Default)]
pub struct PolicyOptions {
    pub tags: Vec<String>,
    pub excluded_dirs: Vec<String>,
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub keep_comments: bool,
    pub convert_notebooks: bool,
    pub pdf_text_mode: bool,
    pub top_n: Option<usize>,
    pub program: Option<String>,
    pub no_substitute: bool,
}

/// Immutable per-run selection and transform policy
#[derive(Debug, Clone)]
pub struct Policy {
    pub tags: Vec<String>,
    pub excluded_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    exclude_set: GlobSet,
    pub include: Vec<String>,
    pub keep_comments: bool,
    pub convert_notebooks: bool,
    pub pdf_text_mode: bool,
    pub top_n: Option<usize>,
    pub program: Option<ProgramSpec>,
    pub no_substitute: bool,
    pub registry: ExtensionRegistry,
}

impl Policy {
    pub fn build(opts: PolicyOptions) -> Result<Self> {
        let mut registry = ExtensionRegistry::builtin();
        for tag in &opts.tags {
            if !registry.contains(tag) {
                registry.register(tag);
            }
        }

        let mut excluded_dirs = opts.excluded_dirs;
        let mut exclude_patterns = opts.exclude;

        // An explicit include wins over a conflicting exclude entry.
        reconcile_includes(&opts.include, &mut exclude_patterns);
        reconcile_includes(&opts.include, &mut excluded_dirs);

        for dir in &excluded_dirs {
            if !exclude_patterns.contains(dir) {
                exclude_patterns.push(dir.clone());
            }
        }

        let exclude_set = build_glob_set(&exclude_patterns)?;

        let program = match opts.program.as_deref() {
            Some(raw) => match ProgramSpec::parse(raw) {
                Some(spec) => {
                    log::info!(
                        "Will run '{}' on files of type '{}'",
                        spec.command,
                        spec.tag
                    );
                    Some(spec)
                }
                None => {
                    log::error!("Invalid program format, ignoring --program option");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            tags: opts.tags,
            excluded_dirs,
            exclude_patterns,
            exclude_set,
            include: opts.include,
            keep_comments: opts.keep_comments,
            convert_notebooks: opts.convert_notebooks,
            pdf_text_mode: opts.pdf_text_mode,
            top_n: opts.top_n,
            program,
            no_substitute: opts.no_substitute,
            registry,
        })
    }

    pub fn exclude_set(&self) -> &GlobSet {
        &self.exclude_set
    }

    /// Header comment prefix, chosen once per run from the requested tags
    pub fn comment_prefix(&self) -> &'static str {
        if self.tags.iter().any(|t| t == "go" || t == "js") {
            "// "
        } else {
            "# "
        }
    }
}

/// Drop exclude entries that the user explicitly included
fn reconcile_includes(includes: &[String], excludes: &mut Vec<String>) {
    for include in includes {
        if excludes.iter().any(|e| e == include) {
            log::debug!("Removing {} from the exclude list", include);
            excludes.retain(|e| e != include);
        }
    }
}

/// Shell-style wildcard set; `*` crosses path separators like fnmatch does
fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.trim()).map_err(|e| PackError::Glob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| PackError::Glob {
        pattern: String::new(),
        message: e.to_string(),
    })
}
