//! Extension registry - language/format tags mapped to file suffixes
//!
//! A tag is a filtering key like `python` or `pdf`. Several tags may share a
//! suffix (shell/bash/zsh all map to `.sh`), and one tag may own several
//! suffixes (`cpp` owns `.cpp`, `.h`, `.hpp`). The registry is a plain value
//! owned by the selection policy, so registrations never leak across runs.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::core::error::{PackError, Result};

static BUILTIN_EXTENSIONS: Lazy<BTreeMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| {
        let mut map: BTreeMap<&'static str, &'static [&'static str]> = BTreeMap::new();
        map.insert("python", &[".py"]);
        map.insert("py", &[".py"]);
        map.insert("ipython", &[".ipynb"]);
        map.insert("ipynb", &[".ipynb"]);
        map.insert("go", &[".go"]);
        map.insert("js", &[".js"]);
        map.insert("javascript", &[".js"]);
        map.insert("html", &[".html"]);
        map.insert("mojo", &[".mojo"]);
        map.insert("java", &[".java"]);
        map.insert("c", &[".c", ".h"]);
        map.insert("cpp", &[".cpp", ".h", ".hpp"]);
        map.insert("c++", &[".cpp", ".h", ".hpp"]);
        map.insert("csharp", &[".cs"]);
        map.insert("ruby", &[".rb"]);
        map.insert("markdown", &[".md", ".markdown", ".mdx"]);
        map.insert("md", &[".md"]);
        map.insert("matlab", &[".m"]);
        map.insert("shell", &[".sh"]);
        map.insert("bash", &[".sh"]);
        map.insert("zsh", &[".sh"]);
        map.insert("toml", &[".toml"]);
        map.insert("pdf", &[".pdf"]);
        map
    });

/// Tag-to-suffix mapping for one run
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    entries: BTreeMap<String, Vec<String>>,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExtensionRegistry {
    /// Registry seeded with the builtin tag table
    pub fn builtin() -> Self {
        let entries = BUILTIN_EXTENSIONS
            .iter()
            .map(|(tag, suffixes)| {
                (
                    tag.to_string(),
                    suffixes.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Look up the suffixes owned by a tag
    pub fn resolve(&self, tag: &str) -> Result<&[String]> {
        self.entries
            .get(tag)
            .map(Vec::as_slice)
            .ok_or_else(|| PackError::UnknownTag(tag.to_string()))
    }

    /// Register a new tag whose sole suffix is `.{tag}`. Idempotent; known
    /// tags are left untouched.
    pub fn register(&mut self, tag: &str) {
        if !self.entries.contains_key(tag) {
            log::info!("Registering new extension tag: {}", tag);
            self.entries
                .insert(tag.to_string(), vec![format!(".{}", tag)]);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Every registered tag whose suffix set matches the path. Deterministic
    /// (alphabetical) order.
    pub fn tags_for(&self, path: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, suffixes)| suffixes.iter().any(|s| path.ends_with(s.as_str())))
            .map(|(tag, _)| tag.clone())
            .collect()
    }
}
