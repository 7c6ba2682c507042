//! Local directory source

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::core::error::Result;
use crate::source::{Materialized, Source};

/// A source backed by a directory tree. Paths are reported relative to the
/// root with `/` separators, sorted, so repeated runs over the same tree
/// produce identical artifacts.
pub struct DirSource {
    root: PathBuf,
    excluded_dirs: Vec<String>,
}

impl DirSource {
    pub fn new(root: &Path, excluded_dirs: &[String]) -> Self {
        DirSource {
            root: root.to_path_buf(),
            excluded_dirs: excluded_dirs.to_vec(),
        }
    }
}

impl Source for DirSource {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn entries(&mut self) -> Result<Vec<String>> {
        let excluded = self.excluded_dirs.clone();
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .filter_entry(move |entry| {
                // Prune excluded directories early; files inside them would
                // be rejected by classification anyway.
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !excluded.iter().any(|d| d.as_str() == name)
            })
            .build();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("walk error under {}: {err}", self.root.display());
                    continue;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                paths.push(parts.join("/"));
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.root.join(path))?)
    }

    fn materialize(&mut self, path: &str) -> Result<Materialized> {
        Ok(Materialized::OnDisk(self.root.join(path)))
    }
}
