//! Zip archive sources - downloaded repo archives and local bundles

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::ZipArchive;

use crate::core::error::Result;
use crate::source::{Materialized, Source};

/// A source backed by a zip archive, either fetched into memory or opened
/// from disk. Entries keep the archive's own order.
pub struct ZipSource<R: Read + Seek> {
    archive: ZipArchive<R>,
    label: String,
}

impl ZipSource<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>, label: &str) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(ZipSource {
            archive,
            label: label.to_string(),
        })
    }
}

impl ZipSource<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let archive = ZipArchive::new(File::open(path)?)?;
        Ok(ZipSource {
            archive,
            label: path.display().to_string(),
        })
    }
}

impl<R: Read + Seek> Source for ZipSource<R> {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn entries(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            names.push(self.archive.by_index(index)?.name().to_string());
        }
        Ok(names)
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut entry = self.archive.by_name(path)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn materialize(&mut self, path: &str) -> Result<Materialized> {
        let bytes = self.read(path)?;
        let suffix = Path::new(path)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut file = tempfile::Builder::new().suffix(&suffix).tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(Materialized::Temp(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn sample_archive() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.add_directory("repo-main/src/", options).unwrap();
        writer.start_file("repo-main/src/app.py", options).unwrap();
        writer.write_all(b"x = 1\n").unwrap();
        writer.start_file("repo-main/README.md", options).unwrap();
        writer.write_all(b"# readme\n").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn entries_keep_archive_order() {
        let mut source = ZipSource::from_bytes(sample_archive(), "sample").unwrap();
        assert_eq!(
            source.entries().unwrap(),
            vec![
                "repo-main/src/".to_string(),
                "repo-main/src/app.py".to_string(),
                "repo-main/README.md".to_string(),
            ]
        );
    }

    #[test]
    fn reads_entry_bytes() {
        let mut source = ZipSource::from_bytes(sample_archive(), "sample").unwrap();
        assert_eq!(source.read("repo-main/src/app.py").unwrap(), b"x = 1\n");
    }

    #[test]
    fn materialize_spills_to_temp_file() {
        let mut source = ZipSource::from_bytes(sample_archive(), "sample").unwrap();
        let local = source.materialize("repo-main/src/app.py").unwrap();
        let text = std::fs::read_to_string(local.path()).unwrap();
        assert_eq!(text, "x = 1\n");
        assert!(local.path().to_string_lossy().ends_with(".py"));
    }
}
