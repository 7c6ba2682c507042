//! Artifact writing
//!
//! One sink per run. Every packed file becomes a record: a commented
//! `File:` header, optional program output, an optional head preview, then
//! the content, separated by blank lines so downstream consumers can split
//! records apart again.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Truncate,
    Append,
}

/// One file's worth of material headed for the artifact.
pub struct Record<'a> {
    pub path: &'a str,
    pub content: &'a str,
    pub program_output: Option<&'a str>,
}

pub struct OutputSink {
    writer: BufWriter<File>,
    comment_prefix: String,
    top_n: Option<usize>,
    substitute: bool,
}

impl OutputSink {
    pub fn create(
        path: &Path,
        mode: WriteMode,
        comment_prefix: &str,
        top_n: Option<usize>,
        substitute: bool,
    ) -> Result<Self> {
        let file = match mode {
            WriteMode::Truncate => File::create(path)?,
            WriteMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
        };
        Ok(OutputSink {
            writer: BufWriter::new(file),
            comment_prefix: comment_prefix.to_string(),
            top_n,
            substitute,
        })
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let prefix = &self.comment_prefix;
        write!(self.writer, "{prefix}File: {}\n", record.path)?;

        if let Some(output) = record.program_output {
            write!(self.writer, "{prefix}Program output:\n{output}\n\n")?;
            if self.substitute {
                // Program output stands in for the file content.
                self.writer.write_all(b"\n\n")?;
                return Ok(());
            }
        }

        if let Some(n) = self.top_n {
            let head: Vec<&str> = record.content.lines().take(n).collect();
            write!(self.writer, "{prefix}(top {n} lines)\n{}\n\n", head.join("\n"))?;
        }

        self.writer.write_all(record.content.as_bytes())?;
        self.writer.write_all(b"\n\n")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink_to(
        path: &Path,
        top_n: Option<usize>,
        substitute: bool,
    ) -> OutputSink {
        OutputSink::create(path, WriteMode::Truncate, "# ", top_n, substitute).unwrap()
    }

    #[test]
    fn plain_record_layout() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pack.txt");
        let mut sink = sink_to(&out, None, true);
        sink.write_record(&Record {
            path: "src/app.py",
            content: "x = 1",
            program_output: None,
        })
        .unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "# File: src/app.py\nx = 1\n\n");
    }

    #[test]
    fn program_output_substitutes_content() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pack.txt");
        let mut sink = sink_to(&out, None, true);
        sink.write_record(&Record {
            path: "src/app.py",
            content: "x = 1",
            program_output: Some("3 app.py"),
        })
        .unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("# Program output:\n3 app.py\n"));
        assert!(!text.contains("x = 1"));
    }

    #[test]
    fn no_substitute_keeps_both() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pack.txt");
        let mut sink = sink_to(&out, None, false);
        sink.write_record(&Record {
            path: "src/app.py",
            content: "x = 1",
            program_output: Some("3 app.py"),
        })
        .unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("3 app.py"));
        assert!(text.contains("x = 1"));
    }

    #[test]
    fn top_n_preview_precedes_content() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pack.txt");
        let mut sink = sink_to(&out, Some(2), true);
        sink.write_record(&Record {
            path: "a.py",
            content: "l1\nl2\nl3\nl4",
            program_output: None,
        })
        .unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("# (top 2 lines)\nl1\nl2\n\n"));
        assert!(text.ends_with("l1\nl2\nl3\nl4\n\n"));
    }

    #[test]
    fn append_mode_preserves_existing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pack.txt");
        std::fs::write(&out, "tree\n\n").unwrap();
        let mut sink =
            OutputSink::create(&out, WriteMode::Append, "# ", None, true).unwrap();
        sink.write_record(&Record {
            path: "a.py",
            content: "x = 1",
            program_output: None,
        })
        .unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("tree\n\n# File: a.py\n"));
    }
}
