//! Per-file external program execution
//!
//! A program spec binds a shell command to a language tag. For every packed
//! file whose tag matches, the command runs with the file path appended and
//! its stdout is captured into the artifact.

use std::path::Path;
use std::process::Command;

/// A `tag=command` pair from the command line. The tag `*` matches every
/// requested language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    pub tag: String,
    pub command: String,
}

impl ProgramSpec {
    /// Parse a raw `tag=command` argument. Malformed specs are logged and
    /// ignored rather than aborting the run.
    pub fn parse(raw: &str) -> Option<Self> {
        let (tag, command) = raw.split_once('=')?;
        let tag = tag.trim();
        let command = command.trim();
        if tag.is_empty() || command.is_empty() {
            return None;
        }
        Some(ProgramSpec {
            tag: tag.to_string(),
            command: command.to_string(),
        })
    }

    pub fn applies_to(&self, tags: &[String]) -> bool {
        self.tag == "*" || tags.iter().any(|t| t == &self.tag)
    }

    /// Run the command against one file and capture stdout. Failures are
    /// logged and yield no output; the file is still packed.
    pub fn run_on_file(&self, path: &Path) -> Option<String> {
        let full = format!("{} \"{}\"", self.command, path.display());
        let output = match Command::new("sh").arg("-c").arg(&full).output() {
            Ok(output) => output,
            Err(err) => {
                log::debug!("failed to spawn program for {}: {err}", path.display());
                return None;
            }
        };
        if !output.status.success() {
            log::debug!(
                "program exited with {} for {}",
                output.status,
                path.display()
            );
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.is_empty() {
            log::debug!("program produced no output for {}", path.display());
            return None;
        }
        Some(stdout)
    }
}
