//! Directory tree preview via the external `tree` tool

use std::path::Path;
use std::process::Command;

/// Render a tree listing for a directory, excluding the named directories.
/// A missing or failing `tree` binary degrades to an error note inside the
/// artifact instead of aborting the run.
pub fn render_tree(root: &Path, excluded_dirs: &[String], extra_flags: Option<&str>) -> String {
    let mut cmd = Command::new("tree");
    if !excluded_dirs.is_empty() {
        cmd.arg("-I").arg(excluded_dirs.join("|")).arg("--prune");
    }
    if let Some(flags) = extra_flags {
        cmd.args(flags.split_whitespace());
    }
    cmd.arg(root);

    match cmd.output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Ok(output) => format!(
            "Error generating file tree: tree exited with {}\n",
            output.status
        ),
        Err(err) => format!("Error generating file tree: {err}\n"),
    }
}
