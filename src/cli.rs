//! CLI module - argument definitions and the run driver

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use clap::Parser;

use crate::core::error::PackError;
use crate::core::policy::{Policy, PolicyOptions};
use crate::sink::{OutputSink, WriteMode};
use crate::source::dir::DirSource;
use crate::source::fetch::download_archive;
use crate::source::tree::render_tree;
use crate::source::zip::ZipSource;
use crate::source::{pack_source, Source};

/// srcpack - flatten a repository, zip archive, or folder into one text file.
#[derive(Parser, Debug)]
#[command(name = "srcpack")]
#[command(
    author,
    version,
    about,
    long_about = r#"srcpack collects the source files of a project into a single text
artifact, ready to paste into an LLM context window.

The input may be a repository URL, a local .zip archive, or a folder;
all three produce the same record format: a commented `File:` header per
file followed by its (optionally transformed) content.

Examples:
    srcpack https://github.com/acme/widgets --lang python
    srcpack bundle.zip --lang go,md
    srcpack . --lang python --tree --top-n 20
    srcpack src --lang python --program 'python=wc -l'
"#
)]
pub struct Cli {
    /// Repository URL, .zip file, or folder to pack.
    #[arg(
        value_name = "INPUT",
        long_help = "Input to pack. Recognized by shape:\n\
- starts with http(s):// -> remote repository\n\
- ends with .zip         -> local zip archive\n\
- anything else          -> local folder\n\n\
Use --repo/--zip/--folder to state the kind explicitly instead."
    )]
    pub input: Option<String>,

    /// Treat this value as a repository URL.
    #[arg(long, value_name = "URL", conflicts_with_all = ["zip", "folder"])]
    pub repo: Option<String>,

    /// Treat this value as a local zip archive.
    #[arg(long, value_name = "FILE", conflicts_with = "folder")]
    pub zip: Option<PathBuf>,

    /// Treat this value as a local folder.
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Branch or tag to download when the input is a repository.
    #[arg(long, default_value = "master", value_name = "REF")]
    pub branch_or_tag: String,

    /// Languages to pack (comma-separated tags).
    #[arg(
        long,
        default_value = "python",
        value_name = "TAGS",
        long_help = "Comma-separated language tags, e.g. --lang python,go,md.\n\n\
Unknown tags are accepted and match files with the extension `.<tag>`.\n\
The first matching tag also decides the header comment style: `// ` for\n\
go/js inputs, `# ` otherwise."
    )]
    pub lang: String,

    /// Directory names to skip entirely (comma-separated).
    #[arg(
        long,
        default_value = "docs,examples,tests,test,scripts,utils,benchmarks",
        value_name = "DIRS"
    )]
    pub excluded_dirs: String,

    /// Shell-style filename patterns to exclude (comma-separated).
    #[arg(
        long,
        value_name = "PATTERNS",
        long_help = "Comma-separated fnmatch-style patterns, matched against both the\n\
full relative path and the bare file name. Example: --exclude '*_pb2.py,conf*'"
    )]
    pub exclude: Option<String>,

    /// Substrings that force a path in despite excludes (comma-separated).
    #[arg(
        long,
        value_name = "NAMES",
        long_help = "Comma-separated substrings. When given, only paths containing at\n\
least one of them are packed, and matching entries are removed from the\n\
exclude lists."
    )]
    pub include: Option<String>,

    /// Keep comments and docstrings in Python sources.
    #[arg(long)]
    pub keep_comments: bool,

    /// Convert Jupyter notebooks (.ipynb) to Python-style script text.
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_name = "BOOL",
        long_help = "Convert .ipynb notebooks to script-style text before packing.\n\
On by default; pass --convert-notebooks=false to pack the raw JSON."
    )]
    pub convert_notebooks: bool,

    /// Extract text from PDF files instead of writing a placeholder.
    #[arg(long, long_help = "Extract PDF text with the external `pdftotext` tool.\n\
Without this flag PDF files are represented by a one-line placeholder.")]
    pub pdf_text_mode: bool,

    /// Also write the first N lines of each file as a preview block.
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// Prepend a directory tree listing (folder input only).
    #[arg(long)]
    pub tree: bool,

    /// Extra flags passed through to the `tree` command.
    #[arg(long, value_name = "FLAGS")]
    pub tree_flags: Option<String>,

    /// Run a command on each matching file: 'tag=command'.
    #[arg(
        long,
        value_name = "TAG=CMD",
        long_help = "Run a shell command on every packed file of the given tag and\n\
capture its stdout into the artifact. The file path is appended to the\n\
command. Use tag `*` to match every requested language.\n\n\
Example: --program 'python=wc -l'"
    )]
    pub program: Option<String>,

    /// Keep file content alongside program output instead of replacing it.
    #[arg(long)]
    pub no_substitute: bool,

    /// Append this string to the artifact file name.
    #[arg(long, value_name = "NAME")]
    pub name_append: Option<String>,

    /// Directory the artifact is written into.
    #[arg(long, default_value = "outputs", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Pipe the artifact through `fabric` to produce a summary file.
    #[arg(long)]
    pub summarize: bool,

    /// Arguments passed to fabric when summarizing.
    #[arg(long, default_value = "literal", value_name = "ARGS")]
    pub fabric_args: String,

    /// Copy the artifact to the clipboard with `pbcopy`.
    #[arg(long)]
    pub copy_clipboard: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// Which kind of input the run operates on
enum Input {
    Repo(String),
    Bundle(PathBuf),
    Folder(PathBuf),
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let tags = split_csv(&cli.lang);
    let policy = Policy::build(PolicyOptions {
        tags,
        excluded_dirs: split_csv(&cli.excluded_dirs),
        exclude: cli.exclude.as_deref().map(split_csv).unwrap_or_default(),
        include: cli.include.as_deref().map(split_csv).unwrap_or_default(),
        keep_comments: cli.keep_comments,
        convert_notebooks: cli.convert_notebooks,
        pdf_text_mode: cli.pdf_text_mode,
        top_n: cli.top_n,
        program: cli.program.clone(),
        no_substitute: cli.no_substitute,
    })?;

    let input = resolve_input(&cli)?;
    let artifact = artifact_path(&cli, &input, &policy.tags);
    std::fs::create_dir_all(&cli.output_dir)?;
    if artifact.exists() {
        log::info!(
            "Output file {} already exists. Removing it.",
            artifact.display()
        );
        std::fs::remove_file(&artifact)?;
    }

    let mut mode = WriteMode::Truncate;
    let mut source: Box<dyn Source> = match &input {
        Input::Repo(url) => {
            log::info!("Downloading repository");
            let bytes = download_archive(url, &cli.branch_or_tag)?;
            Box::new(ZipSource::from_bytes(bytes, url)?)
        }
        Input::Bundle(path) => {
            log::info!("Processing zip file");
            Box::new(ZipSource::open(path)?)
        }
        Input::Folder(path) => {
            log::info!("Processing folder");
            if cli.tree {
                let listing = render_tree(path, &policy.exclude_patterns, cli.tree_flags.as_deref());
                std::fs::write(&artifact, format!("{listing}\n\n"))?;
                log::info!("File tree prepended to output file");
                mode = WriteMode::Append;
            }
            Box::new(DirSource::new(path, &policy.excluded_dirs))
        }
    };

    let mut sink = OutputSink::create(
        &artifact,
        mode,
        policy.comment_prefix(),
        policy.top_n,
        !policy.no_substitute,
    )?;
    let stats = pack_source(source.as_mut(), &policy, &mut sink)?;
    sink.finish()?;

    if stats.packed > 0 {
        log::info!(
            "Combined {} source code saved to {} ({} of {} candidates packed, {} skipped)",
            policy.tags.join(", "),
            artifact.display(),
            stats.packed,
            stats.seen,
            stats.skipped
        );
    } else {
        log::info!("No source code found to save -- check the input arguments");
        return Ok(());
    }

    if cli.summarize {
        summarize_artifact(&artifact, &cli.fabric_args);
    }

    if cli.copy_clipboard {
        log::info!("Copying the output to the clipboard");
        run_shell(&format!("cat \"{}\" | pbcopy", artifact.display()));
    }

    Ok(())
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn resolve_input(cli: &Cli) -> Result<Input> {
    if let Some(url) = &cli.repo {
        return Ok(Input::Repo(url.clone()));
    }
    if let Some(path) = &cli.zip {
        return Ok(Input::Bundle(path.clone()));
    }
    if let Some(path) = &cli.folder {
        return Ok(Input::Folder(path.clone()));
    }
    match cli.input.as_deref() {
        Some(raw) if raw.starts_with("http") && raw.contains("://") => {
            Ok(Input::Repo(raw.to_string()))
        }
        Some(raw) if raw.ends_with(".zip") => Ok(Input::Bundle(PathBuf::from(raw))),
        Some(raw) => Ok(Input::Folder(PathBuf::from(raw))),
        None => Err(PackError::InputNotRecognized.into()),
    }
}

/// `<output-dir>/<stem>_<tags>[_<append>].txt`
fn artifact_path(cli: &Cli, input: &Input, tags: &[String]) -> PathBuf {
    let stem = artifact_stem(input);
    let mut name = format!("{stem}_{}", tags.join(","));
    if let Some(append) = &cli.name_append {
        name.push('_');
        name.push_str(append);
    }
    name.push_str(".txt");
    cli.output_dir.join(name)
}

fn artifact_stem(input: &Input) -> String {
    match input {
        Input::Repo(url) => {
            let base = url.trim_end_matches('/').trim_end_matches(".git");
            base.rsplit('/').next().unwrap_or(base).to_string()
        }
        Input::Bundle(path) => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archive".to_string()),
        Input::Folder(path) => {
            let absolute = path.canonicalize().unwrap_or_else(|_| path.clone());
            match find_git_root(&absolute) {
                Some(root) => basename_of(&root),
                None => {
                    log::warn!("No git folder found in the path");
                    basename_of(&absolute)
                }
            }
        }
    }
}

/// Nearest ancestor (the folder itself included) containing a `.git` entry
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn basename_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn summarize_artifact(artifact: &Path, fabric_args: &str) {
    log::info!("Generating code summary using Fabric...");
    let summary = artifact.with_extension("").display().to_string() + "_summary.txt";
    let command = format!(
        "cat \"{}\" | fabric --{fabric_args} > \"{summary}\"",
        artifact.display()
    );
    if run_shell(&command) {
        log::info!("Code summary saved to {summary}");
    } else {
        log::error!("Failed to generate summary; make sure fabric is on PATH");
    }
}

fn run_shell(command: &str) -> bool {
    log::debug!("Running command: {command}");
    match Command::new("sh").arg("-c").arg(command).status() {
        Ok(status) => status.success(),
        Err(err) => {
            log::error!("Failed to run '{command}': {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli(args: &[&str]) -> Cli {
        let mut argv = vec!["srcpack"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn url_input_is_a_repo() {
        let cli = base_cli(&["https://github.com/acme/widgets"]);
        assert!(matches!(resolve_input(&cli).unwrap(), Input::Repo(_)));
    }

    #[test]
    fn zip_suffix_is_a_bundle() {
        let cli = base_cli(&["snapshot.zip"]);
        assert!(matches!(resolve_input(&cli).unwrap(), Input::Bundle(_)));
    }

    #[test]
    fn plain_path_is_a_folder() {
        let cli = base_cli(&["src"]);
        assert!(matches!(resolve_input(&cli).unwrap(), Input::Folder(_)));
    }

    #[test]
    fn missing_input_is_an_error() {
        let cli = base_cli(&[]);
        assert!(resolve_input(&cli).is_err());
    }

    #[test]
    fn explicit_kind_beats_inference() {
        let cli = base_cli(&["--repo", "https://github.com/acme/widgets", "thing.zip"]);
        assert!(matches!(resolve_input(&cli).unwrap(), Input::Repo(_)));
    }

    #[test]
    fn artifact_name_joins_stem_tags_and_append() {
        let cli = base_cli(&["--lang", "python,go", "--name-append", "v2", "x.zip"]);
        let input = Input::Bundle(PathBuf::from("x.zip"));
        let tags = vec!["python".to_string(), "go".to_string()];
        assert_eq!(
            artifact_path(&cli, &input, &tags),
            PathBuf::from("outputs/x_python,go_v2.txt")
        );
    }

    #[test]
    fn repo_stems_drop_git_suffix() {
        let input = Input::Repo("https://github.com/acme/widgets.git".to_string());
        assert_eq!(artifact_stem(&input), "widgets");
    }
}
