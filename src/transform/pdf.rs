//! PDF text extraction via the external `pdftotext` tool

use std::path::Path;
use std::process::Command;

/// Written into the artifact for PDF files when text extraction is off.
pub const PDF_PLACEHOLDER: &str = "[PDF file - use --pdf-text-mode to extract text]";

/// Extract plain text from a PDF with `pdftotext`. A missing tool or a
/// failing extraction is logged and the caller falls back to the
/// placeholder.
pub fn extract_pdf_text(path: &Path) -> Option<String> {
    let output = match Command::new("pdftotext").arg(path).arg("-").output() {
        Ok(output) => output,
        Err(err) => {
            log::debug!("failed to run pdftotext for {}: {err}", path.display());
            return None;
        }
    };
    if !output.status.success() {
        log::debug!(
            "pdftotext exited with {} for {}",
            output.status,
            path.display()
        );
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
