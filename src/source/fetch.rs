//! Remote repository archive download

use crate::core::error::{PackError, Result};

/// Build the archive URL for a repository ref, GitHub layout.
pub fn archive_url(repo_url: &str, branch_or_tag: &str) -> String {
    let base = repo_url.trim_end_matches('/').trim_end_matches(".git");
    format!("{base}/archive/refs/heads/{branch_or_tag}.zip")
}

/// Download the zip archive of a repository ref into memory. A non-success
/// HTTP status is fatal for the run.
pub fn download_archive(repo_url: &str, branch_or_tag: &str) -> Result<Vec<u8>> {
    let url = archive_url(repo_url, branch_or_tag);
    log::info!("downloading {url}");
    let response = reqwest::blocking::get(&url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(PackError::Fetch {
            url,
            status: status.as_u16(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_layout() {
        assert_eq!(
            archive_url("https://github.com/acme/widgets", "main"),
            "https://github.com/acme/widgets/archive/refs/heads/main.zip"
        );
    }

    #[test]
    fn archive_url_strips_git_suffix_and_slash() {
        assert_eq!(
            archive_url("https://github.com/acme/widgets.git", "v1.2"),
            "https://github.com/acme/widgets/archive/refs/heads/v1.2.zip"
        );
        assert_eq!(
            archive_url("https://github.com/acme/widgets/", "master"),
            "https://github.com/acme/widgets/archive/refs/heads/master.zip"
        );
    }
}
