//! Path classification - decides which candidate paths qualify for packing
//!
//! Four independent checks run for every candidate: extension match,
//! usefulness heuristics, exclude globs, include substrings. All four are
//! evaluated (no short-circuit) so a debug log can show every reason a path
//! was rejected.

use crate::core::policy::Policy;
use crate::core::registry::ExtensionRegistry;

/// Why a candidate path was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    TypeMismatch,
    NotUseful,
    ExcludePattern,
    IncludeViolation,
}

/// Evaluate every check; an empty vec means the path is accepted
pub fn classify(path: &str, policy: &Policy) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();
    if !is_accepted_type(path, &policy.tags, &policy.registry) {
        reasons.push(RejectionReason::TypeMismatch);
    }
    if !policy.tags.iter().any(|tag| is_likely_useful(path, tag, policy)) {
        reasons.push(RejectionReason::NotUseful);
    }
    if should_exclude(path, policy) {
        reasons.push(RejectionReason::ExcludePattern);
    }
    if violates_include(path, &policy.include) {
        reasons.push(RejectionReason::IncludeViolation);
    }
    reasons
}

/// Does the path carry a suffix of at least one requested tag?
/// Monotonic: adding tags never turns an accepted path into a rejected one.
pub fn is_accepted_type(path: &str, tags: &[String], registry: &ExtensionRegistry) -> bool {
    tags.iter().any(|tag| {
        registry
            .resolve(tag.trim_start_matches('.'))
            .map(|suffixes| suffixes.iter().any(|s| path.ends_with(s.as_str())))
            .unwrap_or(false)
    })
}

/// Heuristic filter for utility, config, docs and hidden paths.
/// Evaluated per tag; the caller accepts a path useful under any tag.
pub fn is_likely_useful(path: &str, tag: &str, policy: &Policy) -> bool {
    let mut excluded_dirs: Vec<&str> = policy.excluded_dirs.iter().map(String::as_str).collect();
    let mut utility_or_config: Vec<&str> = Vec::new();
    let mut workflow_or_docs: Vec<&str> = vec![".github", ".gitignore", "LICENSE", "README"];

    match tag {
        "python" | "mojo" => {
            excluded_dirs.push("__pycache__");
            utility_or_config.extend(["hubconf.py", "setup.py"]);
            workflow_or_docs.extend(["stale.py", "gen-card-", "write_model_card"]);
        }
        "go" => {
            excluded_dirs.push("vendor");
            utility_or_config.extend(["go.mod", "go.sum", "Makefile"]);
        }
        "js" => {
            excluded_dirs.extend(["node_modules", "dist", "build"]);
            utility_or_config.extend(["package.json", "package-lock.json", "webpack.config.js"]);
        }
        "html" => {
            excluded_dirs.extend(["css", "js", "images", "fonts"]);
        }
        _ => {}
    }

    if path
        .split('/')
        .any(|part| part.starts_with('.') && part != "." && part != "..")
    {
        log::debug!("Skipping hidden file: {}", path);
        return false;
    }
    if path.to_lowercase().contains("test") {
        log::debug!("Skipping test file: {}", path);
        return false;
    }
    for dir in &excluded_dirs {
        if path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir)) {
            log::debug!("Skipping excluded directory: {}", path);
            return false;
        }
    }
    for name in &utility_or_config {
        if path.contains(name) {
            log::debug!("Skipping utility or config file: {}", path);
            return false;
        }
    }
    for marker in &workflow_or_docs {
        let hit = if marker.starts_with('.') {
            basename(path).contains(marker)
        } else {
            path.contains(marker)
        };
        if hit {
            log::debug!("Skipping workflow or documentation file: {}", path);
            return false;
        }
    }
    true
}

/// Glob match against the merged exclude patterns
pub fn should_exclude(path: &str, policy: &Policy) -> bool {
    let hit = policy.exclude_set().is_match(path) || policy.exclude_set().is_match(basename(path));
    if hit {
        log::debug!("Excluding file: {}", path);
    }
    hit
}

/// A non-empty include list demands at least one include substring;
/// an empty list never rejects.
pub fn violates_include(path: &str, includes: &[String]) -> bool {
    if includes.is_empty() {
        return false;
    }
    let confirmed = includes.iter().any(|inc| path.contains(inc.as_str()));
    if !confirmed {
        log::debug!("Skipping file outside include list: {}", path);
    }
    !confirmed
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::{Policy, PolicyOptions};

    fn policy_with(tags: &[&str], opts: impl FnOnce(&mut PolicyOptions)) -> Policy {
        let mut options = PolicyOptions {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            convert_notebooks: true,
            ..Default::default()
        };
        opts(&mut options);
        Policy::build(options).unwrap()
    }

    #[test]
    fn accepted_type_is_monotonic_in_tags() {
        let registry = crate::core::registry::ExtensionRegistry::builtin();
        let small = vec!["python".to_string()];
        let mut large = small.clone();
        large.push("go".to_string());
        for path in ["a.py", "b.go", "c.js", "d.txt"] {
            if is_accepted_type(path, &small, &registry) {
                assert!(is_accepted_type(path, &large, &registry));
            }
        }
    }

    #[test]
    fn hidden_segments_are_not_useful() {
        let policy = policy_with(&["python"], |_| {});
        assert!(!is_likely_useful(".venv/pkg/mod.py", "python", &policy));
        assert!(!is_likely_useful("src/.hidden/mod.py", "python", &policy));
        assert!(is_likely_useful("src/module.py", "python", &policy));
    }

    #[test]
    fn test_substring_rejects() {
        let policy = policy_with(&["python"], |_| {});
        assert!(!is_likely_useful("src/test_helpers.py", "python", &policy));
        assert!(!is_likely_useful("src/Testing/mod.py", "python", &policy));
    }

    #[test]
    fn excluded_dir_prefix_and_infix_reject() {
        let policy = policy_with(&["go"], |o| {
            o.excluded_dirs = vec!["vendor".to_string()];
        });
        assert!(!is_likely_useful("vendor/lib.go", "go", &policy));
        assert!(!is_likely_useful("pkg/vendor/lib.go", "go", &policy));
        assert!(is_likely_useful("pkg/vendored.go", "go", &policy));
    }

    #[test]
    fn per_tag_utility_files_reject() {
        let policy = policy_with(&["python"], |_| {});
        assert!(!is_likely_useful("setup.py", "python", &policy));
        assert!(!is_likely_useful("pkg/hubconf.py", "python", &policy));

        let policy = policy_with(&["go"], |_| {});
        assert!(!is_likely_useful("go.mod", "go", &policy));

        let policy = policy_with(&["js"], |_| {});
        assert!(!is_likely_useful("node_modules/x/index.js", "js", &policy));
    }

    #[test]
    fn doc_markers_match_basename_for_dotted_and_substring_otherwise() {
        let policy = policy_with(&["python"], |_| {});
        assert!(!is_likely_useful("LICENSE", "python", &policy));
        assert!(!is_likely_useful("src/README.py", "python", &policy));
        assert!(!is_likely_useful("src/.gitignore", "python", &policy));
    }

    #[test]
    fn exclude_pattern_matches_glob() {
        let policy = policy_with(&["python"], |o| {
            o.exclude = vec!["*_generated.py".to_string()];
        });
        assert!(should_exclude("src/schema_generated.py", &policy));
        assert!(!should_exclude("src/schema.py", &policy));
    }

    #[test]
    fn excluded_dir_name_matches_merged_pattern() {
        let policy = policy_with(&["python"], |o| {
            o.excluded_dirs = vec!["docs".to_string()];
        });
        assert!(should_exclude("docs", &policy));
    }

    #[test]
    fn empty_include_list_never_violates() {
        assert!(!violates_include("anything.py", &[]));
    }

    #[test]
    fn include_list_rejects_paths_without_substring() {
        let includes = vec!["src".to_string()];
        assert!(!violates_include("src/main.py", &includes));
        assert!(violates_include("lib/main.py", &includes));
    }

    #[test]
    fn classify_collects_all_reasons() {
        let policy = policy_with(&["python"], |o| {
            o.include = vec!["src".to_string()];
            o.exclude = vec!["*.go".to_string()];
        });
        let reasons = classify("vendor/lib.go", &policy);
        assert!(reasons.contains(&RejectionReason::TypeMismatch));
        assert!(reasons.contains(&RejectionReason::ExcludePattern));
        assert!(reasons.contains(&RejectionReason::IncludeViolation));
    }

    #[test]
    fn classify_accepts_plain_source_file() {
        let policy = policy_with(&["python"], |_| {});
        assert!(classify("src/module.py", &policy).is_empty());
    }

    #[test]
    fn useful_under_any_matching_tag_is_enough() {
        // html excludes a `js` directory, but a js-tagged run accepts it
        let policy = policy_with(&["js", "html"], |_| {});
        assert!(classify("js/app.js", &policy).is_empty());
    }
}
