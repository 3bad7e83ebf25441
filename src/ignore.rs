//! Glob sets deciding which template entries are skipped or copied verbatim.

use crate::constants::{HOOKS_DIR, SCHEMA_FILENAME};
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::path::Path;

/// Entries of a template root that never become part of the output.
const DEFAULT_IGNORE_PATTERNS: &[&str] =
    &[".git", ".git/**", ".hg", ".hg/**", ".svn", ".svn/**", "**/.DS_Store"];

fn build<I, S>(patterns: I) -> Result<GlobSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        debug!("Adding pattern: {pattern} to globset");
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Patterns of template-relative paths excluded from rendering.
///
/// Flat templates keep their schema and hooks next to the rendered files, so those
/// are excluded too.
pub fn ignored_paths(flat: bool) -> Result<GlobSet> {
    let mut patterns: Vec<String> =
        DEFAULT_IGNORE_PATTERNS.iter().map(|pattern| pattern.to_string()).collect();
    if flat {
        patterns.push(SCHEMA_FILENAME.to_string());
        patterns.push(HOOKS_DIR.to_string());
        patterns.push(format!("{HOOKS_DIR}/**"));
    }
    build(patterns)
}

/// Patterns from `_copy_without_render`, matched against paths relative to the
/// directory the project is rendered from.
pub fn copy_without_render(patterns: &[String]) -> Result<GlobSet> {
    build(patterns)
}

/// Whether `relative` or one of its ancestors matches `set`.
pub fn matches_path_or_ancestor(set: &GlobSet, relative: &Path) -> bool {
    !set.is_empty()
        && relative
            .ancestors()
            .any(|path| !path.as_os_str().is_empty() && set.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_templates_skip_schema_and_hooks() {
        let flat = ignored_paths(true).unwrap();
        assert!(flat.is_match("cookiecutter.json"));
        assert!(flat.is_match("hooks/post_gen_project.py"));
        assert!(flat.is_match(".git/HEAD"));
        assert!(!flat.is_match("conf/base/catalog.yml"));

        let nested = ignored_paths(false).unwrap();
        assert!(!nested.is_match("cookiecutter.json"));
        assert!(nested.is_match("{{ cookiecutter.repo_name }}/.DS_Store"));
    }

    #[test]
    fn copy_without_render_matches_ancestors() {
        let set = copy_without_render(&["*.png".to_string(), "static/*".to_string()]).unwrap();
        assert!(matches_path_or_ancestor(&set, Path::new("docs/logo.png")));
        assert!(matches_path_or_ancestor(&set, Path::new("static/app.js")));
        assert!(matches_path_or_ancestor(&set, Path::new("static/js/app.js")));
        assert!(!matches_path_or_ancestor(&set, Path::new("app.py")));
        assert!(!matches_path_or_ancestor(&set, Path::new("src/static.py")));

        let empty = copy_without_render(&[]).unwrap();
        assert!(!matches_path_or_ancestor(&empty, Path::new("logo.png")));
    }
}
