//! Project identity derived from the working directory name.

use crate::error::{Error, Result};
use crate::ioutils::current_dir_name;
use std::path::Path;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Names that can never be used as a project directory.
const RESERVED_NAMES: &[&str] = &[".", ".."];

/// Python keywords; a package named after one gets a trailing underscore.
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
    "yield",
];

/// Names a generated project goes by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    /// Human-readable name, as typed by the user.
    pub display_name: String,
    /// Repository-style name: alphanumeric runs joined by hyphens.
    pub repo_name: String,
    /// Importable package identifier: lowercase, underscore separated.
    pub package_name: String,
}

impl ProjectIdentity {
    /// Derives the identity from a raw directory name.
    ///
    /// # Errors
    /// * `Error::InvalidProjectName` - if the name is empty, reserved, or has no
    ///   characters that can form an identifier.
    pub fn from_dir_name(name: &str) -> Result<Self> {
        let display_name = name.trim();

        if display_name.is_empty() {
            return Err(invalid(name, "The name must not be empty."));
        }
        if RESERVED_NAMES.contains(&display_name) {
            return Err(invalid(name, "The name is reserved by the file system."));
        }

        let package_name = to_package_name(display_name).ok_or_else(|| {
            invalid(name, "It must contain at least one alphanumeric character.")
        })?;
        let repo_name = to_repo_name(display_name);

        Ok(Self { display_name: display_name.to_string(), repo_name, package_name })
    }

    /// Derives the identity from the base name of `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::from_dir_name(&current_dir_name(dir))
    }
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidProjectName { name: name.to_string(), reason: reason.to_string() }
}

/// Letters, ASCII digits and combining marks; everything else separates words.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_alphabetic() || is_combining_mark(c)
}

/// Collapses every run of characters rejected by `keep` into one `separator`.
fn collapse(name: &str, separator: char, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending = false;
    for c in name.chars() {
        if keep(c) {
            if pending && !out.is_empty() {
                out.push(separator);
            }
            pending = false;
            out.push(c);
        } else {
            pending = true;
        }
    }
    out
}

fn to_package_name(name: &str) -> Option<String> {
    let lowered = name.nfc().collect::<String>().to_lowercase();
    let collapsed = collapse(&lowered, '_', is_identifier_char);
    let mut package = collapsed
        .trim_start_matches(|c: char| c == '_' || is_combining_mark(c))
        .to_string();
    if package.is_empty() {
        return None;
    }
    if package.starts_with(|c: char| c.is_ascii_digit()) {
        package.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&package.as_str()) {
        package.push('_');
    }
    Some(package)
}

fn to_repo_name(name: &str) -> String {
    let composed = name.nfc().collect::<String>();
    collapse(&composed, '-', is_identifier_char)
        .trim_start_matches(|c: char| c == '-' || is_combining_mark(c))
        .to_string()
}

/// Whether `s` is a valid Python identifier made of the characters this module emits.
pub fn is_valid_package_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || is_identifier_char(c)) && !PYTHON_KEYWORDS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derives_all_names_from_spaced_name() {
        let identity = ProjectIdentity::from_dir_name("My Cool App").unwrap();
        assert_eq!(identity.display_name, "My Cool App");
        assert_eq!(identity.repo_name, "My-Cool-App");
        assert_eq!(identity.package_name, "my_cool_app");
    }

    #[test]
    fn normalizes_hyphens_and_underscores() {
        let identity = ProjectIdentity::from_dir_name("spaceflights-demo_v2").unwrap();
        assert_eq!(identity.repo_name, "spaceflights-demo-v2");
        assert_eq!(identity.package_name, "spaceflights_demo_v2");
    }

    #[test]
    fn collapses_separator_runs_and_trims_edges() {
        let identity = ProjectIdentity::from_dir_name("  --data -- pipeline!! ").unwrap();
        assert_eq!(identity.display_name, "--data -- pipeline!!");
        assert_eq!(identity.repo_name, "data-pipeline");
        assert_eq!(identity.package_name, "data_pipeline");
    }

    #[test]
    fn leading_digit_is_prefixed() {
        let identity = ProjectIdentity::from_dir_name("2024 forecast").unwrap();
        assert_eq!(identity.package_name, "_2024_forecast");
        assert!(is_valid_package_name(&identity.package_name));
    }

    #[test]
    fn keywords_get_trailing_underscore() {
        let identity = ProjectIdentity::from_dir_name("Class").unwrap();
        assert_eq!(identity.package_name, "class_");
        assert!(is_valid_package_name(&identity.package_name));
    }

    #[test]
    fn capitalised_constants_are_not_keywords_once_lowered() {
        let identity = ProjectIdentity::from_dir_name("True").unwrap();
        assert_eq!(identity.package_name, "true");
        assert!(is_valid_package_name("none"));
        assert!(!is_valid_package_name("lambda"));
    }

    #[test]
    fn combining_marks_stay_inside_words() {
        let identity = ProjectIdentity::from_dir_name("İstanbul Taxi").unwrap();
        assert_eq!(identity.package_name, "i\u{307}stanbul_taxi");
        assert_eq!(identity.repo_name, "İstanbul-Taxi");
        assert!(is_valid_package_name(&identity.package_name));

        let decomposed = ProjectIdentity::from_dir_name("Cafe\u{301} Data").unwrap();
        assert_eq!(decomposed.package_name, "caf\u{e9}_data");
        assert!(ProjectIdentity::from_dir_name("\u{301}\u{301}").is_err());
    }

    #[test]
    fn rejects_symbolic_empty_and_reserved_names() {
        for name in ["---", "???", "", "   ", ".", "..", "_-_"] {
            let err = ProjectIdentity::from_dir_name(name).unwrap_err();
            assert!(
                matches!(err, Error::InvalidProjectName { .. }),
                "expected '{name}' to be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn reads_base_name_of_directory() {
        let identity = ProjectIdentity::from_dir("/tmp/work/iris-classifier").unwrap();
        assert_eq!(identity.package_name, "iris_classifier");
        assert!(ProjectIdentity::from_dir("/").is_err());
    }

    proptest! {
        #[test]
        fn valid_names_give_valid_deterministic_packages(
            name in "[A-Za-z0-9 _.-]{0,12}[A-Za-z0-9][A-Za-z0-9 _.-]{0,12}"
        ) {
            let first = ProjectIdentity::from_dir_name(&name).unwrap();
            let second = ProjectIdentity::from_dir_name(&name).unwrap();
            prop_assert!(is_valid_package_name(&first.package_name), "{}", first.package_name);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn symbolic_names_are_rejected(name in "[ _.?!#@-]{0,16}") {
            prop_assert!(ProjectIdentity::from_dir_name(&name).is_err());
        }
    }
}
