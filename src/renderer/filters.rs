use log::warn;
use minijinja::{Error as TemplateError, ErrorKind, Value};
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

// Case conversion and inflection helpers exposed as filters
pub use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        screaming_snake::to_screaming_snake_case, snake::to_snake_case,
        table::to_table_case, train::to_train_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
    suffix::foreign_key::to_foreign_key,
};

/// Tests if a string matches a given regular expression pattern.
///
/// Invalid patterns are logged and never match.
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// Lowercases `val` and joins its alphanumeric runs with hyphens.
pub fn slugify(val: &str) -> String {
    val.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Serializes a value as JSON with sorted keys and four-space indentation.
pub fn jsonify(val: Value) -> Result<String, TemplateError> {
    let to_error =
        |e: serde_json::Error| TemplateError::new(ErrorKind::InvalidOperation, e.to_string());

    let json = serde_json::to_value(&val).map_err(to_error)?;
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    json.serialize(&mut serializer).map_err(to_error)?;
    String::from_utf8(out)
        .map_err(|e| TemplateError::new(ErrorKind::InvalidOperation, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_filter_matches() {
        assert!(regex_filter("hello123", r"hello\d+"));
        assert!(!regex_filter("hello", r"\d+"));
    }

    #[test]
    fn test_regex_filter_invalid_regex() {
        assert!(!regex_filter("anything", r"([unclosed"));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("My Cool App"), "my-cool-app");
        assert_eq!(slugify("  Data -- Pipeline!! v2 "), "data-pipeline-v2");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn jsonify_sorts_keys() {
        let value = Value::from_serialize(serde_json::json!({ "b": 1, "a": [true] }));
        assert_eq!(jsonify(value).unwrap(), "{\n    \"a\": [\n        true\n    ],\n    \"b\": 1\n}");
    }
}
