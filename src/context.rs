//! Context handed to the template backend.

use crate::backend::TemplateSchema;
use crate::constants::fields;
use crate::project::ProjectIdentity;
use crate::version::ToolVersion;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Display;

/// Value of a single context field.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Fixed value; the backend uses it without asking.
    Set(Value),
    /// No value; the backend must prompt the user for it.
    Unset,
}

impl ContextValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, ContextValue::Unset)
    }
}

/// Ordered mapping of field names to values or the unset marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    fields: IndexMap<String, ContextValue>,
}

impl TemplateContext {
    /// Builds the context for one generation run.
    ///
    /// Every public field declared by `schema` is present: the mandatory ones carry
    /// values derived from `identity` and `tool_version`, all others are `Unset`.
    /// Mandatory fields the template does not declare are appended at the end.
    pub fn build(
        identity: &ProjectIdentity,
        tool_version: &ToolVersion,
        schema: &TemplateSchema,
    ) -> Self {
        let mandatory = [
            (fields::PROJECT_NAME, identity.display_name.as_str()),
            (fields::REPO_NAME, identity.repo_name.as_str()),
            (fields::PYTHON_PACKAGE, identity.package_name.as_str()),
            (fields::KEDRO_VERSION, tool_version.as_str()),
        ];

        let mut context = Self::default();
        for name in schema.field_names() {
            context.fields.insert(name.to_string(), ContextValue::Unset);
        }
        for (name, value) in mandatory {
            context.set(name, Value::String(value.to_string()));
        }
        context
    }

    pub fn set<S: Into<String>>(&mut self, name: S, value: Value) {
        self.fields.insert(name.into(), ContextValue::Set(value));
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names of the fields the user will be prompted for.
    pub fn unset_fields(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, value)| value.is_unset()).map(|(name, _)| name)
    }
}

impl Display for TemplateContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        for (name, value) in self.iter() {
            match value {
                ContextValue::Set(value) => writeln!(f, "  {name}: {value}")?,
                ContextValue::Unset => writeln!(f, "  {name}: <prompt>")?,
            }
        }
        write!(f, "}}")
    }
}
