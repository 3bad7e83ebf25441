//! Templating backend the generation runner delegates to.
//!
//! The runner only relies on three capabilities: fetching a template source into a
//! local directory, reading the fields the template declares, and rendering the
//! template with a context into a staging directory.

use crate::constants::{COPY_WITHOUT_RENDER_KEY, PROMPTS_KEY, SCHEMA_FILENAME};
use crate::context::TemplateContext;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod cookiecutter;

pub use cookiecutter::CookiecutterBackend;

/// Where to fetch a template from and how.
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    /// Raw template source as given on the command line.
    pub template: String,
    /// Branch, tag or commit to check out after cloning.
    pub checkout: Option<String>,
    /// Directory inside the fetched source holding the template.
    pub directory: Option<String>,
    /// Password for protected archives.
    pub password: Option<String>,
}

impl FetchRequest {
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self { template: template.into(), ..Default::default() }
    }
}

/// Fields declared by a template, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSchema {
    /// User-facing fields with their declared defaults.
    fields: IndexMap<String, Value>,
    /// `_`-prefixed settings and `__`-prefixed computed fields.
    private: IndexMap<String, Value>,
    /// Question texts from `__prompts__`.
    prompts: IndexMap<String, String>,
}

impl TemplateSchema {
    /// Reads the schema file from a template directory.
    pub fn load<P: AsRef<Path>>(template_dir: P) -> Result<Self> {
        let path = template_dir.as_ref().join(SCHEMA_FILENAME);
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    pub fn from_value(value: Value, path: &str) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidSchema { path: path.to_string() });
        };

        let mut schema = Self::default();
        for (name, value) in map {
            schema.insert(name, value);
        }
        Ok(schema)
    }

    /// Parses schema text.
    ///
    /// Goes through `IndexMap` rather than `serde_json::Map` so declaration order
    /// survives, since it is also the prompting order.
    pub fn from_json_str(content: &str, path: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(Error::InvalidSchema { path: path.to_string() });
        }
        let map: IndexMap<String, Value> = serde_json::from_str(content)?;
        let mut schema = Self::default();
        for (name, value) in map {
            schema.insert(name, value);
        }
        Ok(schema)
    }

    fn insert(&mut self, name: String, value: Value) {
        if name == PROMPTS_KEY {
            if let Value::Object(prompts) = &value {
                for (field, prompt) in prompts {
                    let text = match prompt {
                        Value::String(text) => Some(text.clone()),
                        Value::Object(choice) => {
                            choice.get("__prompt__").and_then(Value::as_str).map(String::from)
                        }
                        _ => None,
                    };
                    if let Some(text) = text {
                        self.prompts.insert(field.clone(), text);
                    }
                }
            }
            return;
        }

        if name.starts_with('_') {
            self.private.insert(name, value);
        } else {
            self.fields.insert(name, value);
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn private_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.private.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn prompt_for(&self, name: &str) -> Option<&str> {
        self.prompts.get(name).map(String::as_str)
    }

    /// Glob patterns of files that must be copied without rendering.
    pub fn copy_without_render(&self) -> Vec<String> {
        match self.private.get(COPY_WITHOUT_RENDER_KEY) {
            Some(Value::Array(patterns)) => {
                patterns.iter().filter_map(Value::as_str).map(String::from).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Capabilities of an external templating engine.
pub trait TemplateBackend {
    /// Resolves `request` and makes the template available locally.
    ///
    /// Remote sources are downloaded below `staging`. Returns the directory holding the
    /// template schema.
    fn fetch(&self, request: &FetchRequest, staging: &Path) -> Result<PathBuf>;

    /// Reads the fields declared by the fetched template.
    fn schema(&self, template_dir: &Path) -> Result<TemplateSchema>;

    /// Renders the template into `output_dir`, prompting for every unset field.
    fn render(
        &self,
        template_dir: &Path,
        schema: &TemplateSchema,
        context: &TemplateContext,
        output_dir: &Path,
    ) -> Result<()>;
}
