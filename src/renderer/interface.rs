use crate::error::Result;
use serde_json::Value;
use std::path::Path;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    /// * `template_name` - Optional name for the template (used in error messages)
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &Value, template_name: Option<&str>)
        -> Result<String>;

    /// Renders every segment of a path with the given context.
    ///
    /// # Returns
    /// * `Result<String>` - Rendered path as string
    fn render_path(&self, template_path: &Path, context: &Value) -> Result<String>;

    /// Renders a JSON value: strings are templates, arrays and objects are
    /// rendered element-wise, everything else is returned unchanged.
    fn render_value(&self, value: &Value, context: &Value) -> Result<Value> {
        Ok(match value {
            Value::String(template) => Value::String(self.render(template, context, None)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.render_value(item, context))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => {
                let mut rendered = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    rendered.insert(
                        self.render(key, context, None)?,
                        self.render_value(item, context)?,
                    );
                }
                Value::Object(rendered)
            }
            other => other.clone(),
        })
    }
}
