use super::filters::*;
use crate::{error::Result, ioutils::path_to_str, renderer::interface::TemplateRenderer};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde_json::Value;
use std::path::Path;

/// MiniJinja-based template rendering engine.
///
/// Undefined variables are errors and trailing newlines are kept, so rendered
/// files match their templates byte for byte outside of the template tags.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("camel_case", to_camel_case);
        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("screaming_snake_case", to_screaming_snake_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("table_case", to_table_case);
        env.add_filter("train_case", to_train_case);
        env.add_filter("plural", to_plural);
        env.add_filter("singular", to_singular);
        env.add_filter("foreign_key", to_foreign_key);
        env.add_filter("regex", regex_filter);
        env.add_filter("slugify", slugify);
        env.add_filter("jsonify", jsonify);

        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template: &str,
        context: &Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        let name = template_name.unwrap_or("<string>");
        Ok(self.env.render_named_str(name, template, context)?)
    }

    fn render_path(&self, template_path: &Path, context: &Value) -> Result<String> {
        let path_str = path_to_str(template_path)?;
        self.render(path_str, context, Some(path_str))
    }
}
