//! Cookiecutter-compatible backend: `cookiecutter.json` schemas, Jinja templates and
//! `hooks/` scripts, rendered with minijinja.

use crate::backend::{FetchRequest, TemplateBackend, TemplateSchema};
use crate::config::UserConfig;
use crate::constants::CONTEXT_NAMESPACE;
use crate::context::{ContextValue, TemplateContext};
use crate::error::{Error, Result};
use crate::hooks::{run_hook, Hook};
use crate::ignore::{copy_without_render, ignored_paths, matches_path_or_ancestor};
use crate::ioutils::{create_dir_all, path_to_str, sorted_entries};
use crate::loader::get_template;
use crate::prompt::{
    ConfirmationConfig, PromptProvider, SingleChoiceConfig, StructuredDataConfig,
    TextPromptConfig,
};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Renders Cookiecutter templates, prompting through `P` for unset fields.
pub struct CookiecutterBackend<'a, P: PromptProvider + ?Sized> {
    engine: MiniJinjaRenderer,
    prompter: &'a P,
    config: &'a UserConfig,
}

impl<'a, P: PromptProvider + ?Sized> CookiecutterBackend<'a, P> {
    pub fn new(prompter: &'a P, config: &'a UserConfig) -> Self {
        Self { engine: MiniJinjaRenderer::new(), prompter, config }
    }

    /// Wraps answers under the `cookiecutter` namespace templates refer to.
    fn namespaced(answers: &Map<String, Value>) -> Value {
        let mut root = Map::new();
        root.insert(CONTEXT_NAMESPACE.to_string(), Value::Object(answers.clone()));
        Value::Object(root)
    }

    /// Declared default for `name`, with the user's `default_context` applied.
    ///
    /// An override naming one of the declared choices moves that choice first.
    fn default_for(&self, schema: &TemplateSchema, name: &str) -> Value {
        let declared = schema.default_for(name).cloned().unwrap_or(Value::Null);
        let Some(user_default) = self.config.default_context.get(name) else {
            return declared;
        };

        match declared {
            Value::Array(mut choices) if !user_default.is_array() => {
                if let Some(index) = choices.iter().position(|choice| choice == user_default) {
                    let preferred = choices.remove(index);
                    choices.insert(0, preferred);
                }
                Value::Array(choices)
            }
            _ => user_default.clone(),
        }
    }

    fn prompt_field(
        &self,
        name: &str,
        default: &Value,
        question: Option<&str>,
        answers: &Map<String, Value>,
    ) -> Result<Value> {
        let context = Self::namespaced(answers);
        let prompt = question.unwrap_or(name).to_string();

        match default {
            Value::Array(choices) => {
                let rendered = choices
                    .iter()
                    .map(|choice| self.engine.render_value(choice, &context))
                    .collect::<Result<Vec<_>>>()?;
                if rendered.is_empty() {
                    return Err(Error::ProcessError {
                        source_path: name.to_string(),
                        e: "choice list is empty".to_string(),
                    });
                }
                let labels = rendered.iter().map(display_value).collect();
                let index = self.prompter.prompt_single_choice(&SingleChoiceConfig {
                    prompt,
                    choices: labels,
                    default_index: Some(0),
                })?;
                Ok(rendered.get(index).cloned().unwrap_or(Value::Null))
            }
            Value::Bool(default) => {
                let answer = self.prompter.prompt_confirmation(&ConfirmationConfig {
                    prompt,
                    default: Some(*default),
                })?;
                Ok(Value::Bool(answer))
            }
            Value::Object(_) => {
                let default_value = self.engine.render_value(default, &context)?;
                self.prompter
                    .prompt_structured_data(&StructuredDataConfig { prompt, default_value })
            }
            Value::Null => {
                let answer =
                    self.prompter.prompt_text(&TextPromptConfig { prompt, default: None })?;
                Ok(Value::String(answer))
            }
            other => {
                let rendered = self.engine.render(&display_value(other), &context, Some(name))?;
                let answer = self
                    .prompter
                    .prompt_text(&TextPromptConfig { prompt, default: Some(rendered) })?;
                Ok(Value::String(answer))
            }
        }
    }

    /// Turns the context into final answers, prompting for every unset field.
    ///
    /// Fixed values are available to the defaults of every prompted field. `__` fields
    /// are rendered once all answers are known; other `_` fields are passed through.
    pub fn resolve_answers(
        &self,
        schema: &TemplateSchema,
        context: &TemplateContext,
    ) -> Result<Map<String, Value>> {
        let mut answers = Map::new();
        for (name, value) in context.iter() {
            if let ContextValue::Set(value) = value {
                answers.insert(name.to_string(), value.clone());
            }
        }

        for name in context.unset_fields() {
            let default = self.default_for(schema, name);
            let answer = self.prompt_field(name, &default, schema.prompt_for(name), &answers)?;
            answers.insert(name.to_string(), answer);
        }

        for (name, raw) in schema.private_fields() {
            let value = if name.starts_with("__") {
                self.engine.render_value(raw, &Self::namespaced(&answers))?
            } else {
                raw.clone()
            };
            answers.insert(name.to_string(), value);
        }

        Ok(answers)
    }

    /// Renders every segment of `relative`; `None` if a segment renders empty.
    fn render_relative(&self, relative: &Path, context: &Value) -> Result<Option<PathBuf>> {
        let mut rendered = PathBuf::new();
        for component in relative.components() {
            let Component::Normal(segment) = component else {
                continue;
            };
            let segment = path_to_str(segment)?;
            let name = self.engine.render(segment, context, Some(segment))?;
            if name.trim().is_empty() {
                return Ok(None);
            }
            rendered.push(name);
        }
        Ok(Some(rendered))
    }

    fn render_file(
        &self,
        source: &Path,
        relative: &Path,
        target: &Path,
        context: &Value,
        copy_only: bool,
    ) -> Result<()> {
        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }

        if copy_only {
            log::debug!("Copying '{}' without rendering", relative.display());
            fs::copy(source, target)?;
            return Ok(());
        }

        match String::from_utf8(fs::read(source)?) {
            Ok(content) => {
                let name = path_to_str(relative)?;
                let rendered = self.engine.render(&content, context, Some(name))?;
                fs::write(target, rendered)?;
                fs::set_permissions(target, fs::metadata(source)?.permissions())?;
            }
            Err(_) => {
                log::debug!("Copying binary file '{}'", relative.display());
                fs::copy(source, target)?;
            }
        }
        Ok(())
    }
}

/// Template directory holding the project, for templates that nest it one level down.
pub fn find_project_dir<P: AsRef<Path>>(template_dir: P) -> Result<Option<PathBuf>> {
    Ok(sorted_entries(template_dir)?.into_iter().find(|path| {
        let name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
        path.is_dir()
            && name.contains(CONTEXT_NAMESPACE)
            && name.contains("{{")
            && name.contains("}}")
    }))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl<P: PromptProvider + ?Sized> TemplateBackend for CookiecutterBackend<'_, P> {
    fn fetch(&self, request: &FetchRequest, staging: &Path) -> Result<PathBuf> {
        get_template(request, self.config, staging)
    }

    fn schema(&self, template_dir: &Path) -> Result<TemplateSchema> {
        TemplateSchema::load(template_dir)
    }

    fn render(
        &self,
        template_dir: &Path,
        schema: &TemplateSchema,
        context: &TemplateContext,
        output_dir: &Path,
    ) -> Result<()> {
        let answers = self.resolve_answers(schema, context)?;
        let context = Self::namespaced(&answers);

        let nested = find_project_dir(template_dir)?;
        let ignored = ignored_paths(nested.is_none())?;
        let copy_only = copy_without_render(&schema.copy_without_render())?;

        let (walk_root, project_dir) = match &nested {
            Some(dir) => {
                let relative = dir.strip_prefix(template_dir).unwrap_or(dir);
                let Some(name) = self.render_relative(relative, &context)? else {
                    return Err(Error::ProcessError {
                        source_path: dir.display().to_string(),
                        e: "project directory name renders empty".to_string(),
                    });
                };
                (dir.clone(), output_dir.join(name))
            }
            None => (template_dir.to_path_buf(), output_dir.to_path_buf()),
        };
        log::debug!(
            "Rendering '{}' into '{}'",
            walk_root.display(),
            project_dir.display()
        );
        create_dir_all(&project_dir)?;

        let scratch = tempfile::tempdir()?;
        if let Some(hook) = Hook::PreGen.find(template_dir)? {
            run_hook(&self.engine, &hook, &project_dir, scratch.path(), &context)?;
        }

        let relative_to_template =
            |path: &Path| path.strip_prefix(template_dir).map(Path::to_path_buf);
        let walker = WalkDir::new(&walk_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                relative_to_template(entry.path())
                    .map(|relative| !ignored.is_match(relative))
                    .unwrap_or(false)
            });

        for entry in walker {
            let entry = entry.map_err(|e| Error::ProcessError {
                source_path: walk_root.display().to_string(),
                e: e.to_string(),
            })?;
            let relative = relative_to_template(entry.path()).map_err(|e| {
                Error::ProcessError {
                    source_path: entry.path().display().to_string(),
                    e: e.to_string(),
                }
            })?;

            let Some(rendered) = self.render_relative(&relative, &context)? else {
                log::debug!("Skipping '{}': its name renders empty", relative.display());
                continue;
            };
            let target = output_dir.join(rendered);

            if entry.path().is_dir() {
                create_dir_all(&target)?;
            } else {
                // Globs are relative to the project directory, not the template root.
                let project_relative =
                    entry.path().strip_prefix(&walk_root).unwrap_or(relative.as_path());
                let copy_only = matches_path_or_ancestor(&copy_only, project_relative);
                self.render_file(entry.path(), &relative, &target, &context, copy_only)?;
            }
        }

        if let Some(hook) = Hook::PostGen.find(template_dir)? {
            run_hook(&self.engine, &hook, &project_dir, scratch.path(), &context)?;
        }
        Ok(())
    }
}
