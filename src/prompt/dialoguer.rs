//! Dialoguer-based implementations of prompt interfaces

use super::interface::{
    ConfirmationConfig, SingleChoiceConfig, StructuredDataConfig, TextPromptConfig,
};
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Select};
use serde_json::Value;

/// Dialoguer-based implementation of all prompt interfaces
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl super::interface::TextPrompter for DialoguerPrompter {
    fn prompt_text(&self, config: &TextPromptConfig) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(&config.prompt).allow_empty(true);
        if let Some(default) = &config.default {
            input = input.default(default.clone());
        }
        Ok(input.interact_text()?)
    }
}

impl super::interface::SingleChoicePrompter for DialoguerPrompter {
    fn prompt_single_choice(&self, config: &SingleChoiceConfig) -> Result<usize> {
        let mut select = Select::new().with_prompt(&config.prompt).items(&config.choices);

        if let Some(default_index) = config.default_index {
            select = select.default(default_index);
        }

        Ok(select.interact()?)
    }
}

impl super::interface::ConfirmationPrompter for DialoguerPrompter {
    fn prompt_confirmation(&self, config: &ConfirmationConfig) -> Result<bool> {
        let mut confirm = Confirm::new().with_prompt(&config.prompt);
        if let Some(default) = config.default {
            confirm = confirm.default(default);
        }
        Ok(confirm.interact()?)
    }
}

impl super::interface::StructuredDataPrompter for DialoguerPrompter {
    fn prompt_structured_data(&self, config: &StructuredDataConfig) -> Result<Value> {
        let default_content = serde_json::to_string(&config.default_value)?;

        let content: String = Input::new()
            .with_prompt(&config.prompt)
            .default(default_content)
            .validate_with(|input: &String| -> Result<(), String> {
                match serde_json::from_str::<Value>(input) {
                    Ok(Value::Object(_)) => Ok(()),
                    Ok(_) => Err("Expected a JSON object".to_string()),
                    Err(e) => Err(format!("Invalid JSON: {e}")),
                }
            })
            .interact_text()?;

        serde_json::from_str(&content).map_err(Error::from)
    }
}
