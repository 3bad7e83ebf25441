//! Pure interfaces for prompting without external dependencies
//!
//! These interfaces are independent of any specific UI library implementation, so
//! rendering and reconciliation can be driven by scripted answers in tests.

use crate::error::Result;
use serde_json::Value;

/// Configuration for text input prompts
#[derive(Debug, Clone)]
pub struct TextPromptConfig {
    pub prompt: String,
    pub default: Option<String>,
}

/// Configuration for single choice selection
#[derive(Debug, Clone)]
pub struct SingleChoiceConfig {
    pub prompt: String,
    pub choices: Vec<String>,
    pub default_index: Option<usize>,
}

/// Configuration for boolean confirmation
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    pub prompt: String,
    /// `None` forces an explicit answer.
    pub default: Option<bool>,
}

/// Configuration for structured (JSON) input
#[derive(Debug, Clone)]
pub struct StructuredDataConfig {
    pub prompt: String,
    pub default_value: Value,
}

/// Abstract interface for text input prompts
pub trait TextPrompter {
    fn prompt_text(&self, config: &TextPromptConfig) -> Result<String>;
}

/// Abstract interface for single choice selection
pub trait SingleChoicePrompter {
    fn prompt_single_choice(&self, config: &SingleChoiceConfig) -> Result<usize>;
}

/// Abstract interface for boolean confirmation
pub trait ConfirmationPrompter {
    fn prompt_confirmation(&self, config: &ConfirmationConfig) -> Result<bool>;
}

/// Abstract interface for structured data input
pub trait StructuredDataPrompter {
    fn prompt_structured_data(&self, config: &StructuredDataConfig) -> Result<Value>;
}

/// Combined interface that provides all prompt types
pub trait PromptProvider:
    TextPrompter + SingleChoicePrompter + ConfirmationPrompter + StructuredDataPrompter
{
}

// Blanket implementation for any type that implements all prompt interfaces
impl<T> PromptProvider for T where
    T: TextPrompter + SingleChoicePrompter + ConfirmationPrompter + StructuredDataPrompter
{
}
