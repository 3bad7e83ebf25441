//! Interactive dialog utilities for user input
//!
//! - `interface`: Pure abstract interfaces independent of any UI library
//! - `dialoguer`: Concrete implementation using the dialoguer library

use crate::error::Result;

pub mod dialoguer;
pub mod interface;

pub use self::dialoguer::DialoguerPrompter;
pub use interface::*;

/// Convenience function to create the default prompt provider
pub fn get_prompt_provider() -> impl PromptProvider {
    DialoguerPrompter::new()
}

/// Asks whether an existing path may be overwritten. Requires an explicit answer.
pub fn confirm_overwrite<P: ConfirmationPrompter + ?Sized>(
    prompter: &P,
    path: &std::path::Path,
) -> Result<bool> {
    prompter.prompt_confirmation(&ConfirmationConfig {
        prompt: format!("'{}' already exists. Overwrite?", path.display()),
        default: None,
    })
}
