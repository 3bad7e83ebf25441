//! Jinja-compatible rendering of template files, paths and defaults.

pub mod filters;
pub mod interface;
pub mod minijinja;

pub use self::minijinja::MiniJinjaRenderer;
pub use interface::TemplateRenderer;
