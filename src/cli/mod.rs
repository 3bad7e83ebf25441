pub mod args;
pub mod runner;

pub use args::{get_args, get_log_level, Args};
pub use runner::{run, Runner};
