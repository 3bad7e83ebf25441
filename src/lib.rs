/// Handles argument parsing and drives a generation run.
pub mod cli;

/// Defines custom error types.
pub mod error;

/// Constants shared across modules.
pub mod constants;

/// Project names derived from the working directory.
pub mod project;

/// Detection of the installed Kedro version.
pub mod version;

/// Context handed to the template backend.
pub mod context;

/// The templating backend abstraction and its Cookiecutter implementation.
pub mod backend;

/// User configuration (`~/.cookiecutterrc`).
pub mod config;

/// An abstraction that allows implementing a source for templates.
pub mod loader;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Pre and post generation hook processing.
pub mod hooks;

/// Glob sets for ignored and verbatim template entries.
pub mod ignore;

/// User input and interaction handling.
pub mod prompt;

/// Merging rendered output into the working directory.
pub mod reconcile;

/// A set of helpers for working with the file system.
pub mod ioutils;
