use crate::constants::exit_codes;
use std::process::ExitStatus;
use thiserror::Error;

/// Category of a failed (or partially failed) generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The working directory name cannot be turned into a package identifier.
    InvalidProjectName,
    /// The template could not be resolved, downloaded, cloned or unpacked.
    TemplateFetchFailure,
    /// The template was fetched but could not be rendered.
    TemplateRenderFailure,
    /// The user declined to overwrite an existing file. Never fatal.
    OverwriteDeclined,
    /// Moving the rendered output into the working directory failed midway.
    PartialGenerationFailure,
    /// Anything else: configuration, missing tooling, terminal I/O.
    Other,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to clone repository. Original error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("Failed to read archive. Original error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Failed to download template. Original error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Failed to parse glob pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Prompt failed. Original error: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Invalid directory name: '{name}'. {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("{tool} is not installed. Please install it before proceeding.")]
    ToolNotInstalled { tool: String },

    #[error("Failed to load user config '{path}'. Original error: {e}")]
    UserConfigError { path: String, e: String },

    #[error("A valid template for '{template}' could not be found in '{template_dir}' (missing {config_file}).")]
    TemplateNotFound { template: String, template_dir: String, config_file: String },

    #[error("Cannot proceed: template directory '{template_dir}' does not exist.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Unsupported template source '{source_str}': {reason}")]
    UnsupportedSource { source_str: String, reason: String },

    #[error("Archive '{archive}' must contain a single top-level directory.")]
    InvalidArchiveLayout { archive: String },

    #[error("Archive '{archive}' is password protected. Use --password to provide it.")]
    PasswordRequired { archive: String },

    #[error("Invalid password for archive '{archive}'.")]
    InvalidPassword { archive: String },

    #[error("Template schema '{path}' must be a JSON object.")]
    InvalidSchema { path: String },

    /// When the hook has executed but finished with an error.
    #[error("Hook '{script}' failed with status: {status}")]
    HookExecutionError { script: String, status: ExitStatus },

    #[error("Cannot process the source path: '{source_path}'. Original error: {e}")]
    ProcessError { source_path: String, e: String },

    #[error("Could not fetch template '{template}': {source}")]
    TemplateFetchFailure {
        template: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Could not render template: {source}")]
    TemplateRenderFailure {
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to move '{path}' into the working directory ({moved} entries already moved): {reason}")]
    PartialGenerationFailure { path: String, moved: usize, reason: String },
}

impl Error {
    /// Wraps a backend error raised while resolving or fetching `template`.
    pub fn fetch_failure(template: &str, err: Error) -> Self {
        match err {
            err @ Error::TemplateFetchFailure { .. } => err,
            err => Error::TemplateFetchFailure {
                template: template.to_string(),
                source: Box::new(err),
            },
        }
    }

    /// Wraps a backend error raised while rendering the fetched template.
    pub fn render_failure(err: Error) -> Self {
        match err {
            err @ Error::TemplateRenderFailure { .. } => err,
            err => Error::TemplateRenderFailure { source: Box::new(err) },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidProjectName { .. } => ErrorKind::InvalidProjectName,
            Error::TemplateFetchFailure { .. } => ErrorKind::TemplateFetchFailure,
            Error::TemplateRenderFailure { .. } => ErrorKind::TemplateRenderFailure,
            Error::PartialGenerationFailure { .. } => ErrorKind::PartialGenerationFailure,
            _ => ErrorKind::Other,
        }
    }

    /// Process exit code for this error's category.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidProjectName => exit_codes::INVALID_PROJECT_NAME,
            ErrorKind::TemplateFetchFailure => exit_codes::TEMPLATE_FETCH_FAILURE,
            ErrorKind::TemplateRenderFailure => exit_codes::TEMPLATE_RENDER_FAILURE,
            ErrorKind::PartialGenerationFailure => exit_codes::PARTIAL_GENERATION_FAILURE,
            ErrorKind::OverwriteDeclined | ErrorKind::Other => exit_codes::FAILURE,
        }
    }
}

/// Convenience type alias for Results with the crate error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that logs the error and exits the program.
///
/// # Behavior
/// Logs the error message and exits with the status code of its category.
pub fn default_error_handler(err: Error) -> ! {
    log::error!("[x] {err}");
    std::process::exit(err.exit_code());
}
