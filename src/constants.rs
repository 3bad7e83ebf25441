//! Constants used throughout kedrogen

/// Template schema file every template root must contain
pub const SCHEMA_FILENAME: &str = "cookiecutter.json";

/// Directory holding pre/post generation hooks
pub const HOOKS_DIR: &str = "hooks";

/// Pre-generation hook file stem
pub const PRE_GEN_HOOK: &str = "pre_gen_project";

/// Post-generation hook file stem
pub const POST_GEN_HOOK: &str = "post_gen_project";

/// Name under which answers are exposed to templates
pub const CONTEXT_NAMESPACE: &str = "cookiecutter";

/// Schema key holding human-readable question texts
pub const PROMPTS_KEY: &str = "__prompts__";

/// Private schema key listing globs copied without rendering
pub const COPY_WITHOUT_RENDER_KEY: &str = "_copy_without_render";

/// Environment variable pointing at an alternative user config file
pub const USER_CONFIG_ENV: &str = "COOKIECUTTER_CONFIG";

/// Default user config file, relative to the home directory
pub const USER_CONFIG_FILENAME: &str = ".cookiecutterrc";

/// Prefix of the temporary staging directory
pub const STAGING_PREFIX: &str = "kedrogen-";

/// Context fields always filled in from the working directory and environment
pub mod fields {
    pub const PROJECT_NAME: &str = "project_name";
    pub const REPO_NAME: &str = "repo_name";
    pub const PYTHON_PACKAGE: &str = "python_package";
    pub const KEDRO_VERSION: &str = "kedro_version";
}

/// Tool version detection
pub mod tool {
    /// Name of the tool whose version is injected into the context
    pub const NAME: &str = "kedro";

    /// Overrides version detection when set
    pub const VERSION_ENV: &str = "KEDROGEN_KEDRO_VERSION";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const INVALID_PROJECT_NAME: i32 = 3;
    pub const TEMPLATE_FETCH_FAILURE: i32 = 4;
    pub const TEMPLATE_RENDER_FAILURE: i32 = 5;
    pub const PARTIAL_GENERATION_FAILURE: i32 = 6;
}
