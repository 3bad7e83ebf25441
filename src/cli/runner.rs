use crate::{
    backend::{CookiecutterBackend, FetchRequest, TemplateBackend},
    cli::Args,
    config::UserConfig,
    constants::STAGING_PREFIX,
    context::TemplateContext,
    error::{Error, Result},
    ioutils::{create_dir_all, current_dir_name},
    project::ProjectIdentity,
    prompt::{get_prompt_provider, ConfirmationPrompter},
    reconcile::{GenerationReport, Reconciler},
    version::ToolVersion,
};
use log::{debug, info};
use std::path::Path;

const TEMPLATE_DIR: &str = "template";
const OUTPUT_DIR: &str = "output";

/// Drives one generation: identity, context, render into staging, reconcile.
pub struct Runner<'a, B: TemplateBackend + ?Sized, P: ConfirmationPrompter + ?Sized> {
    backend: &'a B,
    prompter: &'a P,
}

impl<'a, B, P> Runner<'a, B, P>
where
    B: TemplateBackend + ?Sized,
    P: ConfirmationPrompter + ?Sized,
{
    pub fn new(backend: &'a B, prompter: &'a P) -> Self {
        Self { backend, prompter }
    }

    /// Generates the project described by `request` into `work_dir`.
    ///
    /// Nothing is written to `work_dir` unless fetching and rendering both succeed.
    ///
    /// # Errors
    /// * `Error::InvalidProjectName` - if `work_dir`'s name cannot become a package name.
    /// * `Error::TemplateFetchFailure` - if the template cannot be resolved.
    /// * `Error::TemplateRenderFailure` - if the schema or a template file is invalid.
    /// * `Error::PartialGenerationFailure` - if moving the output fails midway.
    pub fn generate(
        &self,
        work_dir: &Path,
        tool_version: &ToolVersion,
        request: &FetchRequest,
    ) -> Result<GenerationReport> {
        let identity = ProjectIdentity::from_dir(work_dir)?;
        info!("[✔] Using current directory as project name: '{}'", current_dir_name(work_dir));
        info!("[✔] Detected Kedro version: {tool_version}");

        let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir()?;
        let fetch_dir = staging.path().join(TEMPLATE_DIR);
        let output_dir = staging.path().join(OUTPUT_DIR);
        create_dir_all(&fetch_dir)?;
        create_dir_all(&output_dir)?;

        let template_dir = self
            .backend
            .fetch(request, &fetch_dir)
            .map_err(|e| Error::fetch_failure(&request.template, e))?;
        debug!("[✔] Template resolved to '{}'", template_dir.display());

        let schema = self.backend.schema(&template_dir).map_err(Error::render_failure)?;
        let context = TemplateContext::build(&identity, tool_version, &schema);
        debug!("[✔] Using the template context: {context}");

        self.backend
            .render(&template_dir, &schema, &context, &output_dir)
            .map_err(Error::render_failure)?;

        let report = Reconciler::new(self.prompter).reconcile(&output_dir, work_dir)?;
        if !report.skipped.is_empty() {
            info!("[!] {} existing file(s) kept unchanged", report.skipped.len());
        }
        info!(
            "✅ Project `{}` generated successfully in the current directory!",
            identity.display_name
        );
        Ok(report)
    }
}

/// Runs generation in the current directory with the interactive prompter.
pub fn run(args: &Args) -> Result<GenerationReport> {
    let Some(request) = args.fetch_request() else {
        return Err(Error::ProcessError {
            source_path: String::new(),
            e: "no template given".to_string(),
        });
    };

    let work_dir = std::env::current_dir()?;
    // Reject the directory name before probing for the tool.
    ProjectIdentity::from_dir(&work_dir)?;
    let tool_version = ToolVersion::detect()?;
    let config = UserConfig::load()?;

    let prompter = get_prompt_provider();
    let backend = CookiecutterBackend::new(&prompter, &config);
    Runner::new(&backend, &prompter).generate(&work_dir, &tool_version, &request)
}
