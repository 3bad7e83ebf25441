//! Pre and post generation hooks shipped in a template's `hooks/` directory.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::constants::{HOOKS_DIR, POST_GEN_HOOK, PRE_GEN_HOOK};
use crate::error::{Error, Result};
use crate::ioutils::sorted_entries;
use crate::renderer::TemplateRenderer;

/// Generation phase a hook runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Runs in the freshly created project directory before any file is rendered.
    PreGen,
    /// Runs after every file has been rendered.
    PostGen,
}

impl Hook {
    pub fn stem(self) -> &'static str {
        match self {
            Hook::PreGen => PRE_GEN_HOOK,
            Hook::PostGen => POST_GEN_HOOK,
        }
    }

    /// Locates the hook script in `template_dir`, skipping editor backups.
    pub fn find<P: AsRef<Path>>(self, template_dir: P) -> Result<Option<PathBuf>> {
        let hooks_dir = template_dir.as_ref().join(HOOKS_DIR);
        if !hooks_dir.is_dir() {
            return Ok(None);
        }

        Ok(sorted_entries(hooks_dir)?.into_iter().find(|path| {
            let file_name = path.file_name().map(|name| name.to_string_lossy());
            path.is_file()
                && path.file_stem().is_some_and(|stem| stem == self.stem())
                && !file_name.is_some_and(|name| name.ends_with('~'))
        }))
    }
}

/// Interpreters tried in order for a script extension; empty means run it directly.
fn interpreters(script: &Path) -> &'static [&'static str] {
    match script.extension().and_then(|ext| ext.to_str()) {
        Some("py") => &["python3", "python"],
        Some("sh") => &["sh"],
        _ => &[],
    }
}

fn spawn(script: &Path, work_dir: &Path) -> Result<Child> {
    let configure = |command: &mut Command| {
        command
            .current_dir(work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
    };

    let candidates = interpreters(script);
    if candidates.is_empty() {
        let mut command = Command::new(script);
        configure(&mut command);
        return Ok(command.spawn()?);
    }

    for interpreter in candidates {
        let mut command = Command::new(interpreter);
        command.arg(script);
        configure(&mut command);
        match command.spawn() {
            Ok(child) => return Ok(child),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Interpreter '{interpreter}' not found");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(Error::ToolNotInstalled { tool: candidates[0].to_string() })
}

/// Renders a hook script with `context`, then runs it inside `work_dir`.
///
/// The rendered script is written to `scratch_dir` so the template itself is never
/// touched. The context is also passed as JSON on stdin.
///
/// # Errors
/// * `Error::HookExecutionError` - if the script exits with a non-zero status.
pub fn run_hook<R: TemplateRenderer + ?Sized>(
    renderer: &R,
    hook_path: &Path,
    work_dir: &Path,
    scratch_dir: &Path,
    context: &serde_json::Value,
) -> Result<()> {
    let source = std::fs::read_to_string(hook_path)?;
    let script_name = hook_path.file_name().and_then(|name| name.to_str());
    let rendered = renderer.render(&source, context, script_name)?;

    let suffix = hook_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut script = tempfile::Builder::new()
        .prefix("hook-")
        .suffix(&suffix)
        .tempfile_in(scratch_dir)?;
    script.write_all(rendered.as_bytes())?;
    script.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(script.path(), std::fs::Permissions::from_mode(0o755))?;
    }

    // Release the write handle before executing.
    let script = script.into_temp_path();

    log::debug!("Running hook '{}' in '{}'", hook_path.display(), work_dir.display());
    let mut child = spawn(&script, work_dir)?;

    if let Some(mut stdin) = child.stdin.take() {
        let payload = serde_json::to_vec(context)?;
        if let Err(e) = stdin.write_all(&payload) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                log::debug!("Hook closed stdin before reading the context");
            } else {
                log::warn!("Failed to write context to hook stdin: {e}");
            }
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(Error::HookExecutionError {
            script: hook_path.display().to_string(),
            status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MiniJinjaRenderer;
    use serde_json::json;
    use std::fs;

    fn template_with_hooks(files: &[(&str, &str)]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(HOOKS_DIR)).unwrap();
        for (name, content) in files {
            fs::write(tmp.path().join(HOOKS_DIR).join(name), content).unwrap();
        }
        tmp
    }

    #[test]
    fn finds_hooks_and_ignores_backups() {
        let template = template_with_hooks(&[
            ("pre_gen_project.sh~", "exit 1"),
            ("post_gen_project.sh", "exit 0"),
        ]);
        assert_eq!(Hook::PreGen.find(template.path()).unwrap(), None);
        assert_eq!(
            Hook::PostGen.find(template.path()).unwrap(),
            Some(template.path().join(HOOKS_DIR).join("post_gen_project.sh"))
        );

        let empty = tempfile::tempdir().unwrap();
        assert_eq!(Hook::PostGen.find(empty.path()).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn runs_rendered_shell_hook_in_work_dir() {
        let template = template_with_hooks(&[(
            "post_gen_project.sh",
            "echo '{{ cookiecutter.python_package }}' > marker.txt\n",
        )]);
        let work_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let hook = Hook::PostGen.find(template.path()).unwrap().unwrap();

        run_hook(
            &MiniJinjaRenderer::new(),
            &hook,
            work_dir.path(),
            scratch.path(),
            &json!({ "cookiecutter": { "python_package": "my_cool_app" } }),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(work_dir.path().join("marker.txt")).unwrap(),
            "my_cool_app\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_hook_is_an_error() {
        let template = template_with_hooks(&[("pre_gen_project.sh", "exit 3\n")]);
        let work_dir = tempfile::tempdir().unwrap();
        let hook = Hook::PreGen.find(template.path()).unwrap().unwrap();

        let err = run_hook(
            &MiniJinjaRenderer::new(),
            &hook,
            work_dir.path(),
            work_dir.path(),
            &json!({ "cookiecutter": {} }),
        )
        .unwrap_err();
        assert!(matches!(err, Error::HookExecutionError { .. }));
    }
}
