//! Moves rendered output from staging into the working directory.

use crate::error::{Error, Result};
use crate::ioutils::{move_path, remove_path, replace_file, sorted_entries};
use crate::prompt::{confirm_overwrite, ConfirmationPrompter};
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Shape of the staged output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
    /// Entries sit at the top level of staging and are moved as-is.
    #[default]
    Flat,
    /// Staging holds a single directory whose contents are moved.
    Nested { wrapper: String },
}

/// Outcome of a successful generation. Paths are relative to the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub project_dir: PathBuf,
    pub layout: Layout,
    /// Entries that did not exist before.
    pub moved: Vec<PathBuf>,
    /// Existing files the user agreed to replace.
    pub overwritten: Vec<PathBuf>,
    /// Existing files kept because the user declined to replace them.
    pub skipped: Vec<PathBuf>,
}

impl GenerationReport {
    /// Number of entries written into the working directory.
    pub fn written(&self) -> usize {
        self.moved.len() + self.overwritten.len()
    }
}

/// Decides between flat and nested output and returns the directory to move from.
pub fn detect_layout<P: AsRef<Path>>(staged: P) -> Result<(Layout, PathBuf)> {
    let staged = staged.as_ref();
    let entries = sorted_entries(staged)?;

    if let [single] = entries.as_slice() {
        if fs::symlink_metadata(single)?.is_dir() {
            let wrapper = single
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            return Ok((Layout::Nested { wrapper }, single.clone()));
        }
    }
    Ok((Layout::Flat, staged.to_path_buf()))
}

/// What happens to one staged entry.
#[derive(Debug, PartialEq, Eq)]
enum Placement {
    /// Destination is free.
    Move,
    /// Both sides are directories; their children are placed one by one.
    Merge,
    /// Both sides are files; the user decides.
    Replace,
    /// A file and a directory meet.
    Conflict,
}

fn is_dir(path: &Path) -> std::io::Result<bool> {
    Ok(fs::symlink_metadata(path)?.is_dir())
}

/// Merges staged output into a working directory, asking before each overwrite.
pub struct Reconciler<'a, P: ConfirmationPrompter + ?Sized> {
    prompter: &'a P,
    report: GenerationReport,
}

impl<'a, P: ConfirmationPrompter + ?Sized> Reconciler<'a, P> {
    pub fn new(prompter: &'a P) -> Self {
        Self { prompter, report: GenerationReport::default() }
    }

    /// Moves everything below `staged` into `work_dir`.
    ///
    /// Already moved entries stay in place when a later one fails.
    ///
    /// # Errors
    /// * `Error::PartialGenerationFailure` - if an entry cannot be moved, or a file and
    ///   a directory collide.
    pub fn reconcile(mut self, staged: &Path, work_dir: &Path) -> Result<GenerationReport> {
        let (layout, source_root) = detect_layout(staged)?;
        log::debug!("Staged output layout: {layout:?}");

        self.report.project_dir = work_dir.to_path_buf();
        self.report.layout = layout;
        self.merge_dir(&source_root, work_dir, Path::new(""))?;

        if let Layout::Nested { .. } = &self.report.layout {
            if let Err(e) = remove_path(&source_root) {
                log::debug!("Could not remove '{}': {e}", source_root.display());
            }
        }
        Ok(self.report)
    }

    fn partial(&self, relative: &Path, reason: impl Display) -> Error {
        Error::PartialGenerationFailure {
            path: relative.display().to_string(),
            moved: self.report.written(),
            reason: reason.to_string(),
        }
    }

    fn placement(&self, source: &Path, dest: &Path, relative: &Path) -> Result<Placement> {
        let dest_is_dir = match is_dir(dest) {
            Ok(dest_is_dir) => dest_is_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Placement::Move),
            Err(e) => return Err(self.partial(relative, e)),
        };
        let source_is_dir = is_dir(source).map_err(|e| self.partial(relative, e))?;

        Ok(match (source_is_dir, dest_is_dir) {
            (true, true) => Placement::Merge,
            (false, false) => Placement::Replace,
            _ => Placement::Conflict,
        })
    }

    fn merge_dir(&mut self, source_dir: &Path, dest_dir: &Path, relative: &Path) -> Result<()> {
        let entries = sorted_entries(source_dir).map_err(|e| self.partial(relative, e))?;
        for source in entries {
            let Some(name) = source.file_name() else {
                continue;
            };
            let dest = dest_dir.join(name);
            let relative = relative.join(name);
            self.place(&source, &dest, &relative)?;
        }
        Ok(())
    }

    fn place(&mut self, source: &Path, dest: &Path, relative: &Path) -> Result<()> {
        match self.placement(source, dest, relative)? {
            Placement::Move => {
                move_path(source, dest).map_err(|e| self.partial(relative, e))?;
                self.report.moved.push(relative.to_path_buf());
            }
            Placement::Merge => self.merge_dir(source, dest, relative)?,
            Placement::Replace => {
                if confirm_overwrite(self.prompter, relative)? {
                    replace_file(source, dest).map_err(|e| self.partial(relative, e))?;
                    self.report.overwritten.push(relative.to_path_buf());
                } else {
                    log::warn!("Skipping '{}'", relative.display());
                    self.report.skipped.push(relative.to_path_buf());
                }
            }
            Placement::Conflict => {
                let reason = if is_dir(source).unwrap_or(false) {
                    "a directory cannot replace an existing file"
                } else {
                    "a file cannot replace an existing directory"
                };
                return Err(self.partial(relative, reason));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ConfirmationConfig;
    use std::cell::RefCell;

    struct FixedAnswer {
        answer: bool,
        asked: RefCell<Vec<String>>,
    }

    impl FixedAnswer {
        fn new(answer: bool) -> Self {
            Self { answer, asked: RefCell::new(Vec::new()) }
        }
    }

    impl ConfirmationPrompter for FixedAnswer {
        fn prompt_confirmation(&self, config: &ConfirmationConfig) -> Result<bool> {
            assert_eq!(config.default, None);
            self.asked.borrow_mut().push(config.prompt.clone());
            Ok(self.answer)
        }
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn single_directory_is_descended_once() {
        let staged = tempfile::tempdir().unwrap();
        write(staged.path(), "my-app/inner/file.txt", "x");

        let (layout, root) = detect_layout(staged.path()).unwrap();
        assert_eq!(layout, Layout::Nested { wrapper: "my-app".into() });
        assert_eq!(root, staged.path().join("my-app"));
    }

    #[test]
    fn multiple_entries_or_single_file_stay_flat() {
        let staged = tempfile::tempdir().unwrap();
        write(staged.path(), "a/file.txt", "x");
        write(staged.path(), "b/file.txt", "y");
        assert_eq!(detect_layout(staged.path()).unwrap().0, Layout::Flat);

        let single_file = tempfile::tempdir().unwrap();
        write(single_file.path(), "README.md", "x");
        assert_eq!(detect_layout(single_file.path()).unwrap().0, Layout::Flat);
    }

    #[test]
    fn merges_into_existing_directories() {
        let staged = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        write(staged.path(), "proj/conf/base/catalog.yml", "new");
        write(staged.path(), "proj/README.md", "readme");
        write(work.path(), "conf/local/credentials.yml", "secret");

        let prompter = FixedAnswer::new(true);
        let report = Reconciler::new(&prompter).reconcile(staged.path(), work.path()).unwrap();

        assert_eq!(report.layout, Layout::Nested { wrapper: "proj".into() });
        assert_eq!(
            report.moved,
            vec![PathBuf::from("README.md"), PathBuf::from("conf/base")]
        );
        assert!(prompter.asked.borrow().is_empty());
        assert_eq!(
            fs::read_to_string(work.path().join("conf/local/credentials.yml")).unwrap(),
            "secret"
        );
        assert_eq!(
            fs::read_to_string(work.path().join("conf/base/catalog.yml")).unwrap(),
            "new"
        );
        assert!(!staged.path().join("proj").exists());
    }

    #[test]
    fn declined_overwrite_is_skipped() {
        let staged = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        write(staged.path(), "config.yml", "template");
        write(staged.path(), "other.txt", "other");
        write(work.path(), "config.yml", "original");

        let prompter = FixedAnswer::new(false);
        let report = Reconciler::new(&prompter).reconcile(staged.path(), work.path()).unwrap();

        assert_eq!(report.skipped, vec![PathBuf::from("config.yml")]);
        assert_eq!(report.moved, vec![PathBuf::from("other.txt")]);
        assert_eq!(fs::read_to_string(work.path().join("config.yml")).unwrap(), "original");
        assert_eq!(
            *prompter.asked.borrow(),
            vec!["'config.yml' already exists. Overwrite?".to_string()]
        );
    }

    #[test]
    fn accepted_overwrite_replaces_file() {
        let staged = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        write(staged.path(), "config.yml", "template");
        write(staged.path(), "other.txt", "other");
        write(work.path(), "config.yml", "original");

        let prompter = FixedAnswer::new(true);
        let report = Reconciler::new(&prompter).reconcile(staged.path(), work.path()).unwrap();

        assert_eq!(report.overwritten, vec![PathBuf::from("config.yml")]);
        assert_eq!(fs::read_to_string(work.path().join("config.yml")).unwrap(), "template");
        assert_eq!(
            sorted_entries(work.path()).unwrap(),
            vec![work.path().join("config.yml"), work.path().join("other.txt")]
        );
    }

    #[test]
    fn type_collision_is_partial_failure() {
        let staged = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        write(staged.path(), "a.txt", "first");
        write(staged.path(), "conf/base.yml", "x");
        write(work.path(), "conf", "plain file");

        let prompter = FixedAnswer::new(true);
        let err = Reconciler::new(&prompter)
            .reconcile(staged.path(), work.path())
            .unwrap_err();

        match err {
            Error::PartialGenerationFailure { path, moved, .. } => {
                assert_eq!(path, "conf");
                assert_eq!(moved, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_to_string(work.path().join("a.txt")).unwrap(), "first");
        assert_eq!(fs::read_to_string(work.path().join("conf")).unwrap(), "plain file");
    }
}
