use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use std::path::{Path, PathBuf};

/// Loader for templates from the local filesystem.
pub struct LocalLoader<P: AsRef<Path>> {
    path: P,
}

impl<P: AsRef<Path>> LocalLoader<P> {
    /// Creates a new LocalLoader instance.
    pub fn new(path: P) -> Self {
        Self { path }
    }
}

impl<P: AsRef<Path>> TemplateLoader for LocalLoader<P> {
    /// Local templates are used in place; nothing is copied into staging.
    fn load(&self, _staging: &Path) -> Result<PathBuf> {
        let path = self.path.as_ref();
        if !path.is_dir() {
            return Err(Error::TemplateDoesNotExistsError {
                template_dir: path.display().to_string(),
            });
        }
        Ok(path.canonicalize()?)
    }
}
