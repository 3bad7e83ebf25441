use crate::error::Result;
use std::path::{Path, PathBuf};

/// Trait for loading templates from different sources.
pub trait TemplateLoader {
    /// Makes the template available on the local file system.
    ///
    /// Loaders that need to download or unpack write below `staging`.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Root directory of the loaded template repository
    fn load(&self, staging: &Path) -> Result<PathBuf>;
}
