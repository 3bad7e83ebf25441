use crate::error::{Error, Result};
use crate::ioutils::create_dir_all;
use crate::loader::interface::TemplateLoader;
use crate::loader::is_repo_url;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

const DEFAULT_ARCHIVE_NAME: &str = "template.zip";
const EXTRACT_DIR: &str = "extracted";

/// Loader for zipped templates, local or downloaded over HTTP(S).
///
/// The archive must hold exactly one top-level directory; that directory is the template.
pub struct ArchiveLoader<S: AsRef<str>> {
    location: S,
    password: Option<S>,
}

impl<S: AsRef<str>> ArchiveLoader<S> {
    pub fn new(location: S, password: Option<S>) -> Self {
        Self { location, password }
    }

    /// File name to store a downloaded archive under.
    fn download_name(url: &str) -> String {
        url::Url::parse(url)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(String::from))
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
    }

    fn download(url: &str, staging: &Path) -> Result<PathBuf> {
        let target = staging.join(Self::download_name(url));
        log::debug!("Downloading '{url}' to '{}'", target.display());

        let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
        std::fs::write(&target, &bytes)?;
        Ok(target)
    }

    /// Returns the single top-level directory name shared by every entry.
    fn top_level_dir(archive: &mut ZipArchive<File>, location: &str) -> Result<String> {
        let layout_error = || Error::InvalidArchiveLayout { archive: location.to_string() };

        if archive.is_empty() {
            return Err(layout_error());
        }

        let first = archive.by_index_raw(0)?.name().to_string();
        let Some(top) = first.strip_suffix('/').filter(|name| !name.contains('/')) else {
            return Err(layout_error());
        };
        let prefix = format!("{top}/");

        for name in archive.file_names() {
            if !name.starts_with(&prefix) {
                return Err(layout_error());
            }
        }
        Ok(top.to_string())
    }

    fn extract(&self, archive_path: &Path, staging: &Path) -> Result<PathBuf> {
        let location = self.location.as_ref();
        let mut archive = ZipArchive::new(File::open(archive_path)?)?;
        let top = Self::top_level_dir(&mut archive, location)?;
        let extract_root = staging.join(EXTRACT_DIR);

        for i in 0..archive.len() {
            let encrypted = archive.by_index_raw(i)?.encrypted();
            let mut entry = match (encrypted, &self.password) {
                (false, _) => archive.by_index(i)?,
                (true, None) => {
                    return Err(Error::PasswordRequired { archive: location.to_string() })
                }
                (true, Some(password)) => {
                    match archive.by_index_decrypt(i, password.as_ref().as_bytes()) {
                        Ok(entry) => entry,
                        Err(ZipError::InvalidPassword) => {
                            return Err(Error::InvalidPassword { archive: location.to_string() })
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            };

            let Some(relative) = entry.enclosed_name() else {
                return Err(Error::InvalidArchiveLayout { archive: location.to_string() });
            };
            let target = extract_root.join(relative);

            if entry.is_dir() {
                create_dir_all(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                create_dir_all(parent)?;
            }
            std::io::copy(&mut entry, &mut File::create(&target)?)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode))?;
            }
        }

        Ok(extract_root.join(top))
    }
}

impl<S: AsRef<str>> TemplateLoader for ArchiveLoader<S> {
    /// Unpacks the archive below `staging`, downloading it first for remote locations.
    fn load(&self, staging: &Path) -> Result<PathBuf> {
        let location = self.location.as_ref();
        let archive_path = if is_repo_url(location) {
            Self::download(location, staging)?
        } else {
            let path = PathBuf::from(location);
            if !path.is_file() {
                return Err(Error::TemplateDoesNotExistsError {
                    template_dir: location.to_string(),
                });
            }
            path
        };

        log::debug!("Extracting '{}'", archive_path.display());
        self.extract(&archive_path, staging)
    }
}
