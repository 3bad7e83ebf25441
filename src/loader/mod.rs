use crate::backend::FetchRequest;
use crate::config::UserConfig;
use crate::constants::SCHEMA_FILENAME;
use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use crate::loader::{archive::ArchiveLoader, git::GitLoader, local::LocalLoader};
use regex::Regex;
use std::path::{Path, PathBuf};

pub mod archive;
pub mod git;
pub mod interface;
pub mod local;

const REPO_URL_PATTERN: &str = r"^((((git|hg)\+)?(git|ssh|file|https?):(//)?)|(\w+@[\w\.]+))";

#[derive(Debug, PartialEq, Eq)]
pub enum TemplateSource {
    /// Local filesystem template path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS, SSH or file)
    Git(String),
    /// Zip archive, local or remote
    Archive(String),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            TemplateSource::Git(repo) => write!(f, "git repository: '{repo}'"),
            TemplateSource::Archive(archive) => write!(f, "zip archive: '{archive}'"),
        }
    }
}

/// Whether `s` looks like a remote repository or URL.
pub fn is_repo_url(s: &str) -> bool {
    Regex::new(REPO_URL_PATTERN).map(|re| re.is_match(s)).unwrap_or(false)
}

pub fn is_zip_file(s: &str) -> bool {
    s.to_ascii_lowercase().ends_with(".zip")
}

impl TemplateSource {
    /// Classifies an already abbreviation-expanded template location.
    ///
    /// # Errors
    /// * `Error::UnsupportedSource` - for Mercurial repositories.
    pub fn classify(location: &str) -> Result<Self> {
        if is_zip_file(location) {
            return Ok(TemplateSource::Archive(location.to_string()));
        }

        if is_repo_url(location) {
            if location.starts_with("hg+") {
                return Err(Error::UnsupportedSource {
                    source_str: location.to_string(),
                    reason: "Mercurial repositories are not supported".to_string(),
                });
            }
            let url = location.strip_prefix("git+").unwrap_or(location);
            return Ok(TemplateSource::Git(url.to_string()));
        }

        Ok(TemplateSource::FileSystem(PathBuf::from(location)))
    }
}

/// Resolves a template request to a local directory holding `cookiecutter.json`.
///
/// Remote sources are cloned, downloaded or unpacked below `staging`; local directories
/// are used in place and never modified.
///
/// # Arguments
/// * `request` - Template location and fetch options
/// * `config` - User configuration providing abbreviations
/// * `staging` - Scratch directory for downloads
///
/// # Returns
/// * `Result<PathBuf>` - Path to the template root
pub fn get_template(
    request: &FetchRequest,
    config: &UserConfig,
    staging: &Path,
) -> Result<PathBuf> {
    let location = config.expand_abbreviations(&request.template);
    let source = TemplateSource::classify(&location)?;
    log::debug!("Loading template from {source}");

    if request.checkout.is_some() && !matches!(source, TemplateSource::Git(_)) {
        log::warn!("Ignoring --checkout for {source}");
    }

    let root = match &source {
        TemplateSource::Git(repo) => {
            GitLoader::new(repo.as_str(), request.checkout.as_deref()).load(staging)?
        }
        TemplateSource::Archive(archive) => {
            ArchiveLoader::new(archive.as_str(), request.password.as_deref()).load(staging)?
        }
        TemplateSource::FileSystem(path) => LocalLoader::new(path).load(staging)?,
    };

    let template_dir = match &request.directory {
        Some(directory) => root.join(directory),
        None => root,
    };

    if !template_dir.join(SCHEMA_FILENAME).is_file() {
        return Err(Error::TemplateNotFound {
            template: request.template.clone(),
            template_dir: template_dir.display().to_string(),
            config_file: SCHEMA_FILENAME.to_string(),
        });
    }

    Ok(template_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_source_display() {
        let fs_source = TemplateSource::FileSystem(PathBuf::from("/path/to/template"));
        assert_eq!(format!("{fs_source}"), "local path: '/path/to/template'");

        let git_source = TemplateSource::Git("git@github.com:user/repo".to_string());
        assert_eq!(format!("{git_source}"), "git repository: 'git@github.com:user/repo'");

        let zip_source = TemplateSource::Archive("starter.zip".to_string());
        assert_eq!(format!("{zip_source}"), "zip archive: 'starter.zip'");
    }

    #[test]
    fn classifies_sources() {
        assert_eq!(
            TemplateSource::classify("https://github.com/kedro-org/kedro-starters.git").unwrap(),
            TemplateSource::Git("https://github.com/kedro-org/kedro-starters.git".into())
        );
        assert_eq!(
            TemplateSource::classify("git+ssh://host/repo").unwrap(),
            TemplateSource::Git("ssh://host/repo".into())
        );
        assert_eq!(
            TemplateSource::classify("git@github.com:user/repo.git").unwrap(),
            TemplateSource::Git("git@github.com:user/repo.git".into())
        );
        assert_eq!(
            TemplateSource::classify("https://example.com/Starter.ZIP").unwrap(),
            TemplateSource::Archive("https://example.com/Starter.ZIP".into())
        );
        assert_eq!(
            TemplateSource::classify("./templates/spaceflights").unwrap(),
            TemplateSource::FileSystem(PathBuf::from("./templates/spaceflights"))
        );
    }

    #[test]
    fn rejects_mercurial() {
        let err = TemplateSource::classify("hg+https://example.com/repo").unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource { .. }));
    }

    #[test]
    fn requires_schema_file() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let request = FetchRequest::new(tmp.path().to_str().unwrap());

        let err = get_template(&request, &UserConfig::default(), staging.path()).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { .. }));

        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested").join(SCHEMA_FILENAME), "{}").unwrap();
        let request = FetchRequest { directory: Some("nested".into()), ..request };
        let dir = get_template(&request, &UserConfig::default(), staging.path()).unwrap();
        assert!(dir.ends_with("nested"));
    }
}
