use crate::error::Result;
use crate::loader::interface::TemplateLoader;
use git2::{build::CheckoutBuilder, build::RepoBuilder, Repository};
use std::path::{Path, PathBuf};

/// Loader for templates from git repositories.
pub struct GitLoader<S: AsRef<str>> {
    repo: S,
    checkout: Option<S>,
}

impl<S: AsRef<str>> GitLoader<S> {
    /// Creates a new GitLoader instance.
    pub fn new(repo: S, checkout: Option<S>) -> Self {
        Self { repo, checkout }
    }

    /// Extracts repository name from various git URL formats.
    ///
    /// Supports:
    /// - HTTPS: https://github.com/user/repo.git -> repo
    /// - SSH: git@github.com:user/repo.git -> repo
    /// - SSH without .git: git@github.com:user/repo -> repo
    pub fn extract_repo_name(repo_url: &str) -> String {
        if repo_url.is_empty() {
            return "template".to_string();
        }

        // Handle SSH format: git@host:user/repo or user@host:user/repo
        if repo_url.contains('@') && repo_url.contains(':') && !repo_url.contains("://") {
            if let Some(colon_pos) = repo_url.rfind(':') {
                let path_part = &repo_url[colon_pos + 1..];
                if !path_part.is_empty() {
                    return path_part
                        .split('/')
                        .next_back()
                        .unwrap_or("template")
                        .trim_end_matches(".git")
                        .to_string();
                }
            }
        }

        let result = repo_url
            .trim_end_matches('/')
            .split('/')
            .next_back()
            .unwrap_or("")
            .trim_end_matches(".git");

        if result.is_empty() || result.contains('@') || result.contains(':') {
            "template".to_string()
        } else {
            result.to_string()
        }
    }

    /// Checks out `reference` (branch, tag or commit) and detaches HEAD on it.
    ///
    /// Branches that only exist on the remote are looked up as `origin/<reference>`.
    fn checkout_reference(repo: &Repository, reference: &str) -> Result<()> {
        let (object, _) = repo
            .revparse_ext(reference)
            .or_else(|_| repo.revparse_ext(&format!("origin/{reference}")))?;

        log::debug!("Checking out '{reference}' at {}", object.id());
        repo.checkout_tree(&object, Some(CheckoutBuilder::new().force()))?;
        repo.set_head_detached(object.peel_to_commit()?.id())?;
        Ok(())
    }
}

impl<S: AsRef<str>> TemplateLoader for GitLoader<S> {
    /// Clones the repository below `staging`.
    fn load(&self, staging: &Path) -> Result<PathBuf> {
        let repo_url = self.repo.as_ref();
        let clone_path = staging.join(Self::extract_repo_name(repo_url));

        if clone_path.exists() {
            std::fs::remove_dir_all(&clone_path)?;
        }

        log::debug!("Cloning repository '{repo_url}' to '{}'", clone_path.display());
        let repo = RepoBuilder::new().clone(repo_url, &clone_path)?;

        if let Some(reference) = &self.checkout {
            Self::checkout_reference(&repo, reference.as_ref())?;
        }

        Ok(clone_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_repo_name_https() {
        assert_eq!(
            GitLoader::<String>::extract_repo_name("https://github.com/user/repo"),
            "repo"
        );
        assert_eq!(
            GitLoader::<String>::extract_repo_name("https://github.com/user/repo.git"),
            "repo"
        );
        assert_eq!(
            GitLoader::<String>::extract_repo_name("https://gitlab.com/group/subgroup/repo.git/"),
            "repo"
        );
    }

    #[test]
    fn test_extract_repo_name_ssh() {
        assert_eq!(GitLoader::<String>::extract_repo_name("git@github.com:user/repo"), "repo");
        assert_eq!(
            GitLoader::<String>::extract_repo_name("git@github.com:user/repo.git"),
            "repo"
        );
    }

    #[test]
    fn test_extract_repo_name_edge_cases() {
        assert_eq!(GitLoader::<String>::extract_repo_name("invalid-url"), "invalid-url");
        assert_eq!(GitLoader::<String>::extract_repo_name(""), "template");
        assert_eq!(GitLoader::<String>::extract_repo_name("git@host:"), "template");
    }
}
