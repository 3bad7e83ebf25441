use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Returns the base name of the working directory.
pub fn current_dir_name<P: AsRef<Path>>(dir: P) -> String {
    dir.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn path_to_str<P: AsRef<Path> + ?Sized>(path: &P) -> Result<&str> {
    let path = path.as_ref();
    path.to_str().ok_or_else(|| Error::ProcessError {
        source_path: path.display().to_string(),
        e: "Path contains invalid Unicode characters".to_string(),
    })
}

pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    fs::create_dir_all(dest_path).map_err(Error::IoError)
}

/// Direct children of `dir`, sorted by file name.
pub fn sorted_entries<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir.as_ref())?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// Removes a file, symlink or directory tree.
pub fn remove_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Recursively copies `source` to `dest`, preserving file permissions.
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    if !source.is_dir() {
        if let Some(parent) = dest.parent() {
            create_dir_all(parent)?;
        }
        fs::copy(source, dest)?;
        return Ok(());
    }

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::ProcessError {
            source_path: source.display().to_string(),
            e: e.to_string(),
        })?;
        let relative = entry.path().strip_prefix(source).map_err(|e| Error::ProcessError {
            source_path: entry.path().display().to_string(),
            e: e.to_string(),
        })?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Moves `source` to `dest`, falling back to copy and delete across file systems.
pub fn move_path<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::debug!(
                "Rename '{}' -> '{}' failed ({e}), copying instead",
                source.display(),
                dest.display()
            );
            copy_tree(source, dest)?;
            remove_path(source)
        }
    }
}

/// Replaces the file at `dest` with `source`.
///
/// `dest` keeps its old content until the new content is complete; across file systems
/// the copy is written next to `dest` first and renamed over it.
pub fn replace_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::debug!(
                "Rename '{}' -> '{}' failed ({e}), copying instead",
                source.display(),
                dest.display()
            );
            copy_over(source, dest)?;
            remove_path(source)
        }
    }
}

/// Copies `source` into a temporary sibling of `dest`, then renames it over `dest`.
pub fn copy_over<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    let dest = dest.as_ref();
    let parent = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let staged = tempfile::Builder::new().prefix(".kedrogen-").tempfile_in(parent)?;
    fs::copy(source.as_ref(), staged.path())?;
    staged.persist(dest).map_err(|e| Error::IoError(e.error))?;
    Ok(())
}
