use crate::compose::compose;
use crate::error::{GitignoreError, Result};
use crate::template::TemplateContent;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name written inside the output directory
pub const GITIGNORE_FILE: &str = ".gitignore";

/// How generated content is combined with what is already on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Keep the current `.gitignore` and add the templates after it
    pub extend: bool,
    /// Custom text written after the templates
    pub append: Option<String>,
}

/// Path of the `.gitignore` inside `dir`
#[must_use]
pub fn gitignore_path(dir: &Path) -> PathBuf {
    dir.join(GITIGNORE_FILE)
}

/// Reads the current file, if any
///
/// # Errors
///
/// Returns `GitignoreError::Filesystem` for any failure other than the file being absent.
pub fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(GitignoreError::Filesystem {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `bytes` to `path`, replacing its contents
///
/// # Errors
///
/// Returns `GitignoreError::Filesystem` if the file cannot be created or written.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| GitignoreError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the final bytes for `dir/.gitignore` without touching the disk
/// beyond reading the current file when `options.extend` is set.
///
/// # Errors
///
/// Returns `GitignoreError::Filesystem` if the existing file cannot be read.
pub fn render(dir: &Path, content: &TemplateContent, options: &GenerateOptions) -> Result<Vec<u8>> {
    let path = gitignore_path(dir);
    let existing = if options.extend {
        read_existing(&path)?
    } else {
        None
    };
    if let Some(bytes) = &existing {
        debug!(path = %path.display(), bytes = bytes.len(), "extending existing file");
    }
    Ok(compose(
        content,
        existing.as_deref(),
        options.append.as_deref(),
    ))
}

/// Composes and writes `dir/.gitignore`, returning the path written
///
/// # Errors
///
/// Returns `GitignoreError::Filesystem` for read or write failures.
pub fn generate(dir: &Path, content: &TemplateContent, options: &GenerateOptions) -> Result<PathBuf> {
    let bytes = render(dir, content, options)?;
    let path = gitignore_path(dir);
    write_output(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote .gitignore");
    Ok(path)
}
