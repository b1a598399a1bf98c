//! Loading of source files from disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// The only extension source files may have.
pub const SOURCE_EXTENSION: &str = "lt";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{path:?} is not a .lt file")]
    DisallowedExtension { path: PathBuf },
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A source file read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// The file name used in positions and diagnostics
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    /// Reads a source file. The extension is checked before the file is
    /// touched.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        check_extension(path)?;

        let contents = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::debug!("read {} bytes from {}", contents.len(), path.display());

        Ok(SourceFile {
            path: path.to_path_buf(),
            name,
            contents,
        })
    }
}

pub fn check_extension(path: &Path) -> Result<(), SourceError> {
    match path.extension() {
        Some(extension) if extension == SOURCE_EXTENSION => Ok(()),
        _ => Err(SourceError::DisallowedExtension {
            path: path.to_path_buf(),
        }),
    }
}
