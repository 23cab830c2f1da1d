//! Filesystem-backed [`ObjectStore`].
//!
//! Layout mirrors a blob account: `<root>/<account>/<container>/<prefix>/<object>`.
//! Object paths handed in and out are relative to `<root>/<account>` and always use `/`.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    errors::SourceError,
    store::{ObjectStore, glob_match},
};

/// Serves objects from a directory tree.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    /// Use `root` directly as the namespace root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Namespace root for one storage account under a shared base directory.
    pub fn for_account(base: impl AsRef<Path>, account: &str) -> Self {
        Self::new(base.as_ref().join(account))
    }

    /// The directory objects are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn io_err(path: &Path, source: std::io::Error) -> SourceError {
        SourceError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl ObjectStore for LocalFsStore {
    fn list(&self, pattern: &str) -> Result<Vec<String>, SourceError> {
        let (dir, file_glob) = pattern.rsplit_once('/').unwrap_or(("", pattern));
        if dir.contains(['*', '?']) {
            return Err(SourceError::InvalidPattern {
                pattern: pattern.to_string(),
            });
        }

        let dir_path = self.root.join(dir);
        let entries = match fs::read_dir(&dir_path) {
            Ok(entries) => entries,
            // An absent prefix is an empty listing, like a blob store.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_err(&dir_path, e)),
        };

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::io_err(&dir_path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| Self::io_err(&entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 object name");
                continue;
            };
            if glob_match(file_glob, name) {
                out.push(if dir.is_empty() {
                    name.to_string()
                } else {
                    format!("{dir}/{name}")
                });
            }
        }
        out.sort();
        Ok(out)
    }

    fn open(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_string(),
            },
            _ => Self::io_err(&full, e),
        })
    }
}
