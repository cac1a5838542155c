//! File-backed credential store.

use super::CredentialProvider;
use crate::error::AuthError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Persists the token to a file and mirrors it in memory.
///
/// `get` serves the mirror and falls back to reading the file when the
/// mirror is empty, so a token written by an earlier process is picked up.
#[derive(Debug)]
pub struct FileCredentials {
    path: PathBuf,
    cache: RwLock<Option<String>>,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read credentials from {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl CredentialProvider for FileCredentials {
    fn get(&self) -> Option<String> {
        if let Some(token) = self
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
        {
            return Some(token);
        }

        let token = self.read_file()?;
        *self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.clone());
        Some(token)
    }

    fn set(&self, token: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AuthError::Storage(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| AuthError::Storage(e.to_string()))?;
        *self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}
