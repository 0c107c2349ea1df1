//! Process-wide login session.
//!
//! Lifecycle: `load()` on start reads the persisted token, `set()` after a
//! successful login stores it, `clear()` on logout removes it. The store is
//! the [`CredentialProvider`] handed to the API client.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::RwLock;
use thiserror::Error;

use super::credentials::{CredentialProvider, SecureString};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shared session store backed by a token file.
#[derive(Clone)]
pub struct SessionStore {
    token: Arc<RwLock<Option<SecureString>>>,
    path: PathBuf,
}

impl SessionStore {
    /// Create an empty store that persists to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            path,
        }
    }

    /// Create a store and read any token already persisted at `path`.
    pub fn load(path: PathBuf) -> Result<Self, SessionError> {
        let store = Self::new(path);
        let token = read_token(&store.path)?;
        if token.is_some() {
            tracing::debug!(path = %store.path.display(), "Loaded persisted session");
        }
        *store.token.write() = token;
        Ok(store)
    }

    /// Store a new token in memory and on disk.
    pub fn set(&self, token: SecureString) -> Result<(), SessionError> {
        write_token(&self.path, &token)?;
        *self.token.write() = Some(token);
        tracing::info!("Session started");
        Ok(())
    }

    /// Forget the token and delete the session file.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.token.write() = None;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SessionError::Write {
                    path: self.path.clone(),
                    source: e,
                })
            }
        }
        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for SessionStore {
    fn token(&self) -> Option<SecureString> {
        self.token.read().clone()
    }
}

fn read_token(path: &Path) -> Result<Option<SecureString>, SessionError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SessionError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let token = content.trim();
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(SecureString::new(token.to_string())))
}

fn write_token(path: &Path, token: &SecureString) -> Result<(), SessionError> {
    let write_err = |source| SessionError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file: File = options.open(path).map_err(write_err)?;

    // Two `rig login` runs must not interleave their writes. Truncate only
    // once the lock is held.
    file.lock_exclusive().map_err(write_err)?;
    let result = file
        .set_len(0)
        .and_then(|_| file.write_all(token.expose().as_bytes()))
        .and_then(|_| file.flush());
    let _ = FileExt::unlock(&file);
    result.map_err(write_err)
}
