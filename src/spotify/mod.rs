use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::AuthError;

pub mod connect;

/// File name librespot's credential cache writes to.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Something that can put a captured Spotify session into a credential file.
#[async_trait(?Send)]
pub trait SessionCapture {
    /// Blocks until `file` holds a freshly captured credential blob.
    async fn capture(&self, file: &CredentialFile) -> Result<(), AuthError>;
}

/// The `credentials.json` the capture library writes and Spotizerr receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn in_dir(dir: impl AsRef<Path>) -> CredentialFile {
        CredentialFile {
            path: dir.as_ref().join(CREDENTIALS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// True once the capture library has written something to the file.
    pub fn is_ready(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Removes a leftover file from an earlier run so a new capture can be
    /// detected. A missing file is fine.
    pub fn remove_stale(&self) -> Result<bool, AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AuthError::RemoveCredentials {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Deletes the file if it is there.
    pub fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    pub fn read_json(&self) -> Result<serde_json::Value, AuthError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            AuthError::ReadCredentials {
                path: self.path.clone(),
                source,
            }
        })?;

        serde_json::from_str(&contents).map_err(|source| AuthError::ParseCredentials {
            path: self.path.clone(),
            source,
        })
    }
}
