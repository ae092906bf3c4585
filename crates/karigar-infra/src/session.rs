//! File-backed session cache.
//!
//! The active account's email is persisted as a single-line file under the
//! data directory. Startup looks it up in the user repository via
//! `karigar_core::session::SessionManager`; a missing or stale file simply
//! means no session.

use std::path::{Path, PathBuf};

use karigar_core::session::SessionCache;
use karigar_types::error::SessionError;

const SESSION_FILE: &str = "session";

/// Stores the active email in `{data_dir}/session`.
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }
}

impl SessionCache for FileSessionCache {
    async fn store_active_email(&self, email: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::Io(e.to_string()))?;
        }
        tokio::fs::write(&self.path, email)
            .await
            .map_err(|e| SessionError::Io(e.to_string()))
    }

    async fn load_active_email(&self) -> Result<Option<String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let email = contents.trim();
                Ok((!email.is_empty()).then(|| email.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Io(e.to_string())),
        }
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e.to_string())),
        }
    }
}
