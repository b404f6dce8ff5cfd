//! File-backed token storage.
//!
//! The token lives alone in one file, written owner-only on Unix and read
//! back byte for byte. Failures
//! are logged and otherwise ignored: a token that cannot be written simply
//! will not survive the process, and one that cannot be read is absent.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use super::TokenBackend;

const APP_DIR: &str = "touchline";
const TOKEN_FILE: &str = "access_token";

/// `<config dir>/touchline/access_token`, when the platform has a config dir.
#[must_use]
pub fn default_token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(TOKEN_FILE))
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling file and rename it over the token file, so readers
    /// never see a truncated token and the result is always owner-only.
    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("tmp");
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&staging)?;
        // A leftover staging file keeps its old mode; reset it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&staging, &self.path)
    }
}

impl TokenBackend for FileBackend {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.is_empty() => None,
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to read token file");
                None
            }
        }
    }

    fn save(&self, token: &str) {
        if let Err(e) = self.write(token) {
            tracing::warn!(error = %e, path = %self.path.display(), "failed to write token file");
        }
    }

    fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to remove token file");
            }
        }
    }
}
