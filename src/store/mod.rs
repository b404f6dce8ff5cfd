//! Persisted bearer-token storage.
//!
//! DESIGN
//! ======
//! `SessionStore` is the single owner of the credential. Whether anything is
//! actually persisted is decided once, when the store is built: it either
//! wraps a [`TokenBackend`] or is a no-op store whose reads are always
//! absent. Callers never probe the environment themselves.
//!
//! All operations are synchronous and never touch the network, so the
//! session controller can consult the store before any remote call runs.
//! Clones share one backend, letting the HTTP client and the controller see
//! the same credential.

pub mod file;
pub mod memory;


use std::sync::Arc;

use crate::config::{ClientConfig, TokenStoreKind};

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Storage strategy for a single named token slot.
///
/// Implementations swallow their own I/O failures (logging them); a value
/// that cannot be read is reported as absent.
pub trait TokenBackend: Send + Sync {
    /// Current token, if any.
    fn load(&self) -> Option<String>;
    /// Replace whatever is stored with `token`.
    fn save(&self, token: &str);
    /// Drop the stored token. Removing an absent token is not an error.
    fn remove(&self);
}

/// Owner of the persisted credential.
#[derive(Clone, Default)]
pub struct SessionStore {
    backend: Option<Arc<dyn TokenBackend>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("backed", &self.is_backed())
            .finish()
    }
}

impl SessionStore {
    /// A store that persists through `backend`.
    #[must_use]
    pub fn backed(backend: impl TokenBackend + 'static) -> Self {
        Self { backend: Some(Arc::new(backend)) }
    }

    /// A store with no persistence medium: reads are absent, writes do nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self { backend: None }
    }

    /// Process-local store.
    #[must_use]
    pub fn memory() -> Self {
        Self::backed(MemoryBackend::default())
    }

    /// Build the store selected by `config`.
    ///
    /// A file store with no explicit path and no discoverable platform config
    /// directory degrades to [`SessionStore::noop`].
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        match config.token_store {
            TokenStoreKind::None => Self::noop(),
            TokenStoreKind::Memory => Self::memory(),
            TokenStoreKind::File => {
                let path = config
                    .token_file
                    .clone()
                    .or_else(file::default_token_path);
                match path {
                    Some(path) => {
                        tracing::debug!(path = %path.display(), "using file token store");
                        Self::backed(FileBackend::new(path))
                    }
                    None => {
                        tracing::warn!("no config directory available; credentials will not persist");
                        Self::noop()
                    }
                }
            }
        }
    }

    /// `true` when tokens actually persist somewhere.
    #[must_use]
    pub fn is_backed(&self) -> bool {
        self.backend.is_some()
    }

    /// The stored token, verbatim. No expiry check is made here; an expired
    /// token is only discovered by a failed authenticated call.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.backend.as_ref().and_then(|backend| backend.load())
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Overwrite any existing token.
    pub fn set_token(&self, token: &str) {
        if let Some(backend) = &self.backend {
            backend.save(token);
        }
    }

    /// Idempotent.
    pub fn clear_token(&self) {
        if let Some(backend) = &self.backend {
            backend.remove();
        }
    }
}
