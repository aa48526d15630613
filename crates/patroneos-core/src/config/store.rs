use super::{ConfigError, FilterConfig, Mode};
use arc_swap::ArcSwap;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::info;

/// Holder of the active [`FilterConfig`].
///
/// Reads are lock-free via `ArcSwap::load_full`; a request takes one snapshot when it starts
/// and evaluates every stage against it, so an update landing mid-request is never observed
/// half-applied. Updates replace the whole document and are serialized by a writer lock, so
/// the file on disk always holds the active configuration.
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<FilterConfig>,
    path: PathBuf,
    mode: Mode,
    writer: Mutex<()>,
}

impl ConfigStore {
    /// Creates a store around an already-loaded configuration. Updates are validated for
    /// `mode`.
    #[must_use]
    pub fn new(config: FilterConfig, path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
            path: path.into(),
            mode,
            writer: Mutex::new(()),
        }
    }

    /// Reads, decodes and validates the configuration file.
    ///
    /// # Errors
    ///
    /// Any error here is fatal at startup: [`ConfigError::Read`] if the file is unreadable,
    /// [`ConfigError::Parse`] or [`ConfigError::Invalid`] if its content is rejected.
    pub fn load(path: impl AsRef<Path>, mode: Mode) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = FilterConfig::from_slice(&bytes, mode)?;

        info!(path = %path.display(), %mode, "configuration loaded");
        Ok(Self::new(config, path, mode))
    }

    /// Returns a consistent snapshot of the active configuration.
    #[must_use]
    pub fn snapshot(&self) -> Arc<FilterConfig> {
        self.current.load_full()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the active configuration with `bytes`.
    ///
    /// The bytes are decoded and validated, written verbatim to the configuration file, and
    /// only then swapped in. A failed write leaves the previous configuration active.
    /// Concurrent calls take turns from the write to the swap; readers are never blocked.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`]/[`ConfigError::Invalid`] for a rejected document,
    /// [`ConfigError::Write`] if persisting fails.
    pub async fn replace(&self, bytes: &[u8]) -> Result<Arc<FilterConfig>, ConfigError> {
        let config = Arc::new(FilterConfig::from_slice(bytes, self.mode)?);

        let _writer = self.writer.lock().await;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| ConfigError::Write { path: self.path.clone(), source })?;

        self.current.store(Arc::clone(&config));
        info!(
            path = %self.path.display(),
            max_signatures = config.max_signatures,
            max_transaction_size = config.max_transaction_size,
            max_transactions = config.max_transactions,
            blacklisted_contracts = config.contract_black_list.len(),
            relay_endpoints = config.log_endpoints.len(),
            "configuration replaced"
        );

        Ok(config)
    }
}
