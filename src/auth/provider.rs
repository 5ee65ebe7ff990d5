//! Token provider - cached bearer credential with reactive refresh
//!
//! The cached credential is the only mutable state shared between calls. All
//! reads and replacements go through one async mutex, so a refresh started by
//! one call is observed by every call that queues behind it instead of each
//! starting its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::error::Result;

use super::broker::CredentialBroker;
use super::credential::Credential;

pub struct TokenProvider {
    broker: Arc<dyn CredentialBroker>,
    cached: Mutex<Option<Arc<Credential>>>,
    next_generation: AtomicU64,
    refreshes: AtomicU64,
}

impl TokenProvider {
    pub fn new(broker: Arc<dyn CredentialBroker>) -> Self {
        Self {
            broker,
            cached: Mutex::new(None),
            next_generation: AtomicU64::new(1),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Return the cached credential, acquiring one from the broker if none is
    /// cached or the cached one carries an expiry that has already passed.
    pub async fn get_token(&self) -> Result<Arc<Credential>> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref() {
            if !credential.is_expired() {
                return Ok(Arc::clone(credential));
            }
            log::info!(
                "Cached credential {} has expired, re-acquiring",
                credential.fingerprint()
            );
        }

        let force = cached.is_some();
        let credential = self.acquire(force).await?;
        if force {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
        *cached = Some(Arc::clone(&credential));
        Ok(credential)
    }

    /// Unconditionally ask the broker for a new credential and replace the cache
    pub async fn force_refresh(&self) -> Result<Arc<Credential>> {
        let mut cached = self.cached.lock().await;
        let credential = self.acquire(true).await?;
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        *cached = Some(Arc::clone(&credential));
        Ok(credential)
    }

    /// Replace a credential the upstream has just rejected.
    ///
    /// If the cache already holds a newer credential than `rejected` another
    /// call refreshed first and that credential is returned without touching
    /// the broker. The returned credential is never `rejected` itself.
    pub async fn refresh_rejected(&self, rejected: &Credential) -> Result<Arc<Credential>> {
        let mut cached = self.cached.lock().await;
        if let Some(current) = cached.as_ref() {
            if current.generation() > rejected.generation() {
                log::debug!(
                    "Credential {} already replaced by generation {}",
                    rejected.fingerprint(),
                    current.generation()
                );
                return Ok(Arc::clone(current));
            }
        }

        log::info!(
            "Upstream rejected credential {} (generation {}), refreshing",
            rejected.fingerprint(),
            rejected.generation()
        );
        let credential = self.acquire(true).await?;
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if credential.fingerprint() == rejected.fingerprint() {
            log::warn!("Broker returned the same token after a forced refresh");
        }
        *cached = Some(Arc::clone(&credential));
        Ok(credential)
    }

    /// Number of forced broker refreshes, whether triggered by a rejection or
    /// by expiry (initial acquisition excluded)
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Currently cached credential, without contacting the broker
    pub async fn cached(&self) -> Option<Arc<Credential>> {
        self.cached.lock().await.clone()
    }

    async fn acquire(&self, force_refresh: bool) -> Result<Arc<Credential>> {
        let token = self.broker.fetch(force_refresh).await.inspect_err(|e| {
            log::warn!("Broker fetch failed: {}", e);
        })?;
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let credential = Credential::new(token.access_token, token.expires_at, generation);
        log::info!(
            "Acquired credential {} (generation {}, expires_at: {:?})",
            credential.fingerprint(),
            generation,
            credential.expires_at()
        );
        Ok(Arc::new(credential))
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}
