//! In-process broker for tests and dry runs

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AirtableError, Result};

use super::broker::{BrokerToken, CredentialBroker};

/// Broker that mints `{prefix}-1`, `{prefix}-2`, ... and counts its calls.
///
/// Scripted failures are returned (in order) before any further token is minted.
#[derive(Debug)]
pub struct MockBroker {
    prefix: String,
    latency: Option<Duration>,
    calls: AtomicUsize,
    forced: AtomicUsize,
    minted: AtomicUsize,
    failures: Mutex<VecDeque<String>>,
}

impl MockBroker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            latency: None,
            calls: AtomicUsize::new(0),
            forced: AtomicUsize::new(0),
            minted: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Delay every fetch, to let concurrent callers overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a failure for the next fetch
    pub fn fail_next(self, message: impl Into<String>) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(message.into());
        }
        self
    }

    /// Total fetches, successful or not
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fetches made with `force_refresh`
    pub fn forced_calls(&self) -> usize {
        self.forced.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialBroker for MockBroker {
    async fn fetch(&self, force_refresh: bool) -> Result<BrokerToken> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        if force_refresh {
            self.forced.fetch_add(1, Ordering::SeqCst);
        }

        let failure = self.failures.lock().ok().and_then(|mut f| f.pop_front());
        if let Some(message) = failure {
            return Err(AirtableError::AuthUnavailable(message));
        }

        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BrokerToken {
            access_token: format!("{}-{}", self.prefix, n),
            expires_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mints_sequential_tokens() {
        let broker = MockBroker::new("tok");
        assert_eq!(broker.fetch(false).await.unwrap().access_token, "tok-1");
        assert_eq!(broker.fetch(true).await.unwrap().access_token, "tok-2");
        assert_eq!(broker.calls(), 2);
        assert_eq!(broker.forced_calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure_then_success() {
        let broker = MockBroker::new("tok").fail_next("broker down");
        let err = broker.fetch(false).await.unwrap_err();
        assert!(err.to_string().contains("broker down"));
        assert_eq!(broker.fetch(false).await.unwrap().access_token, "tok-1");
        assert_eq!(broker.calls(), 2);
    }
}
