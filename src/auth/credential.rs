//! Cached connection credential

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A bearer credential handed out by the broker.
///
/// The token itself never leaves the crate; other components see only
/// [`CredentialInfo`].
#[derive(Clone)]
pub struct Credential {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
    acquired_at: DateTime<Utc>,
    generation: u64,
}

impl Credential {
    pub(crate) fn new(access_token: String, expires_at: Option<DateTime<Utc>>, generation: u64) -> Self {
        Self {
            access_token,
            expires_at,
            acquired_at: Utc::now(),
            generation,
        }
    }

    /// Value for the `Authorization` header
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Monotonic counter bumped on every acquisition
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// True only when the broker gave an expiry and it has passed
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| at <= Utc::now()).unwrap_or(false)
    }

    /// Short SHA-256 prefix identifying the token in logs
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.access_token)
    }

    /// Redacted view suitable for diagnostics output
    pub fn info(&self) -> CredentialInfo {
        CredentialInfo {
            fingerprint: self.fingerprint(),
            generation: self.generation,
            acquired_at: self.acquired_at,
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("fingerprint", &self.fingerprint())
            .field("generation", &self.generation)
            .field("acquired_at", &self.acquired_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Credential metadata without the secret
#[derive(Debug, Clone, Serialize)]
pub struct CredentialInfo {
    pub fingerprint: String,
    pub generation: u64,
    pub acquired_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

pub(crate) fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("super-secret-token".to_string(), None, 1);
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains(&credential.fingerprint()));
    }

    #[test]
    fn test_bearer_header() {
        let credential = Credential::new("abc".to_string(), None, 1);
        assert_eq!(credential.bearer(), "Bearer abc");
    }

    #[test]
    fn test_fingerprint_stable_and_short() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
        assert_eq!(fingerprint("abc").len(), 12);
    }

    #[test]
    fn test_expiry_unknown_never_expires() {
        let credential = Credential::new("abc".to_string(), None, 1);
        assert!(!credential.is_expired());
    }

    #[test]
    fn test_expiry_in_past() {
        let past = Utc::now() - Duration::minutes(5);
        let credential = Credential::new("abc".to_string(), Some(past), 1);
        assert!(credential.is_expired());

        let future = Utc::now() + Duration::minutes(5);
        let credential = Credential::new("abc".to_string(), Some(future), 1);
        assert!(!credential.is_expired());
    }

    #[test]
    fn test_info_serialization_omits_token() {
        let credential = Credential::new("hidden".to_string(), None, 3);
        let json = serde_json::to_string(&credential.info()).unwrap();
        assert!(!json.contains("hidden"));
        assert!(json.contains("\"generation\":3"));
        assert!(!json.contains("expires_at"));
    }
}
