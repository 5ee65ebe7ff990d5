//! Authentication - delegated OAuth credentials from a Nango connection
//!
//! This module provides:
//! - BrokerConfig loaded from the environment
//! - CredentialBroker trait and the NangoBroker implementation
//! - TokenProvider, the only owner of the cached credential
//! - MockBroker for tests and dry runs

pub mod broker;
pub mod credential;
pub mod mock;
pub mod provider;

pub use broker::{BrokerConfig, BrokerToken, CredentialBroker, NangoBroker};
pub use credential::{Credential, CredentialInfo};
pub use mock::MockBroker;
pub use provider::TokenProvider;
