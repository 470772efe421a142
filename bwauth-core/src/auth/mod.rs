//! Authentication module
//!
//! Dialog prompts, keychain storage and the unlock/login flow.

pub mod flow;
pub mod prompt;
pub mod store;

// Use mock keyring in test mode or CI environment
#[cfg(any(test, feature = "mock-keyring"))]
#[path = "keyring_mock.rs"]
pub mod keyring;

// Use real keyring in production
#[cfg(not(any(test, feature = "mock-keyring")))]
pub mod keyring;
