//! CLI command implementations
//!
//! Wiring of the core flow to real collaborators, and status output.

pub mod auth;
pub mod output;
