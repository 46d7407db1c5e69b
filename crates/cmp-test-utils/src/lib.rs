//! Shared test utilities for the cmp-config workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not each
//! grow their own fake host. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`host`]: [`FakeHost`], a host context tests can steer between queries
//! - [`fragments`]: JSON-literal fragment builders and legacy-shaped samples

pub mod fragments;
pub mod host;

pub use fragments::{fragment, legacy_fragment};
pub use host::FakeHost;
