//! Shared test utilities for the vbsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`dir`]: [`TestDir`] builder for sync trees on disk
//! - [`samples`]: component texts as the host exports them

pub mod dir;
pub mod samples;

pub use dir::TestDir;
