//! # Lectern Library
//!
//! This library exposes the Lectern modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;

// Re-export lectern_core for convenience
pub use lectern_core;
