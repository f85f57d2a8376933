//! # Smilefjes Common Library
//!
//! Shared code for the smilefjes data-preparation tools:
//! - Error and result types
//! - TOML configuration file model and discovery
//! - Tracing subscriber initialisation
//! - Atomic JSON file writes

pub mod config;
pub mod error;
pub mod fs;
pub mod logging;

pub use error::{Error, Result};
