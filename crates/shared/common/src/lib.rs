//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified application error type (with optional HTTP mapping)
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{format_validation_errors, AppError, AppResult, OptionExt};
