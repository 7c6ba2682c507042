//! Core module - selection policy, classification and error types
//!
//! This module provides:
//! - The extension registry (tag -> suffix mapping)
//! - The immutable per-run selection policy
//! - Path and content classifiers
//! - The pipeline error type

pub mod classify;
pub mod content;
pub mod error;
pub mod policy;
pub mod registry;
