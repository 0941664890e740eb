//! Common types for the zest compiler.
//!
//! This crate provides the pieces every other zest crate agrees on:
//! - The error taxonomy (`TransformError`) with 1-based source locations
//! - Offset <-> line/column conversion (`LineMap`, `Location`)
//! - Transform configuration (`TransformOptions`, `Transform`, `JsxRuntime`)

// Error taxonomy shared by the scanner and the emitter
pub mod errors;
pub use errors::{Result, TransformError};

// Line/column bookkeeping
pub mod position;
pub use position::{LineMap, Location, count_newlines};

// Transform configuration
pub mod options;
pub use options::{Dialect, JsxRuntime, SourceMapOptions, Transform, TransformOptions};
