//! Diagnostics for semantic analysis.
//!
//! This module defines the error types reported by the analyzer. It
//! includes:
//!
//! - The taxonomy of semantic error kinds
//! - Positioned diagnostics with source provenance
//! - The process-wide accumulator shared by all stages of one run
//! - Rendering in the `<filename>:<line>: <message>` line format

pub mod errors;
