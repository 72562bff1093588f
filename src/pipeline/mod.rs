//! Pipeline driver for semantic analysis.
//!
//! This module sequences the whole pass over one program:
//!
//! - Stage 1: install classes (built-ins first), link parents, check the
//!   inheritance graph, build the per-class feature environments
//! - Gate: stage 2 is skipped entirely if stage 1 reported anything
//! - Stage 2: type-check every class body, accumulating diagnostics
//!
//! Success is a diagnostic count of zero after whichever stages ran.

pub mod pipeline;
