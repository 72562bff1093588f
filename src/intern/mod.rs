//! Symbol interning for identifier and type names.
//!
//! This module provides the name handles the rest of the analyzer works
//! with. It handles:
//!
//! - Deduplicating repeated name text into stable handles
//! - O(1) handle equality that reflects textual identity
//! - Resolving a handle back to its display text

pub mod intern;
