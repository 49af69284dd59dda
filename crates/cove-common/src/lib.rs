//! Common utilities and data structures for Cove.
//!
//! This crate provides the foundational types used across the Cove
//! front end, chiefly `Span` for source code location tracking.

mod span;

pub use span::{BytePos, Span};
