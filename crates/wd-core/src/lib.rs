//! # wd-core
//!
//! Core definitions shared by every crate in workday-rs: the error taxonomy
//! and the replaceable snapshot handle that backs the active calendar.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// Replaceable snapshot reference (`SnapshotHandle<T>`).
pub mod handle;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use handle::{SnapshotHandle, Swap};
