//! Shared primitives: frame/time types, errors, and the scoped playback-time guard.

/// Frame indices, inclusive ranges, fps and canvas.
pub mod core;
/// Crate error type.
pub mod error;
/// Scoped acquisition of a host's playback cursor.
pub mod time_scope;
