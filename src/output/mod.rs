//! Output side of a run: file sink, frame naming and the duration clock.

/// Monotonic clock abstraction.
pub mod clock;
/// Image formats and frame paths.
pub mod format;
/// File sink trait and the filesystem implementation.
pub mod sink;
