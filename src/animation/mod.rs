//! Keyframed scalar curves.

/// Curves, keys and extrapolation.
pub mod curve;
/// Segment shapes and easing.
pub mod ease;
