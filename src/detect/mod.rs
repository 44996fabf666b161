//! Curve change oracle: which channels moved between two instants, and the duplicate rule.

/// Change signals, signatures and the duplicate rule.
pub mod signature;
