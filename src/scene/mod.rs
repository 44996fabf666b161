//! JSON scene model and the animation-source view the change oracle reads.

/// Scene, objects, materials and channels.
pub mod model;
/// [`AnimationSource`](source::AnimationSource) and entity flattening.
pub mod source;
