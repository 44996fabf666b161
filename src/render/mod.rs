//! Renderer contract and the bundled preview rasterizer.

use std::path::Path;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::HoldResult;

/// Flat-shaded scene rasterizer writing still images.
pub mod preview;

/// Produces the still image for one frame.
///
/// Implementations are synchronous and must leave a complete file at `output` on success. Any
/// error is fatal to the run; retries are the implementation's own business.
pub trait Renderer<S: ?Sized> {
    /// Render `frame` of `source` to `output`.
    fn render_frame(&mut self, source: &mut S, frame: FrameIndex, output: &Path)
    -> HoldResult<()>;
}

impl<S: ?Sized, R: Renderer<S> + ?Sized> Renderer<S> for &mut R {
    fn render_frame(
        &mut self,
        source: &mut S,
        frame: FrameIndex,
        output: &Path,
    ) -> HoldResult<()> {
        (**self).render_frame(source, frame, output)
    }
}

impl<S: ?Sized, R: Renderer<S> + ?Sized> Renderer<S> for Box<R> {
    fn render_frame(
        &mut self,
        source: &mut S,
        frame: FrameIndex,
        output: &Path,
    ) -> HoldResult<()> {
        (**self).render_frame(source, frame, output)
    }
}
