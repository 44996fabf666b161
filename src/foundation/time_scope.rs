use std::ops::{Deref, DerefMut};

use crate::foundation::core::FrameIndex;

/// A host whose playback position can be read and moved.
pub trait TimeCursor {
    /// Current playback frame.
    fn current_frame(&self) -> FrameIndex;
    /// Move the playback frame.
    fn set_current_frame(&mut self, frame: FrameIndex);
}

/// Moves a [`TimeCursor`] to a frame for the lifetime of the guard.
///
/// The prior frame is restored on drop, which covers early returns, `?` and unwinding.
pub struct ScopedTime<'a, H: TimeCursor + ?Sized> {
    host: &'a mut H,
    restore: FrameIndex,
}

impl<'a, H: TimeCursor + ?Sized> ScopedTime<'a, H> {
    /// Remember the current frame and move `host` to `frame`.
    pub fn enter(host: &'a mut H, frame: FrameIndex) -> Self {
        let restore = host.current_frame();
        host.set_current_frame(frame);
        Self { host, restore }
    }

    /// Frame that will be restored on drop.
    pub fn restores_to(&self) -> FrameIndex {
        self.restore
    }
}

impl<H: TimeCursor + ?Sized> Deref for ScopedTime<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: TimeCursor + ?Sized> DerefMut for ScopedTime<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: TimeCursor + ?Sized> Drop for ScopedTime<'_, H> {
    fn drop(&mut self) {
        self.host.set_current_frame(self.restore);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time_scope.rs"]
mod tests;
