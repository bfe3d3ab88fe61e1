//! Application dispatch seam.

use crate::frame::Frame;

/// Receives each frame drained from the delivery queue.
///
/// Frames are handed over one at a time, in stream order, and each call
/// completes before the next frame is dispatched. Any `FnMut(Frame)`
/// closure is a handler.
pub trait FrameHandler {
    /// Process one frame.
    fn handle(&mut self, frame: Frame);
}

impl<F> FrameHandler for F
where
    F: FnMut(Frame),
{
    fn handle(&mut self, frame: Frame) { self(frame); }
}
