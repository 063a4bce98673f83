//! Embedder-implemented surface handles.
//!
//! The engine never talks to a UI toolkit directly. Everything it needs
//! from the presentation layer is expressed as a capability trait over an
//! opaque handle: bounding-box queries, scroll control, scale application,
//! and a paint target for rendered frames.

use crate::geometry::{Point, Rect, Size};

/// A rendered page frame in device pixels.
///
/// The pixel payload is produced by the decoding collaborator and handed to
/// a [`PaintTarget`] untouched; its layout is a contract between the two.
#[derive(Clone)]
pub struct Frame {
    /// Raw pixel data, layout defined by the decoding collaborator.
    pub pixels: Vec<u8>,
    /// Frame width in device pixels.
    pub width_px: u32,
    /// Frame height in device pixels.
    pub height_px: u32,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("pixel_bytes", &self.pixels.len())
            .finish_non_exhaustive()
    }
}

/// The scrollable container hosting the document.
pub trait ScrollHost {
    /// Container bounding box in screen coordinates.
    fn bounds(&self) -> Rect;

    /// Current scroll offsets.
    fn scroll_offset(&self) -> Point;

    /// Jump the scroll position without animation.
    fn set_scroll_offset(&mut self, offset: Point);

    /// Scroll to `target`, animated when `smooth` is set.
    fn scroll_to(&mut self, target: Point, smooth: bool);
}

/// The transformable content element and its sizing wrapper.
pub trait ContentHost {
    /// Apply a uniform scale transform to the content.
    fn set_scale(&mut self, scale: f32);

    /// Content bounding box in screen coordinates, after any transform.
    fn bounds(&self) -> Rect;

    /// Resize the wrapper so scrollable extents match the scaled content.
    fn resize_wrapper(&mut self, size: Size);

    /// Toggle suppression of native OS pinch gestures on the surface, so
    /// the platform does not apply its own zoom on top of the engine's.
    fn set_native_gesture_suppression(&mut self, suppress: bool);
}

/// An addressable 2D drawable the render scheduler sizes and paints into.
pub trait PaintTarget {
    /// Resize the backing pixel buffer.
    fn set_device_size(&mut self, size: Size);

    /// Resize the on-screen (CSS) box independently of the buffer.
    fn set_css_size(&mut self, size: Size);

    /// Display a rendered frame.
    fn present(&mut self, frame: Frame);

    /// Target bounding box in screen coordinates.
    fn bounds(&self) -> Rect;

    /// Whether the target is still mounted in the presentation tree.
    fn is_attached(&self) -> bool;
}

/// A mounted page container as stored in the page registry. Entries may go
/// stale after unmount; readers check [`is_attached`](Self::is_attached).
pub trait Region {
    /// Region bounding box in screen coordinates.
    fn bounds(&self) -> Rect;

    /// Whether the region is still mounted.
    fn is_attached(&self) -> bool;
}
