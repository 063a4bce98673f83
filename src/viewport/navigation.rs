//! Scroll targeting for page navigation.

use crate::geometry::{Point, Rect};

/// Scroll offset that brings `page` to the viewport origin.
///
/// Both rectangles are in screen coordinates, so their delta is relative to
/// the current scroll position; adding it to the current offset lands on
/// the page. Rounded up to whole pixels to avoid sub-pixel seams.
#[must_use]
pub fn scroll_target(viewport: Rect, page: Rect, scroll_offset: Point) -> Point {
    Point::new(
        (scroll_offset.x + page.left - viewport.left).ceil(),
        (scroll_offset.y + page.top - viewport.top).ceil(),
    )
}
