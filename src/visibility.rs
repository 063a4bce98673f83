//! Region visibility tracking.

use crate::geometry::Rect;

/// Observes whether a region intersects its scrolling ancestor.
///
/// Reports not-visible until the first observation fires, so nothing
/// renders at full fidelity before geometry is known. The ratio is 0 or 1
/// today; the type leaves room for a continuous ratio.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    ratio: f32,
    observed: bool,
    disposed: bool,
}

impl VisibilityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate the intersection of `region` against `host`. Emits the
    /// new ratio when it changed (including the first observation), `None`
    /// otherwise. Disposed trackers never emit.
    pub fn observe(&mut self, region: Rect, host: Rect) -> Option<f32> {
        if self.disposed {
            return None;
        }
        let ratio = if region.intersects(&host) { 1.0 } else { 0.0 };
        let changed = !self.observed || (ratio - self.ratio).abs() > f32::EPSILON;
        self.observed = true;
        self.ratio = ratio;
        changed.then_some(ratio)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.ratio > 0.0
    }

    #[must_use]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Stop emitting; later observations are inert.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
