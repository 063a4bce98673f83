//! Page registry and current-page resolution.

use std::collections::HashMap;

use crate::surface::Region;

/// Maps mounted page numbers to their container handles and visibility.
///
/// Page numbers are 1-based. Entries are upserted when a page mounts and
/// never removed here; a handle may go stale after unmount and readers
/// tolerate that.
pub struct PageRegistry<R> {
    pages: HashMap<usize, R>,
    visible: HashMap<usize, f32>,
    current_page: usize,
}

impl<R: Region> PageRegistry<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            visible: HashMap::new(),
            current_page: 1,
        }
    }

    /// Register or replace the container handle for a page.
    pub fn set_page_ref(&mut self, page_number: usize, region: R) {
        self.pages.insert(page_number, region);
    }

    /// Update a page's visibility ratio and synchronously re-derive the
    /// current page: the smallest page number with a nonzero ratio. When no
    /// page reports visible the previous current page is kept, so fast
    /// scrolls never flash an undefined page.
    pub fn set_page_visible(&mut self, page_number: usize, ratio: f32) {
        self.visible.insert(page_number, ratio);
        if let Some(page) = self.min_visible_page() {
            self.current_page = page;
        }
    }

    fn min_visible_page(&self) -> Option<usize> {
        self.visible
            .iter()
            .filter(|(_, ratio)| **ratio > 0.0)
            .map(|(page, _)| *page)
            .min()
    }

    /// The page the user is currently looking at.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn region(&self, page_number: usize) -> Option<&R> {
        self.pages.get(&page_number)
    }

    /// Number of registered pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn visibility(&self, page_number: usize) -> f32 {
        self.visible.get(&page_number).copied().unwrap_or(0.0)
    }
}

impl<R: Region> Default for PageRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    struct TestRegion;

    impl Region for TestRegion {
        fn bounds(&self) -> Rect {
            Rect::default()
        }

        fn is_attached(&self) -> bool {
            true
        }
    }

    fn test_registry() -> PageRegistry<TestRegion> {
        PageRegistry::new()
    }

    #[test]
    fn earliest_visible_page_wins() {
        let mut registry = test_registry();

        registry.set_page_visible(3, 1.0);
        assert_eq!(registry.current_page(), 3);

        registry.set_page_visible(2, 1.0);
        assert_eq!(registry.current_page(), 2);

        // A later page becoming visible does not displace an earlier one.
        registry.set_page_visible(7, 1.0);
        assert_eq!(registry.current_page(), 2);
    }

    #[test]
    fn current_page_sticks_when_visible_set_empties() {
        let mut registry = test_registry();

        registry.set_page_visible(4, 1.0);
        assert_eq!(registry.current_page(), 4);

        registry.set_page_visible(4, 0.0);
        assert_eq!(registry.current_page(), 4);
    }

    #[test]
    fn zero_ratio_pages_are_ignored_by_the_resolver() {
        let mut registry = test_registry();

        registry.set_page_visible(1, 0.0);
        registry.set_page_visible(5, 1.0);
        assert_eq!(registry.current_page(), 5);
    }

    #[test]
    fn page_refs_upsert_idempotently() {
        let mut registry = test_registry();

        registry.set_page_ref(1, TestRegion);
        registry.set_page_ref(1, TestRegion);
        registry.set_page_ref(2, TestRegion);

        assert_eq!(registry.page_count(), 2);
        assert!(registry.region(1).is_some());
        assert!(registry.region(9).is_none());
    }
}
