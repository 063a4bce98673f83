//! Scripted fake collaborators for exercising the engine in tests.
//!
//! Every fake records into shared state (`Rc<RefCell<..>>`) so tests keep
//! an inspectable handle after the engine takes ownership, and completes
//! pending tasks only when the test says so.

use std::cell::RefCell;
use std::rc::Rc;

use crate::doc::{
    DocumentHandle, DocumentLoad, DocumentService, LoadProgress, OutlineNode, OutlineTarget,
    PageHandle, RenderSpec,
};
use crate::geometry::{Point, Rect, Size};
use crate::surface::{ContentHost, Frame, PaintTarget, Region, ScrollHost};
use crate::task::{Completer, PendingTask, pending};

/// Recorded scroll-host state.
#[derive(Debug, Default)]
pub struct ScrollState {
    pub bounds: Rect,
    pub scroll_offset: Point,
    pub scroll_calls: Vec<(Point, bool)>,
}

/// Scroll host over shared state.
#[derive(Clone, Default)]
pub struct FakeScrollHost {
    pub state: Rc<RefCell<ScrollState>>,
}

impl FakeScrollHost {
    #[must_use]
    pub fn with_bounds(bounds: Rect) -> Self {
        let host = Self::default();
        host.state.borrow_mut().bounds = bounds;
        host
    }
}

impl ScrollHost for FakeScrollHost {
    fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn scroll_offset(&self) -> Point {
        self.state.borrow().scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: Point) {
        self.state.borrow_mut().scroll_offset = offset;
    }

    fn scroll_to(&mut self, target: Point, smooth: bool) {
        let mut state = self.state.borrow_mut();
        state.scroll_offset = target;
        state.scroll_calls.push((target, smooth));
    }
}

/// Recorded content-host state.
#[derive(Debug)]
pub struct ContentState {
    pub base_size: Size,
    pub scale: f32,
    pub wrapper_size: Size,
    pub gestures_suppressed: bool,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            base_size: Size::new(600.0, 2400.0),
            scale: 1.0,
            wrapper_size: Size::default(),
            gestures_suppressed: false,
        }
    }
}

/// Content host emulating layout: the content sits at the container's
/// scroll origin, so its screen position is the container corner minus the
/// scroll offset, and its size is `base_size x scale`.
#[derive(Clone)]
pub struct FakeContentHost {
    pub state: Rc<RefCell<ContentState>>,
    scroll: Rc<RefCell<ScrollState>>,
}

impl FakeContentHost {
    #[must_use]
    pub fn new(scroll_host: &FakeScrollHost) -> Self {
        Self {
            state: Rc::default(),
            scroll: scroll_host.state.clone(),
        }
    }

    #[must_use]
    pub fn with_base_size(scroll_host: &FakeScrollHost, base_size: Size) -> Self {
        let content = Self::new(scroll_host);
        content.state.borrow_mut().base_size = base_size;
        content
    }
}

impl ContentHost for FakeContentHost {
    fn set_scale(&mut self, scale: f32) {
        self.state.borrow_mut().scale = scale;
    }

    fn bounds(&self) -> Rect {
        let state = self.state.borrow();
        let scroll = self.scroll.borrow();
        Rect::new(
            scroll.bounds.left - scroll.scroll_offset.x,
            scroll.bounds.top - scroll.scroll_offset.y,
            state.base_size.width * state.scale,
            state.base_size.height * state.scale,
        )
    }

    fn resize_wrapper(&mut self, size: Size) {
        self.state.borrow_mut().wrapper_size = size;
    }

    fn set_native_gesture_suppression(&mut self, suppress: bool) {
        self.state.borrow_mut().gestures_suppressed = suppress;
    }
}

/// Recorded region state.
#[derive(Debug, Default)]
pub struct RegionState {
    pub bounds: Rect,
    pub attached: bool,
}

/// Page-container region over shared state.
#[derive(Clone, Default)]
pub struct FakeRegion {
    pub state: Rc<RefCell<RegionState>>,
}

impl FakeRegion {
    #[must_use]
    pub fn attached(bounds: Rect) -> Self {
        let region = Self::default();
        {
            let mut state = region.state.borrow_mut();
            state.bounds = bounds;
            state.attached = true;
        }
        region
    }
}

impl Region for FakeRegion {
    fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }
}

/// Recorded paint-target state.
#[derive(Debug)]
pub struct PaintState {
    pub device_size: Size,
    pub css_size: Size,
    pub presented: Vec<Frame>,
    pub bounds: Rect,
    pub attached: bool,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            device_size: Size::default(),
            css_size: Size::default(),
            presented: Vec::new(),
            bounds: Rect::default(),
            attached: true,
        }
    }
}

/// Paint target over shared state.
#[derive(Clone, Default)]
pub struct FakePaintTarget {
    pub state: Rc<RefCell<PaintState>>,
}

impl PaintTarget for FakePaintTarget {
    fn set_device_size(&mut self, size: Size) {
        self.state.borrow_mut().device_size = size;
    }

    fn set_css_size(&mut self, size: Size) {
        self.state.borrow_mut().css_size = size;
    }

    fn present(&mut self, frame: Frame) {
        self.state.borrow_mut().presented.push(frame);
    }

    fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }
}

/// A stand-in frame payload for `width_px x height_px` device pixels.
#[must_use]
pub fn test_frame(width_px: u32, height_px: u32) -> Frame {
    Frame {
        pixels: vec![0; (width_px * height_px * 3) as usize],
        width_px,
        height_px,
    }
}

/// Open requests captured by [`FakeDocumentService`], settled by the test.
#[derive(Default)]
pub struct OpenRequests {
    pub requests: Vec<OpenRequest>,
}

pub struct OpenRequest {
    pub source: String,
    pub completer: Completer<FakeDocument>,
    pub progress: flume::Sender<LoadProgress>,
}

/// Document service whose opens settle only when the test settles them.
#[derive(Clone, Default)]
pub struct FakeDocumentService {
    pub opens: Rc<RefCell<OpenRequests>>,
}

impl FakeDocumentService {
    /// Pop the oldest outstanding open request.
    pub fn take_open(&self) -> Option<OpenRequest> {
        let mut opens = self.opens.borrow_mut();
        if opens.requests.is_empty() {
            None
        } else {
            Some(opens.requests.remove(0))
        }
    }
}

impl DocumentService for FakeDocumentService {
    type Doc = FakeDocument;

    fn open(&self, source: &str) -> DocumentLoad<FakeDocument> {
        let (completer, task) = pending();
        let (progress_tx, progress) = flume::unbounded();
        self.opens.borrow_mut().requests.push(OpenRequest {
            source: source.to_string(),
            completer,
            progress: progress_tx,
        });
        DocumentLoad { task, progress }
    }
}

/// Requests captured by a [`FakeDocument`].
#[derive(Default)]
pub struct DocRequests {
    pub page_count: usize,
    pub page_loads: Vec<(usize, Completer<FakePage>)>,
    pub outlines: Vec<Completer<Vec<OutlineNode>>>,
    pub destinations: Vec<(OutlineTarget, Completer<usize>)>,
}

/// Fake loaded document with scripted page loads.
#[derive(Clone, Default)]
pub struct FakeDocument {
    pub requests: Rc<RefCell<DocRequests>>,
}

impl FakeDocument {
    #[must_use]
    pub fn with_page_count(page_count: usize) -> Self {
        let doc = Self::default();
        doc.requests.borrow_mut().page_count = page_count;
        doc
    }

    /// Pop the oldest outstanding page-load request.
    pub fn take_page_load(&self) -> Option<(usize, Completer<FakePage>)> {
        let mut requests = self.requests.borrow_mut();
        if requests.page_loads.is_empty() {
            None
        } else {
            Some(requests.page_loads.remove(0))
        }
    }

    /// Pop the oldest outstanding outline request.
    pub fn take_outline(&self) -> Option<Completer<Vec<OutlineNode>>> {
        let mut requests = self.requests.borrow_mut();
        if requests.outlines.is_empty() {
            None
        } else {
            Some(requests.outlines.remove(0))
        }
    }

    /// Pop the oldest outstanding destination resolution.
    pub fn take_destination(&self) -> Option<(OutlineTarget, Completer<usize>)> {
        let mut requests = self.requests.borrow_mut();
        if requests.destinations.is_empty() {
            None
        } else {
            Some(requests.destinations.remove(0))
        }
    }
}

impl DocumentHandle for FakeDocument {
    type Page = FakePage;

    fn page_count(&self) -> usize {
        self.requests.borrow().page_count
    }

    fn load_page(&self, page_number: usize) -> PendingTask<FakePage> {
        let (completer, task) = pending();
        self.requests
            .borrow_mut()
            .page_loads
            .push((page_number, completer));
        task
    }

    fn outline(&self) -> PendingTask<Vec<OutlineNode>> {
        let (completer, task) = pending();
        self.requests.borrow_mut().outlines.push(completer);
        task
    }

    fn destination_page(&self, target: &OutlineTarget) -> PendingTask<usize> {
        let (completer, task) = pending();
        self.requests
            .borrow_mut()
            .destinations
            .push((target.clone(), completer));
        task
    }
}

/// Fake page with scripted renders.
#[derive(Clone)]
pub struct FakePage {
    pub base_size: Size,
    pub renders: Rc<RefCell<Vec<(RenderSpec, Completer<Frame>)>>>,
}

impl FakePage {
    #[must_use]
    pub fn new(base_size: Size) -> Self {
        Self {
            base_size,
            renders: Rc::default(),
        }
    }

    /// Pop the oldest outstanding render request.
    pub fn take_render(&self) -> Option<(RenderSpec, Completer<Frame>)> {
        let mut renders = self.renders.borrow_mut();
        if renders.is_empty() {
            None
        } else {
            Some(renders.remove(0))
        }
    }

    #[must_use]
    pub fn pending_renders(&self) -> usize {
        self.renders.borrow().len()
    }
}

impl PageHandle for FakePage {
    fn base_size(&self) -> Size {
        self.base_size
    }

    fn render(&self, spec: RenderSpec) -> PendingTask<Frame> {
        let (completer, task) = pending();
        self.renders.borrow_mut().push((spec, completer));
        task
    }
}
