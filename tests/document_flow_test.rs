//! Document lifecycle: load, progress, readiness gating, outline.

use pagescope::doc::{
    AccessFault, DocumentHandle, DocumentSession, LoadPhase, LoadProgress, OutlineNode,
    OutlineTarget,
};
use pagescope::doc::{DestinationResolver, OutlineSession, PageSession};
use pagescope::fixtures::{
    FakeContentHost, FakeDocument, FakeDocumentService, FakeRegion, FakeScrollHost,
};
use pagescope::geometry::Rect;
use pagescope::viewport::{GoToOptions, ViewportEngine, ViewportOptions};
use pagescope::{PinchUpdate, TaskFault};

#[test]
fn document_becomes_ready_with_deduped_progress() {
    let service = FakeDocumentService::default();
    let mut session = DocumentSession::new(service.clone());

    session.open("report.pdf");
    assert_eq!(session.phase(), LoadPhase::Loading);
    assert!(matches!(
        session.document(),
        Err(AccessFault::DocumentNotReady)
    ));

    let open = service.take_open().expect("open issued");
    assert_eq!(open.source, "report.pdf");

    let _ = open.progress.send(LoadProgress {
        loaded: 50,
        total: 100,
    });
    assert!(session.poll());
    assert_eq!(session.progress(), 0.5);

    // The final loaded == total event is deduped; readiness flips it to 1.
    let _ = open.progress.send(LoadProgress {
        loaded: 100,
        total: 100,
    });
    assert!(!session.poll());
    assert_eq!(session.progress(), 0.5);

    open.completer.resolve(FakeDocument::with_page_count(12));
    assert!(session.poll());
    assert_eq!(session.phase(), LoadPhase::Ready);
    assert_eq!(session.progress(), 1.0);
    assert_eq!(session.document().expect("ready").page_count(), 12);
}

#[test]
fn reopening_supersedes_the_previous_load() {
    let service = FakeDocumentService::default();
    let mut session = DocumentSession::new(service.clone());

    session.open("first.pdf");
    let first = service.take_open().expect("first open");
    let first_generation = session.generation();

    session.open("second.pdf");
    let second = service.take_open().expect("second open");
    assert_ne!(session.generation(), first_generation);

    // The stale load settles after being superseded; it is never observed.
    first.completer.resolve(FakeDocument::with_page_count(1));
    assert!(!session.poll());
    assert_eq!(session.phase(), LoadPhase::Loading);

    second.completer.resolve(FakeDocument::with_page_count(2));
    assert!(session.poll());
    assert_eq!(session.document().expect("ready").page_count(), 2);
}

#[test]
fn failed_load_is_terminal_until_reopened() {
    let service = FakeDocumentService::default();
    let mut session = DocumentSession::new(service.clone());

    session.open("corrupt.pdf");
    let open = service.take_open().expect("open issued");
    open.completer.reject(TaskFault::failed("bad xref table"));

    assert!(session.poll());
    assert_eq!(session.phase(), LoadPhase::Failed);
    assert!(session.document().is_err());

    session.open("corrupt.pdf");
    assert_eq!(session.phase(), LoadPhase::Loading);
}

#[test]
fn page_session_loads_and_follows_the_document_generation() {
    let doc = FakeDocument::with_page_count(3);
    let mut session = PageSession::new(2);

    assert!(matches!(session.page(), Err(AccessFault::PageNotReady)));

    session.sync(&doc, 1);
    // Sync with the same generation must not issue a second load.
    session.sync(&doc, 1);
    let (page_number, completer) = doc.take_page_load().expect("one load issued");
    assert_eq!(page_number, 2);
    assert!(doc.take_page_load().is_none());

    completer.resolve(pagescope::fixtures::FakePage::new(
        pagescope::geometry::Size::new(600.0, 800.0),
    ));
    assert!(session.poll());
    assert!(session.is_ready());

    // A reloaded document invalidates the page.
    session.sync(&doc, 2);
    assert!(!session.is_ready());
    assert!(doc.take_page_load().is_some());
}

#[test]
fn stale_page_load_is_never_observed() {
    let doc = FakeDocument::with_page_count(3);
    let mut session = PageSession::new(1);

    session.sync(&doc, 1);
    let (_page_number, stale) = doc.take_page_load().expect("stale load");

    session.sync(&doc, 2);
    let (_page_number, fresh) = doc.take_page_load().expect("fresh load");

    stale.resolve(pagescope::fixtures::FakePage::new(
        pagescope::geometry::Size::new(100.0, 100.0),
    ));
    assert!(!session.poll());
    assert!(!session.is_ready());

    fresh.resolve(pagescope::fixtures::FakePage::new(
        pagescope::geometry::Size::new(600.0, 800.0),
    ));
    assert!(session.poll());
    assert!(session.is_ready());
}

#[test]
fn failed_page_load_waits_for_a_new_generation() {
    let doc = FakeDocument::with_page_count(3);
    let mut session = PageSession::new(1);

    session.sync(&doc, 1);
    let (_page_number, completer) = doc.take_page_load().expect("load issued");
    completer.reject(TaskFault::failed("missing page object"));
    assert!(!session.poll());

    // Same generation: no retry loop.
    session.sync(&doc, 1);
    assert!(doc.take_page_load().is_none());

    // A reloaded document retries.
    session.sync(&doc, 2);
    assert!(doc.take_page_load().is_some());
}

#[test]
fn outline_loads_and_failure_leaves_it_empty() {
    let doc = FakeDocument::with_page_count(3);
    let mut outline = OutlineSession::new();

    outline.load(&doc);
    let completer = doc.take_outline().expect("outline fetch issued");

    let mut chapter = OutlineNode::new("Chapter 1");
    chapter.target = Some(OutlineTarget::Page(0));
    completer.resolve(vec![chapter]);

    assert!(outline.poll());
    assert!(outline.is_loaded());
    assert_eq!(outline.nodes().len(), 1);
    assert_eq!(outline.nodes()[0].title, "Chapter 1");

    // A reload that fails just leaves the tree empty.
    outline.load(&doc);
    let completer = doc.take_outline().expect("second fetch");
    completer.reject(TaskFault::failed("no outline dictionary"));
    assert!(!outline.poll());
    assert!(outline.nodes().is_empty());
}

#[test]
fn resolved_destination_navigates_the_viewport() {
    let doc = FakeDocument::with_page_count(10);
    let mut resolver = DestinationResolver::new();

    let host = FakeScrollHost::with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
    let content = FakeContentHost::new(&host);
    let mut engine: ViewportEngine<_, _, FakeRegion> =
        ViewportEngine::new(ViewportOptions::default(), content, host.clone());
    engine.set_page_ref(5, FakeRegion::attached(Rect::new(0.0, 3200.0, 600.0, 800.0)));

    resolver.resolve(&doc, &OutlineTarget::Named("chapter-3".to_string()));
    let (target, completer) = doc.take_destination().expect("resolution issued");
    assert_eq!(target, OutlineTarget::Named("chapter-3".to_string()));

    assert!(resolver.poll().is_none(), "not settled yet");
    completer.resolve(4);

    let page_number = resolver.poll().expect("resolved");
    assert_eq!(page_number, 5);
    assert!(engine.go_to_page(page_number, GoToOptions::default()));
    assert_eq!(host.state.borrow().scroll_calls.len(), 1);
}

#[test]
fn gating_is_enforced_before_readiness() {
    // NotReady surfaces as a fault, never a placeholder value, and a
    // gesture mid-flight does not disturb that.
    let service = FakeDocumentService::default();
    let mut session = DocumentSession::new(service.clone());
    session.open("slow.pdf");

    let host = FakeScrollHost::with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
    let content = FakeContentHost::new(&host);
    let mut engine: ViewportEngine<_, _, FakeRegion> =
        ViewportEngine::new(ViewportOptions::default(), content, host);
    engine
        .pinch_update(PinchUpdate {
            origin: pagescope::geometry::Point::new(400.0, 300.0),
            movement: 1.0,
            first: true,
        })
        .expect("gesture starts");

    assert!(session.document().is_err());
    assert!(!session.poll());
}
