use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use orderdash::auth::{Session, SessionHub};
use orderdash::page::{ElementId, PageState};
use orderdash::render::protocol::{FetchKind, FetchOutcome, FetchResponse, SessionDisposition};
use orderdash::render::{DashboardRenderer, LOGIN_WARNING};
use orderdash::store::{DataStore, DbPath, MemoryStore};
use orderdash::Application;
use serde_json::json;

const TIMEOUT_MS: u64 = 200;

async fn next_response(rx: &mut mpsc::UnboundedReceiver<FetchResponse>) -> FetchResponse {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("fetch response timed out")
        .expect("response channel closed unexpectedly")
}

fn path(raw: &str) -> DbPath {
    DbPath::parse(raw).unwrap()
}

fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_value(json!({
        "users": {"u1": {"name": "Asha"}, "u2": {"name": "Ravi"}},
        "orders": {
            "u1": {
                "latest": {
                    "items": {"a": {"name": "Pen", "quantity": 2}},
                    "total": 50,
                    "timestamp": "2024-01-01"
                },
                "history": {
                    "h1": {"total": 100, "timestamp": "2023-12-01"},
                    "h2": {"total": 200, "timestamp": "2023-12-15"}
                }
            }
        }
    })))
}

async fn render_for(
    store: Arc<MemoryStore>,
    page: PageState,
    session: Option<Session>,
) -> (Application<PageState>, Arc<SessionHub>) {
    let hub = Arc::new(match session {
        Some(session) => SessionHub::with_session(session),
        None => SessionHub::new(),
    });
    let mut app = Application::new(hub.clone(), store, page, "/");
    app.run_until_idle().await.unwrap();
    (app, hub)
}

#[tokio::test]
async fn profile_name_is_written() {
    let (app, _hub) = render_for(seeded_store(), PageState::new(), Some(Session::new("u1"))).await;
    assert_eq!(app.page().text(ElementId::UserName), Some("Asha"));
}

#[tokio::test]
async fn latest_order_fills_cart_and_summary() {
    let (app, _hub) = render_for(seeded_store(), PageState::new(), Some(Session::new("u1"))).await;
    assert_eq!(app.page().items(ElementId::CartItems), ["Pen x 2"]);
    assert_eq!(
        app.page().text(ElementId::LatestOrder),
        Some("Total ₹50 placed on 2024-01-01")
    );
}

#[tokio::test]
async fn history_keeps_insertion_order() {
    let (app, _hub) = render_for(seeded_store(), PageState::new(), Some(Session::new("u1"))).await;
    assert_eq!(
        app.page().items(ElementId::PastOrders),
        ["₹100 on 2023-12-01", "₹200 on 2023-12-15"]
    );
}

#[tokio::test]
async fn missing_latest_order_leaves_regions_untouched() {
    let page = PageState::new()
        .with_text(ElementId::LatestOrder, "No orders yet")
        .with_items(ElementId::CartItems, &["placeholder"]);

    // u2 has a profile but no orders.
    let (app, _hub) = render_for(seeded_store(), page, Some(Session::new("u2"))).await;

    let page = app.page();
    assert_eq!(page.text(ElementId::UserName), Some("Ravi"));
    assert_eq!(page.text(ElementId::LatestOrder), Some("No orders yet"));
    assert_eq!(page.items(ElementId::CartItems), ["placeholder"]);
    assert_eq!(page.write_count(ElementId::LatestOrder), 0);
    assert_eq!(page.write_count(ElementId::CartItems), 0);
    assert!(page.alerts().is_empty());
}

#[tokio::test]
async fn absent_session_alerts_once_and_fetches_nothing() {
    let store = seeded_store();
    let (app, _hub) = render_for(store.clone(), PageState::new(), None).await;

    let page = app.page();
    assert_eq!(page.alerts(), [LOGIN_WARNING]);
    assert_eq!(page.location(), Some("/"));
    for id in ElementId::ALL {
        assert_eq!(page.write_count(id), 0, "{id} was touched");
    }
    assert_eq!(store.read_count(), 0);
}

#[tokio::test]
async fn present_session_reads_exactly_three_keys_even_when_they_fail() {
    let store = seeded_store();
    store.fail(&path("users/u1"), "Permission denied");
    store.fail(&path("orders/u1/history"), "Permission denied");

    let (app, _hub) = render_for(store.clone(), PageState::new(), Some(Session::new("u1"))).await;

    let mut reads: Vec<String> = store.reads().iter().map(|p| p.to_string()).collect();
    reads.sort();
    assert_eq!(
        reads,
        vec!["orders/u1/history", "orders/u1/latest", "users/u1"]
    );

    let page = app.page();
    assert!(page.unavailable_reason(ElementId::UserName).is_some());
    assert!(page.unavailable_reason(ElementId::PastOrders).is_some());
    assert_eq!(page.items(ElementId::CartItems), ["Pen x 2"]);
    assert_eq!(page.unavailable_reason(ElementId::LatestOrder), None);
}

#[tokio::test]
async fn repeated_session_rewrites_cart_without_duplicates() {
    let store = seeded_store();
    let (mut app, hub) = render_for(store.clone(), PageState::new(), Some(Session::new("u1"))).await;

    hub.publish(Some(Session::new("u1")));
    app.run_until_idle().await.unwrap();

    assert_eq!(app.page().items(ElementId::CartItems), ["Pen x 2"]);
    assert_eq!(app.page().items(ElementId::PastOrders).len(), 2);
    assert_eq!(store.read_count(), 6);
}

#[tokio::test]
async fn superseded_session_never_reaches_the_page() {
    let store = seeded_store();
    store.delay(&path("users/u1"), Duration::from_millis(100));

    let hub = Arc::new(SessionHub::with_session(Session::new("u1")));
    let mut app = Application::new(hub.clone(), store.clone(), PageState::new(), "/");
    // Switch users before the first pass has been processed.
    hub.publish(Some(Session::new("u2")));
    app.run_until_idle().await.unwrap();

    // Give any leftover task of the first pass time to finish.
    tokio::time::sleep(Duration::from_millis(150)).await;

    let page = app.page();
    assert_eq!(page.text(ElementId::UserName), Some("Ravi"));
    assert!(page.items(ElementId::CartItems).is_empty());
    assert_eq!(app.renderer().current_generation(), None);
}

#[tokio::test]
async fn slow_fetch_does_not_hold_back_the_others() {
    let store = seeded_store();
    store.delay(&path("orders/u1/history"), Duration::from_millis(500));
    let store: Arc<dyn DataStore> = store;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut renderer = DashboardRenderer::new(store, PageState::new(), "/", tx);
    let disposition = renderer.on_session_change(Some(Session::new("u1"))).unwrap();
    assert_eq!(disposition, SessionDisposition::Rendering(1));

    let mut kinds = Vec::new();
    for _ in 0..2 {
        let response = next_response(&mut rx).await;
        if let FetchOutcome::Failed(reason) = &response.outcome {
            panic!("unexpected failure: {reason}");
        }
        kinds.push(response.kind);
        assert!(renderer.handle_response(response).unwrap());
    }
    kinds.sort();
    assert_eq!(kinds, vec![FetchKind::Profile, FetchKind::LatestOrder]);

    assert_eq!(renderer.page().text(ElementId::UserName), Some("Asha"));
    assert_eq!(renderer.page().items(ElementId::CartItems), ["Pen x 2"]);
    assert!(!renderer.is_idle(), "history is still pending");
}

#[tokio::test]
async fn sign_out_cancels_inflight_pass() {
    let store = seeded_store();
    store.delay(&path("users/u1"), Duration::from_millis(100));
    store.delay(&path("orders/u1/latest"), Duration::from_millis(100));
    store.delay(&path("orders/u1/history"), Duration::from_millis(100));
    let store: Arc<dyn DataStore> = store;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut renderer = DashboardRenderer::new(store, PageState::new(), "/", tx);
    renderer.on_session_change(Some(Session::new("u1"))).unwrap();
    assert_eq!(
        renderer.on_session_change(None).unwrap(),
        SessionDisposition::Redirected
    );

    let late = timeout(Duration::from_millis(TIMEOUT_MS), rx.recv()).await;
    assert!(late.is_err(), "cancelled fetches must not report");
    assert_eq!(renderer.page().alerts(), [LOGIN_WARNING]);
    assert_eq!(renderer.page().write_count(ElementId::UserName), 0);
}
