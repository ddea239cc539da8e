//! Render coordination.
//!
//! `DashboardRenderer` is the state machine between session notifications, fetch
//! tasks and the page. It starts a render pass per signed-in notification, tags it
//! with a fresh generation, and applies each fetch response as it arrives as long
//! as nothing newer has superseded it.

use crate::auth::Session;
use crate::error::Result;
use crate::page::{ElementId, Page};
use crate::render::fetch::spawn_fetch;
use crate::render::format::{cart_item_line, history_line, latest_order_summary};
use crate::render::protocol::{
    FetchKind, FetchOutcome, FetchResponse, RegionData, RenderGeneration, SessionDisposition,
};
use crate::store::DataStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Warning shown when the dashboard is opened without a signed-in user.
pub const LOGIN_WARNING: &str = "⚠️ Please log in to access your dashboard.";

/// Where the renderer is between notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    AwaitingSession,
    Rendering {
        generation: RenderGeneration,
        pending: BTreeSet<FetchKind>,
    },
}

pub struct DashboardRenderer<P: Page> {
    store: Arc<dyn DataStore>,
    page: P,
    root_path: String,
    response_tx: UnboundedSender<FetchResponse>,
    state: RenderState,
    next_generation: RenderGeneration,
    cancel: Option<CancellationToken>,
}

impl<P: Page> DashboardRenderer<P> {
    pub fn new(
        store: Arc<dyn DataStore>,
        page: P,
        root_path: impl Into<String>,
        response_tx: UnboundedSender<FetchResponse>,
    ) -> Self {
        Self {
            store,
            page,
            root_path: root_path.into(),
            response_tx,
            state: RenderState::AwaitingSession,
            next_generation: 1,
            cancel: None,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RenderState::AwaitingSession
    }

    /// Generation of the pass currently in flight.
    pub fn current_generation(&self) -> Option<RenderGeneration> {
        match &self.state {
            RenderState::Rendering { generation, .. } => Some(*generation),
            RenderState::AwaitingSession => None,
        }
    }

    /// React to a session notification.
    ///
    /// Any pass still in flight is cancelled first, whatever the new state is.
    pub fn on_session_change(&mut self, session: Option<Session>) -> Result<SessionDisposition> {
        self.cancel_inflight();

        let Some(session) = session else {
            log::info!("no signed-in user, redirecting to {}", self.root_path);
            self.page.alert(LOGIN_WARNING)?;
            self.page.navigate(&self.root_path)?;
            return Ok(SessionDisposition::Redirected);
        };

        let generation = self.next_generation;
        self.next_generation += 1;
        let cancel = CancellationToken::new();

        log::info!("render pass {generation} for user {}", session.user_id());
        for kind in FetchKind::ALL {
            spawn_fetch(
                Arc::clone(&self.store),
                kind,
                session.clone(),
                generation,
                cancel.child_token(),
                self.response_tx.clone(),
            );
        }

        self.cancel = Some(cancel);
        self.state = RenderState::Rendering {
            generation,
            pending: FetchKind::ALL.into_iter().collect(),
        };
        Ok(SessionDisposition::Rendering(generation))
    }

    /// Apply a fetch response. Returns false when it belonged to a superseded
    /// pass (or repeated a region already applied) and was dropped.
    pub fn handle_response(&mut self, response: FetchResponse) -> Result<bool> {
        let finished = match &mut self.state {
            RenderState::Rendering {
                generation,
                pending,
            } if *generation == response.generation => {
                if !pending.remove(&response.kind) {
                    log::debug!(
                        "duplicate {:?} response for generation {}",
                        response.kind,
                        response.generation
                    );
                    return Ok(false);
                }
                pending.is_empty()
            }
            _ => {
                log::debug!(
                    "dropping stale {:?} response from generation {}",
                    response.kind,
                    response.generation
                );
                return Ok(false);
            }
        };

        let applied = self.apply(response.kind, response.outcome);

        if finished {
            log::debug!("render pass complete");
            self.cancel = None;
            self.state = RenderState::AwaitingSession;
        }

        applied.map(|_| true)
    }

    fn apply(&mut self, kind: FetchKind, outcome: FetchOutcome<RegionData>) -> Result<()> {
        match outcome {
            FetchOutcome::Found(RegionData::Profile(profile)) => {
                self.page.set_text(ElementId::UserName, &profile.name)?;
            }
            FetchOutcome::Found(RegionData::LatestOrder(order)) => {
                self.page.clear_list(ElementId::CartItems)?;
                for item in &order.items {
                    self.page
                        .append_list_item(ElementId::CartItems, &cart_item_line(item))?;
                }
                self.page
                    .set_text(ElementId::LatestOrder, &latest_order_summary(&order))?;
            }
            FetchOutcome::Found(RegionData::History(history)) => {
                self.page.clear_list(ElementId::PastOrders)?;
                for entry in history.entries() {
                    self.page
                        .append_list_item(ElementId::PastOrders, &history_line(entry))?;
                }
            }
            FetchOutcome::NotFound => {
                log::debug!("no data for {kind:?}");
            }
            FetchOutcome::Failed(reason) => {
                log::warn!("{kind:?} unavailable: {reason}");
                for target in kind.targets() {
                    self.page.mark_unavailable(*target, &reason)?;
                }
            }
        }
        Ok(())
    }

    fn cancel_inflight(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            if let Some(generation) = self.current_generation() {
                log::debug!("cancelling render pass {generation}");
            }
            cancel.cancel();
        }
        self.state = RenderState::AwaitingSession;
    }
}

impl<P: Page> Drop for DashboardRenderer<P> {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Amount, LatestOrder, OrderHistory, OrderHistoryEntry, OrderItem, Timestamp, UserProfile,
    };
    use crate::page::PageState;
    use crate::store::MemoryStore;
    use serde_json::Number;
    use tokio::sync::mpsc;

    fn renderer() -> (
        DashboardRenderer<PageState>,
        mpsc::UnboundedReceiver<FetchResponse>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
        (DashboardRenderer::new(store, PageState::new(), "/", tx), rx)
    }

    fn response(
        generation: RenderGeneration,
        kind: FetchKind,
        outcome: FetchOutcome<RegionData>,
    ) -> FetchResponse {
        FetchResponse {
            generation,
            kind,
            outcome,
        }
    }

    fn profile(name: &str) -> FetchOutcome<RegionData> {
        FetchOutcome::Found(RegionData::Profile(UserProfile {
            name: name.to_string(),
        }))
    }

    #[tokio::test]
    async fn absent_session_alerts_and_redirects() {
        let (mut renderer, _rx) = renderer();
        let disposition = renderer.on_session_change(None).unwrap();

        assert_eq!(disposition, SessionDisposition::Redirected);
        assert_eq!(renderer.page().alerts(), [LOGIN_WARNING]);
        assert_eq!(renderer.page().location(), Some("/"));
        assert_eq!(renderer.page().total_writes(), 0);
        assert!(renderer.is_idle());
    }

    #[tokio::test]
    async fn generations_increase_and_pass_completes() {
        let (mut renderer, _rx) = renderer();
        let first = renderer.on_session_change(Some(Session::new("u1"))).unwrap();
        let second = renderer.on_session_change(Some(Session::new("u1"))).unwrap();
        assert_eq!(first, SessionDisposition::Rendering(1));
        assert_eq!(second, SessionDisposition::Rendering(2));

        assert!(renderer
            .handle_response(response(2, FetchKind::Profile, profile("Asha")))
            .unwrap());
        assert!(renderer
            .handle_response(response(2, FetchKind::LatestOrder, FetchOutcome::NotFound))
            .unwrap());
        assert!(!renderer.is_idle());
        assert!(renderer
            .handle_response(response(2, FetchKind::History, FetchOutcome::NotFound))
            .unwrap());
        assert!(renderer.is_idle());
        assert_eq!(renderer.page().text(ElementId::UserName), Some("Asha"));
    }

    #[tokio::test]
    async fn stale_and_duplicate_responses_are_dropped() {
        let (mut renderer, _rx) = renderer();
        renderer.on_session_change(Some(Session::new("old"))).unwrap();
        renderer.on_session_change(Some(Session::new("new"))).unwrap();

        assert!(!renderer
            .handle_response(response(1, FetchKind::Profile, profile("Stale")))
            .unwrap());
        assert_eq!(renderer.page().text(ElementId::UserName), Some(""));

        assert!(renderer
            .handle_response(response(2, FetchKind::Profile, profile("Fresh")))
            .unwrap());
        assert!(!renderer
            .handle_response(response(2, FetchKind::Profile, profile("Again")))
            .unwrap());
        assert_eq!(renderer.page().text(ElementId::UserName), Some("Fresh"));
    }

    #[tokio::test]
    async fn sign_out_discards_inflight_results() {
        let (mut renderer, _rx) = renderer();
        renderer.on_session_change(Some(Session::new("u1"))).unwrap();
        renderer.on_session_change(None).unwrap();

        assert!(!renderer
            .handle_response(response(1, FetchKind::Profile, profile("Asha")))
            .unwrap());
        assert_eq!(renderer.page().write_count(ElementId::UserName), 0);
    }

    #[tokio::test]
    async fn latest_order_rerender_does_not_accumulate() {
        let (mut renderer, _rx) = renderer();
        let order = LatestOrder {
            items: vec![OrderItem {
                name: "Pen".to_string(),
                quantity: 2,
            }],
            total: Amount::Number(Number::from(50)),
            timestamp: Timestamp("2024-01-01".to_string()),
        };

        for generation in 1..=2 {
            renderer.on_session_change(Some(Session::new("u1"))).unwrap();
            renderer
                .handle_response(response(
                    generation,
                    FetchKind::LatestOrder,
                    FetchOutcome::Found(RegionData::LatestOrder(order.clone())),
                ))
                .unwrap();
        }

        assert_eq!(renderer.page().items(ElementId::CartItems), ["Pen x 2"]);
        assert_eq!(
            renderer.page().text(ElementId::LatestOrder),
            Some("Total ₹50 placed on 2024-01-01")
        );
    }

    #[tokio::test]
    async fn failure_degrades_only_its_regions() {
        let (mut renderer, _rx) = renderer();
        renderer.on_session_change(Some(Session::new("u1"))).unwrap();

        renderer
            .handle_response(response(
                1,
                FetchKind::LatestOrder,
                FetchOutcome::Failed("network down".to_string()),
            ))
            .unwrap();
        renderer
            .handle_response(response(
                1,
                FetchKind::History,
                FetchOutcome::Found(RegionData::History(OrderHistory(vec![OrderHistoryEntry {
                    total: Amount::Number(Number::from(100)),
                    timestamp: Timestamp("2023-12-01".to_string()),
                }]))),
            ))
            .unwrap();

        let page = renderer.page();
        assert_eq!(page.unavailable_reason(ElementId::CartItems), Some("network down"));
        assert_eq!(page.unavailable_reason(ElementId::LatestOrder), Some("network down"));
        assert_eq!(page.unavailable_reason(ElementId::UserName), None);
        assert_eq!(page.items(ElementId::PastOrders), ["₹100 on 2023-12-01"]);
    }
}
