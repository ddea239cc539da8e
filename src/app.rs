//! Application orchestration layer
//!
//! Wires an [`AuthProvider`] subscription, the [`DashboardRenderer`] and its fetch
//! response channel together, and drives them from a single task. The page is only
//! ever written from that task.

pub mod runtime;

use crate::auth::{subscribe_channel, AuthProvider, Session, SubscriptionId};
use crate::error::Result;
use crate::page::{Page, PageState};
use crate::render::protocol::FetchResponse;
use crate::render::ui::UIRenderer;
use crate::render::DashboardRenderer;
use crate::store::DataStore;
use runtime::UiCommand;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Application orchestrator - coordinates components without duplicating their state
pub struct Application<P: Page> {
    auth: Arc<dyn AuthProvider>,
    subscription: SubscriptionId,
    sessions: UnboundedReceiver<Option<Session>>,
    responses: UnboundedReceiver<FetchResponse>,
    renderer: DashboardRenderer<P>,
    sessions_seen: usize,
}

impl<P: Page> Application<P> {
    /// Subscribe to `auth` and build the renderer around `page`.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DataStore>,
        page: P,
        root_path: impl Into<String>,
    ) -> Self {
        let (response_tx, responses) = mpsc::unbounded_channel();
        let renderer = DashboardRenderer::new(store, page, root_path, response_tx);
        let (subscription, sessions) = subscribe_channel(auth.as_ref());

        Self {
            auth,
            subscription,
            sessions,
            responses,
            renderer,
            sessions_seen: 0,
        }
    }

    pub fn page(&self) -> &P {
        self.renderer.page()
    }

    pub fn renderer(&self) -> &DashboardRenderer<P> {
        &self.renderer
    }

    /// Process notifications and fetch results until a session has been handled,
    /// no notification is queued and the current pass has completed.
    pub async fn run_until_idle(&mut self) -> Result<()> {
        loop {
            if self.sessions_seen > 0 && self.renderer.is_idle() && self.sessions.is_empty() {
                return Ok(());
            }

            let rendering = !self.renderer.is_idle();
            tokio::select! {
                biased;
                Some(session) = self.sessions.recv() => {
                    self.sessions_seen += 1;
                    self.renderer.on_session_change(session)?;
                }
                Some(response) = self.responses.recv(), if rendering => {
                    self.renderer.handle_response(response)?;
                }
            }
        }
    }

    /// Re-render for whoever is signed in right now.
    pub fn refresh(&mut self) -> Result<()> {
        let current = self.auth.current_session();
        self.renderer.on_session_change(current).map(|_| ())
    }
}

impl Application<PageState> {
    /// Interactive loop: redraw after every change until `Quit` arrives or the
    /// command channel closes.
    pub async fn run(
        &mut self,
        ui: &mut dyn UIRenderer,
        mut commands: UnboundedReceiver<UiCommand>,
    ) -> Result<()> {
        ui.initialize()?;
        let outcome = self.event_loop(ui, &mut commands).await;
        ui.cleanup()?;
        outcome
    }

    async fn event_loop(
        &mut self,
        ui: &mut dyn UIRenderer,
        commands: &mut UnboundedReceiver<UiCommand>,
    ) -> Result<()> {
        ui.render(self.renderer.page())?;

        loop {
            tokio::select! {
                Some(session) = self.sessions.recv() => {
                    self.sessions_seen += 1;
                    self.renderer.on_session_change(session)?;
                }
                Some(response) = self.responses.recv() => {
                    if !self.renderer.handle_response(response)? {
                        continue;
                    }
                }
                command = commands.recv() => match command {
                    Some(UiCommand::Refresh) => self.refresh()?,
                    Some(UiCommand::Quit) | None => return Ok(()),
                },
            }
            ui.render(self.renderer.page())?;
        }
    }
}

impl<P: Page> Drop for Application<P> {
    fn drop(&mut self) {
        self.auth.unsubscribe(self.subscription);
    }
}
