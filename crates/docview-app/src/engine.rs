//! Engine - shared orchestration for every frontend
//!
//! The Engine owns the [`AppState`], the message channel that background
//! tasks report into, the service handles, and a broadcast channel of
//! [`EngineEvent`]s. Events are derived by diffing a state snapshot taken
//! before and after each processing cycle.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use docview_render::{CodeBlockId, CopyState, RenderState};

use crate::engine_event::{DiagramOutcome, EngineEvent};
use crate::message::Message;
use crate::process::process_message;
use crate::services::{Clipboard, DiagramEngine, Services};
use crate::state::AppState;
use crate::view::{page_view, PageView};

/// Capacity of the message channel background tasks report into.
pub const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Observable state compared around each processing cycle.
#[derive(Debug, Default)]
struct StateSnapshot {
    epoch: Option<u64>,
    mobile_menu_open: bool,
    search_query: String,
    /// Diagram id -> (version, settled)
    diagrams: HashMap<String, (u64, bool)>,
    copy: HashMap<CodeBlockId, CopyState>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        let Some(page) = &state.page else {
            return Self {
                mobile_menu_open: state.mobile_menu_open,
                search_query: state.search_query.clone(),
                ..Self::default()
            };
        };
        Self {
            epoch: Some(page.epoch),
            mobile_menu_open: state.mobile_menu_open,
            search_query: state.search_query.clone(),
            diagrams: page
                .diagrams
                .iter()
                .map(|(id, d)| (id.clone(), (d.version(), d.state().is_settled())))
                .collect(),
            copy: page.copy.iter().map(|(id, f)| (*id, f.state())).collect(),
        }
    }
}

/// Shared orchestration over a diagram engine `D` and a clipboard `C`.
pub struct Engine<D, C> {
    /// Application state (the Model)
    pub state: AppState,
    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,
    services: Services<D, C>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<D, C> Engine<D, C>
where
    D: DiagramEngine + Sync + 'static,
    C: Clipboard + Sync + 'static,
{
    pub fn new(state: AppState, diagrams: D, clipboard: C) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state,
            msg_tx,
            msg_rx,
            services: Services::new(diagrams, clipboard),
            event_tx,
        }
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Sender for injecting messages from outside the engine.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn services(&self) -> &Services<D, C> {
        &self.services
    }

    /// Select the initial document, if there is one.
    pub fn start(&mut self) {
        match self.state.initial_document() {
            Some(id) => self.process_message(Message::SelectDocument { id }),
            None => warn!("Menu is empty, nothing to select"),
        }
    }

    /// Process one message and broadcast the resulting events.
    pub fn process_message(&mut self, message: Message) {
        let before = StateSnapshot::capture(&self.state);
        let outcome = process_message(&mut self.state, message, &self.msg_tx, &self.services);
        let after = StateSnapshot::capture(&self.state);

        let mut events = self.diff(&before, &after);
        if outcome.scroll_to_top {
            events.push(EngineEvent::ScrollToTop);
        }
        for event in events {
            self.emit(event);
        }
    }

    /// Process every message already queued. Returns how many were handled.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message from background tasks.
    ///
    /// Never returns `None` while the engine is alive, since it holds a
    /// sender itself.
    pub async fn recv_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    /// Wait for the next message and process it.
    pub async fn process_next(&mut self) {
        if let Some(msg) = self.recv_message().await {
            self.process_message(msg);
        }
    }

    /// Process messages until no diagram is rendering or `timeout` expires.
    ///
    /// Returns `true` when every diagram on the page has settled.
    pub async fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        self.drain_pending_messages();

        while self.state.is_rendering() {
            match tokio::time::timeout_at(deadline, self.msg_rx.recv()).await {
                Ok(Some(msg)) => self.process_message(msg),
                Ok(None) => return false,
                Err(_) => {
                    warn!("Timed out after {:?} waiting for diagram renders", timeout);
                    return false;
                }
            }
        }
        true
    }

    /// Derive the page view from current state.
    pub fn page_view(&self) -> PageView {
        page_view(&self.state)
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn shutdown(&mut self) {
        debug!("Engine shutting down");
        self.emit(EngineEvent::Shutdown);
    }

    fn emit(&self, event: EngineEvent) {
        debug!("Engine event: {}", event.event_type());
        // No subscribers is not an error.
        let _ = self.event_tx.send(event);
    }

    fn diff(&self, before: &StateSnapshot, after: &StateSnapshot) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let page_changed = before.epoch != after.epoch;

        if page_changed {
            if let Some(page) = &self.state.page {
                events.push(EngineEvent::DocumentChanged {
                    id: page.document.id.clone(),
                    title: page.document.title.clone(),
                    placeholder: !page.has_content,
                });
            }
        }

        if before.mobile_menu_open != after.mobile_menu_open {
            events.push(EngineEvent::MobileMenuChanged {
                open: after.mobile_menu_open,
            });
        }

        if before.search_query != after.search_query {
            let matches = self
                .state
                .navigator
                .menu()
                .filtered(&after.search_query)
                .entry_ids()
                .count();
            events.push(EngineEvent::MenuFiltered {
                query: after.search_query.clone(),
                matches,
            });
        }

        let Some(page) = &self.state.page else {
            return events;
        };

        let mut settled: Vec<_> = after
            .diagrams
            .iter()
            .filter(|(id, now)| {
                now.1 && (page_changed || before.diagrams.get(id.as_str()) != Some(*now))
            })
            .map(|(id, _)| id)
            .collect();
        settled.sort();
        for id in settled {
            let outcome = match page.diagrams.get(id).map(|d| d.state()) {
                Some(RenderState::Failed(message)) => DiagramOutcome::Failed {
                    message: message.clone(),
                },
                _ => DiagramOutcome::Rendered,
            };
            events.push(EngineEvent::DiagramSettled {
                diagram_id: id.clone(),
                outcome,
            });
        }

        if !page_changed {
            let mut changed: Vec<_> = after
                .copy
                .iter()
                .filter(|(block, state)| before.copy.get(*block) != Some(*state))
                .map(|(block, state)| (*block, *state))
                .collect();
            changed.sort_by_key(|(block, _)| *block);
            for (block, state) in changed {
                events.push(EngineEvent::CopyStateChanged { block, state });
            }
        }

        events
    }
}
