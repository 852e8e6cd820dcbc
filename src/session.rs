//! Async driver around [`ExplorerController`].
//!
//! Events are applied one at a time on the caller's task. `Command::Fetch` is
//! executed on a spawned task whose result comes back through a channel and
//! is applied as an ordinary `Settled` event, so the controller is only ever
//! touched from one place.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::sync::mpsc;

use crate::cache::{FetchTicket, RetrievalState, Settlement};
use crate::controller::{ExplorerController, ExplorerView};
use crate::events::{handle, Command, ExplorerEvent, Transition};
use crate::facts::{FactsReply, FactsSource};
use crate::logging::{
    log_fetch_discarded, log_fetch_issued, log_fetch_settled, log_panel, log_render, ProfileScope,
};

type SettledMsg = (FetchTicket, Result<FactsReply>);

pub struct ExplorerSession {
    controller: ExplorerController,
    source: Arc<dyn FactsSource>,
    tx: mpsc::UnboundedSender<SettledMsg>,
    rx: mpsc::UnboundedReceiver<SettledMsg>,
    fetches_started: u64,
}

impl ExplorerSession {
    pub fn new(source: Arc<dyn FactsSource>, stale_after: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller: ExplorerController::new(stale_after),
            source,
            tx,
            rx,
            fetches_started: 0,
        }
    }

    pub fn controller(&self) -> &ExplorerController {
        &self.controller
    }

    /// Number of retrievals handed to the source so far.
    pub fn fetches_started(&self) -> u64 {
        self.fetches_started
    }

    /// Apply one event and start any fetch it asks for. Must be called from
    /// within a tokio runtime.
    pub fn dispatch(&mut self, event: ExplorerEvent) -> Transition {
        let name = event.name();
        let section = match &event {
            ExplorerEvent::ToggleSection(s) => Some(s.clone()),
            _ => None,
        };
        let settled_ticket = match &event {
            ExplorerEvent::Settled { ticket, .. } => Some(*ticket),
            _ => None,
        };

        let transition = handle(&mut self.controller, event);

        match (settled_ticket, transition.settlement) {
            (Some(ticket), Some(Settlement::Applied)) => self.log_applied(ticket),
            (Some(ticket), _) => log_fetch_discarded(ticket.0, "not_in_flight"),
            (None, _) => log_panel(name, section.as_deref(), self.controller.phase().as_str()),
        }

        if let Some(Command::Fetch(ticket)) = transition.command {
            self.spawn_fetch(ticket);
        }
        transition
    }

    /// Wait for the next retrieval to finish and apply it.
    pub async fn next_settled(&mut self) -> Option<Settlement> {
        let (ticket, result) = self.rx.recv().await?;
        self.dispatch(ExplorerEvent::Settled { ticket, result }).settlement
    }

    pub fn view(&self) -> ExplorerView {
        let view = self.controller.view();
        if let ExplorerView::Ready { sections } = &view {
            for s in sections {
                if let Some(body) = &s.body {
                    log_render(&s.name, body.node_count());
                }
            }
        }
        view
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        self.fetches_started += 1;
        log_fetch_issued(ticket.0, self.source.name());
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _scope = ProfileScope::with_context("facts_fetch", &[("ticket", json!(ticket.0))]);
            let result = source.fetch().await;
            // receiver gone means the session was dropped
            let _ = tx.send((ticket, result));
        });
    }

    fn log_applied(&self, ticket: FetchTicket) {
        match self.controller.retrieval() {
            RetrievalState::Ready(doc) => {
                log_fetch_settled(ticket.0, "ready", &doc.digest());
            }
            RetrievalState::Empty(message) => log_fetch_settled(ticket.0, "empty", &message),
            RetrievalState::Failed(error) => log_fetch_settled(ticket.0, "failed", &error),
            other => log_fetch_settled(ticket.0, other.name(), ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Counting {
        calls: AtomicU64,
    }

    #[async_trait]
    impl FactsSource for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self) -> Result<FactsReply> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FactsReply::Empty(format!("call {}", n)))
        }
    }

    #[tokio::test]
    async fn test_open_fetches_once_and_settles() {
        let source = Arc::new(Counting {
            calls: AtomicU64::new(0),
        });
        let mut session = ExplorerSession::new(source.clone(), Duration::from_secs(60));
        session.dispatch(ExplorerEvent::Open);
        session.dispatch(ExplorerEvent::Open);
        assert_eq!(session.fetches_started(), 1);
        assert_eq!(session.view(), ExplorerView::Loading);

        assert_eq!(session.next_settled().await, Some(Settlement::Applied));
        assert_eq!(
            session.view(),
            ExplorerView::Empty {
                message: "call 0".into()
            }
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
