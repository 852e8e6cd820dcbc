use std::time::Duration;

use anyhow::Result;

use crate::cache::{FactsCache, FetchTicket, RetrievalState, Settlement};
use crate::facts::FactsReply;
use crate::render::{render, RenderNode};
use crate::sections::SectionStateStore;

/// Coarse explorer phase, one per row of the transition table in
/// [`crate::events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Pending,
    /// Document or empty-state message available.
    Ready,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Closed => "closed",
            Phase::Pending => "pending",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub name: String,
    pub open: bool,
    /// Present only for open sections.
    pub body: Option<RenderNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerView {
    Closed,
    Loading,
    Failed { error: String },
    Empty { message: String },
    Ready { sections: Vec<SectionView> },
}

/// Glue between the panel, the cache and the section store. Holds no data of
/// its own beyond the open flag.
#[derive(Debug)]
pub struct ExplorerController {
    open: bool,
    cache: FactsCache,
    sections: SectionStateStore,
}

impl ExplorerController {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            open: false,
            cache: FactsCache::new(stale_after),
            sections: SectionStateStore::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn sections(&self) -> &SectionStateStore {
        &self.sections
    }

    pub fn retrieval(&self) -> RetrievalState {
        self.cache.current_state()
    }

    pub fn open(&mut self) -> Option<FetchTicket> {
        self.open = true;
        self.cache.activate()
    }

    pub fn close(&mut self) {
        self.open = false;
        self.cache.deactivate();
    }

    pub fn toggle_section(&mut self, section: &str) {
        self.sections.toggle(section);
    }

    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.cache.refresh()
    }

    pub fn settle(&mut self, ticket: FetchTicket, result: Result<FactsReply>) -> Settlement {
        self.cache.settle(ticket, result)
    }

    pub fn phase(&self) -> Phase {
        if !self.open {
            return Phase::Closed;
        }
        match self.cache.current_state() {
            RetrievalState::Idle | RetrievalState::Pending => Phase::Pending,
            RetrievalState::Ready(_) | RetrievalState::Empty(_) => Phase::Ready,
            RetrievalState::Failed(_) => Phase::Failed,
        }
    }

    /// Current view. Only expanded sections are rendered.
    pub fn view(&self) -> ExplorerView {
        if !self.open {
            return ExplorerView::Closed;
        }
        match self.cache.current_state() {
            RetrievalState::Idle | RetrievalState::Pending => ExplorerView::Loading,
            RetrievalState::Failed(error) => ExplorerView::Failed { error },
            RetrievalState::Empty(message) => ExplorerView::Empty { message },
            RetrievalState::Ready(doc) => {
                let sections = doc
                    .sections()
                    .map(|name| {
                        let open = self.sections.is_open(name);
                        let body = if open {
                            doc.section(name).map(|v| render(v, 0))
                        } else {
                            None
                        };
                        SectionView {
                            name: name.to_string(),
                            open,
                            body,
                        }
                    })
                    .collect();
                ExplorerView::Ready { sections }
            }
        }
    }

    /// Rendered body of one section, if it is open and present.
    pub fn section_body(&self, name: &str) -> Option<RenderNode> {
        match self.view() {
            ExplorerView::Ready { sections } => sections
                .into_iter()
                .find(|s| s.name == name)
                .and_then(|s| s.body),
            _ => None,
        }
    }
}
