//! Retrieval state machine for the facts document.
//!
//! The cache never performs I/O. Methods that may start a retrieval return a
//! [`FetchTicket`]. The caller runs exactly one fetch per ticket and reports
//! the result back through [`FactsCache::settle`]. The cache enforces:
//!
//! - at most one ticket in flight
//! - closing drops the ticket in flight, so a late result is ignored and a
//!   hung fetch never outlives the panel
//! - successful results reused until the staleness window passes or a
//!   refresh invalidates them

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::facts::{FactsDocument, FactsReply};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalState {
    /// Inactive, or active without anything issued yet.
    Idle,
    Pending,
    Ready(Arc<FactsDocument>),
    /// Backend answered without facts.
    Empty(String),
    /// Error text, verbatim.
    Failed(String),
}

impl RetrievalState {
    pub fn name(&self) -> &'static str {
        match self {
            RetrievalState::Idle => "idle",
            RetrievalState::Pending => "pending",
            RetrievalState::Ready(_) => "ready",
            RetrievalState::Empty(_) => "empty",
            RetrievalState::Failed(_) => "failed",
        }
    }
}

/// What happened to a settled ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// Not the ticket in flight: superseded, or abandoned when the panel closed.
    Unknown,
}

#[derive(Debug, Clone)]
enum Outcome {
    Document(Arc<FactsDocument>),
    Empty(String),
    Failed(String),
}

#[derive(Debug, Clone)]
struct Settled {
    outcome: Outcome,
    at: Instant,
}

#[derive(Debug)]
pub struct FactsCache {
    active: bool,
    stale_after: Duration,
    next_ticket: u64,
    in_flight: Option<FetchTicket>,
    invalidated: bool,
    latest: Option<Settled>,
}

impl FactsCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            active: false,
            stale_after,
            next_ticket: 1,
            in_flight: None,
            invalidated: false,
            latest: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    /// Start observing. Issues a ticket only if nothing is in flight and there
    /// is no fresh successful result to reuse.
    pub fn activate(&mut self) -> Option<FetchTicket> {
        self.active = true;
        if self.in_flight.is_some() || self.has_reusable_result() {
            return None;
        }
        Some(self.issue())
    }

    /// Stop observing. The ticket in flight is abandoned: its result is
    /// ignored when it lands and the next activation issues a fresh one.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.in_flight = None;
    }

    /// Invalidate the cached result and fetch again. Attaches to an in-flight
    /// fetch instead of starting a second one. While inactive this only
    /// invalidates.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.invalidated = true;
        if !self.active || self.in_flight.is_some() {
            return None;
        }
        Some(self.issue())
    }

    pub fn settle(&mut self, ticket: FetchTicket, result: Result<FactsReply>) -> Settlement {
        if self.in_flight != Some(ticket) {
            return Settlement::Unknown;
        }
        self.in_flight = None;
        let outcome = match result {
            Ok(FactsReply::Document(doc)) => Outcome::Document(Arc::new(doc)),
            Ok(FactsReply::Empty(message)) => Outcome::Empty(message),
            Err(err) => Outcome::Failed(format!("{:#}", err)),
        };
        self.latest = Some(Settled {
            outcome,
            at: Instant::now(),
        });
        self.invalidated = false;
        Settlement::Applied
    }

    pub fn current_state(&self) -> RetrievalState {
        if !self.active {
            return RetrievalState::Idle;
        }
        if self.in_flight.is_some() {
            return RetrievalState::Pending;
        }
        match self.latest.as_ref().map(|s| &s.outcome) {
            None => RetrievalState::Idle,
            Some(Outcome::Document(doc)) => RetrievalState::Ready(Arc::clone(doc)),
            Some(Outcome::Empty(message)) => RetrievalState::Empty(message.clone()),
            Some(Outcome::Failed(error)) => RetrievalState::Failed(error.clone()),
        }
    }

    fn has_reusable_result(&self) -> bool {
        match &self.latest {
            Some(Settled {
                outcome: Outcome::Failed(_),
                ..
            }) => false,
            Some(s) => !self.invalidated && s.at.elapsed() < self.stale_after,
            None => false,
        }
    }

    fn issue(&mut self) -> FetchTicket {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        ticket
    }
}
