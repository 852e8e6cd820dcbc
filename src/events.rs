//! Explorer events and the transition function.
//!
//! | Phase     | Open           | Close  | Toggle | Refresh        | Settled          |
//! |-----------|----------------|--------|--------|----------------|------------------|
//! | Closed    | Pending, Fetch*| -      | store  | invalidate     | stale ticket: -  |
//! | Pending   | -              | Closed, drop ticket | store | attach | Ready / Failed |
//! | Ready     | -              | Closed | store  | Pending, Fetch | stale ticket: -  |
//! | Failed    | -              | Closed | store  | Pending, Fetch | stale ticket: -  |
//!
//! `*` no fetch when a fresh document is cached.

use anyhow::Result;

use crate::cache::{FetchTicket, Settlement};
use crate::controller::ExplorerController;
use crate::facts::FactsReply;

#[derive(Debug)]
pub enum ExplorerEvent {
    Open,
    Close,
    ToggleSection(String),
    Refresh,
    Settled {
        ticket: FetchTicket,
        result: Result<FactsReply>,
    },
}

impl ExplorerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ExplorerEvent::Open => "open",
            ExplorerEvent::Close => "close",
            ExplorerEvent::ToggleSection(_) => "toggle_section",
            ExplorerEvent::Refresh => "refresh",
            ExplorerEvent::Settled { .. } => "settled",
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Fetch(FetchTicket),
}

#[derive(Debug)]
pub struct Transition {
    pub command: Option<Command>,
    /// Set for `Settled` events only.
    pub settlement: Option<Settlement>,
}

/// Apply one event. Runs to completion; the only side effect is the
/// returned command.
pub fn handle(ctl: &mut ExplorerController, event: ExplorerEvent) -> Transition {
    let mut settlement = None;
    let command = match event {
        ExplorerEvent::Open => ctl.open().map(Command::Fetch),
        ExplorerEvent::Close => {
            ctl.close();
            None
        }
        ExplorerEvent::ToggleSection(section) => {
            ctl.toggle_section(&section);
            None
        }
        ExplorerEvent::Refresh => ctl.refresh().map(Command::Fetch),
        ExplorerEvent::Settled { ticket, result } => {
            settlement = Some(ctl.settle(ticket, result));
            None
        }
    };
    Transition {
        command,
        settlement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;
    use std::time::Duration;

    #[test]
    fn test_transition_table_walk() {
        let mut ctl = ExplorerController::new(Duration::from_secs(60));

        let tr = handle(&mut ctl, ExplorerEvent::Open);
        let Some(Command::Fetch(t1)) = tr.command else {
            panic!("open should fetch");
        };
        assert_eq!(ctl.phase(), Phase::Pending);

        assert!(handle(&mut ctl, ExplorerEvent::Refresh).command.is_none());

        let tr = handle(
            &mut ctl,
            ExplorerEvent::Settled {
                ticket: t1,
                result: Err(anyhow::anyhow!("HTTP 502")),
            },
        );
        assert_eq!(tr.settlement, Some(Settlement::Applied));
        assert_eq!(ctl.phase(), Phase::Failed);

        let tr = handle(&mut ctl, ExplorerEvent::Refresh);
        let Some(Command::Fetch(t2)) = tr.command else {
            panic!("refresh from failed should fetch");
        };
        assert_eq!(ctl.phase(), Phase::Pending);

        handle(&mut ctl, ExplorerEvent::Close);
        assert_eq!(ctl.phase(), Phase::Closed);
        let tr = handle(
            &mut ctl,
            ExplorerEvent::Settled {
                ticket: t2,
                result: Ok(FactsReply::Empty("late".into())),
            },
        );
        assert_eq!(tr.settlement, Some(Settlement::Unknown));
        assert_eq!(ctl.phase(), Phase::Closed);

        let tr = handle(&mut ctl, ExplorerEvent::Open);
        assert!(matches!(tr.command, Some(Command::Fetch(t3)) if t3 != t2));
    }

    #[test]
    fn test_toggle_never_fetches() {
        let mut ctl = ExplorerController::new(Duration::from_secs(60));
        let tr = handle(&mut ctl, ExplorerEvent::ToggleSection("sweeps".into()));
        assert!(tr.command.is_none());
        assert!(tr.settlement.is_none());
        assert!(ctl.sections().is_open("sweeps"));
    }
}
