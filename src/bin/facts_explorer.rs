//! Terminal facts explorer.
//!
//! Reads commands from stdin and prints the explorer after every change:
//!   open | close | toggle <section> | refresh | show | help | quit
//!
//! Source selection and timings come from the environment, see `Config`.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use factscope::config::Config;
use factscope::events::ExplorerEvent;
use factscope::facts::{FactsSource, SourceKind};
use factscope::logging::{log, obj, v_str, Domain, Level};
use factscope::present::view_text;
use factscope::session::ExplorerSession;

const HELP: &str = "commands: open | close | toggle <section> | refresh | show | help | quit";

#[derive(Debug, PartialEq)]
enum Input {
    Event(ExplorerEventKind),
    Show,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq)]
enum ExplorerEventKind {
    Open,
    Close,
    Toggle(String),
    Refresh,
}

impl ExplorerEventKind {
    fn into_event(self) -> ExplorerEvent {
        match self {
            ExplorerEventKind::Open => ExplorerEvent::Open,
            ExplorerEventKind::Close => ExplorerEvent::Close,
            ExplorerEventKind::Toggle(s) => ExplorerEvent::ToggleSection(s),
            ExplorerEventKind::Refresh => ExplorerEvent::Refresh,
        }
    }
}

fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;
    let input = match cmd {
        "open" | "o" => Input::Event(ExplorerEventKind::Open),
        "close" | "c" => Input::Event(ExplorerEventKind::Close),
        "refresh" | "r" => Input::Event(ExplorerEventKind::Refresh),
        "toggle" | "t" => match parts.next() {
            Some(section) => Input::Event(ExplorerEventKind::Toggle(section.to_string())),
            None => Input::Unknown("toggle needs a section name".to_string()),
        },
        "show" | "s" => Input::Show,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => Input::Unknown(format!("unknown command: {}", other)),
    };
    Some(input)
}

fn print_view(session: &ExplorerSession) {
    println!("{}", view_text(&session.view()));
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let kind = SourceKind::from_env();
    let source: Arc<dyn FactsSource> = Arc::from(kind.build(&cfg)?);

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("source", v_str(source.name())),
            ("facts_url", v_str(&cfg.facts_url)),
            ("facts_file", v_str(&cfg.facts_file)),
            ("stale_secs", json!(cfg.stale_secs)),
        ]),
    );

    let mut session = ExplorerSession::new(source, cfg.stale_after());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    print_view(&session);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    None => continue,
                    Some(Input::Event(kind)) => {
                        session.dispatch(kind.into_event());
                        print_view(&session);
                    }
                    Some(Input::Show) => print_view(&session),
                    Some(Input::Help) => println!("{}", HELP),
                    Some(Input::Quit) => break,
                    Some(Input::Unknown(msg)) => println!("{}\n{}", msg, HELP),
                }
            }
            Some(_) = session.next_settled() => {
                if session.controller().is_open() {
                    print_view(&session);
                }
            }
        }
    }

    log(
        Level::Info,
        Domain::System,
        "shutdown",
        obj(&[("fetches", json!(session.fetches_started()))]),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), None);
        assert_eq!(parse_input("open"), Some(Input::Event(ExplorerEventKind::Open)));
        assert_eq!(
            parse_input("t session"),
            Some(Input::Event(ExplorerEventKind::Toggle("session".into())))
        );
        assert!(matches!(parse_input("toggle"), Some(Input::Unknown(_))));
        assert!(matches!(parse_input("dance"), Some(Input::Unknown(_))));
        assert_eq!(parse_input("q"), Some(Input::Quit));
    }
}
