//! Structured-facts explorer for the ICT analysis backend.
//!
//! Architecture:
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ FactsSource  │────►│  FactsCache  │────►│  Controller  │
//! │ (HTTP/file)  │     │ (tri-state)  │     │ (open/close) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        ▲                                         │
//!        │ Command::Fetch                          ▼
//! ┌──────────────┐                          ┌──────────────┐
//! │   Session    │◄──── ExplorerEvent ──────│   Renderer   │
//! │ (tokio loop) │                          │  (pure fn)   │
//! └──────────────┘                          └──────────────┘
//! ```
//!
//! The document is fetched only while the panel is open. Only the sections
//! the user expanded are rendered, and collections are truncated so the
//! rendered tree stays small whatever the backend sends.

pub mod cache;
pub mod config;
pub mod controller;
pub mod events;
pub mod facts;
pub mod logging;
pub mod present;
pub mod render;
pub mod sections;
pub mod session;
