//! Ringside: Fighter Comparison Page Behavior
//!
//! Client-side behavior of the fighter-selection page:
//!
//! - **Bell-gated submit**: "Fight!" rings the bell and submits the form a
//!   fixed delay after playback starts, or at once if the bell cannot play.
//! - **Detail panels**: picking a fighter fetches `/api/boxer/{id}` and fills
//!   that fighter's panel (photo, alias, height, reach, stance, record).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    RINGSIDE Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ wire_page  │───►│ SubmitGate │───►│ Document   │◄── web     │
//! │   │            │    │ Detail     │    │ Timers     │            │
//! │   │            │    │ Fetcher    │    │ HttpClient │◄── mock    │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The behaviors only see the [`dom`] traits. In the browser they run on the
//! `web` backend; in tests they run on the deterministic [`mock`] runtime.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Page configuration (element ids, bell delay, API path)
#[allow(clippy::missing_errors_doc)]
pub mod config;

/// Dropdown-driven detail panels
pub mod detail_fetcher;

/// Browser abstractions
pub mod dom;

/// Log subscriber setup for native hosts
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

/// Mock Browser Runtime
///
/// Run the page behaviors without a browser.
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod mock;

/// Page-load wiring
pub mod page;

/// Panel rendering
pub mod panel;

/// Boxer records as served by the API
#[allow(clippy::missing_errors_doc)]
pub mod record;

mod result;

/// Bell-gated form submission
pub mod submit_gate;

/// Browser backend
#[cfg(target_arch = "wasm32")]
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
pub mod web;

pub use config::{
    encode_uri_component, ApiConfig, PageConfig, PageConfigBuilder, SlotConfig, SubmitConfig,
};
pub use detail_fetcher::{DetailFetcher, LoadRequest};
pub use dom::{
    AudioElement, ChangeHandler, Document, FormElement, FormSelector, HttpClient, HttpResponse,
    PlaybackCallback, ResponseCallback, TimerTask, Timers,
};
pub use page::{wire_page, Page, WiringReport};
pub use panel::{ElementIdSet, NodeContent, NodeUpdate, PLACEHOLDER};
pub use record::{ApiErrorBody, BoxerRecord, FightSummary, StatValue};
pub use result::{FetchError, PlaybackError, RingsideError, RingsideResult};
pub use submit_gate::{SubmitGate, SubmitPath};
