//! Mock Browser Runtime
//!
//! Runs the real page behaviors without a browser: an in-memory document,
//! fake timers, a scriptable `<audio>` element and an intercepting network.
//! Nothing completes on its own. Tests decide when time passes, when
//! playback settles and when responses arrive, which makes every interleaving
//! reproducible (including the racy ones).
//!
//! ## Example
//!
//! ```rust
//! use ringside::mock::{MockResponse, PageHarness};
//!
//! let harness = PageHarness::new();
//! harness.network.route(
//!     "/api/boxer/42",
//!     MockResponse::json(r#"{"alias": "Iron Mike", "height_cm": 178}"#),
//! );
//!
//! harness.choose("fighter1-select", "42");
//! harness.flush_network();
//! harness.assert_text("fighter1-alias", "Iron Mike");
//! harness.assert_text("fighter1-height", "Height: 178 cm");
//! ```

pub mod audio;
pub mod document;
pub mod network;
pub mod test_harness;
pub mod timers;

pub use audio::{MockAudio, PlaybackBehavior};
pub use document::{MockDocument, MockForm};
pub use network::{AbortReason, MockNetwork, MockResponse, Route, RouteAction, UrlPattern};
pub use test_harness::{build_fighter_page, PageHarness, FIGHT_FORM_ID};
pub use timers::MockTimers;
