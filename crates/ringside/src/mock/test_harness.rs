//! Fighter Page Test Harness
//!
//! Builds the standard fighter-selection page (a form, the bell, two fighter
//! dropdowns with their panels) on the mock runtime and wires the real page
//! behaviors onto it. Tests then drive it like a user: pick fighters, click
//! "Fight!", let time pass, let responses arrive.

use super::audio::{MockAudio, PlaybackBehavior};
use super::document::{MockDocument, MockForm};
use super::network::MockNetwork;
use super::timers::MockTimers;
use crate::config::PageConfig;
use crate::page::{wire_page, Page};
use crate::submit_gate::SubmitPath;
use std::rc::Rc;

/// Id of the form on the standard page
pub const FIGHT_FORM_ID: &str = "fight-form";

/// Populate `document` with everything `config` expects
pub fn build_fighter_page(document: &MockDocument, config: &PageConfig, bell: PlaybackBehavior) {
    document.add_form(FIGHT_FORM_ID);
    document.add_audio(&config.submit.audio_id, MockAudio::new(bell));
    for slot in &config.slots {
        document.add_select(&slot.select_id);
        document.add_panel(&slot.targets);
    }
}

/// A wired fighter page on the mock runtime
#[derive(Debug)]
pub struct PageHarness {
    /// The page's document
    pub document: MockDocument,
    /// Fake clock and timer queue
    pub timers: MockTimers,
    /// Mock network
    pub network: MockNetwork,
    /// The wired page
    pub page: Page,
    config: PageConfig,
}

impl Default for PageHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl PageHarness {
    /// Standard page whose bell starts playing at once
    #[must_use]
    pub fn new() -> Self {
        Self::with_bell(PlaybackBehavior::Start)
    }

    /// Standard page with a scripted bell
    #[must_use]
    pub fn with_bell(bell: PlaybackBehavior) -> Self {
        let timers = MockTimers::new();
        let document = MockDocument::with_clock(&timers);
        let config = PageConfig::default();
        build_fighter_page(&document, &config, bell);
        Self::wire(document, timers, config)
    }

    /// Wire the page behaviors onto a document the caller built
    #[must_use]
    pub fn wire(document: MockDocument, timers: MockTimers, config: PageConfig) -> Self {
        let network = MockNetwork::new();
        let page = wire_page(
            Rc::new(document.clone()),
            Rc::new(timers.clone()),
            Rc::new(network.clone()),
            &config,
        );
        Self {
            document,
            timers,
            network,
            page,
            config,
        }
    }

    /// Configuration the page was wired with
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// The bell
    #[must_use]
    pub fn bell(&self) -> Option<MockAudio> {
        self.document.audio(&self.config.submit.audio_id)
    }

    /// The standard page's form
    #[must_use]
    pub fn form(&self) -> Option<MockForm> {
        self.document.form(FIGHT_FORM_ID)
    }

    /// Pick a fighter in a dropdown (fires `change`)
    pub fn choose(&self, select_id: &str, boxer_id: &str) -> bool {
        self.document.select(select_id, boxer_id)
    }

    /// Click "Fight!"
    pub fn click_fight(&self) -> SubmitPath {
        self.page.trigger_submit()
    }

    /// Let `ms` milliseconds pass
    pub fn advance_ms(&self, ms: u64) -> usize {
        self.timers.advance_ms(ms)
    }

    /// Deliver every pending response
    pub fn flush_network(&self) -> usize {
        self.network.flush()
    }

    /// Text of a node, empty if it is missing
    #[must_use]
    pub fn text(&self, id: &str) -> String {
        self.document.text(id).unwrap_or_default()
    }

    /// Assert a node's text
    ///
    /// # Panics
    ///
    /// Panics if the text differs.
    pub fn assert_text(&self, id: &str, expected: &str) {
        let actual = self.text(id);
        assert_eq!(
            actual, expected,
            "Text mismatch on #{id}: expected '{expected}', got '{actual}'"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockResponse;

    #[test]
    fn test_standard_page_is_fully_wired() {
        let harness = PageHarness::new();
        assert!(harness.page.report().is_complete());
        assert!(harness.bell().is_some());
        assert!(harness.form().is_some());
        assert_eq!(harness.text("fighter2-height"), "");
    }

    #[test]
    fn test_choose_and_flush() {
        let harness = PageHarness::new();
        harness
            .network
            .route("/api/boxer/5", MockResponse::json(r#"{"stance": "Southpaw"}"#));

        assert!(harness.choose("fighter2-select", "5"));
        assert_eq!(harness.flush_network(), 1);
        harness.assert_text("fighter2-stance", "Stance: Southpaw");
    }

    #[test]
    #[should_panic(expected = "Text mismatch on #fighter1-wins")]
    fn test_assert_text_reports_mismatch() {
        PageHarness::new().assert_text("fighter1-wins", "Wins: 99");
    }
}
