//! Page-load wiring.
//!
//! [`wire_page`] is called once the DOM is ready. It binds every configured
//! fighter dropdown that exists on the page and builds the submit gate. A
//! missing dropdown is recorded and skipped; it never stops the other slots
//! from being wired.

use crate::config::PageConfig;
use crate::detail_fetcher::DetailFetcher;
use crate::dom::{Document, HttpClient, Timers};
use crate::submit_gate::{SubmitGate, SubmitPath};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Which dropdowns were wired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiringReport {
    /// Select ids that now load details on change
    pub bound: Vec<String>,
    /// Select ids not found (or not bindable) on the page
    pub missing: Vec<String>,
}

impl WiringReport {
    /// Whether every configured slot was wired
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// The wired fighter-selection page
#[derive(Debug)]
pub struct Page {
    submit_gate: SubmitGate,
    fetcher: DetailFetcher,
    report: WiringReport,
}

impl Page {
    /// The "Fight!" button's click handler
    pub fn trigger_submit(&self) -> SubmitPath {
        self.submit_gate.trigger_submit()
    }

    /// Wiring outcome
    #[must_use]
    pub fn report(&self) -> &WiringReport {
        &self.report
    }

    /// The fetcher behind the dropdowns
    #[must_use]
    pub fn fetcher(&self) -> &DetailFetcher {
        &self.fetcher
    }
}

/// Wire the page. Call once, after the DOM is ready.
pub fn wire_page(
    document: Rc<dyn Document>,
    timers: Rc<dyn Timers>,
    http: Rc<dyn HttpClient>,
    config: &PageConfig,
) -> Page {
    let fetcher = DetailFetcher::new(Rc::clone(&document), http, config.api.clone());
    let mut report = WiringReport::default();

    for slot in &config.slots {
        if !document.has_element(&slot.select_id) {
            debug!(select_id = %slot.select_id, "dropdown not on this page");
            report.missing.push(slot.select_id.clone());
            continue;
        }
        match fetcher.bind_dropdown(&slot.select_id, slot.targets.clone()) {
            Ok(()) => report.bound.push(slot.select_id.clone()),
            Err(err) => {
                warn!(select_id = %slot.select_id, error = %err, "failed to bind dropdown");
                report.missing.push(slot.select_id.clone());
            }
        }
    }

    info!(
        bound = report.bound.len(),
        missing = report.missing.len(),
        "fighter page wired"
    );

    Page {
        submit_gate: SubmitGate::new(document, timers, &config.submit),
        fetcher,
        report,
    }
}
