//! Dropdown-driven boxer detail panels.
//!
//! Changing a fighter dropdown fetches `GET {boxer_path}/{id}` and rewrites
//! that slot's panel from the response. Failures of any kind (network, non-200
//! status, malformed body, missing panel nodes) leave the panel as it was and
//! are only logged.
//!
//! Requests are neither cancelled nor de-duplicated. When a dropdown changes
//! twice quickly, whichever response arrives last is what the panel shows.

use crate::config::ApiConfig;
use crate::dom::{Document, HttpClient, HttpResponse};
use crate::panel::{self, ElementIdSet};
use crate::record::{ApiErrorBody, BoxerRecord};
use crate::result::{FetchError, RingsideError, RingsideResult};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// What a `load_detail` call did synchronously
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Nothing selected (or no such dropdown); no request was made
    Skipped,
    /// A request for this URL is in flight
    Requested {
        /// Request URL
        url: String,
    },
}

/// Loads boxer details into panels
#[derive(Clone)]
pub struct DetailFetcher {
    document: Rc<dyn Document>,
    http: Rc<dyn HttpClient>,
    api: ApiConfig,
}

impl std::fmt::Debug for DetailFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailFetcher")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl DetailFetcher {
    /// Create a fetcher over `document`
    #[must_use]
    pub fn new(document: Rc<dyn Document>, http: Rc<dyn HttpClient>, api: ApiConfig) -> Self {
        Self {
            document,
            http,
            api,
        }
    }

    /// Load details whenever `select_id` changes
    pub fn bind_dropdown(&self, select_id: &str, targets: ElementIdSet) -> RingsideResult<()> {
        let fetcher = self.clone();
        let id = select_id.to_string();
        self.document.add_change_listener(
            select_id,
            Rc::new(move || {
                fetcher.load_detail(&id, &targets);
            }),
        )
    }

    /// Fetch the selected boxer and fill `targets` when the response arrives
    pub fn load_detail(&self, select_id: &str, targets: &ElementIdSet) -> LoadRequest {
        let boxer_id = match self.document.select_value(select_id) {
            Some(value) if !value.is_empty() => value,
            _ => {
                debug!(select_id, "no boxer selected");
                return LoadRequest::Skipped;
            }
        };

        let url = self.api.boxer_url(&boxer_id);
        debug!(select_id, %url, "requesting boxer details");

        let document = Rc::clone(&self.document);
        let targets = targets.clone();
        let request_url = url.clone();
        self.http.get(
            &url,
            Box::new(move |outcome| {
                match fill_panel(document.as_ref(), &targets, &request_url, outcome) {
                    Ok(record) => info!(
                        url = %request_url,
                        boxer = record.display_name(),
                        "boxer panel updated"
                    ),
                    Err(err) => warn!(error = %err, "boxer panel left unchanged"),
                }
            }),
        );

        LoadRequest::Requested { url }
    }
}

fn fill_panel(
    document: &dyn Document,
    targets: &ElementIdSet,
    url: &str,
    outcome: Result<HttpResponse, FetchError>,
) -> RingsideResult<BoxerRecord> {
    let response = outcome.map_err(|source| RingsideError::Fetch {
        url: url.to_string(),
        source,
    })?;

    if !response.is_ok() {
        if let Some(message) = ApiErrorBody::message(&response.body) {
            debug!(url, status = response.status, message = %message, "API reported an error");
        }
        return Err(RingsideError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    let record = BoxerRecord::from_json(&response.body)?;
    panel::apply(document, &panel::render(targets, &record))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{AbortReason, MockDocument, MockNetwork, MockResponse};

    fn setup() -> (MockDocument, MockNetwork, DetailFetcher, ElementIdSet) {
        let document = MockDocument::new();
        let network = MockNetwork::new();
        let targets = ElementIdSet::for_slot("fighter1");
        document.add_select("fighter1-select");
        document.add_panel(&targets);
        let fetcher = DetailFetcher::new(
            Rc::new(document.clone()),
            Rc::new(network.clone()),
            ApiConfig::default(),
        );
        (document, network, fetcher, targets)
    }

    #[test]
    fn test_empty_selection_skips_request() {
        let (_document, network, fetcher, targets) = setup();
        assert_eq!(fetcher.load_detail("fighter1-select", &targets), LoadRequest::Skipped);
        assert_eq!(network.request_count(), 0);
    }

    #[test]
    fn test_missing_dropdown_skips_request() {
        let (_document, network, fetcher, targets) = setup();
        assert_eq!(fetcher.load_detail("fighter9-select", &targets), LoadRequest::Skipped);
        assert_eq!(network.request_count(), 0);
    }

    #[test]
    fn test_selected_id_is_encoded() {
        let (document, network, fetcher, targets) = setup();
        document.set_select_value("fighter1-select", "a/b c");
        let request = fetcher.load_detail("fighter1-select", &targets);
        assert_eq!(
            request,
            LoadRequest::Requested {
                url: "/api/boxer/a%2Fb%20c".into()
            }
        );
        assert_eq!(network.requests(), vec!["/api/boxer/a%2Fb%20c".to_string()]);
    }

    #[test]
    fn test_success_fills_panel() {
        let (document, network, fetcher, targets) = setup();
        network.route(
            "/api/boxer/42",
            MockResponse::json(r#"{"alias":"Iron Mike","height_cm":178}"#),
        );
        document.set_select_value("fighter1-select", "42");

        fetcher.load_detail("fighter1-select", &targets);
        assert_eq!(document.text("fighter1-alias").as_deref(), Some(""));
        network.flush();

        assert_eq!(document.text("fighter1-alias").as_deref(), Some("Iron Mike"));
        assert_eq!(document.text("fighter1-height").as_deref(), Some("Height: 178 cm"));
        assert_eq!(document.text("fighter1-reach").as_deref(), Some("Reach: -- cm"));
    }

    #[test]
    fn test_failures_leave_panel_unchanged() {
        let responses = [
            MockResponse::error(404, "Boxer not found"),
            MockResponse::text(500, "Internal Server Error"),
            MockResponse::json("{not json"),
            MockResponse::json("[]"),
            MockResponse::json(r#"["/evil.png", "Alias"]"#),
            MockResponse::json("null"),
        ];
        for response in responses {
            let (document, network, fetcher, targets) = setup();
            let before = document.snapshot();
            network.route("/api/boxer/7", response);
            document.set_select_value("fighter1-select", "7");

            fetcher.load_detail("fighter1-select", &targets);
            network.flush();

            assert_eq!(document.snapshot(), before);
        }
    }

    #[test]
    fn test_mistyped_extra_field_still_fills_panel() {
        let (document, network, fetcher, targets) = setup();
        network.route(
            "/api/boxer/42",
            MockResponse::json(
                r#"{"alias":"Iron Mike","height_cm":178,"wins_by_ko":"44","elo_rating":"1890","fights":[{"id":"1"}]}"#,
            ),
        );
        document.set_select_value("fighter1-select", "42");

        fetcher.load_detail("fighter1-select", &targets);
        network.flush();

        assert_eq!(document.text("fighter1-alias").as_deref(), Some("Iron Mike"));
        assert_eq!(document.text("fighter1-height").as_deref(), Some("Height: 178 cm"));
    }

    #[test]
    fn test_network_abort_leaves_panel_unchanged() {
        let (document, network, fetcher, targets) = setup();
        let before = document.snapshot();
        network.route_abort("/api/boxer/7", AbortReason::ConnectionRefused);
        document.set_select_value("fighter1-select", "7");

        fetcher.load_detail("fighter1-select", &targets);
        network.flush();

        assert_eq!(document.snapshot(), before);
    }

    #[test]
    fn test_missing_node_blocks_whole_update() {
        let document = MockDocument::new();
        let network = MockNetwork::new();
        let targets = ElementIdSet::for_slot("fighter1");
        document.add_select("fighter1-select");
        document.add_panel(&targets);
        document.remove("fighter1-losses");
        let fetcher = DetailFetcher::new(
            Rc::new(document.clone()),
            Rc::new(network.clone()),
            ApiConfig::default(),
        );
        network.route("/api/boxer/1", MockResponse::json(r#"{"alias": "Smokin' Joe"}"#));
        document.set_select_value("fighter1-select", "1");
        let before = document.snapshot();

        fetcher.load_detail("fighter1-select", &targets);
        network.flush();

        assert_eq!(document.snapshot(), before);
    }

    #[test]
    fn test_bind_dropdown_loads_on_change() {
        let (document, network, fetcher, targets) = setup();
        network.route("/api/boxer/3", MockResponse::json(r#"{"wins": 3}"#));
        fetcher.bind_dropdown("fighter1-select", targets).unwrap();

        document.select("fighter1-select", "3");
        network.flush();

        assert_eq!(document.text("fighter1-wins").as_deref(), Some("Wins: 3"));
    }

    #[test]
    fn test_bind_missing_dropdown_errors() {
        let (_document, _network, fetcher, targets) = setup();
        assert!(matches!(
            fetcher.bind_dropdown("nope", targets),
            Err(RingsideError::ElementNotFound { .. })
        ));
    }
}
