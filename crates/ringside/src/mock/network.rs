//! Mock HTTP client with route interception.
//!
//! Requests never complete on their own: they queue up until the test calls
//! [`MockNetwork::respond_next`], [`MockNetwork::respond_latest`] or
//! [`MockNetwork::flush`]. The outcome is decided by the first matching route
//! at completion time; unmatched URLs answer `404 {"error": "Not found"}`.

use crate::dom::{HttpClient, HttpResponse, ResponseCallback};
use crate::result::FetchError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Reasons for aborting a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbortReason {
    /// Request failed
    Failed,
    /// Request timed out
    TimedOut,
    /// Connection was refused
    ConnectionRefused,
    /// Connection was reset
    ConnectionReset,
    /// Internet is disconnected
    InternetDisconnected,
    /// Request was blocked by client
    BlockedByClient,
}

impl AbortReason {
    /// Browser error string for this reason
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Failed => "net::ERR_FAILED",
            Self::TimedOut => "net::ERR_TIMED_OUT",
            Self::ConnectionRefused => "net::ERR_CONNECTION_REFUSED",
            Self::ConnectionReset => "net::ERR_CONNECTION_RESET",
            Self::InternetDisconnected => "net::ERR_INTERNET_DISCONNECTED",
            Self::BlockedByClient => "net::ERR_BLOCKED_BY_CLIENT",
        }
    }
}

/// A mocked HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
    /// Content type
    pub content_type: String,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            content_type: "application/json".to_string(),
        }
    }
}

impl MockResponse {
    /// Create an empty 200 response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 200 with a raw JSON body (not validated, so malformed bodies can be served)
    #[must_use]
    pub fn json(body: &str) -> Self {
        Self {
            body: body.to_string(),
            ..Self::default()
        }
    }

    /// Plain-text response
    #[must_use]
    pub fn text(status: u16, content: &str) -> Self {
        Self {
            status,
            body: content.to_string(),
            content_type: "text/plain".to_string(),
        }
    }

    /// `{"error": message}` with the given status
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
            content_type: "application/json".to_string(),
        }
    }

    /// Set status code
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    fn into_http(self) -> HttpResponse {
        HttpResponse::new(self.status, self.body)
    }
}

/// Pattern for matching request URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Prefix(pattern) => url.starts_with(pattern.as_str()),
            Self::Any => true,
        }
    }
}

/// Action to take when a route matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Respond with a mock response
    Respond(MockResponse),
    /// Fail the request without a response
    Abort(AbortReason),
}

/// A route definition for interception
#[derive(Debug, Clone)]
pub struct Route {
    /// URL pattern to match
    pub pattern: UrlPattern,
    /// What to do on a match
    pub action: RouteAction,
    /// Number of times this route should be used (None = unlimited)
    pub times: Option<usize>,
    /// Number of times this route has been matched
    pub match_count: usize,
}

impl Route {
    /// Create a new route
    #[must_use]
    pub fn new(pattern: UrlPattern, action: RouteAction) -> Self {
        Self {
            pattern,
            action,
            times: None,
            match_count: 0,
        }
    }

    /// Set how many times this route should match
    #[must_use]
    pub const fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Check if this route matches a request
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        if let Some(max) = self.times {
            if self.match_count >= max {
                return false;
            }
        }
        self.pattern.matches(url)
    }
}

struct PendingRequest {
    url: String,
    done: ResponseCallback,
}

#[derive(Default)]
struct NetworkState {
    routes: Vec<Route>,
    requests: Vec<String>,
    pending: VecDeque<PendingRequest>,
}

impl NetworkState {
    fn outcome_for(&mut self, url: &str) -> Result<HttpResponse, FetchError> {
        let Some(route) = self.routes.iter_mut().find(|r| r.matches(url)) else {
            return Ok(MockResponse::error(404, "Not found").into_http());
        };
        route.match_count += 1;
        match &route.action {
            RouteAction::Respond(response) => Ok(response.clone().into_http()),
            RouteAction::Abort(reason) => Err(FetchError::network(reason.message())),
        }
    }
}

/// Shared mock network
#[derive(Clone, Default)]
pub struct MockNetwork {
    state: Rc<RefCell<NetworkState>>,
}

impl std::fmt::Debug for MockNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockNetwork")
            .field("routes", &state.routes)
            .field("requests", &state.requests)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl MockNetwork {
    /// No routes, nothing pending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route
    pub fn add_route(&self, route: Route) {
        self.state.borrow_mut().routes.push(route);
    }

    /// Answer `url` with `response`
    pub fn route(&self, url: &str, response: MockResponse) {
        self.add_route(Route::new(
            UrlPattern::Exact(url.to_string()),
            RouteAction::Respond(response),
        ));
    }

    /// Fail `url` with a network error
    pub fn route_abort(&self, url: &str, reason: AbortReason) {
        self.add_route(Route::new(
            UrlPattern::Exact(url.to_string()),
            RouteAction::Abort(reason),
        ));
    }

    /// Every URL requested so far, in request order
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state.borrow().requests.clone()
    }

    /// Number of requests made so far
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    /// Requests still waiting for a response
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Complete the oldest pending request
    pub fn respond_next(&self) -> bool {
        self.complete(|pending| pending.pop_front())
    }

    /// Complete the newest pending request (out-of-order arrival)
    pub fn respond_latest(&self) -> bool {
        self.complete(|pending| pending.pop_back())
    }

    /// Complete every pending request in request order; returns how many
    pub fn flush(&self) -> usize {
        let mut completed = 0;
        while self.respond_next() {
            completed += 1;
        }
        completed
    }

    fn complete(
        &self,
        take: impl FnOnce(&mut VecDeque<PendingRequest>) -> Option<PendingRequest>,
    ) -> bool {
        // The callback runs with no borrow held: it may issue new requests
        let next = {
            let mut state = self.state.borrow_mut();
            take(&mut state.pending).map(|request| {
                let outcome = state.outcome_for(&request.url);
                (request.done, outcome)
            })
        };
        match next {
            Some((done, outcome)) => {
                done(outcome);
                true
            }
            None => false,
        }
    }
}

impl HttpClient for MockNetwork {
    fn get(&self, url: &str, done: ResponseCallback) {
        let mut state = self.state.borrow_mut();
        state.requests.push(url.to_string());
        state.pending.push_back(PendingRequest {
            url: url.to_string(),
            done,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture() -> (
        Rc<RefCell<Vec<Result<HttpResponse, FetchError>>>>,
        ResponseCallback,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Box::new(move |outcome| sink.borrow_mut().push(outcome)))
    }

    #[test]
    fn test_requests_wait_for_flush() {
        let network = MockNetwork::new();
        network.route("/api/boxer/1", MockResponse::json(r#"{"wins": 1}"#));
        let (seen, done) = capture();

        network.get("/api/boxer/1", done);
        assert!(seen.borrow().is_empty());
        assert_eq!(network.pending_count(), 1);

        assert_eq!(network.flush(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![Ok(HttpResponse::new(200, r#"{"wins": 1}"#))]
        );
    }

    #[test]
    fn test_unmatched_is_404() {
        let network = MockNetwork::new();
        let (seen, done) = capture();
        network.get("/api/boxer/999", done);
        network.flush();
        let outcome = seen.borrow_mut().pop().unwrap().unwrap();
        assert_eq!(outcome.status, 404);
        assert!(outcome.body.contains("Not found"));
    }

    #[test]
    fn test_abort_route() {
        let network = MockNetwork::new();
        network.route_abort("/api/boxer/1", AbortReason::InternetDisconnected);
        let (seen, done) = capture();
        network.get("/api/boxer/1", done);
        network.flush();
        assert_eq!(
            *seen.borrow(),
            vec![Err(FetchError::network("net::ERR_INTERNET_DISCONNECTED"))]
        );
    }

    #[test]
    fn test_route_times_limit() {
        let network = MockNetwork::new();
        network.add_route(
            Route::new(
                UrlPattern::Prefix("/api/boxer/".into()),
                RouteAction::Respond(MockResponse::json("{}")),
            )
            .times(1),
        );
        let (first, done) = capture();
        network.get("/api/boxer/1", done);
        let (second, done) = capture();
        network.get("/api/boxer/2", done);

        assert_eq!(network.flush(), 2);
        assert_eq!(first.borrow()[0].as_ref().unwrap().status, 200);
        assert_eq!(second.borrow()[0].as_ref().unwrap().status, 404);
        assert_eq!(network.request_count(), 2);
    }

    #[test]
    fn test_respond_latest_reorders() {
        let network = MockNetwork::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for url in ["/a", "/b"] {
            let order = Rc::clone(&order);
            network.get(url, Box::new(move |_| order.borrow_mut().push(url)));
        }
        assert!(network.respond_latest());
        assert!(network.respond_next());
        assert!(!network.respond_next());
        assert_eq!(*order.borrow(), vec!["/b", "/a"]);
    }

    #[test]
    fn test_error_response_body() {
        let response = MockResponse::error(404, "Boxer not found");
        assert_eq!(response.status, 404);
        assert_eq!(response.body, r#"{"error":"Boxer not found"}"#);
        assert_eq!(MockResponse::new().with_status(503).status, 503);
    }
}
