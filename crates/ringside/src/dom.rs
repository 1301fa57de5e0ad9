//! Browser Abstractions
//!
//! The page behaviors never touch `web_sys` directly. They talk to these
//! traits, which the `web` backend implements on top of the real DOM and the
//! [`mock`](crate::mock) module implements for deterministic tests.
//!
//! Asynchronous browser APIs (`HTMLMediaElement.play()`, `setTimeout`,
//! `fetch`) are expressed as continuations: the caller hands over a boxed
//! `FnOnce` that runs exactly once when the operation settles. Everything is
//! single-threaded, so handles are `Rc` and nothing is `Send`.

use crate::result::{FetchError, PlaybackError, RingsideResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Continuation for an audio playback request
pub type PlaybackCallback = Box<dyn FnOnce(Result<(), PlaybackError>)>;

/// Continuation for an HTTP request
pub type ResponseCallback = Box<dyn FnOnce(Result<HttpResponse, FetchError>)>;

/// Task scheduled on a timer
pub type TimerTask = Box<dyn FnOnce()>;

/// Handler bound to an element's `change` event
pub type ChangeHandler = Rc<dyn Fn()>;

/// How the submit gate finds its form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSelector {
    /// The form with this element id
    Id(String),
    /// The first `<form>` in document order
    #[default]
    FirstInDocument,
}

impl fmt::Display for FormSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "form#{id}"),
            Self::FirstInDocument => write!(f, "form"),
        }
    }
}

/// Whether a `document.readyState` value means the DOM is parsed
#[must_use]
pub fn dom_is_ready(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// An `<audio>` element
pub trait AudioElement {
    /// Pause playback
    fn pause(&self);

    /// Seek to time zero
    fn rewind(&self);

    /// Request playback; `done` runs once playback has started or failed
    fn play(&self, done: PlaybackCallback);
}

/// A `<form>` element
pub trait FormElement {
    /// Submit the form (no `submit` event, like `HTMLFormElement.submit()`)
    fn submit(&self);
}

/// The document the page behaviors operate on
pub trait Document {
    /// Whether an element with this id exists
    fn has_element(&self, id: &str) -> bool;

    /// Look up an `<audio>` element by id
    fn audio_element(&self, id: &str) -> Option<Rc<dyn AudioElement>>;

    /// Look up a form
    fn form_element(&self, selector: &FormSelector) -> Option<Rc<dyn FormElement>>;

    /// Current value of a `<select>` element, `None` if it does not exist
    fn select_value(&self, id: &str) -> Option<String>;

    /// Replace an element's text content
    fn set_text_content(&self, id: &str, text: &str) -> RingsideResult<()>;

    /// Set an `<img>` element's source
    fn set_image_source(&self, id: &str, src: &str) -> RingsideResult<()>;

    /// Bind a handler to an element's `change` event
    fn add_change_listener(&self, id: &str, handler: ChangeHandler) -> RingsideResult<()>;
}

/// One-shot timers (`setTimeout`)
pub trait Timers {
    /// Run `task` once after `delay`
    fn set_timeout(&self, delay: Duration, task: TimerTask);
}

/// A completed HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is exactly 200
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Asynchronous HTTP GET
pub trait HttpClient {
    /// Issue a GET for `url`; `done` runs once with the response or failure
    fn get(&self, url: &str, done: ResponseCallback);
}
