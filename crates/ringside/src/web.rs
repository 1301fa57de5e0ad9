//! Browser backend (wasm32 only).
//!
//! Implements the [`dom`](crate::dom) traits over `web_sys` and mounts the
//! page once the DOM is ready. Promises are driven with `spawn_local`; timers
//! use `gloo_timers`.
//!
//! A page may override the defaults with
//! `<script type="application/json" id="ringside-config">{...}</script>`.

use crate::config::PageConfig;
use crate::dom::{
    dom_is_ready, AudioElement, ChangeHandler, Document, FormElement, FormSelector, HttpClient,
    HttpResponse, PlaybackCallback, ResponseCallback, TimerTask, Timers,
};
use crate::page::{wire_page, Page};
use crate::result::{FetchError, PlaybackError, RingsideError, RingsideResult};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Id of the optional JSON configuration element
pub const CONFIG_ELEMENT_ID: &str = "ringside-config";

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

fn playback_error(value: &JsValue) -> PlaybackError {
    match value.dyn_ref::<web_sys::DomException>() {
        Some(exception) => {
            PlaybackError::from_dom_exception(&exception.name(), &exception.message())
        }
        None => PlaybackError::Other(js_message(value)),
    }
}

/// `HTMLAudioElement`
struct WebAudio(web_sys::HtmlAudioElement);

impl AudioElement for WebAudio {
    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            warn!(error = %js_message(&err), "pause failed");
        }
    }

    fn rewind(&self) {
        self.0.set_current_time(0.0);
    }

    fn play(&self, done: PlaybackCallback) {
        let promise = match self.0.play() {
            Ok(promise) => promise,
            Err(err) => {
                done(Err(playback_error(&err)));
                return;
            }
        };
        spawn_local(async move {
            let outcome = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| playback_error(&err));
            done(outcome);
        });
    }
}

/// `HTMLFormElement`
struct WebForm(web_sys::HtmlFormElement);

impl FormElement for WebForm {
    fn submit(&self) {
        if let Err(err) = self.0.submit() {
            warn!(error = %js_message(&err), "form submission failed");
        }
    }
}

/// The live document
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    /// Wrap a document
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The window's document, if there is one
    #[must_use]
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    fn element(&self, id: &str) -> RingsideResult<web_sys::Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| RingsideError::not_found(id))
    }

    fn typed<T: JsCast>(&self, id: &str, expected: &'static str) -> RingsideResult<T> {
        self.element(id)?
            .dyn_into::<T>()
            .map_err(|_| RingsideError::ElementKind {
                id: id.to_string(),
                expected,
            })
    }

    /// Page configuration from the config element, or the defaults
    #[must_use]
    pub fn page_config(&self) -> PageConfig {
        let json = self
            .document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content());
        PageConfig::from_embedded(json.as_deref())
    }
}

impl Document for WebDocument {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn audio_element(&self, id: &str) -> Option<Rc<dyn AudioElement>> {
        self.typed::<web_sys::HtmlAudioElement>(id, "audio")
            .ok()
            .map(|audio| Rc::new(WebAudio(audio)) as Rc<dyn AudioElement>)
    }

    fn form_element(&self, selector: &FormSelector) -> Option<Rc<dyn FormElement>> {
        let form = match selector {
            FormSelector::Id(id) => self.typed::<web_sys::HtmlFormElement>(id, "form").ok(),
            FormSelector::FirstInDocument => self
                .document
                .query_selector("form")
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<web_sys::HtmlFormElement>().ok()),
        };
        form.map(|form| Rc::new(WebForm(form)) as Rc<dyn FormElement>)
    }

    fn select_value(&self, id: &str) -> Option<String> {
        self.typed::<web_sys::HtmlSelectElement>(id, "select")
            .ok()
            .map(|select| select.value())
    }

    fn set_text_content(&self, id: &str, text: &str) -> RingsideResult<()> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_image_source(&self, id: &str, src: &str) -> RingsideResult<()> {
        self.typed::<web_sys::HtmlImageElement>(id, "img")?.set_src(src);
        Ok(())
    }

    fn add_change_listener(&self, id: &str, handler: ChangeHandler) -> RingsideResult<()> {
        let element = self.element(id)?;
        let closure = Closure::<dyn FnMut()>::new(move || handler());
        element
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(|err| RingsideError::ListenerBinding {
                id: id.to_string(),
                event: "change",
                message: js_message(&err),
            })?;
        // Listener lives as long as the page
        closure.forget();
        Ok(())
    }
}

/// `setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTimers;

impl Timers for WebTimers {
    fn set_timeout(&self, delay: Duration, task: TimerTask) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}

/// `window.fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHttp;

async fn fetch_text(url: String) -> Result<HttpResponse, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::network("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(|err| FetchError::network(js_message(&err)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| FetchError::network("fetch did not produce a Response"))?;
    let status = response.status();
    let text = response.text().map_err(|err| FetchError::Body {
        message: js_message(&err),
    })?;
    let body = JsFuture::from(text)
        .await
        .map_err(|err| FetchError::Body {
            message: js_message(&err),
        })?
        .as_string()
        .unwrap_or_default();
    Ok(HttpResponse::new(status, body))
}

impl HttpClient for WebHttp {
    fn get(&self, url: &str, done: ResponseCallback) {
        let url = url.to_string();
        spawn_local(async move {
            done(fetch_text(url).await);
        });
    }
}

fn mount() {
    let Some(document) = WebDocument::current() else {
        warn!("no document, fighter page not wired");
        return;
    };
    let config = document.page_config();
    let page = wire_page(
        Rc::new(document),
        Rc::new(WebTimers),
        Rc::new(WebHttp),
        &config,
    );
    info!(bound = ?page.report().bound, "ringside mounted");
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
}

/// Wire the page as soon as the DOM is ready
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if dom_is_ready(&document.ready_state()) {
        mount();
    } else {
        let on_ready = Closure::once_into_js(mount);
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    }
    Ok(())
}

/// Click handler for the "Fight!" button
#[wasm_bindgen(js_name = triggerSubmit)]
pub fn trigger_submit() {
    let path = PAGE.with(|slot| slot.borrow().as_ref().map(Page::trigger_submit));
    if path.is_none() {
        warn!("triggerSubmit called before the page was wired");
    }
}
