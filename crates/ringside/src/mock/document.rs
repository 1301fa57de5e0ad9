//! In-memory document.
//!
//! Holds just the element kinds the fighter page uses (selects, text nodes,
//! images, audio, forms) in document order, plus `change` listeners.
//! Listeners run with no internal borrow held, so a handler may read and
//! write the document freely.

use super::audio::MockAudio;
use super::timers::MockTimers;
use crate::dom::{AudioElement, ChangeHandler, Document, FormElement, FormSelector};
use crate::panel::ElementIdSet;
use crate::result::{RingsideError, RingsideResult};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

/// Mock `<form>`; records when it was submitted
#[derive(Clone, Default)]
pub struct MockForm {
    submitted_at: Rc<RefCell<Vec<Duration>>>,
    clock: Option<MockTimers>,
}

impl std::fmt::Debug for MockForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockForm")
            .field("submitted_at", &self.submitted_at.borrow())
            .finish_non_exhaustive()
    }
}

impl MockForm {
    /// Number of submissions
    #[must_use]
    pub fn submit_count(&self) -> usize {
        self.submitted_at.borrow().len()
    }

    /// Fake-clock time of each submission (zero without a clock)
    #[must_use]
    pub fn submitted_at(&self) -> Vec<Duration> {
        self.submitted_at.borrow().clone()
    }
}

impl FormElement for MockForm {
    fn submit(&self) {
        let at = self.clock.as_ref().map_or(Duration::ZERO, MockTimers::now);
        self.submitted_at.borrow_mut().push(at);
    }
}

#[derive(Debug, Clone)]
enum MockElement {
    Select { value: String },
    Text { text: String },
    Image { src: String },
    Audio(MockAudio),
    Form(MockForm),
}

#[derive(Default)]
struct DocumentState {
    elements: Vec<(String, MockElement)>,
    listeners: HashMap<String, Vec<ChangeHandler>>,
    writes: usize,
}

impl DocumentState {
    fn get(&self, id: &str) -> Option<&MockElement> {
        self.elements.iter().find(|(i, _)| i == id).map(|(_, e)| e)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut MockElement> {
        self.elements.iter_mut().find(|(i, _)| i == id).map(|(_, e)| e)
    }

    fn insert(&mut self, id: &str, element: MockElement) {
        match self.get_mut(id) {
            Some(existing) => *existing = element,
            None => self.elements.push((id.to_string(), element)),
        }
    }
}

/// Shared in-memory document
#[derive(Clone, Default)]
pub struct MockDocument {
    state: Rc<RefCell<DocumentState>>,
    clock: Option<MockTimers>,
}

impl std::fmt::Debug for MockDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockDocument")
            .field("elements", &state.elements.len())
            .field("listeners", &state.listeners.len())
            .field("writes", &state.writes)
            .finish()
    }
}

impl MockDocument {
    /// Empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty document whose forms timestamp submissions with `clock`
    #[must_use]
    pub fn with_clock(clock: &MockTimers) -> Self {
        Self {
            state: Rc::default(),
            clock: Some(clock.clone()),
        }
    }

    /// Add a `<select>` with nothing selected
    pub fn add_select(&self, id: &str) {
        self.state.borrow_mut().insert(
            id,
            MockElement::Select {
                value: String::new(),
            },
        );
    }

    /// Add a text node
    pub fn add_text(&self, id: &str, text: &str) {
        self.state.borrow_mut().insert(
            id,
            MockElement::Text {
                text: text.to_string(),
            },
        );
    }

    /// Add an `<img>`
    pub fn add_image(&self, id: &str, src: &str) {
        self.state.borrow_mut().insert(
            id,
            MockElement::Image {
                src: src.to_string(),
            },
        );
    }

    /// Add every node of a detail panel, empty
    pub fn add_panel(&self, targets: &ElementIdSet) {
        self.add_image(&targets.photo, "");
        for id in targets.ids().iter().skip(1) {
            self.add_text(id, "");
        }
    }

    /// Add an `<audio>` element; returns a handle sharing its state
    pub fn add_audio(&self, id: &str, audio: MockAudio) -> MockAudio {
        self.state
            .borrow_mut()
            .insert(id, MockElement::Audio(audio.clone()));
        audio
    }

    /// Add a `<form>`; returns a handle sharing its state
    pub fn add_form(&self, id: &str) -> MockForm {
        let form = MockForm {
            submitted_at: Rc::default(),
            clock: self.clock.clone(),
        };
        self.state
            .borrow_mut()
            .insert(id, MockElement::Form(form.clone()));
        form
    }

    /// Remove an element and its listeners
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.listeners.remove(id);
        let before = state.elements.len();
        state.elements.retain(|(i, _)| i != id);
        state.elements.len() != before
    }

    /// Audio element handle
    #[must_use]
    pub fn audio(&self, id: &str) -> Option<MockAudio> {
        match self.state.borrow().get(id) {
            Some(MockElement::Audio(audio)) => Some(audio.clone()),
            _ => None,
        }
    }

    /// Form handle
    #[must_use]
    pub fn form(&self, id: &str) -> Option<MockForm> {
        match self.state.borrow().get(id) {
            Some(MockElement::Form(form)) => Some(form.clone()),
            _ => None,
        }
    }

    /// Change a select's value without firing `change` (scripted assignment)
    pub fn set_select_value(&self, id: &str, value: &str) -> bool {
        match self.state.borrow_mut().get_mut(id) {
            Some(MockElement::Select { value: current }) => {
                *current = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Pick an option like a user would: set the value, then fire `change`
    pub fn select(&self, id: &str, value: &str) -> bool {
        if !self.set_select_value(id, value) {
            return false;
        }
        self.fire_change(id);
        true
    }

    /// Fire `change` on an element. Returns how many listeners ran.
    pub fn fire_change(&self, id: &str) -> usize {
        let handlers: Vec<ChangeHandler> = self
            .state
            .borrow()
            .listeners
            .get(id)
            .cloned()
            .unwrap_or_default();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    /// Text content of a text node
    #[must_use]
    pub fn text(&self, id: &str) -> Option<String> {
        match self.state.borrow().get(id) {
            Some(MockElement::Text { text }) => Some(text.clone()),
            _ => None,
        }
    }

    /// Source of an image
    #[must_use]
    pub fn image_source(&self, id: &str) -> Option<String> {
        match self.state.borrow().get(id) {
            Some(MockElement::Image { src }) => Some(src.clone()),
            _ => None,
        }
    }

    /// `change` listeners bound to an element
    #[must_use]
    pub fn listener_count(&self, id: &str) -> usize {
        self.state.borrow().listeners.get(id).map_or(0, Vec::len)
    }

    /// Text and image content of every text/image node, by id
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.state
            .borrow()
            .elements
            .iter()
            .filter_map(|(id, element)| match element {
                MockElement::Text { text } => Some((id.clone(), text.clone())),
                MockElement::Image { src } => Some((id.clone(), src.clone())),
                _ => None,
            })
            .collect()
    }

    /// Successful text/image writes so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }
}

impl Document for MockDocument {
    fn has_element(&self, id: &str) -> bool {
        self.state.borrow().get(id).is_some()
    }

    fn audio_element(&self, id: &str) -> Option<Rc<dyn AudioElement>> {
        self.audio(id).map(|a| Rc::new(a) as Rc<dyn AudioElement>)
    }

    fn form_element(&self, selector: &FormSelector) -> Option<Rc<dyn FormElement>> {
        let state = self.state.borrow();
        let form = match selector {
            FormSelector::Id(id) => match state.get(id) {
                Some(MockElement::Form(form)) => Some(form.clone()),
                _ => None,
            },
            FormSelector::FirstInDocument => state.elements.iter().find_map(|(_, e)| match e {
                MockElement::Form(form) => Some(form.clone()),
                _ => None,
            }),
        };
        form.map(|f| Rc::new(f) as Rc<dyn FormElement>)
    }

    fn select_value(&self, id: &str) -> Option<String> {
        match self.state.borrow().get(id) {
            Some(MockElement::Select { value }) => Some(value.clone()),
            _ => None,
        }
    }

    fn set_text_content(&self, id: &str, text: &str) -> RingsideResult<()> {
        let mut state = self.state.borrow_mut();
        match state.get_mut(id) {
            Some(MockElement::Text { text: current }) => *current = text.to_string(),
            Some(_) => {
                return Err(RingsideError::ElementKind {
                    id: id.to_string(),
                    expected: "text",
                })
            }
            None => return Err(RingsideError::not_found(id)),
        }
        state.writes += 1;
        Ok(())
    }

    fn set_image_source(&self, id: &str, src: &str) -> RingsideResult<()> {
        let mut state = self.state.borrow_mut();
        match state.get_mut(id) {
            Some(MockElement::Image { src: current }) => *current = src.to_string(),
            Some(_) => {
                return Err(RingsideError::ElementKind {
                    id: id.to_string(),
                    expected: "img",
                })
            }
            None => return Err(RingsideError::not_found(id)),
        }
        state.writes += 1;
        Ok(())
    }

    fn add_change_listener(&self, id: &str, handler: ChangeHandler) -> RingsideResult<()> {
        let mut state = self.state.borrow_mut();
        if state.get(id).is_none() {
            return Err(RingsideError::not_found(id));
        }
        state
            .listeners
            .entry(id.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::PlaybackBehavior;
    use std::cell::Cell;

    #[test]
    fn test_select_fires_change_listeners() {
        let document = MockDocument::new();
        document.add_select("fighter1-select");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let reader = document.clone();
        document
            .add_change_listener(
                "fighter1-select",
                Rc::new(move || {
                    sink.borrow_mut()
                        .push(reader.select_value("fighter1-select").unwrap_or_default());
                }),
            )
            .unwrap();

        assert!(document.select("fighter1-select", "42"));
        assert_eq!(*seen.borrow(), vec!["42".to_string()]);
        assert!(!document.select("missing", "1"));
    }

    #[test]
    fn test_set_select_value_does_not_fire() {
        let document = MockDocument::new();
        document.add_select("s");
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        document
            .add_change_listener("s", Rc::new(move || counter.set(counter.get() + 1)))
            .unwrap();

        document.set_select_value("s", "9");
        assert_eq!(fired.get(), 0);
        assert_eq!(document.fire_change("s"), 1);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_first_form_in_document_order() {
        let document = MockDocument::new();
        let first = document.add_form("search");
        document.add_form("fight-form");

        document
            .form_element(&FormSelector::FirstInDocument)
            .unwrap()
            .submit();
        assert_eq!(first.submit_count(), 1);
        assert!(document
            .form_element(&FormSelector::Id("nope".into()))
            .is_none());
    }

    #[test]
    fn test_writes_check_element_kind() {
        let document = MockDocument::new();
        document.add_text("alias", "");
        document.add_image("photo", "");
        document.add_audio("bell", MockAudio::new(PlaybackBehavior::Start));

        assert!(document.set_text_content("alias", "Iron Mike").is_ok());
        assert!(document.set_image_source("photo", "/p.png").is_ok());
        assert!(matches!(
            document.set_image_source("alias", "/p.png"),
            Err(RingsideError::ElementKind { expected: "img", .. })
        ));
        assert!(matches!(
            document.set_text_content("gone", "x"),
            Err(RingsideError::ElementNotFound { .. })
        ));
        assert_eq!(document.write_count(), 2);
        assert_eq!(document.text("alias").as_deref(), Some("Iron Mike"));
        assert_eq!(document.image_source("photo").as_deref(), Some("/p.png"));
    }

    #[test]
    fn test_form_uses_clock() {
        let clock = MockTimers::new();
        let document = MockDocument::with_clock(&clock);
        let form = document.add_form("f");
        clock.advance_ms(750);
        form.submit();
        assert_eq!(form.submitted_at(), vec![Duration::from_millis(750)]);
    }

    #[test]
    fn test_remove() {
        let document = MockDocument::new();
        document.add_select("s");
        document
            .add_change_listener("s", Rc::new(|| {}))
            .unwrap();
        assert!(document.remove("s"));
        assert!(!document.has_element("s"));
        assert_eq!(document.listener_count("s"), 0);
        assert!(!document.remove("s"));
    }
}
