//! Bell-gated form submission.
//!
//! Clicking "Fight!" rings the bell and submits the form a fixed delay after
//! the bell starts playing. Anything that prevents the bell (no audio element,
//! autoplay refusal, unsupported source) submits immediately instead; the bell
//! can never keep the form from being submitted.
//!
//! Triggers are not de-duplicated: two clicks inside the delay schedule two
//! submissions.

use crate::config::SubmitConfig;
use crate::dom::{Document, FormElement, FormSelector, Timers};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// Which branch a trigger took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPath {
    /// No form on the page; nothing happened
    NoForm,
    /// No bell on the page; the form was submitted right away
    Immediate,
    /// Playback was requested; submission follows its outcome
    AwaitingPlayback,
}

/// Submits a form after the bell starts
pub struct SubmitGate {
    document: Rc<dyn Document>,
    timers: Rc<dyn Timers>,
    audio_id: String,
    form: FormSelector,
    delay: Duration,
}

impl std::fmt::Debug for SubmitGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitGate")
            .field("audio_id", &self.audio_id)
            .field("form", &self.form)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl SubmitGate {
    /// Create a gate over `document`
    #[must_use]
    pub fn new(document: Rc<dyn Document>, timers: Rc<dyn Timers>, config: &SubmitConfig) -> Self {
        Self {
            document,
            timers,
            audio_id: config.audio_id.clone(),
            form: config.form.clone(),
            delay: config.delay(),
        }
    }

    /// Ring the bell and submit.
    ///
    /// Never fails. The returned path only reports what was done.
    pub fn trigger_submit(&self) -> SubmitPath {
        let Some(form) = self.document.form_element(&self.form) else {
            warn!(form = %self.form, "no form to submit");
            return SubmitPath::NoForm;
        };
        let Some(bell) = self.document.audio_element(&self.audio_id) else {
            debug!(audio_id = %self.audio_id, "no bell, submitting immediately");
            form.submit();
            return SubmitPath::Immediate;
        };

        bell.pause();
        bell.rewind();

        let timers = Rc::clone(&self.timers);
        let delay = self.delay;
        bell.play(Box::new(move |outcome| match outcome {
            Ok(()) => {
                debug!(delay_ms = delay.as_millis() as u64, "bell started, submission scheduled");
                schedule_submit(timers.as_ref(), delay, form);
            }
            Err(err) => {
                warn!(error = %err, "bell failed to play, submitting immediately");
                form.submit();
            }
        }));
        SubmitPath::AwaitingPlayback
    }
}

fn schedule_submit(timers: &dyn Timers, delay: Duration, form: Rc<dyn FormElement>) {
    timers.set_timeout(delay, Box::new(move || form.submit()));
}
