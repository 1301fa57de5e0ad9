//! Page Configuration
//!
//! Element ids, the bell delay and the API path the page behaviors use.
//! [`PageConfig::default`] matches the fighter-selection template; a page can
//! override any of it with a JSON document.

use crate::dom::FormSelector;
use crate::panel::ElementIdSet;
use crate::result::{RingsideError, RingsideResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::warn;

/// Id of the bell `<audio>` element
pub const DEFAULT_AUDIO_ID: &str = "ding-ding";
/// Delay between the bell starting and the form submitting
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 2000;
/// Path prefix of the boxer detail endpoint
pub const DEFAULT_BOXER_PATH: &str = "/api/boxer";

/// Submit gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Id of the `<audio>` element played before submitting
    pub audio_id: String,
    /// Which form to submit
    pub form: FormSelector,
    /// Milliseconds between playback start and submission
    pub delay_ms: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            audio_id: DEFAULT_AUDIO_ID.to_string(),
            form: FormSelector::FirstInDocument,
            delay_ms: DEFAULT_SUBMIT_DELAY_MS,
        }
    }
}

impl SubmitConfig {
    /// Delay as a `Duration`
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Detail API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path prefix; the boxer id is appended as one path segment
    pub boxer_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            boxer_path: DEFAULT_BOXER_PATH.to_string(),
        }
    }
}

impl ApiConfig {
    /// URL of one boxer's record, e.g. `/api/boxer/42`
    #[must_use]
    pub fn boxer_url(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.boxer_path.trim_end_matches('/'),
            encode_uri_component(id)
        )
    }
}

/// One dropdown and the panel it fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Id of the `<select>` element
    pub select_id: String,
    /// Ids of the panel nodes
    pub targets: ElementIdSet,
}

impl SlotConfig {
    /// Slot named `slot`: `{slot}-select` plus [`ElementIdSet::for_slot`]
    #[must_use]
    pub fn named(slot: &str) -> Self {
        Self {
            select_id: format!("{slot}-select"),
            targets: ElementIdSet::for_slot(slot),
        }
    }
}

/// Complete page configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Bell and form
    pub submit: SubmitConfig,
    /// Detail endpoint
    pub api: ApiConfig,
    /// Fighter dropdowns, in wiring order
    pub slots: Vec<SlotConfig>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            submit: SubmitConfig::default(),
            api: ApiConfig::default(),
            slots: vec![SlotConfig::named("fighter1"), SlotConfig::named("fighter2")],
        }
    }
}

impl PageConfig {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration; missing keys take defaults
    pub fn from_json_str(json: &str) -> RingsideResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration embedded in the page, or the defaults.
    ///
    /// Blank or missing text means "use the defaults". Text that does not
    /// parse or validate is logged and also falls back to the defaults.
    #[must_use]
    pub fn from_embedded(json: Option<&str>) -> Self {
        match json.map(str::trim) {
            Some(text) if !text.is_empty() => Self::from_json_str(text).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring embedded page configuration");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Check ids are non-empty and slots do not share nodes
    pub fn validate(&self) -> RingsideResult<()> {
        if self.submit.audio_id.is_empty() {
            return Err(RingsideError::invalid_config("submit.audio_id is empty"));
        }
        if matches!(&self.submit.form, FormSelector::Id(id) if id.is_empty()) {
            return Err(RingsideError::invalid_config("submit.form id is empty"));
        }
        if self.api.boxer_path.is_empty() {
            return Err(RingsideError::invalid_config("api.boxer_path is empty"));
        }

        for (i, slot) in self.slots.iter().enumerate() {
            if slot.select_id.is_empty() {
                return Err(RingsideError::invalid_config(format!(
                    "slots[{i}].select_id is empty"
                )));
            }
            if slot.targets.ids().iter().any(|id| id.is_empty()) {
                return Err(RingsideError::invalid_config(format!(
                    "slots[{i}] has an empty target id"
                )));
            }
            for (j, other) in self.slots.iter().enumerate().skip(i + 1) {
                if slot.select_id == other.select_id || slot.targets.overlaps(&other.targets) {
                    return Err(RingsideError::invalid_config(format!(
                        "slots[{i}] and slots[{j}] share element ids"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Builder for `PageConfig`
#[derive(Debug, Clone, Default)]
pub struct PageConfigBuilder {
    config: PageConfig,
}

impl PageConfigBuilder {
    /// Set the bell audio element id
    #[must_use]
    pub fn audio_id(mut self, id: &str) -> Self {
        self.config.submit.audio_id = id.to_string();
        self
    }

    /// Submit the form with this id instead of the first form
    #[must_use]
    pub fn form_id(mut self, id: &str) -> Self {
        self.config.submit.form = FormSelector::Id(id.to_string());
        self
    }

    /// Set the delay between playback start and submission
    #[must_use]
    pub fn submit_delay_ms(mut self, ms: u64) -> Self {
        self.config.submit.delay_ms = ms;
        self
    }

    /// Set the boxer API path prefix
    #[must_use]
    pub fn boxer_path(mut self, path: &str) -> Self {
        self.config.api.boxer_path = path.to_string();
        self
    }

    /// Replace the slots
    #[must_use]
    pub fn slots(mut self, slots: Vec<SlotConfig>) -> Self {
        self.config.slots = slots;
        self
    }

    /// Validate and build
    pub fn build(self) -> RingsideResult<PageConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Percent-encode like JavaScript's `encodeURIComponent`
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
