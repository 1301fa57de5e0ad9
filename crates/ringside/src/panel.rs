//! Detail panel rendering.
//!
//! A [`BoxerRecord`] is turned into a list of [`NodeUpdate`]s first and only
//! then written to the document, so a panel whose nodes are incomplete is
//! left untouched instead of half-updated.

use crate::dom::Document;
use crate::record::{BoxerRecord, StatValue};
use crate::result::{RingsideError, RingsideResult};
use serde::{Deserialize, Serialize};

/// Shown in place of an absent or falsy value
pub const PLACEHOLDER: &str = "--";

/// Element ids of one detail panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementIdSet {
    /// `<img>` showing the photo
    pub photo: String,
    /// Alias text (no label)
    pub alias: String,
    /// "Height: … cm"
    pub height: String,
    /// "Reach: … cm"
    pub reach: String,
    /// "Stance: …"
    pub stance: String,
    /// "Eras: …"
    pub era: String,
    /// "Wins: …"
    pub wins: String,
    /// "Losses: …"
    pub losses: String,
    /// "Ko Ratio: …"
    pub ko_ratio: String,
    /// "Win Ratio: …"
    pub win_ratio: String,
}

impl ElementIdSet {
    /// Ids following the page's `{slot}-{field}` naming, e.g. `fighter1-height`
    #[must_use]
    pub fn for_slot(slot: &str) -> Self {
        let id = |field: &str| format!("{slot}-{field}");
        Self {
            photo: id("photo"),
            alias: id("alias"),
            height: id("height"),
            reach: id("reach"),
            stance: id("stance"),
            era: id("eras"),
            wins: id("wins"),
            losses: id("losses"),
            ko_ratio: id("ko-ratio"),
            win_ratio: id("win-ratio"),
        }
    }

    /// All ids, photo first
    #[must_use]
    pub fn ids(&self) -> [&str; 10] {
        [
            self.photo.as_str(),
            self.alias.as_str(),
            self.height.as_str(),
            self.reach.as_str(),
            self.stance.as_str(),
            self.era.as_str(),
            self.wins.as_str(),
            self.losses.as_str(),
            self.ko_ratio.as_str(),
            self.win_ratio.as_str(),
        ]
    }

    /// Whether any id is shared with `other`
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let theirs = other.ids();
        self.ids().iter().any(|id| theirs.contains(id))
    }
}

/// What to write into a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Replace the text content
    Text(String),
    /// Replace an image source
    ImageSource(String),
}

/// A pending write to one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUpdate {
    /// Target element id
    pub id: String,
    /// New content
    pub content: NodeContent,
}

impl NodeUpdate {
    fn text(id: &str, text: String) -> Self {
        Self {
            id: id.to_string(),
            content: NodeContent::Text(text),
        }
    }
}

fn stat_or_placeholder(value: Option<&StatValue>) -> String {
    value
        .filter(|v| v.is_truthy())
        .map_or_else(|| PLACEHOLDER.to_string(), ToString::to_string)
}

fn labeled(label: &str, value: Option<&StatValue>) -> String {
    format!("{label}: {}", stat_or_placeholder(value))
}

/// Compute the writes for a record.
///
/// The photo node is skipped when the record carries no photo; every other
/// node is always written.
#[must_use]
pub fn render(targets: &ElementIdSet, record: &BoxerRecord) -> Vec<NodeUpdate> {
    let mut updates = Vec::with_capacity(10);

    if let Some(photo) = &record.photo {
        updates.push(NodeUpdate {
            id: targets.photo.clone(),
            content: NodeContent::ImageSource(photo.clone()),
        });
    }
    updates.push(NodeUpdate::text(
        &targets.alias,
        record.alias.clone().unwrap_or_default(),
    ));
    updates.push(NodeUpdate::text(
        &targets.height,
        format!("{} cm", labeled("Height", record.height_cm.as_ref())),
    ));
    updates.push(NodeUpdate::text(
        &targets.reach,
        format!("{} cm", labeled("Reach", record.reach_cm.as_ref())),
    ));
    updates.push(NodeUpdate::text(
        &targets.stance,
        labeled("Stance", record.stance.as_ref()),
    ));
    updates.push(NodeUpdate::text(
        &targets.ko_ratio,
        labeled("Ko Ratio", record.ko_ratio.as_ref()),
    ));
    updates.push(NodeUpdate::text(
        &targets.win_ratio,
        labeled("Win Ratio", record.win_ratio.as_ref()),
    ));
    updates.push(NodeUpdate::text(
        &targets.wins,
        labeled("Wins", record.wins.as_ref()),
    ));
    updates.push(NodeUpdate::text(
        &targets.losses,
        labeled("Losses", record.losses.as_ref()),
    ));
    updates.push(NodeUpdate::text(
        &targets.era,
        labeled("Eras", record.eras.as_ref()),
    ));

    updates
}

/// Write updates to the document, all or nothing.
///
/// Every target must exist before the first write happens.
pub fn apply(document: &dyn Document, updates: &[NodeUpdate]) -> RingsideResult<()> {
    if let Some(missing) = updates.iter().find(|u| !document.has_element(&u.id)) {
        return Err(RingsideError::not_found(&missing.id));
    }

    for update in updates {
        match &update.content {
            NodeContent::Text(text) => document.set_text_content(&update.id, text)?,
            NodeContent::ImageSource(src) => document.set_image_source(&update.id, src)?,
        }
    }
    Ok(())
}
