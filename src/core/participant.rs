//! Roster data model: participants, announcement text, and the tracked list message.
//!
//! These types are persisted as JSON. Field names are camelCase; the legacy names
//! `userId`, `discordName` and `robloxUsn` are still accepted on read.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used by placeholder slots.
pub const PLACEHOLDER_NAME: &str = "-";

/// Validated roster identifier such as `PS1`.
///
/// Obtained through [`crate::core::roster::RosterStore::entity`], which checks it
/// against the configured list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Normalizes a raw identifier: trimmed and uppercased.
    pub(crate) fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem used for persistence (`ps1`).
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One slot of a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// External user reference (Discord user id); `None` or empty when unset
    #[serde(default, alias = "userId")]
    pub identity: Option<String>,
    /// Label shown when no mention is available
    #[serde(default, alias = "discordName")]
    pub display_name: String,
    /// Free-form username in another system (game username)
    #[serde(default, alias = "robloxUsn")]
    pub secondary_handle: String,
    /// Status flag shown as a glyph
    #[serde(default = "default_status")]
    pub status: bool,
}

const fn default_status() -> bool {
    true
}

impl Participant {
    /// Creates a participant with `status = true`.
    #[must_use]
    pub fn new(
        identity: Option<String>,
        display_name: impl Into<String>,
        secondary_handle: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            secondary_handle: secondary_handle.into(),
            status: true,
        }
    }

    /// The identity if it is set and non-empty.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// A placeholder occupies an index but renders as an empty row.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        let name = self.display_name.trim();
        name.is_empty() || name == PLACEHOLDER_NAME
    }

    /// Entries left behind by older revisions: placeholder name or no secondary handle.
    #[must_use]
    pub fn is_invalid_entry(&self) -> bool {
        let handle = self.secondary_handle.trim();
        self.is_placeholder() || handle.is_empty() || handle == PLACEHOLDER_NAME
    }
}

/// Values supplied by a caller adding or editing a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInput {
    /// External user reference
    pub identity: Option<String>,
    /// Display label
    pub display_name: String,
    /// Secondary username
    pub secondary_handle: String,
    /// Explicit status; `None` keeps the existing one on edit, `true` on add
    pub status: Option<bool>,
}

impl ParticipantInput {
    /// Input without an explicit status.
    #[must_use]
    pub fn new(
        identity: Option<String>,
        display_name: impl Into<String>,
        secondary_handle: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            secondary_handle: secondary_handle.into(),
            status: None,
        }
    }

    /// Sets an explicit status.
    #[must_use]
    pub const fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub(crate) fn into_participant(self, fallback_status: bool) -> Participant {
        Participant {
            identity: self.identity.filter(|id| !id.trim().is_empty()),
            display_name: self.display_name.trim().to_string(),
            secondary_handle: self.secondary_handle.trim().to_string(),
            status: self.status.unwrap_or(fallback_status),
        }
    }
}

/// Changes to an existing slot; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantEdit {
    /// New external user reference
    pub identity: Option<String>,
    /// New display label
    pub display_name: Option<String>,
    /// New secondary username
    pub secondary_handle: Option<String>,
    /// New status
    pub status: Option<bool>,
}

impl ParticipantEdit {
    pub(crate) fn apply(self, participant: &mut Participant) {
        if let Some(identity) = self.identity.filter(|id| !id.trim().is_empty()) {
            participant.identity = Some(identity.trim().to_string());
        }
        if let Some(name) = self.display_name.filter(|n| !n.trim().is_empty()) {
            participant.display_name = name.trim().to_string();
        }
        if let Some(handle) = self.secondary_handle {
            participant.secondary_handle = handle.trim().to_string();
        }
        if let Some(status) = self.status {
            participant.status = status;
        }
    }
}

/// Header and footer text shown with a rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Embed title
    #[serde(default)]
    pub title: String,
    /// Free text shown under the list
    #[serde(default)]
    pub info_text: String,
}

impl Announcement {
    /// Default announcement for an entity, interpolating `{entity}` in the template.
    #[must_use]
    pub fn from_template(template: &str, entity: &EntityId) -> Self {
        Self {
            title: template.replace("{entity}", entity.as_str()),
            info_text: String::new(),
        }
    }
}

/// Location of the last rendered list message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedMessageRef {
    /// Channel holding the message
    pub channel_id: u64,
    /// The message itself
    pub message_id: u64,
}

/// Persisted state of one roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// Ordered slots; index + 1 is the slot number
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Header/footer text
    pub announcement: Announcement,
    /// Last rendered list message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracked_message_ref: Option<TrackedMessageRef>,
}

impl Roster {
    /// Empty roster with the given announcement.
    #[must_use]
    pub fn new(announcement: Announcement) -> Self {
        Self {
            participants: Vec::new(),
            announcement,
            tracked_message_ref: None,
        }
    }

    /// Number of slots holding a real participant.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| !p.is_placeholder())
            .count()
    }
}
