//! JSCalendar (RFC 8984 / RFC 9253) object records.
//!
//! [`CalendarObject`] is the JSON-structured side of the mapping. Every map
//! keyed by a generated id is a `BTreeMap`, so iteration and serialization
//! order is ascending key order and output is stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// The `type` tag of a calendar object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    #[default]
    Event,
    Task,
    Group,
    ParticipantReply,
}

impl ObjectType {
    /// Returns the wire token for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Task => "Task",
            Self::Group => "Group",
            Self::ParticipantReply => "ParticipantReply",
        }
    }

    /// Parses a wire token. Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Event" => Some(Self::Event),
            "Task" => Some(Self::Task),
            "Group" => Some(Self::Group),
            "ParticipantReply" => Some(Self::ParticipantReply),
            _ => None,
        }
    }
}

/// What kind of entity a participant is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Individual,
    Group,
    Resource,
    Location,
}

impl ParticipantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Resource => "resource",
            Self::Location => "location",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "individual" => Some(Self::Individual),
            "group" => Some(Self::Group),
            "resource" => Some(Self::Resource),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

/// A role a participant holds.
///
/// The declaration order is the set order: the "first" role of a
/// participant is the lowest variant it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Owner,
    Attendee,
    Optional,
    Informational,
    Chair,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Attendee => "attendee",
            Self::Optional => "optional",
            Self::Informational => "informational",
            Self::Chair => "chair",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "owner" => Some(Self::Owner),
            "attendee" => Some(Self::Attendee),
            "optional" => Some(Self::Optional),
            "informational" => Some(Self::Informational),
            "chair" => Some(Self::Chair),
            _ => None,
        }
    }

    /// Returns true for roles that make a participant the organizer.
    pub fn is_organizer_role(&self) -> bool {
        matches!(self, Self::Owner | Self::Chair)
    }
}

/// A participant's reply to the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationStatus {
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
}

/// A feature a virtual location supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualFeature {
    Audio,
    Chat,
    Feed,
    Moderator,
    Phone,
    Screen,
    Video,
}

impl VirtualFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Chat => "chat",
            Self::Feed => "feed",
            Self::Moderator => "moderator",
            Self::Phone => "phone",
            Self::Screen => "screen",
            Self::Video => "video",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "audio" => Some(Self::Audio),
            "chat" => Some(Self::Chat),
            "feed" => Some(Self::Feed),
            "moderator" => Some(Self::Moderator),
            "phone" => Some(Self::Phone),
            "screen" => Some(Self::Screen),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Serializes a set as a JSCalendar boolean map (`{"owner": true}`).
///
/// Deserialization keeps the keys whose value is `true` and that name a
/// known token; other keys are skipped.
mod set_as_map {
    use std::collections::{BTreeMap, BTreeSet};

    use serde::de::value::{Error as ValueError, StrDeserializer};
    use serde::de::{DeserializeOwned, IntoDeserializer};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tracing::debug;

    pub fn serialize<T, S>(set: &BTreeSet<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize + Ord,
        S: Serializer,
    {
        serializer.collect_map(set.iter().map(|item| (item, true)))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
    where
        T: DeserializeOwned + Ord,
        D: Deserializer<'de>,
    {
        let map = BTreeMap::<String, bool>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .filter(|(_, present)| *present)
            .filter_map(|(key, _)| {
                let token: StrDeserializer<'_, ValueError> = key.as_str().into_deserializer();
                let item = T::deserialize(token).ok();
                if item.is_none() {
                    debug!(key = %key, "Skipping unknown token in boolean map");
                }
                item
            })
            .collect())
    }
}

/// A participant in a calendar object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Participant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParticipantKind>,
    #[serde(with = "set_as_map", skip_serializing_if = "BTreeSet::is_empty")]
    pub roles: BTreeSet<ParticipantRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participation_status: Option<ParticipationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expect_reply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Participant {
    /// Creates an empty participant.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_kind(mut self, kind: ParticipantKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_role(mut self, role: ParticipantRole) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn with_status(mut self, status: ParticipationStatus) -> Self {
        self.participation_status = Some(status);
        self
    }

    pub fn with_expect_reply(mut self, expect_reply: bool) -> Self {
        self.expect_reply = Some(expect_reply);
        self
    }

    /// Returns true if this participant holds the owner or chair role.
    pub fn is_organizer(&self) -> bool {
        self.roles.iter().any(ParticipantRole::is_organizer_role)
    }
}

/// A physical location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(with = "set_as_map", skip_serializing_if = "BTreeSet::is_empty")]
    pub location_types: BTreeSet<String>,
    /// A `geo:` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// An online meeting endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(with = "set_as_map", skip_serializing_if = "BTreeSet::is_empty")]
    pub features: BTreeSet<VirtualFeature>,
}

/// A link to an external resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }
}

/// A JSCalendar object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarObject {
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Internet date-time with offset or `Z` suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Hour/minute/second ISO 8601 duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub participants: BTreeMap<String, Participant>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, Location>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub virtual_locations: BTreeMap<String, VirtualLocation>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prod_id: Option<String>,
}

impl CalendarObject {
    /// Creates an `Event` object with the given UID.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    /// Parses an object from its JSON form.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the object as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method to add a participant under the given id.
    pub fn with_participant(mut self, id: impl Into<String>, participant: Participant) -> Self {
        self.participants.insert(id.into(), participant);
        self
    }

    /// Builder method to add a location under the given id.
    pub fn with_location(mut self, id: impl Into<String>, location: Location) -> Self {
        self.locations.insert(id.into(), location);
        self
    }

    /// Builder method to add a virtual location under the given id.
    pub fn with_virtual_location(
        mut self,
        id: impl Into<String>,
        location: VirtualLocation,
    ) -> Self {
        self.virtual_locations.insert(id.into(), location);
        self
    }

    /// Builder method to add a link under the given id.
    pub fn with_link(mut self, id: impl Into<String>, link: Link) -> Self {
        self.links.insert(id.into(), link);
        self
    }
}
