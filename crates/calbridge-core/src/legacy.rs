//! Legacy (iCalendar-style) event records.
//!
//! This module provides the property-bag event representation that the
//! converters read from and write to:
//! - [`LegacyEvent`]: One VEVENT-like record with its scalar properties
//! - [`LegacyDateTime`]: An instant plus the time zone it was expressed in
//! - [`Organizer`] / [`Attendee`]: Calendar users attached to the event
//! - [`Attachment`]: An ATTACH property (URI plus optional media type)
//!
//! Parsing of the full iCalendar grammar lives outside this crate; these
//! records hold values that have already been resolved.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// The ROLE parameter of an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttendeeRole {
    /// Chair of the calendar entity.
    Chair,
    /// Participation is required.
    RequiredParticipant,
    /// Participation is optional.
    OptionalParticipant,
    /// Copied for information purposes only.
    NonParticipant,
    /// An x-name or IANA token this crate does not know.
    Other(String),
}

impl AttendeeRole {
    /// Returns the iCalendar token for this role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chair => "CHAIR",
            Self::RequiredParticipant => "REQ-PARTICIPANT",
            Self::OptionalParticipant => "OPT-PARTICIPANT",
            Self::NonParticipant => "NON-PARTICIPANT",
            Self::Other(token) => token,
        }
    }
}

impl FromStr for AttendeeRole {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "CHAIR" => Self::Chair,
            "REQ-PARTICIPANT" => Self::RequiredParticipant,
            "OPT-PARTICIPANT" => Self::OptionalParticipant,
            "NON-PARTICIPANT" => Self::NonParticipant,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for AttendeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The PARTSTAT parameter of an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParticipationStatus {
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
    /// Only meaningful for VTODO; has no JSCalendar event counterpart.
    Completed,
    /// Only meaningful for VTODO; has no JSCalendar event counterpart.
    InProcess,
    /// An x-name or IANA token this crate does not know.
    Other(String),
}

impl ParticipationStatus {
    /// Returns the iCalendar token for this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NeedsAction => "NEEDS-ACTION",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Tentative => "TENTATIVE",
            Self::Delegated => "DELEGATED",
            Self::Completed => "COMPLETED",
            Self::InProcess => "IN-PROCESS",
            Self::Other(token) => token,
        }
    }
}

impl FromStr for ParticipationStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "NEEDS-ACTION" => Self::NeedsAction,
            "ACCEPTED" => Self::Accepted,
            "DECLINED" => Self::Declined,
            "TENTATIVE" => Self::Tentative,
            "DELEGATED" => Self::Delegated,
            "COMPLETED" => Self::Completed,
            "IN-PROCESS" => Self::InProcess,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both parameter enums travel as their iCalendar tokens in JSON.
macro_rules! token_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                let Ok(value) = token.parse::<$ty>();
                Ok(value)
            }
        }
    };
}

token_serde!(AttendeeRole);
token_serde!(ParticipationStatus);

/// A DTSTART/DTEND value: the instant plus the zone it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDateTime {
    /// The instant, normalized to UTC.
    pub instant: DateTime<Utc>,
    /// The TZID the value was expressed in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<Tz>,
}

impl LegacyDateTime {
    /// Creates a date-time without a time zone.
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            time_zone: None,
        }
    }

    /// Creates a date-time expressed in the given zone.
    pub fn zoned(instant: DateTime<Utc>, time_zone: Tz) -> Self {
        Self {
            instant,
            time_zone: Some(time_zone),
        }
    }

    /// Returns the instant rendered in its own zone, or UTC when it has none.
    pub fn local(&self) -> DateTime<Tz> {
        self.instant.with_timezone(&self.time_zone.unwrap_or(Tz::UTC))
    }
}

/// The ORGANIZER of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    /// Calendar address without the `mailto:` scheme. May be empty.
    pub email: String,
    /// The CN parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// The ROLE parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AttendeeRole>,
}

impl Organizer {
    /// Creates an organizer with the given address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            common_name: None,
            role: None,
        }
    }

    /// Builder method to set the common name.
    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    /// Builder method to set the role.
    pub fn with_role(mut self, role: AttendeeRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// An ATTENDEE of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Calendar address without the `mailto:` scheme.
    pub email: String,
    /// The CN parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// The ROLE parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AttendeeRole>,
    /// The PARTSTAT parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ParticipationStatus>,
    /// The RSVP parameter.
    #[serde(default)]
    pub rsvp: bool,
}

impl Attendee {
    /// Creates an attendee with the given address and no parameters.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            common_name: None,
            role: None,
            status: None,
            rsvp: false,
        }
    }

    /// Builder method to set the common name.
    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    /// Builder method to set the role.
    pub fn with_role(mut self, role: AttendeeRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Builder method to set the participation status.
    pub fn with_status(mut self, status: ParticipationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder method to set the RSVP flag.
    pub fn with_rsvp(mut self, rsvp: bool) -> Self {
        self.rsvp = rsvp;
        self
    }
}

/// An ATTACH property referencing a URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub uri: String,
    /// The FMTTYPE parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Attachment {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// A legacy calendar event.
///
/// Holds the subset of VEVENT properties that the JSCalendar mapping
/// understands. Anything else can ride along in [`LegacyEvent::extensions`],
/// keyed by upper-case property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyEvent {
    /// The UID property.
    pub uid: String,
    /// The SUMMARY property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// The DESCRIPTION property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The DTSTART property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<LegacyDateTime>,
    /// The DTEND property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<LegacyDateTime>,
    /// The ORGANIZER property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
    /// ATTENDEE properties in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    /// The LOCATION property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// The URL property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// CATEGORIES values in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// ATTACH properties in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// PRODID and X- properties, keyed by upper-case name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

impl LegacyEvent {
    /// Creates an event with only a UID.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    /// Parses an event from its JSON form.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the event as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns an extension property by name (case-insensitive).
    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Sets an extension property, upper-casing its name.
    pub fn set_extension(&mut self, name: &str, value: impl Into<String>) {
        self.extensions
            .insert(name.to_ascii_uppercase(), value.into());
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the start.
    pub fn with_start(mut self, start: LegacyDateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method to set the end.
    pub fn with_end(mut self, end: LegacyDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: Organizer) -> Self {
        self.organizer = Some(organizer);
        self
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to add a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Builder method to add an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Builder method to set an extension property.
    pub fn with_extension(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_extension(name, value);
        self
    }
}
