//! Conversion between legacy events and JSCalendar objects.
//!
//! This module handles the two directions of the mapping:
//! - [`event_to_calendar_object`]: [`LegacyEvent`] to [`CalendarObject`]
//! - [`calendar_object_to_event`]: [`CalendarObject`] to [`LegacyEvent`]
//!
//! Neither direction fails. Values that cannot be carried over (an
//! unparseable start, an unknown time zone, a participant without an
//! address) degrade to absent fields and are reported through `tracing`.
//!
//! The mapping is lossy. X- properties, extra locations, extra virtual
//! locations and extra organizers do not survive a round trip unless the
//! [`extensions`](crate::extensions) hooks are used.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use tracing::{debug, warn};

use crate::datetime::{format_date_time, parse_date_time, resolve_time_zone};
use crate::duration::{format_duration, parse_duration};
use crate::extensions::PRODID;
use crate::jscalendar::{
    CalendarObject, Link, Location, Participant, ParticipantKind, ParticipantRole,
    ParticipationStatus,
};
use crate::legacy::{
    Attachment, Attendee, AttendeeRole, LegacyDateTime, LegacyEvent, Organizer,
};
use crate::links::virtual_location_for;
use crate::roles::{role_to_legacy, roles_from_legacy, status_from_legacy, status_to_legacy};

/// Participant id used for the organizer.
pub const ORGANIZER_ID: &str = "organizer";
/// Location id used for the LOCATION property.
pub const LOCATION_ID: &str = "location-1";
/// Virtual location id used for a meeting URL.
pub const VIRTUAL_LOCATION_ID: &str = "virtual-1";
/// Location type given to the LOCATION property.
pub const PHYSICAL_LOCATION_TYPE: &str = "physical";

/// Returns the participant id for the attendee at `index`.
pub fn participant_id(index: usize) -> String {
    format!("participant-{}", index)
}

/// Returns the link id for the attachment at `index`.
pub fn attachment_id(index: usize) -> String {
    format!("attachment-{}", index)
}

/// Converts a [`LegacyEvent`] to a JSCalendar `Event` object.
///
/// # Example
///
/// ```
/// use calbridge_core::convert::event_to_calendar_object;
/// use calbridge_core::legacy::{Attendee, LegacyEvent};
///
/// let event = LegacyEvent::new("E1")
///     .with_summary("Standup")
///     .with_attendee(Attendee::new("a@example.com"));
/// let object = event_to_calendar_object(&event);
///
/// assert_eq!(object.uid, "E1");
/// assert!(object.participants.contains_key("participant-0"));
/// ```
pub fn event_to_calendar_object(event: &LegacyEvent) -> CalendarObject {
    let mut object = CalendarObject::new(&event.uid);
    object.title = event.summary.clone();
    object.description = event.description.clone();
    object.participants = participants_from_event(event);

    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        object.locations.insert(
            LOCATION_ID.to_string(),
            Location {
                name: Some(location.to_string()),
                location_types: [PHYSICAL_LOCATION_TYPE.to_string()].into(),
                ..Location::default()
            },
        );
    }

    if let Some(ref url) = event.url {
        match virtual_location_for(url) {
            Some(virtual_location) => {
                object
                    .virtual_locations
                    .insert(VIRTUAL_LOCATION_ID.to_string(), virtual_location);
            }
            None => debug!(uid = %event.uid, url = %url, "URL is not a meeting link, not mapped"),
        }
    }

    if let Some(ref start) = event.start {
        object.start = Some(format_date_time(start.instant));
        object.time_zone = start.time_zone.map(|tz| tz.name().to_string());

        if let Some(ref end) = event.end {
            let seconds = (end.instant - start.instant).num_seconds();
            object.duration = Some(format_duration(seconds));
        }
    }

    object.categories = event
        .categories
        .iter()
        .map(|category| (category.clone(), true))
        .collect();

    object.links = event
        .attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| (attachment_id(index), Link::new(&attachment.uri)))
        .collect();

    object.prod_id = event.extension(PRODID).map(str::to_string);

    debug!(
        uid = %object.uid,
        participants = object.participants.len(),
        links = object.links.len(),
        "Converted legacy event to calendar object"
    );

    object
}

/// Builds the participant map: one entry per attendee plus the organizer.
fn participants_from_event(event: &LegacyEvent) -> BTreeMap<String, Participant> {
    let mut participants: BTreeMap<String, Participant> = event
        .attendees
        .iter()
        .enumerate()
        .map(|(index, attendee)| (participant_id(index), participant_from_attendee(attendee)))
        .collect();

    if let Some(ref organizer) = event.organizer {
        let participant = Participant {
            name: organizer.common_name.clone(),
            email: non_empty(&organizer.email),
            kind: Some(ParticipantKind::Individual),
            roles: [ParticipantRole::Owner, ParticipantRole::Chair].into(),
            participation_status: Some(ParticipationStatus::Accepted),
            expect_reply: Some(false),
            language: None,
        };
        participants.insert(ORGANIZER_ID.to_string(), participant);
    }

    participants
}

fn participant_from_attendee(attendee: &Attendee) -> Participant {
    Participant {
        name: attendee.common_name.clone(),
        email: non_empty(&attendee.email),
        kind: Some(ParticipantKind::Individual),
        roles: roles_from_legacy(attendee.role.as_ref()),
        participation_status: status_from_legacy(attendee.status.as_ref()),
        expect_reply: Some(attendee.rsvp),
        language: None,
    }
}

/// Converts a JSCalendar object to a [`LegacyEvent`].
///
/// Participants are visited in ascending id order. The first one holding
/// the `owner` or `chair` role becomes the organizer; any later ones are
/// dropped. Other participants become attendees if they have an email
/// address and are dropped otherwise.
///
/// # Example
///
/// ```
/// use calbridge_core::convert::calendar_object_to_event;
/// use calbridge_core::jscalendar::CalendarObject;
///
/// let mut object = CalendarObject::new("E1");
/// object.start = Some("2024-01-15T09:00:00Z".to_string());
/// object.duration = Some("PT30M".to_string());
///
/// let event = calendar_object_to_event(&object);
/// let start = event.start.unwrap();
/// let end = event.end.unwrap();
/// assert_eq!((end.instant - start.instant).num_minutes(), 30);
/// ```
pub fn calendar_object_to_event(object: &CalendarObject) -> LegacyEvent {
    let mut event = LegacyEvent::new(&object.uid);
    event.summary = object.title.clone();
    event.description = object.description.clone();

    event.start = object.start.as_deref().and_then(|value| {
        let Some(instant) = parse_date_time(value) else {
            warn!(uid = %object.uid, start = value, "Dropping unparseable start");
            return None;
        };
        let time_zone = resolve_time_zone(object.time_zone.as_deref());
        Some(LegacyDateTime::zoned(instant, time_zone))
    });

    event.end = match (object.duration.as_deref(), event.start) {
        (Some(duration), Some(start)) => end_from_duration(&start, duration),
        (Some(_), None) => {
            debug!(uid = %object.uid, "Duration without a start, no end computed");
            None
        }
        _ => None,
    };

    for (id, participant) in &object.participants {
        if participant.is_organizer() {
            if event.organizer.is_some() {
                warn!(uid = %object.uid, participant = %id, "Dropping additional organizer");
                continue;
            }
            event.organizer = Some(organizer_from_participant(participant));
        } else if let Some(email) = participant.email.as_deref().filter(|e| !e.is_empty()) {
            event
                .attendees
                .push(attendee_from_participant(participant, email));
        } else {
            debug!(uid = %object.uid, participant = %id, "Dropping participant without email");
        }
    }

    event.location = object
        .locations
        .values()
        .next()
        .and_then(|location| location.name.clone());

    event.url = object
        .virtual_locations
        .values()
        .find_map(|location| location.uri.clone());

    event.categories = object.categories.keys().cloned().collect();

    event.attachments = object
        .links
        .values()
        .map(|link| Attachment {
            uri: link.href.clone(),
            media_type: link.content_type.clone(),
        })
        .collect();

    debug!(
        uid = %event.uid,
        attendees = event.attendees.len(),
        has_organizer = event.organizer.is_some(),
        "Converted calendar object to legacy event"
    );

    event
}

/// Adds a wire duration to a start, keeping the start's zone.
fn end_from_duration(start: &LegacyDateTime, duration: &str) -> Option<LegacyDateTime> {
    let seconds = parse_duration(duration);
    let instant = TimeDelta::try_seconds(seconds)
        .and_then(|delta| start.instant.checked_add_signed(delta));

    match instant {
        Some(instant) => Some(LegacyDateTime {
            instant,
            time_zone: start.time_zone,
        }),
        None => {
            warn!(duration, "Duration out of range, no end computed");
            None
        }
    }
}

fn organizer_from_participant(participant: &Participant) -> Organizer {
    Organizer {
        email: participant
            .email
            .as_deref()
            .map(strip_mailto)
            .unwrap_or_default(),
        common_name: participant.name.clone(),
        role: Some(AttendeeRole::Chair),
    }
}

fn attendee_from_participant(participant: &Participant, email: &str) -> Attendee {
    Attendee {
        email: strip_mailto(email),
        common_name: participant.name.clone(),
        role: Some(role_to_legacy(&participant.roles)),
        status: Some(status_to_legacy(participant.participation_status.as_ref())),
        rsvp: participant.expect_reply.unwrap_or(false),
    }
}

pub(crate) fn strip_mailto(address: &str) -> String {
    address
        .strip_prefix("mailto:")
        .unwrap_or(address)
        .to_string()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod golden_tests;
