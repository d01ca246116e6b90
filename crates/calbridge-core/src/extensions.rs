//! Extension properties that carry JSCalendar-only data on a legacy event.
//!
//! The converters do not call these hooks. Callers that want the type tag,
//! locale, virtual-location features and participant kinds/roles to survive
//! a trip through the legacy format call [`export_extensions`] after
//! [`calendar_object_to_event`](crate::convert::calendar_object_to_event)
//! and [`import_extensions`] after
//! [`event_to_calendar_object`](crate::convert::event_to_calendar_object).
//!
//! List values are comma-separated wire tokens, e.g.
//! `X-JSCALENDAR-VIRTUAL-FEATURES-virtual-1: audio,video`.
//!
//! Per-participant properties are keyed by the id the participant gets back
//! from the forward converter (`organizer` or `participant-<n>`), not by its
//! id in the exported object.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::convert::{ORGANIZER_ID, participant_id, strip_mailto};
use crate::jscalendar::{CalendarObject, ObjectType, ParticipantKind, ParticipantRole, VirtualFeature};
use crate::legacy::LegacyEvent;

/// Product identifier of the producing application.
pub const PRODID: &str = "PRODID";
/// The calendar object's `type` tag.
pub const TYPE_PROPERTY: &str = "X-JSCALENDAR-TYPE";
/// The calendar object's `locale`.
pub const LOCALE_PROPERTY: &str = "X-JSCALENDAR-LOCALE";
/// Prefix for per-virtual-location feature lists.
pub const VIRTUAL_FEATURES_PREFIX: &str = "X-JSCALENDAR-VIRTUAL-FEATURES-";
/// Prefix for per-participant kinds.
pub const PARTICIPANT_KIND_PREFIX: &str = "X-JSCALENDAR-PARTICIPANT-KIND-";
/// Prefix for per-participant role lists.
pub const PARTICIPANT_ROLES_PREFIX: &str = "X-JSCALENDAR-PARTICIPANT-ROLES-";

/// Writes JSCalendar-only data from `object` into `event`'s extension properties.
///
/// Ids are upper-cased along with the rest of the property name, matching
/// how iCalendar treats property names.
pub fn export_extensions(object: &CalendarObject, event: &mut LegacyEvent) {
    event.set_extension(TYPE_PROPERTY, object.object_type.as_str());

    if let Some(ref locale) = object.locale {
        event.set_extension(LOCALE_PROPERTY, locale.as_str());
    }

    if let Some(ref prod_id) = object.prod_id {
        event.set_extension(PRODID, prod_id.as_str());
    }

    for (id, location) in &object.virtual_locations {
        if location.features.is_empty() {
            continue;
        }
        let features = join_tokens(location.features.iter().map(VirtualFeature::as_str));
        event.set_extension(&format!("{VIRTUAL_FEATURES_PREFIX}{id}"), features);
    }

    for (object_id, id) in legacy_participant_ids(object, event) {
        let participant = &object.participants[object_id];
        if let Some(kind) = participant.kind {
            event.set_extension(&format!("{PARTICIPANT_KIND_PREFIX}{id}"), kind.as_str());
        }
        if !participant.roles.is_empty() {
            let roles = join_tokens(participant.roles.iter().map(ParticipantRole::as_str));
            event.set_extension(&format!("{PARTICIPANT_ROLES_PREFIX}{id}"), roles);
        }
    }
}

/// Pairs each participant id in `object` with the id the forward converter
/// will give the organizer or attendee it became in `event`.
///
/// Follows the reverse converter's selection: the first organizer-role
/// participant in key order is the organizer, and participants with an
/// email are matched to the first unclaimed attendee with that address.
/// Participants that did not make it into `event` are left out.
fn legacy_participant_ids<'a>(
    object: &'a CalendarObject,
    event: &LegacyEvent,
) -> BTreeMap<&'a str, String> {
    let mut ids = BTreeMap::new();
    let mut organizer_taken = event.organizer.is_none();
    let mut claimed = vec![false; event.attendees.len()];

    for (object_id, participant) in &object.participants {
        if participant.is_organizer() {
            if !organizer_taken {
                organizer_taken = true;
                ids.insert(object_id.as_str(), ORGANIZER_ID.to_string());
            }
            continue;
        }

        let Some(email) = participant.email.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        let email = strip_mailto(email);
        let slot = event
            .attendees
            .iter()
            .zip(&claimed)
            .position(|(attendee, taken)| !taken && attendee.email == email);
        match slot {
            Some(index) => {
                claimed[index] = true;
                ids.insert(object_id.as_str(), participant_id(index));
            }
            None => debug!(participant = %object_id, "No attendee for participant, not exported"),
        }
    }

    ids
}

/// Restores JSCalendar-only data from `event`'s extension properties into `object`.
///
/// Per-id properties only apply to ids already present in `object`; ids
/// are matched case-insensitively. Unknown tokens are skipped.
pub fn import_extensions(event: &LegacyEvent, object: &mut CalendarObject) {
    if let Some(value) = event.extension(TYPE_PROPERTY) {
        match ObjectType::from_token(value) {
            Some(object_type) => object.object_type = object_type,
            None => debug!(value, "Unknown object type in extension property"),
        }
    }

    if let Some(locale) = event.extension(LOCALE_PROPERTY) {
        object.locale = Some(locale.to_string());
    }

    if let Some(prod_id) = event.extension(PRODID) {
        object.prod_id = Some(prod_id.to_string());
    }

    for (id, location) in object.virtual_locations.iter_mut() {
        if let Some(value) = event.extension(&format!("{VIRTUAL_FEATURES_PREFIX}{id}")) {
            location.features = split_tokens(value, VirtualFeature::from_token);
        }
    }

    for (id, participant) in object.participants.iter_mut() {
        if let Some(value) = event.extension(&format!("{PARTICIPANT_KIND_PREFIX}{id}")) {
            participant.kind = ParticipantKind::from_token(value.trim());
        }
        if let Some(value) = event.extension(&format!("{PARTICIPANT_ROLES_PREFIX}{id}")) {
            participant.roles = split_tokens(value, ParticipantRole::from_token);
        }
    }
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(",")
}

fn split_tokens<T: Ord>(value: &str, parse: impl Fn(&str) -> Option<T>) -> BTreeSet<T> {
    value
        .split(',')
        .filter_map(|token| {
            let parsed = parse(token.trim());
            if parsed.is_none() {
                debug!(token, "Skipping unknown token in extension property");
            }
            parsed
        })
        .collect()
}
