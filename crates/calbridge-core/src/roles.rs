//! Role and participation-status mapping tables.
//!
//! | iCalendar ROLE    | JSCalendar roles  |
//! |-------------------|-------------------|
//! | `CHAIR`           | `chair`           |
//! | `REQ-PARTICIPANT` | `attendee`        |
//! | `OPT-PARTICIPANT` | `optional`        |
//! | `NON-PARTICIPANT` | `informational`   |
//! | absent / other    | `attendee`        |
//!
//! Statuses map one to one; unmapped values are absent going forward and
//! `NEEDS-ACTION` going back.

use std::collections::BTreeSet;

use crate::jscalendar::{self, ParticipantRole};
use crate::legacy::{self, AttendeeRole};

/// Maps an attendee ROLE to a JSCalendar role set.
pub fn roles_from_legacy(role: Option<&AttendeeRole>) -> BTreeSet<ParticipantRole> {
    let role = match role {
        Some(AttendeeRole::Chair) => ParticipantRole::Chair,
        Some(AttendeeRole::OptionalParticipant) => ParticipantRole::Optional,
        Some(AttendeeRole::NonParticipant) => ParticipantRole::Informational,
        Some(AttendeeRole::RequiredParticipant | AttendeeRole::Other(_)) | None => {
            ParticipantRole::Attendee
        }
    };
    BTreeSet::from([role])
}

/// Maps a JSCalendar role set back to a single ROLE.
///
/// Only the first role in set order is considered.
pub fn role_to_legacy(roles: &BTreeSet<ParticipantRole>) -> AttendeeRole {
    match roles.first() {
        Some(ParticipantRole::Chair) => AttendeeRole::Chair,
        Some(ParticipantRole::Optional) => AttendeeRole::OptionalParticipant,
        Some(ParticipantRole::Informational) => AttendeeRole::NonParticipant,
        Some(ParticipantRole::Attendee | ParticipantRole::Owner) | None => {
            AttendeeRole::RequiredParticipant
        }
    }
}

/// Maps a PARTSTAT to a JSCalendar participation status.
pub fn status_from_legacy(
    status: Option<&legacy::ParticipationStatus>,
) -> Option<jscalendar::ParticipationStatus> {
    use jscalendar::ParticipationStatus as Js;
    use legacy::ParticipationStatus as Ical;

    match status? {
        Ical::NeedsAction => Some(Js::NeedsAction),
        Ical::Accepted => Some(Js::Accepted),
        Ical::Declined => Some(Js::Declined),
        Ical::Tentative => Some(Js::Tentative),
        Ical::Delegated => Some(Js::Delegated),
        Ical::Completed | Ical::InProcess | Ical::Other(_) => None,
    }
}

/// Maps a JSCalendar participation status back to a PARTSTAT.
pub fn status_to_legacy(
    status: Option<&jscalendar::ParticipationStatus>,
) -> legacy::ParticipationStatus {
    use jscalendar::ParticipationStatus as Js;
    use legacy::ParticipationStatus as Ical;

    match status {
        Some(Js::Accepted) => Ical::Accepted,
        Some(Js::Declined) => Ical::Declined,
        Some(Js::Tentative) => Ical::Tentative,
        Some(Js::Delegated) => Ical::Delegated,
        Some(Js::NeedsAction) | None => Ical::NeedsAction,
    }
}
