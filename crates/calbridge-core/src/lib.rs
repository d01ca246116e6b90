//! Core types: legacy events, JSCalendar objects, field mappings, converters

pub mod convert;
pub mod datetime;
pub mod duration;
pub mod error;
pub mod extensions;
pub mod jscalendar;
pub mod legacy;
pub mod links;
pub mod roles;
pub mod tracing;

pub use convert::{calendar_object_to_event, event_to_calendar_object};
pub use datetime::{format_date_time, local_time_zone, parse_date_time, resolve_time_zone};
pub use duration::{format_duration, parse_duration};
pub use error::{CoreError, CoreResult};
pub use extensions::{export_extensions, import_extensions};
pub use jscalendar::{
    CalendarObject, Link, Location, ObjectType, Participant, ParticipantKind, ParticipantRole,
    VirtualFeature, VirtualLocation,
};
pub use legacy::{Attachment, Attendee, AttendeeRole, LegacyDateTime, LegacyEvent, Organizer};
pub use links::{MeetingProvider, is_virtual_meeting_url, meeting_features};
pub use crate::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
