//! iCalendar (.ics) adapter for [`LegacyEvent`].
//!
//! Reading goes through the `icalendar` parser, writing through its builder.
//! Only the first VEVENT of a calendar is considered.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::parser::{Property, read_calendar, unfold};
use icalendar::{CalendarDateTime, Component, DatePerhapsTime, EventLike};
use tracing::{debug, warn};

use calbridge_core::datetime::lookup_time_zone;
use calbridge_core::extensions::PRODID;
use calbridge_core::{Attachment, Attendee, AttendeeRole, LegacyDateTime, LegacyEvent, Organizer};

const ICS_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const ICS_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parses the first VEVENT in `content`, reading floating times as UTC.
pub fn parse_legacy_event(content: &str) -> Option<LegacyEvent> {
    parse_legacy_event_in(content, None)
}

/// Parses the first VEVENT in `content`.
///
/// Floating DTSTART/DTEND values (and all-day dates) are read in
/// `floating_zone` when given, UTC otherwise. Returns `None` when the
/// content is not iCalendar or holds no VEVENT with a UID.
pub fn parse_legacy_event_in(content: &str, floating_zone: Option<Tz>) -> Option<LegacyEvent> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let mut event = LegacyEvent::new(vevent.find_prop("UID")?.val.to_string());
    event.summary = vevent.find_prop("SUMMARY").map(|p| p.val.to_string());
    event.description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());
    event.location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());
    event.categories = raw_categories(&unfolded);
    event.url = vevent.find_prop("URL").map(|p| p.val.to_string());

    event.start = vevent
        .find_prop("DTSTART")
        .and_then(|p| parse_date_time(p, floating_zone));
    event.end = vevent
        .find_prop("DTEND")
        .and_then(|p| parse_date_time(p, floating_zone));

    event.organizer = vevent.find_prop("ORGANIZER").map(|p| Organizer {
        email: strip_mailto(p.val.as_ref()),
        common_name: param(p, "CN"),
        role: param(p, "ROLE").map(|r| r.parse::<AttendeeRole>().unwrap_or_else(|e| match e {})),
    });

    for prop in &vevent.properties {
        match prop.name.as_ref() {
            "ATTENDEE" => event.attendees.push(parse_attendee(prop)),
            "ATTACH" => event.attachments.push(Attachment {
                uri: prop.val.to_string(),
                media_type: param(prop, "FMTTYPE"),
            }),
            name if name.starts_with("X-") => {
                event.set_extension(name, prop.val.to_string());
            }
            _ => {}
        }
    }

    if let Some(prod_id) = calendar.properties.iter().find(|p| p.name == PRODID) {
        event.set_extension(PRODID, prod_id.val.to_string());
    }

    debug!(
        uid = %event.uid,
        attendees = event.attendees.len(),
        "parsed VEVENT"
    );
    Some(event)
}

/// Writes `event` as a single-event VCALENDAR.
pub fn generate_ics(event: &LegacyEvent) -> String {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);

    if let Some(ref summary) = event.summary {
        ics_event.summary(summary);
    }
    if let Some(ref description) = event.description {
        ics_event.description(description);
    }
    if let Some(ref start) = event.start {
        add_date_time(&mut ics_event, "DTSTART", start);
    }
    if let Some(ref end) = event.end {
        add_date_time(&mut ics_event, "DTEND", end);
    }
    if let Some(ref location) = event.location {
        ics_event.location(location);
    }
    if let Some(ref url) = event.url {
        ics_event.add_property("URL", url);
    }

    if let Some(ref organizer) = event.organizer {
        let mut prop = icalendar::Property::new("ORGANIZER", mailto(&organizer.email));
        if let Some(ref name) = organizer.common_name {
            prop.add_parameter("CN", name);
        }
        if let Some(ref role) = organizer.role {
            prop.add_parameter("ROLE", role.as_str());
        }
        ics_event.append_property(prop);
    }

    for attendee in &event.attendees {
        let mut prop = icalendar::Property::new("ATTENDEE", mailto(&attendee.email));
        if let Some(ref name) = attendee.common_name {
            prop.add_parameter("CN", name);
        }
        if let Some(ref role) = attendee.role {
            prop.add_parameter("ROLE", role.as_str());
        }
        if let Some(ref status) = attendee.status {
            prop.add_parameter("PARTSTAT", status.as_str());
        }
        if attendee.rsvp {
            prop.add_parameter("RSVP", "TRUE");
        }
        ics_event.append_multi_property(prop);
    }

    for category in &event.categories {
        ics_event.append_multi_property(icalendar::Property::new("CATEGORIES", category));
    }

    for attachment in &event.attachments {
        let mut prop = icalendar::Property::new("ATTACH", &attachment.uri);
        if let Some(ref media_type) = attachment.media_type {
            prop.add_parameter("FMTTYPE", media_type);
        }
        ics_event.append_multi_property(prop);
    }

    for (name, value) in &event.extensions {
        if name.starts_with("X-") {
            ics_event.add_property(name, value);
        }
    }

    let mut calendar = icalendar::Calendar::new();
    calendar.push(ics_event.done());
    let output = calendar.done().to_string();

    match event.extension(PRODID) {
        Some(prod_id) => replace_prod_id(&output, prod_id),
        None => output,
    }
}

fn parse_attendee(prop: &Property) -> Attendee {
    Attendee {
        email: strip_mailto(prop.val.as_ref()),
        common_name: param(prop, "CN"),
        role: param(prop, "ROLE").map(|r| r.parse().unwrap_or_else(|e| match e {})),
        status: param(prop, "PARTSTAT").map(|s| s.parse().unwrap_or_else(|e| match e {})),
        rsvp: param(prop, "RSVP").is_some_and(|v| v.eq_ignore_ascii_case("TRUE")),
    }
}

fn parse_date_time(prop: &Property, floating_zone: Option<Tz>) -> Option<LegacyDateTime> {
    let value = match DatePerhapsTime::try_from(prop) {
        Ok(value) => value,
        Err(_) => {
            warn!(property = %prop.name, value = %prop.val, "unreadable date-time");
            return None;
        }
    };

    match value {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(instant)) => {
            Some(LegacyDateTime::utc(instant))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match lookup_time_zone(&tzid) {
                Some(tz) => in_zone(date_time, tz),
                None => {
                    warn!(tzid = %tzid, "unknown TZID, reading as floating");
                    floating(date_time, floating_zone)
                }
            }
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(date_time)) => {
            floating(date_time, floating_zone)
        }
        DatePerhapsTime::Date(date) => floating(midnight(date), floating_zone),
    }
}

fn floating(date_time: NaiveDateTime, zone: Option<Tz>) -> Option<LegacyDateTime> {
    match zone {
        Some(tz) => in_zone(date_time, tz),
        None => Some(LegacyDateTime::utc(date_time.and_utc())),
    }
}

fn in_zone(date_time: NaiveDateTime, tz: Tz) -> Option<LegacyDateTime> {
    let local = tz.from_local_datetime(&date_time).earliest()?;
    Some(LegacyDateTime::zoned(local.with_timezone(&Utc), tz))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn add_date_time(ics_event: &mut icalendar::Event, name: &str, value: &LegacyDateTime) {
    match value.time_zone {
        Some(tz) => {
            let local = value.instant.with_timezone(&tz);
            let mut prop =
                icalendar::Property::new(name, local.format(ICS_LOCAL_FORMAT).to_string());
            prop.add_parameter("TZID", tz.name());
            ics_event.append_property(prop);
        }
        None => {
            ics_event.add_property(name, value.instant.format(ICS_UTC_FORMAT).to_string());
        }
    }
}

fn param(prop: &Property, key: &str) -> Option<String> {
    prop.params
        .iter()
        .find(|p| p.key == key)
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()))
}

/// Collects CATEGORIES values of the first VEVENT from unfolded text.
///
/// The parser unescapes TEXT values, which makes an escaped comma inside a
/// category indistinguishable from a list separator, so the lists are split
/// on the raw content lines instead.
fn raw_categories(unfolded: &str) -> Vec<String> {
    let mut categories = Vec::new();
    let mut depth = 0usize;
    let mut seen_event = false;

    for line in unfolded.lines() {
        let upper = line.trim_end().to_ascii_uppercase();
        if upper.starts_with("BEGIN:") {
            if depth == 0 && upper == "BEGIN:VEVENT" {
                if seen_event {
                    break;
                }
                seen_event = true;
                depth = 1;
            } else if depth > 0 {
                depth += 1;
            }
            continue;
        }
        if depth == 0 {
            continue;
        }
        if upper.starts_with("END:") {
            depth -= 1;
            continue;
        }
        if depth != 1 || property_name(&upper) != "CATEGORIES" {
            continue;
        }
        if let Some(value) = raw_value(line.trim_end()) {
            categories.extend(
                split_text_list(value)
                    .into_iter()
                    .map(|c| unescape_text(c.trim()))
                    .filter(|c| !c.is_empty()),
            );
        }
    }

    categories
}

fn property_name(line: &str) -> &str {
    let end = line.find([';', ':']).unwrap_or(line.len());
    &line[..end]
}

/// Returns the value part of a content line, skipping quoted parameter values.
fn raw_value(line: &str) -> Option<&str> {
    let mut in_quotes = false;
    for (index, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(&line[index + 1..]),
            _ => {}
        }
    }
    None
}

/// Reverses TEXT escaping: `\\`, `\;`, `\,` and `\n`.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Splits a TEXT list on commas that are not backslash-escaped.
fn split_text_list(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => {
                parts.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

fn strip_mailto(address: &str) -> String {
    let trimmed = address.trim();
    match trimmed.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => trimmed[7..].to_string(),
        _ => trimmed.to_string(),
    }
}

fn mailto(email: &str) -> String {
    format!("mailto:{}", email)
}

fn replace_prod_id(ics: &str, prod_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(prod_id);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }
    result
}
