//! Golden tests for conversion output.
//!
//! These tests use insta inline snapshots to pin the exact JSON produced by
//! both converters. Run with `cargo insta review` after intentional changes.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use insta::assert_json_snapshot;

use crate::convert::{calendar_object_to_event, event_to_calendar_object};
use crate::jscalendar::{
    CalendarObject, Link, Location, Participant, ParticipantRole, ParticipationStatus,
    VirtualLocation,
};
use crate::legacy::{
    Attachment, Attendee, AttendeeRole, LegacyDateTime, LegacyEvent, Organizer,
    ParticipationStatus as PartStat,
};

/// Create a UTC datetime for testing.
fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// A fully populated legacy event.
fn design_review() -> LegacyEvent {
    let start = utc(2025, 2, 5, 10, 0, 0);
    LegacyEvent::new("evt-1")
        .with_summary("Design Review")
        .with_description("Quarterly review")
        .with_start(LegacyDateTime::zoned(start, Tz::Europe__Paris))
        .with_end(LegacyDateTime::zoned(
            start + chrono::Duration::minutes(90),
            Tz::Europe__Paris,
        ))
        .with_organizer(Organizer::new("boss@example.com").with_common_name("Boss"))
        .with_attendee(
            Attendee::new("alice@example.com")
                .with_common_name("Alice")
                .with_role(AttendeeRole::RequiredParticipant)
                .with_status(PartStat::Accepted)
                .with_rsvp(true),
        )
        .with_attendee(Attendee::new("bob@example.com").with_role(AttendeeRole::OptionalParticipant))
        .with_location("Room 101")
        .with_url("https://meet.google.com/abc-defg-hij")
        .with_category("work")
        .with_category("review")
        .with_attachment(
            Attachment::new("https://example.com/slides.pdf").with_media_type("application/pdf"),
        )
        .with_extension("PRODID", "-//Example Corp//Calendar//EN")
        .with_extension("X-WR-CALNAME", "Team")
}

// =============================================================================
// Legacy -> JSCalendar
// =============================================================================

#[test]
fn golden_forward_full_event() {
    let object = event_to_calendar_object(&design_review());
    assert_json_snapshot!(object, @r#"
    {
      "type": "Event",
      "uid": "evt-1",
      "title": "Design Review",
      "description": "Quarterly review",
      "start": "2025-02-05T10:00:00Z",
      "timeZone": "Europe/Paris",
      "duration": "PT1H30M",
      "participants": {
        "organizer": {
          "name": "Boss",
          "email": "boss@example.com",
          "kind": "individual",
          "roles": {
            "owner": true,
            "chair": true
          },
          "participationStatus": "accepted",
          "expectReply": false
        },
        "participant-0": {
          "name": "Alice",
          "email": "alice@example.com",
          "kind": "individual",
          "roles": {
            "attendee": true
          },
          "participationStatus": "accepted",
          "expectReply": true
        },
        "participant-1": {
          "email": "bob@example.com",
          "kind": "individual",
          "roles": {
            "optional": true
          },
          "expectReply": false
        }
      },
      "locations": {
        "location-1": {
          "name": "Room 101",
          "locationTypes": {
            "physical": true
          }
        }
      },
      "virtualLocations": {
        "virtual-1": {
          "name": "Virtual Meeting",
          "uri": "https://meet.google.com/abc-defg-hij",
          "features": {
            "audio": true,
            "chat": true,
            "screen": true,
            "video": true
          }
        }
      },
      "categories": {
        "review": true,
        "work": true
      },
      "links": {
        "attachment-0": {
          "href": "https://example.com/slides.pdf"
        }
      },
      "prodId": "-//Example Corp//Calendar//EN"
    }
    "#);
}

#[test]
fn golden_forward_minimal_event() {
    let object = event_to_calendar_object(&LegacyEvent::new("E1"));
    assert_json_snapshot!(object, @r#"
    {
      "type": "Event",
      "uid": "E1"
    }
    "#);
}

#[test]
fn golden_forward_webex_without_collaboration_features() {
    let event = LegacyEvent::new("E2").with_url("https://acme.webex.com/meet/jdoe");
    let object = event_to_calendar_object(&event);
    assert_json_snapshot!(object, @r#"
    {
      "type": "Event",
      "uid": "E2",
      "virtualLocations": {
        "virtual-1": {
          "name": "Virtual Meeting",
          "uri": "https://acme.webex.com/meet/jdoe",
          "features": {
            "audio": true,
            "video": true
          }
        }
      }
    }
    "#);
}

// =============================================================================
// JSCalendar -> Legacy
// =============================================================================

/// An object exercising every reverse mapping, with a fixed time zone so
/// the output does not depend on the machine running the tests.
fn sync_object() -> CalendarObject {
    let mut link = Link::new("https://example.com/a.pdf");
    link.content_type = Some("application/pdf".to_string());

    let mut object = CalendarObject::new("evt-2")
        .with_participant(
            "a-owner",
            Participant::new()
                .with_name("Lead")
                .with_email("mailto:lead@example.com")
                .with_role(ParticipantRole::Owner),
        )
        .with_participant(
            "b-attendee",
            Participant::new()
                .with_email("dev@example.com")
                .with_role(ParticipantRole::Optional)
                .with_status(ParticipationStatus::Declined)
                .with_expect_reply(true),
        )
        .with_participant(
            "c-room",
            Participant::new()
                .with_name("Room")
                .with_role(ParticipantRole::Attendee),
        )
        .with_location(
            "l1",
            Location {
                name: Some("HQ".to_string()),
                ..Location::default()
            },
        )
        .with_virtual_location(
            "v1",
            VirtualLocation {
                name: Some("Phone bridge".to_string()),
                ..VirtualLocation::default()
            },
        )
        .with_virtual_location(
            "v2",
            VirtualLocation {
                uri: Some("https://zoom.us/j/9".to_string()),
                ..VirtualLocation::default()
            },
        )
        .with_link("doc", link);
    object.title = Some("Sync".to_string());
    object.start = Some("2024-01-15T09:00:00Z".to_string());
    object.time_zone = Some("UTC".to_string());
    object.duration = Some("PT45M".to_string());
    object.categories.insert("ops".to_string(), true);
    object
}

#[test]
fn golden_reverse_full_object() {
    let event = calendar_object_to_event(&sync_object());
    assert_json_snapshot!(event, @r#"
    {
      "uid": "evt-2",
      "summary": "Sync",
      "start": {
        "instant": "2024-01-15T09:00:00Z",
        "time_zone": "UTC"
      },
      "end": {
        "instant": "2024-01-15T09:45:00Z",
        "time_zone": "UTC"
      },
      "organizer": {
        "email": "lead@example.com",
        "common_name": "Lead",
        "role": "CHAIR"
      },
      "attendees": [
        {
          "email": "dev@example.com",
          "role": "OPT-PARTICIPANT",
          "status": "DECLINED",
          "rsvp": true
        }
      ],
      "location": "HQ",
      "url": "https://zoom.us/j/9",
      "categories": [
        "ops"
      ],
      "attachments": [
        {
          "uri": "https://example.com/a.pdf",
          "media_type": "application/pdf"
        }
      ]
    }
    "#);
}

#[test]
fn golden_reverse_empty_object() {
    let event = calendar_object_to_event(&CalendarObject::new("E3"));
    assert_json_snapshot!(event, @r#"
    {
      "uid": "E3"
    }
    "#);
}
