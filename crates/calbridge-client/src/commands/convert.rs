//! Conversion commands.
//!
//! Each command returns its rendered output so the binary only has to print it.

use chrono_tz::Tz;
use tracing::{debug, info};

use calbridge_core::links::MeetingProvider;
use calbridge_core::{
    CalendarObject, LegacyEvent, VirtualFeature, calendar_object_to_event,
    event_to_calendar_object, export_extensions, import_extensions,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::ics::{generate_ics, parse_legacy_event_in};
use crate::io::render_json;

/// Options shared by the conversion commands.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Run the extension property hooks.
    pub preserve_extensions: bool,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Zone for floating iCalendar times.
    pub floating_zone: Option<Tz>,
}

impl ConvertOptions {
    /// Builds options from the configuration, with command-line overrides.
    pub fn from_config(
        config: &ClientConfig,
        preserve_extensions: bool,
        compact: bool,
    ) -> ClientResult<Self> {
        Ok(Self {
            preserve_extensions: preserve_extensions || config.conversion.preserve_extensions,
            pretty: config.output.pretty && !compact,
            floating_zone: config.conversion.time_zone().map_err(ClientError::Config)?,
        })
    }
}

/// Reads a legacy event from JSON or iCalendar text.
pub fn load_event(content: &str, ics: bool, options: &ConvertOptions) -> ClientResult<LegacyEvent> {
    if content.trim().is_empty() {
        return Err(ClientError::InvalidInput("input is empty".to_string()));
    }
    if ics {
        parse_legacy_event_in(content, options.floating_zone)
            .ok_or_else(|| ClientError::Ics("no VEVENT with a UID found".to_string()))
    } else {
        Ok(LegacyEvent::from_json(content)?)
    }
}

/// Converts a legacy event to a JSCalendar object.
pub fn to_calendar_object(event: &LegacyEvent, options: &ConvertOptions) -> CalendarObject {
    let mut object = event_to_calendar_object(event);
    if options.preserve_extensions {
        import_extensions(event, &mut object);
    }
    object
}

/// Converts a JSCalendar object to a legacy event.
pub fn to_legacy_event(object: &CalendarObject, options: &ConvertOptions) -> LegacyEvent {
    let mut event = calendar_object_to_event(object);
    if options.preserve_extensions {
        export_extensions(object, &mut event);
    }
    event
}

/// `to-jscal`: legacy event in, CalendarObject JSON out.
pub fn to_jscal(content: &str, ics: bool, options: &ConvertOptions) -> ClientResult<String> {
    let event = load_event(content, ics, options)?;
    let object = to_calendar_object(&event, options);
    info!(uid = %object.uid, participants = object.participants.len(), "converted to JSCalendar");
    render_json(&object, options.pretty)
}

/// `to-legacy`: CalendarObject JSON in, legacy event JSON or iCalendar out.
pub fn to_legacy(content: &str, ics: bool, options: &ConvertOptions) -> ClientResult<String> {
    if content.trim().is_empty() {
        return Err(ClientError::InvalidInput("input is empty".to_string()));
    }
    let object = CalendarObject::from_json(content)?;
    let event = to_legacy_event(&object, options);
    info!(uid = %event.uid, attendees = event.attendees.len(), "converted to legacy event");
    if ics {
        Ok(generate_ics(&event))
    } else {
        render_json(&event, options.pretty)
    }
}

/// `roundtrip`: legacy event through JSCalendar and back.
pub fn roundtrip(content: &str, ics: bool, options: &ConvertOptions) -> ClientResult<String> {
    let event = load_event(content, ics, options)?;
    let object = to_calendar_object(&event, options);
    let back = to_legacy_event(&object, options);
    if back != event {
        debug!(uid = %event.uid, "round trip changed the event");
    }
    render_json(&back, options.pretty)
}

/// `classify`: describes how a URL would be mapped.
pub fn classify(url: &str) -> String {
    match MeetingProvider::detect(url) {
        Some(provider) => {
            let features: Vec<&str> = provider
                .features()
                .iter()
                .map(VirtualFeature::as_str)
                .collect();
            format!(
                "virtual meeting: yes\nprovider: {}\nfeatures: {}",
                provider.display_name(),
                features.join(", ")
            )
        }
        None => "virtual meeting: no".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_JSON: &str = r#"{
        "uid": "E1",
        "summary": "Sync",
        "start": {"instant": "2025-01-15T10:00:00Z"},
        "end": {"instant": "2025-01-15T10:30:00Z"},
        "url": "https://zoom.us/j/1",
        "extensions": {"X-JSCALENDAR-LOCALE": "fr-FR"}
    }"#;

    fn options(preserve_extensions: bool) -> ConvertOptions {
        ConvertOptions {
            preserve_extensions,
            pretty: false,
            floating_zone: None,
        }
    }

    mod option_merging {
        use super::*;

        #[test]
        fn flags_override_config() {
            let mut config = ClientConfig::default();
            let opts = ConvertOptions::from_config(&config, true, true).unwrap();
            assert!(opts.preserve_extensions);
            assert!(!opts.pretty);

            config.conversion.preserve_extensions = true;
            let opts = ConvertOptions::from_config(&config, false, false).unwrap();
            assert!(opts.preserve_extensions);
            assert!(opts.pretty);
        }

        #[test]
        fn bad_zone_is_config_error() {
            let mut config = ClientConfig::default();
            config.conversion.default_time_zone = Some("Bogus/Zone".to_string());
            let err = ConvertOptions::from_config(&config, false, false).unwrap_err();
            assert!(matches!(err, ClientError::Config(_)));
        }
    }

    mod subcommands {
        use super::*;

        #[test]
        fn to_jscal_from_json() {
            let out = to_jscal(LEGACY_JSON, false, &options(false)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["uid"], "E1");
            assert_eq!(value["title"], "Sync");
            assert_eq!(value["duration"], "PT30M");
            assert_eq!(value["virtualLocations"]["virtual-1"]["uri"], "https://zoom.us/j/1");
            assert!(value.get("locale").is_none());
        }

        #[test]
        fn to_jscal_imports_extensions_when_asked() {
            let out = to_jscal(LEGACY_JSON, false, &options(true)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["locale"], "fr-FR");
        }

        #[test]
        fn to_jscal_from_ics() {
            let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:x\r\nBEGIN:VEVENT\r\nUID:I1\r\nSUMMARY:From ics\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
            let out = to_jscal(ics, true, &options(false)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["uid"], "I1");
            assert_eq!(value["title"], "From ics");
        }

        #[test]
        fn to_jscal_rejects_bad_input() {
            assert!(matches!(
                to_jscal("   ", false, &options(false)),
                Err(ClientError::InvalidInput(_))
            ));
            assert!(matches!(
                to_jscal("{", false, &options(false)),
                Err(ClientError::Json(_))
            ));
            assert!(matches!(
                to_jscal("not a calendar", true, &options(false)),
                Err(ClientError::Ics(_))
            ));
        }

        #[test]
        fn to_legacy_as_json_and_ics() {
            let object = r#"{"type": "Event", "uid": "O1", "title": "Review", "keywords": {"k": true}}"#;

            let out = to_legacy(object, false, &options(false)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["uid"], "O1");
            assert_eq!(value["summary"], "Review");

            let ics = to_legacy(object, true, &options(false)).unwrap();
            assert!(ics.contains("UID:O1"));
            assert!(ics.contains("SUMMARY:Review"));
        }

        #[test]
        fn to_legacy_exports_extensions_when_asked() {
            let object = r#"{"type": "Event", "uid": "O2", "locale": "de"}"#;
            let out = to_legacy(object, false, &options(true)).unwrap();
            let event = LegacyEvent::from_json(&out).unwrap();
            assert_eq!(event.extension("X-JSCALENDAR-LOCALE"), Some("de"));
            assert_eq!(event.extension("X-JSCALENDAR-TYPE"), Some("Event"));
        }

        #[test]
        fn roundtrip_keeps_core_fields() {
            let out = roundtrip(LEGACY_JSON, false, &options(false)).unwrap();
            let event = LegacyEvent::from_json(&out).unwrap();
            assert_eq!(event.uid, "E1");
            assert_eq!(event.summary.as_deref(), Some("Sync"));
            assert_eq!(event.url.as_deref(), Some("https://zoom.us/j/1"));
            let start = event.start.unwrap();
            let end = event.end.unwrap();
            assert_eq!((end.instant - start.instant).num_minutes(), 30);
        }

        #[test]
        fn classify_known_and_unknown() {
            assert_eq!(
                classify("https://meet.google.com/abc"),
                "virtual meeting: yes\nprovider: Google Meet\nfeatures: audio, chat, screen, video"
            );
            assert_eq!(
                classify("https://webex.com/meet/x"),
                "virtual meeting: yes\nprovider: Cisco Webex\nfeatures: audio, video"
            );
            assert_eq!(classify("https://example.com"), "virtual meeting: no");
        }
    }
}
