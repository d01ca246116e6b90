//! Virtual meeting detection for event URLs.
//!
//! This module provides functionality to:
//! - Recognize URLs that belong to a known video conferencing provider
//! - Derive the feature set a provider's meetings offer
//! - Build the [`VirtualLocation`] that stands for such a URL
//!
//! Matching is a plain substring test over the whole URL, so
//! `https://company.zoom.us/j/1` and `https://zoom.us.example/x` both match.
//!
//! # Example
//!
//! ```
//! use calbridge_core::links::{is_virtual_meeting_url, MeetingProvider};
//!
//! assert!(is_virtual_meeting_url("https://zoom.us/j/123"));
//! assert_eq!(MeetingProvider::detect("https://meet.google.com/abc"), Some(MeetingProvider::GoogleMeet));
//! assert!(!is_virtual_meeting_url("https://example.com/meet"));
//! ```

use std::collections::BTreeSet;

use crate::jscalendar::{VirtualFeature, VirtualLocation};

/// The name given to virtual locations built from a URL.
pub const VIRTUAL_MEETING_NAME: &str = "Virtual Meeting";

/// A video conferencing provider recognized from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeetingProvider {
    Zoom,
    GoogleMeet,
    Teams,
    Webex,
    GoToMeeting,
    BlueJeans,
}

impl MeetingProvider {
    /// All providers, in detection order.
    pub const ALL: [MeetingProvider; 6] = [
        Self::Zoom,
        Self::GoogleMeet,
        Self::Teams,
        Self::Webex,
        Self::GoToMeeting,
        Self::BlueJeans,
    ];

    /// Returns the substring that identifies this provider in a URL.
    pub fn needle(&self) -> &'static str {
        match self {
            Self::Zoom => "zoom.us",
            Self::GoogleMeet => "meet.google.com",
            Self::Teams => "teams.microsoft.com",
            Self::Webex => "webex.com",
            Self::GoToMeeting => "gotomeeting.com",
            Self::BlueJeans => "bluejeans.com",
        }
    }

    /// Returns a human-readable name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Zoom => "Zoom",
            Self::GoogleMeet => "Google Meet",
            Self::Teams => "Microsoft Teams",
            Self::Webex => "Cisco Webex",
            Self::GoToMeeting => "GoToMeeting",
            Self::BlueJeans => "BlueJeans",
        }
    }

    /// Returns true if meetings on this provider offer chat and screen sharing.
    pub fn supports_collaboration(&self) -> bool {
        matches!(self, Self::Zoom | Self::GoogleMeet | Self::Teams)
    }

    /// Returns the features a meeting on this provider offers.
    pub fn features(&self) -> BTreeSet<VirtualFeature> {
        let mut features = BTreeSet::from([VirtualFeature::Audio, VirtualFeature::Video]);
        if self.supports_collaboration() {
            features.extend([VirtualFeature::Chat, VirtualFeature::Screen]);
        }
        features
    }

    /// Detects the provider of a URL, if any.
    pub fn detect(url: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| url.contains(provider.needle()))
    }
}

/// Returns true if the URL points at a known meeting provider.
pub fn is_virtual_meeting_url(url: &str) -> bool {
    MeetingProvider::detect(url).is_some()
}

/// Returns the meeting features for a URL, or `None` if it is not a meeting URL.
pub fn meeting_features(url: &str) -> Option<BTreeSet<VirtualFeature>> {
    MeetingProvider::detect(url).map(|provider| provider.features())
}

/// Builds the virtual location for a meeting URL.
///
/// Returns `None` if the URL does not belong to a known provider.
pub fn virtual_location_for(url: &str) -> Option<VirtualLocation> {
    let features = meeting_features(url)?;
    Some(VirtualLocation {
        name: Some(VIRTUAL_MEETING_NAME.to_string()),
        uri: Some(url.to_string()),
        features,
        ..VirtualLocation::default()
    })
}
