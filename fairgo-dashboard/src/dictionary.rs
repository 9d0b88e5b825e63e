//! Command dictionary for voice navigation
//!
//! Matching is an ordered scan: the first entry (in declaration order) with any
//! phrase contained in the transcript wins. Containment is a plain substring
//! test, so "booking" also matches a transcript like "rebooking the car".

use serde::{Deserialize, Serialize};

/// Navigable dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hero,
    Services,
    Integrations,
    Coverage,
    Voice,
    Booking,
    Contact,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Hero,
        Section::Services,
        Section::Integrations,
        Section::Coverage,
        Section::Voice,
        Section::Booking,
        Section::Contact,
    ];

    /// Symbolic identifier used by the rendering surface
    pub fn id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Services => "services",
            Section::Integrations => "integrations",
            Section::Coverage => "coverage",
            Section::Voice => "voice",
            Section::Booking => "booking",
            Section::Contact => "contact",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Hero => "Welcome",
            Section::Services => "Mobility Engine",
            Section::Integrations => "Live Operations",
            Section::Coverage => "Coverage Heatmap",
            Section::Voice => "Voice Navigation",
            Section::Booking => "Book a Ride",
            Section::Contact => "Partner with FairGo",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub section: Section,
    pub phrases: &'static [&'static str],
}

impl CommandEntry {
    pub fn matches(&self, transcript: &str) -> bool {
        self.phrases.iter().any(|phrase| transcript.contains(phrase))
    }
}

pub static COMMAND_DICTIONARY: [CommandEntry; 7] = [
    CommandEntry { section: Section::Hero, phrases: &["home", "hero", "top"] },
    CommandEntry { section: Section::Services, phrases: &["services", "features", "solutions"] },
    CommandEntry { section: Section::Integrations, phrases: &["live", "integrations", "insights"] },
    CommandEntry { section: Section::Coverage, phrases: &["coverage", "map", "cities"] },
    CommandEntry { section: Section::Voice, phrases: &["voice", "navigation", "assistant"] },
    CommandEntry { section: Section::Booking, phrases: &["book", "booking", "ride", "call"] },
    CommandEntry { section: Section::Contact, phrases: &["contact", "partner", "connect"] },
];

/// First entry whose phrases occur in the (already normalized) transcript
pub fn resolve_intent<'a>(transcript: &str, dictionary: &'a [CommandEntry]) -> Option<&'a CommandEntry> {
    dictionary.iter().find(|entry| entry.matches(transcript))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_phrase() {
        let entry = resolve_intent("take me to booking", &COMMAND_DICTIONARY).unwrap();
        assert_eq!(entry.section, Section::Booking);
    }

    #[test]
    fn test_no_match() {
        assert!(resolve_intent("order a pizza", &COMMAND_DICTIONARY).is_none());
    }

    #[test]
    fn test_first_match_in_declaration_order_wins() {
        // "live" (integrations) and "map" (coverage) both occur
        let entry = resolve_intent("show the map of live stations", &COMMAND_DICTIONARY).unwrap();
        assert_eq!(entry.section, Section::Integrations);

        // "home" is declared before "contact"
        let entry = resolve_intent("contact home", &COMMAND_DICTIONARY).unwrap();
        assert_eq!(entry.section, Section::Hero);
    }

    #[test]
    fn test_substring_containment_is_naive() {
        let entry = resolve_intent("i am rebooking", &COMMAND_DICTIONARY).unwrap();
        assert_eq!(entry.section, Section::Booking);

        // "stop" contains "top"
        let entry = resolve_intent("stop", &COMMAND_DICTIONARY).unwrap();
        assert_eq!(entry.section, Section::Hero);
    }

    #[test]
    fn test_custom_dictionary() {
        let dictionary = [CommandEntry { section: Section::Contact, phrases: &["help"] }];
        assert_eq!(
            resolve_intent("i need help", &dictionary).map(|e| e.section),
            Some(Section::Contact)
        );
        assert!(resolve_intent("take me to booking", &dictionary).is_none());
    }

    #[test]
    fn test_section_ids_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_id(section.id()), Some(section));
        }
        assert_eq!(Section::from_id("pricing"), None);
    }
}
