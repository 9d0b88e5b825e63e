//! Voice command dispatcher
//!
//! State machine:
//! - `unsupported` is fixed at construction when no recognizer is available
//! - `idle -> listening` on user activation; a refused start resets to `idle`
//! - `listening -> processing -> idle` on a final transcript, within one call
//! - `listening -> idle` on a blank transcript, deactivation or recognizer error
//!
//! Recognizer failures never surface as error text; the only messages shown to
//! the user are the resolution outcomes.

use crate::dictionary::{resolve_intent, CommandEntry, Section, COMMAND_DICTIONARY};
use crate::recognizer::{RecognizerError, RecognizerEvent, RecognizerSettings, SpeechRecognizer};
use crate::surface::NavigationSurface;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatcherState {
    Idle,
    Listening,
    Processing,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Navigated(Section),
    TargetNotVisible(Section),
    NotRecognized(String),
}

impl Outcome {
    /// Status line shown to the user
    pub fn status_message(&self) -> String {
        match self {
            Outcome::Navigated(section) => format!("Navigated to {}", section.title()),
            Outcome::TargetNotVisible(section) => {
                format!("Section \"{}\" is not visible right now.", section.id())
            }
            Outcome::NotRecognized(transcript) => {
                format!("Sorry, \"{}\" is not linked yet.", transcript)
            }
        }
    }
}

/// Join result segments the way the recognizer delivers them, lower-cased and trimmed
pub fn normalize_transcript(segments: &[String]) -> String {
    segments.join(" ").to_lowercase().trim().to_string()
}

pub struct VoiceDispatcher<R: SpeechRecognizer, S: NavigationSurface> {
    recognizer: Option<R>,
    surface: S,
    dictionary: &'static [CommandEntry],
    state: DispatcherState,
    last_command: Option<String>,
}

impl<R: SpeechRecognizer, S: NavigationSurface> VoiceDispatcher<R, S> {
    /// `recognizer` is the result of the startup capability probe
    pub fn new(recognizer: Option<R>, surface: S, settings: &RecognizerSettings) -> Self {
        let recognizer = recognizer.map(|mut r| {
            r.configure(settings);
            r
        });
        let state = if recognizer.is_some() {
            DispatcherState::Idle
        } else {
            DispatcherState::Unsupported
        };

        Self {
            recognizer,
            surface,
            dictionary: &COMMAND_DICTIONARY,
            state,
            last_command: None,
        }
    }

    pub fn with_dictionary(mut self, dictionary: &'static [CommandEntry]) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// User activation: start listening, or stop if already listening
    pub fn toggle(&mut self) {
        if self.state == DispatcherState::Listening {
            self.deactivate();
        } else {
            self.activate();
        }
    }

    pub fn activate(&mut self) {
        if self.state != DispatcherState::Idle {
            return;
        }
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        match recognizer.start() {
            Ok(()) => {
                self.state = DispatcherState::Listening;
                self.last_command = None;
            }
            Err(e) => {
                debug!("{}", e);
                self.state = DispatcherState::Idle;
            }
        }
    }

    pub fn deactivate(&mut self) {
        if self.state != DispatcherState::Listening {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        self.state = DispatcherState::Idle;
    }

    /// Feed one recognizer event. Returns the outcome when a transcript was resolved.
    pub fn handle_event(&mut self, event: RecognizerEvent) -> Option<Outcome> {
        if self.state == DispatcherState::Unsupported {
            return None;
        }

        match event {
            RecognizerEvent::Final(segments) => {
                if self.state != DispatcherState::Listening {
                    debug!("Ignoring transcript received while {:?}", self.state);
                    return None;
                }
                let transcript = normalize_transcript(&segments);
                if transcript.is_empty() {
                    self.state = DispatcherState::Idle;
                    return None;
                }
                Some(self.dispatch(&transcript))
            }
            RecognizerEvent::Error(message) => {
                debug!("{}", RecognizerError::Runtime(message));
                self.state = DispatcherState::Idle;
                None
            }
            RecognizerEvent::End => {
                if self.state != DispatcherState::Processing {
                    self.state = DispatcherState::Idle;
                }
                None
            }
        }
    }

    fn dispatch(&mut self, transcript: &str) -> Outcome {
        self.state = DispatcherState::Processing;

        let outcome = match resolve_intent(transcript, self.dictionary) {
            None => Outcome::NotRecognized(transcript.to_string()),
            Some(entry) => {
                let target = entry.section.id();
                if self.surface.contains(target) {
                    self.surface.bring_into_view(target);
                    Outcome::Navigated(entry.section)
                } else {
                    Outcome::TargetNotVisible(entry.section)
                }
            }
        };

        let status = outcome.status_message();
        info!("Voice command \"{}\": {}", transcript, status);
        self.last_command = Some(status);
        self.state = DispatcherState::Idle;
        outcome
    }
}

impl<R: SpeechRecognizer, S: NavigationSurface> Drop for VoiceDispatcher<R, S> {
    fn drop(&mut self) {
        // Release the microphone on every exit path
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairgo_devkit::{MockRecognizer, MockSurface};

    fn dispatcher_with(sections: &[&str]) -> (VoiceDispatcher<MockRecognizer, MockSurface>, MockRecognizer, MockSurface) {
        let recognizer = MockRecognizer::new();
        let surface = MockSurface::with_sections(sections);
        let dispatcher = VoiceDispatcher::new(
            Some(recognizer.clone()),
            surface.clone(),
            &RecognizerSettings::default(),
        );
        (dispatcher, recognizer, surface)
    }

    fn say(dispatcher: &mut VoiceDispatcher<MockRecognizer, MockSurface>, text: &str) -> Option<Outcome> {
        dispatcher.handle_event(RecognizerEvent::Final(vec![text.to_string()]))
    }

    #[test]
    fn test_recognizer_configured_once() {
        let (dispatcher, recognizer, _) = dispatcher_with(&[]);
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert_eq!(recognizer.locale().as_deref(), Some("en-US"));
        assert_eq!(recognizer.continuous(), Some(false));
        assert_eq!(recognizer.interim_results(), Some(false));
    }

    #[test]
    fn test_unsupported_is_terminal() {
        let mut dispatcher: VoiceDispatcher<MockRecognizer, MockSurface> =
            VoiceDispatcher::new(None, MockSurface::default(), &RecognizerSettings::default());
        assert_eq!(dispatcher.state(), DispatcherState::Unsupported);

        dispatcher.toggle();
        assert_eq!(dispatcher.state(), DispatcherState::Unsupported);
        assert!(say(&mut dispatcher, "take me home").is_none());
        dispatcher.handle_event(RecognizerEvent::End);
        assert_eq!(dispatcher.state(), DispatcherState::Unsupported);
    }

    #[test]
    fn test_navigates_to_booking() {
        let (mut dispatcher, recognizer, surface) = dispatcher_with(&["booking"]);
        dispatcher.toggle();
        assert_eq!(dispatcher.state(), DispatcherState::Listening);
        assert_eq!(recognizer.start_count(), 1);

        let outcome = say(&mut dispatcher, "Take me to BOOKING ").unwrap();
        assert_eq!(outcome, Outcome::Navigated(Section::Booking));
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert_eq!(dispatcher.last_command(), Some("Navigated to Book a Ride"));
        assert_eq!(surface.navigations(), vec!["booking".to_string()]);
    }

    #[test]
    fn test_target_not_visible() {
        let (mut dispatcher, _, surface) = dispatcher_with(&["hero"]);
        dispatcher.activate();

        let outcome = say(&mut dispatcher, "take me to booking").unwrap();
        assert_eq!(outcome, Outcome::TargetNotVisible(Section::Booking));
        assert_eq!(
            dispatcher.last_command(),
            Some("Section \"booking\" is not visible right now.")
        );
        assert!(surface.navigations().is_empty());
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
    }

    #[test]
    fn test_not_recognized_keeps_transcript() {
        let (mut dispatcher, _, surface) = dispatcher_with(&["booking"]);
        dispatcher.activate();

        let outcome = say(&mut dispatcher, "order a pizza").unwrap();
        assert_eq!(outcome, Outcome::NotRecognized("order a pizza".to_string()));
        assert_eq!(
            dispatcher.last_command(),
            Some("Sorry, \"order a pizza\" is not linked yet.")
        );
        assert!(surface.navigations().is_empty());
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
    }

    #[test]
    fn test_blank_transcript_skips_resolution() {
        let (mut dispatcher, _, surface) = dispatcher_with(&["booking"]);
        dispatcher.activate();

        assert!(say(&mut dispatcher, "   ").is_none());
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert!(dispatcher.last_command().is_none());
        assert!(surface.navigations().is_empty());

        dispatcher.activate();
        assert!(dispatcher.handle_event(RecognizerEvent::Final(vec![])).is_none());
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
    }

    #[test]
    fn test_segments_are_joined() {
        let (mut dispatcher, _, _) = dispatcher_with(&["contact"]);
        dispatcher.activate();

        let outcome = dispatcher.handle_event(RecognizerEvent::Final(vec![
            "Get in".to_string(),
            "Contact".to_string(),
        ]));
        assert_eq!(outcome, Some(Outcome::Navigated(Section::Contact)));
    }

    #[test]
    fn test_start_rejection_resets_to_idle() {
        let (mut dispatcher, recognizer, _) = dispatcher_with(&[]);
        recognizer.reject_start_with("not-allowed");

        dispatcher.toggle();
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert!(dispatcher.last_command().is_none());
    }

    #[test]
    fn test_recognizer_already_active_fails_safely() {
        let (mut dispatcher, recognizer, _) = dispatcher_with(&[]);
        // session opened behind the dispatcher's back
        recognizer.start().unwrap();

        dispatcher.activate();
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
    }

    #[test]
    fn test_deactivate_stops_recognizer() {
        let (mut dispatcher, recognizer, _) = dispatcher_with(&[]);
        dispatcher.toggle();
        dispatcher.toggle();

        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert_eq!(recognizer.stop_count(), 1);
        assert!(!recognizer.is_active());
    }

    #[test]
    fn test_recognizer_error_returns_to_idle() {
        let (mut dispatcher, _, _) = dispatcher_with(&[]);
        dispatcher.activate();

        assert!(dispatcher
            .handle_event(RecognizerEvent::Error("network".to_string()))
            .is_none());
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert!(dispatcher.last_command().is_none());
    }

    #[test]
    fn test_session_end_returns_to_idle() {
        let (mut dispatcher, recognizer, _) = dispatcher_with(&[]);
        dispatcher.activate();
        recognizer.simulate_end();

        dispatcher.handle_event(RecognizerEvent::End);
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
    }

    #[test]
    fn test_transcript_ignored_when_not_listening() {
        let (mut dispatcher, _, surface) = dispatcher_with(&["booking"]);
        assert!(say(&mut dispatcher, "booking").is_none());
        assert!(surface.navigations().is_empty());
    }

    #[test]
    fn test_activation_clears_last_command() {
        let (mut dispatcher, recognizer, _) = dispatcher_with(&[]);
        dispatcher.activate();
        say(&mut dispatcher, "order a pizza");
        assert!(dispatcher.last_command().is_some());

        recognizer.simulate_end();
        dispatcher.activate();
        assert_eq!(dispatcher.state(), DispatcherState::Listening);
        assert!(dispatcher.last_command().is_none());
    }

    #[test]
    fn test_drop_stops_recognizer() {
        let (mut dispatcher, recognizer, _) = dispatcher_with(&[]);
        dispatcher.activate();
        assert!(recognizer.is_active());

        drop(dispatcher);
        assert!(!recognizer.is_active());
        assert_eq!(recognizer.stop_count(), 1);
    }

    #[test]
    fn test_custom_dictionary() {
        static HELP_ONLY: [CommandEntry; 1] = [CommandEntry {
            section: Section::Contact,
            phrases: &["help"],
        }];
        let (dispatcher, _, _) = dispatcher_with(&["contact"]);
        let mut dispatcher = dispatcher.with_dictionary(&HELP_ONLY);
        dispatcher.activate();

        assert_eq!(
            say(&mut dispatcher, "help me"),
            Some(Outcome::Navigated(Section::Contact))
        );
    }
}
