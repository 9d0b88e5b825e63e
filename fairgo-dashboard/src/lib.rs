//! FairGo Dashboard - client side of the live mobility dashboard
//!
//! Two independent timelines share this crate:
//! - Snapshot polling: fetches `/api/live` from the kernel on a fixed interval
//!   and keeps the latest-known-good snapshot with loading/error state
//! - Voice navigation: resolves recognized transcripts to dashboard sections
//!   through an ordered command dictionary and brings them into view

pub mod config;
pub mod console;
pub mod dictionary;
pub mod dispatcher;
pub mod models;
pub mod poller;
pub mod recognizer;
pub mod state;
pub mod surface;
pub mod view;

pub use dictionary::{resolve_intent, CommandEntry, Section, COMMAND_DICTIONARY};
pub use dispatcher::{DispatcherState, Outcome, VoiceDispatcher};
pub use models::{Snapshot, Station, Totals};
pub use poller::{PollError, PollerHandle, SnapshotPoller};
pub use recognizer::{RecognizerError, RecognizerEvent, RecognizerSettings, SpeechRecognizer};
pub use state::PollerState;
pub use surface::NavigationSurface;
