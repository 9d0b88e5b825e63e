//! Speech recognition seam
//!
//! Recognition itself is an external capability. The dispatcher only needs to
//! configure it, start/stop a session, and be fed the events it produces:
//! - final transcript (one or more result segments)
//! - runtime error
//! - end of session
//!
//! Capability detection happens once at startup; a missing recognizer puts the
//! dispatcher in the `unsupported` state for the whole session.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerSettings {
    pub locale: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// Final result segments, in order
    Final(Vec<String>),
    Error(String),
    End,
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    #[error("Recognizer refused to start: {0}")]
    StartFailure(String),
    #[error("Recognizer runtime error: {0}")]
    Runtime(String),
}

pub trait SpeechRecognizer {
    fn configure(&mut self, settings: &RecognizerSettings);
    fn start(&mut self) -> Result<(), RecognizerError>;
    fn stop(&mut self);
}

/// Capability probe result
#[derive(Debug)]
pub struct CapabilityInfo {
    pub available: bool,
    pub reason: Option<String>,
}

/// Typed-transcript recognizer for the terminal front-end.
///
/// A session is single-shot: the next line captured while active becomes the
/// final transcript and the session ends.
#[derive(Debug, Clone, Default)]
pub struct ConsoleRecognizer {
    active: Arc<AtomicBool>,
    locale: String,
}

impl ConsoleRecognizer {
    pub fn detect(enabled: bool) -> CapabilityInfo {
        if !enabled {
            return CapabilityInfo {
                available: false,
                reason: Some("voice navigation disabled in config".into()),
            };
        }
        if !std::io::stdin().is_terminal() {
            return CapabilityInfo {
                available: false,
                reason: Some("stdin is not a terminal".into()),
            };
        }
        CapabilityInfo {
            available: true,
            reason: None,
        }
    }

    /// Probe once; `None` means voice navigation is unsupported for this session
    pub fn probe(enabled: bool) -> Option<Self> {
        let capability = Self::detect(enabled);
        if capability.available {
            Some(Self::default())
        } else {
            info!(
                "Voice navigation unsupported: {}",
                capability.reason.as_deref().unwrap_or("unknown")
            );
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Turn a typed line into recognizer events if a session is active
    pub fn capture(&self, line: &str) -> Option<Vec<RecognizerEvent>> {
        if !self.active.swap(false, Ordering::SeqCst) {
            return None;
        }
        Some(vec![RecognizerEvent::Final(vec![line.to_string()]), RecognizerEvent::End])
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn configure(&mut self, settings: &RecognizerSettings) {
        self.locale = settings.locale.clone();
    }

    fn start(&mut self) -> Result<(), RecognizerError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(RecognizerError::StartFailure("recognition has already started".into()));
        }
        debug!("Console recognizer listening ({})", self.locale);
        Ok(())
    }

    fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl SpeechRecognizer for fairgo_devkit::MockRecognizer {
    fn configure(&mut self, settings: &RecognizerSettings) {
        fairgo_devkit::MockRecognizer::configure(
            self,
            &settings.locale,
            settings.continuous,
            settings.interim_results,
        );
    }

    fn start(&mut self) -> Result<(), RecognizerError> {
        fairgo_devkit::MockRecognizer::start(self).map_err(RecognizerError::StartFailure)
    }

    fn stop(&mut self) {
        fairgo_devkit::MockRecognizer::stop(self);
    }
}
