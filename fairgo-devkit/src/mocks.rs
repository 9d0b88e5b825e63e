/*!
Mocks des collaborateurs externes du dispatcher vocal

Le recognizer et la surface de navigation sont fournis par l'environnement
d'exécution. Ces mocks enregistrent tous les appels et permettent de simuler
un refus de démarrage, sans dépendre des traits du dashboard (le dashboard
les branche lui-même dans ses tests).
*/

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct RecognizerState {
    active: bool,
    starts: usize,
    stops: usize,
    locale: Option<String>,
    continuous: Option<bool>,
    interim_results: Option<bool>,
    reject_start: Option<String>,
}

/// Recognizer factice : une seule session active à la fois
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    state: Arc<Mutex<RecognizerState>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tous les prochains `start()` échouent avec cette raison
    pub fn reject_start_with(&self, reason: &str) {
        self.state.lock().unwrap().reject_start = Some(reason.to_string());
    }

    pub fn configure(&self, locale: &str, continuous: bool, interim_results: bool) {
        let mut state = self.state.lock().unwrap();
        state.locale = Some(locale.to_string());
        state.continuous = Some(continuous);
        state.interim_results = Some(interim_results);
    }

    pub fn start(&self) -> Result<(), String> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.reject_start {
            return Err(reason.clone());
        }
        if state.active {
            return Err("recognition has already started".to_string());
        }
        state.active = true;
        state.starts += 1;
        log::info!("[mock-recognizer] session started");
        Ok(())
    }

    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.active = false;
        state.stops += 1;
        log::info!("[mock-recognizer] session stopped");
    }

    /// Fin de session côté recognizer (silence, timeout navigateur)
    pub fn simulate_end(&self) {
        self.state.lock().unwrap().active = false;
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().active
    }

    pub fn start_count(&self) -> usize {
        self.state.lock().unwrap().starts
    }

    pub fn stop_count(&self) -> usize {
        self.state.lock().unwrap().stops
    }

    pub fn locale(&self) -> Option<String> {
        self.state.lock().unwrap().locale.clone()
    }

    pub fn continuous(&self) -> Option<bool> {
        self.state.lock().unwrap().continuous
    }

    pub fn interim_results(&self) -> Option<bool> {
        self.state.lock().unwrap().interim_results
    }
}

/// Surface de rendu factice : sections montées + historique des navigations
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    mounted: HashSet<String>,
    navigated: Arc<Mutex<Vec<String>>>,
}

impl MockSurface {
    pub fn with_sections(ids: &[&str]) -> Self {
        Self {
            mounted: ids.iter().map(|id| id.to_string()).collect(),
            navigated: Arc::default(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.mounted.contains(id)
    }

    pub fn bring_into_view(&self, id: &str) {
        self.navigated.lock().unwrap().push(id.to_string());
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigated.lock().unwrap().clone()
    }
}
