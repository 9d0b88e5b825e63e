use crate::models::Snapshot;
use parking_lot::Mutex;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Client-held view of the live feed. Written only by the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    pub snapshot: Option<Snapshot>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for PollerState {
    fn default() -> Self {
        Self {
            snapshot: None,
            loading: true,
            error: None,
        }
    }
}
