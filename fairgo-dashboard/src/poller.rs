//! Snapshot poller - client boundary of the live pipeline
//!
//! Calls the kernel endpoint once immediately, then on a fixed interval.
//! Keeps the latest-known-good snapshot: a failed refresh sets `error` but
//! never clears the previous snapshot.
//!
//! Manual refreshes go through the same path and are not debounced, so a
//! manual and a scheduled call may overlap; the last one to resolve wins.
//! Once the poller is torn down every write becomes a no-op, which is how
//! results of in-flight calls are discarded.

use crate::models::Snapshot;
use crate::state::{new_state, PollerState, Shared};
use reqwest::header::CACHE_CONTROL;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(45);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Live feed unavailable")]
    Unavailable(u16),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

struct PollerInner {
    http: reqwest::Client,
    endpoint: String,
    interval: Duration,
    state: Shared<PollerState>,
    mounted: AtomicBool,
    changes: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct SnapshotPoller {
    inner: Arc<PollerInner>,
}

impl SnapshotPoller {
    /// A zero interval falls back to `DEFAULT_REFRESH_INTERVAL`
    pub fn new(endpoint: impl Into<String>, refresh_interval: Duration) -> Result<Self, PollError> {
        let refresh_interval = if refresh_interval.is_zero() {
            warn!(
                "Refresh interval must be non-zero, using {}s",
                DEFAULT_REFRESH_INTERVAL.as_secs()
            );
            DEFAULT_REFRESH_INTERVAL
        } else {
            refresh_interval
        };
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let (changes, _) = watch::channel(0);

        Ok(Self {
            inner: Arc::new(PollerInner {
                http,
                endpoint: endpoint.into(),
                interval: refresh_interval,
                state: new_state(PollerState::default()),
                mounted: AtomicBool::new(true),
                changes,
            }),
        })
    }

    /// Copy of the current client-held state
    pub fn state(&self) -> PollerState {
        self.inner.state.lock().clone()
    }

    /// Notified after every applied state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    /// One call to the kernel, outcome applied to the shared state
    pub async fn refresh(&self) {
        self.apply(|state| state.loading = true);

        let outcome = self.fetch().await;

        self.apply(move |state| {
            match outcome {
                Ok(snapshot) => {
                    debug!(
                        "Snapshot refreshed: {} stations, updated {}",
                        snapshot.stations.len(),
                        snapshot.updated_at
                    );
                    state.snapshot = Some(snapshot);
                    state.error = None;
                }
                Err(e) => {
                    warn!("Snapshot refresh failed: {}", e);
                    state.error = Some(e.to_string());
                }
            }
            state.loading = false;
        });
    }

    async fn fetch(&self) -> Result<Snapshot, PollError> {
        let response = self
            .inner
            .http
            .get(&self.inner.endpoint)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Unavailable(status.as_u16()));
        }
        Ok(response.json::<Snapshot>().await?)
    }

    // Single write path for the shared state
    fn apply(&self, update: impl FnOnce(&mut PollerState)) {
        {
            // Teardown flips `mounted` under this lock
            let mut state = self.inner.state.lock();
            if !self.is_mounted() {
                debug!("Poller torn down, discarding state update");
                return;
            }
            update(&mut state);
        }
        self.inner.changes.send_modify(|generation| *generation += 1);
    }

    /// Start the recurring refresh task. The first call happens immediately.
    pub fn spawn(&self) -> PollerHandle {
        let poller = self.clone();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval(poller.inner.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }

                let in_flight = tokio::spawn({
                    let poller = poller.clone();
                    async move { poller.refresh().await }
                });

                // Teardown while a call is in flight leaves it running; its writes are no-ops
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = in_flight => {}
                }
            }
            debug!("Refresh timer cleared");
        });

        info!(
            "Polling {} every {}s",
            self.inner.endpoint,
            self.inner.interval.as_secs()
        );
        PollerHandle {
            poller: self.clone(),
            stop: Some(stop_tx),
            task,
        }
    }
}

/// Owned handle on the recurring refresh task. Dropping it tears the poller down.
pub struct PollerHandle {
    poller: SnapshotPoller,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    fn teardown(&mut self) {
        {
            let _state = self.poller.inner.state.lock();
            self.poller.inner.mounted.store(false, Ordering::SeqCst);
        }
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    /// Clear the timer and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.teardown();
        if let Err(e) = (&mut self.task).await {
            warn!("Refresh task ended abnormally: {}", e);
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
