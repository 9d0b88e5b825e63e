/*!
Serveur HTTP factice pour tests sans réseau

Démarre un serveur axum sur 127.0.0.1:0 qui répond à toute route avec une
réponse configurable (statut + corps JSON). Enregistre le nombre d'appels et
les en-têtes de la dernière requête pour les assertions.
*/

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    body: String,
}

impl Default for CannedResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: "{}".to_string(),
        }
    }
}

#[derive(Default)]
struct StubState {
    response: Mutex<CannedResponse>,
    hits: AtomicUsize,
    delay_ms: AtomicU64,
    last_headers: Mutex<HeaderMap>,
}

/// Serveur HTTP local à réponse programmable
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(StubState::default());

        let app = Router::new().fallback(respond).with_state(state.clone());
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await;
            if let Err(e) = served {
                log::warn!("[stub] server stopped with error: {}", e);
            }
        });

        log::info!("[stub] listening on http://{}", addr);
        Ok(Self {
            addr,
            state,
            shutdown: Some(tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL complète vers le stub pour un chemin donné
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr(), path)
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        *self.state.response.lock().unwrap() = CannedResponse {
            status,
            body: body.to_string(),
        };
    }

    /// Retarde chaque réponse (simule un upstream lent)
    pub fn set_delay(&self, delay: Duration) {
        self.state
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_header(&self, name: &str) -> Option<String> {
        self.state
            .last_headers
            .lock()
            .unwrap()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn respond(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_headers.lock().unwrap() = headers;

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let canned = state.response.lock().unwrap().clone();
    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response()
}
