/**
 * FEED CLIENT - Appel unique et borné vers le fournisseur de télémétrie
 *
 * RÔLE :
 * Un seul GET vers l'URL upstream (citybik.es), avec User-Agent identifiant
 * et directive Cache-Control max-age = fenêtre de fraîcheur.
 *
 * FONCTIONNEMENT :
 * - 2xx + JSON valide -> NetworkDocument
 * - statut non-2xx, JSON invalide, erreur réseau/timeout -> UpstreamUnavailable
 * - Aucun retry : l'échec remonte immédiatement (le poller client relance plus tard)
 * - Le dernier document valide est réutilisé tant qu'il reste dans la fenêtre de fraîcheur
 */

use crate::config::FeedConf;
use crate::models::NetworkDocument;
use parking_lot::Mutex;
use reqwest::header::CACHE_CONTROL;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamUnavailable {
    #[error("Source responded with {0}")]
    Status(u16),
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Upstream payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

struct CachedDocument {
    fetched_at: Instant,
    document: Arc<NetworkDocument>,
}

pub struct FeedClient {
    http: reqwest::Client,
    url: String,
    freshness: Duration,
    cache: Mutex<Option<CachedDocument>>,
}

impl FeedClient {
    pub fn new(conf: &FeedConf) -> Result<Self, UpstreamUnavailable> {
        let http = reqwest::Client::builder()
            .user_agent(conf.user_agent.clone())
            .timeout(Duration::from_secs(conf.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: conf.url.clone(),
            freshness: Duration::from_secs(conf.freshness_secs),
            cache: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fresh_document(&self) -> Option<Arc<NetworkDocument>> {
        if self.freshness.is_zero() {
            return None;
        }
        let cache = self.cache.lock();
        cache
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.freshness)
            .map(|c| c.document.clone())
    }

    /// Récupère le document réseau (ou sa copie encore fraîche)
    pub async fn fetch(&self) -> Result<Arc<NetworkDocument>, UpstreamUnavailable> {
        if let Some(document) = self.fresh_document() {
            debug!("[feed] reusing upstream payload within freshness window");
            return Ok(document);
        }

        let response = self
            .http
            .get(&self.url)
            .header(CACHE_CONTROL, format!("max-age={}", self.freshness.as_secs()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamUnavailable::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let document = Arc::new(serde_json::from_slice::<NetworkDocument>(&body)?);
        debug!(
            "[feed] fetched {} stations from {}",
            document.network.stations.len(),
            self.url
        );

        *self.cache.lock() = Some(CachedDocument {
            fetched_at: Instant::now(),
            document: document.clone(),
        });
        Ok(document)
    }
}
