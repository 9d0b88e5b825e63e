/**
 * SNAPSHOT SERVICE - Frontière serveur du pipeline live
 *
 * RÔLE :
 * Orchestration Feed Client + Normalizer derrière une opération unique
 * `get_snapshot()`, sans paramètre appelant.
 *
 * CONTRAT :
 * - Succès -> Snapshot complet (12 stations max, totaux, updatedAt)
 * - Échec -> SnapshotUnavailable { error, details }, jamais de panique au-delà
 * - Le message `error` est stable, `details` porte le diagnostic upstream
 */

use crate::feed::FeedClient;
use crate::health::HealthTracker;
use crate::models::Snapshot;
use crate::normalize::build_snapshot;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

pub const UNAVAILABLE_MESSAGE: &str = "Unable to sync live fleet data right now.";

/// Seule erreur exposée aux appelants du service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error} ({details})")]
pub struct SnapshotUnavailable {
    pub error: String,
    pub details: String,
}

impl SnapshotUnavailable {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            error: UNAVAILABLE_MESSAGE.to_string(),
            details: details.into(),
        }
    }
}

pub struct SnapshotService {
    feed: FeedClient,
    health: HealthTracker,
}

impl SnapshotService {
    pub fn new(feed: FeedClient, health: HealthTracker) -> Self {
        Self { feed, health }
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    pub async fn get_snapshot(&self) -> Result<Snapshot, SnapshotUnavailable> {
        match self.feed.fetch().await {
            Ok(document) => {
                self.health.record_success();
                Ok(build_snapshot(&document, OffsetDateTime::now_utc()))
            }
            Err(e) => {
                let details = e.to_string();
                warn!("[snapshot] upstream {} indisponible: {}", self.feed.url(), details);
                self.health.record_failure(&details);
                Err(SnapshotUnavailable::new(details))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConf;
    use fairgo_devkit::{FixtureBuilder, StubServer};

    fn service_for(stub: &StubServer) -> SnapshotService {
        let conf = FeedConf {
            url: stub.url("/v2/networks/velib"),
            freshness_secs: 0,
            timeout_secs: 2,
            ..FeedConf::default()
        };
        SnapshotService::new(FeedClient::new(&conf).unwrap(), HealthTracker::new())
    }

    #[tokio::test]
    async fn test_success_builds_snapshot() {
        let stub = StubServer::start().await.unwrap();
        stub.respond_json(200, FixtureBuilder::network("Paris", "FR", 20));

        let service = service_for(&stub);
        let snapshot = service.get_snapshot().await.unwrap();

        assert_eq!(snapshot.source_city, "Paris");
        assert_eq!(snapshot.source_country, "FR");
        assert_eq!(snapshot.stations.len(), 12);
        assert_eq!(snapshot.stations[0].id, "station-0");
        assert_eq!(snapshot.stations[11].id, "station-11");

        let expected: u64 = snapshot.stations.iter().map(|s| u64::from(s.available_units)).sum();
        assert_eq!(snapshot.totals.available_units, expected);
        assert_eq!(service.health().get_health().fetch_successes, 1);
    }

    #[tokio::test]
    async fn test_non_success_status_translates_to_unavailable() {
        let stub = StubServer::start().await.unwrap();
        stub.respond_json(502, serde_json::json!({"message": "bad gateway"}));

        let service = service_for(&stub);
        let failure = service.get_snapshot().await.unwrap_err();

        assert_eq!(failure.error, UNAVAILABLE_MESSAGE);
        assert_eq!(failure.details, "Source responded with 502");
        assert_eq!(service.health().get_health().upstream_status, "unavailable");
    }

    #[tokio::test]
    async fn test_malformed_payload_translates_to_unavailable() {
        let stub = StubServer::start().await.unwrap();
        stub.respond_json(200, serde_json::json!({"network": {"stations": []}}));

        let failure = service_for(&stub).get_snapshot().await.unwrap_err();
        assert_eq!(failure.error, UNAVAILABLE_MESSAGE);
        assert!(failure.details.contains("malformed"));
    }
}
