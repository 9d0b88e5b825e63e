/**
 * NORMALIZER - Conversion des enregistrements upstream vers le modèle canonique
 *
 * RÔLE :
 * Fonction pure : stations brutes -> stations canoniques + totaux agrégés.
 * Aucune erreur possible, chaque champ a une valeur par défaut.
 *
 * RÈGLES :
 * - Sélection des 12 premières stations dans l'ordre upstream (troncature, pas de classement)
 * - Totaux calculés uniquement sur les stations retenues
 * - lastUpdated : epoch fournisseur (> 0) en priorité, sinon timestamp du flux
 * - updatedAt : maximum lexicographique des lastUpdated, sinon l'heure courante
 */

use crate::models::{NetworkDocument, RawStation, Snapshot, Station, Totals};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Nombre maximal de stations exposées dans un snapshot
pub const MAX_STATIONS: usize = 12;

// Format ISO-8601 Zulu à la milliseconde : trié lexicographiquement = trié chronologiquement
const ISO_MILLIS: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

pub fn format_iso(at: OffsetDateTime) -> Option<String> {
    at.to_offset(time::UtcOffset::UTC).format(ISO_MILLIS).ok()
}

fn epoch_to_iso(epoch_secs: f64) -> Option<String> {
    if !epoch_secs.is_finite() || epoch_secs <= 0.0 {
        return None;
    }
    // Epoch hors plage : None, le timestamp du flux prend le relais
    let millis = (epoch_secs * 1000.0).trunc() as i128;
    let nanos = millis.checked_mul(1_000_000)?;
    let at = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    format_iso(at)
}

pub fn normalize_station(raw: &RawStation) -> Station {
    let last_updated = raw
        .extra
        .last_updated
        .and_then(epoch_to_iso)
        .or_else(|| raw.timestamp.clone())
        .filter(|ts| !ts.is_empty());

    Station {
        id: raw.id.clone(),
        name: raw.name.clone(),
        available_units: raw.free_bikes.unwrap_or(0),
        open_slots: raw.empty_slots.unwrap_or(0),
        electric_units: raw.extra.ebikes.unwrap_or(0),
        conventional_units: raw.extra.normal_bikes.unwrap_or(0),
        last_updated,
    }
}

/// Tronque puis normalise, les totaux ne portent que sur la sélection
pub fn normalize_stations(records: &[RawStation]) -> (Vec<Station>, Totals) {
    let stations: Vec<Station> = records
        .iter()
        .take(MAX_STATIONS)
        .map(normalize_station)
        .collect();

    let mut totals = Totals::default();
    for station in &stations {
        totals.add(station);
    }
    (stations, totals)
}

pub fn latest_update(stations: &[Station], now: OffsetDateTime) -> String {
    stations
        .iter()
        .filter_map(|s| s.last_updated.as_deref())
        .max()
        .map(str::to_string)
        .or_else(|| format_iso(now))
        .unwrap_or_default()
}

/// Construit un snapshot complet à partir du document upstream
pub fn build_snapshot(doc: &NetworkDocument, now: OffsetDateTime) -> Snapshot {
    let (stations, totals) = normalize_stations(&doc.network.stations);
    let updated_at = latest_update(&stations, now);

    Snapshot {
        source_city: doc.network.location.city.clone(),
        source_country: doc.network.location.country.clone(),
        updated_at,
        totals,
        stations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawExtra;
    use time::macros::datetime;

    fn raw(id: &str, free: u32, slots: u32) -> RawStation {
        RawStation {
            id: id.to_string(),
            name: format!("Station {id}"),
            free_bikes: Some(free),
            empty_slots: Some(slots),
            timestamp: None,
            extra: RawExtra::default(),
        }
    }

    #[test]
    fn test_missing_extra_defaults_to_zero() {
        let station = normalize_station(&raw("a", 5, 3));
        assert_eq!(station.electric_units, 0);
        assert_eq!(station.conventional_units, 0);
        assert_eq!(station.available_units, 5);
        assert_eq!(station.open_slots, 3);
        assert!(station.last_updated.is_none());
    }

    #[test]
    fn test_counts_are_not_reconciled() {
        let mut record = raw("a", 2, 0);
        record.extra.ebikes = Some(4);
        record.extra.normal_bikes = Some(7);
        let station = normalize_station(&record);
        assert_eq!(station.available_units, 2);
        assert_eq!(station.electric_units, 4);
        assert_eq!(station.conventional_units, 7);
    }

    #[test]
    fn test_epoch_preferred_over_timestamp() {
        let mut record = raw("a", 1, 1);
        record.timestamp = Some("2020-01-01T00:00:00.000000Z".into());
        record.extra.last_updated = Some(1_714_557_600.0);
        let station = normalize_station(&record);
        assert_eq!(station.last_updated.as_deref(), Some("2024-05-01T10:00:00.000Z"));
    }

    #[test]
    fn test_zero_epoch_falls_back_to_timestamp() {
        let mut record = raw("a", 1, 1);
        record.timestamp = Some("2024-05-01T09:59:12.345000Z".into());
        record.extra.last_updated = Some(0.0);
        let station = normalize_station(&record);
        assert_eq!(station.last_updated.as_deref(), Some("2024-05-01T09:59:12.345000Z"));
    }

    #[test]
    fn test_out_of_range_epoch_falls_back_to_timestamp() {
        let doc: NetworkDocument = serde_json::from_value(serde_json::json!({
            "network": {
                "location": { "city": "Paris", "country": "FR" },
                "stations": [
                    {
                        "id": "a", "name": "A", "free_bikes": 1, "empty_slots": 1,
                        "timestamp": "2024-05-01T09:00:00.000Z",
                        "extra": { "last_updated": 1e30 }
                    },
                    { "id": "b", "name": "B", "extra": { "last_updated": 1e300 } },
                    { "id": "c", "name": "C", "extra": { "last_updated": 1e15 } }
                ]
            }
        }))
        .unwrap();

        let snapshot = build_snapshot(&doc, datetime!(2030-01-01 0:00 UTC));
        assert_eq!(snapshot.stations[0].last_updated.as_deref(), Some("2024-05-01T09:00:00.000Z"));
        assert!(snapshot.stations[1].last_updated.is_none());
        assert!(snapshot.stations[2].last_updated.is_none());
        assert_eq!(snapshot.updated_at, "2024-05-01T09:00:00.000Z");
    }

    #[test]
    fn test_truncates_to_first_twelve_in_upstream_order() {
        let records: Vec<RawStation> = (0..20).map(|i| raw(&format!("s{i}"), i, 1)).collect();
        let (stations, totals) = normalize_stations(&records);

        assert_eq!(stations.len(), MAX_STATIONS);
        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("s{i}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());

        // 0 + 1 + ... + 11
        assert_eq!(totals.available_units, 66);
        assert_eq!(totals.open_slots, 12);
    }

    #[test]
    fn test_updated_at_is_lexicographic_max() {
        let mut a = raw("a", 1, 1);
        a.timestamp = Some("2024-05-01T10:00:00.000Z".into());
        let mut b = raw("b", 1, 1);
        b.timestamp = Some("2024-05-01T10:05:00.000Z".into());
        let c = raw("c", 1, 1);

        let (stations, _) = normalize_stations(&[a, b, c]);
        let now = datetime!(2030-01-01 0:00 UTC);
        assert_eq!(latest_update(&stations, now), "2024-05-01T10:05:00.000Z");
    }

    #[test]
    fn test_updated_at_falls_back_to_now() {
        let (stations, _) = normalize_stations(&[raw("a", 1, 1)]);
        let now = datetime!(2024-06-02 8:30:15.250 UTC);
        assert_eq!(latest_update(&stations, now), "2024-06-02T08:30:15.250Z");
    }

    #[test]
    fn test_latest_timestamp_beyond_cut_is_ignored() {
        let mut records: Vec<RawStation> = (0..13).map(|i| raw(&format!("s{i}"), 1, 1)).collect();
        records[0].timestamp = Some("2024-05-01T10:00:00.000Z".into());
        records[12].timestamp = Some("2024-05-01T23:00:00.000Z".into());

        let (stations, _) = normalize_stations(&records);
        let now = datetime!(2030-01-01 0:00 UTC);
        assert_eq!(latest_update(&stations, now), "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut records: Vec<RawStation> = (0..15).map(|i| raw(&format!("s{i}"), i, 2)).collect();
        records[3].extra.ebikes = Some(2);
        records[4].extra.last_updated = Some(1_714_557_600.5);

        let first = normalize_stations(&records);
        let second = normalize_stations(&records);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first.0).unwrap(),
            serde_json::to_vec(&second.0).unwrap()
        );
    }
}
