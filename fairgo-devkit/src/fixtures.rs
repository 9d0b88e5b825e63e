/*!
Fixtures JSON aux formats échangés par FairGo

- Document réseau upstream (citybik.es v2)
- Snapshot servi par le kernel sur /api/live
*/

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

pub struct FixtureBuilder;

impl FixtureBuilder {
    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    /// Station upstream complète, horodatée `index` minutes après la base
    pub fn station(index: usize) -> Value {
        let ts = Self::base_time() + Duration::minutes(index as i64);
        json!({
            "id": format!("station-{index}"),
            "name": format!("Station {index}"),
            "free_bikes": index % 7 + 1,
            "empty_slots": index % 5,
            "timestamp": ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            "extra": {
                "ebikes": index % 3,
                "normal_bikes": index % 4
            }
        })
    }

    pub fn network_with(city: &str, country: &str, stations: Vec<Value>) -> Value {
        json!({
            "network": {
                "id": "velib",
                "location": { "city": city, "country": country },
                "stations": stations
            }
        })
    }

    /// Document réseau avec `count` stations générées
    pub fn network(city: &str, country: &str, count: usize) -> Value {
        Self::network_with(city, country, (0..count).map(Self::station).collect())
    }

    /// Snapshot au format /api/live
    pub fn snapshot(city: &str, station_count: usize) -> Value {
        let stations: Vec<Value> = (0..station_count)
            .map(|i| {
                let ts = Self::base_time() + Duration::minutes(i as i64);
                json!({
                    "id": format!("station-{i}"),
                    "name": format!("Station {i}"),
                    "freeBikes": i % 7 + 1,
                    "emptySlots": i % 5,
                    "ebikes": i % 3,
                    "normalBikes": i % 4,
                    "lastUpdated": ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
                })
            })
            .collect();

        let sum = |field: &str| -> u64 {
            stations.iter().filter_map(|s| s[field].as_u64()).sum()
        };
        let updated_at = stations
            .iter()
            .filter_map(|s| s["lastUpdated"].as_str())
            .max()
            .map(str::to_string)
            .unwrap_or_else(|| Self::base_time().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());
        let totals = json!({
            "freeBikes": sum("freeBikes"),
            "emptySlots": sum("emptySlots"),
            "ebikes": sum("ebikes"),
            "normalBikes": sum("normalBikes")
        });

        json!({
            "sourceCity": city,
            "sourceCountry": "FR",
            "updatedAt": updated_at,
            "totals": totals,
            "stations": stations
        })
    }
}
