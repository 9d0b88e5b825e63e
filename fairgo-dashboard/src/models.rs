//! Snapshot as served by the kernel on `/api/live` (kernel live contract)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub free_bikes: u32,
    pub empty_slots: u32,
    pub ebikes: u32,
    pub normal_bikes: u32,
    pub last_updated: Option<String>,
}

impl Station {
    /// Vehicles ready to ride, as ranked on the dashboard
    pub fn ready(&self) -> u32 {
        self.free_bikes + self.ebikes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub free_bikes: u64,
    pub empty_slots: u64,
    pub ebikes: u64,
    pub normal_bikes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub source_city: String,
    pub source_country: String,
    pub updated_at: String,
    pub totals: Totals,
    #[serde(default)]
    pub stations: Vec<Station>,
}

impl Snapshot {
    /// Stations ranked by ready vehicles, highest first (stable for ties)
    pub fn top_stations(&self, limit: usize) -> Vec<&Station> {
        let mut ranked: Vec<&Station> = self.stations.iter().collect();
        ranked.sort_by(|a, b| b.ready().cmp(&a.ready()));
        ranked.truncate(limit);
        ranked
    }
}
