use serde::{Deserialize, Serialize};

// Document upstream citybik.es v2 : GET /v2/networks/{network}
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDocument {
    pub network: Network,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub location: NetworkLocation,
    pub stations: Vec<RawStation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkLocation {
    pub city: String,
    pub country: String,
}

/// Enregistrement brut d'une station tel que publié par le fournisseur.
/// Seuls `id` et `name` sont obligatoires, le reste prend une valeur par défaut.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub free_bikes: Option<u32>,
    #[serde(default)]
    pub empty_slots: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub extra: RawExtra,
}

/// Champs étendus optionnels (absents chez certains réseaux)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExtra {
    pub ebikes: Option<u32>,
    pub normal_bikes: Option<u32>,
    /// Epoch fournisseur en secondes
    pub last_updated: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(rename = "freeBikes")]
    pub available_units: u32,
    #[serde(rename = "emptySlots")]
    pub open_slots: u32,
    #[serde(rename = "ebikes")]
    pub electric_units: u32,
    #[serde(rename = "normalBikes")]
    pub conventional_units: u32,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "freeBikes")]
    pub available_units: u64,
    #[serde(rename = "emptySlots")]
    pub open_slots: u64,
    #[serde(rename = "ebikes")]
    pub electric_units: u64,
    #[serde(rename = "normalBikes")]
    pub conventional_units: u64,
}

impl Totals {
    pub fn add(&mut self, station: &Station) {
        self.available_units += u64::from(station.available_units);
        self.open_slots += u64::from(station.open_slots);
        self.electric_units += u64::from(station.electric_units);
        self.conventional_units += u64::from(station.conventional_units);
    }
}

/// Capture immuable du réseau, servie telle quelle sur /api/live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub source_city: String,
    pub source_country: String,
    pub updated_at: String,
    pub totals: Totals,
    pub stations: Vec<Station>,
}
