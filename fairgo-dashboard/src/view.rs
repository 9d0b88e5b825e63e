//! Text rendering of the live operations panel

use crate::state::PollerState;
use chrono::{DateTime, TimeZone};
use std::fmt::Write;

pub const TOP_STATIONS: usize = 6;

/// `HH:MM` in the given timezone, `--:--` when the timestamp does not parse
pub fn format_clock<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::parse_from_rfc3339(timestamp)
        .map(|at| at.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|_| "--:--".to_string())
}

pub fn render<Tz: TimeZone>(state: &PollerState, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "=== Live Fleet Intelligence ===");

    let metric = |value: u64| -> String {
        if state.loading {
            "…".to_string()
        } else {
            value.to_string()
        }
    };

    let totals = state.snapshot.as_ref().map(|s| s.totals).unwrap_or_default();
    let last_sync = state
        .snapshot
        .as_ref()
        .map(|s| format_clock(&s.updated_at, tz))
        .unwrap_or_else(|| "--:--".to_string());

    let _ = writeln!(out, "Vehicles Available : {}", metric(totals.free_bikes));
    let _ = writeln!(out, "Electric Fleet     : {}", metric(totals.ebikes));
    let _ = writeln!(out, "Pickup Slots Open  : {}", metric(totals.empty_slots));
    let _ = writeln!(
        out,
        "Last Sync          : {}",
        if state.loading { "…".to_string() } else { last_sync }
    );
    if let Some(snapshot) = &state.snapshot {
        let _ = writeln!(out, "Source             : {}, {}", snapshot.source_city, snapshot.source_country);
    }
    let _ = writeln!(out);

    match (&state.snapshot, &state.error) {
        (None, _) if state.loading => {
            let _ = writeln!(out, "Loading live feed…");
        }
        (_, Some(error)) => {
            let _ = writeln!(out, "! {}", error);
        }
        (Some(snapshot), None) => {
            for station in snapshot.top_stations(TOP_STATIONS) {
                let updated = station
                    .last_updated
                    .as_deref()
                    .map(|ts| format_clock(ts, tz))
                    .unwrap_or_else(|| "--:--".to_string());
                let _ = writeln!(
                    out,
                    "{:<32} updated {}  Ready {:>3}  E-Assist {:>3}  Combustion {:>3}  Open Docks {:>3}",
                    station.name,
                    updated,
                    station.ready(),
                    station.ebikes,
                    station.normal_bikes,
                    station.empty_slots
                );
            }
        }
        (None, None) => {
            let _ = writeln!(out, "No live data yet.");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snapshot;
    use chrono::Utc;
    use fairgo_devkit::FixtureBuilder;

    fn snapshot(count: usize) -> Snapshot {
        serde_json::from_value(FixtureBuilder::snapshot("Paris", count)).unwrap()
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock("2024-05-01T10:07:00.000Z", &Utc), "10:07");
        assert_eq!(format_clock("not a date", &Utc), "--:--");
    }

    #[test]
    fn test_loading_without_snapshot() {
        let out = render(&PollerState::default(), &Utc);
        assert!(out.contains("Loading live feed"));
        assert!(out.contains("Last Sync          : …"));
    }

    #[test]
    fn test_renders_top_six_stations() {
        let state = PollerState {
            snapshot: Some(snapshot(8)),
            loading: false,
            error: None,
        };
        let out = render(&state, &Utc);

        assert!(out.contains("Source             : Paris, FR"));
        assert!(out.contains("Last Sync          : 10:07"));
        let station_lines = out.lines().filter(|l| l.contains("Open Docks")).count();
        assert_eq!(station_lines, TOP_STATIONS);
        assert!(out.lines().find(|l| l.contains("Open Docks")).unwrap().starts_with("Station 5"));
    }

    #[test]
    fn test_error_shown_with_stale_totals() {
        let good = snapshot(2);
        let state = PollerState {
            snapshot: Some(good.clone()),
            loading: false,
            error: Some("Live feed unavailable".to_string()),
        };
        let out = render(&state, &Utc);

        assert!(out.contains("! Live feed unavailable"));
        assert!(out.contains(&format!("Vehicles Available : {}", good.totals.free_bikes)));
    }
}
