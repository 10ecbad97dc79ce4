///! Terminal presenters
///!
///! Text rendering of lookup results, recent history and map views, plus the
///! presenter implementations the lookup pipeline draws through.

use std::sync::Mutex;

use chrono::{DateTime, Local, Utc};
use hamcall_common::{Coordinates, HistoryEntry, OperatorRecord, Theme};
use hamcall_core::module::links::ExternalLinks;
use hamcall_core::module::map::{MapState, MapView, MarkerLabels};
use hamcall_core::module::presenter::{HistoryObserver, MapPresenter, ResultPresenter};
use tracing::debug;

pub const LOADING_MESSAGE: &str = "Looking up callsign...";
pub const EMPTY_HISTORY_MESSAGE: &str = "No recent lookups";
const UNKNOWN_FIELD: &str = "Unknown";

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() { UNKNOWN_FIELD } else { value }
}

/// "Today", "Yesterday", "N days ago" within a week, else the local date.
pub fn format_relative_date(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // future timestamps (clock skew) count as today
    let days = (now - timestamp).num_days().max(0);
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        _ => timestamp.with_timezone(&Local).format("%-m/%-d/%Y").to_string(),
    }
}

pub fn render_record(record: &OperatorRecord) -> String {
    let links = ExternalLinks::for_record(record);
    let coordinates = record
        .coordinates
        .map(|c| c.to_string())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

    let rows = [
        ("Call Sign", format!("{} ({})", record.callsign, record.license_class)),
        ("Operator", or_unknown(&record.name).to_string()),
        ("Location", record.address.to_string()),
        ("Grid", or_unknown(&record.grid_square).to_string()),
        ("Coordinates", coordinates),
        ("License Expires", or_unknown(&record.license_expiration).to_string()),
        ("Status", record.status.to_string()),
        ("QRZ", links.profile),
        ("Directions", links.directions),
    ];

    rows.iter()
        .map(|(label, value)| format!("{:<16} {}", format!("{}:", label), value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered list, most recent first. Numbers match `/recall <n>`.
pub fn render_history(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return EMPTY_HISTORY_MESSAGE.to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>2}. {:<10} {:<28} {}",
                i + 1,
                entry.callsign,
                entry.operator,
                format_relative_date(entry.timestamp, now)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_map_view(title: &str, view: &MapView, popup: &str) -> String {
    format!(
        "{} ({} tiles, zoom {}) centered at {}\n  tile: {}\n  {}",
        title,
        view.theme,
        view.zoom,
        view.center,
        view.tile_url(),
        popup.replace('\n', "\n  ")
    )
}

/// Prints results and errors to stdout.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl ResultPresenter for TerminalPresenter {
    fn show_loading(&self) {
        println!("{}", LOADING_MESSAGE);
    }

    fn show_error(&self, message: &str) {
        println!("Error: {}", message);
    }

    fn show_record(&self, record: &OperatorRecord) {
        println!("{}", render_record(record));
    }
}

/// Terminal stand-in for the inline and full maps
pub struct TerminalMap {
    state: Mutex<MapState>,
}

impl TerminalMap {
    pub fn new(theme: Theme) -> Self {
        Self { state: Mutex::new(MapState::new(theme)) }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MapState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }

    /// Open the full map on the last shown marker, rendered for printing.
    pub fn expand(&self) -> Option<String> {
        self.with_state(|state| {
            let view = state.expand()?;
            let popup = view.marker.as_ref().map(|m| m.labels.full_popup()).unwrap_or_default();
            Some(render_map_view("Full map", view, &popup))
        })
    }

    pub fn close_full(&self) {
        self.with_state(|state| state.close_full());
    }

    /// Rendered inline map, if one is on screen.
    pub fn inline(&self) -> Option<String> {
        self.with_state(|state| {
            state.inline_view().map(|view| {
                let popup = view.marker.as_ref().map(|m| m.labels.popup()).unwrap_or_default();
                render_map_view("Map", view, &popup)
            })
        })
    }
}

impl MapPresenter for TerminalMap {
    fn show(&self, point: Coordinates, labels: MarkerLabels) {
        if self.with_state(|state| state.show(point, labels)) {
            if let Some(text) = self.inline() {
                println!("{}", text);
            }
        }
    }

    fn hide(&self) {
        self.with_state(|state| state.hide());
    }

    fn apply_theme(&self, theme: Theme) {
        self.with_state(|state| state.apply_theme(theme));
        debug!("Terminal map switched to {} tiles", theme);
    }
}

/// Keeps the latest history snapshot for listing and `/recall`.
#[derive(Debug, Default)]
pub struct HistoryPanel {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Call sign at a zero-based position.
    pub fn callsign_at(&self, index: usize) -> Option<String> {
        self.snapshot().get(index).map(|e| e.callsign.clone())
    }

    pub fn render(&self, now: DateTime<Utc>) -> String {
        render_history(&self.snapshot(), now)
    }
}

impl HistoryObserver for HistoryPanel {
    fn on_history_changed(&self, entries: &[HistoryEntry]) {
        *self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = entries.to_vec();
    }
}
