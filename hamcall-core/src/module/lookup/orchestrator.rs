///! Lookup pipeline: validate → directory → history / map / render

use std::sync::Arc;

use hamcall_common::{Coordinates, OperatorRecord};
use tracing::{info, warn};

use super::client::Directory;
use crate::error::LookupError;
use crate::module::grid::grid_to_coordinates;
use crate::module::history::HistoryStore;
use crate::module::map::MarkerLabels;
use crate::module::presenter::{MapPresenter, ResultPresenter};

/// Shortest call sign worth sending to the directory
pub const MIN_CALLSIGN_LEN: usize = 3;

/// Trim and uppercase user input, rejecting empty and too-short values.
pub fn normalize_callsign(raw: &str) -> Result<String, LookupError> {
    let callsign = raw.trim().to_uppercase();
    match callsign.chars().count() {
        0 => Err(LookupError::EmptyInput),
        n if n < MIN_CALLSIGN_LEN => Err(LookupError::TooShort(callsign)),
        _ => Ok(callsign),
    }
}

/// Where to put the marker: directory coordinates, else the grid centroid.
pub fn resolve_location(record: &OperatorRecord) -> Option<Coordinates> {
    record
        .coordinates
        .or_else(|| grid_to_coordinates(&record.grid_square))
}

/// Drives one lookup at a time from raw input to every presenter.
///
/// Concurrent calls are allowed and not cancelled; whichever resolves last
/// leaves its result on screen.
pub struct LookupOrchestrator {
    directory: Arc<dyn Directory>,
    history: Arc<HistoryStore>,
    presenter: Arc<dyn ResultPresenter>,
    map: Option<Arc<dyn MapPresenter>>,
}

impl LookupOrchestrator {
    pub fn new(
        directory: Arc<dyn Directory>,
        history: Arc<HistoryStore>,
        presenter: Arc<dyn ResultPresenter>,
        map: Option<Arc<dyn MapPresenter>>,
    ) -> Self {
        Self { directory, history, presenter, map }
    }

    #[cfg(test)]
    fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Run the full lookup. Every outcome has been presented by the time
    /// this returns; the result is for callers that need a status.
    pub async fn submit_lookup(&self, raw: &str) -> Result<OperatorRecord, LookupError> {
        let callsign = match normalize_callsign(raw) {
            Ok(callsign) => callsign,
            Err(e) => {
                self.present_failure(&e);
                return Err(e);
            }
        };

        self.presenter.show_loading();

        match self.directory.lookup(&callsign).await {
            Ok(record) => {
                info!("Lookup {} succeeded ({})", callsign, record.license_class);
                self.present_success(&record).await;
                Ok(record)
            }
            Err(e) => {
                warn!("Lookup {} failed: {}", callsign, e);
                self.present_failure(&e);
                Err(e)
            }
        }
    }

    async fn present_success(&self, record: &OperatorRecord) {
        // awaited so a follow-up lookup of the same call sign sees this entry
        self.history.record(&record.callsign, &record.name).await;

        if let Some(map) = &self.map {
            match resolve_location(record) {
                Some(point) => map.show(
                    point,
                    MarkerLabels::new(&record.callsign, &record.grid_square, record.address.to_string()),
                ),
                None => map.hide(),
            }
        }

        self.presenter.show_record(record);
    }

    fn present_failure(&self, error: &LookupError) {
        self.presenter.show_error(&error.user_message());
        if let Some(map) = &self.map {
            map.hide();
        }
    }
}
