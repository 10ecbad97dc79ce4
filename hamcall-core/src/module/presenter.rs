//! Capabilities the lookup pipeline renders through.

use hamcall_common::{Coordinates, HistoryEntry, OperatorRecord, Theme};

use super::map::MarkerLabels;

pub trait ResultPresenter: Send + Sync {
    fn show_loading(&self);
    /// Also hides the external-link panel.
    fn show_error(&self, message: &str);
    fn show_record(&self, record: &OperatorRecord);
}

pub trait MapPresenter: Send + Sync {
    fn show(&self, point: Coordinates, labels: MarkerLabels);
    fn hide(&self);
    /// Tear down and rebuild the map views with the theme's tiles.
    fn apply_theme(&self, theme: Theme);
}

pub trait HistoryObserver: Send + Sync {
    fn on_history_changed(&self, entries: &[HistoryEntry]);
}
