///! Map state and slippy-map tile math
///!
///! Rendering backends own a [`MapState`] and draw whatever views it reports
///! as visible. The state tracks an inline map and an expandable full map,
///! both following the current marker.

use std::f64::consts::PI;

use hamcall_common::{Coordinates, Theme};
use tracing::{debug, warn};

use super::links::directions_url;

pub const DARK_TILE_TEMPLATE: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";
pub const LIGHT_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const INLINE_ZOOM: u8 = 8;
pub const FULL_ZOOM: u8 = 10;

/// Web Mercator latitude limit
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

const UNKNOWN_LABEL: &str = "Unknown";

pub fn tile_template(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => DARK_TILE_TEMPLATE,
        Theme::Light => LIGHT_TILE_TEMPLATE,
    }
}

/// Web Mercator tile index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn containing(point: Coordinates, zoom: u8) -> Self {
        let n = 2f64.powi(zoom as i32);
        let max = (n as u32).saturating_sub(1);

        let x = ((point.lng + 180.0) / 360.0 * n).floor();
        let lat_rad = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

        Self {
            x: (x.max(0.0) as u32).min(max),
            y: (y.max(0.0) as u32).min(max),
            z: zoom,
        }
    }

    /// Fill a `{s}/{z}/{x}/{y}{r}` template.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{s}", "a")
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
            .replace("{r}", "")
    }
}

/// Text attached to the map marker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerLabels {
    pub callsign: String,
    pub grid: String,
    pub address: String,
}

impl MarkerLabels {
    pub fn new(callsign: impl Into<String>, grid: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            grid: grid.into(),
            address: address.into(),
        }
    }

    fn or_unknown(value: &str) -> &str {
        if value.trim().is_empty() { UNKNOWN_LABEL } else { value }
    }

    pub fn popup(&self) -> String {
        format!(
            "{}\nGrid: {}",
            Self::or_unknown(&self.callsign),
            Self::or_unknown(&self.grid)
        )
    }

    /// Popup for the full map, with a directions link.
    pub fn full_popup(&self) -> String {
        format!("{}\nGet Directions: {}", self.popup(), directions_url(&self.address))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub point: Coordinates,
    pub labels: MarkerLabels,
}

/// One map instance
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub theme: Theme,
    pub marker: Option<Marker>,
}

impl MapView {
    fn new(center: Coordinates, zoom: u8, theme: Theme) -> Self {
        Self { center, zoom, theme, marker: None }
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }

    pub fn tile(&self) -> TileCoord {
        TileCoord::containing(self.center, self.zoom)
    }

    pub fn tile_url(&self) -> String {
        self.tile().url(tile_template(self.theme))
    }
}

#[derive(Debug, Clone)]
pub struct MapState {
    theme: Theme,
    current: Option<Marker>,
    inline: Option<MapView>,
    inline_visible: bool,
    full: Option<MapView>,
    full_visible: bool,
}

impl MapState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            current: None,
            inline: None,
            inline_visible: false,
            full: None,
            full_visible: false,
        }
    }

    #[cfg(test)]
    fn current_marker(&self) -> Option<&Marker> {
        self.current.as_ref()
    }

    /// The inline view, if it is on screen.
    pub fn inline_view(&self) -> Option<&MapView> {
        self.inline.as_ref().filter(|_| self.inline_visible)
    }

    /// The full view, if it is on screen.
    pub fn full_view(&self) -> Option<&MapView> {
        self.full.as_ref().filter(|_| self.full_visible)
    }

    /// Center the inline map on `point` and move the marker there.
    ///
    /// Returns `false` (and changes nothing) for invalid coordinates.
    pub fn show(&mut self, point: Coordinates, labels: MarkerLabels) -> bool {
        if !point.is_valid() {
            warn!("Invalid coordinates provided to map: {:?}", point);
            return false;
        }

        let marker = Marker { point, labels };
        let view = self
            .inline
            .get_or_insert_with(|| MapView::new(point, INLINE_ZOOM, self.theme));
        view.set_view(point, INLINE_ZOOM);
        view.marker = Some(marker.clone());

        self.current = Some(marker);
        self.inline_visible = true;
        true
    }

    /// Hide both views and forget the marker; `expand` needs a new `show`.
    pub fn hide(&mut self) {
        self.inline_visible = false;
        self.full_visible = false;
        self.current = None;
        if let Some(view) = self.inline.as_mut() {
            view.marker = None;
        }
        if let Some(view) = self.full.as_mut() {
            view.marker = None;
        }
    }

    /// Open the full map on the current marker.
    pub fn expand(&mut self) -> Option<&MapView> {
        let Some(marker) = self.current.clone() else {
            warn!("No valid coordinates available for full map");
            return None;
        };

        let view = self
            .full
            .get_or_insert_with(|| MapView::new(marker.point, FULL_ZOOM, self.theme));
        view.set_view(marker.point, FULL_ZOOM);
        view.marker = Some(marker);

        self.full_visible = true;
        self.full.as_ref()
    }

    pub fn close_full(&mut self) {
        self.full_visible = false;
    }

    /// Recreate every existing view with the new theme's tiles, keeping
    /// center, zoom and marker.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let marker = self.current.clone();

        for view in [&mut self.inline, &mut self.full] {
            if let Some(old) = view.take() {
                let mut rebuilt = MapView::new(old.center, old.zoom, theme);
                rebuilt.marker = marker.clone();
                *view = Some(rebuilt);
            }
        }
        debug!("Map views rebuilt for {} theme", theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w1aw() -> (Coordinates, MarkerLabels) {
        (
            Coordinates::new(41.7, -72.7),
            MarkerLabels::new("W1AW", "FN31pr", "225 MAIN ST, NEWINGTON, CT 06111, United States"),
        )
    }

    #[test]
    fn test_tile_math() {
        assert_eq!(TileCoord::containing(Coordinates::new(0.0, 0.0), 0), TileCoord { x: 0, y: 0, z: 0 });
        assert_eq!(TileCoord::containing(Coordinates::new(0.0, 0.0), 1), TileCoord { x: 1, y: 1, z: 1 });
        assert_eq!(TileCoord::containing(Coordinates::new(41.7, -72.7), 8), TileCoord { x: 76, y: 95, z: 8 });
        assert_eq!(TileCoord::containing(Coordinates::new(41.7, -72.7), 10), TileCoord { x: 305, y: 381, z: 10 });
        // clamped at the edges
        let edge = TileCoord::containing(Coordinates::new(-89.0, 180.0), 2);
        assert_eq!((edge.x, edge.y), (3, 3));
    }

    #[test]
    fn test_tile_urls_follow_theme() {
        let tile = TileCoord { x: 76, y: 95, z: 8 };
        assert_eq!(tile.url(tile_template(Theme::Dark)), "https://a.basemaps.cartocdn.com/dark_all/8/76/95.png");
        assert_eq!(tile.url(tile_template(Theme::Light)), "https://a.tile.openstreetmap.org/8/76/95.png");
    }

    #[test]
    fn test_popup_labels() {
        let labels = MarkerLabels::new("W1AW", "", "");
        assert_eq!(labels.popup(), "W1AW\nGrid: Unknown");
        assert!(w1aw().1.full_popup().contains("destination=225%20MAIN%20ST"));
    }

    #[test]
    fn test_show_and_hide() {
        let mut state = MapState::new(Theme::Dark);
        let (point, labels) = w1aw();

        assert!(state.show(point, labels.clone()));
        let view = state.inline_view().unwrap();
        assert_eq!(view.zoom, INLINE_ZOOM);
        assert_eq!(view.marker.as_ref().unwrap().labels, labels);

        state.hide();
        assert!(state.inline_view().is_none());
        assert!(state.current_marker().is_none());
    }

    #[test]
    fn test_hide_forgets_marker_for_expand() {
        let mut state = MapState::new(Theme::Dark);
        let (point, labels) = w1aw();
        state.show(point, labels);
        state.expand();

        state.hide();

        assert!(state.full_view().is_none());
        assert!(state.expand().is_none());
    }

    #[test]
    fn test_invalid_point_is_ignored() {
        let mut state = MapState::new(Theme::Dark);
        assert!(!state.show(Coordinates::new(f64::NAN, 1.0), MarkerLabels::default()));
        assert!(!state.show(Coordinates::new(95.0, 1.0), MarkerLabels::default()));
        assert!(state.inline_view().is_none());
    }

    #[test]
    fn test_expand_requires_marker() {
        let mut state = MapState::new(Theme::Light);
        assert!(state.expand().is_none());

        let (point, labels) = w1aw();
        state.show(point, labels);
        let full = state.expand().unwrap();
        assert_eq!(full.zoom, FULL_ZOOM);
        assert_eq!(full.center, point);

        state.close_full();
        assert!(state.full_view().is_none());
    }

    #[test]
    fn test_theme_change_rebuilds_views() {
        let mut state = MapState::new(Theme::Dark);
        let (point, labels) = w1aw();
        state.show(point, labels);
        state.expand();

        state.apply_theme(Theme::Light);

        let inline = state.inline_view().unwrap();
        assert_eq!(inline.theme, Theme::Light);
        assert_eq!(inline.zoom, INLINE_ZOOM);
        assert_eq!(inline.marker.as_ref().unwrap().point, point);
        assert!(inline.tile_url().starts_with("https://a.tile.openstreetmap.org/8/"));
        assert_eq!(state.full_view().unwrap().theme, Theme::Light);
    }
}
