///! Maidenhead locator decoding

use hamcall_common::Coordinates;
use tracing::warn;

/// Field size in degrees (longitude, latitude)
const FIELD_DEGREES: (f64, f64) = (20.0, 10.0);
/// Square size in degrees (longitude, latitude)
const SQUARE_DEGREES: (f64, f64) = (2.0, 1.0);

/// Centroid of the 4-character grid square, e.g. "FN31" or "FN31pr".
///
/// Only the field and square pairs are decoded; any subsquare suffix is
/// ignored. Returns `None` for anything that is not a valid locator.
pub fn grid_to_coordinates(grid: &str) -> Option<Coordinates> {
    let grid = grid.trim().to_uppercase();
    let chars: Vec<char> = grid.chars().take(4).collect();

    if chars.is_empty() {
        return None;
    }
    if chars.len() < 4 {
        warn!("Grid square {:?} too short, need at least 4 characters", grid);
        return None;
    }

    let field_lng = field_index(chars[0])?;
    let field_lat = field_index(chars[1])?;
    let square_lng = chars[2].to_digit(10)? as f64;
    let square_lat = chars[3].to_digit(10)? as f64;

    let lng = field_lng * FIELD_DEGREES.0 - 180.0 + square_lng * SQUARE_DEGREES.0;
    let lat = field_lat * FIELD_DEGREES.1 - 90.0 + square_lat * SQUARE_DEGREES.1;

    Some(Coordinates {
        lat: lat + SQUARE_DEGREES.1 / 2.0,
        lng: lng + SQUARE_DEGREES.0 / 2.0,
    })
}

/// 'A'..='R' → 0..=17
fn field_index(c: char) -> Option<f64> {
    match c {
        'A'..='R' => Some((c as u8 - b'A') as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Coordinates, lat: f64, lng: f64) {
        assert!((actual.lat - lat).abs() < 1e-9, "lat {} != {}", actual.lat, lat);
        assert!((actual.lng - lng).abs() < 1e-9, "lng {} != {}", actual.lng, lng);
    }

    #[test]
    fn test_fn20_centroid() {
        // F → -180 + 5*20 = -80, square 2 → -76; N → -90 + 13*10 = 40, square 0 → 40
        let point = grid_to_coordinates("FN20").unwrap();
        assert_close(point, 40.5, -75.0);
    }

    #[test]
    fn test_subsquare_and_case_are_ignored() {
        let upper = grid_to_coordinates("FN31").unwrap();
        let lower = grid_to_coordinates("fn31pr").unwrap();
        assert_eq!(upper, lower);
        assert_close(upper, 41.5, -73.0);
    }

    #[test]
    fn test_corner_fields() {
        assert_close(grid_to_coordinates("AA00").unwrap(), -89.5, -179.0);
        assert_close(grid_to_coordinates("RR99").unwrap(), 89.5, 179.0);
    }

    #[test]
    fn test_invalid_grids() {
        assert_eq!(grid_to_coordinates(""), None);
        assert_eq!(grid_to_coordinates("FN2"), None);
        assert_eq!(grid_to_coordinates("ZZ00"), None);
        assert_eq!(grid_to_coordinates("FNAB"), None);
        assert_eq!(grid_to_coordinates("É N20"), None);
    }
}
