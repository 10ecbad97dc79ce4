///! HamDB response parser
///!
///! Validates the response envelope and normalizes the operator fields into an
///! [`OperatorRecord`].

use hamcall_common::{Address, Coordinates, LicenseClass, OperatorRecord, OperatorStatus};

use super::types::{DirectoryEnvelope, RawCallsign};
use crate::error::{LookupError, NO_RESULTS_MESSAGE, TransportFailure};

/// Embedded status value of a successful lookup
const STATUS_OK: &str = "OK";

/// Parse a 2xx response body.
///
/// `requested` is the call sign that was sent; it stands in when the
/// directory leaves `call` blank.
pub fn parse_directory_response(requested: &str, body: &str) -> Result<OperatorRecord, LookupError> {
    let envelope: DirectoryEnvelope = serde_json::from_str(body)
        .map_err(|e| TransportFailure::Parse(e.to_string()))?;

    let messages = envelope.hamdb.messages;
    if messages.status != STATUS_OK {
        let message = messages
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NO_RESULTS_MESSAGE.to_string());
        return Err(LookupError::Directory(message));
    }

    let raw = envelope
        .hamdb
        .callsign
        .ok_or_else(|| TransportFailure::Parse("status OK without callsign object".to_string()))?;

    Ok(build_record(requested, raw))
}

fn build_record(requested: &str, raw: RawCallsign) -> OperatorRecord {
    let callsign = match raw.call.trim() {
        "" => requested.trim().to_uppercase(),
        call => call.to_uppercase(),
    };

    OperatorRecord {
        callsign,
        name: format_name(&raw.fname, &raw.mi, &raw.name, &raw.suffix),
        license_class: LicenseClass::from_code(&raw.class, &raw.fname),
        status: OperatorStatus::from_code(&raw.status),
        coordinates: parse_coordinates(&raw.lat, &raw.lon),
        grid_square: raw.grid.trim().to_string(),
        license_expiration: raw.expires,
        address: Address {
            line1: raw.addr1,
            line2: raw.addr2,
            state: raw.state,
            zip: raw.zip,
            country: raw.country,
        },
    }
}

/// "first [mi.] last [suffix]"
pub fn format_name(first: &str, middle_initial: &str, last: &str, suffix: &str) -> String {
    let mut name = String::new();
    name.push_str(first.trim());
    name.push(' ');
    if !middle_initial.trim().is_empty() {
        name.push_str(middle_initial.trim());
        name.push_str(". ");
    }
    name.push_str(last.trim());
    if !suffix.trim().is_empty() {
        name.push(' ');
        name.push_str(suffix.trim());
    }
    name.trim().to_string()
}

/// Both values must be present and finite, otherwise the pair is dropped.
pub fn parse_coordinates(lat: &str, lng: &str) -> Option<Coordinates> {
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    Some(Coordinates { lat, lng })
}
