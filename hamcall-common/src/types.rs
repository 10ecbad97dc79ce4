use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// License class derived from the directory's single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LicenseClass {
    Technician,
    Advanced,
    General,
    Extra,
    Club,
    #[default]
    Unknown,
}

impl LicenseClass {
    /// Map a class code to a license class.
    ///
    /// An empty code is only a club license when the first name is empty too;
    /// every unrecognized code becomes `Unknown`.
    pub fn from_code(code: &str, first_name: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "t" => LicenseClass::Technician,
            "a" => LicenseClass::Advanced,
            "g" => LicenseClass::General,
            "e" => LicenseClass::Extra,
            "" if first_name.is_empty() => LicenseClass::Club,
            _ => LicenseClass::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseClass::Technician => "Technician",
            LicenseClass::Advanced => "Advanced",
            LicenseClass::General => "General",
            LicenseClass::Extra => "Extra",
            LicenseClass::Club => "Club",
            LicenseClass::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for LicenseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// License status derived from the directory's single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OperatorStatus {
    Active,
    Inactive,
    #[default]
    Unknown,
}

impl OperatorStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "a" => OperatorStatus::Active,
            "i" => OperatorStatus::Inactive,
            _ => OperatorStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorStatus::Active => "Active",
            OperatorStatus::Inactive => "Inactive",
            OperatorStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Postal address as registered with the directory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {}, {}",
            self.line1, self.line2, self.state, self.zip, self.country
        )
    }
}

/// WGS84 point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside the lat/lng ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Operator details from one successful directory lookup.
///
/// Built fresh for every lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    /// Canonical uppercase call sign
    pub callsign: String,
    /// "first [mi.] last [suffix]"
    pub name: String,
    pub license_class: LicenseClass,
    pub status: OperatorStatus,
    pub address: Address,
    /// Present only when the directory supplied two finite numbers
    pub coordinates: Option<Coordinates>,
    /// Maidenhead locator, e.g. "FN31pr"
    pub grid_square: String,
    /// Display string, not parsed
    pub license_expiration: String,
}

/// One row of the recent-lookup history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub callsign: String,
    /// Operator name at lookup time, may be empty
    #[serde(default)]
    pub operator: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(callsign: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            operator: operator.into(),
            timestamp: Utc::now(),
        }
    }
}

/// UI color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    #[serde(rename = "dark")]
    Dark,
    #[serde(rename = "light")]
    Light,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
