///! HamDB wire types

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level `{"hamdb": {...}}` wrapper
#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryEnvelope {
    pub hamdb: DirectoryBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryBody {
    #[allow(dead_code)]
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub callsign: Option<RawCallsign>,
    pub messages: DirectoryMessages,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryMessages {
    /// "OK" on success, e.g. "NOT_FOUND" otherwise
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Operator fields exactly as the directory sends them (all strings)
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCallsign {
    #[serde(default, deserialize_with = "lenient_string")]
    pub call: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub class: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expires: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lat: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lon: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mi: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub suffix: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub addr1: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub addr2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
}

/// Accept strings, numbers and `null` for the text fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
