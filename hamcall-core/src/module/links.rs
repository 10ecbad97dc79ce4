///! Outbound links shown next to a lookup result

use hamcall_common::OperatorRecord;

const PROFILE_URL: &str = "https://www.qrz.com/db/";
const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLinks {
    /// Operator profile page
    pub profile: String,
    /// Driving directions to the registered address
    pub directions: String,
}

impl ExternalLinks {
    pub fn for_record(record: &OperatorRecord) -> Self {
        Self {
            profile: profile_url(&record.callsign),
            directions: directions_url(&record.address.to_string()),
        }
    }
}

pub fn profile_url(callsign: &str) -> String {
    format!("{}{}", PROFILE_URL, urlencoding::encode(callsign))
}

pub fn directions_url(address: &str) -> String {
    format!("{}{}", DIRECTIONS_URL, urlencoding::encode(address))
}
