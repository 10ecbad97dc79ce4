use thiserror::Error;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a call sign.";
pub const TOO_SHORT_MESSAGE: &str = "Callsign must be at least 3 characters.";
pub const TRANSPORT_MESSAGE: &str =
    "An error occurred while looking up the call sign. Please check your connection and try again.";
pub const NO_RESULTS_MESSAGE: &str = "No results found. Please check the callsign and try again.";

/// Every way a lookup can end without an operator record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("empty call sign")]
    EmptyInput,

    #[error("call sign {0:?} is shorter than 3 characters")]
    TooShort(String),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportFailure),

    /// The directory answered but rejected the lookup
    #[error("directory rejected lookup: {0}")]
    Directory(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    Parse(String),
}

impl LookupError {
    /// Text shown to the user; `Display` carries the diagnostic detail for logs.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            LookupError::TooShort(_) => TOO_SHORT_MESSAGE.to_string(),
            LookupError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            LookupError::Directory(message) => message.clone(),
        }
    }

    /// Raised before any network traffic.
    pub fn is_validation(&self) -> bool {
        matches!(self, LookupError::EmptyInput | LookupError::TooShort(_))
    }
}

/// Key-value persistence failures. Callers recover with defaults.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed stored data: {0}")]
    Malformed(#[from] serde_json::Error),
}
