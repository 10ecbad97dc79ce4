pub mod types;

pub use types::{
    Address, Coordinates, HistoryEntry, LicenseClass, OperatorRecord, OperatorStatus, Theme,
};
