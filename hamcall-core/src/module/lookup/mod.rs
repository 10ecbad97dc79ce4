///! Call sign lookup against the HamDB directory
///!
///! Validates input, fetches the operator record, and fans the outcome out
///! to history, the map and the result view.

pub mod types;
pub mod parser;
pub mod client;
pub mod orchestrator;

pub use client::{Directory, HamDbClient};
pub use orchestrator::{LookupOrchestrator, normalize_callsign};
