//! Flight log export: CSV tick records and a JSON summary.

pub mod csv;
pub mod json;

pub use self::csv::{write_log, write_log_file};
pub use self::json::{write_summary, write_summary_file, FlightSummary};
