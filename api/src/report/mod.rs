//! Printable reports
//!
//! Renders ledger results as markdown documents for printing or download.

pub mod renderer;

pub use renderer::{render_due_list, report_file_name};
