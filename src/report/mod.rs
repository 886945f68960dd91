//! Daily report — data model, date handling and rendering.

pub mod date;
pub mod model;
pub mod render;

pub use date::{DateError, format_report_date, parse_report_date};
pub use model::{Report, Section};
pub use render::render_report;
