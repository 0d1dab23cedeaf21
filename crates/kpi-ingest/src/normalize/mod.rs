//! Field normalizer: raw cells to typed, comparable values.
//!
//! Every function here is pure and total. Failures yield `None` rather than
//! errors so a single bad cell never interrupts a pass.

mod date;
mod numeric;
mod text;

pub use date::{from_excel_serial, normalize_date, parse_date_text};
pub use numeric::{normalize_count, normalize_number, parse_number};
pub use text::normalize_text;
