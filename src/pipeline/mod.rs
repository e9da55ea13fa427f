//! Pipeline entry points for gazette searches.
//!
//! - `SearchSession`: run all sources and hold the last result set
//! - `render_table` / `render_digest`: present the results
//! - `send_digest`: mail the HTML digest

pub mod report;
pub mod search;

pub use report::{digest_subject, long_date_es, render_digest, render_table, send_digest};
pub use search::SearchSession;
