//! Utility functions and helpers.

pub mod calendar;
pub mod http;
pub mod pdf;
pub mod text;

pub use calendar::BulletinCalendar;
pub use http::{Fetch, HttpFetcher};
pub use pdf::{PdfText, Pdftotext, is_pdf};
pub use text::normalize;
