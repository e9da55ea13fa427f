// src/models/mod.rs

//! Domain models for the gazette scanner.

mod announcement;
mod config;
mod keywords;
mod session;

// Re-export all public types
pub use announcement::{AnnouncementDocument, Bulletin};
pub use config::{
    Config, FeedSourceConfig, HttpConfig, KeywordConfig, MailConfig, NumberedSourceConfig,
    PdfConfig, SourcesConfig, SummarySourceConfig,
};
pub use keywords::KeywordSet;
pub use session::{SearchContext, SearchDates};
