//! Service layer for the gazette scanner.
//!
//! This module contains the business logic for:
//! - Feed scanning (`FeedScanner`, BOE)
//! - Numbered bulletin scanning (`NumberedScanner`, BOC)
//! - Forward-scanned summaries (`SummaryScanner`, BOP Las Palmas / Santa Cruz)
//! - Segmentation and keyword filtering shared by all of them
//! - Digest delivery (`Mailer`)

mod feed;
mod filter;
mod mail;
mod numbered;
pub mod segment;
mod summary;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AnnouncementDocument, Bulletin, SearchContext};

pub use feed::FeedScanner;
pub use filter::{KeywordFilter, MatchMode};
#[cfg(feature = "mail")]
pub use mail::SmtpMailer;
pub use mail::Mailer;
pub use numbered::NumberedScanner;
pub use segment::Segmenter;
pub use summary::{SummaryLayout, SummaryScanner};

/// Retrieval and extraction for one gazette.
#[async_trait]
pub trait SourceScanner: Send + Sync {
    /// Gazette this scanner reads.
    fn bulletin(&self) -> Bulletin;

    /// Produce every announcement that passes `filter` for the search dates.
    ///
    /// Failures of individual retrieval attempts are logged and skipped;
    /// only configuration errors are returned.
    async fn scan(
        &self,
        ctx: &SearchContext,
        filter: &KeywordFilter,
    ) -> Result<Vec<AnnouncementDocument>>;
}
