// src/services/feed.rs

//! BOE feed scanner.
//!
//! Reads the daily RSS feed, keeps the entries published today (Madrid
//! time) that pass the keyword filter, and drops anything whose
//! description names a regional jurisdiction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Europe::Madrid;

use crate::error::Result;
use crate::models::{AnnouncementDocument, Bulletin, FeedSourceConfig, SearchContext};
use crate::services::segment::{FeedEntry, FeedItems, Segmenter};
use crate::services::{KeywordFilter, MatchMode, SourceScanner};
use crate::utils::{Fetch, normalize};

/// Autonomous communities whose announcements are out of scope.
///
/// Checked against the entry description only, never the title.
const EXCLUDED_REGIONS: &[&str] = &[
    "andalucía",
    "aragón",
    "asturias",
    "cantabria",
    "castilla-la mancha",
    "castilla y león",
    "cataluña",
    "catalunya",
    "ceuta",
    "comunidad de madrid",
    "comunidad foral de navarra",
    "comunidad valenciana",
    "comunitat valenciana",
    "extremadura",
    "galicia",
    "islas baleares",
    "la rioja",
    "melilla",
    "murcia",
    "navarra",
    "país vasco",
    "euskadi",
    "rioja",
    "illes balears",
];

/// Scanner for the BOE syndication feed.
pub struct FeedScanner {
    config: FeedSourceConfig,
    fetcher: Arc<dyn Fetch>,
    regions: Vec<String>,
}

impl FeedScanner {
    pub fn new(config: FeedSourceConfig, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            config,
            fetcher,
            regions: EXCLUDED_REGIONS.iter().map(|r| normalize(r)).collect(),
        }
    }

    fn to_document(
        &self,
        entry: FeedEntry,
        today: NaiveDate,
        filter: &KeywordFilter,
    ) -> Option<AnnouncementDocument> {
        let published = entry.published.as_deref().and_then(parse_timestamp);
        let Some(published) = published else {
            log::debug!("BOE: skipping entry without a usable date: {}", entry.title);
            return None;
        };
        if published.with_timezone(&Madrid).date_naive() != today {
            return None;
        }

        let text = normalize(&format!("{} {}", entry.title, entry.description));
        if !filter.matches(&text, MatchMode::Substring) {
            return None;
        }

        let description = normalize(&entry.description);
        if let Some(region) = self.regions.iter().find(|r| description.contains(r.as_str())) {
            log::debug!("BOE: '{}' dropped, regional ({})", entry.title, region);
            return None;
        }

        if entry.title.trim().is_empty() {
            log::debug!("BOE: dropping untitled entry {}", entry.link);
            return None;
        }

        Some(AnnouncementDocument {
            source: Bulletin::Boe,
            title: entry.title,
            url: entry.link,
            date: today,
            summary: format!("Sección: {}", entry.description),
            raw_content: None,
        })
    }
}

#[async_trait]
impl SourceScanner for FeedScanner {
    fn bulletin(&self) -> Bulletin {
        Bulletin::Boe
    }

    async fn scan(
        &self,
        ctx: &SearchContext,
        filter: &KeywordFilter,
    ) -> Result<Vec<AnnouncementDocument>> {
        let body = match self.fetcher.get(&self.config.feed_url, &[]).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("BOE: feed unavailable: {}", e);
                return Ok(Vec::new());
            }
        };

        let xml = String::from_utf8_lossy(&body);
        let entries = FeedItems.segment(&xml);
        log::debug!("BOE: {} feed entries", entries.len());

        let today = ctx.dates.peninsula;
        Ok(entries
            .into_iter()
            .filter_map(|entry| self.to_document(entry, today, filter))
            .collect())
    }
}

/// Parse an RSS (RFC 2822) or Atom (RFC 3339) timestamp.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}
