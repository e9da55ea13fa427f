// src/services/numbered.rs

//! BOC scanner.
//!
//! The BOC names each issue by its business-day number, so today's PDF
//! is located through [`BulletinCalendar`] rather than by date. Only the
//! current date is tried.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::{AnnouncementDocument, Bulletin, NumberedSourceConfig, SearchContext};
use crate::services::segment::{LayoutBlocks, Segmenter, join_pages};
use crate::services::{KeywordFilter, MatchMode, SourceScanner};
use crate::utils::{BulletinCalendar, Fetch, PdfText, is_pdf, normalize};

/// Words of a block kept in the title.
const TITLE_WORDS: usize = 200;

/// Scanner for the numbered BOC issue of the day.
pub struct NumberedScanner {
    config: NumberedSourceConfig,
    calendar: BulletinCalendar,
    fetcher: Arc<dyn Fetch>,
    pdf: Arc<dyn PdfText>,
}

impl NumberedScanner {
    pub fn new(
        config: NumberedSourceConfig,
        fetcher: Arc<dyn Fetch>,
        pdf: Arc<dyn PdfText>,
    ) -> Self {
        Self {
            calendar: config.calendar(),
            config,
            fetcher,
            pdf,
        }
    }

    /// URL of issue `number` of `year`.
    pub fn issue_url(&self, year: i32, number: u32) -> String {
        format!(
            "{}/boc-s-{}-{}.pdf",
            self.config.base_url.trim_end_matches('/'),
            year,
            number
        )
    }

    /// Retrieve and extract an issue; `None` when this attempt yields nothing.
    async fn issue_text(&self, url: &str) -> Option<String> {
        let bytes = match self.fetcher.get(url, &[]).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("BOC: {}", e);
                return None;
            }
        };
        if !is_pdf(&bytes) {
            log::debug!("BOC: {} is not a PDF", url);
            return None;
        }
        match self.pdf.pages(&bytes, None).await {
            Ok(pages) => Some(join_pages(&pages)),
            Err(e) => {
                log::warn!("BOC: could not read {}: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl SourceScanner for NumberedScanner {
    fn bulletin(&self) -> Bulletin {
        Bulletin::Boc
    }

    async fn scan(
        &self,
        ctx: &SearchContext,
        filter: &KeywordFilter,
    ) -> Result<Vec<AnnouncementDocument>> {
        let today = ctx.dates.canary;
        let number = match self.calendar.number_for_date(today) {
            Ok(number) => number,
            Err(e @ AppError::CalendarRange { .. }) => {
                log::warn!("BOC: {}", e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let url = self.issue_url(today.year(), number);
        log::debug!("BOC: issue {} for {} at {}", number, today, url);

        let Some(text) = self.issue_text(&url).await else {
            return Ok(Vec::new());
        };
        // The number may belong to an earlier business day (weekends).
        let issued: NaiveDate = self.calendar.date_for_number(number)?;

        Ok(LayoutBlocks
            .segment(&text)
            .into_iter()
            .filter(|block| filter.matches(&normalize(block), MatchMode::Substring))
            .map(|block| AnnouncementDocument {
                source: Bulletin::Boc,
                title: block_title(&block),
                url: url.clone(),
                date: issued,
                summary: "(Extraído de PDF)".to_string(),
                raw_content: Some(block),
            })
            .collect())
    }
}

fn block_title(block: &str) -> String {
    block
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchDates;
    use crate::services::testing::{StaticFetcher, TextPdf, fake_pdf};

    const BASE: &str = "https://boc.test/boc";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scanner(fetcher: StaticFetcher) -> NumberedScanner {
        NumberedScanner::new(
            NumberedSourceConfig {
                base_url: BASE.to_string(),
                anchor_date: ymd(2025, 1, 2),
                anchor_number: 1,
            },
            Arc::new(fetcher),
            Arc::new(TextPdf),
        )
    }

    fn ctx(date: NaiveDate) -> (SearchContext, KeywordFilter) {
        let ctx = SearchContext {
            include: ["fotovoltaica", "subvenciones"].into_iter().collect(),
            exclude: ["empleo"].into_iter().collect(),
            dates: SearchDates::fixed(date),
        };
        let filter = KeywordFilter::new(&ctx.include, &ctx.exclude).unwrap();
        (ctx, filter)
    }

    #[tokio::test]
    async fn extracts_matching_blocks_from_todays_issue() {
        let pdf = fake_pdf(&[
            "BOC Nº 3\n\nOrden por la que se convocan subvenciones para\ninstalación FOTOVOLTAICA en viviendas.\n\nDecreto de nombramiento de personal funcionario.",
            "Subvenciones para el fomento del empleo juvenil en Canarias.",
        ]);
        let url = format!("{BASE}/boc-s-2025-3.pdf");
        let (ctx, filter) = ctx(ymd(2025, 1, 6));
        let docs = scanner(StaticFetcher::default().with(&url, pdf))
            .scan(&ctx, &filter)
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.source, Bulletin::Boc);
        assert_eq!(doc.url, url);
        assert_eq!(doc.date, ymd(2025, 1, 6));
        assert_eq!(
            doc.title,
            "ORDEN POR LA QUE SE CONVOCAN SUBVENCIONES PARA INSTALACIÓN FOTOVOLTAICA EN VIVIENDAS."
        );
        assert_eq!(
            doc.raw_content.as_deref(),
            Some("Orden por la que se convocan subvenciones para instalación FOTOVOLTAICA en viviendas.")
        );
    }

    #[tokio::test]
    async fn weekend_search_reports_fridays_issue_date() {
        let pdf = fake_pdf(&["Extracto de subvenciones para instalación fotovoltaica"]);
        let url = format!("{BASE}/boc-s-2025-2.pdf");
        let (ctx, filter) = ctx(ymd(2025, 1, 4));
        let docs = scanner(StaticFetcher::default().with(&url, pdf))
            .scan(&ctx, &filter)
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].date, ymd(2025, 1, 3));
    }

    #[tokio::test]
    async fn non_pdf_payload_is_skipped() {
        let url = format!("{BASE}/boc-s-2025-3.pdf");
        let (ctx, filter) = ctx(ymd(2025, 1, 6));
        let docs = scanner(StaticFetcher::default().with(&url, "<html>Mantenimiento</html>"))
            .scan(&ctx, &filter)
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn missing_issue_is_skipped() {
        let (ctx, filter) = ctx(ymd(2025, 1, 6));
        let docs = scanner(StaticFetcher::default())
            .scan(&ctx, &filter)
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn date_before_anchor_yields_nothing() {
        let (ctx, filter) = ctx(ymd(2024, 12, 30));
        let fetcher = Arc::new(StaticFetcher::default());
        let scanner = NumberedScanner::new(
            NumberedSourceConfig {
                base_url: BASE.to_string(),
                anchor_date: ymd(2025, 1, 2),
                anchor_number: 1,
            },
            Arc::clone(&fetcher) as Arc<dyn Fetch>,
            Arc::new(TextPdf),
        );
        let docs = scanner.scan(&ctx, &filter).await.unwrap();
        assert!(docs.is_empty());
        assert!(fetcher.requested_urls().is_empty());
    }

    #[test]
    fn title_keeps_first_two_hundred_words() {
        let block = vec!["palabra"; 250].join(" ");
        assert_eq!(block_title(&block).split(' ').count(), 200);
    }
}
