// src/services/summary.rs

//! Forward-scanning scanner for the provincial summary PDFs (BOP).
//!
//! The BOPs do not publish every day and sometimes publish late, so the
//! scanner tries today and the following days up to a per-source window,
//! stopping at the first date that yields any match.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};

use crate::error::Result;
use crate::models::{AnnouncementDocument, Bulletin, SearchContext, SummarySourceConfig};
use crate::services::segment::{
    CodedLines, Paragraphs, Segmenter, before_leader_dots, join_pages,
};
use crate::services::{KeywordFilter, MatchMode, SourceScanner};
use crate::utils::text::truncate_chars;
use crate::utils::{Fetch, PdfText, is_pdf, normalize};

/// Characters of a free-text block kept in the title.
const TITLE_CHARS: usize = 200;

/// How a summary PDF is cut into announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLayout {
    /// Table of contents with six-digit codes and leader dots
    CodedLines,
    /// Free text split into paragraphs, whole-word matching
    Paragraphs,
}

impl SummaryLayout {
    pub fn segment(&self, raw: &str) -> Vec<String> {
        match self {
            SummaryLayout::CodedLines => CodedLines.segment(raw),
            SummaryLayout::Paragraphs => Paragraphs.segment(raw),
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        match self {
            SummaryLayout::CodedLines => MatchMode::Substring,
            SummaryLayout::Paragraphs => MatchMode::WholeWord,
        }
    }

    fn title(&self, block: &str) -> String {
        match self {
            SummaryLayout::CodedLines => block.to_uppercase(),
            SummaryLayout::Paragraphs => {
                let head = before_leader_dots(block).trim();
                let head = if head.is_empty() { block } else { head };
                truncate_chars(head, TITLE_CHARS).to_uppercase()
            }
        }
    }

    fn summary(&self, bulletin: Bulletin) -> String {
        match self {
            SummaryLayout::CodedLines => format!("(Sumario {})", bulletin.label()),
            SummaryLayout::Paragraphs => "(Detectado en texto libre)".to_string(),
        }
    }

    fn keeps_content(&self) -> bool {
        matches!(self, SummaryLayout::Paragraphs)
    }
}

/// Builds the PDF URL for a date from the configured base URL.
type UrlBuilder = fn(&str, NaiveDate) -> String;

/// Scanner for one provincial summary bulletin.
pub struct SummaryScanner {
    bulletin: Bulletin,
    config: SummarySourceConfig,
    layout: SummaryLayout,
    url_for: UrlBuilder,
    headers: Vec<(String, String)>,
    fetcher: Arc<dyn Fetch>,
    pdf: Arc<dyn PdfText>,
}

impl SummaryScanner {
    pub fn new(
        bulletin: Bulletin,
        config: SummarySourceConfig,
        layout: SummaryLayout,
        url_for: UrlBuilder,
        fetcher: Arc<dyn Fetch>,
        pdf: Arc<dyn PdfText>,
    ) -> Self {
        let headers = config
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            bulletin,
            config,
            layout,
            url_for,
            headers,
            fetcher,
            pdf,
        }
    }

    /// BOP Las Palmas: `{base}/{YYYY}/{d}-{MM}-{YY}/{d}-{MM}-{YY}.pdf`, free-text paragraphs.
    pub fn las_palmas(
        config: SummarySourceConfig,
        fetcher: Arc<dyn Fetch>,
        pdf: Arc<dyn PdfText>,
    ) -> Self {
        Self::new(
            Bulletin::BopLasPalmas,
            config,
            SummaryLayout::Paragraphs,
            las_palmas_url,
            fetcher,
            pdf,
        )
    }

    /// BOP Santa Cruz de Tenerife: `{base}/{YYYY}/{d}-{m}-{YY}/{d}-{m}-{YY}.pdf`, coded summary.
    pub fn santa_cruz(
        config: SummarySourceConfig,
        fetcher: Arc<dyn Fetch>,
        pdf: Arc<dyn PdfText>,
    ) -> Self {
        Self::new(
            Bulletin::BopSantaCruz,
            config,
            SummaryLayout::CodedLines,
            santa_cruz_url,
            fetcher,
            pdf,
        )
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        (self.url_for)(self.config.base_url.trim_end_matches('/'), date)
    }

    /// Retrieve and extract the summary for one date; `None` when this attempt yields nothing.
    async fn summary_text(&self, url: &str) -> Option<String> {
        let bytes = match self.fetcher.get(url, &self.headers).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("{}: {}", self.bulletin, e);
                return None;
            }
        };
        if !is_pdf(&bytes) {
            log::debug!("{}: {} is not a PDF", self.bulletin, url);
            return None;
        }
        match self.pdf.pages(&bytes, Some(self.config.max_pages)).await {
            Ok(pages) => Some(join_pages(&pages)),
            Err(e) => {
                log::warn!("{}: could not read {}: {}", self.bulletin, url, e);
                None
            }
        }
    }

    fn documents(
        &self,
        text: &str,
        url: &str,
        date: NaiveDate,
        filter: &KeywordFilter,
    ) -> Vec<AnnouncementDocument> {
        let mode = self.layout.match_mode();
        self.layout
            .segment(text)
            .into_iter()
            .filter(|block| filter.matches(&normalize(block), mode))
            .map(|block| AnnouncementDocument {
                source: self.bulletin,
                title: self.layout.title(&block),
                url: url.to_string(),
                date,
                summary: self.layout.summary(self.bulletin),
                raw_content: self.layout.keeps_content().then_some(block),
            })
            .collect()
    }
}

#[async_trait]
impl SourceScanner for SummaryScanner {
    fn bulletin(&self) -> Bulletin {
        self.bulletin
    }

    async fn scan(
        &self,
        ctx: &SearchContext,
        filter: &KeywordFilter,
    ) -> Result<Vec<AnnouncementDocument>> {
        for offset in 0..self.config.scan_days {
            let Some(date) = ctx.dates.canary.checked_add_days(Days::new(offset.into())) else {
                break;
            };
            let url = self.url_for(date);
            let Some(text) = self.summary_text(&url).await else {
                continue;
            };

            let docs = self.documents(&text, &url, date, filter);
            if !docs.is_empty() {
                log::debug!("{}: {} matches in {}", self.bulletin, docs.len(), url);
                return Ok(docs);
            }
        }
        Ok(Vec::new())
    }
}

fn las_palmas_url(base: &str, date: NaiveDate) -> String {
    let folder = format!(
        "{}-{:02}-{:02}",
        date.day(),
        date.month(),
        date.year().rem_euclid(100)
    );
    format!("{base}/{}/{folder}/{folder}.pdf", date.year())
}

fn santa_cruz_url(base: &str, date: NaiveDate) -> String {
    let folder = format!(
        "{}-{}-{:02}",
        date.day(),
        date.month(),
        date.year().rem_euclid(100)
    );
    format!("{base}/{}/{folder}/{folder}.pdf", date.year())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::SearchDates;
    use crate::services::testing::{StaticFetcher, TextPdf, fake_pdf};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(scan_days: u32, headers: BTreeMap<String, String>) -> SummarySourceConfig {
        SummarySourceConfig {
            base_url: "https://bop.test/boletines".to_string(),
            scan_days,
            max_pages: 2,
            headers,
        }
    }

    fn ctx(include: &[&str], exclude: &[&str]) -> (SearchContext, KeywordFilter) {
        let ctx = SearchContext {
            include: include.iter().copied().collect(),
            exclude: exclude.iter().copied().collect(),
            dates: SearchDates::fixed(ymd(2025, 3, 3)),
        };
        let filter = KeywordFilter::new(&ctx.include, &ctx.exclude).unwrap();
        (ctx, filter)
    }

    #[test]
    fn url_formats_differ_per_province() {
        let date = ymd(2025, 3, 7);
        assert_eq!(
            las_palmas_url("https://www.boplaspalmas.net/boletines", date),
            "https://www.boplaspalmas.net/boletines/2025/7-03-25/7-03-25.pdf"
        );
        assert_eq!(
            santa_cruz_url("https://www.bopsantacruzdetenerife.es/boletines", date),
            "https://www.bopsantacruzdetenerife.es/boletines/2025/7-3-25/7-3-25.pdf"
        );
        assert_eq!(
            santa_cruz_url("https://b", ymd(2025, 11, 21)),
            "https://b/2025/21-11-25/21-11-25.pdf"
        );
    }

    #[tokio::test]
    async fn stops_at_first_date_with_matches() {
        let day0 = santa_cruz_url("https://bop.test/boletines", ymd(2025, 3, 3));
        let day1 = santa_cruz_url("https://bop.test/boletines", ymd(2025, 3, 4));
        let day2 = santa_cruz_url("https://bop.test/boletines", ymd(2025, 3, 5));
        let fetcher = Arc::new(
            StaticFetcher::default()
                .with(&day0, fake_pdf(&["012340 Anuncio de licitación ....... 2"]))
                .with(&day1, fake_pdf(&["012345 Extracto de ayudas al sector náutico ..... 4"]))
                .with(&day2, fake_pdf(&["012350 Más ayudas ..... 9"])),
        );
        let scanner = SummaryScanner::santa_cruz(
            config(8, BTreeMap::new()),
            fetcher.clone(),
            Arc::new(TextPdf),
        );
        let (ctx, filter) = ctx(&["ayudas"], &[]);
        let docs = scanner.scan(&ctx, &filter).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "012345 EXTRACTO DE AYUDAS AL SECTOR NÁUTICO");
        assert_eq!(docs[0].date, ymd(2025, 3, 4));
        assert_eq!(docs[0].url, day1);
        assert_eq!(docs[0].summary, "(Sumario BOP SCTF)");
        assert_eq!(docs[0].raw_content, None);
        assert_eq!(fetcher.requested_urls(), vec![day0, day1]);
    }

    #[tokio::test]
    async fn scan_window_bounds_attempts() {
        let fetcher = Arc::new(StaticFetcher::default());
        let scanner =
            SummaryScanner::santa_cruz(config(3, BTreeMap::new()), fetcher.clone(), Arc::new(TextPdf));
        let (ctx, filter) = ctx(&["ayudas"], &[]);
        assert!(scanner.scan(&ctx, &filter).await.unwrap().is_empty());
        assert_eq!(fetcher.requested_urls().len(), 3);
    }

    #[tokio::test]
    async fn configured_headers_are_sent() {
        let headers = BTreeMap::from([("Accept".to_string(), "application/pdf".to_string())]);
        let fetcher = Arc::new(StaticFetcher::default());
        let scanner = SummaryScanner::santa_cruz(config(1, headers), fetcher.clone(), Arc::new(TextPdf));
        let (ctx, filter) = ctx(&["ayudas"], &[]);
        scanner.scan(&ctx, &filter).await.unwrap();

        let url = santa_cruz_url("https://bop.test/boletines", ymd(2025, 3, 3));
        assert_eq!(
            fetcher.headers_for(&url),
            vec![("Accept".to_string(), "application/pdf".to_string())]
        );
    }

    #[tokio::test]
    async fn non_pdf_day_is_skipped() {
        let day0 = las_palmas_url("https://bop.test/boletines", ymd(2025, 3, 3));
        let day1 = las_palmas_url("https://bop.test/boletines", ymd(2025, 3, 4));
        let fetcher = StaticFetcher::default()
            .with(&day0, "<html>No hay boletín</html>")
            .with(
                &day1,
                fake_pdf(&["001234 Cabildo de Lanzarote. Bases reguladoras de la subvención a clubes ........ 7"]),
            );
        let scanner = SummaryScanner::las_palmas(config(5, BTreeMap::new()), Arc::new(fetcher), Arc::new(TextPdf));
        let (ctx, filter) = ctx(&["subvención"], &[]);
        let docs = scanner.scan(&ctx, &filter).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, Bulletin::BopLasPalmas);
        assert_eq!(
            docs[0].title,
            "001234 CABILDO DE LANZAROTE. BASES REGULADORAS DE LA SUBVENCIÓN A CLUBES"
        );
        assert_eq!(docs[0].summary, "(Detectado en texto libre)");
        assert!(docs[0].raw_content.as_deref().unwrap().ends_with("........ 7"));
    }

    #[tokio::test]
    async fn las_palmas_requires_whole_words() {
        let day0 = las_palmas_url("https://bop.test/boletines", ymd(2025, 3, 3));
        let fetcher = StaticFetcher::default().with(
            &day0,
            fake_pdf(&["001234 Ayuntamiento de Arucas. Club subvencionado por el municipio"]),
        );
        let scanner = SummaryScanner::las_palmas(config(1, BTreeMap::new()), Arc::new(fetcher), Arc::new(TextPdf));
        let (ctx, filter) = ctx(&["subvención"], &[]);
        assert!(scanner.scan(&ctx, &filter).await.unwrap().is_empty());
    }

    #[test]
    fn paragraph_title_is_capped_at_two_hundred_chars() {
        let block = "a".repeat(300);
        assert_eq!(SummaryLayout::Paragraphs.title(&block).chars().count(), 200);
    }

    #[test]
    fn paragraph_title_falls_back_when_block_starts_with_dots() {
        let block = "........ 12 Anuncio sin cabecera alguna";
        assert!(!SummaryLayout::Paragraphs.title(block).is_empty());
    }
}
