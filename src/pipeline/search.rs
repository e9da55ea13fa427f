// src/pipeline/search.rs

//! Search pipeline: run every source in order and aggregate the results.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{AnnouncementDocument, Config, SearchContext};
use crate::services::{
    FeedScanner, KeywordFilter, NumberedScanner, SourceScanner, SummaryScanner,
};
use crate::utils::{Fetch, PdfText};

/// Holds the scanners of one session and the result set of its last search.
pub struct SearchSession {
    scanners: Vec<Box<dyn SourceScanner>>,
    results: Vec<AnnouncementDocument>,
}

impl SearchSession {
    /// Session over an explicit, ordered list of scanners.
    pub fn new(scanners: Vec<Box<dyn SourceScanner>>) -> Self {
        Self {
            scanners,
            results: Vec::new(),
        }
    }

    /// The four gazettes in their fixed order: BOE, BOC, BOP LP, BOP SCTF.
    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetch>, pdf: Arc<dyn PdfText>) -> Self {
        let sources = &config.sources;
        Self::new(vec![
            Box::new(FeedScanner::new(sources.boe.clone(), Arc::clone(&fetcher))),
            Box::new(NumberedScanner::new(
                sources.boc.clone(),
                Arc::clone(&fetcher),
                Arc::clone(&pdf),
            )),
            Box::new(SummaryScanner::las_palmas(
                sources.bop_lp.clone(),
                Arc::clone(&fetcher),
                Arc::clone(&pdf),
            )),
            Box::new(SummaryScanner::santa_cruz(
                sources.bop_sctf.clone(),
                fetcher,
                pdf,
            )),
        ])
    }

    /// Run every scanner sequentially and replace the previous result set.
    ///
    /// An empty result is a normal outcome. A source that fails contributes
    /// nothing; only errors that are not local to a retrieval attempt are
    /// returned, and they leave the result set empty.
    pub async fn search(&mut self, ctx: &SearchContext) -> Result<&[AnnouncementDocument]> {
        self.results.clear();
        let filter = KeywordFilter::new(&ctx.include, &ctx.exclude)?;

        let mut documents = Vec::new();
        for scanner in &self.scanners {
            let found = match scanner.scan(ctx, &filter).await {
                Ok(found) => found,
                Err(e) if e.is_attempt_local() => {
                    log::warn!("{}: skipped: {}", scanner.bulletin(), e);
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            log::info!("{}: {} match(es)", scanner.bulletin(), found.len());
            documents.extend(found);
        }

        self.results = documents;
        Ok(&self.results)
    }

    /// Result set of the last search.
    pub fn results(&self) -> &[AnnouncementDocument] {
        &self.results
    }
}
