//! Per-session search inputs.

use chrono::{NaiveDate, Utc};
use chrono_tz::{Atlantic::Canary, Europe::Madrid};

use crate::models::{Config, KeywordSet};

/// "Today" in the two calendars the gazettes publish in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchDates {
    /// Current date in Europe/Madrid (BOE)
    pub peninsula: NaiveDate,

    /// Current date in Atlantic/Canary (BOC and both BOPs)
    pub canary: NaiveDate,
}

impl SearchDates {
    /// Dates for the current instant.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            peninsula: now.with_timezone(&Madrid).date_naive(),
            canary: now.with_timezone(&Canary).date_naive(),
        }
    }

    /// Use the same date for both calendars.
    pub fn fixed(date: NaiveDate) -> Self {
        Self {
            peninsula: date,
            canary: date,
        }
    }
}

/// Keyword lists and dates one search runs against.
///
/// Owned by the caller's session and passed into the pipeline by
/// reference. Nothing here is persisted between runs.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub include: KeywordSet,
    pub exclude: KeywordSet,
    pub dates: SearchDates,
}

impl SearchContext {
    /// Context seeded from the configured keyword lists.
    pub fn from_config(config: &Config, dates: SearchDates) -> Self {
        Self {
            include: config.keywords.include.clone(),
            exclude: config.keywords.exclude.clone(),
            dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn canary_lags_madrid_by_an_hour() {
        // 22:30 UTC: already 1 April in Madrid (CEST), still 31 March in the Canaries (WEST).
        let instant = Utc.with_ymd_and_hms(2025, 3, 31, 22, 30, 0).unwrap();
        assert_eq!(
            instant.with_timezone(&Madrid).date_naive(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
        assert_eq!(
            instant.with_timezone(&Canary).date_naive(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
    }

    #[test]
    fn context_copies_configured_keywords() {
        let config = Config::default();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let ctx = SearchContext::from_config(&config, SearchDates::fixed(date));
        assert_eq!(ctx.include, config.keywords.include);
        assert_eq!(ctx.dates.canary, date);
    }
}
