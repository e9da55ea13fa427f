//! Announcement data structure.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four gazettes the scanner reads, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bulletin {
    /// Boletín Oficial del Estado (RSS feed)
    #[serde(rename = "BOE")]
    Boe,
    /// Boletín Oficial de Canarias (numbered PDF)
    #[serde(rename = "BOC")]
    Boc,
    /// Boletín Oficial de la Provincia de Las Palmas
    #[serde(rename = "BOP LP")]
    BopLasPalmas,
    /// Boletín Oficial de la Provincia de Santa Cruz de Tenerife
    #[serde(rename = "BOP SCTF")]
    BopSantaCruz,
}

impl Bulletin {
    /// Short label used in titles, summaries and the digest.
    pub fn label(&self) -> &'static str {
        match self {
            Bulletin::Boe => "BOE",
            Bulletin::Boc => "BOC",
            Bulletin::BopLasPalmas => "BOP LP",
            Bulletin::BopSantaCruz => "BOP SCTF",
        }
    }

    /// Colour tag shown next to the label in the HTML digest.
    pub fn tag(&self) -> &'static str {
        match self {
            Bulletin::Boe => "🟥",
            Bulletin::Boc => "⬜",
            Bulletin::BopLasPalmas => "🟡",
            Bulletin::BopSantaCruz => "🔵",
        }
    }
}

impl fmt::Display for Bulletin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One announcement extracted from a gazette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnouncementDocument {
    /// Issuing gazette
    pub source: Bulletin,

    /// Display title (never empty)
    pub title: String,

    /// Feed item link or PDF URL
    pub url: String,

    /// Publication date in the gazette's local calendar
    pub date: NaiveDate,

    /// Short description
    pub summary: String,

    /// Full matched block, kept only by sources rendered from PDF text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}
