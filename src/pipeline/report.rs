// src/pipeline/report.rs

//! Rendering of search results: console table, HTML digest and mail subject.

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::Result;
use crate::models::{AnnouncementDocument, Bulletin, MailConfig};
use crate::services::Mailer;
use crate::utils::text::truncate_chars;

const MONTHS_ES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// Trailing BOE feed fields that add nothing to the digest.
const BOE_BOILERPLATE: [&str; 3] = [
    r"\s*-?\s*Referencia:[^<]*",
    r"\s*-?\s*KBytes:[^<]*",
    r"\s*-?\s*P[áa]ginas:[^<]*",
];

/// Widest a table cell may get before it is cut.
const CELL_WIDTH: usize = 60;

/// Long-form Spanish date, e.g. `7 DE ENERO DE 2025`.
pub fn long_date_es(date: NaiveDate) -> String {
    format!(
        "{} DE {} DE {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

/// Subject line of the digest mail.
pub fn digest_subject(date: NaiveDate) -> String {
    format!("📰 Resumen boletines {}", long_date_es(date))
}

/// Plain-text table of the displayed fields: source, date, title, url, summary.
pub fn render_table(documents: &[AnnouncementDocument]) -> String {
    let header = ["BOLETÍN", "FECHA", "TÍTULO", "URL", "RESUMEN"].map(String::from);
    let rows: Vec<[String; 5]> = documents
        .iter()
        .map(|doc| {
            [
                doc.source.label().to_string(),
                doc.date.format("%Y-%m-%d").to_string(),
                cell(&doc.title),
                doc.url.clone(),
                cell(&doc.summary),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(value, width)| format!("{value:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > CELL_WIDTH {
        format!("{}…", truncate_chars(&flat, CELL_WIDTH - 1))
    } else {
        flat
    }
}

/// HTML summary of the results, one list item per document.
pub fn render_digest(documents: &[AnnouncementDocument]) -> Result<String> {
    let boilerplate = BOE_BOILERPLATE
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut html = String::from("<h2>📋 Resumen de anuncios encontrados</h2><ul>");
    for doc in documents {
        let mut summary = doc.summary.clone();
        if doc.source == Bulletin::Boe {
            for re in &boilerplate {
                summary = re.replace_all(&summary, "").into_owned();
            }
        }
        html.push_str(&format!(
            "\n    <li>\n        <strong>{} {}</strong> - {}<br>\n        \
             <a href=\"{}\" target=\"_blank\">{}</a><br>\n        \
             <em>{}</em>\n    </li><br>\n",
            doc.source.tag(),
            doc.source.label(),
            doc.date.format("%Y-%m-%d"),
            escape_html(&doc.url),
            escape_html(&doc.title),
            summary.trim()
        ));
    }
    html.push_str("</ul>");
    Ok(html)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the digest for `documents` and hand it to `mailer`.
pub async fn send_digest(
    mailer: &dyn Mailer,
    mail: &MailConfig,
    documents: &[AnnouncementDocument],
    date: NaiveDate,
) -> Result<()> {
    mail.validate()?;
    let html = render_digest(documents)?;
    mailer
        .send(&digest_subject(date), &html, &mail.recipients)
        .await
}
