// src/services/segment.rs

//! Source-specific segmentation of retrieved content into candidate blocks.
//!
//! PDF-based segmenters take the extracted text with pages separated by
//! form feeds, the way `pdftotext` emits it (see [`join_pages`]).

use roxmltree::{Document, Node, ParsingOptions};

use crate::utils::text::collapse_whitespace;

/// Blocks shorter than this (in characters) are layout noise.
pub const MIN_BLOCK_CHARS: usize = 30;

/// Turns raw retrieved content into candidate announcement blocks.
pub trait Segmenter {
    type Block;

    fn segment(&self, raw: &str) -> Vec<Self::Block>;
}

/// Join extracted pages into the form-feed separated text segmenters expect.
pub fn join_pages(pages: &[String]) -> String {
    pages.join("\u{c}")
}

/// Text before the first run of leader dots (five or more periods).
pub fn before_leader_dots(text: &str) -> &str {
    text.split(".....").next().unwrap_or(text)
}

/// Whether `text` starts with a six-digit announcement code and whitespace.
fn starts_with_code(text: &str) -> bool {
    let mut chars = text.chars();
    chars.by_ref().take(6).filter(char::is_ascii_digit).count() == 6
        && chars.next().is_some_and(char::is_whitespace)
}

// --- Feed ---

/// One item of an RSS or Atom feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: Option<String>,
    pub description: String,
}

/// Syndicated feed items (BOE).
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedItems;

impl FeedItems {
    /// Parse every `<item>` / `<entry>` of the feed.
    pub fn parse(&self, xml: &str) -> Result<Vec<FeedEntry>, roxmltree::Error> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)?;

        let entries = doc
            .descendants()
            .filter(|n| n.has_tag_name("item") || n.has_tag_name("entry"))
            .map(|node| FeedEntry {
                title: child_text(&node, &["title"]).unwrap_or_default(),
                link: child_link(&node).unwrap_or_default(),
                published: child_text(&node, &["pubDate", "published", "updated"]),
                description: child_text(&node, &["description", "summary", "content"])
                    .unwrap_or_default(),
            })
            .collect();
        Ok(entries)
    }
}

impl Segmenter for FeedItems {
    type Block = FeedEntry;

    fn segment(&self, raw: &str) -> Vec<FeedEntry> {
        self.parse(raw).unwrap_or_else(|e| {
            log::warn!("Feed is not well-formed XML: {}", e);
            Vec::new()
        })
    }
}

fn child_text(node: &Node<'_, '_>, names: &[&str]) -> Option<String> {
    node.children()
        .filter(|c| c.is_element())
        .find(|c| {
            names
                .iter()
                .any(|name| c.tag_name().name().eq_ignore_ascii_case(name))
        })
        .map(|c| {
            c.descendants()
                .filter(|d| d.is_text())
                .filter_map(|d| d.text())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|text| !text.is_empty())
}

fn child_link(node: &Node<'_, '_>) -> Option<String> {
    let link = node
        .children()
        .find(|c| c.is_element() && c.tag_name().name().eq_ignore_ascii_case("link"))?;
    link.attribute("href")
        .or_else(|| link.text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// --- PDF layouts ---

/// Visual text blocks of a full bulletin (BOC).
///
/// A block is a run of non-blank lines; its lines are joined with spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBlocks;

impl Segmenter for LayoutBlocks {
    type Block = String;

    fn segment(&self, raw: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        for page in raw.split('\u{c}') {
            let mut current: Vec<&str> = Vec::new();
            for line in page.lines() {
                if line.trim().is_empty() {
                    push_layout_block(&mut blocks, &current);
                    current.clear();
                } else {
                    current.push(line);
                }
            }
            push_layout_block(&mut blocks, &current);
        }
        blocks
    }
}

fn push_layout_block(blocks: &mut Vec<String>, lines: &[&str]) {
    let text = lines.join("\n");
    let text = text.trim();
    if text.chars().count() >= MIN_BLOCK_CHARS {
        blocks.push(text.replace('\n', " "));
    }
}

/// Coded summary entries (BOP Santa Cruz de Tenerife).
///
/// A line starting with a six-digit code opens a block; following lines
/// are appended until the next code. Text before the first code is
/// dropped and every block is cut at its leader dots.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodedLines;

impl Segmenter for CodedLines {
    type Block = String;

    fn segment(&self, raw: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut current = String::new();

        for line in raw.split(['\n', '\u{c}']) {
            let line = line.trim();
            if starts_with_code(line) {
                if !current.is_empty() {
                    blocks.push(current.trim().to_string());
                }
                current = line.to_string();
            } else if !current.is_empty() {
                current.push(' ');
                current.push_str(line);
            }
        }
        if !current.is_empty() {
            blocks.push(current.trim().to_string());
        }

        blocks
            .into_iter()
            .map(|block| before_leader_dots(&block).trim().to_string())
            .collect()
    }
}

/// Free-text paragraphs (BOP Las Palmas).
///
/// Each page is collapsed to a single line; the text is then split on
/// blank-line runs and in front of every six-digit code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paragraphs;

impl Segmenter for Paragraphs {
    type Block = String;

    fn segment(&self, raw: &str) -> Vec<String> {
        let text = raw
            .split('\u{c}')
            .map(collapse_whitespace)
            .collect::<Vec<_>>()
            .join("\n");

        text.split("\n\n")
            .flat_map(split_before_codes)
            .map(str::trim)
            .filter(|block| block.chars().count() >= MIN_BLOCK_CHARS)
            .map(str::to_string)
            .collect()
    }
}

/// Split `text` in front of every position where a six-digit code starts.
fn split_before_codes(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.char_indices().skip(1) {
        if starts_with_code(&text[idx..]) {
            pieces.push(&text[start..idx]);
            start = idx;
        }
    }
    pieces.push(&text[start..]);
    pieces
}
