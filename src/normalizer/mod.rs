//! Tolerant parsing of item-style and entry-style syndication payloads.
//!
//! Payloads are split into blocks and fields are pulled out with
//! patterns instead of a strict XML parser, so truncated or malformed
//! input still yields whatever complete items it contains.

pub mod link;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;
use regex::Regex;

use crate::domain::{FeedFormat, NewsItem};

pub const DEFAULT_EXCERPT_CHARS: usize = 220;

static ENTRY_MARKER: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<feed[\s>]"));
static TAGS: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?s)<[^>]*>"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));
static LINK_HREF: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?is)<link\b[^>]*?href\s*=\s*["']([^"']+)["']"#));

static ITEM_OPEN: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<item[\s>]"));
static ITEM_CLOSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)</item\s*>"));
static ENTRY_OPEN: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<entry[\s>]"));
static ENTRY_CLOSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)</entry\s*>"));

static TITLE: LazyLock<Regex> = LazyLock::new(|| element("title"));
static LINK: LazyLock<Regex> = LazyLock::new(|| element("link"));
static PUB_DATE: LazyLock<Regex> = LazyLock::new(|| element("pubDate"));
static DC_DATE: LazyLock<Regex> = LazyLock::new(|| element("dc:date"));
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| element("description"));
static CONTENT_ENCODED: LazyLock<Regex> = LazyLock::new(|| element("content:encoded"));
static UPDATED: LazyLock<Regex> = LazyLock::new(|| element("updated"));
static PUBLISHED: LazyLock<Regex> = LazyLock::new(|| element("published"));
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| element("summary"));
static CONTENT: LazyLock<Regex> = LazyLock::new(|| element("content"));
static ID: LazyLock<Regex> = LazyLock::new(|| element("id"));

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern is valid")
}

/// Matches `<name ...>text</name>` and captures the text.
pub(crate) fn element(name: &str) -> Regex {
    let name = regex::escape(name);
    pattern(&format!(r"(?is)<{name}(?:\s[^>]*)?>(.*?)</{name}\s*>"))
}

/// The grammar a payload is written in, decided once per payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedFormat {
    ItemStyle,
    EntryStyle,
}

impl ParsedFormat {
    /// Entry-style when the payload has a `<feed>` root, item-style otherwise.
    pub fn sniff(raw: &str) -> Self {
        if ENTRY_MARKER.is_match(raw) {
            Self::EntryStyle
        } else {
            Self::ItemStyle
        }
    }

    pub fn resolve(expected: FeedFormat, raw: &str) -> Self {
        match expected {
            FeedFormat::Item => Self::ItemStyle,
            FeedFormat::Entry => Self::EntryStyle,
            FeedFormat::Auto => Self::sniff(raw),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    excerpt_chars: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_CHARS)
    }
}

impl Normalizer {
    pub fn new(excerpt_chars: usize) -> Self {
        Self { excerpt_chars }
    }

    /// Parse `raw` with the grammar implied by `expected`. Never fails;
    /// unusable input produces no items.
    pub fn normalize(&self, raw: &str, expected: FeedFormat, source: &str) -> Vec<NewsItem> {
        match ParsedFormat::resolve(expected, raw) {
            ParsedFormat::ItemStyle => self.parse_items(raw, source),
            ParsedFormat::EntryStyle => self.parse_entries(raw, source),
        }
    }

    pub fn parse_items(&self, raw: &str, source: &str) -> Vec<NewsItem> {
        blocks(raw, Block::Item)
            .into_iter()
            .filter_map(|block| {
                let title = capture(block, &TITLE).map(clean_text)?;
                let link = capture(block, &LINK).map(clean_text)?;
                let mut item = NewsItem::new(&title, &link, source)?;

                item.published_at = capture(block, &PUB_DATE)
                    .or_else(|| capture(block, &DC_DATE))
                    .and_then(parse_timestamp);
                item.excerpt = capture(block, &DESCRIPTION)
                    .or_else(|| capture(block, &CONTENT_ENCODED))
                    .and_then(|d| self.excerpt(d));
                Some(item)
            })
            .collect()
    }

    pub fn parse_entries(&self, raw: &str, source: &str) -> Vec<NewsItem> {
        blocks(raw, Block::Entry)
            .into_iter()
            .filter_map(|block| {
                let title = capture(block, &TITLE).map(clean_text)?;
                let link = capture(block, &LINK_HREF)
                    .map(clean_text)
                    .filter(|l| !l.is_empty())
                    .or_else(|| capture(block, &ID).map(clean_text))?;
                let mut item = NewsItem::new(&title, &link, source)?;

                item.published_at = capture(block, &UPDATED)
                    .or_else(|| capture(block, &PUBLISHED))
                    .and_then(parse_timestamp);
                item.excerpt = capture(block, &SUMMARY)
                    .or_else(|| capture(block, &CONTENT))
                    .and_then(|d| self.excerpt(d));
                Some(item)
            })
            .collect()
    }

    fn excerpt(&self, raw: &str) -> Option<String> {
        let text = plain_text(raw);
        if text.is_empty() {
            return None;
        }
        Some(text.chars().take(self.excerpt_chars).collect())
    }
}

/// Repeated element that delimits one item in a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block {
    Item,
    Entry,
}

impl Block {
    fn delimiters(self) -> (&'static Regex, &'static Regex) {
        match self {
            Self::Item => (&*ITEM_OPEN, &*ITEM_CLOSE),
            Self::Entry => (&*ENTRY_OPEN, &*ENTRY_CLOSE),
        }
    }
}

/// Bodies of every block of the given kind. A block missing its closing
/// tag runs to the end of the input.
pub(crate) fn blocks(raw: &str, block: Block) -> Vec<&str> {
    let (opener, closer) = block.delimiters();

    opener
        .find_iter(raw)
        .map(|m| {
            let rest = &raw[m.end()..];
            match closer.find(rest) {
                Some(end) => &rest[..end.start()],
                None => rest,
            }
        })
        .collect()
}

pub(crate) fn capture<'a>(block: &'a str, re: &Regex) -> Option<&'a str> {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// CDATA unwrapped, entities decoded, whitespace collapsed.
pub(crate) fn clean_text(raw: &str) -> String {
    let unwrapped = strip_cdata(raw);
    let decoded = decode_html_entities(&unwrapped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

/// Markup reduced to single-spaced plain text.
pub(crate) fn plain_text(raw: &str) -> String {
    let unwrapped = strip_cdata(raw);
    let decoded = decode_html_entities(&unwrapped);
    let untagged = TAGS.replace_all(&decoded, " ");
    WHITESPACE.replace_all(untagged.trim(), " ").into_owned()
}

fn strip_cdata(raw: &str) -> String {
    raw.replace("<![CDATA[", "").replace("]]>", "")
}

/// RFC 2822 or RFC 3339; anything else is treated as undated.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = clean_text(raw);
    DateTime::parse_from_rfc2822(&raw)
        .or_else(|_| DateTime::parse_from_rfc3339(&raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
