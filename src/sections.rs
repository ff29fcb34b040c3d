// src/sections.rs
use crate::models::{ParsedSection, SectionCategory};
use regex::Regex;
use std::sync::LazyLock;

/// Headers must be shorter than this many UTF-16 code units once trimmed,
/// which is how the browser client measures them.
const MAX_HEADER_LEN: usize = 60;

static ORDINAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.").unwrap());
static CAPITALIZED_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][^.!?]*:$").unwrap());
static HASH_MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##\s*").unwrap());
static ORDINAL_MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());

/// First match wins.
const CATEGORY_KEYWORDS: &[(&[&str], SectionCategory)] = &[
    (&["recommend", "suggest"], SectionCategory::Recommendation),
    (&["tip", "advice"], SectionCategory::Tip),
    (&["care", "routine"], SectionCategory::Routine),
    (&["key", "finding", "result"], SectionCategory::Findings),
    (&["overview", "summary"], SectionCategory::Overview),
];

impl SectionCategory {
    pub fn from_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, category)| *category)
            .unwrap_or(SectionCategory::Generic)
    }
}

fn is_header(trimmed: &str) -> bool {
    let looks_like_header = trimmed.ends_with(':')
        || trimmed.starts_with("##")
        || ORDINAL_PREFIX.is_match(trimmed)
        || CAPITALIZED_LABEL.is_match(trimmed);

    let len = trimmed.encode_utf16().count();
    looks_like_header && len > 0 && len < MAX_HEADER_LEN
}

fn header_title(trimmed: &str) -> String {
    let title = HASH_MARKUP.replace(trimmed, "");
    let title = ORDINAL_MARKUP.replace(&title, "");
    let title = title.strip_suffix(':').unwrap_or(&title[..]);
    title.trim().to_string()
}

struct OpenSection {
    title: String,
    content: String,
}

impl OpenSection {
    fn finish(self) -> ParsedSection {
        let category = SectionCategory::from_title(&self.title);
        ParsedSection {
            title: self.title,
            content: self.content,
            category,
        }
    }
}

/// Splits model output into titled sections for display.
///
/// Text before the first header becomes an "Overview" section. Sections whose
/// content is blank are dropped; if nothing survives, the whole text is
/// returned as a single "Analysis" section.
pub fn parse_sections(text: &str) -> Vec<ParsedSection> {
    let mut sections = Vec::new();
    let mut current: Option<OpenSection> = None;

    for line in text.split('\n') {
        let trimmed = line.trim();

        if is_header(trimmed) {
            if let Some(open) = current.take() {
                if !open.content.trim().is_empty() {
                    sections.push(open.finish());
                }
            }
            current = Some(OpenSection {
                title: header_title(trimmed),
                content: String::new(),
            });
            continue;
        }

        match current.as_mut() {
            Some(open) => {
                if !trimmed.is_empty() {
                    open.content.push_str(line);
                    open.content.push('\n');
                }
            }
            None => {
                current = Some(OpenSection {
                    title: "Overview".to_string(),
                    content: format!("{line}\n"),
                });
            }
        }
    }

    if let Some(open) = current {
        if !open.content.trim().is_empty() {
            sections.push(open.finish());
        }
    }

    if sections.is_empty() {
        sections.push(ParsedSection {
            title: "Analysis".to_string(),
            content: text.to_string(),
            category: SectionCategory::Overview,
        });
    }

    sections
}
