//! Main-text extraction from fetched HTML.
//!
//! A regex pass, not a parser: drop non-content blocks, turn block
//! boundaries into line breaks, strip the remaining tags, then keep only
//! lines that read like prose.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lines shorter than this are kept only if they end a sentence.
const MIN_LINE_CHARS: usize = 40;

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));

static BOILERPLATE_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["script", "style", "noscript", "nav", "header", "footer", "aside", "form"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("Invalid block regex")
        })
        .collect()
});

static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</(p|div|section|article|li|ul|ol|h[1-6]|tr|table|blockquote|pre|dd|dt)\s*>|<br\s*/?>",
    )
    .expect("Invalid block break regex")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid tag regex"));

static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("Invalid entity regex")
});

static INLINE_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\r\u{a0}]+").expect("Invalid whitespace regex"));

const NAMED_ENTITIES: [(&str, &str); 14] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&eacute;", "é"),
    ("&egrave;", "è"),
    ("&ecirc;", "ê"),
    ("&agrave;", "à"),
    ("&ccedil;", "ç"),
    ("&ocirc;", "ô"),
    ("&laquo;", "«"),
    ("&raquo;", "»"),
];

fn decode_entities(text: &str) -> String {
    let mut decoded = NUMERIC_ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let raw = &caps[1];
            let code = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => raw.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    // Last, so "&amp;lt;" decodes to "&lt;" and not "<".
    decoded.replace("&amp;", "&")
}

fn reads_like_prose(line: &str) -> bool {
    line.chars().count() >= MIN_LINE_CHARS
        || line.ends_with(['.', '!', '?', '…'])
}

/// Extract the readable text of an HTML page.
///
/// Returns `None` when nothing prose-like remains.
pub fn extract_text(html: &str) -> Option<String> {
    let mut text = COMMENT.replace_all(html, " ").into_owned();
    for block in BOILERPLATE_BLOCKS.iter() {
        text = block.replace_all(&text, " ").into_owned();
    }
    let text = BLOCK_BREAK.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);

    let lines: Vec<String> = text
        .lines()
        .map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty() && reads_like_prose(line))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// First `limit` characters of `text`.
pub fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
