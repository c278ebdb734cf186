use anyhow::{anyhow, Result};
use scraper::{Html, Selector};

// Rekhta renders each ghazal twice; the `data-roman="off"` wrapper holds
// the Urdu-script rendition, `.c` marks one verse block inside it.
const URDU_CONTAINER: &str = r#"div[data-roman="off"] .c"#;
const VERSE_PARAGRAPH: &str = "p";
const VERSE_FRAGMENT: &str = "span";

// Arabic, Arabic Supplement, Arabic Extended-A, Arabic Presentation Forms A/B.
const URDU_RANGES: [(char, char); 5] = [
    ('\u{0600}', '\u{06FF}'),
    ('\u{0750}', '\u{077F}'),
    ('\u{08A0}', '\u{08FF}'),
    ('\u{FB50}', '\u{FDFF}'),
    ('\u{FE70}', '\u{FEFF}'),
];

/// Three-step traversal descriptor: container blocks, the paragraphs
/// inside them, and the inline fragments that make up one line.
pub struct SelectorPath {
    container: Selector,
    paragraph: Selector,
    fragment: Selector,
}

impl SelectorPath {
    pub fn new(container: &str, paragraph: &str, fragment: &str) -> Result<Self> {
        Ok(Self {
            container: parse_selector(container)?,
            paragraph: parse_selector(paragraph)?,
            fragment: parse_selector(fragment)?,
        })
    }
}

impl Default for SelectorPath {
    fn default() -> Self {
        // Literals above are known-good; parse cannot fail.
        Self::new(URDU_CONTAINER, VERSE_PARAGRAPH, VERSE_FRAGMENT).unwrap()
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("invalid selector {s:?}: {e}"))
}

/// Walk container -> paragraph -> fragment in document order and collect
/// one normalized line per paragraph that carries any Urdu text.
/// Paragraphs without Urdu (e.g. roman transliteration that slipped into
/// the container) are dropped, not errors. No document ever makes this fail.
pub fn extract_verses(doc: &Html, path: &SelectorPath) -> Vec<String> {
    let mut verses = Vec::new();

    for container in doc.select(&path.container) {
        for para in container.select(&path.paragraph) {
            let words: Vec<String> = para
                .select(&path.fragment)
                .map(|frag| clean_text(&frag.text().collect::<String>()))
                .filter(|t| !t.is_empty())
                .collect();

            if !words.is_empty() && words.iter().any(|w| is_urdu(w)) {
                verses.push(words.join(" "));
            }
        }
    }

    verses
}

/// Collapse every whitespace run (non-breaking spaces included) to a single
/// ASCII space and trim. Literal `&nbsp;` survives double-escaped markup,
/// so it is rewritten before the collapse. Idempotent.
pub fn clean_text(s: &str) -> String {
    let s = s.replace("&nbsp;", " ");
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// True when any character falls in the Urdu script ranges.
pub fn is_urdu(text: &str) -> bool {
    text.chars()
        .any(|c| URDU_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c)))
}
