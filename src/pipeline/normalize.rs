//! Normalisation: flatten raw article text into one clean paragraph.
//!
//! Encyclopedia plain-text extracts come with section markers
//! (`== History ==`), blank lines between paragraphs, and parenthetical
//! asides such as birth dates or pronunciations that read badly on a slide.
//! The rules below strip those without touching the prose itself.
//!
//! ## Rule Order
//!
//! Line filtering must run before flattening, because after the join there
//! are no line boundaries left to detect markers on. Parenthetical removal
//! runs before whitespace collapse since removing a group leaves a double
//! space behind.
//!
//! The output is a fixed point: `normalize(normalize(x)) == normalize(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to raw article text.
///
/// Rules (applied in order):
/// 1. Drop blank lines and lines starting with `=` (section markers)
/// 2. Trim the remaining lines and join them with single spaces
/// 3. Remove parenthetical groups, innermost first, until none remain
/// 4. Collapse whitespace runs to a single space
/// 5. Remove spaces stranded before punctuation by rule 3
/// 6. Trim, including any `=` a removed group exposed at the start
pub fn normalize(raw: &str) -> String {
    let s = flatten_lines(raw);
    let s = remove_parentheticals(&s);
    let s = collapse_whitespace(&s);
    let s = tighten_punctuation(&s);
    trim_edges(&s)
}

// ── Rules 1–2: Filter and flatten lines ──────────────────────────────────────

fn is_content_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('=')
}

fn flatten_lines(input: &str) -> String {
    input
        .lines()
        .filter(|l| is_content_line(l))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Rule 3: Remove parenthetical groups ──────────────────────────────────────

static RE_INNER_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]*\)").unwrap());

fn remove_parentheticals(input: &str) -> String {
    let mut current = input.to_string();
    while RE_INNER_PARENS.is_match(&current) {
        current = RE_INNER_PARENS.replace_all(&current, "").into_owned();
    }
    current
}

// ── Rule 4: Collapse whitespace ──────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").into_owned()
}

// ── Rule 5: Tighten punctuation ──────────────────────────────────────────────

static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r" +([,.;:!?])").unwrap());

fn tighten_punctuation(input: &str) -> String {
    RE_SPACE_BEFORE_PUNCT.replace_all(input, "$1").into_owned()
}

// ── Rule 6: Trim edges ───────────────────────────────────────────────────────

fn trim_edges(input: &str) -> String {
    input
        .trim_start_matches(|c: char| c == '=' || c.is_whitespace())
        .trim_end()
        .to_string()
}
