//! Sentence splitting on Unicode boundaries, refined per language.
//!
//! UAX #29 sentence boundaries handle most prose correctly but break after
//! every abbreviation followed by a capitalised word ("Dr. Who", "St. Paul")
//! and after initials ("J. R. R. Tolkien"). [`BoundarySplitter`] re-joins those
//! fragments using per-language data:
//!
//! - titles ("dr.", "prof.") precede a name and never end a sentence;
//! - other abbreviations and single-letter initials end a sentence unless
//!   the next fragment starts in lowercase or with another initial;
//! - a chain of two or more initials always continues into the name.
//!
//! So "World War I. He survived." and "the answer was no. Then" split, while
//! "Dr. Kay" and "J. R. R. Tolkien" stay whole. Entries read from an
//! abbreviations file are treated as titles.
//!
//! Loading the language data is the only fallible step; once built, a
//! splitter never fails.

use crate::error::SlidesError;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

// ── Language data ────────────────────────────────────────────────────────────

struct LanguageData {
    titles: &'static [&'static str],
    abbreviations: &'static [&'static str],
}

const EN: LanguageData = LanguageData {
    titles: &[
        "mr.", "mrs.", "ms.", "dr.", "prof.", "mt.", "vs.", "gen.", "col.", "lt.", "sgt.",
        "capt.", "gov.", "sen.", "rep.", "rev.",
    ],
    abbreviations: &[
        "st.", "jr.", "sr.", "ft.", "no.", "inc.", "ltd.", "co.", "corp.", "u.s.", "u.k.",
        "u.n.", "e.g.", "i.e.", "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.",
        "sept.", "oct.", "nov.", "dec.", "approx.", "ca.", "c.",
    ],
};

const PT: LanguageData = LanguageData {
    titles: &["sr.", "sra.", "dr.", "dra.", "prof.", "profa.", "cel.", "eng."],
    abbreviations: &["av.", "ex.", "pág.", "séc.", "gal.", "s.a.", "ltda."],
};

const ES: LanguageData = LanguageData {
    titles: &["sr.", "sra.", "srta.", "dr.", "dra.", "prof.", "gral."],
    abbreviations: &["av.", "ud.", "uds.", "pág.", "ee.uu.", "s.a."],
};

const FR: LanguageData = LanguageData {
    titles: &["m.", "mme.", "mlle.", "dr.", "pr.", "st.", "ste."],
    abbreviations: &["av.", "env.", "cf.", "p.ex."],
};

const DE: LanguageData = LanguageData {
    titles: &["hr.", "fr.", "dr.", "prof."],
    abbreviations: &["bzw.", "z.b.", "ca.", "nr.", "str.", "vgl.", "d.h."],
};

fn language_data(primary: &str) -> Option<&'static LanguageData> {
    match primary {
        "en" => Some(&EN),
        "pt" => Some(&PT),
        "es" => Some(&ES),
        "fr" => Some(&FR),
        "de" => Some(&DE),
        _ => None,
    }
}

// ── Splitter ─────────────────────────────────────────────────────────────────

/// UAX #29 splitter with abbreviation-aware re-joining.
#[derive(Debug, Clone)]
pub struct BoundarySplitter {
    language: String,
    titles: HashSet<String>,
    abbreviations: HashSet<String>,
}

impl BoundarySplitter {
    /// Load the boundary data for `language` (`"en"`, `"pt-BR"`, …).
    ///
    /// Only the primary subtag is considered.
    pub fn for_language(language: &str) -> Result<Self, SlidesError> {
        let primary = language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let data = language_data(&primary).ok_or_else(|| SlidesError::TokenizerUnavailable {
            language: language.to_string(),
            reason: "no sentence-boundary data for this language".into(),
        })?;
        debug!(
            "Loaded {} titles and {} abbreviations for '{}'",
            data.titles.len(),
            data.abbreviations.len(),
            primary
        );
        Ok(Self {
            language: primary,
            titles: data.titles.iter().map(|a| a.to_string()).collect(),
            abbreviations: data.abbreviations.iter().map(|a| a.to_string()).collect(),
        })
    }

    /// Add entries that never end a sentence, one per line.
    ///
    /// Blank lines and lines starting with `#` are ignored; entries are
    /// lowercased and given a trailing `.` if they lack one.
    pub fn with_abbreviations_file(mut self, path: impl AsRef<Path>) -> Result<Self, SlidesError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| SlidesError::TokenizerUnavailable {
                language: self.language.clone(),
                reason: format!("cannot read abbreviations from {}: {e}", path.display()),
            })?;
        let before = self.titles.len();
        for line in contents.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let mut entry = entry.to_lowercase();
            if !entry.ends_with('.') {
                entry.push('.');
            }
            self.titles.insert(entry);
        }
        debug!(
            "Added {} abbreviations from {}",
            self.titles.len() - before,
            path.display()
        );
        Ok(self)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Segment `text` into trimmed sentences, in order.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut pending = String::new();
        let mut fragments = text.split_sentence_bounds().peekable();

        while let Some(fragment) = fragments.next() {
            pending.push_str(fragment);
            if let Some(next) = fragments.peek() {
                if self.continues_into(&pending, next) {
                    continue;
                }
            }
            push_sentence(&mut sentences, &pending);
            pending.clear();
        }

        sentences
    }

    /// True when the boundary between `pending` and `next` is not a
    /// sentence end.
    fn continues_into(&self, pending: &str, next: &str) -> bool {
        let mut words = pending.split_whitespace().rev().map(dotted_word);
        let Some(Some(last)) = words.next() else {
            return false;
        };
        if self.titles.contains(&last) {
            return true;
        }
        let initial = is_initial(&last);
        if !initial && !self.abbreviations.contains(&last) {
            return false;
        }
        if initial && matches!(words.next(), Some(Some(ref w)) if is_initial(w)) {
            return true;
        }
        let next_is_initial = next
            .split_whitespace()
            .next()
            .and_then(dotted_word)
            .is_some_and(|w| is_initial(&w));
        starts_lowercase(next) || next_is_initial
    }
}

/// `word` lowercased, without leading punctuation, if it ends in `.`.
fn dotted_word(word: &str) -> Option<String> {
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    word.ends_with('.').then(|| word.to_lowercase())
}

/// A single letter followed by `.`, as in "J.".
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_alphabetic()
    )
}

fn starts_lowercase(text: &str) -> bool {
    text.trim_start()
        .chars()
        .find(|c| c.is_alphanumeric())
        .is_some_and(char::is_lowercase)
}

fn push_sentence(out: &mut Vec<String>, candidate: &str) {
    let s = candidate.trim();
    if s.chars().any(char::is_alphanumeric) {
        out.push(s.to_string());
    }
}
