//! The content model: topic, article text, and the ordered sentence list.
//!
//! A [`ContentModel`] is built once per run. Each pipeline stage takes the
//! model by value and hands back the next version, so there is never more
//! than one live owner and no stage can observe another's half-finished work.
//!
//! ```text
//! ContentModel::from_article ──▶ enrich (keywords, images) ──▶ build batch
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Framing chosen by the user for the deck title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Prefix {
    #[serde(rename = "Who is")]
    WhoIs,
    #[default]
    #[serde(rename = "What is")]
    WhatIs,
    #[serde(rename = "The history of")]
    HistoryOf,
}

impl Prefix {
    /// All prefixes, in menu order.
    pub const ALL: [Prefix; 3] = [Prefix::WhoIs, Prefix::WhatIs, Prefix::HistoryOf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::WhoIs => "Who is",
            Prefix::WhatIs => "What is",
            Prefix::HistoryOf => "The history of",
        }
    }

    /// Parse a 1-indexed menu choice (`"1"`..`"3"`).
    pub fn from_choice(choice: &str) -> Option<Prefix> {
        let n: usize = choice.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prefix {
    type Err = String;

    /// Accepts a menu number or a short name: `who`, `what`, `history`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(p) = Prefix::from_choice(s) {
            return Ok(p);
        }
        match s.trim().to_lowercase().as_str() {
            "who" | "who is" => Ok(Prefix::WhoIs),
            "what" | "what is" => Ok(Prefix::WhatIs),
            "history" | "the history of" => Ok(Prefix::HistoryOf),
            other => Err(format!(
                "unknown prefix '{other}' (expected 1-3, who, what or history)"
            )),
        }
    }
}

/// One sentence of the article; becomes exactly one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Slide text. Never empty.
    pub text: String,
    /// Keywords in relevance order. Empty until keyword extraction runs.
    pub keywords: Vec<String>,
    /// Candidate image URLs. Only the first one is placed on the slide.
    pub images: Vec<String>,
}

impl SentenceRecord {
    /// Create a record with no keywords or images yet.
    ///
    /// Returns `None` when `text` is blank after trimming.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
            keywords: Vec::new(),
            images: Vec::new(),
        })
    }

    /// The image URL the slide will show, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Everything known about the deck before it is turned into operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModel {
    pub topic: String,
    pub prefix: Prefix,
    /// Article text exactly as the content source returned it.
    pub raw_text: String,
    /// `raw_text` after [`crate::pipeline::normalize::normalize`].
    pub normalized_text: String,
    /// Slide order is sentence order.
    pub sentences: Vec<SentenceRecord>,
}

impl ContentModel {
    /// Build a model from an article and its already-split sentences.
    ///
    /// Only the first `max_sentences` non-blank sentences are kept; the rest
    /// are dropped whole.
    pub fn from_article(
        topic: impl Into<String>,
        prefix: Prefix,
        raw_text: impl Into<String>,
        normalized_text: impl Into<String>,
        sentences: impl IntoIterator<Item = String>,
        max_sentences: usize,
    ) -> Self {
        let sentences = sentences
            .into_iter()
            .filter_map(SentenceRecord::new)
            .take(max_sentences)
            .collect();
        Self {
            topic: topic.into(),
            prefix,
            raw_text: raw_text.into(),
            normalized_text: normalized_text.into(),
            sentences,
        }
    }

    /// Title used when creating the presentation.
    pub fn title(&self) -> &str {
        &self.topic
    }

    /// Index of the first sentence that has no image, if any.
    pub fn first_missing_image(&self) -> Option<usize> {
        self.sentences.iter().position(|s| s.images.is_empty())
    }
}
