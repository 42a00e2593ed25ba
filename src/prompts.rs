//! Prompts for the LLM keyword backend.
//!
//! Only [`crate::services::llm::LlmKeywordExtractor`] uses these. Keeping
//! them in one place lets tests inspect the exact text sent to the model.

use once_cell::sync::Lazy;
use regex::Regex;

/// System prompt asking for search-friendly keywords, one per line.
pub const KEYWORD_SYSTEM_PROMPT: &str = r#"You extract keywords from a single sentence taken from an encyclopedia article.

Rules:
1. Return between 1 and 5 keywords, most relevant first.
2. Each keyword is a short noun phrase copied from the sentence (1-3 words).
3. Prefer named entities, places, dates and concrete objects that would make a good image search.
4. Output one keyword per line.
5. Do NOT number the lines, add bullets, quotes, or any commentary."#;

/// User message carrying the sentence to analyse.
pub fn keyword_request(sentence: &str) -> String {
    format!("Sentence:\n\"\"\"{}\"\"\"", sentence)
}

static RE_LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*•]|\d+[.)])\s+").unwrap());

/// Parse a model reply into keywords.
///
/// Tolerates the usual deviations from the prompt: bullets, numbering,
/// surrounding quotes, and blank lines. Duplicates are dropped, keeping the
/// first occurrence.
pub fn parse_keyword_reply(reply: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for line in reply.lines() {
        let k = RE_LIST_MARKER.replace(line.trim(), "");
        let k = k.trim_matches(|c: char| matches!(c, '"' | '\'' | '`')).trim();
        if k.is_empty() {
            continue;
        }
        if !keywords.iter().any(|seen| seen.eq_ignore_ascii_case(k)) {
            keywords.push(k.to_string());
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wraps_sentence() {
        let msg = keyword_request("Rust is fast.");
        assert!(msg.contains("\"\"\"Rust is fast.\"\"\""));
    }

    #[test]
    fn parses_plain_lines() {
        assert_eq!(
            parse_keyword_reply("Mozilla\nmemory safety\n"),
            vec!["Mozilla", "memory safety"]
        );
    }

    #[test]
    fn strips_bullets_numbers_and_quotes() {
        let reply = "1. \"Eiffel Tower\"\n- Paris\n* 1889\n\n2) Gustave Eiffel\n1900";
        assert_eq!(
            parse_keyword_reply(reply),
            vec!["Eiffel Tower", "Paris", "1889", "Gustave Eiffel", "1900"]
        );
    }

    #[test]
    fn drops_case_insensitive_duplicates() {
        assert_eq!(parse_keyword_reply("Paris\nparis\nFrance"), vec!["Paris", "France"]);
    }
}
