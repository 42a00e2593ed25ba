//! Topic and prefix collection.
//!
//! Flags are validated with [`validate_topic`] and [`parse_prefix`].
//! When they are missing the binary asks on the terminal through
//! [`prompt_until_valid`], which re-asks a bounded number of times and then
//! gives up with [`SlidesError::InputExhausted`]. Reader and writer are
//! generic so tests drive the prompt with in-memory buffers.

use crate::error::SlidesError;
use crate::model::Prefix;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// Default number of answers accepted before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Topics longer than this are almost certainly a paste accident.
const MAX_TOPIC_CHARS: usize = 200;

/// Trim and check a topic string.
pub fn validate_topic(raw: &str) -> Result<String, SlidesError> {
    let topic = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if topic.is_empty() {
        return Err(SlidesError::InvalidInput {
            reason: "topic must not be empty".into(),
        });
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(SlidesError::InvalidInput {
            reason: format!("topic is longer than {MAX_TOPIC_CHARS} characters"),
        });
    }
    if topic.chars().any(char::is_control) {
        return Err(SlidesError::InvalidInput {
            reason: "topic contains control characters".into(),
        });
    }
    Ok(topic)
}

/// Ask `question` until `parse` accepts an answer.
///
/// Each rejected answer prints the parser's reason and counts as one
/// attempt. End of input aborts immediately with
/// [`SlidesError::InvalidInput`].
pub fn prompt_until_valid<R, W, T, F>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
    max_attempts: u32,
    mut parse: F,
) -> Result<T, SlidesError>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<T, SlidesError>,
{
    let io_err = |e: std::io::Error| SlidesError::Internal(format!("terminal I/O: {e}"));

    for attempt in 1..=max_attempts {
        write!(writer, "{question} ").map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        let mut line = String::new();
        if reader.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(SlidesError::InvalidInput {
                reason: format!("input closed while asking '{question}'"),
            });
        }

        match parse(line.trim_end_matches(['\r', '\n'])) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!("Attempt {}/{} rejected: {}", attempt, max_attempts, e);
                writeln!(writer, "{e}").map_err(io_err)?;
            }
        }
    }

    Err(SlidesError::InputExhausted {
        question: question.to_string(),
        attempts: max_attempts,
    })
}

/// Parse a prefix answer, mapping the parser's message to an input error.
pub fn parse_prefix(raw: &str) -> Result<Prefix, SlidesError> {
    Prefix::from_str(raw).map_err(|reason| SlidesError::InvalidInput { reason })
}

/// Ask for the topic.
pub fn read_topic<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<String, SlidesError> {
    prompt_until_valid(
        reader,
        writer,
        "Type a search term:",
        DEFAULT_MAX_ATTEMPTS,
        validate_topic,
    )
}

/// Show the numbered prefix menu and ask for a choice.
pub fn read_prefix<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<Prefix, SlidesError> {
    for (i, prefix) in Prefix::ALL.iter().enumerate() {
        writeln!(writer, "[{}] {}", i + 1, prefix)
            .map_err(|e| SlidesError::Internal(format!("terminal I/O: {e}")))?;
    }
    prompt_until_valid(
        reader,
        writer,
        "Choose an option:",
        DEFAULT_MAX_ATTEMPTS,
        parse_prefix,
    )
}
