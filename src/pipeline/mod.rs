//! Pipeline stages for topic-to-deck generation.
//!
//! Each submodule implements exactly one transformation step. Stages take
//! their input by value (or by reference for pure functions) and return the
//! next value; none of them keep state between runs.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ split ──▶ enrich ──▶ layout + build
//! (topic)   (cleanup)    (UAX#29)  (kw, img)   (operation batch)
//! ```
//!
//! 1. [`input`]     : validate or interactively ask for the topic and prefix
//! 2. [`normalize`] : strip headings, parentheticals and stray whitespace
//! 3. [`split`]     : sentence boundaries with abbreviation handling
//! 4. [`enrich`]    : keywords and image URLs per sentence; the only stage
//!    with network I/O before submission
//! 5. [`layout`]    : geometry for the text box and the image
//! 6. [`build`]     : ordered slide operations with fresh object ids

pub mod build;
pub mod enrich;
pub mod input;
pub mod layout;
pub mod normalize;
pub mod split;
