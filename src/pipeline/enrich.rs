//! Keyword and image enrichment for every sentence of a [`ContentModel`].
//!
//! Per sentence: extract keywords, build the image query, find images. With
//! `concurrency > 1` several sentences are in flight at once, but results
//! are collected with `buffered` so the model keeps sentence order. The
//! first failure, in sentence order, aborts the run.

use crate::config::DeckConfig;
use crate::error::SlidesError;
use crate::model::ContentModel;
use crate::services::{ImageFinder, KeywordExtractor};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, warn};

/// Image search query for the sentence at `index`.
///
/// The first slide is about the topic itself, so it searches for the topic
/// alone. Later slides add their top keyword to steer the search toward the
/// sentence; without keywords they fall back to the topic.
pub fn image_query(topic: &str, index: usize, keywords: &[String]) -> String {
    match (index, keywords.first()) {
        (0, _) | (_, None) => topic.to_string(),
        (_, Some(keyword)) => format!("{topic} {keyword}"),
    }
}

/// Fill `keywords` and `images` on every sentence and return the model.
pub async fn enrich(
    mut model: ContentModel,
    keywords: &dyn KeywordExtractor,
    images: &dyn ImageFinder,
    config: &DeckConfig,
) -> Result<ContentModel, SlidesError> {
    let total = model.sentences.len();
    let topic = model.topic.as_str();
    let image_results = config.image_results;
    let callback = config.progress_callback.as_ref();

    let enriched: Vec<(Vec<String>, Vec<String>)> =
        stream::iter(model.sentences.iter().enumerate().map(|(index, sentence)| {
            let text = sentence.text.as_str();
            async move {
                let found_keywords = keywords
                    .extract(text)
                    .await
                    .map_err(|e| e.at_sentence(index))?;

                let query = image_query(topic, index, &found_keywords);
                debug!("Sentence {}: image query '{}'", index, query);

                let found_images = images
                    .find(&query, image_results)
                    .await
                    .map_err(|e| e.at_sentence(index))?;
                if found_images.is_empty() {
                    warn!("Sentence {}: no images for '{}'", index, query);
                }

                if let Some(cb) = callback {
                    cb.on_sentence_enriched(index, total, found_images.len());
                }
                Ok::<_, SlidesError>((found_keywords, found_images))
            }
        }))
        .buffered(config.concurrency.max(1))
        .try_collect()
        .await?;

    for (sentence, (kw, imgs)) in model.sentences.iter_mut().zip(enriched) {
        sentence.keywords = kw;
        sentence.images = imgs;
    }
    Ok(model)
}
