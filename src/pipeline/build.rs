//! Operation building: content model → ordered batch of slide operations.
//!
//! For every sentence the builder emits exactly five operations:
//!
//! ```text
//! CreateSlide ─▶ CreateTextBox ─▶ InsertText ─▶ SetTextStyle ─▶ CreateImage
//!     S…            T… on S…        into T…        on T…          I… on S…
//! ```
//!
//! Later operations refer to ids created earlier in the same batch, so the
//! host must apply them in order. The image check runs over the whole model
//! before the first operation is emitted: a deck with one image-less sentence
//! produces an error, never a batch with a broken slide in it.

use crate::config::{DeckConfig, TextStyle};
use crate::error::SlidesError;
use crate::model::ContentModel;
use crate::operation::{Dimension, ObjectId, OperationBatch, SlideOperation};
use crate::pipeline::layout::LayoutPlanner;
use tracing::debug;
use uuid::Uuid;

/// What kind of object an id is minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Slide,
    TextBox,
    Image,
}

impl ObjectKind {
    /// Single-letter id prefix.
    pub fn prefix(&self) -> char {
        match self {
            ObjectKind::Slide => 'S',
            ObjectKind::TextBox => 'T',
            ObjectKind::Image => 'I',
        }
    }
}

/// Source of fresh object ids. Ids must be unique within a batch.
pub trait IdGenerator {
    fn next_id(&mut self, kind: ObjectKind) -> ObjectId;
}

/// UUIDv7-based ids: unique and sortable by creation time.
///
/// The hyphen-free form keeps ids inside the host's
/// `[a-zA-Z0-9_][a-zA-Z0-9_-:]{4,49}` pattern.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&mut self, kind: ObjectKind) -> ObjectId {
        ObjectId::new(format!("{}{}", kind.prefix(), Uuid::now_v7().simple()))
    }
}

/// Deterministic ids (`S000001`, `T000002`, …) for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: ObjectKind) -> ObjectId {
        self.next += 1;
        ObjectId::new(format!("{}{:06}", kind.prefix(), self.next))
    }
}

/// Turns a fully enriched [`ContentModel`] into an [`OperationBatch`].
#[derive(Debug, Clone)]
pub struct OperationBuilder<G = TimeOrderedIds> {
    planner: LayoutPlanner,
    style: TextStyle,
    ids: G,
}

impl OperationBuilder<TimeOrderedIds> {
    /// Builder with layout and style from `config` and time-ordered ids.
    pub fn new(config: &DeckConfig) -> Self {
        Self::with_ids(
            LayoutPlanner::new(config.layout),
            config.text_style.clone(),
            TimeOrderedIds,
        )
    }
}

impl<G: IdGenerator> OperationBuilder<G> {
    pub fn with_ids(planner: LayoutPlanner, style: TextStyle, ids: G) -> Self {
        Self {
            planner,
            style,
            ids,
        }
    }

    /// Build the batch for every sentence in `model`, in sentence order.
    ///
    /// # Errors
    /// [`SlidesError::MissingImage`] with the index of the first sentence
    /// that has no image URL. No operations are produced in that case.
    pub fn build_batch(&mut self, model: &ContentModel) -> Result<OperationBatch, SlidesError> {
        if let Some(sentence) = model.first_missing_image() {
            return Err(SlidesError::MissingImage { sentence });
        }

        let mut ops = Vec::with_capacity(model.sentences.len() * 5);
        for (index, sentence) in model.sentences.iter().enumerate() {
            let layout = self.planner.plan_layout(index);
            let slide_id = self.ids.next_id(ObjectKind::Slide);
            let box_id = self.ids.next_id(ObjectKind::TextBox);

            ops.push(SlideOperation::CreateSlide {
                slide_id: slide_id.clone(),
                insertion_index: index,
            });
            ops.push(SlideOperation::CreateTextBox {
                box_id: box_id.clone(),
                slide_id: slide_id.clone(),
                placement: layout.text_box,
            });
            ops.push(SlideOperation::InsertText {
                box_id: box_id.clone(),
                text: sentence.text.clone(),
                insertion_index: 0,
            });
            ops.push(SlideOperation::SetTextStyle {
                box_id,
                font_size: Dimension::pt(self.style.font_size_pt),
                font_family: self.style.font_family.clone(),
            });

            // Checked above; a missing image here would be a logic error.
            let url = sentence
                .primary_image()
                .ok_or(SlidesError::MissingImage { sentence: index })?;
            ops.push(SlideOperation::CreateImage {
                image_id: self.ids.next_id(ObjectKind::Image),
                slide_id,
                url: url.to_string(),
                placement: layout.image,
            });
        }

        debug!(
            "Built {} operations for {} slides",
            ops.len(),
            model.sentences.len()
        );
        Ok(OperationBatch::from(ops))
    }
}

/// Build a batch with time-ordered ids and the layout/style from `config`.
pub fn build_batch(model: &ContentModel, config: &DeckConfig) -> Result<OperationBatch, SlidesError> {
    OperationBuilder::new(config).build_batch(model)
}
