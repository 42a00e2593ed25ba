//! Slide-construction operations and the geometry they carry.
//!
//! An [`OperationBatch`] is the only thing the presentation host ever sees.
//! Operations reference each other by [`ObjectId`]: a `CreateTextBox` names
//! the slide created earlier in the same batch, so order inside the batch is
//! significant and must never be shuffled.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EMUs per typographic point.
pub const EMU_PER_PT: f64 = 12_700.0;

/// Length unit understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Pt,
    Emu,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pt => "PT",
            Unit::Emu => "EMU",
        }
    }

    fn to_points(self, magnitude: f64) -> f64 {
        match self {
            Unit::Pt => magnitude,
            Unit::Emu => magnitude / EMU_PER_PT,
        }
    }
}

/// A single length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: Unit,
}

impl Dimension {
    pub const fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Pt,
        }
    }

    pub const fn emu(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Emu,
        }
    }

    pub fn to_points(&self) -> f64 {
        self.unit.to_points(self.magnitude)
    }
}

/// Width and height of a page element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

impl Size {
    pub const fn square(side: Dimension) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// Offset of a page element's top-left corner from the slide origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub unit: Unit,
}

/// Size plus position: everything needed to place an element on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub size: Size,
    pub position: Position,
}

impl Placement {
    /// Bounding box in points as `(left, top, right, bottom)`.
    pub fn bounds_pt(&self) -> (f64, f64, f64, f64) {
        let left = self.position.unit.to_points(self.position.x);
        let top = self.position.unit.to_points(self.position.y);
        (
            left,
            top,
            left + self.size.width.to_points(),
            top + self.size.height.to_points(),
        )
    }

    /// True when the two boxes share any area. Touching edges do not count.
    pub fn overlaps(&self, other: &Placement) -> bool {
        let (l1, t1, r1, b1) = self.bounds_pt();
        let (l2, t2, r2, b2) = other.bounds_pt();
        l1 < r2 && l2 < r1 && t1 < b2 && t2 < b1
    }
}

/// Identifier of a slide, text box, or image within one presentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of [`SlideOperation`], handy for asserting batch shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateSlide,
    CreateTextBox,
    InsertText,
    SetTextStyle,
    CreateImage,
}

/// One atomic step of deck construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlideOperation {
    /// Add a blank slide at `insertion_index`.
    CreateSlide {
        slide_id: ObjectId,
        insertion_index: usize,
    },
    /// Add an empty text box to `slide_id`.
    CreateTextBox {
        box_id: ObjectId,
        slide_id: ObjectId,
        placement: Placement,
    },
    /// Write `text` into `box_id` starting at `insertion_index`.
    InsertText {
        box_id: ObjectId,
        text: String,
        insertion_index: usize,
    },
    /// Apply font size and family to all text in `box_id`.
    SetTextStyle {
        box_id: ObjectId,
        font_size: Dimension,
        font_family: String,
    },
    /// Place the image at `url` on `slide_id`.
    CreateImage {
        image_id: ObjectId,
        slide_id: ObjectId,
        url: String,
        placement: Placement,
    },
}

impl SlideOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            SlideOperation::CreateSlide { .. } => OperationKind::CreateSlide,
            SlideOperation::CreateTextBox { .. } => OperationKind::CreateTextBox,
            SlideOperation::InsertText { .. } => OperationKind::InsertText,
            SlideOperation::SetTextStyle { .. } => OperationKind::SetTextStyle,
            SlideOperation::CreateImage { .. } => OperationKind::CreateImage,
        }
    }

    /// The id this operation brings into existence, if it creates an object.
    pub fn created_id(&self) -> Option<&ObjectId> {
        match self {
            SlideOperation::CreateSlide { slide_id, .. } => Some(slide_id),
            SlideOperation::CreateTextBox { box_id, .. } => Some(box_id),
            SlideOperation::CreateImage { image_id, .. } => Some(image_id),
            SlideOperation::InsertText { .. } | SlideOperation::SetTextStyle { .. } => None,
        }
    }

    /// Ids this operation expects to already exist.
    pub fn referenced_ids(&self) -> Vec<&ObjectId> {
        match self {
            SlideOperation::CreateSlide { .. } => vec![],
            SlideOperation::CreateTextBox { slide_id, .. }
            | SlideOperation::CreateImage { slide_id, .. } => vec![slide_id],
            SlideOperation::InsertText { box_id, .. }
            | SlideOperation::SetTextStyle { box_id, .. } => vec![box_id],
        }
    }
}

/// The ordered operations for one presentation, submitted in a single call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationBatch {
    operations: Vec<SlideOperation>,
}

impl OperationBatch {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SlideOperation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[SlideOperation] {
        &self.operations
    }

    /// Number of slides the batch creates.
    pub fn slide_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.kind() == OperationKind::CreateSlide)
            .count()
    }

    pub fn kinds(&self) -> Vec<OperationKind> {
        self.operations.iter().map(SlideOperation::kind).collect()
    }

    /// All created ids, in creation order.
    pub fn created_ids(&self) -> Vec<&ObjectId> {
        self.operations
            .iter()
            .filter_map(SlideOperation::created_id)
            .collect()
    }
}

impl From<Vec<SlideOperation>> for OperationBatch {
    fn from(operations: Vec<SlideOperation>) -> Self {
        Self { operations }
    }
}

impl<'a> IntoIterator for &'a OperationBatch {
    type Item = &'a SlideOperation;
    type IntoIter = std::slice::Iter<'a, SlideOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(x: f64, y: f64, side: Dimension, unit: Unit) -> Placement {
        Placement {
            size: Size::square(side),
            position: Position { x, y, unit },
        }
    }

    #[test]
    fn emu_converts_to_points() {
        assert_eq!(Dimension::emu(12_700.0).to_points(), 1.0);
        assert_eq!(Dimension::pt(16.0).to_points(), 16.0);
    }

    #[test]
    fn overlap_across_units() {
        // 100pt square at the origin vs. a box starting at 50pt given in EMU.
        let a = placement(0.0, 0.0, Dimension::pt(100.0), Unit::Pt);
        let b = placement(50.0 * EMU_PER_PT, 0.0, Dimension::emu(EMU_PER_PT), Unit::Emu);
        assert!(a.overlaps(&b));

        let c = placement(100.0, 0.0, Dimension::pt(10.0), Unit::Pt);
        assert!(!a.overlaps(&c), "touching edges are not an overlap");
    }

    #[test]
    fn unit_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Unit::Emu).unwrap(), "\"EMU\"");
        assert_eq!(Unit::Pt.as_str(), "PT");
    }

    #[test]
    fn operation_ids() {
        let op = SlideOperation::CreateImage {
            image_id: ObjectId::new("I1"),
            slide_id: ObjectId::new("S1"),
            url: "https://img".into(),
            placement: placement(0.0, 0.0, Dimension::pt(1.0), Unit::Pt),
        };
        assert_eq!(op.kind(), OperationKind::CreateImage);
        assert_eq!(op.created_id().map(ObjectId::as_str), Some("I1"));
        assert_eq!(op.referenced_ids(), vec![&ObjectId::new("S1")]);
    }

    #[test]
    fn batch_counts_slides() {
        let batch = OperationBatch::from(vec![
            SlideOperation::CreateSlide {
                slide_id: ObjectId::new("S1"),
                insertion_index: 0,
            },
            SlideOperation::InsertText {
                box_id: ObjectId::new("T1"),
                text: "x".into(),
                insertion_index: 0,
            },
        ]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.slide_count(), 1);
        assert_eq!(batch.created_ids().len(), 1);
    }
}
