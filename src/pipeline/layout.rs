//! Layout planning: where the text box and image go on each slide.
//!
//! Every slide currently shares one layout taken from
//! [`LayoutConfig`]. The planner still takes the sentence index so a
//! per-slide layout can be introduced without touching the builder.

use crate::config::LayoutConfig;
use crate::operation::Placement;
use serde::Serialize;

/// Geometry of the two elements on one slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlideLayout {
    pub text_box: Placement,
    pub image: Placement,
}

/// Computes [`SlideLayout`]s. Pure: the same index always yields the same
/// geometry.
#[derive(Debug, Clone, Copy)]
pub struct LayoutPlanner {
    config: LayoutConfig,
}

impl LayoutPlanner {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn plan_layout(&self, _sentence_index: usize) -> SlideLayout {
        SlideLayout {
            text_box: self.config.text_box,
            image: self.config.image,
        }
    }
}

impl Default for LayoutPlanner {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
