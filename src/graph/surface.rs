use std::collections::HashMap;

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2};

use super::node::NodeId;
use crate::util::normalize_keyword;

/// Contract the diagram needs from a drawing target: three primitives, text
/// measurement and a uniform pan offset.
pub trait DrawingSurface {
    /// Pan offset applied uniformly to every drawn coordinate.
    fn pan(&self) -> Vec2;

    fn fill_ellipse(&mut self, center: Pos2, size: Vec2, fill: Color32, stroke: Stroke);

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    fn text(&mut self, center: Pos2, text: &str, font_size: f32, color: Color32);

    fn measure_text(&self, text: &str, font_size: f32) -> Vec2;
}

pub const BASE_FONT_SIZE: f32 = 12.0;
pub const FONT_WEIGHT_MULTIPLIER: f32 = 16.0;

/// Relevance context threaded into `Diagram::draw` for label sizing; a label
/// with no entry falls back to the base font size.
#[derive(Clone, Copy, Debug)]
pub struct LabelScale<'a> {
    relevance: &'a HashMap<String, f32>,
    min_relevance: f32,
}

impl<'a> LabelScale<'a> {
    pub fn new(relevance: &'a HashMap<String, f32>, min_relevance: f32) -> Self {
        Self {
            relevance,
            min_relevance,
        }
    }

    pub fn font_size(&self, label: &str) -> f32 {
        match self.relevance.get(&normalize_keyword(label)) {
            Some(&relevance) => {
                BASE_FONT_SIZE + ((relevance - self.min_relevance) * FONT_WEIGHT_MULTIPLIER)
            }
            None => BASE_FONT_SIZE,
        }
    }
}

/// Final screen bounds of one drawn label, for the renderer's hit map.
#[derive(Clone, Debug)]
pub struct DrawnLabel {
    pub id: NodeId,
    pub bounds: Rect,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records draw calls in order; text measures as a fixed box per char.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) pan: Vec2,
        pub(crate) ops: Vec<SurfaceOp>,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum SurfaceOp {
        Ellipse { center: Pos2 },
        Line { from: Pos2, to: Pos2 },
        Text { center: Pos2, text: String, font_size: f32 },
    }

    impl DrawingSurface for RecordingSurface {
        fn pan(&self) -> Vec2 {
            self.pan
        }

        fn fill_ellipse(&mut self, center: Pos2, _size: Vec2, _fill: Color32, _stroke: Stroke) {
            self.ops.push(SurfaceOp::Ellipse { center });
        }

        fn line(&mut self, from: Pos2, to: Pos2, _stroke: Stroke) {
            self.ops.push(SurfaceOp::Line { from, to });
        }

        fn text(&mut self, center: Pos2, text: &str, font_size: f32, _color: Color32) {
            self.ops.push(SurfaceOp::Text {
                center,
                text: text.to_string(),
                font_size,
            });
        }

        fn measure_text(&self, text: &str, font_size: f32) -> Vec2 {
            Vec2::new(text.chars().count() as f32 * font_size * 0.6, font_size * 1.2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_scales_with_relevance_above_the_minimum() {
        let mut relevance = HashMap::new();
        relevance.insert("fox".to_string(), 0.9_f32);
        relevance.insert("quick".to_string(), 0.4_f32);
        let scale = LabelScale::new(&relevance, 0.4);

        assert_eq!(scale.font_size("quick"), BASE_FONT_SIZE);
        let expected = BASE_FONT_SIZE + (0.5 * FONT_WEIGHT_MULTIPLIER);
        assert!((scale.font_size("Fox") - expected).abs() < 1e-4);
    }

    #[test]
    fn unknown_labels_fall_back_to_the_base_size() {
        let relevance = HashMap::new();
        let scale = LabelScale::new(&relevance, 0.0);
        assert_eq!(scale.font_size("unseen"), BASE_FONT_SIZE);
    }
}
