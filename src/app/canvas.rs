use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2, pos2, vec2,
};

use crate::graph::{DrawingSurface, LabelScale};
use crate::util::normalize_keyword;

use super::{ViewMode, ViewModel};

const ADJACENT_COLUMN_OFFSET: f32 = 200.0;
const ADJACENT_ROW_PITCH: f32 = 50.0;
const MAX_ADJACENT: usize = 12;

/// Adapter from the diagram's drawing-surface contract onto an egui painter.
struct PainterSurface<'a> {
    painter: &'a Painter,
    pan: Vec2,
}

impl DrawingSurface for PainterSurface<'_> {
    fn pan(&self) -> Vec2 {
        self.pan
    }

    fn fill_ellipse(&mut self, center: Pos2, size: Vec2, fill: Color32, stroke: Stroke) {
        let radius = size.max_elem() / 2.0;
        self.painter.circle_filled(center, radius, fill);
        self.painter.circle_stroke(center, radius, stroke);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment([from, to], stroke);
    }

    fn text(&mut self, center: Pos2, text: &str, font_size: f32, color: Color32) {
        self.painter.text(
            center,
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(font_size),
            color,
        );
    }

    fn measure_text(&self, text: &str, font_size: f32) -> Vec2 {
        self.painter
            .layout_no_wrap(
                text.to_owned(),
                FontId::proportional(font_size),
                Color32::WHITE,
            )
            .size()
    }
}

fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

impl ViewModel {
    fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = (pointer - rect.center() - self.pan) / self.zoom;

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_zoom(ui, rect, &response);
        self.handle_pan(&response);

        match self.view_mode {
            ViewMode::Relationships => self.draw_relationships(ui, rect, &painter, &response),
            ViewMode::Neighbors => self.draw_neighbors(ui, rect, &painter, &response),
        }
    }

    fn draw_relationships(
        &mut self,
        ui: &Ui,
        rect: Rect,
        painter: &Painter,
        response: &egui::Response,
    ) {
        if self.diagram.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Select a keyword to build the relationship graph.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return;
        }

        let labels = LabelScale::new(&self.analysis.relevance, self.analysis.min_relevance);
        let mut surface = PainterSurface {
            painter,
            pan: self.pan,
        };
        self.label_hits = self.diagram.draw(&mut surface, rect, self.zoom, &labels);

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered_keyword = pointer.and_then(|position| {
            self.label_hits
                .iter()
                .rev()
                .find(|label| label.bounds.contains(position))
                .and_then(|label| self.diagram.node(label.id))
                .and_then(|node| node.label_text())
                .filter(|text| self.analysis.relevance_of(text).is_some())
                .map(str::to_owned)
        });

        if let Some(keyword) = &hovered_keyword {
            ui.ctx().output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let key = normalize_keyword(keyword);
            let status = format!(
                "{}  |  relevance {:.3}  |  {} sentences",
                keyword,
                self.analysis.relevance_of(&key).unwrap_or(0.0),
                self.analysis.sentences_containing(&key).len()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(keyword) = hovered_keyword
        {
            self.select_keyword(&keyword);
        }
    }

    /// Star view: the selected keyword centered, with the keywords that
    /// precede it in the displayed sentences fanned out to the left and the
    /// ones that follow it to the right.
    fn draw_neighbors(
        &mut self,
        ui: &Ui,
        rect: Rect,
        painter: &Painter,
        response: &egui::Response,
    ) {
        let Some(selected) = self.selected.clone() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Select a keyword to see its sentence neighbors.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return;
        };

        let (previous, next) = self.adjacent_keywords(&selected);
        let labels = LabelScale::new(&self.analysis.relevance, self.analysis.min_relevance);
        let center = rect.center() + self.pan;
        let column_offset = ADJACENT_COLUMN_OFFSET * self.zoom;
        let row_pitch = ADJACENT_ROW_PITCH * self.zoom;

        let mut keyword_bounds = Vec::new();
        for (keywords, side) in [(&previous, -1.0_f32), (&next, 1.0_f32)] {
            let count = keywords.len();
            if count == 0 {
                continue;
            }

            let mut y = center.y - (row_pitch * (count / 2) as f32);
            if count % 2 == 0 {
                y -= row_pitch / 2.0;
            }

            for keyword in keywords {
                let edge = pos2(center.x + (side * column_offset), y);
                painter.line_segment(
                    [edge, center],
                    Stroke::new(1.0, Color32::from_rgb(92, 156, 228)),
                );
                let bounds = painter.text(
                    edge,
                    Align2::CENTER_CENTER,
                    keyword,
                    FontId::proportional(labels.font_size(keyword)),
                    Color32::WHITE,
                );
                keyword_bounds.push((keyword.clone(), bounds));
                y += row_pitch;
            }
        }

        painter.text(
            center,
            Align2::CENTER_CENTER,
            &selected,
            FontId::proportional(labels.font_size(&selected)),
            Color32::WHITE,
        );

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|position| {
            keyword_bounds
                .iter()
                .find(|(_, bounds)| bounds.contains(position))
                .map(|(keyword, _)| keyword.clone())
        });

        if hovered.is_some() {
            ui.ctx().output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(keyword) = hovered
        {
            self.select_keyword(&keyword);
        }
    }

    /// Keywords appearing before/after the selected keyword within the
    /// displayed sentences, deduplicated in encounter order.
    fn adjacent_keywords(&self, selected: &str) -> (Vec<String>, Vec<String>) {
        let mut previous = Vec::new();
        let mut next = Vec::new();

        for &sentence in &self.displayed_sentences {
            let keywords = self.analysis.index.keywords_in_sentence(sentence);
            let Some(position) = keywords
                .iter()
                .position(|keyword| normalize_keyword(keyword) == selected)
            else {
                continue;
            };

            for keyword in &keywords[..position] {
                if previous.len() < MAX_ADJACENT && !previous.contains(keyword) {
                    previous.push(keyword.clone());
                }
            }
            for keyword in &keywords[position + 1..] {
                if next.len() < MAX_ADJACENT && !next.contains(keyword) {
                    next.push(keyword.clone());
                }
            }
        }

        (previous, next)
    }
}
