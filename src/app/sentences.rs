use eframe::egui::text::LayoutJob;
use eframe::egui::{self, Color32, FontId, TextFormat, Ui};

use super::ViewModel;

const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(235, 80, 70);

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Segment {
    pub(super) text: String,
    pub(super) highlighted: bool,
}

/// Plain and highlighted runs around every case-insensitive occurrence of
/// `keyword`, keeping the sentence's own casing. The runs concatenate back
/// to the input.
pub(super) fn highlight_segments(sentence: &str, keyword: &str) -> Vec<Segment> {
    let needle: Vec<char> = keyword
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();
    if needle.is_empty() {
        return vec![Segment {
            text: sentence.to_string(),
            highlighted: false,
        }];
    }

    let master: Vec<char> = sentence.chars().collect();
    let lowered: Vec<char> = master
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let mut segments = Vec::new();
    let mut plain_start = 0usize;
    let mut cursor = 0usize;
    while cursor + needle.len() <= lowered.len() {
        if lowered[cursor..cursor + needle.len()] == needle[..] {
            if cursor > plain_start {
                segments.push(Segment {
                    text: master[plain_start..cursor].iter().collect(),
                    highlighted: false,
                });
            }
            segments.push(Segment {
                text: master[cursor..cursor + needle.len()].iter().collect(),
                highlighted: true,
            });
            cursor += needle.len();
            plain_start = cursor;
        } else {
            cursor += 1;
        }
    }
    if plain_start < master.len() {
        segments.push(Segment {
            text: master[plain_start..].iter().collect(),
            highlighted: false,
        });
    }

    segments
}

fn sentence_job(sentence: &str, keyword: Option<&str>) -> LayoutJob {
    let mut job = LayoutJob::default();
    let plain = TextFormat {
        font_id: FontId::proportional(13.0),
        color: Color32::from_gray(220),
        ..Default::default()
    };
    let highlighted = TextFormat {
        font_id: FontId::proportional(13.0),
        color: HIGHLIGHT_COLOR,
        ..Default::default()
    };

    match keyword {
        Some(keyword) => {
            for segment in highlight_segments(sentence, keyword) {
                let format = if segment.highlighted {
                    highlighted.clone()
                } else {
                    plain.clone()
                };
                job.append(&segment.text, 0.0, format);
            }
        }
        None => job.append(sentence, 0.0, plain),
    }
    job
}

impl ViewModel {
    pub(super) fn draw_sentence_panel(&mut self, ui: &mut Ui) {
        ui.heading("Sentences");
        ui.add_space(4.0);

        let sentence_count = self.analysis.sentence_count();
        let current = self.current_sentence;
        let mut navigate_to = None;
        ui.horizontal(|ui| {
            let has_previous = current.is_some_and(|index| index > 0);
            let has_next = current.is_some_and(|index| index + 1 < sentence_count);

            if ui
                .add_enabled(has_previous, egui::Button::new("< Previous"))
                .clicked()
                && let Some(index) = current
            {
                navigate_to = Some(index - 1);
            }
            if ui
                .add_enabled(has_next, egui::Button::new("Next >"))
                .clicked()
                && let Some(index) = current
            {
                navigate_to = Some(index + 1);
            }

            if let Some(index) = current {
                ui.label(format!("sentence {} of {sentence_count}", index + 1));
            }
        });
        ui.separator();

        if let Some(index) = navigate_to {
            self.show_sentence(index);
        }

        if self.displayed_sentences.is_empty() {
            ui.add_space(8.0);
            ui.label("Select a keyword to list the sentences it occurs in.");
            return;
        }

        let keyword = self.selected.clone();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for &index in &self.displayed_sentences {
                let Some(sentence) = self.analysis.sentences.get(index) else {
                    continue;
                };
                ui.label(sentence_job(sentence, keyword.as_deref()));
                ui.add_space(8.0);
            }
        });
    }
}
