use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::ViewModel;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(super) fn draw_keyword_panel(&mut self, ui: &mut Ui) {
        ui.heading(format!("Keywords: {}", self.analysis.keyword_count()));
        ui.add_space(4.0);
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("search keywords"));
        ui.add_space(6.0);
        ui.separator();

        let query = self.search.trim().to_owned();
        let matcher = SkimMatcherV2::default();
        let rows = self
            .analysis
            .keywords
            .iter()
            .filter(|row| {
                query.is_empty() || fuzzy_match_score(&matcher, &row.keyword, &query).is_some()
            })
            .map(|row| (row.keyword.clone(), row.relevance, row.count))
            .collect::<Vec<_>>();

        let mut pending_selection = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("keyword_rows")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui| {
                    ui.label(RichText::new("keyword").strong());
                    ui.label(RichText::new("relevance").strong());
                    ui.label(RichText::new("count").strong());
                    ui.end_row();

                    for (keyword, relevance, count) in &rows {
                        let is_selected = self.selected.as_deref() == Some(keyword.as_str());
                        if ui.selectable_label(is_selected, keyword).clicked() {
                            pending_selection = Some(keyword.clone());
                        }
                        ui.label(format!("{relevance:.3}"));
                        ui.label(format!("{count}"));
                        ui.end_row();
                    }
                });

            if rows.is_empty() {
                ui.add_space(8.0);
                ui.label("No keywords match the search.");
            }
        });

        if let Some(keyword) = pending_selection {
            self.select_keyword(&keyword);
        }
    }
}
