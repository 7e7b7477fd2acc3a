use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::graph::{Diagram, DrawnLabel, RelationshipGraphBuilder};
use crate::nlp::{self, KeywordAnalysis};
use crate::util::normalize_keyword;

mod canvas;
mod keywords;
mod sentences;

pub struct LexigraphApp {
    text_path: PathBuf,
    cache_dir: PathBuf,
    state: AppState,
    reload_rx: Option<Receiver<Result<KeywordAnalysis, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<KeywordAnalysis, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewMode {
    Relationships,
    Neighbors,
}

struct ViewModel {
    analysis: KeywordAnalysis,
    builder: RelationshipGraphBuilder,
    diagram: Diagram,
    /// Normalized text of the selected keyword.
    selected: Option<String>,
    search: String,
    view_mode: ViewMode,
    pan: Vec2,
    zoom: f32,
    /// Sentences shown in the sentence panel; graph seeds come from these.
    displayed_sentences: Vec<usize>,
    current_sentence: Option<usize>,
    /// Label bounds from the last graph draw, used for pointer hit-testing.
    label_hits: Vec<DrawnLabel>,
}

impl LexigraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, text_path: PathBuf, cache_dir: PathBuf) -> Self {
        let state = Self::start_load(text_path.clone(), cache_dir.clone());
        Self {
            text_path,
            cache_dir,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(
        text_path: PathBuf,
        cache_dir: PathBuf,
    ) -> Receiver<Result<KeywordAnalysis, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                nlp::load_or_analyze(&text_path, &cache_dir).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(text_path: PathBuf, cache_dir: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(text_path, cache_dir),
        }
    }
}

impl eframe::App for LexigraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(analysis) => AppState::Ready(Box::new(ViewModel::new(analysis))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Analyzing text...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to analyze text");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition =
                            Some(Self::start_load(self.text_path.clone(), self.cache_dir.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reanalyze_requested = false;
                let is_loading = self.reload_rx.is_some();
                model.show(ctx, &mut reanalyze_requested, is_loading);

                if reanalyze_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        self.text_path.clone(),
                        self.cache_dir.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(analysis) => AppState::Ready(Box::new(ViewModel::new(analysis))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background analysis worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(analysis: KeywordAnalysis) -> Self {
        Self {
            analysis,
            builder: RelationshipGraphBuilder::default(),
            diagram: Diagram::new(),
            selected: None,
            search: String::new(),
            view_mode: ViewMode::Relationships,
            pan: Vec2::ZERO,
            zoom: 1.0,
            displayed_sentences: Vec::new(),
            current_sentence: None,
            label_hits: Vec::new(),
        }
    }

    fn show(&mut self, ctx: &Context, reanalyze_requested: &mut bool, is_loading: bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("lexigraph");
                    ui.separator();
                    ui.label(format!("source: {}", self.analysis.source_name));
                    ui.label(format!("sentences: {}", self.analysis.sentence_count()));
                    ui.label(format!("keywords: {}", self.analysis.keyword_count()));

                    let reanalyze_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reanalyze"));
                    if reanalyze_button.clicked() {
                        *reanalyze_requested = true;
                    }

                    ui.separator();
                    ui.selectable_value(
                        &mut self.view_mode,
                        ViewMode::Relationships,
                        "Relationships",
                    );
                    ui.selectable_value(&mut self.view_mode, ViewMode::Neighbors, "Neighbors");

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Clear graph").clicked() {
                            self.diagram.clear();
                            self.selected = None;
                            self.displayed_sentences.clear();
                            self.current_sentence = None;
                            self.label_hits.clear();
                        }
                        if ui.button("Re-arrange").clicked() {
                            self.diagram.arrange();
                        }
                    });
                });
            });

        egui::SidePanel::left("keywords")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_keyword_panel(ui));

        egui::SidePanel::right("sentences")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_sentence_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));
    }

    /// Re-roots the view on a keyword: the sentence panel lists every
    /// sentence containing it and the graph is rebuilt from those sentences.
    fn select_keyword(&mut self, keyword: &str) {
        let key = normalize_keyword(keyword);
        self.displayed_sentences = self.analysis.sentences_containing(&key);
        self.current_sentence = self.displayed_sentences.first().copied();
        self.selected = Some(key);
        self.pan = Vec2::ZERO;
        self.rebuild_graph();
    }

    fn show_sentence(&mut self, sentence: usize) {
        self.displayed_sentences = vec![sentence];
        self.current_sentence = Some(sentence);
        self.rebuild_graph();
    }

    fn rebuild_graph(&mut self) {
        let seeds = self.analysis.occurrences_in(&self.displayed_sentences);
        let root_label = match self.current_sentence {
            Some(sentence) => self.analysis.summary_of(sentence),
            None => self.analysis.source_name.clone(),
        };
        self.builder
            .build(&mut self.diagram, &root_label, &seeds, &self.analysis.index);
        self.label_hits.clear();
    }
}
