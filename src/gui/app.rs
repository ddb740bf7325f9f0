//! Collision Dashboard Main Application
//! Main window with control panel and dashboard viewer.

use crate::data::{DashboardViews, Dataset, DatasetLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete { row_limit: usize, dataset: Dataset },
    Error(String),
}

/// Main application window.
pub struct CollisionApp {
    loader: DatasetLoader,
    dataset: Option<Arc<Dataset>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl CollisionApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, csv_path: PathBuf, row_limit: usize) -> Self {
        let mut app = Self {
            loader: DatasetLoader::new(csv_path.clone()),
            dataset: None,
            control_panel: ControlPanel::new(csv_path, row_limit),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.request_dataset();
        app
    }

    /// Use the memoized dataset for the current row limit, or read it on a
    /// background thread.
    fn request_dataset(&mut self) {
        if self.is_loading {
            return;
        }

        let row_limit = self.control_panel.settings.row_limit;
        if let Some(dataset) = self.loader.cached(row_limit) {
            self.set_dataset(dataset);
            return;
        }

        self.control_panel.set_status("Reading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let path = self.loader.source().to_path_buf();

        thread::spawn(move || {
            let result = match DatasetLoader::read(&path, row_limit) {
                Ok(dataset) => LoadResult::Complete { row_limit, dataset },
                Err(e) => {
                    log::error!("Failed to load {}: {}", path.display(), e);
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            log::info!("Switching data source to {}", path.display());
            self.chart_viewer.clear();
            self.dataset = None;
            self.loader = DatasetLoader::new(path.clone());
            self.control_panel.settings.csv_path = path;
            self.request_dataset();
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { row_limit, dataset }) => {
                self.is_loading = false;
                let dataset = self.loader.insert(row_limit, dataset);
                if row_limit == self.control_panel.settings.row_limit {
                    self.set_dataset(dataset);
                } else {
                    // The limit changed while reading; fetch the current one.
                    self.request_dataset();
                }
            }
            Ok(LoadResult::Error(error)) => {
                self.is_loading = false;
                self.dataset = None;
                self.control_panel.set_error(&format!("Error: {}", error));
                self.chart_viewer.set_load_error(error);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_loading = false;
                self.control_panel.set_error("Error: loader thread stopped");
            }
        }
    }

    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        if dataset.is_empty() {
            self.control_panel.set_error(&format!(
                "No rows with coordinates among {} read",
                dataset.rows_read()
            ));
        } else {
            self.control_panel.set_status(&format!(
                "Loaded {} of {} rows",
                dataset.height(),
                dataset.rows_read()
            ));
        }
        self.dataset = Some(dataset);
        self.recompute_views();
    }

    /// Recompute every view from the base dataset.
    fn recompute_views(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let params = self.control_panel.settings.view_params();
        self.chart_viewer
            .set_views(DashboardViews::compute(dataset, params));
    }
}

impl eframe::App for CollisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, self.is_loading) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.request_dataset(),
                        ControlPanelAction::ParametersChanged => self.recompute_views(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.is_loading);
        });
    }
}
