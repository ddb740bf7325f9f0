//! Control Panel Widget
//! Left side panel with the data source and the dashboard controls.

use crate::data::{Hour, VictimCategory, ViewParams, MAX_INJURED_SLIDER};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// Rows shown in the raw data table.
pub const RAW_ROW_LIMIT: usize = 200;

/// User settings for the dashboard
#[derive(Clone, Debug)]
pub struct UserSettings {
    pub csv_path: PathBuf,
    pub row_limit: usize,
    pub min_injured: u32,
    pub hour: Hour,
    pub category: VictimCategory,
    pub show_raw: bool,
}

impl UserSettings {
    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            min_injured: self.min_injured,
            hour: self.hour,
            category: self.category,
            raw_rows: self.show_raw.then_some(RAW_ROW_LIMIT),
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub status: String,
    pub is_error: bool,
    row_limit_text: String,
}

impl ControlPanel {
    pub fn new(csv_path: PathBuf, row_limit: usize) -> Self {
        Self {
            settings: UserSettings {
                csv_path,
                row_limit,
                min_injured: 0,
                hour: Hour::default(),
                category: VictimCategory::default(),
                show_raw: false,
            },
            status: "Ready".to_string(),
            is_error: false,
            row_limit_text: row_limit.to_string(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, loading: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚗 Collision Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self
                        .settings
                        .csv_path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(name).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!loading, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });

                ui.horizontal(|ui| {
                    ui.label("Row limit:");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.row_limit_text).desired_width(90.0),
                    );
                    if response.lost_focus() {
                        match self.row_limit_text.trim().parse::<usize>() {
                            Ok(limit) if limit != self.settings.row_limit => {
                                self.settings.row_limit = limit;
                                action = ControlPanelAction::Reload;
                            }
                            Ok(_) => {}
                            Err(_) => {
                                self.row_limit_text = self.settings.row_limit.to_string();
                            }
                        }
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("⚙️ Filters").size(14.0).strong());
        ui.add_space(8.0);

        ui.label("Number of persons injured in vehicle collisions");
        if ui
            .add(egui::Slider::new(
                &mut self.settings.min_injured,
                0..=MAX_INJURED_SLIDER,
            ))
            .changed()
        {
            action = ControlPanelAction::ParametersChanged;
        }

        ui.add_space(8.0);

        ui.label("Hour to look at");
        let mut hour = self.settings.hour.get();
        if ui.add(egui::Slider::new(&mut hour, 0..=23)).changed() {
            if let Ok(hour) = Hour::new(hour) {
                self.settings.hour = hour;
                action = ControlPanelAction::ParametersChanged;
            }
        }

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Affected type of people:");
            ComboBox::from_id_salt("victim_category")
                .selected_text(self.settings.category.to_string())
                .show_ui(ui, |ui| {
                    for category in VictimCategory::iter() {
                        if ui
                            .selectable_value(
                                &mut self.settings.category,
                                category,
                                category.to_string(),
                            )
                            .changed()
                        {
                            action = ControlPanelAction::ParametersChanged;
                        }
                    }
                });
        });

        ui.add_space(8.0);

        if ui
            .checkbox(&mut self.settings.show_raw, "Show Raw Data")
            .changed()
        {
            action = ControlPanelAction::ParametersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        if loading {
            ui.add(egui::Spinner::new());
        }

        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    ParametersChanged,
}
