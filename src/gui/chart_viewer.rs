//! Dashboard Viewer Widget
//! Central scrollable panel showing the maps, the minute chart and the
//! street ranking for the current parameters.

use crate::charts::{CollisionPlotter, MapViewport, DENSITY_MAP_ZOOM, INJURY_MAP_ZOOM};
use crate::data::{Centroid, DashboardViews, QueryError};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;

/// Scrollable dashboard display area.
#[derive(Default)]
pub struct ChartViewer {
    views: Option<DashboardViews>,
    load_error: Option<String>,
    injury_viewport: Option<MapViewport>,
    density_viewport: Option<MapViewport>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current views and viewports, e.g. before loading a new file.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_views(&mut self, views: DashboardViews) {
        self.load_error = None;
        self.views = Some(views);
    }

    pub fn set_load_error(&mut self, error: String) {
        self.views = None;
        self.load_error = Some(error);
    }

    /// Returns whether the map should jump to `target`, remembering it as
    /// the last applied viewport. An absent target never moves the map.
    fn take_viewport_change(last: &mut Option<MapViewport>, target: Option<MapViewport>) -> bool {
        match target {
            Some(vp) if *last != Some(vp) => {
                *last = Some(vp);
                true
            }
            _ => false,
        }
    }

    fn viewport(centroid: Option<Centroid>, zoom: u8) -> Option<MapViewport> {
        centroid.map(|centroid| MapViewport { centroid, zoom })
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui, loading: bool) {
        if let Some(error) = &self.load_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("⚠ Could not load collision data\n\n{}", error))
                        .size(18.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(views) = &self.views else {
            ui.centered_and_justified(|ui| {
                let text = if loading { "Loading data..." } else { "No Data" };
                ui.label(RichText::new(text).size(20.0));
            });
            return;
        };

        let params = views.params;
        let hour = params.hour.get();
        let next_hour = params.hour.next().get();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Motor Vehicle Collisions in New York City").size(24.0));
                ui.label("A dashboard for analyzing motor vehicle collisions.");
                ui.add_space(SECTION_SPACING);

                // ===== Injury map =====
                ui.heading("Where are the most people injured?");
                match &views.injuries {
                    Ok(view) => {
                        ui.label(format!(
                            "{} collisions with at least {} persons injured",
                            view.points.len(),
                            view.min_injured
                        ));
                        let target = Self::viewport(view.centroid, INJURY_MAP_ZOOM);
                        let reset = Self::take_viewport_change(&mut self.injury_viewport, target);
                        CollisionPlotter::draw_scatter_map(
                            ui,
                            "injury_map",
                            &view.points,
                            target,
                            reset,
                        );
                    }
                    Err(e) => Self::unavailable(ui, e),
                }
                ui.add_space(SECTION_SPACING);

                // ===== Hourly density map =====
                ui.heading("How many collisions occur during a given time of day?");
                ui.label(format!(
                    "Vehicle collisions between {}:00 and {}:00",
                    hour, next_hour
                ));
                match &views.hour {
                    Ok(view) if view.points.is_empty() => {
                        Self::empty(ui);
                    }
                    Ok(view) => {
                        let target = Self::viewport(view.centroid, DENSITY_MAP_ZOOM);
                        let reset = Self::take_viewport_change(&mut self.density_viewport, target);
                        CollisionPlotter::draw_density_map(
                            ui,
                            "density_map",
                            &view.points,
                            target,
                            reset,
                        );
                    }
                    Err(e) => Self::unavailable(ui, e),
                }
                ui.add_space(SECTION_SPACING);

                // ===== Minute breakdown =====
                ui.label(
                    RichText::new(format!(
                        "Breakdown by minute between {}:00 and {}:00",
                        hour, next_hour
                    ))
                    .size(16.0)
                    .strong(),
                );
                match &views.histogram {
                    Some(bins) => CollisionPlotter::draw_minute_histogram(ui, bins),
                    None => {
                        ui.label(RichText::new("Unavailable").color(Color32::GRAY));
                    }
                }
                ui.add_space(SECTION_SPACING);

                // ===== Street ranking =====
                ui.heading("Top 5 dangerous streets by affected type");
                match &views.streets {
                    Ok(streets) if streets.is_empty() => Self::empty(ui),
                    Ok(streets) => {
                        CollisionPlotter::draw_street_table(ui, streets, params.category)
                    }
                    Err(e) => Self::unavailable(ui, e),
                }

                // ===== Raw data =====
                if let Some(raw) = &views.raw {
                    ui.add_space(SECTION_SPACING);
                    ui.label(RichText::new("Raw Data").size(16.0).strong());
                    match raw {
                        Ok(rows) if rows.is_empty() => Self::empty(ui),
                        Ok(rows) => CollisionPlotter::draw_raw_table(ui, rows),
                        Err(e) => Self::unavailable(ui, e),
                    }
                }
            });
    }

    fn empty(ui: &mut egui::Ui) {
        ui.label(RichText::new("No collisions match").color(Color32::GRAY));
    }

    fn unavailable(ui: &mut egui::Ui, error: &QueryError) {
        ui.label(RichText::new(format!("Unavailable: {}", error)).color(Color32::GRAY));
    }
}
