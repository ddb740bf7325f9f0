//! Chart Plotter Module
//! Draws the collision views with egui_plot: point and density maps, the
//! per-minute bar chart and the ranking tables.

use crate::data::{Centroid, GeoPoint, MinuteBin, RawRow, StreetRanking, VictimCategory};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot, PlotBounds, PlotPoints, Points};
use std::collections::HashMap;

/// Scatter fill, red with some transparency.
pub const POINT_COLOR: Color32 = Color32::from_rgba_premultiplied(126, 0, 0, 140);
pub const BAR_COLOR: Color32 = Color32::from_rgb(100, 149, 237);

/// Density colour ramp, sparse to dense.
pub const DENSITY_RAMP: [Color32; 6] = [
    Color32::from_rgb(1, 152, 189),
    Color32::from_rgb(73, 227, 206),
    Color32::from_rgb(216, 254, 181),
    Color32::from_rgb(254, 237, 177),
    Color32::from_rgb(254, 173, 84),
    Color32::from_rgb(209, 55, 78),
];

/// Zoom of the injury scatter map.
pub const INJURY_MAP_ZOOM: u8 = 9;
/// Zoom of the hourly density map.
pub const DENSITY_MAP_ZOOM: u8 = 11;

/// Side of a density cell in degrees, roughly 100 m at city latitudes.
pub const DENSITY_CELL_DEGREES: f64 = 0.001;

const MAP_HEIGHT: f32 = 420.0;
const HISTOGRAM_HEIGHT: f32 = 300.0;

/// Initial view of a map: where it is centred and how far it is zoomed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub centroid: Centroid,
    /// Web-map style zoom level; each step halves the visible span.
    pub zoom: u8,
}

impl MapViewport {
    /// Plot bounds as `(min [lon, lat], max [lon, lat])`.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let half_lon = 180.0 / 2f64.powi(i32::from(self.zoom));
        let half_lat = half_lon * self.centroid.latitude.to_radians().cos();
        (
            [
                self.centroid.longitude - half_lon,
                self.centroid.latitude - half_lat,
            ],
            [
                self.centroid.longitude + half_lon,
                self.centroid.latitude + half_lat,
            ],
        )
    }
}

/// Aggregated collisions in one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityCell {
    pub longitude: f64,
    pub latitude: f64,
    pub count: usize,
}

/// Draws collision views using egui_plot.
pub struct CollisionPlotter;

impl CollisionPlotter {
    /// Bin points into square cells of `cell_degrees`, returning cell centres
    /// sorted by ascending count so dense cells draw last.
    pub fn density_cells(points: &[GeoPoint], cell_degrees: f64) -> Vec<DensityCell> {
        let mut bins: HashMap<(i64, i64), usize> = HashMap::new();
        for p in points {
            let key = (
                (p.longitude / cell_degrees).floor() as i64,
                (p.latitude / cell_degrees).floor() as i64,
            );
            *bins.entry(key).or_default() += 1;
        }

        let mut cells: Vec<DensityCell> = bins
            .into_iter()
            .map(|((x, y), count)| DensityCell {
                longitude: (x as f64 + 0.5) * cell_degrees,
                latitude: (y as f64 + 0.5) * cell_degrees,
                count,
            })
            .collect();
        cells.sort_by(|a, b| {
            a.count
                .cmp(&b.count)
                .then(a.longitude.total_cmp(&b.longitude))
                .then(a.latitude.total_cmp(&b.latitude))
        });
        cells
    }

    /// Pick a ramp colour for `count` relative to the densest cell.
    pub fn density_color(count: usize, max_count: usize) -> Color32 {
        if max_count == 0 {
            return DENSITY_RAMP[0];
        }
        let frac = count as f64 / max_count as f64;
        let idx = (frac * (DENSITY_RAMP.len() - 1) as f64).round() as usize;
        DENSITY_RAMP[idx.min(DENSITY_RAMP.len() - 1)]
    }

    /// Scatter map of individual collisions.
    ///
    /// The viewport is applied only when `reset_view` is set, leaving the
    /// user free to pan and zoom between parameter changes.
    pub fn draw_scatter_map(
        ui: &mut egui::Ui,
        id: &str,
        points: &[GeoPoint],
        viewport: Option<MapViewport>,
        reset_view: bool,
    ) {
        let coords: Vec<[f64; 2]> = points.iter().map(|p| [p.longitude, p.latitude]).collect();

        Self::map_plot(id).show(ui, |plot_ui| {
            if let (true, Some(vp)) = (reset_view, viewport) {
                let (min, max) = vp.bounds();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .radius(2.5)
                    .color(POINT_COLOR),
            );
        });
    }

    /// Gridded density map; larger, warmer markers mean more collisions.
    pub fn draw_density_map(
        ui: &mut egui::Ui,
        id: &str,
        points: &[GeoPoint],
        viewport: Option<MapViewport>,
        reset_view: bool,
    ) {
        let cells = Self::density_cells(points, DENSITY_CELL_DEGREES);
        let max_count = cells.last().map(|c| c.count).unwrap_or(0);

        Self::map_plot(id).show(ui, |plot_ui| {
            if let (true, Some(vp)) = (reset_view, viewport) {
                let (min, max) = vp.bounds();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }
            for cell in &cells {
                let radius = 2.0 + (cell.count as f32).sqrt() * 2.0;
                plot_ui.points(
                    Points::new(vec![[cell.longitude, cell.latitude]])
                        .radius(radius)
                        .color(Self::density_color(cell.count, max_count)),
                );
            }
        });
    }

    fn map_plot(id: &str) -> Plot {
        Plot::new(id.to_string())
            .height(MAP_HEIGHT)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .allow_scroll(false)
            .show_grid(false)
    }

    /// Bar chart of crashes per minute.
    pub fn draw_minute_histogram(ui: &mut egui::Ui, bins: &[MinuteBin]) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new(f64::from(bin.minute), bin.count as f64)
                    .width(0.8)
                    .name(format!("minute {}: {} crashes", bin.minute, bin.count))
            })
            .collect();

        Plot::new("minute_histogram")
            .height(HISTOGRAM_HEIGHT)
            .x_axis_label("minute")
            .y_axis_label("crashes")
            .allow_scroll(false)
            .include_x(-1.0)
            .include_x(60.0)
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
            });
    }

    /// Ranked table of the most dangerous streets.
    pub fn draw_street_table(ui: &mut egui::Ui, streets: &[StreetRanking], category: VictimCategory) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("street_ranking")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong().size(12.0));
                        ui.label(RichText::new("On street name").strong().size(12.0));
                        ui.label(
                            RichText::new(format!("{} injured", category))
                                .strong()
                                .size(12.0),
                        );
                        ui.end_row();

                        for (rank, street) in streets.iter().enumerate() {
                            ui.label(RichText::new((rank + 1).to_string()).size(12.0));
                            ui.label(RichText::new(&street.street_name).size(12.0));
                            ui.label(RichText::new(street.injured_count.to_string()).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }

    /// Raw rows of the hour view.
    pub fn draw_raw_table(ui: &mut egui::Ui, rows: &[RawRow]) {
        egui::ScrollArea::both().max_height(300.0).show(ui, |ui| {
            egui::Grid::new("raw_rows")
                .striped(true)
                .spacing([12.0, 2.0])
                .show(ui, |ui| {
                    for header in [
                        "accident date",
                        "accident time",
                        "latitude",
                        "longitude",
                        "persons injured",
                        "on street name",
                    ] {
                        ui.label(RichText::new(header).strong().size(11.0));
                    }
                    ui.end_row();

                    for row in rows {
                        ui.label(Self::or_dash(row.date.map(|d| d.format("%m/%d/%Y").to_string())));
                        ui.label(Self::or_dash(row.time.map(|t| t.format("%H:%M").to_string())));
                        ui.label(format!("{:.5}", row.latitude));
                        ui.label(format!("{:.5}", row.longitude));
                        ui.label(Self::or_dash(row.persons_injured.map(|n| n.to_string())));
                        ui.label(Self::or_dash(row.street_name.clone()));
                        ui.end_row();
                    }
                });
        });
    }

    fn or_dash(value: Option<String>) -> String {
        value.unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint {
            date: None,
            time: None,
            latitude,
            longitude,
        }
    }

    #[test]
    fn density_cells_group_nearby_points() {
        let points = vec![
            point(40.70001, -73.99999),
            point(40.70002, -73.99998),
            point(40.75001, -73.95001),
        ];
        let cells = CollisionPlotter::density_cells(&points, DENSITY_CELL_DEGREES);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells.iter().map(|c| c.count).sum::<usize>(), 3);
        // Densest cell sorts last.
        assert_eq!(cells.last().unwrap().count, 2);
    }

    #[test]
    fn density_cells_of_empty_set() {
        assert!(CollisionPlotter::density_cells(&[], DENSITY_CELL_DEGREES).is_empty());
    }

    #[test]
    fn density_color_spans_ramp() {
        assert_eq!(CollisionPlotter::density_color(0, 10), DENSITY_RAMP[0]);
        assert_eq!(CollisionPlotter::density_color(10, 10), DENSITY_RAMP[5]);
        assert_eq!(CollisionPlotter::density_color(3, 0), DENSITY_RAMP[0]);
    }

    #[test]
    fn viewport_bounds_shrink_with_zoom() {
        let centroid = Centroid {
            latitude: 40.7,
            longitude: -74.0,
        };
        let wide = MapViewport { centroid, zoom: 9 }.bounds();
        let close = MapViewport { centroid, zoom: 11 }.bounds();

        let wide_span = wide.1[0] - wide.0[0];
        let close_span = close.1[0] - close.0[0];
        assert!((wide_span / close_span - 4.0).abs() < 1e-9);

        // Centred on the centroid.
        assert!(((wide.0[0] + wide.1[0]) / 2.0 - -74.0).abs() < 1e-9);
        assert!(((wide.0[1] + wide.1[1]) / 2.0 - 40.7).abs() < 1e-9);
    }
}
