//! Charts module - Map and chart drawing

mod plotter;

pub use plotter::{CollisionPlotter, MapViewport, DENSITY_MAP_ZOOM, INJURY_MAP_ZOOM};
