//! Plot locations on the neighborhood map image.
//!
//! Coordinates are percentages of the map image (x from the left, y from
//! the top), so they survive the image being re-rendered at any size.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::memory::Record;

/// A marked plot on the map, optionally tied to a family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotLocation {
    pub id: String,
    pub address: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlotLocation {
    /// Create a plot with clamped coordinates and a fresh id.
    pub fn new(address: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: format!("plot-{}", Uuid::new_v4()),
            address: address.into(),
            x: clamp_percent(x),
            y: clamp_percent(y),
            family_id: None,
            notes: None,
        }
    }

    /// Move the plot, clamping into the 0..=100 percent range.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = clamp_percent(x);
        self.y = clamp_percent(y);
    }
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

impl Record for PlotLocation {
    fn record_id(&self) -> &str {
        &self.id
    }
}
