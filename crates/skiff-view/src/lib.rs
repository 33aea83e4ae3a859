//! Projection of vessel telemetry onto host-provided rendering surfaces, and
//! the sample-log client.

pub mod attitude;
pub mod battery;
pub mod doctor;
pub mod projector;
pub mod samples;
pub mod station;
pub mod surface;
pub mod track;

#[cfg(test)]
mod fakes;

use serde::Deserialize;

pub use attitude::Attitude;
pub use battery::BatteryTier;
pub use projector::Projector;
pub use samples::{SampleRegistry, SamplesConfig};
pub use station::Station;
pub use surface::{Field, FieldSink, MapSurface, Notifier, SceneSurface};
pub use track::Track;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Zoom used when the map centers on the boat.
    pub follow_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { follow_zoom: 15 }
    }
}
