//! Rendering capabilities the client is given by its host (browser page,
//! terminal, test harness). None of them can fail: every field is assumed
//! to exist for the lifetime of the client.

use skiff_proto::{LatLon, Sample};

use crate::attitude::Attitude;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    ConnectionStatus,
    GpsData,
    GpsStatus,
    ImuData,
    Heading,
    BatteryData,
    BatteryLevel,
    BatteryIcon,
    BatteryClass,
    SystemData,
    PanAngle,
    TiltAngle,
    VideoFeed,
    SamplesList,
    TotalSamples,
    TodaySamples,
}

impl Field {
    /// Element id the browser dashboard uses for this field.
    pub fn id(self) -> &'static str {
        match self {
            Field::ConnectionStatus => "connection-status",
            Field::GpsData => "gps-data",
            Field::GpsStatus => "gps-status",
            Field::ImuData => "imu-data",
            Field::Heading => "heading-value",
            Field::BatteryData => "battery-data",
            Field::BatteryLevel => "battery-status",
            Field::BatteryIcon => "battery-icon",
            Field::BatteryClass => "battery-class",
            Field::SystemData => "system-data",
            Field::PanAngle => "pan-angle",
            Field::TiltAngle => "tilt-angle",
            Field::VideoFeed => "video-feed",
            Field::SamplesList => "samples-list",
            Field::TotalSamples => "total-samples",
            Field::TodaySamples => "today-samples",
        }
    }
}

pub trait FieldSink: Send + Sync {
    fn render(&self, field: Field, value: &str);
}

pub trait MapSurface: Send + Sync {
    fn move_marker(&self, at: LatLon);
    fn draw_path(&self, path: &[LatLon]);
    fn set_view(&self, center: LatLon, zoom: u8);
    fn clear_sample_markers(&self);
    fn add_sample_marker(&self, sample: &Sample);
}

pub trait SceneSurface: Send + Sync {
    fn set_rotation(&self, attitude: Attitude);
}

/// Transient banners (export confirmations).
pub trait Notifier: Send + Sync {
    fn show(&self, id: u64, text: &str);
    fn dismiss(&self, id: u64);
}
