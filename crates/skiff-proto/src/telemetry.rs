use serde::{Deserialize, Serialize};

/// One `telemetry` push. Every section is optional; the vessel sends `null`
/// for sensors it could not read this cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    #[serde(default)]
    pub gps: Option<GpsReading>,
    #[serde(default)]
    pub imu: Option<ImuReading>,
    #[serde(default)]
    pub battery: Option<BatteryReading>,
    #[serde(default)]
    pub system: Option<SystemReading>,
    #[serde(default)]
    pub servos: Option<ServoAngles>,
}

impl TelemetryFrame {
    pub fn is_empty(&self) -> bool {
        self.gps.is_none()
            && self.imu.is_none()
            && self.battery.is_none()
            && self.system.is_none()
            && self.servos.is_none()
    }
}

/// Without a fix the vessel only reports `{fix: false}` (sometimes with satellites).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsReading {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
    #[serde(default)]
    pub satellites: Option<u32>,
    #[serde(default)]
    pub fix: bool,
}

impl GpsReading {
    pub fn position(&self) -> Option<LatLon> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(LatLon { lat, lon }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuReading {
    pub accel: Vec3,
    pub gyro: Vec3,
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    pub voltage: f64,
    pub percentage: f64,
    /// Free-form label from the vessel: Good | Fair | Low | Critical.
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemReading {
    #[serde(default)]
    pub cpu_temp: Option<f64>,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub uptime: String,
}

/// Pan/tilt position in degrees. Also the payload of `servo_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServoAngles {
    pub pan_angle: f64,
    pub tilt_angle: f64,
}
