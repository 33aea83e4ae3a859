use skiff_proto::{BatteryReading, GpsReading, ImuReading, ServoAngles, SystemReading, TelemetryFrame};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

use crate::attitude::{degrees_label, Attitude};
use crate::battery::{status_class, BatteryTier};
use crate::surface::{Field, FieldSink, MapSurface, SceneSurface};
use crate::track::Track;

/// Routes telemetry onto the rendering surfaces. Holds no protocol state; the
/// only thing it owns is the track, which it alone appends to.
pub struct Projector {
    fields: Arc<dyn FieldSink>,
    map: Arc<dyn MapSurface>,
    scene: Arc<dyn SceneSurface>,
    track: Track,
    follow_zoom: u8,
}

fn or_dash<T: Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".into())
}

impl Projector {
    pub fn new(
        fields: Arc<dyn FieldSink>,
        map: Arc<dyn MapSurface>,
        scene: Arc<dyn SceneSurface>,
        follow_zoom: u8,
    ) -> Self {
        Self { fields, map, scene, track: Track::default(), follow_zoom }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn connectivity(&self, up: bool) {
        let label = if up { "Connected" } else { "Disconnected" };
        self.fields.render(Field::ConnectionStatus, label);
    }

    /// Renders every section present; absent sections keep what they showed.
    pub fn telemetry(&mut self, t: &TelemetryFrame) {
        if t.is_empty() {
            debug!("view: empty telemetry push");
            return;
        }
        if let Some(gps) = &t.gps {
            self.gps(gps);
        }
        if let Some(imu) = &t.imu {
            self.imu(imu);
        }
        if let Some(b) = &t.battery {
            self.battery(b);
        }
        if let Some(s) = &t.system {
            self.system(s);
        }
        if let Some(s) = &t.servos {
            self.servo_status(s);
        }
    }

    fn gps(&mut self, g: &GpsReading) {
        let text = format!(
            "Lat: {}\nLon: {}\nAlt: {}m\nSats: {}",
            or_dash(g.lat),
            or_dash(g.lon),
            or_dash(g.alt),
            or_dash(g.satellites)
        );
        self.fields.render(Field::GpsData, &text);
        self.fields.render(Field::GpsStatus, if g.fix { "GPS Fix" } else { "No Fix" });

        let Some(p) = g.position() else { return };
        self.map.move_marker(p);
        let first = self.track.push(p);
        self.map.draw_path(self.track.points());
        if first {
            debug!("view: first fix, centering map on {:.6},{:.6}", p.lat, p.lon);
            self.map.set_view(p, self.follow_zoom);
        }
    }

    fn imu(&self, imu: &ImuReading) {
        let (a, g) = (&imu.accel, &imu.gyro);
        let text = format!(
            "Accel: X{} Y{} Z{}\nGyro: X{} Y{} Z{}\nTemp: {}°C",
            a.x, a.y, a.z, g.x, g.y, g.z, imu.temp
        );
        self.fields.render(Field::ImuData, &text);

        let att = Attitude::from_accel(a);
        self.scene.set_rotation(att);
        self.fields.render(Field::Heading, &att.heading_label());
    }

    fn battery(&self, b: &BatteryReading) {
        let text = format!("Voltage: {}V\nLevel: {}%\nStatus: {}", b.voltage, b.percentage, b.status);
        self.fields.render(Field::BatteryData, &text);
        self.fields.render(Field::BatteryLevel, &format!("Battery: {}%", b.percentage));
        self.fields.render(Field::BatteryIcon, BatteryTier::from_percentage(b.percentage).icon_class());
        self.fields.render(Field::BatteryClass, &status_class(&b.status));
    }

    fn system(&self, s: &SystemReading) {
        let text = format!(
            "CPU Temp: {}°C\nCPU Usage: {}%\nMemory: {}%\nDisk: {}%\nUptime: {}",
            s.cpu_temp.map(|t| t.to_string()).unwrap_or_else(|| "N/A".into()),
            s.cpu_usage,
            s.memory_usage,
            s.disk_usage,
            s.uptime
        );
        self.fields.render(Field::SystemData, &text);
    }

    pub fn servo_status(&self, s: &ServoAngles) {
        self.fields.render(Field::PanAngle, &degrees_label(s.pan_angle));
        self.fields.render(Field::TiltAngle, &degrees_label(s.tilt_angle));
    }

    pub fn video(&self, uri: &str) {
        self.fields.render(Field::VideoFeed, uri);
    }

    /// Re-centers the map on the latest position. False when nothing was received yet.
    pub fn center_on_boat(&self) -> bool {
        match self.track.last() {
            Some(p) => {
                self.map.set_view(p, self.follow_zoom);
                true
            }
            None => false,
        }
    }
}
