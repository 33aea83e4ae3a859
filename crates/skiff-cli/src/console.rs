use anyhow::{bail, Context, Result};
use skiff_helm::{ControlSurface, Key};
use skiff_proto::{Direction, LatLon, MotorCommand, Sample};
use skiff_view::{Attitude, Field, FieldSink, MapSurface, Notifier, SceneSurface};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Terminal stand-in for the dashboard page: keeps the last value of every
/// field and logs what changes.
#[derive(Default)]
pub struct ConsoleSurface {
    fields: Mutex<BTreeMap<Field, String>>,
}

impl ConsoleSurface {
    pub fn snapshot(&self) -> Vec<(Field, String)> {
        let fields = self.fields.lock().unwrap_or_else(|e| e.into_inner());
        fields.iter().map(|(f, v)| (*f, v.clone())).collect()
    }
}

impl FieldSink for ConsoleSurface {
    fn render(&self, field: Field, value: &str) {
        let mut fields = self.fields.lock().unwrap_or_else(|e| e.into_inner());
        if fields.get(&field).map(String::as_str) == Some(value) {
            return;
        }
        match field {
            // frames are data URIs, far too long to log
            Field::VideoFeed => debug!("view: {} <{} bytes>", field.id(), value.len()),
            Field::ConnectionStatus | Field::GpsStatus | Field::BatteryLevel => {
                info!("view: {} = {}", field.id(), value)
            }
            _ => debug!("view: {} = {:?}", field.id(), value),
        }
        fields.insert(field, value.to_string());
    }
}

impl MapSurface for ConsoleSurface {
    fn move_marker(&self, at: LatLon) {
        debug!("map: boat at {:.6},{:.6}", at.lat, at.lon);
    }

    fn draw_path(&self, path: &[LatLon]) {
        debug!("map: path of {} points", path.len());
    }

    fn set_view(&self, center: LatLon, zoom: u8) {
        info!("map: view {:.6},{:.6} zoom {}", center.lat, center.lon, zoom);
    }

    fn clear_sample_markers(&self) {
        debug!("map: sample markers cleared");
    }

    fn add_sample_marker(&self, sample: &Sample) {
        if let Some((lat, lon)) = sample.location() {
            debug!("map: sample {} at {:.6},{:.6}", sample.short_id(), lat, lon);
        }
    }
}

impl SceneSurface for ConsoleSurface {
    fn set_rotation(&self, attitude: Attitude) {
        debug!("scene: pitch={:.3} roll={:.3}", attitude.pitch, attitude.roll);
    }
}

impl Notifier for ConsoleSurface {
    fn show(&self, id: u64, text: &str) {
        info!("notice #{}: {}", id, text);
    }

    fn dismiss(&self, id: u64) {
        debug!("notice #{} dismissed", id);
    }
}

impl ControlSurface for ConsoleSurface {
    fn set_busy(&self, pump_id: u8, busy: bool) {
        info!("pump {}: {}", pump_id, if busy { "running" } else { "ready" });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplesCmd {
    Refresh,
    Map,
    Geojson,
    Csv,
}

/// One line typed at the `run` prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCmd {
    Motor(MotorCommand),
    Pump { pump_id: u8, duration: String },
    /// Holds a camera button for `hold`, then releases it.
    Camera { direction: Direction, hold: Duration },
    Center,
    Preset(String),
    SetPan(f64),
    SetTilt(f64),
    Key(Key),
    Samples(SamplesCmd),
    Locate,
    Show,
    Status,
    Quit,
}

impl ConsoleCmd {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let head = words.next().context("empty command")?;
        let arg = words.next();

        if let Some(m) = MotorCommand::parse(head) {
            return Ok(ConsoleCmd::Motor(m));
        }

        let cmd = match head {
            "pump" => {
                let pump_id = arg.context("usage: pump <id> [seconds]")?.parse().context("pump id")?;
                // empty input falls back to the default duration
                let duration = words.next().unwrap_or("").to_string();
                ConsoleCmd::Pump { pump_id, duration }
            }
            "pan" | "tilt" => {
                let dir = arg.context("usage: pan|tilt <direction> [hold_ms]")?;
                let direction = Direction::parse(dir).with_context(|| format!("unknown direction {:?}", dir))?;
                if direction.is_pan() != (head == "pan") {
                    bail!("{} cannot move {}", head, dir);
                }
                let hold_ms: u64 = match words.next() {
                    Some(ms) => ms.parse().context("hold_ms")?,
                    None => 0,
                };
                ConsoleCmd::Camera { direction, hold: Duration::from_millis(hold_ms) }
            }
            "center" => ConsoleCmd::Center,
            "preset" => ConsoleCmd::Preset(arg.context("usage: preset <name>")?.to_string()),
            "set-pan" => ConsoleCmd::SetPan(arg.context("usage: set-pan <angle>")?.parse().context("angle")?),
            "set-tilt" => ConsoleCmd::SetTilt(arg.context("usage: set-tilt <angle>")?.parse().context("angle")?),
            "key" => ConsoleCmd::Key(Key::parse(arg.context("usage: key <code>")?)),
            "samples" => ConsoleCmd::Samples(match arg.unwrap_or("refresh") {
                "refresh" => SamplesCmd::Refresh,
                "map" => SamplesCmd::Map,
                "geojson" => SamplesCmd::Geojson,
                "csv" => SamplesCmd::Csv,
                other => bail!("unknown samples command {:?}", other),
            }),
            "locate" => ConsoleCmd::Locate,
            "show" => ConsoleCmd::Show,
            "status" => ConsoleCmd::Status,
            "quit" | "exit" => ConsoleCmd::Quit,
            other => bail!("unknown command {:?}", other),
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(ConsoleCmd::parse("stop").unwrap(), ConsoleCmd::Motor(MotorCommand::Stop));
        assert_eq!(
            ConsoleCmd::parse("pump 2 7").unwrap(),
            ConsoleCmd::Pump { pump_id: 2, duration: "7".into() }
        );
        assert_eq!(
            ConsoleCmd::parse("pump 3").unwrap(),
            ConsoleCmd::Pump { pump_id: 3, duration: String::new() }
        );
        assert_eq!(
            ConsoleCmd::parse("tilt up 400").unwrap(),
            ConsoleCmd::Camera { direction: Direction::Up, hold: Duration::from_millis(400) }
        );
        assert_eq!(ConsoleCmd::parse("set-pan 135.5").unwrap(), ConsoleCmd::SetPan(135.5));
        assert_eq!(ConsoleCmd::parse("key KeyW").unwrap(), ConsoleCmd::Key(Key::W));
        assert_eq!(ConsoleCmd::parse("samples").unwrap(), ConsoleCmd::Samples(SamplesCmd::Refresh));
        assert_eq!(ConsoleCmd::parse("samples csv").unwrap(), ConsoleCmd::Samples(SamplesCmd::Csv));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ConsoleCmd::parse("").is_err());
        assert!(ConsoleCmd::parse("pan up").is_err());
        assert!(ConsoleCmd::parse("pump x").is_err());
        assert!(ConsoleCmd::parse("samples delete").is_err());
        assert!(ConsoleCmd::parse("fly").is_err());
    }

    #[test]
    fn surface_keeps_last_value() {
        let s = ConsoleSurface::default();
        s.render(Field::GpsStatus, "No Fix");
        s.render(Field::GpsStatus, "GPS Fix");
        s.render(Field::PanAngle, "90°");
        assert_eq!(
            s.snapshot(),
            vec![(Field::GpsStatus, "GPS Fix".to_string()), (Field::PanAngle, "90°".to_string())]
        );
    }
}
