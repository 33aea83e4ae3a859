use serde::{Deserialize, Serialize};

/// Frames the client sends to the vessel. Serialized as `{"type": ..., ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Control { command: MotorCommand },
    Pump { pump_id: u8, duration: u32 },
    Servo(ServoCommand),
    Samples { command: SampleRequest },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorCommand {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl MotorCommand {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "forward" => Some(Self::Forward),
            "backward" => Some(Self::Backward),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Servo frames carry `command` plus a command-specific `value` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum ServoCommand {
    Pan(Step),
    Tilt(Step),
    Preset { name: String },
    Center {},
    SetPan { angle: f64 },
    SetTilt { angle: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub direction: Direction,
    pub step: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Left/right move the pan servo, up/down the tilt servo.
    pub fn is_pan(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Camera presets the vessel knows about.
pub const PRESETS: [&str; 6] = ["center", "front", "left", "right", "down", "up"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRequest {
    GetAll,
    GetStatistics,
    ExportGeojson,
    ExportCsv,
}
