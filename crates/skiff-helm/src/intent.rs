use skiff_proto::{Direction, MotorCommand, Outbound, ServoCommand, Step};

/// A user-originated control request, before wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// forward/backward/left/right, and the explicit `stop`.
    Motor(MotorCommand),
    Camera { direction: Direction, step: u8 },
    Center,
    Preset(String),
    SetPan(f64),
    SetTilt(f64),
    Pump { pump_id: u8, duration_s: u32 },
}

impl Intent {
    pub fn to_frame(&self) -> Outbound {
        match self {
            Intent::Motor(command) => Outbound::Control { command: *command },
            Intent::Camera { direction, step } => {
                let s = Step { direction: *direction, step: *step };
                if direction.is_pan() {
                    Outbound::Servo(ServoCommand::Pan(s))
                } else {
                    Outbound::Servo(ServoCommand::Tilt(s))
                }
            }
            Intent::Center => Outbound::Servo(ServoCommand::Center {}),
            Intent::Preset(name) => Outbound::Servo(ServoCommand::Preset { name: name.clone() }),
            Intent::SetPan(angle) => Outbound::Servo(ServoCommand::SetPan { angle: *angle }),
            Intent::SetTilt(angle) => Outbound::Servo(ServoCommand::SetTilt { angle: *angle }),
            Intent::Pump { pump_id, duration_s } => Outbound::Pump { pump_id: *pump_id, duration: *duration_s },
        }
    }
}

/// Parses a user-entered pump duration the way a number input is read:
/// leading digits only, anything unusable (or zero) falls back to `default_s`.
pub fn parse_duration(input: &str, default_s: u32) -> u32 {
    let digits: String = input.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => default_s,
        Ok(n) => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_intent_picks_servo_by_direction() {
        let pan = Intent::Camera { direction: Direction::Right, step: 1 }.to_frame();
        assert!(matches!(pan, Outbound::Servo(ServoCommand::Pan(Step { direction: Direction::Right, step: 1 }))));
        let tilt = Intent::Camera { direction: Direction::Down, step: 2 }.to_frame();
        assert!(matches!(tilt, Outbound::Servo(ServoCommand::Tilt(_))));
    }

    #[test]
    fn duration_input_parsing() {
        assert_eq!(parse_duration("7", 5), 7);
        assert_eq!(parse_duration(" 12s", 5), 12);
        assert_eq!(parse_duration("", 5), 5);
        assert_eq!(parse_duration("abc", 5), 5);
        assert_eq!(parse_duration("0", 5), 5);
        assert_eq!(parse_duration("-3", 5), 5);
    }
}
