pub mod dispatch;
pub mod doctor;
pub mod hold;
pub mod intent;
pub mod keys;

use serde::Deserialize;
use std::time::Duration;

pub use dispatch::{CameraButton, ControlSurface, Dispatcher};
pub use intent::{parse_duration, Intent};
pub use keys::Key;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HelmConfig {
    /// Repeat period while an on-screen camera button is held.
    pub hold_period_ms: u64,
    /// Step of the immediate command on press (a larger first movement).
    pub first_step: u8,
    /// Step of each repeated command while held.
    pub repeat_step: u8,
    /// Step of keyboard bindings (one per key-down edge).
    pub key_step: u8,
    /// Used when the entered pump duration cannot be read.
    pub default_pump_secs: u32,
    /// Pumps present on the vessel.
    pub pumps: Vec<u8>,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            hold_period_ms: 100,
            first_step: 2,
            repeat_step: 1,
            key_step: 2,
            default_pump_secs: 5,
            pumps: vec![1, 2, 3],
        }
    }
}

impl HelmConfig {
    pub fn hold_period(&self) -> Duration {
        Duration::from_millis(self.hold_period_ms)
    }
}
