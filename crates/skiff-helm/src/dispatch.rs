use skiff_link::FrameSink;
use skiff_proto::Direction;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::hold::HoldRepeat;
use crate::intent::{parse_duration, Intent};
use crate::keys::{Key, PressedKeys};
use crate::HelmConfig;

/// Local affordance for controls whose effect takes time on the vessel.
pub trait ControlSurface: Send + Sync {
    fn set_busy(&self, pump_id: u8, busy: bool);
}

/// On-screen camera buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraButton {
    Move(Direction),
    Center,
}

/// Turns intents into outbound frames.
///
/// On-screen camera buttons repeat while held; keyboard bindings fire once per
/// key-down edge. Both are intended.
pub struct Dispatcher {
    sink: Arc<dyn FrameSink>,
    controls: Arc<dyn ControlSurface>,
    cfg: HelmConfig,
    hold: Option<HoldRepeat>,
    keys: PressedKeys,
    busy_pumps: Arc<Mutex<HashSet<u8>>>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn FrameSink>, controls: Arc<dyn ControlSurface>, cfg: HelmConfig) -> Self {
        Self {
            sink,
            controls,
            cfg,
            hold: None,
            keys: PressedKeys::default(),
            busy_pumps: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Single-shot command. Returns whether it reached the transport.
    pub fn fire(&self, intent: &Intent) -> bool {
        let sent = self.sink.send(&intent.to_frame());
        debug!("helm: {:?} sent={}", intent, sent);
        sent
    }

    /// Pointer-down on a camera button.
    pub fn press(&mut self, button: CameraButton) -> bool {
        let direction = match button {
            CameraButton::Center => return self.fire(&Intent::Center),
            CameraButton::Move(d) => d,
        };

        // one held control at a time
        self.hold = None;

        let sent = self.fire(&Intent::Camera { direction, step: self.cfg.first_step });
        let repeat = Intent::Camera { direction, step: self.cfg.repeat_step }.to_frame();
        self.hold = Some(HoldRepeat::start(self.sink.clone(), repeat, self.cfg.hold_period()));
        sent
    }

    /// Pointer-up or pointer-leave. Servo controls never get an implicit stop.
    pub fn release(&mut self) {
        if self.hold.take().is_some() {
            debug!("helm: camera hold released");
        }
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    pub fn key_down(&mut self, key: &Key) -> bool {
        if !self.keys.down(key) {
            return false;
        }
        match key.intent(self.cfg.key_step) {
            Some(intent) => self.fire(&intent),
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &Key) {
        self.keys.up(key);
    }

    /// Runs a pump for the entered duration. The control stays busy for exactly
    /// that long whatever the vessel answers.
    pub fn activate_pump(&self, pump_id: u8, duration_input: &str) -> bool {
        let duration_s = parse_duration(duration_input, self.cfg.default_pump_secs);

        let mut busy = self.busy_pumps.lock().unwrap_or_else(|e| e.into_inner());
        if busy.contains(&pump_id) {
            warn!("helm: pump {} still running, ignoring", pump_id);
            return false;
        }
        if !self.fire(&Intent::Pump { pump_id, duration_s }) {
            return false;
        }
        busy.insert(pump_id);
        drop(busy);

        info!("helm: pump {} on for {}s", pump_id, duration_s);
        self.controls.set_busy(pump_id, true);

        let controls = self.controls.clone();
        let busy_pumps = self.busy_pumps.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(u64::from(duration_s))).await;
            busy_pumps.lock().unwrap_or_else(|e| e.into_inner()).remove(&pump_id);
            controls.set_busy(pump_id, false);
        });
        true
    }

    pub fn is_pump_busy(&self, pump_id: u8) -> bool {
        self.busy_pumps.lock().unwrap_or_else(|e| e.into_inner()).contains(&pump_id)
    }
}
