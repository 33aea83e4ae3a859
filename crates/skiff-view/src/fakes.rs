use skiff_link::FrameSink;
use skiff_proto::{codec, LatLon, Outbound, Sample};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::attitude::Attitude;
use crate::surface::{Field, FieldSink, MapSurface, Notifier, SceneSurface};

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    Marker(LatLon),
    Path(usize),
    View(LatLon, u8),
    ClearSamples,
    Sample(String),
}

/// Records everything drawn on it.
#[derive(Default)]
pub struct Canvas {
    fields: Mutex<HashMap<Field, String>>,
    renders: Mutex<usize>,
    map: Mutex<Vec<MapCall>>,
    rotations: Mutex<Vec<Attitude>>,
    notices: Mutex<BTreeMap<u64, String>>,
}

impl Canvas {
    pub fn field(&self, f: Field) -> Option<String> {
        self.fields.lock().unwrap().get(&f).cloned()
    }
    pub fn renders(&self) -> usize {
        *self.renders.lock().unwrap()
    }
    pub fn map_calls(&self) -> Vec<MapCall> {
        self.map.lock().unwrap().clone()
    }
    pub fn rotations(&self) -> Vec<Attitude> {
        self.rotations.lock().unwrap().clone()
    }
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().values().cloned().collect()
    }
    /// Sample ids currently marked on the map.
    pub fn sample_markers(&self) -> Vec<String> {
        let mut out = Vec::new();
        for call in self.map.lock().unwrap().iter() {
            match call {
                MapCall::ClearSamples => out.clear(),
                MapCall::Sample(id) => out.push(id.clone()),
                _ => {}
            }
        }
        out
    }
}

impl FieldSink for Canvas {
    fn render(&self, field: Field, value: &str) {
        *self.renders.lock().unwrap() += 1;
        self.fields.lock().unwrap().insert(field, value.to_string());
    }
}

impl MapSurface for Canvas {
    fn move_marker(&self, at: LatLon) {
        self.map.lock().unwrap().push(MapCall::Marker(at));
    }
    fn draw_path(&self, path: &[LatLon]) {
        self.map.lock().unwrap().push(MapCall::Path(path.len()));
    }
    fn set_view(&self, center: LatLon, zoom: u8) {
        self.map.lock().unwrap().push(MapCall::View(center, zoom));
    }
    fn clear_sample_markers(&self) {
        self.map.lock().unwrap().push(MapCall::ClearSamples);
    }
    fn add_sample_marker(&self, sample: &Sample) {
        self.map.lock().unwrap().push(MapCall::Sample(sample.sample_id.clone()));
    }
}

impl SceneSurface for Canvas {
    fn set_rotation(&self, attitude: Attitude) {
        self.rotations.lock().unwrap().push(attitude);
    }
}

impl Notifier for Canvas {
    fn show(&self, id: u64, text: &str) {
        self.notices.lock().unwrap().insert(id, text.to_string());
    }
    fn dismiss(&self, id: u64) {
        self.notices.lock().unwrap().remove(&id);
    }
}

/// Frame sink that is always connected and keeps the encoded frames.
#[derive(Default)]
pub struct Outbox {
    pub frames: Mutex<Vec<String>>,
}

impl FrameSink for Outbox {
    fn send(&self, frame: &Outbound) -> bool {
        self.frames.lock().unwrap().push(codec::encode(frame));
        true
    }
}
