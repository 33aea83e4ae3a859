use serde::{Deserialize, Serialize};
use time::format_description::well_known::Iso8601;
use time::{OffsetDateTime, PrimitiveDateTime};

/// A physical sample logged by the vessel when a pump ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub sample_id: String,
    pub pump_id: u8,
    pub duration: u32,
    /// ISO 8601, usually without offset (vessel local time).
    pub timestamp: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Sample {
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Last eight characters of the id, as shown in lists and popups.
    pub fn short_id(&self) -> &str {
        let n = self.sample_id.chars().count();
        let skip = n.saturating_sub(8);
        match self.sample_id.char_indices().nth(skip) {
            Some((i, _)) => &self.sample_id[i..],
            None => &self.sample_id,
        }
    }

    /// Parsed timestamp, offset-less values taken as UTC. `None` if unparsable.
    pub fn taken_at(&self) -> Option<OffsetDateTime> {
        let s = self.timestamp.trim();
        if let Ok(t) = OffsetDateTime::parse(s, &Iso8601::DEFAULT) {
            return Some(t);
        }
        PrimitiveDateTime::parse(s, &Iso8601::DEFAULT)
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleStats {
    #[serde(default)]
    pub total_samples: Option<u64>,
    #[serde(default)]
    pub samples_today: Option<u64>,
}

/// Nested reply carried by a `samples_data` frame, keyed by its `command`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplesReply {
    AllSamples(Vec<Sample>),
    Statistics(Option<SampleStats>),
    GeojsonExported { file: Option<String>, message: String },
    CsvExported { file: Option<String>, message: String },
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, ts: &str) -> Sample {
        Sample {
            sample_id: id.into(),
            pump_id: 1,
            duration: 5,
            timestamp: ts.into(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn short_id_keeps_tail() {
        assert_eq!(sample("3f2a9c1e-77aa-4e0b-9d1f-0123456789ab", "").short_id(), "456789ab");
        assert_eq!(sample("abc", "").short_id(), "abc");
    }

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = sample("a", "2024-06-01T10:15:30.123456").taken_at().unwrap();
        let zulu = sample("b", "2024-06-01T10:15:31Z").taken_at().unwrap();
        assert!(zulu > naive);
        assert!(sample("c", "yesterday").taken_at().is_none());
    }
}
