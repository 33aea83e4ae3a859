use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::samples::{Sample, SampleStats, SamplesReply};
use crate::telemetry::{ServoAngles, TelemetryFrame};
use crate::wire::Outbound;

/// Decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Vessel configuration, sent once per connection. Payload is not interpreted.
    Config,
    Telemetry(TelemetryFrame),
    /// Image URI (usually a `data:image/jpeg;base64,...` URL).
    Video(String),
    ServoStatus(ServoAngles),
    SamplesData(SamplesReply),
    /// Well-formed frame with a `type` this client does not handle.
    Unknown(String),
}

impl Inbound {
    pub fn kind(&self) -> &str {
        match self {
            Inbound::Config => "config",
            Inbound::Telemetry(_) => "telemetry",
            Inbound::Video(_) => "video",
            Inbound::ServoStatus(_) => "servo_status",
            Inbound::SamplesData(_) => "samples_data",
            Inbound::Unknown(t) => t,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("frame has no string `type` field")]
    MissingType,
    #[error("bad `{kind}` payload: {source}")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    data: Value,
}

pub fn encode(frame: &Outbound) -> String {
    // Outbound only holds strings, integers and finite floats.
    serde_json::to_string(frame).unwrap_or_else(|_| String::from("{}"))
}

pub fn decode(text: &str) -> Result<Inbound, DecodeError> {
    let env: Envelope = serde_json::from_str(text).map_err(DecodeError::Json)?;
    let kind = match env.kind {
        Some(Value::String(s)) => s,
        _ => return Err(DecodeError::MissingType),
    };

    let ev = match kind.as_str() {
        "config" => Inbound::Config,
        "telemetry" => Inbound::Telemetry(decode_telemetry(env.data)?),
        "video" => Inbound::Video(payload("video", env.data)?),
        "servo_status" => Inbound::ServoStatus(payload("servo_status", env.data)?),
        "samples_data" => Inbound::SamplesData(decode_samples(env.data)?),
        _ => Inbound::Unknown(kind),
    };
    Ok(ev)
}

fn payload<T: DeserializeOwned>(kind: &'static str, data: Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Payload { kind, source })
}

/// Sections decode independently: a malformed one is logged and left out,
/// the rest of the push still applies. `null` data is an empty push.
fn decode_telemetry(data: Value) -> Result<TelemetryFrame, DecodeError> {
    let mut sections: Map<String, Value> = match data {
        Value::Null => return Ok(TelemetryFrame::default()),
        other => payload("telemetry", other)?,
    };
    Ok(TelemetryFrame {
        gps: section(&mut sections, "gps"),
        imu: section(&mut sections, "imu"),
        battery: section(&mut sections, "battery"),
        system: section(&mut sections, "system"),
        servos: section(&mut sections, "servos"),
    })
}

fn section<T: DeserializeOwned>(sections: &mut Map<String, Value>, name: &str) -> Option<T> {
    match sections.remove(name)? {
        Value::Null => None,
        v => match serde_json::from_value(v) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("codec: skipping telemetry section {}: {}", name, e);
                None
            }
        },
    }
}

#[derive(Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum RawReply {
    AllSamples {
        #[serde(default)]
        samples: Option<Vec<Value>>,
    },
    Statistics {
        #[serde(default)]
        statistics: Option<SampleStats>,
    },
    GeojsonExported {
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        message: String,
    },
    CsvExported {
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        message: String,
    },
}

fn decode_samples(data: Value) -> Result<SamplesReply, DecodeError> {
    let command = data.get("command").and_then(Value::as_str).map(str::to_owned);
    match command.as_deref() {
        Some("all_samples" | "statistics" | "geojson_exported" | "csv_exported") => {}
        Some(other) => return Ok(SamplesReply::Unknown(other.to_owned())),
        None => {
            return Err(DecodeError::Payload {
                kind: "samples_data",
                source: serde::de::Error::missing_field("command"),
            })
        }
    }

    let raw: RawReply = serde_json::from_value(data)
        .map_err(|source| DecodeError::Payload { kind: "samples_data", source })?;
    Ok(match raw {
        RawReply::AllSamples { samples } => SamplesReply::AllSamples(keep_valid(samples.unwrap_or_default())),
        RawReply::Statistics { statistics } => SamplesReply::Statistics(statistics),
        RawReply::GeojsonExported { file, message } => SamplesReply::GeojsonExported { file, message },
        RawReply::CsvExported { file, message } => SamplesReply::CsvExported { file, message },
    })
}

/// One bad record does not cost the whole batch.
fn keep_valid(records: Vec<Value>) -> Vec<Sample> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value::<Sample>(v) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("codec: skipping sample record {}: {}", i, e);
                None
            }
        })
        .collect()
}
