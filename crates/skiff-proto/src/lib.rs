//! Wire protocol spoken between the dashboard client and the vessel.
//!
//! Every frame is a UTF-8 JSON object with a `type` string. Outbound frames put
//! their fields next to `type`; inbound frames carry their payload in `data`.

pub mod codec;
pub mod samples;
pub mod telemetry;
pub mod wire;

pub use codec::{decode, encode, DecodeError, Inbound};
pub use samples::{Sample, SampleStats, SamplesReply};
pub use telemetry::{
    BatteryReading, GpsReading, ImuReading, LatLon, ServoAngles, SystemReading, TelemetryFrame, Vec3,
};
pub use wire::{Direction, MotorCommand, Outbound, SampleRequest, ServoCommand, Step, PRESETS};
