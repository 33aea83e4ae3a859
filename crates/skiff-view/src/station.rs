use skiff_link::LinkEvent;
use skiff_proto::Inbound;
use tracing::{debug, info};

use crate::projector::Projector;
use crate::samples::SampleRegistry;

/// Single consumer of link events: continuous data goes to the projector,
/// request/response data to the sample registry.
pub struct Station {
    pub projector: Projector,
    pub samples: SampleRegistry,
}

impl Station {
    pub fn new(projector: Projector, samples: SampleRegistry) -> Self {
        Self { projector, samples }
    }

    pub fn handle(&mut self, ev: LinkEvent) {
        match ev {
            LinkEvent::Connectivity(up) => self.projector.connectivity(up),
            LinkEvent::Frame(frame) => self.route(frame),
        }
    }

    fn route(&mut self, frame: Inbound) {
        debug!("view: routing {} frame", frame.kind());
        match frame {
            Inbound::Config => info!("view: received vessel configuration"),
            Inbound::Telemetry(t) => self.projector.telemetry(&t),
            Inbound::Video(uri) => self.projector.video(&uri),
            Inbound::ServoStatus(s) => {
                debug!("view: servo status pan={} tilt={}", s.pan_angle, s.tilt_angle);
                self.projector.servo_status(&s)
            }
            Inbound::SamplesData(reply) => self.samples.handle(&reply),
            Inbound::Unknown(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{Canvas, Outbox};
    use crate::samples::SamplesConfig;
    use crate::surface::Field;
    use skiff_proto::decode;
    use std::sync::Arc;

    fn station() -> (Station, Arc<Canvas>) {
        let c = Arc::new(Canvas::default());
        let out = Arc::new(Outbox::default());
        let projector = Projector::new(c.clone(), c.clone(), c.clone(), 15);
        let samples = SampleRegistry::new(out, c.clone(), c.clone(), c.clone(), SamplesConfig::default());
        (Station::new(projector, samples), c)
    }

    #[test]
    fn routes_frames_by_kind() {
        let (mut st, c) = station();
        st.handle(LinkEvent::Connectivity(true));
        for text in [
            r#"{"type":"config","data":{}}"#,
            r#"{"type":"telemetry","data":{"gps":{"lat":1.0,"lon":2.0,"alt":0,"satellites":7,"fix":true}}}"#,
            r#"{"type":"servo_status","data":{"pan_angle":120,"tilt_angle":90}}"#,
            r#"{"type":"samples_data","data":{"command":"statistics","statistics":{"total_samples":3,"samples_today":1}}}"#,
        ] {
            st.handle(LinkEvent::Frame(decode(text).unwrap()));
        }
        assert_eq!(c.field(Field::ConnectionStatus).as_deref(), Some("Connected"));
        assert_eq!(st.projector.track().len(), 1);
        assert_eq!(c.field(Field::PanAngle).as_deref(), Some("120°"));
        assert_eq!(c.field(Field::TodaySamples).as_deref(), Some("1"));
        assert_eq!(st.samples.stats().total_samples, Some(3));
    }

    #[test]
    fn malformed_battery_does_not_hold_back_the_fix() {
        let (mut st, c) = station();
        let frame = decode(
            r#"{"type":"telemetry","data":{"gps":{"lat":59.9,"lon":10.7,"fix":true},"battery":{"voltage":13.2,"percentage":80}}}"#,
        )
        .unwrap();
        st.handle(LinkEvent::Frame(frame));

        assert_eq!(st.projector.track().len(), 1);
        assert_eq!(c.field(Field::GpsStatus).as_deref(), Some("GPS Fix"));
        assert_eq!(c.field(Field::BatteryLevel), None);
    }
}
