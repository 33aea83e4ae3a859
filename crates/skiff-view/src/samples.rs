use serde::Deserialize;
use skiff_link::FrameSink;
use skiff_proto::{Outbound, Sample, SampleRequest, SampleStats, SamplesReply};
use std::sync::Arc;
use std::time::Duration;
use time::macros::format_description;
use time::UtcOffset;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::surface::{Field, FieldSink, MapSurface, Notifier};

pub const NO_SAMPLES: &str = "No samples collected yet";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplesConfig {
    /// Delay before the first automatic `get_all` + `get_statistics`.
    pub prime_delay_ms: u64,
    /// How many of the most recent samples the list shows.
    pub list_limit: usize,
    /// Lifetime of export notifications.
    pub notice_ttl_ms: u64,
    /// Offset the list shows times in. Unset means the host's local offset,
    /// or UTC when that cannot be determined.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self { prime_delay_ms: 2000, list_limit: 10, notice_ttl_ms: 5000, utc_offset_minutes: None }
    }
}

impl SamplesConfig {
    pub fn display_offset(&self) -> UtcOffset {
        if let Some(min) = self.utc_offset_minutes {
            match min.checked_mul(60).and_then(|secs| UtcOffset::from_whole_seconds(secs).ok()) {
                Some(o) => return o,
                None => warn!("samples: utc_offset_minutes {} out of range, ignoring", min),
            }
        }
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
    }
}

/// Request/response client for the vessel's sample log.
///
/// Replies carry no request id: whatever `all_samples` or `statistics` reply
/// arrives last replaces what is shown.
pub struct SampleRegistry {
    sink: Arc<dyn FrameSink>,
    fields: Arc<dyn FieldSink>,
    map: Arc<dyn MapSurface>,
    notifier: Arc<dyn Notifier>,
    cfg: SamplesConfig,
    offset: UtcOffset,
    latest: Vec<Sample>,
    stats: SampleStats,
    next_notice: u64,
}

impl SampleRegistry {
    pub fn new(
        sink: Arc<dyn FrameSink>,
        fields: Arc<dyn FieldSink>,
        map: Arc<dyn MapSurface>,
        notifier: Arc<dyn Notifier>,
        cfg: SamplesConfig,
    ) -> Self {
        let offset = cfg.display_offset();
        Self {
            sink,
            fields,
            map,
            notifier,
            cfg,
            offset,
            latest: Vec::new(),
            stats: SampleStats::default(),
            next_notice: 0,
        }
    }

    pub fn request(&self, command: SampleRequest) -> bool {
        let sent = self.sink.send(&Outbound::Samples { command });
        debug!("samples: request {:?} sent={}", command, sent);
        sent
    }

    pub fn refresh(&self) {
        self.request(SampleRequest::GetAll);
        self.request(SampleRequest::GetStatistics);
    }

    pub fn show_on_map(&self) {
        self.request(SampleRequest::GetAll);
    }

    pub fn export_geojson(&self) -> bool {
        self.request(SampleRequest::ExportGeojson)
    }

    pub fn export_csv(&self) -> bool {
        self.request(SampleRequest::ExportCsv)
    }

    /// Issues the priming refresh once the configured delay has passed.
    pub fn prime(&self) -> JoinHandle<()> {
        let sink = self.sink.clone();
        let delay = Duration::from_millis(self.cfg.prime_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.send(&Outbound::Samples { command: SampleRequest::GetAll });
            sink.send(&Outbound::Samples { command: SampleRequest::GetStatistics });
        })
    }

    pub fn latest(&self) -> &[Sample] {
        &self.latest
    }

    pub fn stats(&self) -> SampleStats {
        self.stats
    }

    pub fn handle(&mut self, reply: &SamplesReply) {
        match reply {
            SamplesReply::AllSamples(samples) => {
                self.latest = samples.clone();
                self.render_list();
                self.redraw_markers();
            }
            SamplesReply::Statistics(stats) => {
                self.stats = stats.unwrap_or_default();
                let total = self.stats.total_samples.unwrap_or(0);
                let today = self.stats.samples_today.unwrap_or(0);
                self.fields.render(Field::TotalSamples, &total.to_string());
                self.fields.render(Field::TodaySamples, &today.to_string());
            }
            SamplesReply::GeojsonExported { message, .. } | SamplesReply::CsvExported { message, .. } => {
                info!("samples: {}", message);
                self.notify(message);
            }
            SamplesReply::Unknown(cmd) => debug!("samples: ignoring reply {:?}", cmd),
        }
    }

    /// Newest first, at most `list_limit`. Unparsable timestamps sort last.
    pub fn recent(&self) -> Vec<&Sample> {
        let mut sorted: Vec<&Sample> = self.latest.iter().collect();
        sorted.sort_by(|a, b| b.taken_at().cmp(&a.taken_at()));
        sorted.truncate(self.cfg.list_limit);
        sorted
    }

    fn render_list(&self) {
        if self.latest.is_empty() {
            self.fields.render(Field::SamplesList, NO_SAMPLES);
            return;
        }
        let lines: Vec<String> = self.recent().into_iter().map(|s| list_line(s, self.offset)).collect();
        self.fields.render(Field::SamplesList, &lines.join("\n"));
    }

    fn redraw_markers(&self) {
        self.map.clear_sample_markers();
        let mut placed = 0;
        for s in self.latest.iter().filter(|s| s.location().is_some()) {
            self.map.add_sample_marker(s);
            placed += 1;
        }
        debug!("samples: {} markers on map", placed);
    }

    fn notify(&mut self, text: &str) {
        self.next_notice += 1;
        let id = self.next_notice;
        self.notifier.show(id, text);

        let notifier = self.notifier.clone();
        let ttl = Duration::from_millis(self.cfg.notice_ttl_ms);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            notifier.dismiss(id);
        });
    }
}

fn list_line(s: &Sample, offset: UtcOffset) -> String {
    let when = s
        .taken_at()
        .and_then(|t| {
            t.to_offset(offset)
                .format(format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
                ))
                .ok()
        })
        .unwrap_or_else(|| s.timestamp.clone());
    let place = match s.location() {
        Some((lat, lon)) => format!("{:.6}, {:.6}", lat, lon),
        None => "no GPS location".to_string(),
    };
    format!("Sample #{} | {} | Pump {} | {}s | {}", s.short_id(), when, s.pump_id, s.duration, place)
}
