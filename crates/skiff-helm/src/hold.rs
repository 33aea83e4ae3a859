use skiff_link::FrameSink;
use skiff_proto::Outbound;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Resends a frame every `period` until dropped. The first resend happens one
/// period after `start`; the caller sends the initial frame itself.
pub struct HoldRepeat {
    task: JoinHandle<()>,
}

impl HoldRepeat {
    pub fn start(sink: Arc<dyn FrameSink>, frame: Outbound, period: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut iv = time::interval_at(Instant::now() + period, period);
            loop {
                iv.tick().await;
                sink.send(&frame);
            }
        });
        Self { task }
    }
}

impl Drop for HoldRepeat {
    fn drop(&mut self) {
        self.task.abort();
    }
}
