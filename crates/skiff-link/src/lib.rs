pub mod doctor;
pub mod transport;

use skiff_proto::{codec, Inbound, Outbound};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

pub use transport::{endpoint_url, Connector, LinkError, Transport, TransportEvent, WsConnector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Everything the link tells the rest of the client, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Connectivity(bool),
    Frame(Inbound),
}

pub type LinkEvents = mpsc::UnboundedReceiver<LinkEvent>;

#[derive(Debug, Clone)]
pub struct LinkStatus {
    pub state: ConnectionState,
    pub attempts: u64,
    pub last_error: Option<String>,
    pub frames_in: u64,
    pub frames_dropped: u64,
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            last_error: None,
            frames_in: 0,
            frames_dropped: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub endpoint: String,
    /// Fixed retry period; no backoff, no retry limit.
    pub reconnect_every: Duration,
    pub connect_timeout: Duration,
}

impl LinkConfig {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            reconnect_every: Duration::from_millis(3000),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Default)]
struct Shared {
    status: Mutex<LinkStatus>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Anything that can push an outbound frame toward the vessel.
pub trait FrameSink: Send + Sync {
    /// Returns false when the frame was dropped (not connected).
    fn send(&self, frame: &Outbound) -> bool;
}

/// Cheap handle for sending frames and reading link state.
#[derive(Clone)]
pub struct LinkHandle {
    shared: Arc<Shared>,
}

impl LinkHandle {
    pub fn state(&self) -> ConnectionState {
        lock(&self.shared.status).state
    }

    pub fn status(&self) -> LinkStatus {
        lock(&self.shared.status).clone()
    }
}

impl FrameSink for LinkHandle {
    fn send(&self, frame: &Outbound) -> bool {
        if self.state() != ConnectionState::Connected {
            debug!("link: not connected, dropping {:?}", frame);
            return false;
        }
        let out = lock(&self.shared.outbound);
        match out.as_ref() {
            Some(tx) => tx.send(codec::encode(frame)).is_ok(),
            None => false,
        }
    }
}

/// Owns the single connection to the vessel and its reconnect policy.
pub struct Link<C> {
    connector: C,
    cfg: LinkConfig,
    shared: Arc<Shared>,
    events: mpsc::UnboundedSender<LinkEvent>,
}

impl<C: Connector> Link<C> {
    pub fn new(connector: C, cfg: LinkConfig) -> (Self, LinkHandle, LinkEvents) {
        let shared = Arc::new(Shared::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let link = Self { connector, cfg, shared: shared.clone(), events: tx };
        (link, LinkHandle { shared }, rx)
    }

    /// Drives the connection until the event receiver is dropped.
    pub async fn run(self) {
        let mut retry: Option<Interval> = None;

        loop {
            if self.events.is_closed() {
                info!("link: event consumer gone, stopping");
                return;
            }

            let attempt = {
                let mut st = lock(&self.shared.status);
                st.state = ConnectionState::Connecting;
                st.attempts += 1;
                st.attempts
            };
            debug!("link: connecting to {} (attempt {})", self.cfg.endpoint, attempt);

            let opened = match time::timeout(self.cfg.connect_timeout, self.connector.connect(&self.cfg.endpoint)).await {
                Ok(r) => r,
                Err(_) => Err(LinkError::Timeout(self.cfg.connect_timeout)),
            };

            match opened {
                Ok(transport) => {
                    if retry.take().is_some() {
                        debug!("link: reconnect timer disarmed");
                    }
                    self.session(transport).await;
                }
                Err(e) => {
                    debug!("link: connect failed: {}", e);
                    lock(&self.shared.status).last_error = Some(e.to_string());
                }
            }

            lock(&self.shared.status).state = ConnectionState::Disconnected;
            let _ = self.events.send(LinkEvent::Connectivity(false));

            let period = self.cfg.reconnect_every;
            let timer = retry.get_or_insert_with(|| {
                info!("link: retrying every {}ms", period.as_millis());
                let mut iv = time::interval_at(Instant::now() + period, period);
                iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
                iv
            });
            timer.tick().await;
        }
    }

    async fn session(&self, mut transport: Transport) {
        *lock(&self.shared.outbound) = Some(transport.outbound.clone());
        {
            let mut st = lock(&self.shared.status);
            st.state = ConnectionState::Connected;
            st.last_error = None;
        }
        info!("link: connected to {}", self.cfg.endpoint);
        let _ = self.events.send(LinkEvent::Connectivity(true));

        while let Some(ev) = transport.inbound.recv().await {
            match ev {
                TransportEvent::Frame(text) => self.on_frame(&text),
                TransportEvent::Error(e) => {
                    warn!("link: transport error: {}", e);
                    lock(&self.shared.status).last_error = Some(e);
                }
                TransportEvent::Dropped(reason) => {
                    lock(&self.shared.status).frames_dropped += 1;
                    warn!("link: dropping frame: {}", reason);
                }
                TransportEvent::Closed => break,
            }
        }

        *lock(&self.shared.outbound) = None;
        info!("link: disconnected from {}", self.cfg.endpoint);
    }

    fn on_frame(&self, text: &str) {
        match codec::decode(text) {
            Ok(Inbound::Unknown(kind)) => {
                info!("link: ignoring unknown frame type {:?}", kind);
            }
            Ok(ev) => {
                lock(&self.shared.status).frames_in += 1;
                let _ = self.events.send(LinkEvent::Frame(ev));
            }
            Err(e) => {
                lock(&self.shared.status).frames_dropped += 1;
                warn!("link: dropping frame: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use skiff_proto::MotorCommand;
    use std::collections::VecDeque;

    struct Peer {
        to_client: mpsc::UnboundedSender<TransportEvent>,
        from_client: mpsc::UnboundedReceiver<String>,
    }

    fn pair() -> (Transport, Peer) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            Transport { outbound: out_tx, inbound: in_rx },
            Peer { to_client: in_tx, from_client: out_rx },
        )
    }

    #[derive(Clone, Default)]
    struct Scripted {
        script: Arc<Mutex<VecDeque<Transport>>>,
        attempts: Arc<Mutex<Vec<Instant>>>,
    }

    impl Connector for Scripted {
        fn connect(&self, _endpoint: &str) -> BoxFuture<'static, Result<Transport, LinkError>> {
            lock(&self.attempts).push(Instant::now());
            let next = lock(&self.script).pop_front();
            Box::pin(async move { next.ok_or_else(|| LinkError::Refused("scripted".into())) })
        }
    }

    fn start(conn: Scripted) -> (LinkHandle, LinkEvents) {
        let (link, handle, events) = Link::new(conn, LinkConfig::new("ws://test:8000".into()));
        tokio::spawn(link.run());
        (handle, events)
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_decoded_frames_in_order() {
        let conn = Scripted::default();
        let (transport, peer) = pair();
        lock(&conn.script).push_back(transport);
        let (handle, mut events) = start(conn);

        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(true)));
        assert_eq!(handle.state(), ConnectionState::Connected);

        peer.to_client.send(TransportEvent::Frame(r#"{"type":"config","data":{}}"#.into())).unwrap();
        peer.to_client.send(TransportEvent::Frame("garbage".into())).unwrap();
        peer.to_client.send(TransportEvent::Frame(r#"{"type":"radar","data":{}}"#.into())).unwrap();
        peer.to_client.send(TransportEvent::Error("reset".into())).unwrap();
        peer.to_client.send(TransportEvent::Dropped("binary frame is not UTF-8".into())).unwrap();
        peer.to_client.send(TransportEvent::Frame(r#"{"type":"video","data":"data:x"}"#.into())).unwrap();

        assert_eq!(events.recv().await, Some(LinkEvent::Frame(Inbound::Config)));
        assert_eq!(events.recv().await, Some(LinkEvent::Frame(Inbound::Video("data:x".into()))));
        let st = handle.status();
        assert_eq!(st.frames_dropped, 2);
        assert_eq!(st.state, ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn send_only_while_connected() {
        let conn = Scripted::default();
        let (transport, mut peer) = pair();
        lock(&conn.script).push_back(transport);
        let (handle, mut events) = start(conn);

        let stop = Outbound::Control { command: MotorCommand::Stop };
        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(true)));
        assert!(handle.send(&stop));
        assert_eq!(peer.from_client.recv().await.as_deref(), Some(r#"{"type":"control","command":"stop"}"#));

        peer.to_client.send(TransportEvent::Closed).unwrap();
        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(false)));
        assert!(!handle.send(&stop));
    }

    #[tokio::test(start_paused = true)]
    async fn reconnects_on_a_fixed_period() {
        let conn = Scripted::default();
        let (transport, peer) = pair();
        lock(&conn.script).push_back(transport);
        let attempts = conn.attempts.clone();
        let (_handle, mut events) = start(conn);

        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(true)));
        peer.to_client.send(TransportEvent::Closed).unwrap();
        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(false)));
        let dropped_at = Instant::now();

        time::sleep(Duration::from_millis(9500)).await;

        let seen = lock(&attempts).clone();
        // first entry is the initial connect
        let retries: Vec<u128> = seen[1..].iter().map(|t| (*t - dropped_at).as_millis()).collect();
        assert_eq!(retries, vec![3000, 6000, 9000]);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_reconnect_disarms_timer() {
        let conn = Scripted::default();
        let (t1, p1) = pair();
        lock(&conn.script).push_back(t1);
        let attempts = conn.attempts.clone();
        let script = conn.script.clone();
        let (handle, mut events) = start(conn);

        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(true)));
        p1.to_client.send(TransportEvent::Closed).unwrap();
        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(false)));

        let (t2, _p2) = pair();
        lock(&script).push_back(t2);
        assert_eq!(events.recv().await, Some(LinkEvent::Connectivity(true)));
        assert_eq!(handle.state(), ConnectionState::Connected);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(lock(&attempts).len(), 2);
    }
}
