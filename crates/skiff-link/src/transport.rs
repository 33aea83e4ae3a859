use futures_util::future::BoxFuture;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

/// What a live transport reports back, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Frame(String),
    /// Logged by the link; the close that follows drives the state change.
    Error(String),
    /// A data frame that cannot be handed on as text. Counted as dropped.
    Dropped(String),
    Closed,
}

/// Maps one websocket message to what the link sees. `None` for control frames.
fn to_event(msg: Message) -> Option<TransportEvent> {
    match msg {
        Message::Text(s) => Some(TransportEvent::Frame(s)),
        Message::Binary(b) => Some(match String::from_utf8(b) {
            Ok(s) => TransportEvent::Frame(s),
            Err(e) => TransportEvent::Dropped(format!("binary frame is not UTF-8: {}", e)),
        }),
        Message::Close(_) => Some(TransportEvent::Closed),
        _ => None,
    }
}

/// An open message-oriented connection, seen as a pair of channels.
/// Dropping `outbound` closes the write half.
pub struct Transport {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<TransportEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection refused: {0}")]
    Refused(String),
}

/// Opens transports to an endpoint. The link calls this once per attempt.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self, endpoint: &str) -> BoxFuture<'static, Result<Transport, LinkError>>;
}

/// WebSocket connector (text frames only).
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect(&self, endpoint: &str) -> BoxFuture<'static, Result<Transport, LinkError>> {
        let url = endpoint.to_string();
        Box::pin(async move {
            let (ws, _resp) = tokio_tungstenite::connect_async(url.as_str()).await?;
            let (mut write, mut read) = ws.split();

            let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
            let (in_tx, in_rx) = mpsc::unbounded_channel::<TransportEvent>();

            tokio::spawn(async move {
                while let Some(text) = out_rx.recv().await {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        debug!("ws: write failed: {}", e);
                        break;
                    }
                }
                let _ = write.close().await;
            });

            tokio::spawn(async move {
                while let Some(item) = read.next().await {
                    let ev = match item {
                        Ok(msg) => match to_event(msg) {
                            Some(TransportEvent::Closed) => break,
                            Some(ev) => ev,
                            None => continue,
                        },
                        Err(e) => {
                            let _ = in_tx.send(TransportEvent::Error(e.to_string()));
                            break;
                        }
                    };
                    if in_tx.send(ev).is_err() {
                        break;
                    }
                }
                let _ = in_tx.send(TransportEvent::Closed);
            });

            Ok(Transport { outbound: out_tx, inbound: in_rx })
        })
    }
}

/// `ws://host:port`, bracketing bare IPv6 hosts.
pub fn endpoint_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("ws://[{}]:{}", host, port)
    } else {
        format!("ws://{}:{}", host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint() {
        assert_eq!(endpoint_url("10.35.254.6", 8000), "ws://10.35.254.6:8000");
        assert_eq!(endpoint_url("boat.local", 9000), "ws://boat.local:9000");
        assert_eq!(endpoint_url("fe80::1", 8000), "ws://[fe80::1]:8000");
    }

    #[test]
    fn maps_messages_to_events() {
        assert_eq!(to_event(Message::Text("{}".into())), Some(TransportEvent::Frame("{}".into())));
        assert_eq!(to_event(Message::Binary(b"{}".to_vec())), Some(TransportEvent::Frame("{}".into())));
        assert!(matches!(to_event(Message::Binary(vec![0xff, 0xfe, 0x7b])), Some(TransportEvent::Dropped(_))));
        assert_eq!(to_event(Message::Close(None)), Some(TransportEvent::Closed));
        assert_eq!(to_event(Message::Ping(vec![1])), None);
    }
}
