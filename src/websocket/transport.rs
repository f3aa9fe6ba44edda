//! WebSocket Transports
//!
//! The subscription reads text frames through [`Transport`], obtained from a
//! [`Connector`]. [`TungsteniteConnector`] talks to a real server;
//! [`ChannelConnector`] feeds frames from an in-process channel.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Errors raised while opening or reading the live-update stream
#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("Failed to connect to {url}: {error}")]
    Connect { url: String, error: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Subscription is already connected")]
    AlreadyConnected,
}

/// An open stream of text frames
#[async_trait]
pub trait Transport: Send {
    /// Next text payload, or `None` once the stream has ended
    async fn next_text(&mut self) -> Option<Result<String, SubscriptionError>>;

    /// Close the stream from the client side
    async fn close(&mut self);
}

/// Opens transports
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, SubscriptionError>;
}

/// Connector backed by `tokio-tungstenite`
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, SubscriptionError> {
        let (stream, _response) =
            tokio_tungstenite::connect_async(url)
                .await
                .map_err(|e| SubscriptionError::Connect {
                    url: url.to_string(),
                    error: e.to_string(),
                })?;

        Ok(Box::new(TungsteniteTransport { stream }))
    }
}

struct TungsteniteTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for TungsteniteTransport {
    async fn next_text(&mut self) -> Option<Result<String, SubscriptionError>> {
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => tracing::warn!("Dropping non-UTF-8 binary frame"),
                },
                Ok(Message::Close(frame)) => {
                    tracing::debug!(?frame, "Server closed live update stream");
                    return None;
                }
                // Ping/pong are answered by tungstenite itself
                Ok(_) => continue,
                Err(e) => return Some(Err(SubscriptionError::Transport(e.to_string()))),
            }
        }
        None
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "Error while closing live update stream");
        }
    }
}

/// Connector that replays frames pushed into an in-process channel
///
/// Only one transport can be opened per connector. Dropping every sender ends
/// the stream the same way a server close would.
pub struct ChannelConnector {
    feed: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    connected_url: Mutex<Option<String>>,
    closed: Arc<AtomicBool>,
}

impl ChannelConnector {
    /// Create a connector and the sender that feeds it
    pub fn new() -> (Self, mpsc::UnboundedSender<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Self {
            feed: Mutex::new(Some(rx)),
            connected_url: Mutex::new(None),
            closed: Arc::new(AtomicBool::new(false)),
        };
        (connector, tx)
    }

    /// URL passed to the last successful `connect`
    pub fn connected_url(&self) -> Option<String> {
        self.connected_url.lock().ok().and_then(|url| url.clone())
    }

    /// Whether the client closed the transport
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ChannelConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, SubscriptionError> {
        let feed = self
            .feed
            .lock()
            .ok()
            .and_then(|mut feed| feed.take())
            .ok_or_else(|| SubscriptionError::Connect {
                url: url.to_string(),
                error: "channel feed already in use".to_string(),
            })?;

        if let Ok(mut connected) = self.connected_url.lock() {
            *connected = Some(url.to_string());
        }

        Ok(Box::new(ChannelTransport {
            feed,
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct ChannelTransport {
    feed: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn next_text(&mut self) -> Option<Result<String, SubscriptionError>> {
        self.feed.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        self.feed.close();
        self.closed.store(true, Ordering::SeqCst);
    }
}
