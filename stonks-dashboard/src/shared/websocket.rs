/// WebSocket connection manager for the Stonks backend event stream
///
/// Owns the single socket, keeps it alive with pings, and reconnects after a
/// fixed delay whenever it closes. Lifecycle transitions and text frames are
/// reported through one ordered channel of [`ConnectionEvent`]s.

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// WebSocket client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSocketConfig {
    /// WebSocket server URL
    pub url: String,
    /// Ping interval to keep connection alive
    pub ping_interval: Duration,
    /// Fixed delay before every reconnection attempt
    pub reconnect_delay: Duration,
    /// Maximum channel buffer size for events
    pub channel_buffer_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080/ws".to_string(),
            ping_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(10),
            channel_buffer_size: 1000,
        }
    }
}

impl WebSocketConfig {
    /// Create a new configuration with custom URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set ping interval
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Set reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set channel buffer size
    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size;
        self
    }
}

/// Connection status shown by the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
    Reconnecting,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Reconnecting => "reconnecting",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the connection manager reports, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Socket is open
    Opened,
    /// Raw text frame
    Message(String),
    /// Socket closed, or the connection attempt failed
    Closed,
    /// A retry is scheduled after `delay`
    Reconnecting { delay: Duration },
}

/// Owns the lifetime of the connection task.
///
/// Dropping the handle cancels a pending reconnect timer and closes the live socket.
#[derive(Debug)]
pub struct ConnectionHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionHandle {
    /// Stop the connection task and wait for it to finish
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// WebSocket client for dashboard events
pub struct WebSocketClient {
    config: WebSocketConfig,
    event_tx: mpsc::Sender<ConnectionEvent>,
    event_rx: mpsc::Receiver<ConnectionEvent>,
}

impl WebSocketClient {
    /// Create a new WebSocket client with custom configuration
    pub fn with_config(config: WebSocketConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.channel_buffer_size);

        Self {
            config,
            event_tx,
            event_rx,
        }
    }

    /// Start the connection task.
    ///
    /// Consumes the client, so a second connection can never be started from it.
    /// Returns the ordered event receiver and the handle owning the task.
    pub fn start(self) -> (mpsc::Receiver<ConnectionEvent>, ConnectionHandle) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_connection_loop(self.config, self.event_tx, shutdown_rx));

        (
            self.event_rx,
            ConnectionHandle {
                shutdown_tx,
                task: Some(task),
            },
        )
    }
}

/// How a single socket session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    ReceiverDropped,
}

/// Main connection loop: connect, read until close, wait, repeat forever
async fn run_connection_loop(
    config: WebSocketConfig,
    event_tx: mpsc::Sender<ConnectionEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(url = %config.url, "Starting connection manager");

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let end = tokio::select! {
            _ = shutdown_rx.changed() => break,
            end = run_session(&config, &event_tx) => end,
        };

        if end == SessionEnd::ReceiverDropped
            || event_tx.send(ConnectionEvent::Closed).await.is_err()
        {
            warn!("Event receiver dropped, stopping connection manager");
            break;
        }

        let delay = config.reconnect_delay;
        if event_tx
            .send(ConnectionEvent::Reconnecting { delay })
            .await
            .is_err()
        {
            break;
        }

        debug!("Waiting {:?} before reconnecting...", delay);
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    info!(url = %config.url, "Connection manager stopped");
}

/// Open one socket and forward its text frames until it closes
async fn run_session(
    config: &WebSocketConfig,
    event_tx: &mpsc::Sender<ConnectionEvent>,
) -> SessionEnd {
    let (ws_stream, _) = match connect_async(config.url.as_str()).await {
        Ok(connected) => connected,
        Err(e) => {
            warn!("Failed to connect to {}: {}", config.url, e);
            return SessionEnd::Closed;
        }
    };

    info!("Connected to {}", config.url);
    if event_tx.send(ConnectionEvent::Opened).await.is_err() {
        return SessionEnd::ReceiverDropped;
    }

    let (mut write, mut read) = ws_stream.split();
    let mut ping = interval_at(Instant::now() + config.ping_interval, config.ping_interval);

    loop {
        tokio::select! {
            _ = ping.tick() => {
                if write.send(Message::Ping(Vec::new().into())).await.is_err() {
                    debug!("Failed to send ping, connection likely dead");
                    return SessionEnd::Closed;
                }
            }
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if event_tx
                        .send(ConnectionEvent::Message(text.as_str().to_owned()))
                        .await
                        .is_err()
                    {
                        return SessionEnd::ReceiverDropped;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Server closed connection: {:?}", frame);
                    return SessionEnd::Closed;
                }
                Some(Ok(Message::Binary(bytes))) => {
                    debug!("Ignoring {} byte binary frame", bytes.len());
                }
                Some(Ok(_)) => {
                    // Heartbeat frames - tungstenite answers pings itself
                }
                Some(Err(e)) => {
                    warn!("WebSocket error: {}", e);
                    return SessionEnd::Closed;
                }
                None => {
                    info!("WebSocket stream ended");
                    return SessionEnd::Closed;
                }
            }
        }
    }
}
