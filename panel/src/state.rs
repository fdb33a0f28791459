//! Application state and channel-based IPC for async operations.

use std::sync::mpsc::{channel, Receiver, Sender};

use slate_types::{RequestKind, Response, StatusUpdate};

/// Messages sent from the connection task to the UI thread.
#[derive(Debug)]
pub enum PanelMessage {
    /// WebSocket connection state changed
    ConnectionChanged(ConnectionState),
    /// A request completed and its response is delivered as an event
    Reply {
        request: RequestKind,
        response: Response,
    },
    /// Status update pushed by OBS
    Status(StatusUpdate),
}

/// WebSocket connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connected to OBS
    Connected,
    /// Not connected, retrying in the background
    Disconnected,
}

impl ConnectionState {
    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Get a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

/// Channels for communication between the connection task and the UI thread.
pub struct PanelChannels {
    /// Sender cloned into async tasks
    pub tx: Sender<PanelMessage>,
    /// Receiver drained by the UI thread every frame
    pub rx: Receiver<PanelMessage>,
}

impl PanelChannels {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Get a sender for use in async contexts
    pub fn sender(&self) -> Sender<PanelMessage> {
        self.tx.clone()
    }
}

impl Default for PanelChannels {
    fn default() -> Self {
        Self::new()
    }
}
