//! Wire types for the obs-websocket 4.x protocol.
//!
//! Requests are JSON objects tagged `request-type` and carry a client-chosen
//! `message-id` that the matching response echoes back. Unsolicited events
//! are tagged `update-type` instead, which is how the two are told apart.

use serde::{Deserialize, Serialize};

/// Requests the panel issues to OBS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request-type")]
pub enum Request {
    /// Ask OBS for the current recording filename format
    GetFilenameFormatting,
    /// Ask OBS to change the recording filename format
    SetFilenameFormatting {
        #[serde(rename = "filename-formatting")]
        filename_formatting: String,
    },
}

impl Request {
    /// The kind tag used to route the response back to the panel.
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::GetFilenameFormatting => RequestKind::GetFilenameFormatting,
            Request::SetFilenameFormatting { .. } => RequestKind::SetFilenameFormatting,
        }
    }
}

/// Request name without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    GetFilenameFormatting,
    SetFilenameFormatting,
}

impl RequestKind {
    /// Wire name of the request.
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::GetFilenameFormatting => "GetFilenameFormatting",
            RequestKind::SetFilenameFormatting => "SetFilenameFormatting",
        }
    }
}

/// A request paired with its correlation id, as sent on the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(rename = "message-id")]
    pub message_id: String,
    #[serde(flatten)]
    pub request: Request,
}

/// Outcome status OBS reports in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Response to a request, correlated by `message-id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Response {
    #[serde(rename = "message-id")]
    pub message_id: String,
    pub status: ResponseStatus,
    /// Error description, present when the status is `error`
    #[serde(default)]
    pub error: Option<String>,
    /// Current format string, present in `GetFilenameFormatting` replies
    #[serde(rename = "filename-formatting", default)]
    pub filename_formatting: Option<String>,
}

/// Unsolicited status updates pushed by OBS.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "update-type")]
pub enum StatusUpdate {
    /// A recording is about to start
    RecordingStarting,
    /// The recording stopped
    RecordingStopped,
    /// Any update type the panel does not react to
    #[serde(other)]
    Unknown,
}

impl StatusUpdate {
    /// Get a human-readable description of the update.
    pub fn description(&self) -> &'static str {
        match self {
            StatusUpdate::RecordingStarting => "Recording starting",
            StatusUpdate::RecordingStopped => "Recording stopped",
            StatusUpdate::Unknown => "Unrecognized status update",
        }
    }
}

/// Any message OBS sends over the socket.
///
/// Responses carry `message-id` and `status` while events carry
/// `update-type`, so untagged deserialization picks the right arm.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Reply to a request the panel sent
    Reply(Response),
    /// Unsolicited event
    Update(StatusUpdate),
}
