//! Shared types for the Slate OBS control panel.
//!
//! Wire structures for the obs-websocket 4.x protocol and the recording
//! filename template the panel manages.

/// Default port of the obs-websocket server.
pub const DEFAULT_PORT: u16 = 4444;

pub mod protocol;
pub mod template;

pub use protocol::{
    Request, RequestEnvelope, RequestKind, Response, ResponseStatus, ServerMessage, StatusUpdate,
};
pub use template::FilenameTemplate;
