//! Main application structure.

mod constructors;
mod rendering;
mod update;

use crate::controls::ControlFlags;
use crate::obs::ObsClient;
use crate::state::{ConnectionState, PanelChannels};

/// The Slate control panel application.
pub struct PanelApp {
    /// Handle used to issue requests to OBS
    client: ObsClient,
    /// Runtime the connection tasks run on
    rt: tokio::runtime::Handle,
    /// Channel-based state management
    channels: PanelChannels,
    /// Address of the OBS instance, shown in the status bar
    target: String,
    /// Connection state
    connection_state: ConnectionState,
    /// Video name field contents
    video_name: String,
    /// Scene number field contents
    scene_text: String,
    /// Last format string reported by OBS, shown verbatim
    template_display: String,
    /// Enabled flags for the four controls
    controls: ControlFlags,
}
