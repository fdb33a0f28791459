//! Constructors for the application.

use super::PanelApp;
use crate::config::Config;
use crate::controls::ControlFlags;
use crate::obs::ObsClient;
use crate::state::{ConnectionState, PanelChannels};

impl PanelApp {
    /// Create the panel and start connecting to the configured OBS instance.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        rt: tokio::runtime::Handle,
    ) -> Self {
        let channels = PanelChannels::new();
        let client = ObsClient::spawn(
            config.url(),
            channels.sender(),
            cc.egui_ctx.clone(),
            &rt,
        );
        Self::with_client(client, rt, channels, config.url())
    }

    /// Internal constructor shared by [`PanelApp::new`] and the tests, which
    /// wire in a detached client instead of a live connection.
    pub(super) fn with_client(
        client: ObsClient,
        rt: tokio::runtime::Handle,
        channels: PanelChannels,
        target: String,
    ) -> Self {
        Self {
            client,
            rt,
            channels,
            target,
            connection_state: ConnectionState::Disconnected,
            video_name: String::new(),
            scene_text: String::new(),
            template_display: String::new(),
            controls: ControlFlags::disabled(),
        }
    }
}
