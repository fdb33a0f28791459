//! Update logic and message handling.

use egui::Context;
use slate_types::{FilenameTemplate, Request, RequestKind, StatusUpdate};

use super::PanelApp;
use crate::controls::{nav_buttons, ControlFlags};
use crate::state::PanelMessage;

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Process all pending messages from the connection task
        while let Ok(msg) = self.channels.rx.try_recv() {
            self.handle_message(msg, ctx);
        }

        self.render_panel(ctx);
    }
}

impl PanelApp {
    /// Apply one message from the connection task to the panel state.
    pub(super) fn handle_message(&mut self, message: PanelMessage, ctx: &Context) {
        match message {
            PanelMessage::ConnectionChanged(state) => {
                tracing::info!("Connection state changed: {}", state.description());
                self.connection_state = state;
                if state.is_connected() {
                    // Resync the display with whatever OBS currently has
                    self.request_format(ctx);
                } else {
                    self.controls = ControlFlags::disabled();
                }
            }
            PanelMessage::Reply { request, response } => match request {
                RequestKind::GetFilenameFormatting => {
                    let format = response.filename_formatting.unwrap_or_default();
                    self.receive_format(&format);
                }
                RequestKind::SetFilenameFormatting => {
                    // Confirmed; read back what OBS actually stored
                    self.request_format(ctx);
                }
            },
            PanelMessage::Status(update) => match update {
                StatusUpdate::RecordingStarting => {
                    tracing::info!("Recording starting, locking the panel");
                    self.controls = ControlFlags::disabled();
                }
                StatusUpdate::RecordingStopped => {
                    tracing::info!("Recording stopped, moving to the next scene");
                    self.bump_scene(true, ctx);
                }
                StatusUpdate::Unknown => {}
            },
        }
    }

    /// Ask OBS for the current filename format; the reply comes back as a
    /// panel message.
    pub(super) fn request_format(&self, ctx: &Context) {
        self.client.send_as_event(
            Request::GetFilenameFormatting,
            self.channels.sender(),
            ctx.clone(),
            &self.rt,
        );
    }

    /// Handle a format string reported by OBS. The raw string is always
    /// displayed; the fields are only filled when it has the template shape.
    pub(super) fn receive_format(&mut self, format: &str) {
        tracing::info!("Filename format is now '{}'", format);
        self.template_display = format.to_string();
        if let Some(template) = FilenameTemplate::parse(format) {
            self.video_name = template.video_name;
            self.scene_text = template.scene.to_string();
        }
        self.apply_name_cascade();
    }

    /// Step the scene number. A blank or unparseable field counts as 0, so
    /// the first step forward lands on scene 1.
    pub(super) fn bump_scene(&mut self, increment: bool, ctx: &Context) {
        let current = self.scene_text.trim().parse::<i64>().unwrap_or(0);
        let bumped = if increment { current + 1 } else { current - 1 };
        self.scene_text = bumped.to_string();
        self.update_nav_buttons();
        self.send_template(ctx);
    }

    /// Build the template from the fields and send it. Aborts quietly when
    /// the fields do not make a valid template. On a send the controls lock
    /// until the confirmation round-trip re-enables them.
    pub(super) fn send_template(&mut self, ctx: &Context) {
        let Some(template) = FilenameTemplate::from_fields(&self.video_name, &self.scene_text)
        else {
            return;
        };
        let format = template.render();
        tracing::info!("Requesting filename format '{}'", format);
        self.controls = ControlFlags::disabled();
        self.client.send_as_event(
            Request::SetFilenameFormatting {
                filename_formatting: format,
            },
            self.channels.sender(),
            ctx.clone(),
            &self.rt,
        );
    }

    /// Re-derive all four control flags from the current field values.
    pub(super) fn apply_name_cascade(&mut self) {
        self.controls = ControlFlags::for_input(&self.video_name, &self.scene_text);
    }

    /// Re-derive just the navigation buttons from the scene field.
    pub(super) fn update_nav_buttons(&mut self) {
        let (prev, next) = nav_buttons(&self.scene_text);
        self.controls.prev_button = prev;
        self.controls.next_button = next;
    }
}
