//! Enabled-state derivation for the four panel controls.
//!
//! Pure functions from field text to widget flags. The rendering layer
//! applies the flags; nothing here touches widgets.

/// Enabled flags for the four recording controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFlags {
    /// Video name text field
    pub name_field: bool,
    /// Scene number text field
    pub scene_field: bool,
    /// Previous-scene button
    pub prev_button: bool,
    /// Next-scene button
    pub next_button: bool,
}

impl ControlFlags {
    /// All four controls disabled: disconnected, recording in progress, or a
    /// template send awaiting confirmation.
    pub fn disabled() -> Self {
        Self {
            name_field: false,
            scene_field: false,
            prev_button: false,
            next_button: false,
        }
    }

    /// Derive flags from the current field values once the panel is live.
    ///
    /// Everything hangs off the video name: with a blank name there is
    /// nothing to send, so the scene controls stay off.
    pub fn for_input(video_name: &str, scene_text: &str) -> Self {
        if video_name.trim().is_empty() {
            return Self {
                name_field: true,
                scene_field: false,
                prev_button: false,
                next_button: false,
            };
        }
        let (prev_button, next_button) = nav_buttons(scene_text);
        Self {
            name_field: true,
            scene_field: true,
            prev_button,
            next_button,
        }
    }

    #[allow(dead_code)]
    pub fn all_disabled(&self) -> bool {
        !(self.name_field || self.scene_field || self.prev_button || self.next_button)
    }
}

/// Enabled state `(prev, next)` for the navigation buttons given the scene
/// field text. Both are off unless the field holds a non-negative integer;
/// previous is additionally off at scene 1 and below, since scene numbers
/// start at 1.
pub fn nav_buttons(scene_text: &str) -> (bool, bool) {
    match scene_text.trim().parse::<i64>() {
        Ok(scene) if scene < 0 => (false, false),
        Ok(scene) if scene <= 1 => (false, true),
        Ok(_) => (true, true),
        Err(_) => (false, false),
    }
}
