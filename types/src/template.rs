//! Parsing and rendering of the recording filename template.

use once_cell::sync::Lazy;
use regex::Regex;

static TEMPLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%hh%mm_(.*)_Scene_(\d+)$").unwrap());

/// A recording filename template of the form `%hh%mm_<Name>_Scene_<N>`.
///
/// `%hh` and `%mm` are placeholder tokens OBS expands at recording time;
/// they pass through here untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    /// Video name with spaces between words, title-cased on the way in
    pub video_name: String,
    /// Scene number, always >= 1
    pub scene: i64,
}

impl FilenameTemplate {
    /// Build a template from the raw form fields.
    ///
    /// Returns `None` when the name is empty after trimming or the scene
    /// text does not hold an integer >= 1.
    pub fn from_fields(video_name: &str, scene_text: &str) -> Option<Self> {
        let video_name = title_case(video_name.trim());
        if video_name.is_empty() {
            return None;
        }
        let scene = scene_text.trim().parse::<i64>().ok()?;
        if scene < 1 {
            return None;
        }
        Some(Self { video_name, scene })
    }

    /// Render the format string sent to OBS. Whitespace joins with
    /// underscores and the result is run through the filename sanitizer.
    pub fn render(&self) -> String {
        let joined: String = self
            .video_name
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!(
            "%hh%mm_{}_Scene_{}",
            sanitize_filename::sanitize(joined),
            self.scene
        )
    }

    /// Parse a format string reported by OBS.
    ///
    /// Returns `None` when the string does not have the template shape, in
    /// which case the caller keeps whatever it was already showing.
    pub fn parse(format: &str) -> Option<Self> {
        let captures = TEMPLATE_RE.captures(format)?;
        let video_name = captures[1].replace('_', " ");
        let scene = captures[2].parse::<i64>().ok()?;
        Some(Self { video_name, scene })
    }
}

/// Uppercase the first letter of each whitespace-delimited word.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
