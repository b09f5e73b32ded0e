//! One storyboard beat, matching the backend wire format.

use serde::{Deserialize, Serialize};

/// One storyboard beat.
///
/// All text fields are non-null; absence is represented by the empty string
/// (`dialogue` in particular is often empty, never missing). `image_prompt`
/// is compiled to be self-contained: it restates the locked core-subject and
/// core-scene descriptions so the panel's key visuals can be regenerated
/// without reference to other panels. That is a content invariant carried by
/// prompt construction, not verified here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel number, contiguous ascending within its storyboard.
    pub panel: u32,
    /// Visual environment, time of day, who is present.
    pub scene: String,
    /// Shot, angle, movement.
    pub camera: String,
    /// What happens in this beat.
    pub action: String,
    /// Spoken lines; empty string when nobody speaks.
    pub dialogue: String,
    /// Text-to-image prompt for the panel's static key frame.
    #[serde(rename = "imagePrompt")]
    pub image_prompt: String,
    /// Image-to-video prompt describing only the motion from the key frame.
    #[serde(rename = "videoPrompt")]
    pub video_prompt: String,
}

impl Panel {
    /// Wire-format field names, in schema order.
    pub const FIELDS: [&'static str; 7] = [
        "panel",
        "scene",
        "camera",
        "action",
        "dialogue",
        "imagePrompt",
        "videoPrompt",
    ];

    /// Wire-format names of the six string fields (`panel` is the integer).
    pub const STRING_FIELDS: [&'static str; 6] = [
        "scene",
        "camera",
        "action",
        "dialogue",
        "imagePrompt",
        "videoPrompt",
    ];
}
