//! Configuration enumerations and per-call request records.
//!
//! The lists are closed: they mirror the options the presentation layer
//! offers, using the product's Chinese labels as the canonical string form.
//! The `不指定` ("unspecified") sentinel never enters core logic — optional
//! directives are `Option<Composition>` / `Option<Emotion>`, and the
//! sentinel exists only at the label boundary ([`Composition::parse_label`],
//! [`Emotion::parse_label`]).

use serde::{Deserialize, Serialize};

/// Label of the "no directive" option in presentation-facing option lists.
pub const UNSPECIFIED_LABEL: &str = "不指定";

/// Output frame orientation. Passed into the prompt as a directive only —
/// the engine performs no geometric processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 9:16 竖屏
    #[serde(rename = "9:16")]
    Portrait,
    /// 16:9 横屏
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 2] = [AspectRatio::Portrait, AspectRatio::Landscape];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "9:16" => Ok(AspectRatio::Portrait),
            "16:9" => Ok(AspectRatio::Landscape),
            _ => Err(format!("unknown aspect ratio: {}", s)),
        }
    }
}

/// Visual style of the whole storyboard. Passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "写实照片")]
    Photorealistic,
    #[serde(rename = "美国电影写真")]
    AmericanCinematic,
    #[serde(rename = "印度电影写真")]
    IndianCinematic,
    #[serde(rename = "赛博朋克")]
    Cyberpunk,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Photorealistic,
        Style::AmericanCinematic,
        Style::IndianCinematic,
        Style::Cyberpunk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Photorealistic => "写实照片",
            Style::AmericanCinematic => "美国电影写真",
            Style::IndianCinematic => "印度电影写真",
            Style::Cyberpunk => "赛博朋克",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "写实照片" => Ok(Style::Photorealistic),
            "美国电影写真" => Ok(Style::AmericanCinematic),
            "印度电影写真" => Ok(Style::IndianCinematic),
            "赛博朋克" => Ok(Style::Cyberpunk),
            _ => Err(format!("unknown style: {}", s)),
        }
    }
}

/// Camera composition to favor across the storyboard.
///
/// `None` at the request level means the backend chooses freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Composition {
    #[serde(rename = "特写")]
    CloseUp,
    #[serde(rename = "中景")]
    MediumShot,
    #[serde(rename = "全景")]
    WideShot,
    #[serde(rename = "过肩镜头")]
    OverShoulder,
    #[serde(rename = "鸟瞰视角")]
    BirdsEye,
}

impl Composition {
    pub const ALL: [Composition; 5] = [
        Composition::CloseUp,
        Composition::MediumShot,
        Composition::WideShot,
        Composition::OverShoulder,
        Composition::BirdsEye,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Composition::CloseUp => "特写",
            Composition::MediumShot => "中景",
            Composition::WideShot => "全景",
            Composition::OverShoulder => "过肩镜头",
            Composition::BirdsEye => "鸟瞰视角",
        }
    }

    /// Parse a presentation-facing label, mapping [`UNSPECIFIED_LABEL`] to
    /// `None`.
    pub fn parse_label(label: &str) -> Result<Option<Composition>, String> {
        if label == UNSPECIFIED_LABEL {
            return Ok(None);
        }
        label.parse().map(Some)
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Composition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Composition::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown composition: {}", s))
    }
}

/// Facial-emotion tone for branch generation.
///
/// `None` at the request level means no emotional directive is compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "夸张害怕")]
    Fear,
    #[serde(rename = "夸张担心")]
    Worry,
    #[serde(rename = "夸张惊吓")]
    Startled,
    #[serde(rename = "夸张嘲笑")]
    Mocking,
    #[serde(rename = "夸张怒视")]
    Glaring,
    #[serde(rename = "夸张畏缩")]
    Cowering,
    #[serde(rename = "夸张发抖")]
    Trembling,
    #[serde(rename = "夸张开心")]
    Joyful,
    #[serde(rename = "夸张流泪")]
    Tearful,
    #[serde(rename = "夸张委屈")]
    Aggrieved,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Fear,
        Emotion::Worry,
        Emotion::Startled,
        Emotion::Mocking,
        Emotion::Glaring,
        Emotion::Cowering,
        Emotion::Trembling,
        Emotion::Joyful,
        Emotion::Tearful,
        Emotion::Aggrieved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Fear => "夸张害怕",
            Emotion::Worry => "夸张担心",
            Emotion::Startled => "夸张惊吓",
            Emotion::Mocking => "夸张嘲笑",
            Emotion::Glaring => "夸张怒视",
            Emotion::Cowering => "夸张畏缩",
            Emotion::Trembling => "夸张发抖",
            Emotion::Joyful => "夸张开心",
            Emotion::Tearful => "夸张流泪",
            Emotion::Aggrieved => "夸张委屈",
        }
    }

    /// Parse a presentation-facing label, mapping [`UNSPECIFIED_LABEL`] to
    /// `None`.
    pub fn parse_label(label: &str) -> Result<Option<Emotion>, String> {
        if label == UNSPECIFIED_LABEL {
            return Ok(None);
        }
        label.parse().map(Some)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .iter()
            .find(|e| e.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown emotion: {}", s))
    }
}

/// Output language for all generated prose and prompts.
///
/// Compiled into every root request as a directive. Configurable so the
/// engine ports to other locales; the default matches the original product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self("中文".to_string())
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration snapshot for one root generation call.
///
/// Every call carries its own snapshot; two requests with different
/// configurations can never interfere through shared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    pub aspect_ratio: AspectRatio,
    pub style: Style,
    /// `None` lets the backend choose compositions freely.
    pub composition: Option<Composition>,
    pub language: Language,
}

impl RootConfig {
    pub fn new(aspect_ratio: AspectRatio, style: Style) -> Self {
        Self {
            aspect_ratio,
            style,
            composition: None,
            language: Language::default(),
        }
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = Some(composition);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}
