//! # storyboard-engine
//!
//! 分镜脚本生成与分支引擎：把一句故事构思变成结构化的多格分镜脚本，并支持从任意
//! 分镜处生成替代走向的分支。
//!
//! Storyboard generation and branching engine: turns a short natural-language
//! story premise into a structured multi-panel storyboard script (scene,
//! camera, action, dialogue, and two generation prompts per panel) and lets
//! the caller branch the narrative from any panel into an alternate
//! continuation while preserving visual and narrative continuity.
//!
//! ## Overview
//!
//! The engine owns the storyboard data model, the prompt compiler, the
//! response validator, and the branch-tree/request state machine. The
//! generative backend is an opaque capability behind the
//! [`GenerativeBackend`] trait: given a prompt and a response schema it
//! returns a schema-conforming JSON document or fails. Rendering, layout,
//! and persistence are the embedding application's concern.
//!
//! ## Core Rules
//!
//! - **Instruction-only consistency**: visual continuity is enforced by
//!   compiling a locked subject/scene directive into every request, never by
//!   inspecting prose after the fact. The validator checks shape only.
//! - **Atomic storyboards**: a storyboard is installed wholesale or not at
//!   all; panels are never patched in place.
//! - **One generation at a time**: a single in-flight slot covers the root
//!   and every branch index; concurrent submissions are rejected.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storyboard_engine::{
//!     AspectRatio, GeminiBackend, RootConfig, StoryboardGenerator, Style,
//! };
//!
//! #[tokio::main]
//! async fn main() -> storyboard_engine::Result<()> {
//!     let backend = GeminiBackend::new("gemini-2.5-flash")?;
//!     let generator = StoryboardGenerator::new(backend);
//!
//!     let config = RootConfig::new(AspectRatio::Landscape, Style::Photorealistic);
//!     let storyboard = generator
//!         .generate_root("一只柯基在晚上发现一辆没开车灯的汽车，并吠叫着阻止主人过马路。", &config)
//!         .await?;
//!
//!     for panel in storyboard.panels() {
//!         println!("分镜 {}: {}", panel.panel, panel.action);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Panel and storyboard types with numbering invariants |
//! | [`options`] | Configuration enumerations and per-call request records |
//! | [`prompt`] | Deterministic request-text compilation |
//! | [`schema`] | Response-schema construction for the backend contract |
//! | [`response`] | Shape validation of raw backend output |
//! | [`session`] | Branch tree and request-lifecycle state machine |
//! | [`generator`] | Orchestrating façade over compile → call → validate |
//! | [`backend`] | Backend capability trait and the Gemini transport |

pub mod backend;
pub mod generator;
pub mod model;
pub mod options;
pub mod prompt;
pub mod response;
pub mod schema;
pub mod session;

// Re-export main types for convenience
pub use backend::{BackendError, GeminiBackend, GenerativeBackend};
pub use generator::StoryboardGenerator;
pub use model::{Panel, Storyboard};
pub use options::{AspectRatio, Composition, Emotion, Language, RootConfig, Style};
pub use session::{RequestState, Target};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, InputField};
