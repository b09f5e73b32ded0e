//! Generation orchestrator.
//!
//! [`StoryboardGenerator`] sequences compiler → backend call → validator →
//! session update for the three operations the presentation layer sees:
//! generate root, generate branch, generate split-shot. Methods take
//! `&self`; the session lives behind a lock that is held only for state
//! transitions, never across the backend call, so state stays readable
//! while a generation is in flight.

use crate::backend::GenerativeBackend;
use crate::error::Error;
use crate::model::{Panel, Storyboard};
use crate::options::{Emotion, RootConfig};
use crate::prompt;
use crate::response::ResponseValidator;
use crate::schema::panel_array_schema;
use crate::session::{RequestState, SessionState, Target};
use crate::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Façade over the storyboard engine for one session.
///
/// Owns the session state (root storyboard, branch tree, request states)
/// and a shared handle to the backend capability. One generation is allowed
/// system-wide at any instant; a submission while another request is
/// pending fails with [`Error::RequestInFlight`] and changes nothing.
pub struct StoryboardGenerator {
    backend: Arc<dyn GenerativeBackend>,
    session: Mutex<SessionState>,
}

impl StoryboardGenerator {
    pub fn new(backend: impl GenerativeBackend + 'static) -> Self {
        Self::with_shared_backend(Arc::new(backend))
    }

    /// Build over an already-shared backend handle.
    pub fn with_shared_backend(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            session: Mutex::new(SessionState::new()),
        }
    }

    /// Generate a fresh root storyboard from a story idea.
    ///
    /// Beginning the request discards every existing branch; on success the
    /// new root is installed wholesale, on failure the previous root (if
    /// any) stays in place with an empty branch tree.
    pub async fn generate_root(&self, story_idea: &str, config: &RootConfig) -> Result<Storyboard> {
        self.session.lock().await.begin_root(story_idea)?;
        info!(
            aspect_ratio = %config.aspect_ratio,
            style = %config.style,
            composition = config.composition.map(|c| c.as_str()).unwrap_or("free"),
            "root generation started"
        );

        let request = prompt::compile_root_request(story_idea, config);
        let result = self.call_backend(&request, 1).await;

        let mut session = self.session.lock().await;
        match result {
            Ok(storyboard) => {
                info!(panels = storyboard.len(), "root generation completed");
                session.complete_root(storyboard.clone());
                Ok(storyboard)
            }
            Err(err) => {
                warn!(error = %err, "root generation failed");
                session.fail_root(err.user_message());
                Err(err)
            }
        }
    }

    /// Generate an alternate continuation branching after root panel
    /// `index` (0-based).
    ///
    /// The returned storyboard is numbered from `root_len + 1` and replaces
    /// any branch previously generated at the same index. The root
    /// storyboard is read-only to this operation.
    pub async fn generate_branch(
        &self,
        index: usize,
        branch_idea: &str,
        emotion: Option<Emotion>,
    ) -> Result<Storyboard> {
        let (context, root_len) = self.session.lock().await.begin_branch(index, branch_idea)?;
        info!(
            index,
            emotion = emotion.map(|e| e.as_str()).unwrap_or("unspecified"),
            "branch generation started"
        );

        let next_panel = root_len as u32 + 1;
        let request = prompt::compile_branch_request(&context, branch_idea, emotion, next_panel);
        let result = self.call_backend(&request, next_panel).await;

        let mut session = self.session.lock().await;
        match result {
            Ok(storyboard) => {
                info!(index, panels = storyboard.len(), "branch generation completed");
                session.complete_branch(index, storyboard.clone());
                Ok(storyboard)
            }
            Err(err) => {
                warn!(index, error = %err, "branch generation failed");
                session.fail_branch(index, err.user_message());
                Err(err)
            }
        }
    }

    /// Generate one extra shot inserted after root panel `index` (0-based).
    ///
    /// Root-targeted: the backend returns a single panel, which is spliced
    /// after `index` and the whole sequence renumbered locally; the result
    /// replaces the root wholesale and the branch tree is discarded.
    pub async fn generate_split_shot(&self, index: usize, instruction: &str) -> Result<Storyboard> {
        let panels = self
            .session
            .lock()
            .await
            .begin_split_shot(index, instruction)?;
        info!(index, "split-shot generation started");

        let request = prompt::compile_split_shot_request(&panels, index, instruction);
        let result = match self.call_backend(&request, 1).await {
            Ok(shot) => splice_shot(panels, index, shot),
            Err(err) => Err(err),
        };

        let mut session = self.session.lock().await;
        match result {
            Ok(storyboard) => {
                info!(index, panels = storyboard.len(), "split-shot generation completed");
                session.complete_root(storyboard.clone());
                Ok(storyboard)
            }
            Err(err) => {
                warn!(index, error = %err, "split-shot generation failed");
                session.fail_root(err.user_message());
                Err(err)
            }
        }
    }

    /// The current root storyboard, if one has been generated.
    pub async fn root_storyboard(&self) -> Option<Storyboard> {
        self.session.lock().await.root().cloned()
    }

    /// The active branch at `index`, if any.
    pub async fn branch_storyboard(&self, index: usize) -> Option<Storyboard> {
        self.session.lock().await.branch(index).cloned()
    }

    /// All active branches, ordered by panel index.
    pub async fn branches(&self) -> Vec<(usize, Storyboard)> {
        self.session
            .lock()
            .await
            .branches()
            .map(|(i, sb)| (i, sb.clone()))
            .collect()
    }

    /// Request state of a target.
    pub async fn request_state(&self, target: Target) -> RequestState {
        let session = self.session.lock().await;
        match target {
            Target::Root => session.root_state().clone(),
            Target::Branch(index) => session.branch_state(index),
        }
    }

    /// The target currently holding the in-flight slot, if any.
    pub async fn in_flight(&self) -> Option<Target> {
        self.session.lock().await.in_flight()
    }

    async fn call_backend(&self, request: &str, expected_start: u32) -> Result<Storyboard> {
        let schema = panel_array_schema(expected_start);
        let raw = self.backend.generate(request, &schema).await?;
        ResponseValidator::new(expected_start).validate(&raw)
    }
}

/// Splice a generated shot after `index` and renumber the sequence.
fn splice_shot(panels: Vec<Panel>, index: usize, shot: Storyboard) -> Result<Storyboard> {
    if shot.len() != 1 {
        return Err(Error::MalformedStoryboard {
            detail: format!("split-shot response must contain exactly one panel, got {}", shot.len()),
        });
    }
    let mut spliced = panels;
    spliced.insert(index + 1, shot.panels()[0].clone());
    Storyboard::renumbered(spliced)
}
