//! Branch tree and request-lifecycle state machine.
//!
//! One session owns one root storyboard, its branch tree, and the request
//! state for every generation target. The branch tree is deliberately flat:
//! branches hang off root panel indices and cannot themselves host
//! sub-branches. The whole tree is discarded the moment a root-replacing
//! request begins, so a reader can never pair a root storyboard with
//! branches computed against a different root.
//!
//! State machine per target: `Idle → Pending → { Idle-with-result,
//! Failed(msg) }`, `Failed → Pending` on resubmission. There is no
//! cancellation: once a request is pending it resolves only by success or
//! failure.

use crate::error::{Error, InputField};
use crate::model::{Panel, Storyboard};
use std::collections::BTreeMap;
use std::fmt;

/// The addressee of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The root storyboard (also claimed by split-shot requests, which
    /// replace the root wholesale).
    Root,
    /// The branch hanging off the given 0-based root panel index.
    Branch(usize),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Root => write!(f, "the root storyboard"),
            Target::Branch(index) => write!(f, "the branch at panel index {}", index),
        }
    }
}

/// Request lifecycle state for one target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestState::Failed(_))
    }
}

/// Session-owned storyboard state: the root, its branches, and per-target
/// request states.
///
/// Transitions are driven by the orchestrator; this type enforces the
/// preconditions (non-blank input, root present, index in range, in-flight
/// slot free) and keeps the tree/state bookkeeping atomic with respect to
/// one caller at a time.
#[derive(Debug, Default)]
pub struct SessionState {
    root: Option<Storyboard>,
    root_state: RequestState,
    branches: BTreeMap<usize, Storyboard>,
    branch_states: BTreeMap<usize, RequestState>,
    in_flight: Option<Target>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current root storyboard, if one has been generated.
    pub fn root(&self) -> Option<&Storyboard> {
        self.root.as_ref()
    }

    /// The active branch at `index`, if any.
    pub fn branch(&self, index: usize) -> Option<&Storyboard> {
        self.branches.get(&index)
    }

    /// All active branches, ordered by panel index.
    pub fn branches(&self) -> impl Iterator<Item = (usize, &Storyboard)> {
        self.branches.iter().map(|(i, sb)| (*i, sb))
    }

    pub fn root_state(&self) -> &RequestState {
        &self.root_state
    }

    /// Request state for a branch index; untouched indices are `Idle`.
    pub fn branch_state(&self, index: usize) -> RequestState {
        self.branch_states.get(&index).cloned().unwrap_or_default()
    }

    /// The target currently holding the single system-wide in-flight slot.
    pub fn in_flight(&self) -> Option<Target> {
        self.in_flight
    }

    /// Begin a root generation: reject blank input, claim the in-flight
    /// slot, and discard every branch in the same transition.
    ///
    /// The in-flight check comes first: while any generation is pending,
    /// every submission is rejected as [`Error::RequestInFlight`] before
    /// its own preconditions are looked at.
    pub fn begin_root(&mut self, idea: &str) -> Result<(), Error> {
        self.ensure_slot_free()?;
        if idea.trim().is_empty() {
            return Err(Error::EmptyInput {
                field: InputField::StoryIdea,
            });
        }
        self.in_flight = Some(Target::Root);
        self.clear_branches();
        self.root_state = RequestState::Pending;
        Ok(())
    }

    /// Begin a split-shot request. Root-targeted: the result replaces the
    /// root wholesale, so the branch tree is discarded here exactly as for
    /// a root regeneration.
    ///
    /// Returns a snapshot of the full current panel sequence; the engine
    /// splices the generated shot into it locally.
    pub fn begin_split_shot(&mut self, index: usize, instruction: &str) -> Result<Vec<Panel>, Error> {
        self.ensure_slot_free()?;
        if instruction.trim().is_empty() {
            return Err(Error::EmptyInput {
                field: InputField::SplitShotInstruction,
            });
        }
        let context = self.panel_context(index)?;
        self.in_flight = Some(Target::Root);
        self.clear_branches();
        self.root_state = RequestState::Pending;
        Ok(context)
    }

    /// Install a new root storyboard and release the slot.
    pub fn complete_root(&mut self, storyboard: Storyboard) {
        self.root = Some(storyboard);
        self.root_state = RequestState::Idle;
        self.in_flight = None;
    }

    /// Record a root failure and release the slot. Nothing is installed.
    pub fn fail_root(&mut self, message: String) {
        self.root_state = RequestState::Failed(message);
        self.in_flight = None;
    }

    /// Begin a branch generation at `index`.
    ///
    /// Returns the ground-truth context slice (root panels up to and
    /// including the branch point) plus the root length, snapshotted in the
    /// same transition that claims the slot so they can never mix roots
    /// with the request they feed. Branch numbering continues after the
    /// whole root (`root_len + 1`), not after the branch point.
    pub fn begin_branch(&mut self, index: usize, idea: &str) -> Result<(Vec<Panel>, usize), Error> {
        self.ensure_slot_free()?;
        if idea.trim().is_empty() {
            return Err(Error::EmptyInput {
                field: InputField::BranchIdea,
            });
        }
        let panels = self.panel_context(index)?;
        self.in_flight = Some(Target::Branch(index));
        self.branch_states.insert(index, RequestState::Pending);
        let root_len = panels.len();
        let mut context = panels;
        context.truncate(index + 1);
        Ok((context, root_len))
    }

    /// Install (or replace) the branch at `index` and release the slot.
    pub fn complete_branch(&mut self, index: usize, storyboard: Storyboard) {
        self.branches.insert(index, storyboard);
        self.branch_states.insert(index, RequestState::Idle);
        self.in_flight = None;
    }

    /// Record a branch failure and release the slot. An existing branch at
    /// the same index stays untouched.
    pub fn fail_branch(&mut self, index: usize, message: String) {
        self.branch_states.insert(index, RequestState::Failed(message));
        self.in_flight = None;
    }

    fn ensure_slot_free(&self) -> Result<(), Error> {
        match self.in_flight {
            Some(holder) => Err(Error::RequestInFlight(holder)),
            None => Ok(()),
        }
    }

    fn panel_context(&self, index: usize) -> Result<Vec<Panel>, Error> {
        let root = self.root.as_ref().ok_or(Error::MissingRoot)?;
        if index >= root.len() {
            return Err(Error::PanelIndexOutOfRange {
                index,
                len: root.len(),
            });
        }
        Ok(root.panels().to_vec())
    }

    fn clear_branches(&mut self) {
        self.branches.clear();
        self.branch_states.clear();
    }
}
