//! Unified error type for the storyboard engine.
//!
//! Every operation fails with one of the kinds below; all of them are
//! terminal for the triggering request (the target moves to
//! `RequestState::Failed` and must be resubmitted explicitly).

use crate::backend::BackendError;
use crate::session::Target;
use std::fmt;
use thiserror::Error;

/// Which user-supplied text input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    StoryIdea,
    BranchIdea,
    SplitShotInstruction,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::StoryIdea => "story idea",
            InputField::BranchIdea => "branch idea",
            InputField::SplitShotInstruction => "split-shot instruction",
        };
        write!(f, "{}", name)
    }
}

/// Unified error type for the storyboard engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The story/branch idea is blank after trimming. Rejected before any
    /// backend call is made.
    #[error("empty {field}: input is blank after trimming")]
    EmptyInput { field: InputField },

    /// A branch or split-shot was requested before any root storyboard
    /// exists.
    #[error("no root storyboard has been generated yet")]
    MissingRoot,

    /// The requested panel index does not address a panel of the current
    /// root storyboard.
    #[error("panel index {index} out of range for a {len}-panel storyboard")]
    PanelIndexOutOfRange { index: usize, len: usize },

    /// Another generation request is still pending. One generation is
    /// allowed system-wide at any instant; resubmit once it resolves.
    #[error("a generation request is already pending for {0}")]
    RequestInFlight(Target),

    /// The backend capability itself failed. Never retried.
    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),

    /// Backend output could not be parsed as structured data.
    #[error("backend output is not parseable as JSON: {detail}")]
    BackendFormat { detail: String },

    /// A panel object is missing a required field or carries the wrong
    /// primitive type. `path` points into the raw response document.
    #[error("malformed panel at {path}: {detail}")]
    MalformedPanel { path: String, detail: String },

    /// Panel numbering is non-contiguous, non-ascending, empty, or starts
    /// at the wrong offset.
    #[error("malformed storyboard: {detail}")]
    MalformedStoryboard { detail: String },
}

impl Error {
    /// The presentation-facing message for this error.
    ///
    /// Format-level detail (raw backend output, JSON paths) is deliberately
    /// not exposed here; it stays in the `Display` impl and the failed
    /// request state for logs.
    pub fn user_message(&self) -> String {
        match self {
            Error::EmptyInput { field } => match field {
                InputField::StoryIdea => "请输入您的故事构思。".to_string(),
                InputField::BranchIdea => "请输入新的故事走向。".to_string(),
                InputField::SplitShotInstruction => "请输入新镜头描述。".to_string(),
            },
            Error::MissingRoot => "请先生成分镜脚本。".to_string(),
            Error::PanelIndexOutOfRange { .. } => "分镜编号超出范围。".to_string(),
            Error::RequestInFlight(_) => "已有生成任务进行中，请等待其完成。".to_string(),
            Error::Backend(e) => format!("生成分镜失败。后端错误：{}", e),
            Error::BackendFormat { .. }
            | Error::MalformedPanel { .. }
            | Error::MalformedStoryboard { .. } => "生成分镜时发生未知错误。".to_string(),
        }
    }
}
