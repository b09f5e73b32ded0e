//! Deterministic request-text compilation.
//!
//! This module is intentionally dumb: it only formats text. No parsing, no
//! networking, no session logic. Visual and narrative consistency is
//! achieved *entirely through instruction* — the compiler embeds the locked
//! subject/scene directives into every request, and nothing downstream
//! verifies prose fidelity (the validator checks shape only). That trust
//! boundary is deliberate.

mod branch;
mod root;

pub use branch::{compile_branch_request, compile_split_shot_request};
pub use root::compile_root_request;

use crate::model::Panel;

/// Serialize context panels into the prompt as the ground-truth block.
fn context_json(context: &[Panel]) -> String {
    serde_json::to_string_pretty(context).unwrap_or_else(|_| "[]".to_string())
}

fn push_context_section(prompt: &mut String, context: &[Panel]) {
    prompt.push_str("## 已有分镜（事实基准）\n");
    prompt.push_str("以下是故事到目前为止的分镜，以 JSON 形式给出。新生成的画面必须与其中的视觉内容完全匹配：\n");
    prompt.push_str(&context_json(context));
    prompt.push_str("\n\n");
}

fn push_inferred_consistency_section(prompt: &mut String) {
    prompt.push_str("## 一致性保障系统 (CRITICAL)\n");
    prompt.push_str(
        "不要重新构思主体或场景。请从上述分镜的 scene 与 imagePrompt 文本中**推断**出已锁定的\
“核心主体”和“核心场景”描述，并在新生成的所有分镜描述和提示词中严格、重复地使用这些确切的描述，\
以保证场景、主体、样貌和颜色的绝对一致性。\n\n",
    );
}
