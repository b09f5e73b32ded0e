//! Branch and split-shot request compilation.

use crate::model::Panel;
use crate::options::Emotion;
use crate::prompt::{push_context_section, push_inferred_consistency_section};

/// Compile the request text for an alternate continuation branching after
/// the last panel of `context`.
///
/// `context` is the root storyboard up to and including the branch point;
/// it is embedded verbatim as ground truth. The backend is told to infer
/// the locked subject/scene descriptions from it instead of inventing new
/// ones, so a branch stays visually continuous with the panels it grows
/// from. `next_panel` is `root_len + 1`: branch numbering continues after
/// the whole root storyboard, not after the branch point, so branch panel
/// numbers never collide with root panel numbers.
pub fn compile_branch_request(
    context: &[Panel],
    branch_idea: &str,
    emotion: Option<Emotion>,
    next_panel: u32,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("你正在为一个已有的分镜脚本创作替代走向的分支，表现“接下来发生了别的事”。\n\n");

    push_context_section(&mut prompt, context);
    push_inferred_consistency_section(&mut prompt);

    prompt.push_str("## 生成规则\n");
    prompt.push_str(&format!("- 新的故事走向：“{}”\n", branch_idea));
    if let Some(emotion) = emotion {
        prompt.push_str(&format!(
            "- **人物面部情绪**: 新分镜必须突出“{}”这一种情绪，并贯穿动作、表情、对话和镜头选择。\n",
            emotion
        ));
    }
    let last_panel = context.last().map(|p| p.panel).unwrap_or(0);
    prompt.push_str(&format!(
        "- **衔接**: 分支的第一格分镜必须直接承接第{}格分镜的画面与动势。\n",
        last_panel
    ));
    prompt.push_str(&format!(
        "- **编号**: 新分镜编号从{}开始，依次递增1。\n",
        next_panel
    ));
    prompt.push_str(
        "- **故事弧**: 分支需要包含一个自成一体的小故事弧（一般为2至4格分镜），并有自己的结局。\n\n",
    );

    push_array_only_output(&mut prompt);

    prompt
}

/// Compile the request text for one extra shot inserted after panel
/// `index` (0-based) of the current storyboard.
///
/// The backend returns exactly one panel numbered 1; the engine splices it
/// in and renumbers the whole sequence locally.
///
/// `index` must address a panel of `context` (the session validates this
/// before compilation).
pub fn compile_split_shot_request(context: &[Panel], index: usize, instruction: &str) -> String {
    let mut prompt = String::new();
    let after = context[index].panel;

    prompt.push_str("你正在为一个已有的分镜脚本补拍一个新镜头。\n\n");

    push_context_section(&mut prompt, context);
    push_inferred_consistency_section(&mut prompt);

    prompt.push_str("## 生成规则\n");
    prompt.push_str(&format!("- 新镜头描述：“{}”\n", instruction));
    prompt.push_str(&format!(
        "- **位置**: 新镜头将插入在第{}格分镜之后，必须承接其画面，并能衔接其后一格分镜（如有）。\n",
        after
    ));
    prompt.push_str(
        "- **数量与编号**: 只生成一个分镜，编号为1（最终编号由系统统一调整）。\n\n",
    );

    push_array_only_output(&mut prompt);

    prompt
}

fn push_array_only_output(prompt: &mut String) {
    prompt.push_str("## 输出内容\n只输出结构化的分镜数组，不要附加任何解释性文字。\n");
}
