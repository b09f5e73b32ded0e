//! Root-storyboard request compilation.

use crate::options::RootConfig;

/// Compile the full request text for a root storyboard generation.
///
/// Renders, in order: task framing, the configuration directives, the
/// literal story idea, the consistency directive (invent-then-lock core
/// subject and core scene), the four-act structure, the shot-to-shot
/// continuity rule, the per-panel output contract, and the output-language
/// constraint.
pub fn compile_root_request(story_idea: &str, config: &RootConfig) -> String {
    let mut prompt = String::new();

    prompt.push_str("用户想要一个关于狗狗提醒主人注意来自人或车辆危险的分镜脚本。\n\n");

    prompt.push_str("请遵循以下规范：\n");
    prompt.push_str(&format!("- 视觉风格: {}\n", config.style));
    prompt.push_str(&format!("- 画面比例: {}\n", config.aspect_ratio));
    match config.composition {
        Some(composition) => prompt.push_str(&format!(
            "- 镜头构图: 优先采用“{}”构图来呈现画面。\n",
            composition
        )),
        None => prompt
            .push_str("- 镜头构图: 不限定构图，由你根据叙事自由选择最合适的镜头构图。\n"),
    }
    prompt.push('\n');

    prompt.push_str(&format!("具体的故事情节如下：“{}”\n\n", story_idea));

    push_consistency_system(&mut prompt);
    push_story_structure(&mut prompt);
    push_continuity_check(&mut prompt);
    push_output_contract(&mut prompt, config);

    prompt
}

fn push_consistency_system(prompt: &mut String) {
    prompt.push_str(
        "## 一致性保障系统 (CRITICAL)\n\
在生成任何分镜之前，请先在内部构思并锁定以下核心视觉元素。在后续所有分镜的描述和提示词中，\
必须严格、重复地使用这些确切的描述，以保证场景、主体、样貌和颜色的绝对一致性。\n\
- **核心主体**: [定义主角狗狗和主人的具体样貌、穿着、颜色。例如：一只名叫“闪电”的奶油色柯基犬，\
蓝色眼睛，戴着红色皮质项圈。一位名叫“小雅”的年轻女性，齐肩黑直发，戴着银色圆形眼镜，\
穿着米色风衣和蓝色牛仔裤。]\n\
- **核心场景**: [定义故事发生的主要环境。例如：傍晚时分的城市街角，人行道旁有一家亮着暖黄灯光的咖啡店，\
地面有雨后留下的些许积水，反射着霓虹灯光。]\n\n",
    );
}

fn push_story_structure(prompt: &mut String) {
    prompt.push_str(
        "## 生成规则\n\
### 故事脚本结构\n\
请严格按照以下四幕结构来组织故事：\n\
1.  **危险引入**: 铺垫潜在的危险，主角和狗狗尚未察觉。\n\
2.  **狗狗发现**: 狗狗首先敏锐地发现了危险。\n\
3.  **救援行动**: 狗狗通过行动（吠叫、拉拽等）成功提醒或阻止了主人。\n\
4.  **温馨结局**: 危险解除，主人感激地与狗狗互动，故事圆满结束。\n\n",
    );
}

fn push_continuity_check(prompt: &mut String) {
    prompt.push_str(
        "### 逻辑检查\n\
每个镜头必须能够无缝衔接前后的画面，形成连贯的视觉叙事。例如：如果镜头1中一个物体出现在画面的右侧，\
镜头2中角色的视线就应该朝向右侧。\n\n",
    );
}

fn push_output_contract(prompt: &mut String, config: &RootConfig) {
    prompt.push_str(
        "## 输出内容\n\
请基于以上想法和规则，生成一个简洁的分镜脚本。在描述场景和镜头时，请充分体现所选的风格和画面比例。\n\n",
    );
    prompt.push_str(&format!(
        "**重要**: 为每个镜头生成以下内容。**所有内容，包括提示词，都必须使用{}**：\n",
        config.language
    ));
    prompt.push_str(
        "1.  **分镜描述** (场景, 镜头, 动作, 对话)。场景描述必须与上方定义的“核心场景”保持一致。\n",
    );
    prompt.push_str(
        "2.  **文生图提示词 (imagePrompt)**: 用于生成此分镜静态关键帧的提示词。\
此提示词必须明确包含在“一致性保障系统”中定义的“核心主体”和“核心场景”的**完整描述**，\
以确保视觉的绝对统一。\n",
    );
    prompt.push_str(&format!(
        "3.  **图生视频提示词 (videoPrompt)**: 基于关键帧的动作描述，说明该镜头中的动态变化。\
**此提示词也必须使用{}**，并引用“核心主体”和“核心场景”的描述。\n",
        config.language
    ));
}
