//! Response-schema construction for the backend contract.
//!
//! The engine declares one schema to the backend: an array of panel objects
//! with integer `panel` and six string fields, all required. The per-field
//! descriptions double as generation guidance, so the schema is built by
//! hand rather than derived from the Rust types.

use serde_json::{json, Value};

/// Builder for object schemas with per-field descriptions.
///
/// Every property added is also required — the backend contract has no
/// optional panel fields (absence is represented by the empty string).
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    properties: Vec<(String, Value)>,
    required: Vec<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        type_name: &str,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.properties.push((
            name.clone(),
            json!({ "type": type_name, "description": description.into() }),
        ));
        self.required.push(name);
        self
    }

    pub fn build(self) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// The response schema for one generation call: an array of panel objects
/// whose numbering starts at `start`.
///
/// The same schema serves root requests (`start == 1`), branch requests
/// (`start == root_len + 1`), and split-shot requests (`start == 1`, single
/// panel).
pub fn panel_array_schema(start: u32) -> Value {
    let item = ObjectSchema::new()
        .property(
            "panel",
            "integer",
            format!("分镜编号，从{}开始，依次递增1。", start),
        )
        .property(
            "scene",
            "string",
            "对视觉环境、时间、在场人物的描述。必须与“核心场景”定义保持一致。",
        )
        .property(
            "camera",
            "string",
            "对镜头、角度、移动的描述。例如：“中景”，“狗眼特写”。应体现出所选的画面比例。",
        )
        .property("action", "string", "对该分镜中发生的动作的描述。")
        .property(
            "dialogue",
            "string",
            "角色的任何对话。如果没有则使用空字符串。",
        )
        .property(
            "imagePrompt",
            "string",
            "用于生成此分镜静态关键帧的文生图提示词。必须明确包含“一致性保障系统”中定义的“核心主体”和“核心场景”的完整描述，以确保视觉的绝对统一。",
        )
        .property(
            "videoPrompt",
            "string",
            "基于关键帧的图生视频提示词，描述此分镜中的动态变化。必须引用“核心主体”和“核心场景”的描述。",
        )
        .build();

    json!({
        "type": "array",
        "items": item,
    })
}
