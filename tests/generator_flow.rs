//! Black-box tests of the generation orchestrator against scripted
//! in-process backends.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storyboard_engine::{
    AspectRatio, BackendError, Error, GenerativeBackend, RequestState, RootConfig,
    StoryboardGenerator, Style, Target,
};
use tokio::sync::Notify;

fn panel_json(n: u32) -> Value {
    json!({
        "panel": n,
        "scene": format!("傍晚的街角{}", n),
        "camera": "中景",
        "action": format!("动作{}", n),
        "dialogue": if n == 4 { "谢谢你，闪电！" } else { "" },
        "imagePrompt": format!("奶油色柯基与主人，街角场景，第{}格", n),
        "videoPrompt": format!("第{}格中的动态变化", n),
    })
}

fn panels_json(numbers: &[u32]) -> String {
    Value::Array(numbers.iter().map(|&n| panel_json(n)).collect()).to_string()
}

fn config() -> RootConfig {
    RootConfig::new(AspectRatio::Landscape, Style::Photorealistic)
}

/// Replays queued responses and records every request it sees.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, BackendError>>>,
    prompts: Mutex<Vec<String>>,
    schemas: Mutex<Vec<Value>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn replying(responses: Vec<Result<String, BackendError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    fn last_schema(&self) -> Value {
        self.schemas.lock().unwrap().last().cloned().unwrap_or(Value::Null)
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.schemas.lock().unwrap().push(schema.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(BackendError::EmptyResponse))
    }
}

/// Parks every call until released, so tests can observe the pending state.
struct BlockingBackend {
    entered: Notify,
    release: Notify,
    response: String,
}

impl BlockingBackend {
    fn new(response: String) -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
            response,
        })
    }
}

#[async_trait]
impl GenerativeBackend for BlockingBackend {
    async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<String, BackendError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.response.clone())
    }
}

async fn generator_with_root(
    backend: Arc<ScriptedBackend>,
) -> StoryboardGenerator {
    let generator = StoryboardGenerator::with_shared_backend(backend);
    generator
        .generate_root("一只柯基发现危险并提醒主人", &config())
        .await
        .expect("root generation should succeed");
    generator
}

#[tokio::test]
async fn root_generation_installs_a_contiguous_storyboard() {
    let backend = ScriptedBackend::replying(vec![Ok(panels_json(&[1, 2, 3, 4]))]);
    let generator = StoryboardGenerator::with_shared_backend(backend.clone());

    let storyboard = generator
        .generate_root("一只柯基发现危险并提醒主人", &config())
        .await
        .unwrap();

    let numbers: Vec<u32> = storyboard.panels().iter().map(|p| p.panel).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);

    assert_eq!(generator.root_storyboard().await.unwrap(), storyboard);
    assert_eq!(
        generator.request_state(Target::Root).await,
        RequestState::Idle
    );
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn root_numbering_gap_fails_and_installs_nothing() {
    let backend = ScriptedBackend::replying(vec![Ok(panels_json(&[1, 2, 4]))]);
    let generator = StoryboardGenerator::with_shared_backend(backend);

    let err = generator
        .generate_root("一只柯基发现危险并提醒主人", &config())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedStoryboard { .. }));

    assert!(generator.root_storyboard().await.is_none());
    assert!(matches!(
        generator.request_state(Target::Root).await,
        RequestState::Failed(_)
    ));
}

#[tokio::test]
async fn blank_story_idea_never_invokes_the_backend() {
    let backend = ScriptedBackend::replying(vec![Ok(panels_json(&[1, 2, 3, 4]))]);
    let generator = StoryboardGenerator::with_shared_backend(backend.clone());

    let err = generator.generate_root("  \n\t ", &config()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
    assert_eq!(err.user_message(), "请输入您的故事构思。");
    assert_eq!(backend.calls(), 0);

    // The rejection leaves the state machine idle, not failed.
    assert_eq!(
        generator.request_state(Target::Root).await,
        RequestState::Idle
    );
}

#[tokio::test]
async fn branch_panels_are_numbered_after_the_whole_root() {
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[5, 6])),
    ]);
    let generator = generator_with_root(backend.clone()).await;

    let branch = generator
        .generate_branch(1, "主人没有注意到狗狗，继续向前走", None)
        .await
        .unwrap();

    let numbers: Vec<u32> = branch.panels().iter().map(|p| p.panel).collect();
    assert_eq!(numbers, vec![5, 6]);
    assert_eq!(generator.branch_storyboard(1).await.unwrap(), branch);

    // The root storyboard is untouched by branch generation.
    let root = generator.root_storyboard().await.unwrap();
    assert_eq!(root.len(), 4);
    assert_eq!(root.start(), 1);

    // The compiled request and declared schema both carry the offset.
    assert!(backend.last_prompt().contains("编号从5开始"));
    let desc = backend.last_schema()["items"]["properties"]["panel"]["description"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(desc.contains("从5开始"));
}

#[tokio::test]
async fn branch_context_ends_at_the_branch_point() {
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[5, 6])),
    ]);
    let generator = generator_with_root(backend.clone()).await;

    generator.generate_branch(1, "换一种走向", None).await.unwrap();

    let prompt = backend.last_prompt();
    assert!(prompt.contains("傍晚的街角2"));
    assert!(!prompt.contains("傍晚的街角3"));
}

#[tokio::test]
async fn branch_with_wrong_offset_numbering_is_rejected() {
    // A branch numbered from 1 against a 4-panel root violates the
    // renumbering rule even though it is contiguous.
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[1, 2])),
    ]);
    let generator = generator_with_root(backend).await;

    let err = generator.generate_branch(1, "走向", None).await.unwrap_err();
    assert!(matches!(err, Error::MalformedStoryboard { .. }));
    assert!(generator.branch_storyboard(1).await.is_none());
    assert!(matches!(
        generator.request_state(Target::Branch(1)).await,
        RequestState::Failed(_)
    ));
}

#[tokio::test]
async fn regenerating_a_branch_replaces_it() {
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[5, 6])),
        Ok(panels_json(&[5, 6, 7])),
    ]);
    let generator = generator_with_root(backend).await;

    generator.generate_branch(2, "第一种走向", None).await.unwrap();
    assert_eq!(generator.branch_storyboard(2).await.unwrap().len(), 2);

    generator.generate_branch(2, "第二种走向", None).await.unwrap();
    assert_eq!(generator.branch_storyboard(2).await.unwrap().len(), 3);
    assert_eq!(generator.branches().await.len(), 1);
}

#[tokio::test]
async fn a_new_root_clears_every_branch() {
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[5, 6])),
        Ok(panels_json(&[5, 6])),
        Ok(panels_json(&[1, 2, 3])),
    ]);
    let generator = generator_with_root(backend).await;

    generator.generate_branch(0, "走向A", None).await.unwrap();
    generator.generate_branch(3, "走向B", None).await.unwrap();
    assert_eq!(generator.branches().await.len(), 2);

    generator
        .generate_root("一只橘猫拦住了出门的主人", &config())
        .await
        .unwrap();
    assert!(generator.branches().await.is_empty());
    assert_eq!(generator.root_storyboard().await.unwrap().len(), 3);
}

#[tokio::test]
async fn branch_requires_a_root_and_an_in_range_index() {
    let backend = ScriptedBackend::replying(vec![]);
    let generator = StoryboardGenerator::with_shared_backend(backend.clone());

    let err = generator.generate_branch(0, "走向", None).await.unwrap_err();
    assert!(matches!(err, Error::MissingRoot));
    assert_eq!(backend.calls(), 0);

    let backend = ScriptedBackend::replying(vec![Ok(panels_json(&[1, 2, 3, 4]))]);
    let generator = generator_with_root(backend.clone()).await;
    let err = generator.generate_branch(4, "走向", None).await.unwrap_err();
    assert!(matches!(err, Error::PanelIndexOutOfRange { index: 4, len: 4 }));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn blank_branch_idea_never_invokes_the_backend() {
    let backend = ScriptedBackend::replying(vec![Ok(panels_json(&[1, 2, 3, 4]))]);
    let generator = generator_with_root(backend.clone()).await;

    let err = generator.generate_branch(1, "   ", None).await.unwrap_err();
    assert_eq!(err.user_message(), "请输入新的故事走向。");
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn only_one_generation_may_be_in_flight_system_wide() {
    let backend = BlockingBackend::new(panels_json(&[1, 2, 3, 4]));
    let generator = Arc::new(StoryboardGenerator::with_shared_backend(backend.clone()));

    let first = {
        let generator = generator.clone();
        tokio::spawn(async move {
            generator
                .generate_root("一只柯基发现危险并提醒主人", &config())
                .await
        })
    };
    backend.entered.notified().await;

    assert_eq!(generator.in_flight().await, Some(Target::Root));
    assert!(generator.request_state(Target::Root).await.is_pending());

    // A different target is rejected while the slot is held.
    let err = generator.generate_branch(0, "走向", None).await.unwrap_err();
    assert!(matches!(err, Error::RequestInFlight(Target::Root)));

    // Same target too: per-target requests are strictly sequential.
    let err = generator
        .generate_root("另一个故事", &config())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RequestInFlight(Target::Root)));

    backend.release.notify_one();
    let storyboard = first.await.unwrap().unwrap();
    assert_eq!(storyboard.len(), 4);
    assert_eq!(generator.in_flight().await, None);
}

#[tokio::test]
async fn failed_target_resets_to_pending_on_resubmission() {
    let backend = ScriptedBackend::replying(vec![
        Err(BackendError::Api {
            status: 500,
            message: "internal".to_string(),
        }),
        Ok(panels_json(&[1, 2, 3, 4])),
    ]);
    let generator = StoryboardGenerator::with_shared_backend(backend);

    let err = generator
        .generate_root("一只柯基发现危险并提醒主人", &config())
        .await
        .unwrap_err();
    let message = err.user_message();
    assert!(message.starts_with("生成分镜失败。"));
    assert!(message.contains("internal"));
    assert_eq!(
        generator.request_state(Target::Root).await,
        RequestState::Failed(message)
    );

    // Resubmission clears the failure and succeeds.
    generator
        .generate_root("一只柯基发现危险并提醒主人", &config())
        .await
        .unwrap();
    assert_eq!(
        generator.request_state(Target::Root).await,
        RequestState::Idle
    );
}

#[tokio::test]
async fn unparseable_backend_output_surfaces_as_unknown_error() {
    let backend = ScriptedBackend::replying(vec![Ok("抱歉，我无法生成。".to_string())]);
    let generator = StoryboardGenerator::with_shared_backend(backend);

    let err = generator
        .generate_root("一只柯基发现危险并提醒主人", &config())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BackendFormat { .. }));
    assert_eq!(err.user_message(), "生成分镜时发生未知错误。");
}

#[tokio::test]
async fn split_shot_splices_renumbers_and_clears_branches() {
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[5, 6])),
        Ok(panels_json(&[1])),
    ]);
    let generator = generator_with_root(backend.clone()).await;
    generator.generate_branch(2, "走向", None).await.unwrap();

    let storyboard = generator
        .generate_split_shot(1, "给狗狗一个特写，眼神充满警惕。")
        .await
        .unwrap();

    let numbers: Vec<u32> = storyboard.panels().iter().map(|p| p.panel).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    // The generated shot landed after index 1; the old panel 3 moved to 4.
    assert_eq!(storyboard.panels()[3].scene, "傍晚的街角3");
    assert_eq!(generator.root_storyboard().await.unwrap().len(), 5);
    assert!(generator.branches().await.is_empty());

    assert!(backend.last_prompt().contains("只生成一个分镜"));
}

#[tokio::test]
async fn split_shot_with_multi_panel_response_fails() {
    let backend = ScriptedBackend::replying(vec![
        Ok(panels_json(&[1, 2, 3, 4])),
        Ok(panels_json(&[1, 2])),
    ]);
    let generator = generator_with_root(backend).await;

    let err = generator.generate_split_shot(0, "特写").await.unwrap_err();
    assert!(matches!(err, Error::MalformedStoryboard { .. }));
    // The previous root survives a failed split-shot.
    assert_eq!(generator.root_storyboard().await.unwrap().len(), 4);
}
