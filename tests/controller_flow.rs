mod common;

use common::*;
use rimagen::{
    config::StoreConfig, store::HISTORY_LIMIT, ControllerState, GenerationRequest,
    ImageGenerationClient, Language, MessageKey, Preferences, Severity, SubmitOutcome, Theme,
};
use std::sync::Arc;
use tokio::sync::Notify;

async fn wait_until_generating(controller: &rimagen::AppController) {
    while !controller.is_generating() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn second_submit_while_in_flight_is_ignored() {
    let log = CallLog::default();
    let gate = Arc::new(Notify::new());
    let client = ImageGenerationClient::builder()
        .backend(ScriptedBackend::new("gated", Behavior::WaitFor(gate.clone()), &log))
        .build();
    let (controller, center) = controller_with(client);

    let (first, second) = tokio::join!(
        controller.submit(GenerationRequest::new(KEY, "first")),
        async {
            wait_until_generating(&controller).await;
            let outcome = controller.submit(GenerationRequest::new(KEY, "second")).await;
            gate.notify_one();
            outcome
        }
    );

    assert!(matches!(first, SubmitOutcome::Completed(ref r) if r.success));
    assert!(matches!(second, SubmitOutcome::Busy));
    assert_eq!(log.calls(), vec!["gated"]);
    assert_eq!(controller.history().len(), 1);
    assert_eq!(controller.history()[0].prompt, "first");

    let busy_text = MessageKey::AlreadyGenerating.text(Language::English);
    let warnings: Vec<_> = center
        .shown()
        .into_iter()
        .filter(|n| n.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, busy_text);
}

#[tokio::test]
async fn result_arriving_after_reset_is_discarded() {
    let log = CallLog::default();
    let gate = Arc::new(Notify::new());
    let client = ImageGenerationClient::builder()
        .backend(ScriptedBackend::new("gated", Behavior::WaitFor(gate.clone()), &log))
        .build();
    let (controller, _) = controller_with(client);

    let (outcome, still_busy) = tokio::join!(
        controller.submit(GenerationRequest::new(KEY, "stale")),
        async {
            wait_until_generating(&controller).await;
            controller.reset();
            let busy = controller.is_generating();
            gate.notify_one();
            busy
        }
    );

    assert!(still_busy);
    assert!(matches!(outcome, SubmitOutcome::Superseded(ref r) if r.success));
    let view = controller.view();
    assert_eq!(view.state, ControllerState::Idle);
    assert!(view.image.is_none());
    assert!(controller.history().is_empty());
    assert!(!controller.is_generating());
}

#[tokio::test]
async fn reset_after_result_returns_to_idle() {
    let client = ImageGenerationClient::builder().backend(placeholder()).build();
    let (controller, _) = controller_with(client);

    controller
        .submit(GenerationRequest::new(KEY, "white cliffs"))
        .await;
    assert_eq!(controller.state(), ControllerState::Result);

    controller.reset();

    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(controller.view().image.is_none());
    assert_eq!(controller.restore().last_prompt, None);
    assert_eq!(controller.history().len(), 1);
}

#[tokio::test]
async fn history_keeps_the_fifty_newest() {
    let client = ImageGenerationClient::builder().backend(placeholder()).build();
    let (controller, _) = controller_with(client);

    for i in 0..51 {
        controller
            .submit(GenerationRequest::new(KEY, format!("prompt {}", i)))
            .await;
    }

    let history = controller.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0].prompt, "prompt 50");
    assert_eq!(history[HISTORY_LIMIT - 1].prompt, "prompt 1");

    controller.clear_history().unwrap();
    assert!(controller.history().is_empty());
}

#[tokio::test]
async fn preferences_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = StoreConfig::new().with_path(dir.path().join("prefs.json"));

    {
        let prefs = Preferences::open(&store).unwrap();
        let client = ImageGenerationClient::builder().backend(placeholder()).build();
        let center = Arc::new(rimagen::NotificationCenter::default());
        let controller = rimagen::AppController::new(Arc::new(client), prefs, center);
        controller.toggle_theme().unwrap();
        controller.toggle_language().unwrap();
        controller
            .submit(GenerationRequest::new(KEY, "orange moon"))
            .await;
    }

    let prefs = Preferences::open(&store).unwrap();
    let client = ImageGenerationClient::builder().build();
    let center = Arc::new(rimagen::NotificationCenter::default());
    let controller = rimagen::AppController::new(Arc::new(client), prefs, center);

    let restored = controller.restore();
    assert_eq!(restored.theme, Theme::Dark);
    assert_eq!(restored.language, Language::Arabic);
    assert_eq!(restored.api_key.as_deref(), Some(KEY));
    assert_eq!(restored.last_prompt.as_deref(), Some("orange moon"));
    assert_eq!(controller.history().len(), 1);
}
