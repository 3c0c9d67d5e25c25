//! Integration tests for the conversation engine.
//!
//! These tests drive [`ConversationManager`] through a [`MockGateway`] so
//! no HTTP requests are made; the mock records every call for assertions
//! on prompt construction and invocation counts.

use std::path::PathBuf;

use papermate_core::gateway::mock::{MockGateway, MockReply};
use papermate_core::{
    ChatHistory, ChatMessage, ConversationManager, CoreError, GatewayError, HistoryTransition,
    Role, Session, SessionSlot, prompt,
};

/// Write two section files into `dir` and return their paths.
fn write_sections(dir: &tempfile::TempDir) -> Vec<PathBuf> {
    let abstract_path = dir.path().join("abstract.txt");
    let body_path = dir.path().join("introduction.txt");
    std::fs::write(&abstract_path, "We study span segmentation.").unwrap();
    std::fs::write(&body_path, "## Introduction\n\nSegmentation is hard.").unwrap();
    vec![abstract_path, body_path]
}

/// A history of `n` messages, alternating user/assistant.
fn history_of(n: usize) -> ChatHistory {
    (0..n)
        .map(|i| {
            if i % 2 == 0 {
                ChatMessage::user(format!("question {}", i / 2 + 1))
            } else {
                ChatMessage::assistant(format!("answer {}", i / 2 + 1))
            }
        })
        .collect()
}

#[tokio::test]
async fn first_question_sends_full_paper_context() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);
    let gateway = MockGateway::new(MockReply::Answer("It is about segmentation.".into()));
    let manager = ConversationManager::new();

    let answer = manager
        .answer(&[], "What is this paper about?", &sections, &gateway)
        .await
        .unwrap();

    assert_eq!(answer.text, "It is about segmentation.");
    assert_eq!(answer.transition, HistoryTransition::Kept);
    assert_eq!(answer.history.len(), 2);
    assert_eq!(answer.history[0].role, Role::User);
    assert_eq!(answer.history[1].role, Role::Assistant);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system_prompt, prompt::QA_SYSTEM);
    // One user message carrying both the concatenated sections and the question.
    assert_eq!(calls[0].messages.len(), 1);
    let content = &calls[0].messages[0].content;
    assert!(content.contains("We study span segmentation."));
    assert!(content.contains("Segmentation is hard."));
    assert!(content.contains("What is this paper about?"));
}

#[tokio::test]
async fn later_questions_send_history_and_bare_question() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);
    let gateway = MockGateway::new(MockReply::Answer("Still segmentation.".into()));
    let manager = ConversationManager::new();

    let history = history_of(2);
    let answer = manager
        .answer(&history, "And the method?", &sections, &gateway)
        .await
        .unwrap();

    let calls = gateway.calls();
    // Prior history verbatim, then the bare question; no paper context re-sent.
    assert_eq!(calls[0].messages.len(), 3);
    assert_eq!(calls[0].messages[2].content, "And the method?");
    assert!(!calls[0].messages[2].content.contains("segmentation is hard"));
    assert_eq!(answer.history.len(), 4);
}

#[tokio::test]
async fn history_grows_two_messages_per_successful_turn() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);
    let gateway = MockGateway::new(MockReply::Answer("ok".into()));
    let manager = ConversationManager::new();

    let mut history = ChatHistory::new();
    for turn in 1..=3 {
        let answer = manager
            .answer(&history, &format!("q{turn}"), &sections, &gateway)
            .await
            .unwrap();
        history = answer.history;
        assert_eq!(history.len(), 2 * turn);
    }
}

#[tokio::test]
async fn compression_triggers_above_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);
    let gateway = MockGateway::with_sequence(vec![
        MockReply::Answer("the gist of it".into()),
        MockReply::Answer("final answer".into()),
    ]);
    let manager = ConversationManager::new();

    let history = history_of(7);
    let answer = manager
        .answer(&history, "one more question", &sections, &gateway)
        .await
        .unwrap();

    assert_eq!(gateway.call_count(), 2);
    let calls = gateway.calls();

    // First call is the compression: one user message with the serialized
    // transcript.
    assert_eq!(calls[0].system_prompt, prompt::COMPRESS_SYSTEM);
    assert_eq!(calls[0].messages.len(), 1);
    assert!(calls[0].messages[0].content.contains("user: question 1"));
    assert!(calls[0].messages[0].content.contains("answer 3"));

    // Second call sees a working history of exactly one summary message
    // before the new question is appended.
    assert_eq!(calls[1].system_prompt, prompt::QA_SYSTEM);
    assert_eq!(calls[1].messages.len(), 2);
    assert_eq!(calls[1].messages[0].role, Role::System);
    assert!(
        calls[1].messages[0]
            .content
            .starts_with(prompt::SUMMARY_OF_PRIOR_PREFIX)
    );
    assert!(calls[1].messages[0].content.contains("the gist of it"));
    assert_eq!(calls[1].messages[1].content, "one more question");

    assert_eq!(answer.transition, HistoryTransition::Compressed);
    assert_eq!(answer.history.len(), 3);
    assert_eq!(answer.text, "final answer");
}

#[tokio::test]
async fn no_compression_at_exact_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);
    let gateway = MockGateway::new(MockReply::Answer("ok".into()));
    let manager = ConversationManager::new();

    let history = history_of(6);
    let answer = manager
        .answer(&history, "boundary question", &sections, &gateway)
        .await
        .unwrap();

    assert_eq!(gateway.call_count(), 1);
    assert_eq!(answer.transition, HistoryTransition::Kept);
    assert_eq!(answer.history.len(), 8);
}

#[tokio::test]
async fn compression_failure_leaves_committed_history_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);

    let slot = SessionSlot::new();
    let mut session = Session::new(sections.clone());
    session.history = history_of(7);
    slot.replace(session);

    let gateway = MockGateway::new(MockReply::Error("provider exploded".into()));
    let manager = ConversationManager::new();

    let snapshot = slot.snapshot().unwrap();
    let result = manager
        .answer(&snapshot.history, "doomed question", &sections, &gateway)
        .await;

    match result {
        Err(CoreError::Gateway(GatewayError::Api(msg))) => {
            assert!(msg.contains("provider exploded"))
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
    // The compression call failed, so the main answer call never happened
    // and nothing was committed.
    assert_eq!(gateway.call_count(), 1);
    assert_eq!(slot.snapshot().unwrap().history, history_of(7));
}

#[tokio::test]
async fn question_without_sections_fails_before_any_gateway_call() {
    let gateway = MockGateway::new(MockReply::Answer("never sent".into()));
    let manager = ConversationManager::new();

    let result = manager.answer(&[], "anyone home?", &[], &gateway).await;

    assert!(matches!(result, Err(CoreError::SessionNotReady)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn context_too_large_stays_distinguishable() {
    let dir = tempfile::tempdir().unwrap();
    let sections = write_sections(&dir);
    let gateway = MockGateway::new(MockReply::ContextTooLarge);
    let manager = ConversationManager::new();

    let result = manager.answer(&[], "big question", &sections, &gateway).await;
    assert!(matches!(
        result,
        Err(CoreError::Gateway(GatewayError::ContextTooLarge))
    ));
}
