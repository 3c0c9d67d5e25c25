//! One-shot structured paper analysis.

use std::path::PathBuf;

use crate::chat::ChatMessage;
use crate::gateway::ModelGateway;
use crate::{CoreError, prompt, store};

/// Compose all section files into one document and request a single
/// structured analysis from the model. Stateless, no history interaction.
pub async fn summarize(
    section_paths: &[PathBuf],
    gateway: &dyn ModelGateway,
) -> Result<String, CoreError> {
    let combined = store::read_combined(section_paths)?;
    tracing::info!(
        sections = section_paths.len(),
        chars = combined.len(),
        "generating paper analysis"
    );

    let request = format!(
        "{}\n\n{}:\n{}",
        prompt::SUMMARY_REQUEST,
        prompt::SUMMARY_CONTEXT_LABEL,
        combined
    );
    let messages = vec![ChatMessage::user(request)];
    let report = gateway.call(prompt::SUMMARY_SYSTEM, &messages).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{MockGateway, MockReply};

    #[tokio::test]
    async fn test_summarize_sends_joined_sections() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("abstract.txt");
        let b = dir.path().join("methods.txt");
        std::fs::write(&a, "Abstract text.").unwrap();
        std::fs::write(&b, "Methods text.").unwrap();

        let gateway = MockGateway::new(MockReply::Answer("the report".into()));
        let report = summarize(&[a, b], &gateway).await.unwrap();
        assert_eq!(report, "the report");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt, prompt::SUMMARY_SYSTEM);
        let content = &calls[0].messages[0].content;
        assert!(content.contains("Abstract text.\n\n---\n\nMethods text."));
        assert!(content.contains("Critical analysis and outlook"));
    }

    #[tokio::test]
    async fn test_summarize_propagates_gateway_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("abstract.txt");
        std::fs::write(&a, "text").unwrap();

        let gateway = MockGateway::new(MockReply::ContextTooLarge);
        let result = summarize(&[a], &gateway).await;
        assert!(matches!(
            result,
            Err(CoreError::Gateway(crate::GatewayError::ContextTooLarge))
        ));
    }
}
