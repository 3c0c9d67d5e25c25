use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

mod error;
mod handlers;
mod models;
mod state;
mod upload;

use papermate_core::config_file;
use papermate_core::gateway::openai::DEFAULT_BASE_URL;
use papermate_core::{
    CollisionPolicy, ConversationConfig, ConversationManager, SectionStore, SessionSlot,
};
use papermate_pdf::SegmenterConfigBuilder;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let file = config_file::load_config();
    let api = file.api.unwrap_or_default();
    let seg = file.segmentation.unwrap_or_default();
    let conv = file.conversation.unwrap_or_default();
    let store = file.store.unwrap_or_default();

    let base_url = std::env::var("PAPERMATE_BASE_URL")
        .ok()
        .or(api.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let sections_root = std::env::var("PAPERMATE_SECTIONS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("output_sections"));

    let mut segmenter = SegmenterConfigBuilder::new();
    if let Some(offset) = seg.title_size_offset {
        segmenter = segmenter.title_size_offset(offset);
    }
    if let Some(words) = seg.max_title_words {
        segmenter = segmenter.max_title_words(words);
    }
    if let Some(title) = seg.default_title {
        segmenter = segmenter.default_title(title);
    }

    let collision_policy = match store.collision_policy.as_deref() {
        Some("number_suffix") => CollisionPolicy::NumberSuffix,
        _ => CollisionPolicy::Overwrite,
    };

    let conversation = ConversationConfig {
        compression_threshold: conv
            .compression_threshold
            .unwrap_or_else(|| ConversationConfig::default().compression_threshold),
    };

    let state = Arc::new(AppState {
        session: SessionSlot::new(),
        manager: ConversationManager::with_config(conversation),
        store: SectionStore::with_policy(collision_policy),
        segmenter: segmenter.build(),
        sections_root,
        base_url,
    });

    // PDFs can be large; cap uploads at 100MB
    let body_limit = axum::extract::DefaultBodyLimit::max(100 * 1024 * 1024);

    let app = axum::Router::new()
        .route(
            "/summarize",
            axum::routing::post(handlers::summarize::summarize_pdf),
        )
        .route("/ask", axum::routing::post(handlers::ask::ask_question))
        .layer(body_limit)
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
