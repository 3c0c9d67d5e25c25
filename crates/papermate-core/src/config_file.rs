use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub segmentation: Option<SegmentationConfig>,
    pub conversation: Option<ConversationFileConfig>,
    pub store: Option<StoreFileConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub title_size_offset: Option<u32>,
    pub max_title_words: Option<usize>,
    pub default_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationFileConfig {
    pub compression_threshold: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFileConfig {
    /// `"overwrite"` (default) or `"number_suffix"`.
    pub collision_policy: Option<String>,
}

/// Platform config directory path: `<config_dir>/papermate/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("papermate").join("config.toml"))
}

/// Load config by cascading CWD `.papermate.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".papermate.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let api_base = base.api.unwrap_or_default();
    let api_over = overlay.api.unwrap_or_default();
    let seg_base = base.segmentation.unwrap_or_default();
    let seg_over = overlay.segmentation.unwrap_or_default();
    let conv_base = base.conversation.unwrap_or_default();
    let conv_over = overlay.conversation.unwrap_or_default();
    let store_base = base.store.unwrap_or_default();
    let store_over = overlay.store.unwrap_or_default();

    ConfigFile {
        api: Some(ApiConfig {
            api_key: api_over.api_key.or(api_base.api_key),
            model: api_over.model.or(api_base.model),
            base_url: api_over.base_url.or(api_base.base_url),
        }),
        segmentation: Some(SegmentationConfig {
            title_size_offset: seg_over.title_size_offset.or(seg_base.title_size_offset),
            max_title_words: seg_over.max_title_words.or(seg_base.max_title_words),
            default_title: seg_over.default_title.or(seg_base.default_title),
        }),
        conversation: Some(ConversationFileConfig {
            compression_threshold: conv_over
                .compression_threshold
                .or(conv_base.compression_threshold),
        }),
        store: Some(StoreFileConfig {
            collision_policy: store_over.collision_policy.or(store_base.collision_policy),
        }),
    }
}
