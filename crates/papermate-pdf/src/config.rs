/// Configuration for the section segmenter.
///
/// The defaults reproduce the tuned heuristic: a span is a heading
/// candidate when its font size exceeds the dominant body size by more
/// than one point and it has fewer than 30 words.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// How many points above the dominant body size a span must be before
    /// it is considered a heading candidate.
    pub(crate) title_size_offset: u32,
    /// Word-count ceiling for heading candidates. Guards against large
    /// body spans or display equations being misread as titles.
    pub(crate) max_title_words: usize,
    /// Title given to content that precedes the first detected heading.
    pub(crate) default_title: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            title_size_offset: 1,
            max_title_words: 30,
            default_title: "Introduction".to_string(),
        }
    }
}

impl SegmenterConfig {
    pub fn title_size_offset(&self) -> u32 {
        self.title_size_offset
    }

    pub fn max_title_words(&self) -> usize {
        self.max_title_words
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }
}

/// Builder for [`SegmenterConfig`].
#[derive(Debug, Clone, Default)]
pub struct SegmenterConfigBuilder {
    title_size_offset: Option<u32>,
    max_title_words: Option<usize>,
    default_title: Option<String>,
}

impl SegmenterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title_size_offset(mut self, offset: u32) -> Self {
        self.title_size_offset = Some(offset);
        self
    }

    pub fn max_title_words(mut self, n: usize) -> Self {
        self.max_title_words = Some(n);
        self
    }

    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    pub fn build(self) -> SegmenterConfig {
        let defaults = SegmenterConfig::default();
        SegmenterConfig {
            title_size_offset: self.title_size_offset.unwrap_or(defaults.title_size_offset),
            max_title_words: self.max_title_words.unwrap_or(defaults.max_title_words),
            default_title: self.default_title.unwrap_or(defaults.default_title),
        }
    }
}
