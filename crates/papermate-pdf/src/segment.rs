use std::collections::HashMap;

use crate::config::SegmenterConfig;
use crate::{Section, TextSpan};

/// Segment a span stream into titled sections using the default config.
pub fn segment(spans: &[TextSpan]) -> Vec<Section> {
    segment_with_config(spans, &SegmenterConfig::default())
}

/// Segment a span stream into titled sections.
///
/// The dominant (modal) font size across all spans is taken as the body
/// text baseline. Mode, not mean: body text dominates by span count. A
/// span whose size exceeds `baseline + title_size_offset` and whose word
/// count is under `max_title_words` opens a new section titled by its
/// text; everything else accumulates into the current section.
///
/// Sections with blank content are never emitted. A document where every
/// span qualifies as a heading therefore yields no sections at all, an
/// accepted limitation of the heuristic that is surfaced to the caller
/// rather than masked.
pub fn segment_with_config(spans: &[TextSpan], config: &SegmenterConfig) -> Vec<Section> {
    if spans.is_empty() {
        return Vec::new();
    }

    let body_size = dominant_font_size(spans);
    let title_threshold = body_size + config.title_size_offset;
    tracing::debug!(body_size, title_threshold, "segmenting spans");

    let mut sections = Vec::new();
    let mut current_title = config.default_title.clone();
    let mut current_content = String::new();

    for span in spans {
        if is_heading_candidate(span, title_threshold, config.max_title_words) {
            flush(&mut sections, &current_title, &current_content);
            current_title = span.text.clone();
            current_content.clear();
        } else {
            if !current_content.is_empty() {
                current_content.push(' ');
            }
            current_content.push_str(&span.text);
        }
    }
    flush(&mut sections, &current_title, &current_content);

    sections
}

fn is_heading_candidate(span: &TextSpan, title_threshold: u32, max_title_words: usize) -> bool {
    span.font_size > title_threshold && span.text.split_whitespace().count() < max_title_words
}

/// Append the current section to the output, dropping it when blank.
fn flush(sections: &mut Vec<Section>, title: &str, content: &str) {
    let content = content.trim();
    if !content.is_empty() {
        sections.push(Section {
            title: title.to_string(),
            content: content.to_string(),
        });
    }
}

/// The most frequent font size across all spans. Ties break toward the
/// smaller size so repeated runs over the same document are deterministic.
fn dominant_font_size(spans: &[TextSpan]) -> u32 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for span in spans {
        *counts.entry(span.font_size).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(size, _)| size)
        .unwrap_or(0)
}
