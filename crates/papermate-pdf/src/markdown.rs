use crate::Section;

/// Render segmented sections as markdown, one `## ` heading per section.
///
/// This is the interchange format between segmentation and the section
/// store: `## {title}` followed by the trimmed content, blank-line
/// separated.
pub fn render_markdown(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str("## ");
        out.push_str(section.title.trim());
        out.push_str("\n\n");
        out.push_str(section.content.trim());
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic() {
        let sections = vec![
            Section {
                title: "Abstract".into(),
                content: "We study things.".into(),
            },
            Section {
                title: "Methods".into(),
                content: "Carefully.".into(),
            },
        ];
        let md = render_markdown(&sections);
        assert_eq!(
            md,
            "## Abstract\n\nWe study things.\n\n## Methods\n\nCarefully.\n\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_markdown(&[]), "");
    }
}
