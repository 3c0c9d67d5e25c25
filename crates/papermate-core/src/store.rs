//! Section persistence: splits rendered paper markdown into one file per
//! logical unit (header, abstract, each body section) inside a per-session
//! directory.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::CoreError;
use crate::prompt::SECTION_SEPARATOR;

/// Fallback filename when a title sanitizes to nothing.
const FALLBACK_STEM: &str = "section";

/// What to do when two section titles sanitize to the same filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Last write wins, silently.
    #[default]
    Overwrite,
    /// Disambiguate with a numeric suffix: `methods.txt`, `methods_2.txt`.
    NumberSuffix,
}

/// Writes the per-session section file set.
#[derive(Debug, Clone, Default)]
pub struct SectionStore {
    policy: CollisionPolicy,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// Split rendered markdown into section files under `out_dir` and
    /// return the paths in creation order.
    ///
    /// Layout of the input (see the markdown renderer): every section is a
    /// `## ` heading followed by its content. Boundaries:
    /// - a line equal to `## abstract` (case-insensitive, trimmed) starts
    ///   the abstract; everything before it becomes `header_info.txt`,
    ///   the lines up to the next `## ` heading become `abstract.txt`;
    /// - a line equal to `## references` or `## bibliography` ends the
    ///   body; that section and everything after it is dropped;
    /// - each remaining `## ` block becomes one slug-named file.
    ///
    /// Re-running against the same directory deletes every existing file
    /// first: an idempotent replace, never a merge.
    pub fn split_markdown(&self, markdown: &str, out_dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
        std::fs::create_dir_all(out_dir)?;
        clear_directory(out_dir)?;

        let lines: Vec<&str> = markdown.lines().collect();
        let mut saved: Vec<PathBuf> = Vec::new();

        // ── Header / abstract split ──
        let abstract_start = lines
            .iter()
            .position(|l| l.trim().eq_ignore_ascii_case("## abstract"));

        let (header_lines, abstract_lines, rest) = match abstract_start {
            None => (&lines[..0], &lines[..0], &lines[..]),
            Some(start) => {
                let abstract_end = lines[start + 1..]
                    .iter()
                    .position(|l| l.trim().starts_with("## "))
                    .map(|offset| start + 1 + offset)
                    .unwrap_or(lines.len());
                (
                    &lines[..start],
                    &lines[start + 1..abstract_end],
                    &lines[abstract_end..],
                )
            }
        };

        if has_content(header_lines) {
            saved.push(self.write_unit(out_dir, "header_info", header_lines, &saved)?);
        }
        if has_content(abstract_lines) {
            saved.push(self.write_unit(out_dir, "abstract", abstract_lines, &saved)?);
        }

        // ── Body sections, references and beyond excluded ──
        static END_OF_BODY: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?i)^##\s+(references|bibliography)\s*$").unwrap());

        let body_end = rest
            .iter()
            .position(|l| END_OF_BODY.is_match(l.trim()))
            .unwrap_or(rest.len());
        let body = &rest[..body_end];

        let mut current_title = String::from("introduction");
        let mut current_lines: Vec<&str> = Vec::new();

        for &line in body {
            if let Some(title) = line.trim().strip_prefix("## ") {
                if has_content(&current_lines) {
                    let stem = sanitize_title(&current_title);
                    saved.push(self.write_unit(out_dir, &stem, &current_lines, &saved)?);
                }
                current_title = title.trim().to_string();
                current_lines = vec![line];
            } else {
                current_lines.push(line);
            }
        }
        if has_content(&current_lines) {
            let stem = sanitize_title(&current_title);
            saved.push(self.write_unit(out_dir, &stem, &current_lines, &saved)?);
        }

        tracing::info!(files = saved.len(), dir = %out_dir.display(), "wrote section files");
        Ok(saved)
    }

    /// Resolve the collision policy and write one unit to disk.
    fn write_unit(
        &self,
        out_dir: &Path,
        stem: &str,
        lines: &[&str],
        already_saved: &[PathBuf],
    ) -> Result<PathBuf, CoreError> {
        let mut path = out_dir.join(format!("{stem}.txt"));

        if self.policy == CollisionPolicy::NumberSuffix {
            let mut n = 2;
            while already_saved.contains(&path) {
                path = out_dir.join(format!("{stem}_{n}.txt"));
                n += 1;
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// Delete every file directly inside `dir` (subdirectories are left alone).
fn clear_directory(dir: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn has_content(lines: &[&str]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

/// Derive a filesystem-safe slug from a section title: spaces and periods
/// map to underscores, everything outside `[A-Za-z0-9_]` is stripped, runs
/// of underscores collapse, lowercased, truncated to 50 characters.
pub fn sanitize_title(title: &str) -> String {
    static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());
    static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"__+").unwrap());

    let s = title.trim().replace([' ', '.'], "_");
    let s = NON_WORD.replace_all(&s, "");
    let s = s.to_lowercase();
    let s = UNDERSCORE_RUN.replace_all(&s, "_");
    let s: String = s.chars().take(50).collect();

    if s.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        s
    }
}

/// Read every section file and join them into one context string.
pub fn read_combined(paths: &[PathBuf]) -> std::io::Result<String> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        parts.push(std::fs::read_to_string(path)?);
    }
    Ok(parts.join(SECTION_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_title("Related Work"), "related_work");
        assert_eq!(sanitize_title("3. Methods"), "3_methods");
        assert_eq!(sanitize_title("  Results & Discussion  "), "results_discussion");
    }

    #[test]
    fn test_sanitize_collapses_and_truncates() {
        assert_eq!(sanitize_title("a   b...c"), "a_b_c");
        let long = "x".repeat(80);
        assert_eq!(sanitize_title(&long).len(), 50);
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_title("???"), "section");
        assert_eq!(sanitize_title(""), "section");
    }

    #[test]
    fn test_split_with_abstract_and_references() {
        let dir = tempfile::tempdir().unwrap();
        let md = "## Paper Title\n\nAuthors et al.\n\n## Abstract\n\nWe study splitting.\n\n\
                  ## Introduction\n\nIntro text.\n\n## Methods\n\nMethod text.\n\n\
                  ## References\n\n[1] Someone.\n\n";
        let store = SectionStore::new();
        let paths = store.split_markdown(md, dir.path()).unwrap();

        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "header_info.txt",
                "abstract.txt",
                "introduction.txt",
                "methods.txt"
            ]
        );

        let abstract_text = std::fs::read_to_string(dir.path().join("abstract.txt")).unwrap();
        assert!(abstract_text.contains("We study splitting."));
        assert!(!abstract_text.contains("## Abstract"));

        let methods = std::fs::read_to_string(dir.path().join("methods.txt")).unwrap();
        assert!(methods.starts_with("## Methods"));
        assert!(!methods.contains("[1] Someone."));
    }

    #[test]
    fn test_split_without_abstract_writes_no_header_files() {
        let dir = tempfile::tempdir().unwrap();
        let md = "## Introduction\n\nIntro.\n\n## Discussion\n\nTalk.\n\n";
        let paths = SectionStore::new().split_markdown(md, dir.path()).unwrap();

        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["introduction.txt", "discussion.txt"]);
        assert!(!dir.path().join("header_info.txt").exists());
        assert!(!dir.path().join("abstract.txt").exists());
    }

    #[test]
    fn test_split_bibliography_also_ends_body() {
        let dir = tempfile::tempdir().unwrap();
        let md = "## Intro\n\nText.\n\n## Bibliography\n\n[1] Ref.\n\n## Appendix\n\nMore.\n\n";
        let paths = SectionStore::new().split_markdown(md, dir.path()).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(!dir.path().join("appendix.txt").exists());
    }

    #[test]
    fn test_rerun_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SectionStore::new();

        let first = "## Old Section\n\nOld content.\n\n";
        store.split_markdown(first, dir.path()).unwrap();
        assert!(dir.path().join("old_section.txt").exists());

        let second = "## New Section\n\nNew content.\n\n";
        store.split_markdown(second, dir.path()).unwrap();
        assert_eq!(list_files(dir.path()), vec!["new_section.txt"]);
    }

    #[test]
    fn test_collision_overwrite_last_wins() {
        let dir = tempfile::tempdir().unwrap();
        let md = "## Setup\n\nFirst block.\n\n## Setup!\n\nSecond block.\n\n";
        let paths = SectionStore::new().split_markdown(md, dir.path()).unwrap();
        // Both titles slug to setup.txt; the second write wins.
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], paths[1]);
        let content = std::fs::read_to_string(dir.path().join("setup.txt")).unwrap();
        assert!(content.contains("Second block."));
    }

    #[test]
    fn test_collision_number_suffix_keeps_both() {
        let dir = tempfile::tempdir().unwrap();
        let md = "## Setup\n\nFirst block.\n\n## Setup!\n\nSecond block.\n\n";
        let store = SectionStore::with_policy(CollisionPolicy::NumberSuffix);
        let paths = store.split_markdown(md, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_ne!(paths[0], paths[1]);
        assert_eq!(list_files(dir.path()), vec!["setup.txt", "setup_2.txt"]);
    }

    #[test]
    fn test_read_combined_joins_with_separator() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "alpha").unwrap();
        std::fs::write(&b, "beta").unwrap();
        let combined = read_combined(&[a, b]).unwrap();
        assert_eq!(combined, "alpha\n\n---\n\nbeta");
    }
}
