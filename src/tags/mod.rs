//! Tag consolidation.
//!
//! Each document keeps only its most specific content tag. Specificity is the
//! priority table score plus a bonus per nesting level. Structural tags
//! (`index/...`, `structure/...`) are either kept after the chosen tag or
//! dropped, and generated index pages lose their tags entirely.

pub mod inline;
pub mod priority;
pub mod tree;

use serde::Serialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

use crate::config::VaultConfig;
use crate::error::Result;
use crate::frontmatter::types::{without_key, Document, Frontmatter};
use crate::frontmatter::FrontmatterParser;
use crate::vault::{atomic_write_file, collect_md_files, read_text};
use inline::strip_inline_tags;
use priority::PriorityTable;
use tree::TagTree;

const STRUCTURAL_PREFIXES: [&str; 2] = ["index/", "structure/"];

pub fn is_structural(tag: &str) -> bool {
    STRUCTURAL_PREFIXES.iter().any(|p| tag.starts_with(p))
}

#[derive(Debug, Clone)]
pub struct TagOptions {
    pub dry_run: bool,
    pub keep_structural: bool,
    pub priority: PriorityTable,
    pub templates_dir: String,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self::from_config(&VaultConfig::default())
    }
}

impl TagOptions {
    /// Build options from the vault config: base table, then the category
    /// boost, then explicit overlay scores.
    pub fn from_config(config: &VaultConfig) -> Self {
        let mut priority = PriorityTable::base();
        if let Some(category) = config.priority_category {
            priority = priority.with_category(category);
        }
        if !config.priority_overlay.is_empty() {
            priority = priority.with_overlay(&config.priority_overlay);
        }

        Self {
            dry_run: false,
            keep_structural: config.keep_structural,
            priority,
            templates_dir: config.templates_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsolidationKind {
    /// No frontmatter, malformed frontmatter, or no `tags` key.
    NoTags,
    /// Generated index page; its tags were cleared.
    IndexCleared,
    Consolidated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidationResult {
    pub frontmatter: Frontmatter,
    pub original_count: usize,
    pub new_count: usize,
    pub chosen_tag: Option<String>,
    pub kind: ConsolidationKind,
    /// True when the rewritten frontmatter differs from the input.
    pub changed: bool,
}

impl ConsolidationResult {
    fn unchanged(frontmatter: &Frontmatter) -> Self {
        Self {
            frontmatter: frontmatter.clone(),
            original_count: 0,
            new_count: 0,
            chosen_tag: None,
            kind: ConsolidationKind::NoTags,
            changed: false,
        }
    }
}

/// Highest scoring tag; ties go to the earliest one.
pub fn choose_tag<'a>(tags: &'a [String], table: &PriorityTable) -> Option<&'a String> {
    let mut best: Option<(&String, i64)> = None;
    for tag in tags {
        let score = table.score(tag);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((tag, score)),
        }
    }
    best.map(|(tag, _)| tag)
}

/// Reduce a document's tags to the single most specific content tag.
pub fn consolidate(
    document: &Document,
    keep_structural: bool,
    table: &PriorityTable,
) -> ConsolidationResult {
    let Frontmatter::Valid(mapping) = &document.frontmatter else {
        return ConsolidationResult::unchanged(&document.frontmatter);
    };
    let Some(tags_value) = mapping.get("tags") else {
        return ConsolidationResult::unchanged(&document.frontmatter);
    };

    let tags = document.frontmatter.tags();
    let original_count = tags.len();
    let mut rewritten = mapping.clone();

    if document.frontmatter.is_index() {
        rewritten = without_key(&rewritten, "tags");
        return ConsolidationResult {
            frontmatter: Frontmatter::Valid(rewritten),
            original_count,
            new_count: 0,
            chosen_tag: None,
            kind: ConsolidationKind::IndexCleared,
            changed: true,
        };
    }

    let (structural, content): (Vec<String>, Vec<String>) =
        tags.into_iter().partition(|t| is_structural(t));

    let chosen_tag = choose_tag(&content, table).cloned();
    let mut new_tags: Vec<String> = chosen_tag.iter().cloned().collect();
    if keep_structural {
        new_tags.extend(structural);
    }

    let new_count = new_tags.len();
    if new_tags.is_empty() {
        rewritten = without_key(&rewritten, "tags");
    } else {
        let new_value = Value::Sequence(new_tags.into_iter().map(Value::String).collect());
        if &new_value != tags_value {
            rewritten.insert(Value::String("tags".into()), new_value);
        }
    }

    let changed = &rewritten != mapping;
    ConsolidationResult {
        frontmatter: Frontmatter::Valid(rewritten),
        original_count,
        new_count,
        chosen_tag,
        kind: ConsolidationKind::Consolidated,
        changed,
    }
}

/// Outcome of normalising one file's text.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub result: ConsolidationResult,
    pub inline_tags_removed: usize,
    pub malformed: bool,
    /// New file text, `None` when nothing changed.
    pub new_text: Option<String>,
}

/// Consolidate frontmatter tags and strip inline tags from the body.
pub fn normalize_text(content: &str, options: &TagOptions) -> Result<NormalizedText> {
    let document = FrontmatterParser::parse(content);
    let result = consolidate(&document, options.keep_structural, &options.priority);
    let (body, inline_tags_removed) = strip_inline_tags(&document.body);

    let new_text = if result.changed {
        let rewritten = Document {
            frontmatter: result.frontmatter.clone(),
            body,
        };
        Some(rewritten.render()?).filter(|text| text != content)
    } else if inline_tags_removed > 0 {
        // Metadata untouched: keep the original block byte-for-byte.
        let head = &content[..content.len() - document.body.len()];
        Some(format!("{}{}", head, body)).filter(|text| text != content)
    } else {
        None
    };

    Ok(NormalizedText {
        result,
        inline_tags_removed,
        malformed: document.frontmatter.is_malformed(),
        new_text,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ConsolidationKind,
    pub original_count: usize,
    pub new_count: usize,
    pub chosen_tag: Option<String>,
    pub inline_tags_removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagRunSummary {
    pub dry_run: bool,
    pub processed: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub malformed: usize,
    pub errored: usize,
    pub changes: Vec<FileChange>,
}

/// Normalise one file. Returns the change record when the file was (or, in
/// a dry run, would have been) rewritten.
pub fn normalize_file(path: &Path, options: &TagOptions) -> Result<(NormalizedText, Option<FileChange>)> {
    let content = read_text(path)?;
    let normalized = normalize_text(&content, options)?;

    let Some(new_text) = &normalized.new_text else {
        return Ok((normalized, None));
    };

    if !options.dry_run {
        atomic_write_file(path, new_text.as_bytes())?;
    }

    let change = FileChange {
        path: path.to_path_buf(),
        kind: normalized.result.kind,
        original_count: normalized.result.original_count,
        new_count: normalized.result.new_count,
        chosen_tag: normalized.result.chosen_tag.clone(),
        inline_tags_removed: normalized.inline_tags_removed,
    };
    Ok((normalized, Some(change)))
}

/// Normalise every markdown file in the vault. One bad file never stops the
/// batch; it is logged and counted.
pub fn normalize_vault(root: &Path, options: &TagOptions) -> TagRunSummary {
    let mut summary = TagRunSummary {
        dry_run: options.dry_run,
        ..Default::default()
    };

    let (files, walk_errors) = collect_md_files(root, &options.templates_dir);
    for e in walk_errors {
        log::error!("[tags] {}", e);
        summary.errored += 1;
    }

    log::info!("[tags] Normalising {} markdown files under {:?}", files.len(), root);

    for path in files {
        summary.processed += 1;
        match normalize_file(&path, options) {
            Ok((normalized, change)) => {
                if normalized.malformed {
                    log::warn!("[tags] Malformed frontmatter treated as empty: {:?}", path);
                    summary.malformed += 1;
                }
                match change {
                    Some(change) => {
                        log::debug!(
                            "[tags] {:?}: {} -> {} tags (chosen: {:?})",
                            path,
                            change.original_count,
                            change.new_count,
                            change.chosen_tag
                        );
                        summary.modified += 1;
                        summary.changes.push(change);
                    }
                    None => summary.unchanged += 1,
                }
            }
            Err(e) => {
                log::error!("[tags] Failed to normalise {:?}: {}", path, e);
                summary.errored += 1;
            }
        }
    }

    log::info!(
        "[tags] Done: {} processed, {} modified, {} errored",
        summary.processed,
        summary.modified,
        summary.errored
    );
    summary
}

/// Build the tag hierarchy from every document in the vault.
pub fn collect_tag_tree(root: &Path, templates_dir: &str) -> TagTree {
    let mut tree = TagTree::new();
    let (files, walk_errors) = collect_md_files(root, templates_dir);
    for e in walk_errors {
        log::error!("[tags] {}", e);
    }

    for path in files {
        match read_text(&path) {
            Ok(content) => {
                let document = FrontmatterParser::parse(&content);
                for tag in document.frontmatter.tags() {
                    tree.insert(&tag);
                }
            }
            Err(e) => log::error!("[tags] {}", e),
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Document {
        FrontmatterParser::parse(&format!("---\n{}---\nbody\n", yaml))
    }

    fn tags_of(result: &ConsolidationResult) -> Vec<String> {
        result.frontmatter.tags()
    }

    #[test]
    fn test_deeper_tag_wins() {
        let d = doc("tags: [mba/course/finance, mba/course/finance/corporate-finance]\n");
        let result = consolidate(&d, false, &PriorityTable::base());
        assert_eq!(tags_of(&result), vec!["mba/course/finance/corporate-finance"]);
        assert_eq!(result.original_count, 2);
        assert_eq!(result.new_count, 1);
        assert!(result.changed);
    }

    #[test]
    fn test_registered_priority_can_beat_depth() {
        let d = doc("tags: [random/unregistered/deep/tag, mba/course]\n");
        let result = consolidate(&d, false, &PriorityTable::base());
        assert_eq!(result.chosen_tag.as_deref(), Some("mba/course"));
    }

    #[test]
    fn test_registered_tag_beats_unregistered_family_member() {
        let d = doc("tags: [mba/course/foo, skill/analysis]\n");
        let result = consolidate(&d, false, &PriorityTable::base());
        assert_eq!(result.chosen_tag.as_deref(), Some("skill/analysis"));
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let d = doc("tags: [alpha/one, beta/two]\n");
        let result = consolidate(&d, false, &PriorityTable::empty());
        assert_eq!(result.chosen_tag.as_deref(), Some("alpha/one"));
    }

    #[test]
    fn test_structural_tags_kept_only_when_asked() {
        let d = doc("tags: [index/course, topic/a, structure/x]\n");

        let dropped = consolidate(&d, false, &PriorityTable::base());
        assert_eq!(tags_of(&dropped), vec!["topic/a"]);

        let kept = consolidate(&d, true, &PriorityTable::base());
        assert_eq!(tags_of(&kept), vec!["topic/a", "index/course", "structure/x"]);
        assert_eq!(kept.new_count, 3);
    }

    #[test]
    fn test_only_structural_tags_removes_key() {
        let d = doc("title: T\ntags: [index/course]\n");
        let result = consolidate(&d, false, &PriorityTable::base());
        assert!(result.frontmatter.get("tags").is_none());
        assert_eq!(result.chosen_tag, None);
        assert_eq!(result.new_count, 0);
    }

    #[test]
    fn test_index_documents_lose_all_tags() {
        let d = doc("index-type: lesson-index\ntags: [mba/course, skill/excel]\n");
        let result = consolidate(&d, true, &PriorityTable::base());
        assert_eq!(result.kind, ConsolidationKind::IndexCleared);
        assert!(result.frontmatter.get("tags").is_none());
        assert_eq!(result.original_count, 2);
    }

    #[test]
    fn test_no_tags_is_a_no_op() {
        for d in [
            doc("title: T\n"),
            FrontmatterParser::parse("plain body"),
            FrontmatterParser::parse("---\ntags: [broken\n---\nbody"),
        ] {
            let result = consolidate(&d, false, &PriorityTable::base());
            assert_eq!(result.kind, ConsolidationKind::NoTags);
            assert_eq!((result.original_count, result.new_count), (0, 0));
            assert!(!result.changed);
        }
    }

    #[test]
    fn test_single_tag_list_is_unchanged() {
        let d = doc("tags:\n- mba/course\n");
        let result = consolidate(&d, false, &PriorityTable::base());
        assert!(!result.changed);
    }

    #[test]
    fn test_normalize_text_rewrites_frontmatter_and_body() {
        let content = "---\ntitle: T\ntags:\n- a\n- a/b\n---\nText #inline here\n";
        let normalized = normalize_text(content, &TagOptions::default()).unwrap();
        assert_eq!(
            normalized.new_text.as_deref(),
            Some("---\ntitle: T\ntags:\n- a/b\n---\nText here\n")
        );
        assert_eq!(normalized.inline_tags_removed, 1);
    }

    #[test]
    fn test_body_only_change_keeps_frontmatter_formatting() {
        let content = "---\n# keep me\ntitle: \"Quoted\"\ntags: [a/b]\n---\nText #inline\n";
        let normalized = normalize_text(content, &TagOptions::default()).unwrap();
        assert!(!normalized.result.changed);
        assert_eq!(
            normalized.new_text.as_deref(),
            Some("---\n# keep me\ntitle: \"Quoted\"\ntags: [a/b]\n---\nText\n")
        );
    }

    #[test]
    fn test_normalize_text_leaves_clean_files_alone() {
        let content = "---\ntags:\n- a/b\n---\nNothing to do\n";
        let normalized = normalize_text(content, &TagOptions::default()).unwrap();
        assert_eq!(normalized.new_text, None);
    }
}
