//! Tag normalisation over a whole vault
//!
//! Covered:
//! 1. Every note ends with at most one content tag
//! 2. Index pages lose their tags
//! 3. Inline tags go, fenced code is kept verbatim
//! 4. Malformed frontmatter is reported and the body still cleaned
//! 5. Dry run and re-run are no-ops on disk
//! 6. Generated index pages pass through untouched

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    use crate::frontmatter::FrontmatterParser;
    use crate::hierarchy::{generate, GenerateOptions};
    use crate::tags::priority::PriorityCategory;
    use crate::tags::{collect_tag_tree, normalize_vault, ConsolidationKind, TagOptions};
    use crate::config::VaultConfig;

    const CODE_NOTE: &str = "---\ntags: [tool/python, skill/analysis]\n---\n\
Run this:\n\n```python\n# comment #not-a-tag\nx = 1\n```\n\nAfter the fence #inline\n";

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn tags_of(path: &Path) -> Vec<String> {
        let content = fs::read_to_string(path).unwrap();
        FrontmatterParser::parse(&content).frontmatter.tags()
    }

    fn build_vault(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("Vault");
        write(
            &root,
            "EMBA/Finance/npv.md",
            "---\ntitle: NPV\ntags:\n- mba/course/finance\n- mba/course/finance/corporate-finance\n- index/finance\n---\nDiscounting #finance basics\n",
        );
        write(
            &root,
            "EMBA/Finance/Finance.md",
            "---\nindex-type: course-index\ntags: [mba/course, skill/excel]\n---\nIndex body\n",
        );
        write(&root, "EMBA/Finance/code.md", CODE_NOTE);
        write(
            &root,
            "EMBA/broken.md",
            "---\ntags: [unclosed\n---\nStill #cleaned here\n",
        );
        write(&root, "EMBA/plain.md", "No frontmatter, no tags.\n");
        write(
            &root,
            "_templates/note.md",
            "---\ntags: [type/reading, type/video]\n---\n#template\n",
        );
        root
    }

    #[test]
    fn test_vault_run_consolidates_every_note() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);

        let summary = normalize_vault(&root, &TagOptions::default());

        assert_eq!(summary.processed, 5, "templates folder is skipped");
        assert_eq!(summary.errored, 0);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.modified, 4);
        assert_eq!(summary.unchanged, 1);

        assert_eq!(
            tags_of(&root.join("EMBA/Finance/npv.md")),
            vec!["mba/course/finance/corporate-finance"]
        );
        let npv = fs::read_to_string(root.join("EMBA/Finance/npv.md")).unwrap();
        assert!(npv.starts_with("---\ntitle: NPV\ntags:\n"), "key order is kept");
        assert!(npv.ends_with("---\nDiscounting basics\n"));

        let index = fs::read_to_string(root.join("EMBA/Finance/Finance.md")).unwrap();
        assert_eq!(index, "---\nindex-type: course-index\n---\nIndex body\n");
        let cleared = summary
            .changes
            .iter()
            .find(|c| c.path.ends_with("Finance.md"))
            .unwrap();
        assert_eq!(cleared.kind, ConsolidationKind::IndexCleared);

        let template = fs::read_to_string(root.join("_templates/note.md")).unwrap();
        assert!(template.contains("type/video"), "templates are never rewritten");
    }

    #[test]
    fn test_fenced_code_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);

        normalize_vault(&root, &TagOptions::default());
        let code = fs::read_to_string(root.join("EMBA/Finance/code.md")).unwrap();

        assert!(code.contains("# comment #not-a-tag\n"));
        assert!(code.ends_with("After the fence\n"));
        assert_eq!(
            tags_of(&root.join("EMBA/Finance/code.md")),
            vec!["skill/analysis"]
        );
    }

    #[test]
    fn test_malformed_frontmatter_is_kept_and_body_cleaned() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);

        normalize_vault(&root, &TagOptions::default());
        let broken = fs::read_to_string(root.join("EMBA/broken.md")).unwrap();

        assert_eq!(broken, "---\ntags: [unclosed\n---\nStill here\n");
    }

    #[test]
    fn test_category_preference_changes_the_winner() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);

        let config = VaultConfig {
            priority_category: Some(PriorityCategory::Tool),
            ..VaultConfig::default()
        };
        normalize_vault(&root, &TagOptions::from_config(&config));

        assert_eq!(tags_of(&root.join("EMBA/Finance/code.md")), vec!["tool/python"]);
    }

    #[test]
    fn test_dry_run_then_real_run_then_rerun() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);
        let npv_path = root.join("EMBA/Finance/npv.md");
        let original = fs::read_to_string(&npv_path).unwrap();

        let options = TagOptions {
            dry_run: true,
            ..TagOptions::default()
        };
        let dry = normalize_vault(&root, &options);
        assert_eq!(dry.modified, 4);
        assert_eq!(fs::read_to_string(&npv_path).unwrap(), original);

        let real = normalize_vault(&root, &TagOptions::default());
        assert_eq!(real.modified, dry.modified);

        let again = normalize_vault(&root, &TagOptions::default());
        assert_eq!(again.modified, 0, "normalisation is idempotent");
        assert_eq!(again.unchanged, again.processed);
    }

    #[test]
    fn test_generated_indices_survive_normalisation() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);
        normalize_vault(&root, &TagOptions::default());

        let options = GenerateOptions {
            today: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            force: true,
            ..GenerateOptions::default()
        };
        generate(&root, &options).unwrap();
        let main = fs::read_to_string(root.join("Vault.md")).unwrap();

        let summary = normalize_vault(&root, &TagOptions::default());
        assert_eq!(summary.modified, 0);
        assert_eq!(fs::read_to_string(root.join("Vault.md")).unwrap(), main);
    }

    #[test]
    fn test_tag_tree_counts_after_normalisation() {
        let temp_dir = TempDir::new().unwrap();
        let root = build_vault(&temp_dir);
        normalize_vault(&root, &TagOptions::default());

        let tree = collect_tag_tree(&root, "_templates");
        let rendered = tree.render();

        assert!(rendered.contains("mba (1)\n"));
        assert!(rendered.contains("skill (1)\n"));
        assert!(!rendered.contains("type"), "template tags are not counted");
    }
}
