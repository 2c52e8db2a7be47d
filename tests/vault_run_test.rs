//! End-to-end runs through the public API and the command line entry point.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use coursevault_lib::cli::{run, Cli};
use coursevault_lib::frontmatter::FrontmatterParser;
use coursevault_lib::{
    generate, normalize_vault, GenerateOptions, IndexType, TagOptions, VaultConfig,
};

fn setup_vault() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("MBA Vault");
    let lesson = root.join("EMBA/Strategy/Class 2/Module 1/Lesson 3 - Five Forces");
    fs::create_dir_all(&lesson).unwrap();
    fs::write(
        lesson.join("porter.md"),
        "---\ntags: [skill/analysis, tool/excel]\n---\nFive forces #strategy\n",
    )
    .unwrap();
    fs::write(lesson.join("lecture.mp4"), b"\0").unwrap();
    (temp_dir, root)
}

fn index_type_of(page: &Path) -> Option<String> {
    let content = fs::read_to_string(page).ok()?;
    FrontmatterParser::parse(&content)
        .frontmatter
        .get_str("index-type")
        .map(str::to_string)
}

#[test]
fn test_config_file_drives_both_tools() {
    let (_temp_dir, root) = setup_vault();
    fs::write(
        root.join(".coursevault.yaml"),
        "main-title: My MBA\nhome-note: Start Here\npriority-overlay:\n  tool/excel: 500\n",
    )
    .unwrap();

    let config = VaultConfig::load(&root, None).unwrap();
    let summary = normalize_vault(&root, &TagOptions::from_config(&config));
    assert_eq!(summary.modified, 1);

    let porter = fs::read_to_string(root.join("EMBA/Strategy/Class 2/Module 1/Lesson 3 - Five Forces/porter.md")).unwrap();
    assert_eq!(porter, "---\ntags:\n- tool/excel\n---\nFive forces\n");

    let summary = generate(&root, &GenerateOptions::from_config(&config)).unwrap();
    assert_eq!(summary.errored, 0);
    assert_eq!(summary.per_type.get(&IndexType::LessonIndex), Some(&1));

    let main = fs::read_to_string(root.join("MBA Vault.md")).unwrap();
    assert!(main.contains("# My MBA\n"));
    assert!(main.contains("[[Start Here|🏠 Home]]"));
}

#[test]
fn test_cli_generate_with_relative_config_template() {
    let (_temp_dir, root) = setup_vault();
    fs::create_dir_all(root.join("meta")).unwrap();
    fs::write(
        root.join("meta/page.yaml"),
        "auto-generated-state: writable\nindex-type: null\ntitle: null\npublish: false\n",
    )
    .unwrap();
    fs::write(root.join(".coursevault.yaml"), "index-template: meta/page.yaml\n").unwrap();

    let cli = Cli::try_parse_from([
        "coursevault",
        "index",
        "generate",
        "--source",
        root.to_str().unwrap(),
        "--index-type",
        "lesson-index",
    ])
    .unwrap();
    run(cli).unwrap();

    let lesson_page = root.join(
        "EMBA/Strategy/Class 2/Module 1/Lesson 3 - Five Forces/Lesson 3 - Five Forces.md",
    );
    assert_eq!(index_type_of(&lesson_page).as_deref(), Some("lesson-index"));
    let content = fs::read_to_string(&lesson_page).unwrap();
    assert!(content.contains("publish: false"));
    assert!(content.contains("title: Five Forces"));
    assert!(!root.join("MBA Vault.md").exists());
}

#[test]
fn test_cli_rejects_missing_source() {
    let temp_dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from([
        "coursevault",
        "tags",
        "normalize",
        "--source",
        temp_dir.path().join("missing").to_str().unwrap(),
    ])
    .unwrap();
    assert!(run(cli).is_err());
}

#[test]
fn test_cli_root_level_flag() {
    let (_temp_dir, root) = setup_vault();
    let course = root.join("EMBA/Strategy");

    let cli = Cli::try_parse_from([
        "coursevault",
        "index",
        "generate",
        "--source",
        course.to_str().unwrap(),
        "--root-level",
        "2",
        "--dry-run",
    ])
    .unwrap();
    run(cli).unwrap();
    assert!(!course.join("Strategy.md").exists(), "dry run writes nothing");

    let cli = Cli::try_parse_from([
        "coursevault",
        "index",
        "generate",
        "--source",
        course.to_str().unwrap(),
        "--root-level",
        "2",
    ])
    .unwrap();
    run(cli).unwrap();
    assert_eq!(
        index_type_of(&course.join("Strategy.md")).as_deref(),
        Some("course-index")
    );
    assert_eq!(
        index_type_of(&course.join("Class 2/Module 1/Module 1.md")).as_deref(),
        Some("module-index")
    );
}
