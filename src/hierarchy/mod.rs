//! Hierarchy index generation.
//!
//! Every folder under the vault root gets `<folder>/<folder>.md`, an index page
//! listing its subfolders and content files. The page type follows the folder's
//! taxonomy level (Main → Program → Course → Class → Module → Lesson) with a few
//! name-based overrides. Pages marked read-only are never touched.

pub mod classify;
pub mod index_type;
pub mod render;
pub mod template;
pub mod title;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::frontmatter::types::{Document, Frontmatter, READONLY_VALUE};
use crate::frontmatter::FrontmatterParser;
use crate::vault::{atomic_write_file, is_hidden, is_traversable, read_text};
use classify::{classify, ContentCategory};
use index_type::{IndexType, MAX_LEVEL};
use render::{render_page, ChildFolder, ContentEntry, FolderKind, PageContext, PageSettings};
use template::IndexTemplate;
use title::friendly_title;

/// Badges shown per file; the rest of a note's tags are left out.
const MAX_BADGES: usize = 3;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub dry_run: bool,
    /// Overwrite existing pages that are not generated indices. Read-only
    /// pages stay protected.
    pub force: bool,
    /// Only generate these types; empty means all.
    pub type_filter: Vec<IndexType>,
    pub root_level: usize,
    pub templates_dir: String,
    pub template: Option<PathBuf>,
    pub readonly_key: String,
    pub main_title: String,
    pub home_note: String,
    pub dashboard_note: String,
    pub assignments_note: String,
    pub today: NaiveDate,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&VaultConfig::default())
    }
}

impl GenerateOptions {
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            dry_run: false,
            force: false,
            type_filter: Vec::new(),
            root_level: config.root_level,
            templates_dir: config.templates_dir.clone(),
            template: config.index_template.clone(),
            readonly_key: config.readonly_key.clone(),
            main_title: config.main_title.clone(),
            home_note: config.home_note.clone(),
            dashboard_note: config.dashboard_note.clone(),
            assignments_note: config.assignments_note.clone(),
            today: Local::now().date_naive(),
        }
    }

    fn accepts(&self, index_type: IndexType) -> bool {
        self.type_filter.is_empty() || self.type_filter.contains(&index_type)
    }

    fn page_settings(&self) -> PageSettings {
        PageSettings {
            readonly_key: self.readonly_key.clone(),
            home_note: self.home_note.clone(),
            dashboard_note: self.dashboard_note.clone(),
            assignments_note: self.assignments_note.clone(),
            updated: self.today.format("%Y-%m-%d").to_string(),
        }
    }
}

/// What happened to one folder's index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirOutcome {
    Written,
    Unchanged,
    SkippedReadonly,
    /// An existing page at the target is not a generated index.
    SkippedForeign,
    Filtered,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateSummary {
    pub dry_run: bool,
    pub template: String,
    pub generated: usize,
    pub unchanged: usize,
    pub skipped_readonly: usize,
    pub skipped_foreign: usize,
    pub skipped_filtered: usize,
    pub errored: usize,
    pub per_type: BTreeMap<IndexType, usize>,
    pub skipped: Vec<PathBuf>,
}

impl GenerateSummary {
    fn record(&mut self, index_type: IndexType, target: PathBuf, outcome: DirOutcome) {
        match outcome {
            DirOutcome::Written => self.generated += 1,
            DirOutcome::Unchanged => self.unchanged += 1,
            DirOutcome::SkippedReadonly => self.skipped_readonly += 1,
            DirOutcome::SkippedForeign => self.skipped_foreign += 1,
            DirOutcome::Filtered => {
                self.skipped_filtered += 1;
                return;
            }
        }
        match outcome {
            DirOutcome::Written | DirOutcome::Unchanged => {
                *self.per_type.entry(index_type).or_insert(0) += 1;
            }
            _ => self.skipped.push(target),
        }
    }
}

/// Names of the folders at taxonomy levels `0..=root_level`, ending with the
/// scan root. Levels above the root are read from the root's own path.
fn root_chain(root: &Path, root_level: usize) -> Result<Vec<String>> {
    if root_level > MAX_LEVEL {
        return Err(VaultError::Config(format!(
            "root-level {} is deeper than the lesson level ({})",
            root_level, MAX_LEVEL
        )));
    }

    let names: Vec<String> = root
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if names.len() < root_level + 1 {
        return Err(VaultError::Config(format!(
            "root-level {} needs {} named folders in {:?}",
            root_level,
            root_level + 1,
            root
        )));
    }
    Ok(names[names.len() - root_level - 1..].to_vec())
}

fn is_locked(document: &Document, readonly_key: &str) -> bool {
    match &document.frontmatter {
        Frontmatter::Malformed(raw) => {
            let raw = raw.to_lowercase();
            raw.contains(&readonly_key.to_lowercase()) && raw.contains(READONLY_VALUE)
        }
        frontmatter => frontmatter.is_readonly(readonly_key),
    }
}

fn badges_for(path: &Path, category: ContentCategory) -> Vec<String> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if ext != "md" {
        return if ext.is_empty() { Vec::new() } else { vec![ext] };
    }

    match read_text(path) {
        Ok(content) => {
            let mut tags = FrontmatterParser::parse(&content).frontmatter.tags();
            tags.truncate(MAX_BADGES);
            tags
        }
        Err(e) => {
            log::warn!("[index] No badges for {:?} ({:?}): {}", path, category, e);
            Vec::new()
        }
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| VaultError::io(dir, e))? {
        let entry = entry.map_err(|e| VaultError::io(dir, e))?;
        entries.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
    }
    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()).then(a.0.cmp(&b.0)));
    Ok(entries)
}

/// Every markdown file below a case study folder, flat, excluding generated
/// index pages.
fn case_study_entries(dir: &Path, templates_dir: &str) -> Vec<ContentEntry> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| is_traversable(e, templates_dir));

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("[index] {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let own_index = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|parent| format!("{}.md", parent.to_string_lossy()))
            .unwrap_or_default();
        if classify(&name, &own_index).is_none() || !name.to_lowercase().ends_with(".md") {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/");
        entries.push(ContentEntry {
            rel_path,
            title: friendly_title(&name),
            category: ContentCategory::Readings,
            badges: badges_for(entry.path(), ContentCategory::Readings),
        });
    }
    entries
}

/// Generate (or skip) the index page of one folder.
fn process_directory(
    dir: &Path,
    level: usize,
    names: &[String],
    template: &IndexTemplate,
    options: &GenerateOptions,
) -> Result<(IndexType, PathBuf, DirOutcome)> {
    let dir_name = names.last().cloned().unwrap_or_default();
    let index_type = IndexType::resolve(level, &dir_name);
    let index_name = format!("{}.md", dir_name);
    let target = dir.join(&index_name);

    if !options.accepts(index_type) {
        return Ok((index_type, target, DirOutcome::Filtered));
    }

    let previous = if target.is_file() {
        let content = read_text(&target)?;
        let document = FrontmatterParser::parse(&content);
        if is_locked(&document, &options.readonly_key) {
            log::info!("[index] Read-only, skipping {:?}", target);
            return Ok((index_type, target, DirOutcome::SkippedReadonly));
        }
        if !document.frontmatter.is_index() && !options.force {
            log::info!("[index] Not a generated index, skipping {:?} (use --force)", target);
            return Ok((index_type, target, DirOutcome::SkippedForeign));
        }
        Some((content, document))
    } else {
        None
    };

    let mut children = Vec::new();
    let mut files = Vec::new();
    for (name, path) in sorted_entries(dir)? {
        if is_hidden(&name) {
            continue;
        }
        if path.is_dir() {
            if name == options.templates_dir {
                continue;
            }
            children.push(ChildFolder {
                title: friendly_title(&name),
                kind: FolderKind::from_name(&name),
                name,
            });
        } else if !index_type.is_case_study() {
            if let Some(category) = classify(&name, &index_name) {
                files.push(ContentEntry {
                    badges: badges_for(&path, category),
                    title: friendly_title(&name),
                    rel_path: name,
                    category,
                });
            }
        }
    }
    if index_type.is_case_study() {
        files = case_study_entries(dir, &options.templates_dir);
    }

    let title = if index_type == IndexType::MainIndex {
        options.main_title.clone()
    } else {
        friendly_title(&dir_name)
    };
    let ctx = PageContext {
        dir_name: dir_name.clone(),
        level,
        index_type,
        title,
        program: (level >= 1).then(|| friendly_title(&names[1])),
        course: (level >= 2).then(|| friendly_title(&names[2])),
        parent_name: (level >= 1).then(|| names[level - 1].clone()),
        children,
        files,
        completion: previous
            .as_ref()
            .and_then(|(_, doc)| doc.frontmatter.get("completion-status").cloned()),
    };

    let page = render_page(&ctx, &template.base, &options.page_settings())?;
    if previous.as_ref().map(|(content, _)| content == &page).unwrap_or(false) {
        log::debug!("[index] Unchanged {:?}", target);
        return Ok((index_type, target, DirOutcome::Unchanged));
    }

    if options.dry_run {
        log::info!("[index] Would write {} {:?}", index_type, target);
    } else {
        atomic_write_file(&target, page.as_bytes())?;
        log::debug!("[index] Wrote {} {:?}", index_type, target);
    }
    Ok((index_type, target, DirOutcome::Written))
}

/// Generate index pages for every folder under `root`.
///
/// Setup problems (bad root level, unusable template) abort before anything is
/// written. Failures inside a folder are logged and counted, and the walk
/// carries on.
pub fn generate(root: &Path, options: &GenerateOptions) -> Result<GenerateSummary> {
    let chain = root_chain(root, options.root_level)?;
    let template = IndexTemplate::resolve(
        root,
        &options.templates_dir,
        options.template.as_deref(),
        &options.readonly_key,
    )?;

    let mut summary = GenerateSummary {
        dry_run: options.dry_run,
        template: template.source.to_string(),
        ..Default::default()
    };
    log::info!("[index] Generating indices under {:?} (template: {})", root, summary.template);

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_type().is_dir() && is_traversable(e, &options.templates_dir));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("[index] {}", e);
                summary.errored += 1;
                continue;
            }
        };

        let mut names = chain.clone();
        if let Ok(rel) = entry.path().strip_prefix(root) {
            names.extend(
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string()),
            );
        }
        let level = options.root_level + entry.depth();

        match process_directory(entry.path(), level, &names, &template, options) {
            Ok((index_type, target, outcome)) => summary.record(index_type, target, outcome),
            Err(e) => {
                log::error!("[index] Failed to index {:?}: {}", entry.path(), e);
                summary.errored += 1;
            }
        }
    }

    log::info!(
        "[index] Done: {} generated, {} unchanged, {} read-only, {} errored",
        summary.generated,
        summary.unchanged,
        summary.skipped_readonly,
        summary.errored
    );
    Ok(summary)
}
