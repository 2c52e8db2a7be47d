//! Markdown layout of generated index pages.

use serde_yaml::{Mapping, Value};

use super::classify::ContentCategory;
use super::index_type::{back_label, has_words, match_key, IndexType};
use crate::error::Result;
use crate::frontmatter::types::{Document, Frontmatter, WRITABLE_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    Regular,
    LiveSession,
    CaseStudy,
}

impl FolderKind {
    pub fn from_name(name: &str) -> Self {
        let key = match_key(name);
        if has_words(&key, "live session") {
            FolderKind::LiveSession
        } else if has_words(&key, "case") {
            FolderKind::CaseStudy
        } else {
            FolderKind::Regular
        }
    }

    fn icon(self) -> &'static str {
        match self {
            FolderKind::Regular => "📁",
            FolderKind::LiveSession => "🎥",
            FolderKind::CaseStudy => "💼",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildFolder {
    pub name: String,
    pub title: String,
    pub kind: FolderKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntry {
    /// Path relative to the indexed folder, `/` separated.
    pub rel_path: String,
    pub title: String,
    pub category: ContentCategory,
    pub badges: Vec<String>,
}

/// Everything known about one folder before its page is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub dir_name: String,
    pub level: usize,
    pub index_type: IndexType,
    pub title: String,
    pub program: Option<String>,
    pub course: Option<String>,
    pub parent_name: Option<String>,
    pub children: Vec<ChildFolder>,
    pub files: Vec<ContentEntry>,
    /// Previous `completion-status`, carried over on regeneration.
    pub completion: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    pub readonly_key: String,
    pub home_note: String,
    pub dashboard_note: String,
    pub assignments_note: String,
    /// Value of the `updated` field.
    pub updated: String,
}

fn wikilink(name: &str) -> String {
    format!("[[{}]]", name)
}

fn folder_index_link(name: &str) -> String {
    format!("<{}/{}.md>", name, name)
}

fn set(mapping: &mut Mapping, key: &str, value: Value) {
    mapping.insert(Value::String(key.to_string()), value);
}

pub fn build_frontmatter(ctx: &PageContext, template: &Mapping, settings: &PageSettings) -> Mapping {
    let mut fm = template.clone();
    set(&mut fm, &settings.readonly_key, WRITABLE_VALUE.into());
    set(&mut fm, "index-type", ctx.index_type.as_str().into());
    set(&mut fm, "title", ctx.title.clone().into());
    if let Some(program) = &ctx.program {
        set(&mut fm, "program", program.clone().into());
    }
    if let Some(course) = &ctx.course {
        set(&mut fm, "course", course.clone().into());
    }
    if ctx.index_type.tracks_completion() {
        let completion = ctx
            .completion
            .clone()
            .unwrap_or_else(|| Value::from("not-started"));
        set(&mut fm, "completion-status", completion);
    }
    set(&mut fm, "updated", settings.updated.clone().into());
    if let Some(parent) = &ctx.parent_name {
        set(&mut fm, "up", wikilink(parent).into());
    }
    if !ctx.children.is_empty() {
        let down = ctx
            .children
            .iter()
            .map(|c| Value::String(wikilink(&c.name)))
            .collect();
        set(&mut fm, "down", Value::Sequence(down));
    }
    fm
}

pub fn navigation_line(ctx: &PageContext, settings: &PageSettings) -> String {
    let mut parts = Vec::with_capacity(4);
    if let (Some(label), Some(parent)) = (back_label(ctx.level), &ctx.parent_name) {
        parts.push(format!("[⬅ {}](<../{}.md>)", label, parent));
    }
    parts.push(format!("[[{}|🏠 Home]]", settings.home_note));
    parts.push(format!("[[{}|📊 Dashboard]]", settings.dashboard_note));
    parts.push(format!("[[{}|📋 Assignments]]", settings.assignments_note));
    parts.join(" | ")
}

fn folder_section(heading: &str, folders: &[&ChildFolder]) -> Option<String> {
    if folders.is_empty() {
        return None;
    }
    let mut out = format!("## {}\n\n", heading);
    for folder in folders {
        out.push_str(&format!(
            "- {} [{}]({})\n",
            folder.kind.icon(),
            folder.title,
            folder_index_link(&folder.name)
        ));
    }
    Some(out)
}

fn entry_line(entry: &ContentEntry, icon: &str) -> String {
    let mut line = format!("- {} [{}](<{}>)", icon, entry.title, entry.rel_path);
    for badge in &entry.badges {
        line.push_str(&format!(" `{}`", badge));
    }
    line.push('\n');
    line
}

fn file_section(heading: &str, entries: &[&ContentEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let mut out = format!("## {}\n\n", heading);
    for entry in entries {
        out.push_str(&entry_line(entry, entry.category.icon()));
    }
    Some(out)
}

fn entries_of(files: &[ContentEntry], category: ContentCategory) -> Vec<&ContentEntry> {
    files.iter().filter(|f| f.category == category).collect()
}

fn by_kind<'a>(children: &'a [ChildFolder], kinds: &[FolderKind]) -> Vec<&'a ChildFolder> {
    children.iter().filter(|c| kinds.contains(&c.kind)).collect()
}

/// Folder groups for a page type. The flag marks groups that get `---`
/// separators between them.
fn folder_groups(ctx: &PageContext) -> (Vec<Option<String>>, bool) {
    use FolderKind::*;
    let all = [Regular, LiveSession, CaseStudy];
    let children = &ctx.children;

    match ctx.index_type {
        IndexType::MainIndex => (vec![folder_section("Programs", &by_kind(children, &all))], false),
        IndexType::ProgramIndex => (vec![folder_section("Courses", &by_kind(children, &all))], false),
        IndexType::CourseIndex => (
            vec![
                folder_section("Classes", &by_kind(children, &[Regular])),
                folder_section("Live Sessions", &by_kind(children, &[LiveSession])),
                folder_section("Case Studies", &by_kind(children, &[CaseStudy])),
            ],
            true,
        ),
        IndexType::ClassIndex => (
            vec![
                folder_section("Modules", &by_kind(children, &[Regular])),
                folder_section("Live Sessions", &by_kind(children, &[LiveSession])),
                folder_section("Case Studies", &by_kind(children, &[CaseStudy])),
            ],
            false,
        ),
        IndexType::ModuleIndex => (
            vec![
                folder_section("Live Session", &by_kind(children, &[LiveSession])),
                folder_section("Lessons", &by_kind(children, &[Regular, CaseStudy])),
            ],
            false,
        ),
        IndexType::LessonIndex | IndexType::LiveSessionIndex => {
            (vec![folder_section("Sections", &by_kind(children, &all))], false)
        }
        IndexType::CaseStudyIndex | IndexType::CaseStudiesIndex => (Vec::new(), false),
    }
}

fn file_sections(ctx: &PageContext) -> Vec<String> {
    if ctx.index_type == IndexType::MainIndex {
        return Vec::new();
    }
    if ctx.index_type.is_case_study() {
        let entries: Vec<&ContentEntry> = ctx.files.iter().collect();
        let mut out = Vec::new();
        if !entries.is_empty() {
            let mut section = String::from("## Case Studies\n\n");
            for entry in entries {
                section.push_str(&entry_line(entry, "💼"));
            }
            out.push(section);
        }
        return out;
    }

    let mut sections = Vec::new();
    for category in ContentCategory::ALL {
        let section = match category {
            ContentCategory::Videos if ctx.index_type.merges_videos_and_transcripts() => {
                let mut merged = entries_of(&ctx.files, ContentCategory::Videos);
                merged.extend(entries_of(&ctx.files, ContentCategory::Transcripts));
                file_section("Videos & Transcripts", &merged)
            }
            ContentCategory::Transcripts if ctx.index_type.merges_videos_and_transcripts() => None,
            _ => file_section(category.heading(), &entries_of(&ctx.files, category)),
        };
        sections.extend(section);
    }
    sections
}

pub fn render_body(ctx: &PageContext, settings: &PageSettings) -> String {
    let mut body = String::new();
    body.push('\n');
    body.push_str(&navigation_line(ctx, settings));
    body.push_str("\n\n");
    body.push_str(&format!("# {}\n", ctx.title));

    let (groups, separated) = folder_groups(ctx);
    let groups: Vec<String> = groups.into_iter().flatten().collect();
    let joiner = if separated { "\n---\n\n" } else { "\n" };
    if !groups.is_empty() {
        body.push('\n');
        body.push_str(&groups.join(joiner));
    }

    for section in file_sections(ctx) {
        body.push('\n');
        body.push_str(&section);
    }
    body
}

/// Full page text: frontmatter, navigation, heading and sections.
pub fn render_page(ctx: &PageContext, template: &Mapping, settings: &PageSettings) -> Result<String> {
    let document = Document {
        frontmatter: Frontmatter::Valid(build_frontmatter(ctx, template, settings)),
        body: render_body(ctx, settings),
    };
    document.render()
}
