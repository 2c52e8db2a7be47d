use serde::{Deserialize, Serialize};
use std::fmt;

/// Deepest taxonomy level with its own index type (Lesson).
pub const MAX_LEVEL: usize = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum IndexType {
    MainIndex,
    ProgramIndex,
    CourseIndex,
    ClassIndex,
    ModuleIndex,
    LessonIndex,
    LiveSessionIndex,
    CaseStudyIndex,
    CaseStudiesIndex,
}

/// Lowercase, with `-` and `_` read as spaces, for name matching.
pub fn match_key(name: &str) -> String {
    name.to_lowercase().replace(['-', '_'], " ")
}

/// Whether `phrase` appears in `key` as whole words. "showcase" has no
/// `case` word in it.
pub fn has_words(key: &str, phrase: &str) -> bool {
    let words: Vec<&str> = key.split_whitespace().collect();
    let wanted: Vec<&str> = phrase.split_whitespace().collect();
    !wanted.is_empty() && words.windows(wanted.len()).any(|w| w == wanted.as_slice())
}

impl IndexType {
    pub fn as_str(self) -> &'static str {
        match self {
            IndexType::MainIndex => "main-index",
            IndexType::ProgramIndex => "program-index",
            IndexType::CourseIndex => "course-index",
            IndexType::ClassIndex => "class-index",
            IndexType::ModuleIndex => "module-index",
            IndexType::LessonIndex => "lesson-index",
            IndexType::LiveSessionIndex => "live-session-index",
            IndexType::CaseStudyIndex => "case-study-index",
            IndexType::CaseStudiesIndex => "case-studies-index",
        }
    }

    pub fn for_level(level: usize) -> Self {
        match level {
            0 => IndexType::MainIndex,
            1 => IndexType::ProgramIndex,
            2 => IndexType::CourseIndex,
            3 => IndexType::ClassIndex,
            4 => IndexType::ModuleIndex,
            _ => IndexType::LessonIndex,
        }
    }

    /// Name overrides run before the level lookup.
    pub fn resolve(level: usize, dir_name: &str) -> Self {
        let key = match_key(dir_name);
        if has_words(&key, "live session") {
            return IndexType::LiveSessionIndex;
        }
        if level > 0 && has_words(&key, "case studies") {
            return IndexType::CaseStudiesIndex;
        }
        if level == 4 && has_words(&key, "case") {
            return IndexType::CaseStudyIndex;
        }
        Self::for_level(level)
    }

    pub fn is_case_study(self) -> bool {
        matches!(self, IndexType::CaseStudyIndex | IndexType::CaseStudiesIndex)
    }

    /// Index pages that track progress get a completion field.
    pub fn tracks_completion(self) -> bool {
        matches!(
            self,
            IndexType::ClassIndex
                | IndexType::ModuleIndex
                | IndexType::LessonIndex
                | IndexType::LiveSessionIndex
        )
    }

    /// Lesson-like pages list videos next to their transcripts.
    pub fn merges_videos_and_transcripts(self) -> bool {
        matches!(self, IndexType::LessonIndex | IndexType::LiveSessionIndex)
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wording of the back link from a page at `level` to its parent.
pub fn back_label(level: usize) -> Option<&'static str> {
    match level {
        0 => None,
        1 => Some("Back to Main Index"),
        2 => Some("Back to Program Index"),
        3 => Some("Back to Course Index"),
        4 => Some("Back to Class Index"),
        _ => Some("Back to Module Index"),
    }
}
