use serde::Serialize;
use std::path::Path;

use crate::vault::is_hidden;

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

/// Content category of a non-index file, in section order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Readings,
    Videos,
    Transcripts,
    Notes,
    Quizzes,
    Assignments,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 6] = [
        ContentCategory::Readings,
        ContentCategory::Videos,
        ContentCategory::Transcripts,
        ContentCategory::Notes,
        ContentCategory::Quizzes,
        ContentCategory::Assignments,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            ContentCategory::Readings => "Readings",
            ContentCategory::Videos => "Videos",
            ContentCategory::Transcripts => "Transcripts",
            ContentCategory::Notes => "Notes",
            ContentCategory::Quizzes => "Quizzes",
            ContentCategory::Assignments => "Assignments",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ContentCategory::Readings => "📄",
            ContentCategory::Videos => "🎬",
            ContentCategory::Transcripts => "📝",
            ContentCategory::Notes => "🗒️",
            ContentCategory::Quizzes => "❓",
            ContentCategory::Assignments => "📋",
        }
    }
}

/// Classify a file found in a directory whose own index is `index_name`.
/// `None` means the file is not listed.
pub fn classify(file_name: &str, index_name: &str) -> Option<ContentCategory> {
    if is_hidden(file_name) || file_name == index_name {
        return None;
    }

    let lower = file_name.to_lowercase();
    if lower.contains("index") {
        return None;
    }

    let ext = Path::new(&lower)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        return Some(ContentCategory::Videos);
    }

    match ext.as_str() {
        "md" if lower.contains("transcript") => Some(ContentCategory::Transcripts),
        "md" if lower.contains("quiz") => Some(ContentCategory::Quizzes),
        "md" if lower.contains("assignment") => Some(ContentCategory::Assignments),
        "md" if lower.contains("note") => Some(ContentCategory::Notes),
        "md" | "pdf" => Some(ContentCategory::Readings),
        _ => None,
    }
}
