use serde_yaml::{Mapping, Value};

/// Keys whose presence marks a document as a generated index page.
pub const INDEX_MARKER_KEYS: [&str; 3] = ["index-type", "template-type", "index"];

/// Value of the read-only marker key that blocks regeneration.
pub const READONLY_VALUE: &str = "readonly";
pub const WRITABLE_VALUE: &str = "writable";

/// The metadata block at the top of a markdown file.
///
/// `Absent` and `Malformed` are kept apart so a batch run can report a broken
/// block without treating it like a file that simply has no metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Frontmatter {
    Absent,
    /// Raw text between the delimiters, including its trailing newline.
    Malformed(String),
    Valid(Mapping),
}

impl Frontmatter {
    pub fn mapping(&self) -> Option<&Mapping> {
        match self {
            Frontmatter::Valid(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.mapping().and_then(|m| m.get(key))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Frontmatter::Malformed(_))
    }

    /// Generated index pages carry one of the index marker keys.
    pub fn is_index(&self) -> bool {
        self.mapping()
            .map(|m| INDEX_MARKER_KEYS.iter().any(|k| m.contains_key(*k)))
            .unwrap_or(false)
    }

    pub fn is_readonly(&self, marker_key: &str) -> bool {
        self.get_str(marker_key)
            .map(|v| v.trim().eq_ignore_ascii_case(READONLY_VALUE))
            .unwrap_or(false)
    }

    /// Tags declared under `tags`, normalised and deduplicated in input order.
    pub fn tags(&self) -> Vec<String> {
        self.get("tags").map(tags_from_value).unwrap_or_default()
    }
}

/// A markdown file split into its metadata block and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Copy of `mapping` without `key`, other keys keeping their order.
pub fn without_key(mapping: &Mapping, key: &str) -> Mapping {
    mapping
        .iter()
        .filter(|(k, _)| k.as_str() != Some(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Read a `tags` value: a single (comma separated) string or a list of scalars.
pub fn tags_from_value(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Sequence(seq) => seq.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim().trim_start_matches('#').trim();
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
