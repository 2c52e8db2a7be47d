pub mod types;

use serde_yaml::{Mapping, Value};
use types::{Document, Frontmatter};

use crate::error::Result;

pub struct FrontmatterParser;

impl FrontmatterParser {
    /// Parse a markdown file into frontmatter and body.
    ///
    /// The body is kept byte-for-byte so a document can be written back
    /// without disturbing anything below the metadata block.
    pub fn parse(content: &str) -> Document {
        let Some((raw, body)) = Self::split(content) else {
            return Document {
                frontmatter: Frontmatter::Absent,
                body: content.to_string(),
            };
        };

        Document {
            frontmatter: Self::parse_block(raw),
            body: body.to_string(),
        }
    }

    /// Split off the block between a leading `---` line and the next `---` line.
    /// No closing line means no frontmatter.
    pub fn split(content: &str) -> Option<(&str, &str)> {
        let rest = content.strip_prefix("---")?;
        let first_nl = rest.find('\n')?;
        if !rest[..first_nl].trim().is_empty() {
            return None;
        }

        let block_start = 3 + first_nl + 1;
        let mut offset = block_start;
        for line in content[block_start..].split_inclusive('\n') {
            if line.trim_end() == "---" {
                let raw = &content[block_start..offset];
                let body = &content[offset + line.len()..];
                return Some((raw, body));
            }
            offset += line.len();
        }
        None
    }

    /// Parse the YAML between the delimiters. Anything that is not a mapping
    /// is kept as `Malformed` with its raw text.
    pub fn parse_block(raw: &str) -> Frontmatter {
        if raw.trim().is_empty() {
            return Frontmatter::Valid(Mapping::new());
        }
        match serde_yaml::from_str::<Value>(raw) {
            Ok(Value::Mapping(mapping)) => Frontmatter::Valid(mapping),
            Ok(Value::Null) => Frontmatter::Valid(Mapping::new()),
            Ok(other) => {
                log::debug!("[frontmatter] Block is not a mapping: {:?}", other);
                Frontmatter::Malformed(raw.to_string())
            }
            Err(e) => {
                log::debug!("[frontmatter] Failed to parse block: {}", e);
                Frontmatter::Malformed(raw.to_string())
            }
        }
    }

    /// Serialize a mapping to YAML (always newline terminated).
    pub fn to_yaml(mapping: &Mapping) -> Result<String> {
        if mapping.is_empty() {
            return Ok(String::new());
        }
        Ok(serde_yaml::to_string(mapping)?)
    }

    /// Combine frontmatter and body into markdown content.
    pub fn combine(frontmatter: &Frontmatter, body: &str) -> Result<String> {
        match frontmatter {
            Frontmatter::Absent => Ok(body.to_string()),
            Frontmatter::Malformed(raw) => Ok(format!("---\n{}---\n{}", raw, body)),
            Frontmatter::Valid(mapping) => {
                let yaml = Self::to_yaml(mapping)?;
                Ok(format!("---\n{}---\n{}", yaml, body))
            }
        }
    }
}

impl Document {
    pub fn render(&self) -> Result<String> {
        FrontmatterParser::combine(&self.frontmatter, &self.body)
    }
}
