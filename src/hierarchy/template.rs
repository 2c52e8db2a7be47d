use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultError};
use crate::frontmatter::types::{Frontmatter, WRITABLE_VALUE};
use crate::frontmatter::FrontmatterParser;
use crate::vault::read_text;

pub const DEFAULT_TEMPLATE_FILE: &str = "index-template.md";

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    BuiltIn,
    File(PathBuf),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::BuiltIn => f.write_str("built-in"),
            TemplateSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Base frontmatter for generated index pages. Computed keys are written over
/// it; any other keys it declares are carried into every page.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTemplate {
    pub base: Mapping,
    pub source: TemplateSource,
}

impl IndexTemplate {
    pub fn built_in(readonly_key: &str) -> Self {
        let mut base = Mapping::new();
        base.insert(readonly_key.into(), WRITABLE_VALUE.into());
        base.insert("index-type".into(), Value::Null);
        base.insert("title".into(), Value::Null);
        Self {
            base,
            source: TemplateSource::BuiltIn,
        }
    }

    /// Read a template: the frontmatter of a markdown file, or a whole
    /// `.yaml`/`.yml` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_text(path).map_err(|e| VaultError::Template {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_yaml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        let frontmatter = if is_yaml {
            FrontmatterParser::parse_block(&content)
        } else {
            FrontmatterParser::parse(&content).frontmatter
        };

        match frontmatter {
            Frontmatter::Valid(base) => Ok(Self {
                base,
                source: TemplateSource::File(path.to_path_buf()),
            }),
            Frontmatter::Absent => Err(VaultError::Template {
                path: path.to_path_buf(),
                message: "no frontmatter block".into(),
            }),
            Frontmatter::Malformed(_) => Err(VaultError::Template {
                path: path.to_path_buf(),
                message: "frontmatter is not a YAML mapping".into(),
            }),
        }
    }

    /// An explicitly configured template must load. Without one, the vault's
    /// default template is used when present, else the built-in one.
    pub fn resolve(
        root: &Path,
        templates_dir: &str,
        explicit: Option<&Path>,
        readonly_key: &str,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(VaultError::Config(format!(
                    "index template {:?} does not exist",
                    path
                )));
            }
            return Self::from_file(path);
        }

        let default_path = root.join(templates_dir).join(DEFAULT_TEMPLATE_FILE);
        if default_path.is_file() {
            return Self::from_file(&default_path);
        }

        log::info!(
            "[index] No template at {:?}, using the built-in template",
            default_path
        );
        Ok(Self::built_in(readonly_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_falls_back_to_built_in() {
        let temp_dir = TempDir::new().unwrap();
        let template =
            IndexTemplate::resolve(temp_dir.path(), "_templates", None, "auto-generated-state")
                .unwrap();
        assert_eq!(template.source, TemplateSource::BuiltIn);
        let keys: Vec<&str> = template.base.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["auto-generated-state", "index-type", "title"]);
    }

    #[test]
    fn test_default_template_file_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("_templates");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(DEFAULT_TEMPLATE_FILE),
            "---\ncssclasses: [index-page]\ntitle: placeholder\n---\n",
        )
        .unwrap();

        let template =
            IndexTemplate::resolve(temp_dir.path(), "_templates", None, "auto-generated-state")
                .unwrap();
        assert!(matches!(template.source, TemplateSource::File(_)));
        assert!(template.base.contains_key("cssclasses"));
    }

    #[test]
    fn test_explicit_missing_template_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.md");
        let err = IndexTemplate::resolve(temp_dir.path(), "_templates", Some(&missing), "k")
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_yaml_template_and_malformed_template() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("index.yaml");
        fs::write(&yaml, "state: writable\nextra: 1\n").unwrap();
        assert!(IndexTemplate::from_file(&yaml).unwrap().base.contains_key("extra"));

        let broken = temp_dir.path().join("broken.md");
        fs::write(&broken, "---\n[not: a mapping\n---\n").unwrap();
        assert!(IndexTemplate::from_file(&broken).unwrap_err().is_fatal());
    }
}
