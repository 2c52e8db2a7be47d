pub mod cli;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod hierarchy;
pub mod tags;
pub mod vault;

#[cfg(test)]
mod tag_consolidation_test;


pub use config::{resolve_root, VaultConfig};
pub use error::{Result, VaultError};
pub use hierarchy::index_type::IndexType;
pub use hierarchy::{generate, GenerateOptions, GenerateSummary};
pub use tags::{collect_tag_tree, consolidate, normalize_vault, TagOptions, TagRunSummary};
