use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{resolve_root, VaultConfig};
use crate::hierarchy::index_type::IndexType;
use crate::hierarchy::{generate, GenerateOptions, GenerateSummary};
use crate::tags::priority::PriorityCategory;
use crate::tags::{collect_tag_tree, normalize_vault, TagOptions, TagRunSummary};

#[derive(Parser, Debug)]
#[command(name = "coursevault")]
#[command(about = "Tag normalisation and index generation for course note vaults")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log progress (info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log every file touched (debug level)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file (defaults to <source>/.coursevault.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Frontmatter tag maintenance
    #[command(subcommand)]
    Tags(TagsCommand),

    /// Hierarchy index pages
    #[command(subcommand)]
    Index(IndexCommand),
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// Keep one tag per note and strip inline #tags
    Normalize(NormalizeArgs),
    /// Print the tag hierarchy with counts
    Tree(TreeArgs),
}

#[derive(Subcommand, Debug)]
pub enum IndexCommand {
    /// Write an index page into every folder
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Vault root
    #[arg(long)]
    pub source: PathBuf,

    /// Report changes without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Keep index/ and structure/ tags after the chosen tag
    #[arg(long)]
    pub keep_structural: bool,

    /// Boost one tag family above the others
    #[arg(long, value_enum)]
    pub priority: Option<PriorityCategory>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Vault root
    #[arg(long)]
    pub source: PathBuf,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Folder to index (the vault root or any folder below it)
    #[arg(long)]
    pub source: PathBuf,

    /// Report what would be written without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite existing pages that are not generated indices
    #[arg(long)]
    pub force: bool,

    /// Only generate these index types (repeatable)
    #[arg(long = "index-type", value_enum)]
    pub index_types: Vec<IndexType>,

    /// Template file whose frontmatter seeds every page
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Taxonomy level of --source (0 = Main ... 5 = Lesson)
    #[arg(long)]
    pub root_level: Option<usize>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn load_config(source: &Path, explicit: Option<&Path>) -> Result<(PathBuf, VaultConfig)> {
    let root = resolve_root(source)?;
    let mut config = VaultConfig::load(&root, explicit)?;
    // Template paths in the config file are relative to the vault root.
    if let Some(template) = &config.index_template {
        if template.is_relative() {
            config.index_template = Some(root.join(template));
        }
    }
    Ok((root, config))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise summary")?;
    println!("{}", json);
    Ok(())
}

fn print_tag_summary(summary: &TagRunSummary) {
    let verb = if summary.dry_run { "would modify" } else { "modified" };
    for change in &summary.changes {
        println!(
            "{} {}: {} -> {} tags{}",
            verb,
            change.path.display(),
            change.original_count,
            change.new_count,
            change
                .chosen_tag
                .as_ref()
                .map(|t| format!(" ({})", t))
                .unwrap_or_default()
        );
    }
    println!(
        "{} files, {} {}, {} unchanged, {} malformed, {} errors",
        summary.processed, summary.modified, verb, summary.unchanged, summary.malformed, summary.errored
    );
}

fn print_generate_summary(summary: &GenerateSummary) {
    let verb = if summary.dry_run { "would write" } else { "written" };
    println!("template: {}", summary.template);
    for (index_type, count) in &summary.per_type {
        println!("  {:<20} {}", index_type.as_str(), count);
    }
    for path in &summary.skipped {
        println!("skipped {}", path.display());
    }
    println!(
        "{} {}, {} unchanged, {} read-only, {} foreign, {} filtered, {} errors",
        summary.generated,
        verb,
        summary.unchanged,
        summary.skipped_readonly,
        summary.skipped_foreign,
        summary.skipped_filtered,
        summary.errored
    );
}

fn run_normalize(args: NormalizeArgs, config_path: Option<&Path>) -> Result<()> {
    let (root, mut config) = load_config(&args.source, config_path)?;
    if args.keep_structural {
        config.keep_structural = true;
    }
    if args.priority.is_some() {
        config.priority_category = args.priority;
    }

    let mut options = TagOptions::from_config(&config);
    options.dry_run = args.dry_run;

    let summary = normalize_vault(&root, &options);
    if args.json {
        print_json(&summary)
    } else {
        print_tag_summary(&summary);
        Ok(())
    }
}

fn run_tree(args: TreeArgs, config_path: Option<&Path>) -> Result<()> {
    let (root, config) = load_config(&args.source, config_path)?;
    let tree = collect_tag_tree(&root, &config.templates_dir);
    if args.json {
        return print_json(&tree);
    }
    if tree.is_empty() {
        println!("no tags");
    } else {
        print!("{}", tree.render());
    }
    Ok(())
}

fn run_generate(args: GenerateArgs, config_path: Option<&Path>) -> Result<()> {
    let (root, mut config) = load_config(&args.source, config_path)?;
    if let Some(level) = args.root_level {
        config.root_level = level;
    }
    if let Some(template) = args.template {
        config.index_template = Some(template);
    }
    config.validate()?;

    let mut options = GenerateOptions::from_config(&config);
    options.dry_run = args.dry_run;
    options.force = args.force;
    options.type_filter = args.index_types;

    let summary = generate(&root, &options)
        .with_context(|| format!("Index generation failed for {}", root.display()))?;
    if args.json {
        print_json(&summary)
    } else {
        print_generate_summary(&summary);
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Tags(TagsCommand::Normalize(args)) => run_normalize(args, config_path),
        Commands::Tags(TagsCommand::Tree(args)) => run_tree(args, config_path),
        Commands::Index(IndexCommand::Generate(args)) => run_generate(args, config_path),
    }
}
