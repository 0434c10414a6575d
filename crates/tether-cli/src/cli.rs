use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tether",
    about = "Tether: permanent identifiers for content objects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON description of the content tree
    #[arg(long, global = true, default_value = "content.json")]
    pub content: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Split an identifier into its parts
    Parse(UuidArgs),
    /// Show the cache key of an identifier
    Key(UuidArgs),
    /// Resolve an identifier to its content object
    Resolve(UuidArgs),
    /// Show the cache value for an identifier
    Value(UuidArgs),
    /// Show the identifier of a content object, minting one if needed
    Mint(MintArgs),
    /// Pre-populate the lookup cache for all pages and files
    Index(IndexArgs),
    /// Remove lookup cache entries
    Clear(ClearArgs),
}

#[derive(Args)]
pub struct UuidArgs {
    pub uuid: String,
}

/// Selects one content object. Without `--page` or `--user` the holder is
/// the site.
#[derive(Args)]
pub struct TargetArgs {
    /// Page path, e.g. `blog/article`
    #[arg(long, conflicts_with = "user")]
    pub page: Option<String>,
    /// User id
    #[arg(long)]
    pub user: Option<String>,
    /// A file of the holder
    #[arg(long, conflicts_with_all = ["block", "structure"])]
    pub file: Option<String>,
    /// A block of the holder, as `field/id`
    #[arg(long, conflicts_with = "structure")]
    pub block: Option<String>,
    /// A structure entry of the holder, as `field/id`
    #[arg(long)]
    pub structure: Option<String>,
}

#[derive(Args)]
pub struct MintArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Also write the cache entry
    #[arg(long)]
    pub populate: bool,
}

#[derive(Args)]
pub struct IndexArgs {}

#[derive(Args)]
pub struct ClearArgs {
    #[arg(required_unless_present = "all")]
    pub uuid: Option<String>,
    /// Also clear all descendant pages
    #[arg(short, long)]
    pub recursive: bool,
    /// Flush the whole cache
    #[arg(long, conflicts_with_all = ["uuid", "recursive"])]
    pub all: bool,
}
