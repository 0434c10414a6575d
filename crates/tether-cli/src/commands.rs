use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use tether_content::{ContentProps, InMemoryContentTree};
use tether_resolver::{CacheKey, EntityType, Identifier, Model, Resolver, TetherConfig};
use tracing::info;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let content = cli.content.as_path();
    let config = cli.config.as_deref();

    match cli.command {
        Command::Parse(args) => cmd_parse(args, format),
        Command::Key(args) => cmd_key(args, format),
        Command::Resolve(args) => with_session(content, config, |s| cmd_resolve(s, args, format)),
        Command::Value(args) => with_session(content, config, |s| cmd_value(s, args, format)),
        Command::Mint(args) => with_session(content, config, |s| cmd_mint(s, args, format)),
        Command::Index(_) => with_session(content, config, |s| cmd_index(s, format)),
        Command::Clear(args) => with_session(content, config, |s| cmd_clear(s, args, format)),
    }
}

/// A loaded content tree and a resolver over it. Identifier writes made
/// while the session is open are saved back to the content file.
struct Session {
    path: PathBuf,
    tree: Arc<InMemoryContentTree>,
    resolver: Resolver,
    loaded: ContentProps,
}

impl Session {
    fn open(content: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let tree = InMemoryContentTree::load(content)
            .with_context(|| format!("failed to load content from {}", content.display()))?;
        let tree = Arc::new(tree);

        let config = match config {
            Some(path) => TetherConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => TetherConfig::default(),
        };
        let resolver = Resolver::from_config(&config, tree.clone(), tree.auth())?;
        let loaded = tree.snapshot()?;

        Ok(Self {
            path: content.to_path_buf(),
            tree,
            resolver,
            loaded,
        })
    }

    fn close(self) -> anyhow::Result<()> {
        if self.tree.snapshot()? != self.loaded {
            self.tree.save(&self.path)?;
            info!(path = %self.path.display(), "content saved");
        }
        Ok(())
    }
}

fn with_session<F>(content: &Path, config: Option<&Path>, run: F) -> anyhow::Result<()>
where
    F: FnOnce(&Session) -> anyhow::Result<()>,
{
    let session = Session::open(content, config)?;
    let result = run(&session);
    // minted identifiers are kept even if the command failed afterwards
    session.close()?;
    result
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ParsedIdentifier<'a> {
    #[serde(rename = "type")]
    kind: EntityType,
    host: &'a str,
    path: &'a [String],
    key: CacheKey,
}

fn cmd_parse(args: UuidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = Identifier::parse(&args.uuid)?;
    let parsed = ParsedIdentifier {
        kind: id.kind(),
        host: id.host(),
        path: id.path(),
        key: CacheKey::for_identifier(&id),
    };

    match format {
        OutputFormat::Json => print_json(&parsed),
        OutputFormat::Text => {
            println!("{}  {}", "type:".bold(), parsed.kind.to_string().cyan());
            println!("{}  {}", "host:".bold(), parsed.host);
            if !parsed.path.is_empty() {
                println!("{}  {}", "path:".bold(), parsed.path.join("/"));
            }
            println!("{}   {}", "key:".bold(), parsed.key.as_str().yellow());
            Ok(())
        }
    }
}

fn cmd_key(args: UuidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let key = CacheKey::for_identifier(&Identifier::parse(&args.uuid)?);
    match format {
        OutputFormat::Json => print_json(&key),
        OutputFormat::Text => {
            println!("{key}");
            Ok(())
        }
    }
}

fn cmd_resolve(session: &Session, args: UuidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut lookup = session.resolver.lookup(args.uuid.as_str())?;
    let model = lookup.to_model()?;

    match (format, model) {
        (OutputFormat::Json, model) => print_json(&model),
        (OutputFormat::Text, Some(model)) => {
            println!("{} {} → {}", "✓".green().bold(), lookup.to_string().yellow(), model);
            Ok(())
        }
        (OutputFormat::Text, None) => bail!("{} does not resolve to a content object", args.uuid),
    }
}

fn cmd_value(session: &Session, args: UuidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut lookup = session.resolver.lookup(args.uuid.as_str())?;
    let value = lookup.value()?;
    match format {
        OutputFormat::Json => print_json(&value),
        OutputFormat::Text => {
            println!("{value}");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct Minted {
    model: Model,
    uuid: String,
    populated: bool,
}

fn cmd_mint(session: &Session, args: MintArgs, format: OutputFormat) -> anyhow::Result<()> {
    let model = target_model(&args.target)?;
    let mut lookup = session.resolver.lookup(&model)?;
    let populated = if args.populate {
        lookup.populate()?
    } else {
        false
    };
    let minted = Minted {
        uuid: lookup.to_string(),
        model,
        populated,
    };

    match format {
        OutputFormat::Json => print_json(&minted),
        OutputFormat::Text => {
            println!("{} {}", minted.model, minted.uuid.yellow().bold());
            if minted.populated {
                println!("  {} {}", "cached:".green(), lookup.key());
            }
            Ok(())
        }
    }
}

fn cmd_index(session: &Session, format: OutputFormat) -> anyhow::Result<()> {
    let report = session.resolver.index()?;

    if let OutputFormat::Json = format {
        print_json(&report)?;
    } else {
        println!(
            "{} Indexed {} entries ({} skipped)",
            "✓".green().bold(),
            report.populated.len().to_string().bold(),
            report.skipped.len()
        );
        for failure in &report.failed {
            println!("  {} {}: {}", "failed:".red(), failure.model, failure.reason);
        }
    }

    if !report.succeeded() {
        bail!("{} objects could not be indexed", report.failed.len());
    }
    Ok(())
}

fn cmd_clear(session: &Session, args: ClearArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.all {
        if !session.resolver.flush() {
            bail!("failed to flush the lookup cache");
        }
        if let OutputFormat::Text = format {
            println!("{} Lookup cache flushed", "✓".green().bold());
        }
        return Ok(());
    }

    let Some(uuid) = args.uuid else {
        bail!("nothing to clear");
    };
    let report = session.resolver.lookup(uuid.as_str())?.clear(args.recursive)?;

    if let OutputFormat::Json = format {
        print_json(&report)?;
    } else {
        for key in &report.removed {
            println!("  {} {}", "removed:".green(), key);
        }
        for key in &report.failed {
            println!("  {} {}", "failed:".red(), key);
        }
        println!(
            "{} Cleared {} entries ({} absent)",
            "✓".green().bold(),
            report.removed.len(),
            report.absent.len()
        );
    }

    if !report.succeeded() {
        bail!("{} cache entries could not be removed", report.failed.len());
    }
    Ok(())
}

fn target_model(target: &TargetArgs) -> anyhow::Result<Model> {
    let holder = match (&target.page, &target.user) {
        (Some(_), Some(_)) => bail!("--page and --user are exclusive"),
        (Some(page), None) => Model::page(page.trim_matches('/')),
        (None, Some(user)) => Model::user(user.as_str()),
        (None, None) => Model::Site,
    };

    if let Some(filename) = &target.file {
        return Ok(Model::file(holder, filename.as_str()));
    }
    if let Some(entry) = &target.block {
        let (field, id) = split_entry(entry)?;
        return Ok(Model::block(holder, field, id));
    }
    if let Some(entry) = &target.structure {
        let (field, id) = split_entry(entry)?;
        return Ok(Model::structure(holder, field, id));
    }
    Ok(holder)
}

fn split_entry(entry: &str) -> anyhow::Result<(&str, &str)> {
    match entry.split_once('/') {
        Some((field, id)) if !field.is_empty() && !id.is_empty() => Ok((field, id)),
        _ => bail!("expected <field>/<id>, got {entry:?}"),
    }
}
