// ABOUTME: CLI for parsing RSS documents with feedtree-rss.
// ABOUTME: Reads documents from files or stdin and prints the parsed tree as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser as ClapParser, ValueEnum};
use feedtree_rss::{ModuleKind, Parser};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModuleArg {
    CreativeCommons,
    Syndication,
    Itunes,
}

impl From<ModuleArg> for ModuleKind {
    fn from(arg: ModuleArg) -> Self {
        match arg {
            ModuleArg::CreativeCommons => ModuleKind::CreativeCommons,
            ModuleArg::Syndication => ModuleKind::Syndication,
            ModuleArg::Itunes => ModuleKind::Itunes,
        }
    }
}

/// Parse one or more RSS documents and output JSON.
#[derive(ClapParser, Debug)]
#[command(name = "feedtree")]
#[command(about = "Parse RSS 2.0 documents and print JSON", long_about = None)]
struct Args {
    /// Local file paths. Use "-" to read one document from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Treat unparseable dates as absent instead of failing.
    #[arg(long, default_value_t = false)]
    lenient_dates: bool,

    /// Extra chrono format tried after the built-in date formats (repeatable).
    #[arg(long = "date-format")]
    date_formats: Vec<String>,

    /// Also permit this module inside <item> (repeatable).
    #[arg(long = "item-module", value_enum)]
    item_modules: Vec<ModuleArg>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut builder = Parser::builder().lenient_dates(args.lenient_dates);
    for format in &args.date_formats {
        builder = builder.date_format(format.clone());
    }
    for module in &args.item_modules {
        builder = builder.allow_item_module((*module).into());
    }
    let parser = builder.build();

    let mut results = Vec::new();

    for target in &args.targets {
        match load_bytes(target).and_then(|bytes| parser.parse_bytes(&bytes).map_err(anyhow::Error::new)) {
            Ok(document) => results.push(json!({
                "source": target,
                "ok": true,
                "document": document,
                "error": null
            })),
            Err(err) => {
                tracing::warn!(target = %target, error = %err, "parse failed");
                results.push(json!({
                    "source": target,
                    "ok": false,
                    "document": null,
                    "error": err.to_string()
                }))
            }
        }
    }

    let parsed = results
        .iter()
        .filter(|r| r.get("ok").and_then(|v| v.as_bool()) == Some(true))
        .count();
    let failed = results.len() - parsed;

    // Output format:
    // - Single target and ok => emit the document object
    // - Otherwise emit an envelope with a documents array and counts
    let output = match results.first() {
        Some(first) if results.len() == 1 && failed == 0 => {
            first.get("document").cloned().unwrap_or_else(|| json!({}))
        }
        _ => json!({
            "documents": results,
            "total": results.len(),
            "parsed": parsed,
            "failed": failed
        }),
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
