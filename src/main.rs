// Command-line entry point for Callscope.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use callscope::application::Analyzer;
use callscope::domain::block::FunctionRef;
use callscope::domain::graph::{GraphBuilder, MatchStrictness};
use callscope::infrastructure::concurrency::init_thread_pool;
use callscope::infrastructure::JsonSourceProvider;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of raw syntax trees, one <Module.Name>.json per module
    #[arg(short, long)]
    source: PathBuf,

    /// Entry function reference, e.g. "Math.add/2"
    #[arg(short, long)]
    entry: Option<String>,

    /// List cached modules after scanning
    #[arg(long)]
    list: bool,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (text, mermaid, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Only match clauses that carry arity information
    #[arg(long)]
    strict: bool,

    /// Upper bound on graph nodes
    #[arg(long)]
    max_nodes: Option<usize>,
}

/// Split "Module.Sub.function/arity" into its parts.
fn parse_entry(entry: &str) -> Result<FunctionRef> {
    let (qualified, arity) = entry
        .rsplit_once('/')
        .with_context(|| format!("entry '{}' is missing an /arity suffix", entry))?;
    let arity: usize = arity
        .parse()
        .with_context(|| format!("entry '{}' has a non-numeric arity", entry))?;
    let (module, function) = qualified
        .rsplit_once('.')
        .with_context(|| format!("entry '{}' is missing a module qualifier", entry))?;
    if function.is_empty() {
        bail!("entry '{}' has an empty function name", entry);
    }
    Ok(FunctionRef::new(module, function, arity))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_thread_pool() {
        eprintln!("WARN: thread pool already initialized: {}", e);
    }

    let provider = Arc::new(JsonSourceProvider::new(&cli.source));
    let analyzer = Analyzer::new(provider);

    let report = analyzer.rescan_blocking();
    println!(
        "[callscope] scanned {} modules ({} skipped)",
        report.scanned, report.failed
    );

    if cli.list {
        for module in analyzer.list_modules() {
            println!("{}", module);
        }
    }

    let Some(entry) = &cli.entry else {
        if !cli.list {
            println!("[callscope] nothing to do: pass --entry Mod.fun/arity or --list");
        }
        return Ok(());
    };

    let start = parse_entry(entry)?;
    let strictness = if cli.strict {
        MatchStrictness::Strict
    } else {
        MatchStrictness::Permissive
    };
    let mut builder = GraphBuilder::new(analyzer.store()).strictness(strictness);
    if let Some(cap) = cli.max_nodes {
        builder = builder.max_nodes(cap);
    }

    let graph = builder
        .build(start)
        .with_context(|| format!("cannot build a call graph from '{}'", entry))?;

    let rendered = match cli.format.as_str() {
        "text" => analyzer.render_text(&graph),
        "mermaid" => analyzer.render_diagram(&graph),
        "json" => analyzer.render_json(&graph)?,
        other => bail!("unsupported format: {}", other),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!(
                "[callscope] graph written to {} (format: {})",
                path.display(),
                cli.format
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
