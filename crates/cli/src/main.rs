//! `oasgen` command line: load a spec, inspect references, analyze forms.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oasgen_core::{
    Dialect, DocumentLoader, FormAnalyzer, FormResource, LoadedSpec, OasgenConfig, Resolver,
    schema_type_string,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(
    name = "oasgen",
    version,
    about = "OpenAPI reference resolution and form analysis"
)]
struct Cli {
    /// Path to an oasgen.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level ("trace".."error") or a full tracing filter; falls back to OASGEN_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every URI registered in the document cache
    Keys {
        /// Entry document path or URL
        entry: String,
    },
    /// Resolve a JSON pointer of the entry document and print the target
    Resolve {
        entry: String,
        /// JSON pointer, e.g. /components/schemas/Pet
        pointer: String,
        /// Print the TypeScript type of the target instead of its JSON
        #[arg(long)]
        ts: bool,
    },
    /// Analyze a named schema into a form model and print it as JSON
    Analyze {
        entry: String,
        /// Schema name under components.schemas (or definitions)
        schema: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => OasgenConfig::from_file(path).map_err(|e| e.to_string())?,
        None => OasgenConfig::default(),
    };
    debug!(?config, "Loaded configuration.");

    match cli.command {
        Commands::Keys { entry } => {
            let spec = load(&config, &entry).await?;
            for key in spec.cache.keys() {
                println!("{key}");
            }
        }
        Commands::Resolve { entry, pointer, ts } => {
            let spec = load(&config, &entry).await?;
            let resolver = Resolver::for_spec(&spec);
            let node = resolver
                .resolve_pointer(&pointer)
                .ok_or_else(|| format!("Nothing to resolve at '{pointer}'"))?;
            if ts {
                println!("{}", schema_type_string(&resolver, &node));
            } else {
                print_json(node.value())?;
            }
        }
        Commands::Analyze { entry, schema } => {
            let spec = load(&config, &entry).await?;
            let resolver = Resolver::for_spec(&spec);
            let dialect = Dialect::detect(spec.entry.value());
            let resource = FormResource::from_component(&resolver, dialect, &schema)
                .map_err(|e| e.to_string())?;
            let result = FormAnalyzer::new(&resolver, config.analyzer).build(&resource);
            print_json(&result)?;
        }
    }
    Ok(())
}

async fn load(config: &OasgenConfig, entry: &str) -> Result<LoadedSpec, String> {
    let loader = DocumentLoader::new(config.loader.clone()).map_err(|e| e.to_string())?;
    loader.load(entry).await.map_err(|e| e.to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let level = level
        .map(str::to_string)
        .or_else(|| std::env::var("OASGEN_LOG").ok());
    let filter = match level.as_deref() {
        Some(level) if is_plain_level(level) => format!("oasgen_core={level},oasgen={level}"),
        Some(spec) => spec.to_string(),
        None => "oasgen_core=info,oasgen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
