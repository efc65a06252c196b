//! modcache CLI - inspect and populate a module proxy cache
//!
//! Operates directly on a cache root, the same layout a proxy using
//! `FileCacher` reads from. Logs go to stderr so `get` can stream blobs to
//! stdout.

use clap::{Parser, Subcommand};
use modcache::config::DEFAULT_ROOT;
use modcache::store::mime::mime_type;
use modcache::{CacheConfig, CacheItem, Cacher, Checksum, FileCacher};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modcache")]
#[command(about = "A filesystem cache backend for Go module proxies")]
#[command(version)]
struct Cli {
    /// Cache root directory
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// JSON config file (flags given on the command line take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Accept stores without writing anything
    #[arg(long)]
    read_only: bool,

    /// Write through a temporary file and rename it into place
    #[arg(long)]
    atomic: bool,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file (or stdin) under a name
    Put {
        /// Cache name, e.g. golang.org/x/text/@v/v0.3.0.zip
        name: String,
        /// Input file (defaults to stdin)
        file: Option<PathBuf>,
    },

    /// Write a cached blob to stdout or a file
    Get {
        /// Cache name
        name: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show metadata of a cached blob
    Stat {
        /// Cache name
        name: String,
    },

    /// Show the content type inferred for a name
    Mime {
        /// Cache name
        name: String,
    },

    /// Check a cached blob against an expected MD5 checksum
    Verify {
        /// Cache name
        name: String,
        /// Expected checksum, hex encoded
        checksum: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("modcache=warn"),
        1 => EnvFilter::new("modcache=info"),
        2 => EnvFilter::new("modcache=debug"),
        _ => EnvFilter::new("modcache=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = load_config(&cli)?;
    debug!("Using cache root {}", config.root.display());
    let cache = FileCacher::new(config);

    match cli.command {
        Commands::Put { name, file } => {
            match file {
                Some(path) => {
                    let mut input = File::open(&path)?;
                    cache.store(&name, &mut input)?;
                }
                None => {
                    let stdin = io::stdin();
                    let mut input = stdin.lock();
                    cache.store(&name, &mut input)?;
                }
            }
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "name": name,
                    "read_only": cache.config().read_only
                }),
            );
        }

        Commands::Get { name, output: out } => {
            let mut item = fetch_or_exit(&cache, &name, &cli.format)?;
            match out {
                Some(path) => {
                    let mut file = File::create(&path)?;
                    io::copy(&mut item, &mut file)?;
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    io::copy(&mut item, &mut lock)?;
                }
            }
            item.close()?;
        }

        Commands::Stat { name } => {
            let mut item = fetch_or_exit(&cache, &name, &cli.format)?;
            let mod_time: chrono::DateTime<chrono::Utc> = item.mod_time().into();
            output(
                &cli.format,
                &serde_json::json!({
                    "name": item.name(),
                    "size": item.size(),
                    "mime_type": item.mime_type(),
                    "mod_time": mod_time.to_rfc3339(),
                    "checksum": item.checksum().to_hex(),
                    "algorithm": cache.hash_algorithm().name()
                }),
            );
            item.close()?;
        }

        Commands::Mime { name } => {
            output(
                &cli.format,
                &serde_json::json!({
                    "name": name,
                    "mime_type": mime_type(&name)
                }),
            );
        }

        Commands::Verify { name, checksum } => {
            let expected = Checksum::from_hex(&checksum)
                .map_err(|e| anyhow::anyhow!("Invalid checksum {}: {}", checksum, e))?;
            let mut item = fetch_or_exit(&cache, &name, &cli.format)?;

            // Hash what a client would actually receive
            let mut hasher = cache.hash_algorithm().new_hasher();
            io::copy(&mut item, &mut hasher)?;
            item.close()?;
            let actual = hasher.finalize();

            let matches = actual == expected;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": if matches { "ok" } else { "mismatch" },
                    "name": name,
                    "expected": expected.to_hex(),
                    "actual": actual.to_hex()
                }),
            );
            if !matches {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<CacheConfig> {
    let mut config = match &cli.config {
        Some(path) => CacheConfig::load(path)?,
        None => CacheConfig::new(DEFAULT_ROOT),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if cli.read_only {
        config.read_only = true;
    }
    if cli.atomic {
        config.atomic_writes = true;
    }
    Ok(config)
}

/// Fetch `name`, or report it as missing and exit with status 1
fn fetch_or_exit(
    cache: &FileCacher,
    name: &str,
    format: &OutputFormat,
) -> anyhow::Result<CacheItem> {
    match cache.fetch(name) {
        Ok(item) => Ok(item),
        Err(e) if e.is_not_found() => {
            output(
                format,
                &serde_json::json!({
                    "status": "error",
                    "message": format!("Cache not found: {}", name)
                }),
            );
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", value);
        }
        OutputFormat::Text => {
            if let Ok(pretty) = serde_json::to_string_pretty(value) {
                println!("{}", pretty);
            }
        }
    }
}

