//! restcraft CLI
//!
//! Commands:
//! - `restcraft compile` - Compile a contract source and write one document per interface
//! - `restcraft check` - Compile without writing and report what would be produced

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use restcraft::emit::{self, Format};
use restcraft::{CollisionPolicy, CompilerOptions, OpenApi, compile_source, source};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Options file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG: &str = "restcraft.toml";

#[derive(Parser)]
#[command(name = "restcraft")]
#[command(author, version, about = "Compile legacy RPC interface descriptions into OpenAPI contracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v INFO, -vv DEBUG)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a contract source into OpenAPI documents
    Compile {
        /// Contract source file (YAML, or JSON by extension)
        source: PathBuf,

        /// Output directory
        #[arg(short, long, env = "RESTCRAFT_OUT", default_value = "openapi")]
        out: PathBuf,

        /// Output format (yaml, json)
        #[arg(short, long, env = "RESTCRAFT_FORMAT", default_value_t = Format::Yaml)]
        format: Format,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Compile a contract source without writing anything
    Check {
        /// Contract source file (YAML, or JSON by extension)
        source: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Path to the options file (default: ./restcraft.toml when present)
    #[arg(short, long, env = "RESTCRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Compile only this interface (qualified or simple name)
    #[arg(long)]
    only: Option<String>,

    /// Fail on map parameters and duplicate routes instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Schema name collision handling (error, qualify)
    #[arg(long)]
    collision_policy: Option<CollisionPolicy>,

    /// `info.version` of the generated documents
    #[arg(long)]
    api_version: Option<String>,
}

impl OptionArgs {
    fn resolve(self) -> Result<CompilerOptions> {
        let config = self
            .config
            .or_else(|| Path::new(DEFAULT_CONFIG).is_file().then(|| DEFAULT_CONFIG.into()));
        let mut options = match &config {
            Some(path) => {
                debug!(path = %path.display(), "loading options");
                CompilerOptions::load(path)
                    .with_context(|| format!("Failed to load options from {}", path.display()))?
            }
            None => CompilerOptions::default(),
        };

        if self.only.is_some() {
            options.only = self.only;
        }
        if self.strict {
            options.strict = true;
        }
        if let Some(policy) = self.collision_policy {
            options.collision_policy = policy;
        }
        if let Some(version) = self.api_version {
            options.version = version;
        }
        Ok(options)
    }
}

fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            _ => "debug".to_string(),
        },
    };
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn compile(source_path: &Path, options: OptionArgs) -> Result<Vec<OpenApi>> {
    let options = options.resolve()?;
    let only = options.only.clone();
    let source = source::load(source_path)
        .with_context(|| format!("Failed to load contract source {}", source_path.display()))?;

    let documents = compile_source(&source, options)
        .with_context(|| format!("Failed to compile {}", source_path.display()))?;
    if documents.is_empty() {
        match only {
            Some(name) => bail!("no interface named `{name}` in {}", source_path.display()),
            None => bail!("{} declares no interfaces", source_path.display()),
        }
    }
    Ok(documents)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compile {
            source,
            out,
            format,
            options,
        } => {
            for document in compile(&source, options)? {
                let path = emit::write_document(&out, &document, format)?;
                info!(path = %path.display(), "wrote contract");
                println!("{}", path.display());
            }
        }
        Commands::Check { source, options } => {
            for document in compile(&source, options)? {
                println!(
                    "{}: {} paths, {} schemas",
                    document.info.title,
                    document.paths.len(),
                    document.schema_count()
                );
            }
        }
    }

    Ok(())
}
