use clap::{Parser, Subcommand};
use memory_game::config::{self, ServerConfig};
use memory_game::{logging, output, scan, server};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "memory-game")]
#[command(about = "Backend for a memory-matching card game")]
#[command(long_about = "\
Backend for a memory-matching card game

Each directory under the collections root is a card collection. Image files
become matching pairs of identical cards; a description.json can declare
pairs that mix images with text.

Collections structure:

  collections/
  ├── animals/                     # Image-only: every image is a pair
  │   ├── description.md           # Description (whole file)
  │   ├── cat.png
  │   └── dog.jpg
  ├── vocabulary/                  # Declared pairs, no images needed
  │   └── description.json         # {\"title\": ..., \"pairs\": [[{\"text\": \"Hello\"}, {\"text\": \"Hola\"}]]}
  └── .drafts/                     # Hidden directories are ignored

Metadata resolution (first available wins):
  Title:       description.json title → directory name (sea_life → \"Sea Life\")
  Description: description.json description → description.md
  Icon:        description.json icon (if it is an asset) → first image

Run 'memory-game gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Collections root directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the collections over HTTP
    Serve,
    /// Validate every collection without starting the server
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Serve => {
            let config = resolve_settings(&cli)?;
            logging::init(&config.logging);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::start_server(config))?;
        }
        Command::Check => {
            let config = resolve_settings(&cli)?;
            logging::init(&config.logging);

            println!("==> Checking {}", config.collections_root.display());
            let inspections = scan::inspect(&config.collections_root)?;
            output::print_check_output(&inspections);

            let errors = output::error_count(&inspections);
            if errors > 0 {
                println!("==> {errors} misconfigured collection(s)");
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Collections are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Layer the configuration: file, then environment, then CLI flags.
fn resolve_settings(cli: &Cli) -> Result<ServerConfig, config::ConfigError> {
    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    if let Some(root) = &cli.root {
        config.collections_root = root.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}
