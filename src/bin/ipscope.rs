use clap::{Parser, Subcommand};
use ipscope::*;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.ipscope/ipscope.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Seed for reproducible enrichment values
    #[clap(long, global = true)]
    seed: Option<u64>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up an IPv4 address, or your own public IP when none is given
    Lookup(commands::lookup::LookupArgs),

    /// Interactive lookup session with history, re-viewing and export
    Session,

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let config = match IpscopeConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: unable to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&config, args, cli.format, cli.seed),
        Commands::Session => commands::session::run(&config, cli.format, cli.seed),
        Commands::Config(args) => commands::config::run(&config, args, cli.format),
    };

    if !ok {
        std::process::exit(1);
    }
}
