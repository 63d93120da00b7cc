use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vnaddr::{AddressParser, Config, Dispatcher, Lexicon, ParsedAddress};

#[derive(Parser)]
#[command(name = "vnaddr")]
#[command(about = "Resolve noisy Vietnamese addresses into house, street, ward and district")]
#[command(version)]
struct Cli {
    /// Lexicon tables (TOML) to use instead of the built-in data
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one or more addresses
    Parse {
        /// Address text; each argument is parsed separately
        #[arg(required = true)]
        addresses: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up the ship fee for a ward/district pair
    Fee {
        #[arg(short, long, default_value = "")]
        ward: String,
        #[arg(short, long, default_value = "")]
        district: String,
    },
    /// Look up the responsible router for a ward/district pair
    Route {
        #[arg(short, long, default_value = "")]
        ward: String,
        #[arg(short, long, default_value = "")]
        district: String,
    },
    /// Read addresses from stdin, one per line
    Repl {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective engine configuration as TOML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_lexicon(path: Option<&PathBuf>) -> Result<Arc<Lexicon>> {
    match path {
        Some(p) => Ok(Arc::new(Lexicon::load_toml(p)?)),
        None => Ok(Lexicon::builtin()),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load_toml(p),
        None => Ok(Config::default()),
    }
}

fn print_result(parsed: &ParsedAddress, dispatcher: &Dispatcher, json: bool) -> Result<()> {
    let dispatch = dispatcher.dispatch(parsed);
    if json {
        let value = serde_json::json!({ "address": parsed, "dispatch": dispatch });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }
    println!("  house:      {}", parsed.house_id);
    println!("  street:     {}", parsed.street_name);
    println!("  ward:       {}", parsed.ward);
    println!("  district:   {}", parsed.district);
    println!("  confidence: {:.1}", parsed.confidence);
    match (dispatch.fee, dispatch.fee_tier) {
        (Some(fee), Some(tier)) => println!("  fee:        {} ({})", fee, tier),
        _ => println!("  fee:        unknown"),
    }
    println!("  router:     {} ({})", dispatch.router, dispatch.router_tier);
    Ok(())
}

fn run_repl(parser: &AddressParser, dispatcher: &Dispatcher, json: bool) -> Result<()> {
    if !json {
        eprintln!("vnaddr: one address per line, Ctrl-D to exit");
    }
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let raw = line.context("read stdin")?;
        let input = raw.trim();
        if input.is_empty() {
            continue;
        }
        let parsed = parser.parse(input);
        if !json {
            println!("{}", input);
        }
        print_result(&parsed, dispatcher, json)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let lexicon = load_lexicon(cli.lexicon.as_ref())?;
    let dispatcher = Dispatcher::new(Arc::clone(&lexicon));

    match cli.command {
        Commands::Parse { addresses, json } => {
            let config = load_config(cli.config.as_ref())?;
            let parser = AddressParser::new(lexicon, config);
            for (address, parsed) in addresses.iter().zip(parser.parse_batch(&addresses)) {
                if !json {
                    println!("{}", address);
                }
                print_result(&parsed, &dispatcher, json)?;
            }
        }
        Commands::Fee { ward, district } => match dispatcher.ship_fee(&ward, &district) {
            Some(fee) => println!("{}", fee),
            None => println!("unknown"),
        },
        Commands::Route { ward, district } => {
            println!("{}", dispatcher.router(&ward, &district));
        }
        Commands::Repl { json } => {
            let config = load_config(cli.config.as_ref())?;
            let parser = AddressParser::new(lexicon, config);
            run_repl(&parser, &dispatcher, json)?;
        }
        Commands::Config { output } => {
            let config = load_config(cli.config.as_ref())?;
            match output {
                Some(path) => {
                    config.save_toml(&path)?;
                    tracing::info!(path = %path.display(), "config written");
                }
                None => print!("{}", config.to_toml_string()?),
            }
        }
    }
    Ok(())
}
