use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mealtag::{infer, init_tracing, normalize_name, MealtagConfig, TagIndex};
use tracing::debug;

/// Inspect the food tag vocabulary.
#[derive(Parser, Debug)]
#[command(name = "mealtag")]
#[command(about = "Infer dish tags from the food taxonomy")]
#[command(version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "MEALTAG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tags a dish name implies
    Infer {
        name: String,
        /// Emit a JSON array instead of one tag per line
        #[arg(long)]
        json: bool,
    },
    /// Print a token followed by its ancestors
    Chain { token: String },
    /// List every token in the vocabulary
    Tokens,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => MealtagConfig::from_file(path)?,
        None => MealtagConfig::default(),
    };
    init_tracing(&config.logging);
    debug!(config = ?args.config, "mealtag_start");

    let index = TagIndex::food();
    match args.command {
        Command::Infer { name, json } => {
            let normalize = config.inference.normalize_config();
            let tags = infer(&normalize_name(&name, &normalize), index);
            if json {
                println!("{}", serde_json::to_string(&tags)?);
            } else {
                for tag in tags.iter() {
                    println!("{tag}");
                }
            }
        }
        Command::Chain { token } => match index.chain(&token) {
            Some(chain) => println!("{}", chain.join(" -> ")),
            None => return Err(format!("unknown token `{token}`").into()),
        },
        Command::Tokens => {
            for token in index.tokens() {
                println!("{token}");
            }
        }
    }
    Ok(())
}
