//! Stellar Species - Content Inspector
//!
//! Loads a species content directory and answers questions about it:
//! which species exist, what a species looks like, where terraforming
//! should take a planet, who likes what, and the content checksum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stellar_species::content::load_species_dir;
use stellar_species::core::config::{set_config, SpeciesConfig};
use stellar_species::registry::SpeciesManager;
use stellar_species::universe::{PlanetType, Species};

#[derive(Parser, Debug)]
#[command(name = "stellar-species", about = "Inspect species content")]
struct Cli {
    /// Species content directory (overrides the config file)
    #[arg(long)]
    content: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List species names
    List {
        #[arg(long, conflicts_with = "native")]
        playable: bool,
        #[arg(long)]
        native: bool,
    },
    /// Print a species definition
    Show { name: String },
    /// Show terraforming targets for a species on a planet type
    Terraform { name: String, planet_type: PlanetType },
    /// Species that like and dislike a content item
    Likes { content: String },
    /// Print the content checksum
    Checksum,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stellar_species=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SpeciesConfig::from_file(path)?,
        None => SpeciesConfig::default(),
    };
    if let Some(dir) = cli.content {
        config.content_dir = dir;
    }
    if set_config(config.clone()).is_err() {
        tracing::warn!("Species config was already set; keeping the earlier one");
    }

    let manager = SpeciesManager::with_types(load_species_dir(&config)?);
    tracing::debug!("Registry ready with {} species", manager.num_species());

    match cli.command {
        Command::List { playable, native } => {
            let listed: Vec<&Species> = if playable {
                manager.playable().collect()
            } else if native {
                manager.native().collect()
            } else {
                manager.iter().collect()
            };
            for species in listed {
                println!(
                    "{:<16} playable={:<5} native={:<5} spawn_rate={} spawn_limit={}",
                    species.name(),
                    species.playable(),
                    species.native(),
                    species.spawn_rate(),
                    species.spawn_limit()
                );
            }
        }
        Command::Show { name } => match manager.get_species(&name) {
            Some(species) => print!("{}", species.dump(0)),
            None => println!("No species named {}", name),
        },
        Command::Terraform { name, planet_type } => match manager.get_species(&name) {
            Some(species) => {
                println!(
                    "{} on {}: {}",
                    name,
                    planet_type,
                    species.planet_environment(planet_type)
                );
                let better = species.next_better_planet_type(planet_type);
                let best = species.next_best_planet_type(planet_type);
                println!(
                    "  next step: {} ({})",
                    better,
                    species.planet_environment(better)
                );
                println!("  target:    {} ({})", best, species.planet_environment(best));
            }
            None => println!("No species named {}", name),
        },
        Command::Likes { content } => {
            println!("Like {}: {:?}", content, manager.species_that_like(&content));
            println!("Dislike {}: {:?}", content, manager.species_that_dislike(&content));
        }
        Command::Checksum => {
            println!("{}", manager.check_sum());
        }
    }

    Ok(())
}
