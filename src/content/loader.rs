//! Load species content from TOML files
//!
//! `SpeciesLoader` turns a content directory into a `SpeciesTypes`
//! catalogue. Identical effect groups are pooled so every species using one
//! shares a single `Arc`. `spawn_species_load` runs the same work on a
//! background thread and hands the result to the registry as a `Pending`.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::core::config::SpeciesConfig;
use crate::core::error::SpeciesError;
use crate::registry::manager::SpeciesTypes;
use crate::registry::pending::Pending;
use crate::universe::effects::EffectGroup;
use crate::universe::focus::FocusType;
use crate::universe::species::Species;

use super::schema::{CensusOrderFile, SpeciesDef, SpeciesFile};

/// Errors that can occur when loading species content
#[derive(Debug, Error)]
pub enum ContentError {
    /// File I/O error
    #[error("IO error reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    /// TOML parsing failed
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Two definitions share a name
    #[error("Species {name} is defined in both {first} and {second}")]
    DuplicateSpecies {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    /// A definition failed validation
    #[error("Invalid species in {path}: {source}")]
    Species { path: PathBuf, source: SpeciesError },
}

/// Builds species from content files
pub struct SpeciesLoader {
    config: SpeciesConfig,
    effect_pool: BTreeMap<String, Arc<dyn EffectGroup>>,
}

impl SpeciesLoader {
    pub fn new(config: SpeciesConfig) -> Self {
        Self {
            config,
            effect_pool: BTreeMap::new(),
        }
    }

    /// Number of distinct effect groups seen so far
    pub fn pooled_effects(&self) -> usize {
        self.effect_pool.len()
    }

    /// Parse species from TOML text; `origin` is used in error messages
    pub fn parse_str(&mut self, content: &str, origin: &Path) -> Result<Vec<Species>, ContentError> {
        let file: SpeciesFile = toml::from_str(content).map_err(|source| ContentError::Toml {
            path: origin.to_path_buf(),
            source,
        })?;

        file.species
            .into_iter()
            .map(|def| {
                self.build_species(def).map_err(|source| ContentError::Species {
                    path: origin.to_path_buf(),
                    source,
                })
            })
            .collect()
    }

    /// Load all species from one file
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<Species>, ContentError> {
        let content = read(path)?;
        self.parse_str(&content, path)
    }

    /// Load every `.toml` file below `dir` plus the census order file.
    ///
    /// Files are visited in sorted path order so results don't depend on
    /// directory iteration order.
    pub fn load_directory(&mut self, dir: &Path) -> Result<SpeciesTypes, ContentError> {
        let census_path = dir.join(&self.config.census_order_file);
        let mut files = Vec::new();
        collect_toml_files(dir, &mut files)?;
        files.sort();

        let mut origins: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut species_map = BTreeMap::new();
        for path in files.into_iter().filter(|p| *p != census_path) {
            for species in self.load_file(&path)? {
                let name = species.name().to_string();
                if let Some(first) = origins.get(&name) {
                    return Err(ContentError::DuplicateSpecies {
                        name,
                        first: first.clone(),
                        second: path,
                    });
                }
                origins.insert(name.clone(), path.clone());
                species_map.insert(name, species);
            }
        }

        let census_order = if census_path.is_file() {
            let content = read(&census_path)?;
            let file: CensusOrderFile =
                toml::from_str(&content).map_err(|source| ContentError::Toml {
                    path: census_path.clone(),
                    source,
                })?;
            file.order
        } else {
            tracing::warn!("No census order file at {}", census_path.display());
            Vec::new()
        };

        tracing::info!(
            "Loaded {} species ({} distinct effect groups) from {}",
            species_map.len(),
            self.effect_pool.len(),
            dir.display()
        );
        Ok(SpeciesTypes::new(species_map, census_order))
    }

    fn build_species(&mut self, def: SpeciesDef) -> Result<Species, SpeciesError> {
        let foci = def
            .foci
            .into_iter()
            .map(|f| FocusType::new(f.name, f.description, Arc::new(f.location), f.graphic))
            .collect();

        let mut builder = Species::builder(def.name)
            .description(def.description)
            .gameplay_description(def.gameplay_description)
            .foci(foci)
            .default_focus(def.default_focus)
            .environments(def.environments)
            .playable(def.playable)
            .native(def.native)
            .can_colonize(def.can_colonize)
            .can_produce_ships(def.can_produce_ships)
            .spawn_rate(def.spawn_rate.unwrap_or(self.config.default_spawn_rate))
            .spawn_limit(def.spawn_limit.unwrap_or(self.config.default_spawn_limit))
            .tags(def.tags)
            .pedia_tag_prefix(self.config.pedia_tag_prefix.as_str())
            .graphic(def.graphic);

        for like in def.likes {
            builder = builder.like(like);
        }
        for dislike in def.dislikes {
            builder = builder.dislike(dislike);
        }
        for effect in def.effects {
            let key = effect.dump(0);
            let shared = self
                .effect_pool
                .entry(key)
                .or_insert_with(|| Arc::new(effect) as Arc<dyn EffectGroup>)
                .clone();
            builder = builder.effect(shared);
        }
        if let Some(location) = def.location {
            builder = builder.location(Box::new(location));
        }
        if let Some(targets) = def.combat_targets {
            builder = builder.combat_targets(Box::new(targets));
        }

        builder.build()
    }
}

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_toml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ContentError> {
    let io_err = |source: io::Error| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry_path = entry.map_err(io_err)?.path();

        if entry_path.is_dir() {
            collect_toml_files(&entry_path, files)?;
        } else if entry_path.extension().map_or(false, |ext| ext == "toml") {
            files.push(entry_path);
        }
    }
    Ok(())
}

/// Load the content directory named in `config`
pub fn load_species_dir(config: &SpeciesConfig) -> Result<SpeciesTypes, ContentError> {
    SpeciesLoader::new(config.clone()).load_directory(&config.content_dir)
}

/// Load species content on a background thread.
///
/// Load failures are logged and delivered as an empty catalogue.
pub fn spawn_species_load(config: SpeciesConfig) -> io::Result<Pending<SpeciesTypes>> {
    Pending::spawn("species-loader", move || match load_species_dir(&config) {
        Ok(types) => types,
        Err(e) => {
            tracing::error!("Species content failed to load: {}", e);
            SpeciesTypes::default()
        }
    })
}
