use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::types::recipe::{Beverage, OrderedEntries, Recipe, RecipeTable};

/// Immutable machine snapshot handed to the dispenser before a run.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub outlets: NonZeroUsize,
    pub inventory: Vec<(String, u64)>,
    pub recipes: RecipeTable,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    machine: RawMachine,
}

#[derive(Debug, Deserialize)]
struct RawMachine {
    outlets: RawOutlets,
    total_items_quantity: OrderedEntries<u64>,
    beverages: OrderedEntries<OrderedEntries<u64>>,
}

#[derive(Debug, Deserialize)]
struct RawOutlets {
    count_n: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl MachineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read machine config {}", path.display()))?;

        let config = match Format::for_path(path) {
            Format::Json => Self::from_json_str(&raw),
            Format::Yaml => Self::from_yaml_str(&raw),
        };

        config.with_context(|| format!("invalid machine config {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_json::from_str(raw).context("failed to parse machine config as JSON")?;

        file.machine.into_config()
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(raw).context("failed to parse machine config as YAML")?;

        file.machine.into_config()
    }
}

impl RawMachine {
    fn into_config(self) -> Result<MachineConfig> {
        let Some(outlets) = NonZeroUsize::new(self.outlets.count_n) else {
            bail!("outlets.count_n must be > 0");
        };

        let mut beverages = Vec::with_capacity(self.beverages.0.len());
        for (name, OrderedEntries(ingredients)) in self.beverages.0 {
            if ingredients.is_empty() {
                bail!("beverage \"{name}\" has an empty recipe");
            }
            if let Some((ingredient, _)) = ingredients.iter().find(|(_, quantity)| *quantity == 0) {
                bail!("beverage \"{name}\" requires zero {ingredient}; quantities must be > 0");
            }

            beverages.push(Beverage {
                name,
                recipe: Recipe::new(ingredients),
            });
        }

        Ok(MachineConfig {
            outlets,
            inventory: self.total_items_quantity.0,
            recipes: RecipeTable::new(beverages),
        })
    }
}
