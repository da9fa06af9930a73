// src/registry/mod.rs

//! The recipe registry: every package known to a resolution
//!
//! The registry is an explicit, immutable-after-load collection of validated
//! recipes plus an index from virtual package names to their providers.
//! Resolution consults nothing outside it; a name the registry does not know
//! is an error, never a probe of the surrounding system.
//!
//! Package names and virtual names share one namespace: a recipe may not use
//! a name some other recipe provides as a virtual, and vice versa. Iteration
//! orders are name order throughout so downstream walks are deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::recipe::{Recipe, parse_recipe_file, validate_recipe};

#[derive(Debug, Default)]
pub struct RecipeRegistry {
    recipes: BTreeMap<String, Recipe>,
    providers: BTreeMap<String, BTreeSet<String>>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add one recipe. Returns the validation warnings.
    pub fn insert(&mut self, recipe: Recipe) -> Result<Vec<String>> {
        let warnings = validate_recipe(&recipe)?;
        let name = recipe.name().to_string();

        if self.recipes.contains_key(&name) {
            return Err(Error::Parse(format!(
                "Registry already has a recipe named '{}'",
                name
            )));
        }
        if self.providers.contains_key(&name) {
            return Err(Error::Parse(format!(
                "Recipe name '{}' collides with a virtual package of the same name",
                name
            )));
        }
        for provided in recipe.provides() {
            if self.recipes.contains_key(provided) {
                return Err(Error::Parse(format!(
                    "Virtual package '{}' provided by '{}' collides with a recipe of the same name",
                    provided, name
                )));
            }
        }

        for provided in recipe.provides() {
            self.providers
                .entry(provided.clone())
                .or_default()
                .insert(name.clone());
        }
        debug!("Registered recipe: {}", name);
        self.recipes.insert(name, recipe);
        Ok(warnings)
    }

    /// Load every `.toml` recipe under `dir`, recursively. Returns the
    /// number of recipes loaded. The walk visits files in name order, and a
    /// failure in any file aborts the load.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }

            let recipe = parse_recipe_file(path).map_err(|e| Error::Recipe {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let name = recipe.name().to_string();
            let warnings = self.insert(recipe).map_err(|e| Error::Recipe {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            for w in warnings {
                warn!("Recipe {}: {}", name, w);
            }
            loaded += 1;
        }

        debug!("Loaded {} recipes from {}", loaded, dir.display());
        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Whether `name` is a virtual package, i.e. provided by some recipe.
    pub fn is_virtual(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Providers of a virtual package, in name order.
    pub fn providers_of(&self, virtual_name: &str) -> Vec<&str> {
        self.providers
            .get(virtual_name)
            .map(|set| set.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Recipe names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
