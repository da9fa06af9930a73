// tests/common/mod.rs

//! Shared fixtures for integration tests.
//!
//! The tests resolve against the sample collection in `recipes/`: a C
//! library whose oldest tarball needs its build system regenerated, an MPI
//! consumer with two providers, a Python chain, and an R package.

use std::path::Path;

use cairn::registry::RecipeRegistry;
use cairn::resolver::{Concretizer, ResolvedGraph};
use cairn::spec::PackageSpec;
use cairn::Result;

/// Registry loaded from the repository's `recipes/` directory.
pub fn corpus_registry() -> RecipeRegistry {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("recipes");
    let mut registry = RecipeRegistry::new();
    let count = registry.load_dir(&dir).unwrap();
    assert!(count > 0, "Sample recipes should load");
    registry
}

pub fn parse_roots(roots: &[&str]) -> Vec<PackageSpec> {
    roots.iter().map(|s| PackageSpec::parse(s).unwrap()).collect()
}

pub fn resolve(registry: &RecipeRegistry, roots: &[&str]) -> Result<ResolvedGraph> {
    Concretizer::new(registry).concretize(&parse_roots(roots))
}
