// src/recipe/mod.rs

//! Recipe system: package descriptions and how they build
//!
//! A recipe is the unit of package description: one TOML file declaring the
//! package's versions, variants, dependencies, provided virtuals, and build
//! system. Recipes carry no resolution state; the concretizer reads them
//! through the registry and never mutates them.
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "libbson"
//! description = "Routines for building, parsing, and iterating BSON documents"
//! homepage = "https://github.com/mongodb/libbson"
//! url = "https://github.com/mongodb/libbson/releases/download/${version}/libbson-${version}.tar.gz"
//!
//! [[version]]
//! version = "1.6.3"
//! checksum = "md5:b7bdb314197106fcfb4af105a582d343"
//!
//! [[version]]
//! version = "1.6.1"
//! checksum = "md5:4d6779451bc5764a7d4982c01e7bd8c2"
//!
//! [[dependency]]
//! spec = "autoconf"
//! kinds = ["build"]
//! when = "@1.6.1"
//!
//! [build]
//! system = "autotools"
//! autoreconf_when = "@1.6.1"
//! ```

pub mod build;
mod format;
pub mod parser;

pub use build::{BuildContext, BuildStep, BuildSystem};
pub use format::{
    BuildArg, BuildSection, DependencyDecl, PackageSection, Recipe, SystemKind, VariantDecl,
    VersionDecl,
};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
