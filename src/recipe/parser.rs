// src/recipe/parser.rs

//! Recipe file parsing and validation

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::recipe::build::BuildSystem;
use crate::recipe::format::Recipe;
use crate::spec::{self, Condition};
use crate::variant::VariantValue;

/// Parse a recipe from a TOML string.
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file.
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)?;
    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness.
///
/// Violations that would break resolution are errors; omissions that only
/// reduce recipe quality come back as warnings. Conditions are checked
/// against the owning recipe's own variant declarations, since they are
/// evaluated on the owning node.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let name = recipe.name();

    if !spec::is_valid_package_name(name) {
        return Err(Error::Parse(format!("Invalid package name '{}'", name)));
    }

    if recipe.versions.is_empty() {
        return Err(Error::Parse(format!(
            "Recipe '{}' declares no versions",
            name
        )));
    }

    let mut seen = BTreeSet::new();
    for decl in &recipe.versions {
        if !seen.insert(decl.version.clone()) {
            return Err(Error::Parse(format!(
                "Recipe '{}' declares version '{}' more than once",
                name, decl.version
            )));
        }
        match &decl.checksum {
            Some(sum) => check_checksum(sum)
                .map_err(|msg| Error::Parse(format!("Recipe '{}': {}", name, msg)))?,
            None => warnings.push(format!("Version {} has no checksum", decl.version)),
        }
    }

    let mut variant_names = BTreeSet::new();
    for decl in &recipe.variants {
        if !variant_names.insert(decl.name.as_str()) {
            return Err(Error::Parse(format!(
                "Recipe '{}' declares variant '{}' more than once",
                name, decl.name
            )));
        }
        match &decl.default {
            VariantValue::Bool(_) => {
                if !decl.values.is_empty() {
                    return Err(Error::Parse(format!(
                        "Boolean variant '{}' of '{}' cannot list values",
                        decl.name, name
                    )));
                }
            }
            VariantValue::Str(default) => {
                let mut values = BTreeSet::new();
                for v in &decl.values {
                    if !values.insert(v.as_str()) {
                        return Err(Error::Parse(format!(
                            "Variant '{}' of '{}' lists value '{}' more than once",
                            decl.name, name, v
                        )));
                    }
                }
                if !decl.values.is_empty() && !decl.values.contains(default) {
                    return Err(Error::Parse(format!(
                        "Default '{}' of variant '{}' is not among its values",
                        default, decl.name
                    )));
                }
            }
        }
    }

    for dep in &recipe.dependencies {
        if dep.spec.name == name {
            return Err(Error::Parse(format!(
                "Recipe '{}' depends on itself",
                name
            )));
        }
        if dep.kinds.is_some_and(|k| k.is_empty()) {
            return Err(Error::Parse(format!(
                "Dependency '{}' of '{}' declares an empty kind list",
                dep.spec.name, name
            )));
        }
        if let Some(cond) = &dep.when {
            check_condition(recipe, cond, &format!("dependency '{}'", dep.spec.name))?;
        }
    }

    for provided in recipe.provides() {
        if !spec::is_valid_package_name(provided) {
            return Err(Error::Parse(format!(
                "Recipe '{}' provides invalid virtual name '{}'",
                name, provided
            )));
        }
        if provided == name {
            return Err(Error::Parse(format!(
                "Recipe '{}' cannot provide itself",
                name
            )));
        }
    }

    if let Some(cond) = &recipe.build.autoreconf_when {
        check_condition(recipe, cond, "build field 'autoreconf_when'")?;
    }
    for arg in recipe
        .build
        .configure_args
        .iter()
        .chain(&recipe.build.cmake_args)
    {
        if let Some(cond) = arg.when() {
            check_condition(recipe, cond, &format!("build argument '{}'", arg.arg()))?;
        }
    }
    BuildSystem::from_section(&recipe.build)?;

    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }

    Ok(warnings)
}

/// Checksums are `algo:hex` with a known algorithm and digest length.
fn check_checksum(sum: &str) -> std::result::Result<(), String> {
    let Some((algo, hex)) = sum.split_once(':') else {
        return Err(format!("Checksum '{}' must be in algo:hex form", sum));
    };
    let expected = match algo {
        "md5" => 32,
        "sha1" => 40,
        "sha256" => 64,
        "sha512" => 128,
        _ => return Err(format!("Unknown checksum algorithm '{}'", algo)),
    };
    if hex.len() != expected || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Checksum '{}' is not a valid {} digest", sum, algo));
    }
    Ok(())
}

/// A condition may only reference variants the owning recipe declares, with
/// values those variants allow.
fn check_condition(recipe: &Recipe, cond: &Condition, context: &str) -> Result<()> {
    for (vname, value) in &cond.variants {
        match recipe.variant_decl(vname) {
            None => {
                return Err(Error::Parse(format!(
                    "Condition on {} of '{}' references undeclared variant '{}'",
                    context,
                    recipe.name(),
                    vname
                )));
            }
            Some(decl) if !decl.allows(value) => {
                return Err(Error::Parse(format!(
                    "Condition on {} of '{}' compares variant '{}' to disallowed value '{}'",
                    context,
                    recipe.name(),
                    vname,
                    value
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}
