// src/commands.rs
//! Command handlers for the cairn CLI

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use cairn::plan::{BuildPlan, BuildPlanBuilder, PlanOptions};
use cairn::recipe::Recipe;
use cairn::registry::RecipeRegistry;
use cairn::resolver::{Concretizer, ResolvedGraph};
use cairn::spec::PackageSpec;

/// Load every recipe under `dir` into a fresh registry.
pub fn load_registry(dir: &str) -> Result<RecipeRegistry> {
    let mut registry = RecipeRegistry::new();
    let count = registry
        .load_dir(Path::new(dir))
        .with_context(|| format!("Failed to load recipes from {}", dir))?;
    info!("Loaded {} recipes from {}", count, dir);
    Ok(registry)
}

fn parse_specs(specs: &[String]) -> Result<Vec<PackageSpec>> {
    let mut roots = Vec::with_capacity(specs.len());
    for s in specs {
        roots.push(PackageSpec::parse(s)?);
    }
    Ok(roots)
}

/// Concretize specs and print the resolved node set.
pub fn resolve(specs: &[String], recipes: &str) -> Result<()> {
    let registry = load_registry(recipes)?;
    let roots = parse_specs(specs)?;
    let graph = Concretizer::new(&registry).concretize(&roots)?;
    print_graph(&graph);
    Ok(())
}

fn print_graph(graph: &ResolvedGraph) {
    println!("Resolved {} packages:", graph.len());
    for node in graph.nodes() {
        println!("  {}", node.render());
        for edge in &node.edges {
            match &edge.via_virtual {
                Some(virt) => {
                    println!("    -> {} ({}) providing {}", edge.target, edge.kinds, virt)
                }
                None => println!("    -> {} ({})", edge.target, edge.kinds),
            }
        }
    }
}

/// Concretize specs and print the ordered build plan, as text or JSON.
pub fn plan(
    specs: &[String],
    recipes: &str,
    json: bool,
    jobs: u32,
    prefix_root: &str,
) -> Result<()> {
    let registry = load_registry(recipes)?;
    let roots = parse_specs(specs)?;
    let graph = Concretizer::new(&registry).concretize(&roots)?;

    let options = PlanOptions {
        prefix_root: prefix_root.to_string(),
        jobs,
    };
    let plan = BuildPlanBuilder::with_options(&registry, options).build(&graph)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &BuildPlan) {
    println!("Build plan ({} packages):", plan.len());
    for (i, node) in plan.nodes.iter().enumerate() {
        let mark = if node.build_only { "  [build only]" } else { "" };
        println!("{:3}. {}@{}{}", i + 1, node.name, node.version, mark);
        println!("     prefix: {}", node.prefix);
        for step in &node.steps {
            println!("     $ {}", step);
        }
    }
}

/// Print what a recipe declares. Virtual names list their providers.
pub fn info(package: &str, recipes: &str) -> Result<()> {
    let registry = load_registry(recipes)?;

    if let Some(recipe) = registry.get(package) {
        print_recipe(recipe);
        return Ok(());
    }
    if registry.is_virtual(package) {
        println!("{} is a virtual package provided by:", package);
        for provider in registry.providers_of(package) {
            println!("  {}", provider);
        }
        return Ok(());
    }
    anyhow::bail!("No recipe for package '{}'", package)
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.name());
    if let Some(description) = &recipe.package.description {
        println!("  {}", description);
    }
    if let Some(homepage) = &recipe.package.homepage {
        println!("  Homepage: {}", homepage);
    }
    if let Some(license) = &recipe.package.license {
        println!("  License: {}", license);
    }
    if !recipe.provides().is_empty() {
        println!("  Provides: {}", recipe.provides().join(", "));
    }

    println!("  Versions:");
    for decl in recipe.sorted_versions() {
        match &decl.checksum {
            Some(sum) => println!("    {}  {}", decl.version, sum),
            None => println!("    {}", decl.version),
        }
    }

    if !recipe.variants.is_empty() {
        println!("  Variants:");
        for decl in &recipe.variants {
            let values = if decl.values.is_empty() {
                String::new()
            } else {
                format!(" [{}]", decl.values.join(", "))
            };
            match &decl.description {
                Some(d) => println!("    {}={}{}  {}", decl.name, decl.default, values, d),
                None => println!("    {}={}{}", decl.name, decl.default, values),
            }
        }
    }

    if !recipe.dependencies.is_empty() {
        println!("  Dependencies:");
        for dep in &recipe.dependencies {
            let mut line = format!("    {} ({})", dep.spec, dep.effective_kinds());
            if let Some(when) = &dep.when {
                line.push_str(&format!(" when {}", when));
            }
            println!("{}", line);
        }
    }

    println!("  Build system: {}", recipe.build.system.as_str());
}
