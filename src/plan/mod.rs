// src/plan/mod.rs

//! Build plan construction
//!
//! A [`BuildPlan`] turns a resolved graph into the document the executor
//! consumes: nodes in an order where every dependency precedes its
//! consumers, each carrying its install prefix, rendered build steps, the
//! environment wiring that points at dependency prefixes, and a mark for
//! nodes needed only while building.
//!
//! Ties in the topological order break by package name, so the same graph
//! always yields the same plan. The plan is plain data and serializes to
//! JSON for the executor.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, RequestChain, Result};
use crate::recipe::build::substitute;
use crate::recipe::{BuildContext, BuildStep, BuildSystem, Recipe};
use crate::registry::RecipeRegistry;
use crate::resolver::{ConcreteNode, ResolvedGraph};
use crate::spec::{DepKind, DepKindSet};
use crate::variant::VariantMap;
use crate::version::Version;

/// Knobs for plan construction.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Directory installed packages live under; each node installs to
    /// `<prefix_root>/<name>-<version>`.
    pub prefix_root: String,
    /// Parallel job count substituted into make-style steps.
    pub jobs: u32,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            prefix_root: "/opt/cairn".to_string(),
            jobs: 4,
        }
    }
}

/// Where a node's source archive comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSource {
    pub url: String,

    /// `algo:hex` digest for the archive, when the recipe declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// One resolved dependency as the executor sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDependency {
    pub name: String,

    pub kinds: DepKindSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via_virtual: Option<String>,
}

/// One entry of the plan: a pinned package with everything needed to build
/// and install it once its dependencies are in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    pub name: String,

    pub version: Version,

    pub variants: VariantMap,

    /// Install prefix for this node.
    pub prefix: String,

    /// True when the node is needed only to build others and can be removed
    /// once its consumers are installed.
    pub build_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PlanSource>,

    pub dependencies: Vec<PlanDependency>,

    pub steps: Vec<BuildStep>,

    /// Environment for every build step: `CAIRN_DEP_<NAME>_PREFIX` per
    /// dependency plus the recipe's own `[build.env]` entries.
    pub env: BTreeMap<String, String>,
}

/// An ordered build plan. Nodes appear after everything they depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub generated_at: String,

    pub nodes: Vec<PlanNode>,
}

impl BuildPlan {
    pub fn node(&self, name: &str) -> Option<&PlanNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Index of a package in the build order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub struct BuildPlanBuilder<'a> {
    registry: &'a RecipeRegistry,
    options: PlanOptions,
}

impl<'a> BuildPlanBuilder<'a> {
    pub fn new(registry: &'a RecipeRegistry) -> Self {
        Self {
            registry,
            options: PlanOptions::default(),
        }
    }

    pub fn with_options(registry: &'a RecipeRegistry, options: PlanOptions) -> Self {
        Self { registry, options }
    }

    /// Build the ordered plan for a resolved graph. The registry must be
    /// the one the graph was resolved against.
    pub fn build(&self, graph: &ResolvedGraph) -> Result<BuildPlan> {
        let order = topo_order(graph)?;
        let runtime = runtime_set(graph);

        let mut nodes = Vec::with_capacity(order.len());
        for name in &order {
            if let Some(node) = graph.node(name) {
                nodes.push(self.plan_node(graph, node, !runtime.contains(name))?);
            }
        }

        debug!("Planned {} nodes", nodes.len());
        Ok(BuildPlan {
            generated_at: Utc::now().to_rfc3339(),
            nodes,
        })
    }

    fn plan_node(
        &self,
        graph: &ResolvedGraph,
        node: &ConcreteNode,
        build_only: bool,
    ) -> Result<PlanNode> {
        let recipe = self.registry.get(&node.name).ok_or_else(|| Error::NotFound {
            package: node.name.clone(),
            chain: RequestChain::root(node.name.clone()),
        })?;

        let system = BuildSystem::from_section(&recipe.build)?;
        let prefix = self.prefix_for(&node.name, &node.version);
        let ctx = BuildContext {
            prefix: &prefix,
            jobs: self.options.jobs,
            version: &node.version,
            variants: &node.variants,
        };
        let steps = system.render_steps(&ctx);

        let mut env = BTreeMap::new();
        let mut dependencies = Vec::with_capacity(node.edges.len());
        for edge in &node.edges {
            if let Some(dep) = graph.node(&edge.target) {
                env.insert(
                    dep_env_var(&dep.name),
                    self.prefix_for(&dep.name, &dep.version),
                );
            }
            dependencies.push(PlanDependency {
                name: edge.target.clone(),
                kinds: edge.kinds,
                via_virtual: edge.via_virtual.clone(),
            });
        }
        for (key, value) in &recipe.build.env {
            env.insert(key.clone(), substitute(value, &ctx));
        }

        Ok(PlanNode {
            name: node.name.clone(),
            version: node.version.clone(),
            variants: node.variants.clone(),
            prefix,
            build_only,
            source: plan_source(recipe, &node.version),
            dependencies,
            steps,
            env,
        })
    }

    fn prefix_for(&self, name: &str, version: &Version) -> String {
        format!("{}/{}-{}", self.options.prefix_root, name, version)
    }
}

fn plan_source(recipe: &Recipe, version: &Version) -> Option<PlanSource> {
    recipe.archive_url(version).map(|url| PlanSource {
        url,
        checksum: recipe
            .version_decl(version)
            .and_then(|d| d.checksum.clone()),
    })
}

/// The environment variable a dependency's prefix is exported under, e.g.
/// `CAIRN_DEP_PY_PYDOT_PREFIX` for `py-pydot`.
fn dep_env_var(package: &str) -> String {
    let mut upper = String::with_capacity(package.len());
    for c in package.chars() {
        if c.is_ascii_alphanumeric() {
            upper.push(c.to_ascii_uppercase());
        } else {
            upper.push('_');
        }
    }
    format!("CAIRN_DEP_{}_PREFIX", upper)
}

/// Kahn's algorithm with a name-ordered ready heap. Dependencies come
/// before their consumers; equal-depth nodes appear in package-name order.
fn topo_order(graph: &ResolvedGraph) -> Result<Vec<String>> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for node in graph.nodes() {
        in_degree.insert(&node.name, node.edges.len());
        for edge in &node.edges {
            dependents
                .entry(&edge.target)
                .or_default()
                .push(&node.name);
        }
    }

    let mut ready: BinaryHeap<Reverse<&str>> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(name, _)| Reverse(*name))
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(Reverse(name)) = ready.pop() {
        order.push(name.to_string());
        for &consumer in dependents.get(name).into_iter().flatten() {
            if let Some(deg) = in_degree.get_mut(consumer) {
                *deg -= 1;
                if *deg == 0 {
                    ready.push(Reverse(consumer));
                }
            }
        }
    }

    // Concretizer output is acyclic, but the builder accepts any graph.
    if order.len() != graph.len() {
        let remaining: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, deg)| **deg > 0)
            .map(|(name, _)| *name)
            .collect();
        return Err(Error::DependencyCycle {
            cycle: find_cycle(graph, &remaining),
        });
    }
    Ok(order)
}

/// Walk forward along edges inside `remaining` until a node repeats. Every
/// remaining node still has an unplanned dependency, so the walk must close
/// a cycle.
fn find_cycle(graph: &ResolvedGraph, remaining: &BTreeSet<&str>) -> Vec<String> {
    let Some(start) = remaining.iter().next() else {
        return Vec::new();
    };

    let mut path: Vec<String> = Vec::new();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut current = start.to_string();
    loop {
        if let Some(&i) = seen.get(&current) {
            let mut cycle = path[i..].to_vec();
            cycle.push(current);
            return cycle;
        }
        seen.insert(current.clone(), path.len());
        path.push(current.clone());

        let next = graph.node(&current).and_then(|n| {
            n.edges
                .iter()
                .map(|e| e.target.clone())
                .find(|t| remaining.contains(t.as_str()))
        });
        match next {
            Some(n) => current = n,
            None => return path,
        }
    }
}

/// Names reachable from the roots through link or run edges. Everything
/// else is only needed while building.
fn runtime_set(graph: &ResolvedGraph) -> BTreeSet<String> {
    let runtime_kinds = DepKindSet::from_kinds(&[DepKind::Link, DepKind::Run]);
    let mut keep: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    for root in graph.roots() {
        if keep.insert(root.clone()) {
            queue.push_back(root);
        }
    }
    while let Some(name) = queue.pop_front() {
        if let Some(node) = graph.node(name) {
            for edge in &node.edges {
                if edge.kinds.intersects(runtime_kinds) && keep.insert(edge.target.clone()) {
                    queue.push_back(&edge.target);
                }
            }
        }
    }
    keep
}
