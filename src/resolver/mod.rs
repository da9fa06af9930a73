// src/resolver/mod.rs

//! Concretization: turning abstract specs into a pinned dependency graph
//!
//! The concretizer walks a work queue of requests starting from the root
//! specs. Each request either creates a new node (pinning the newest
//! satisfying version and a complete variant assignment, then enqueueing the
//! recipe's applicable dependencies) or unifies with the node already chosen
//! for that package. One package name maps to at most one node per
//! resolution, there is no backtracking, and the first unsatisfiable request
//! aborts the walk with an error naming the full request chain.
//!
//! Every iteration order is fixed (name-ordered maps, declaration-ordered
//! dependency expansion, FIFO queue), so equal inputs produce equal graphs.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use crate::error::{Error, RequestChain, Result};
use crate::registry::RecipeRegistry;
use crate::spec::{DepKindSet, PackageSpec};
use crate::variant::{self, VariantMap};
use crate::version::Version;

/// A resolved dependency edge from a consumer to a concrete package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdge {
    /// Name of the concrete package this edge points at.
    pub target: String,
    /// Union of the kinds every merged request asked for.
    pub kinds: DepKindSet,
    /// The virtual name the request used, when the target was chosen as a
    /// provider.
    pub via_virtual: Option<String>,
}

/// A fully pinned package: exact version, a value for every declared
/// variant, and its outgoing dependency edges in first-request order.
///
/// Nodes are created by the concretizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteNode {
    pub name: String,
    pub version: Version,
    pub variants: VariantMap,
    pub edges: Vec<ResolvedEdge>,
}

impl ConcreteNode {
    /// Render as a pinned spec, e.g. `libbson@1.6.3` or `mpich@3.2 +shared`.
    pub fn render(&self) -> String {
        if self.variants.is_empty() {
            format!("{}@{}", self.name, self.version)
        } else {
            format!(
                "{}@{} {}",
                self.name,
                self.version,
                variant::format_map(&self.variants)
            )
        }
    }
}

/// The result of a successful concretization: every node the roots need,
/// keyed by package name, plus the concrete names the roots resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGraph {
    nodes: BTreeMap<String, ConcreteNode>,
    roots: Vec<String>,
}

impl ResolvedGraph {
    pub fn node(&self, name: &str) -> Option<&ConcreteNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Nodes in package-name order.
    pub fn nodes(&self) -> impl Iterator<Item = &ConcreteNode> {
        self.nodes.values()
    }

    /// Concrete names the root specs resolved to, in request order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One entry in the work queue.
struct Request {
    spec: PackageSpec,
    kinds: DepKindSet,
    chain: RequestChain,
    /// Concrete name of the consumer, or `None` for root requests.
    requested_by: Option<String>,
}

/// Mutable per-package state while the walk runs. Frozen into
/// [`ConcreteNode`]s when the queue drains.
struct NodeState {
    version: Version,
    variants: VariantMap,
    /// The chain of the request that created this node, kept for conflict
    /// reports.
    chain: RequestChain,
    edges: Vec<ResolvedEdge>,
}

pub struct Concretizer<'a> {
    registry: &'a RecipeRegistry,
}

impl<'a> Concretizer<'a> {
    pub fn new(registry: &'a RecipeRegistry) -> Self {
        Self { registry }
    }

    /// Concretize the given root specs into one merged graph.
    pub fn concretize(&self, roots: &[PackageSpec]) -> Result<ResolvedGraph> {
        let mut nodes: BTreeMap<String, NodeState> = BTreeMap::new();
        let mut root_names: Vec<String> = Vec::new();
        let mut queue: VecDeque<Request> = roots
            .iter()
            .map(|spec| Request {
                spec: spec.clone(),
                kinds: DepKindSet::empty(),
                chain: RequestChain::root(spec.to_string()),
                requested_by: None,
            })
            .collect();

        while let Some(request) = queue.pop_front() {
            let target = self.resolve_target(&request, &nodes)?;

            if let Some(state) = nodes.get(&target) {
                Self::unify(&target, state, &request)?;
            } else {
                let (state, deps) = self.create_node(&target, &request)?;
                nodes.insert(target.clone(), state);
                queue.extend(deps);
            }

            match &request.requested_by {
                Some(consumer) => Self::record_edge(&mut nodes, consumer, &target, &request)?,
                None => {
                    if !root_names.contains(&target) {
                        root_names.push(target.clone());
                    }
                }
            }
        }

        let nodes = nodes
            .into_iter()
            .map(|(name, state)| {
                let node = ConcreteNode {
                    name: name.clone(),
                    version: state.version,
                    variants: state.variants,
                    edges: state.edges,
                };
                (name, node)
            })
            .collect();

        Ok(ResolvedGraph {
            nodes,
            roots: root_names,
        })
    }

    /// Map a request to the concrete package it should land on: the named
    /// package itself, or a chosen provider when the name is virtual.
    fn resolve_target(
        &self,
        request: &Request,
        nodes: &BTreeMap<String, NodeState>,
    ) -> Result<String> {
        let name = &request.spec.name;
        if self.registry.is_virtual(name) {
            self.choose_provider(request, nodes)
        } else if self.registry.contains(name) {
            Ok(name.clone())
        } else {
            Err(Error::NotFound {
                package: name.clone(),
                chain: request.chain.clone(),
            })
        }
    }

    /// Pick a provider for a virtual request: a provider already in the
    /// graph that satisfies the request wins, otherwise the first provider
    /// in name order whose recipe can satisfy the version requirement.
    fn choose_provider(
        &self,
        request: &Request,
        nodes: &BTreeMap<String, NodeState>,
    ) -> Result<String> {
        let virtual_name = &request.spec.name;
        let candidates = self.registry.providers_of(virtual_name);

        for cand in &candidates {
            if let Some(state) = nodes.get(*cand) {
                if Self::state_satisfies(state, &request.spec) {
                    debug!(
                        "Virtual {} served by already-chosen provider {}",
                        virtual_name, cand
                    );
                    return Ok(cand.to_string());
                }
            }
        }

        for cand in &candidates {
            let can_satisfy = self
                .registry
                .get(cand)
                .is_some_and(|r| r.best_version(&request.spec.req).is_some());
            if can_satisfy {
                debug!("Virtual {} served by provider {}", virtual_name, cand);
                return Ok(cand.to_string());
            }
        }

        Err(Error::NoProvider {
            virtual_name: virtual_name.clone(),
            constraint: request.spec.to_string(),
            chain: request.chain.clone(),
        })
    }

    fn state_satisfies(state: &NodeState, spec: &PackageSpec) -> bool {
        spec.req.satisfies(&state.version)
            && spec
                .variants
                .iter()
                .all(|(name, value)| state.variants.get(name) == Some(value))
    }

    /// Check a request against the node already chosen for its package.
    /// Unification never revisits a pinned choice; an incompatible request
    /// is an error carrying both chains.
    fn unify(target: &str, state: &NodeState, request: &Request) -> Result<()> {
        if !request.spec.req.satisfies(&state.version) {
            return Err(Error::ConcretizationConflict {
                package: target.to_string(),
                existing: render_state(target, state),
                existing_chain: state.chain.clone(),
                requested: request.spec.to_string(),
                requested_chain: request.chain.clone(),
            });
        }

        for (vname, value) in &request.spec.variants {
            match state.variants.get(vname) {
                None => {
                    return Err(Error::UnknownVariant {
                        package: target.to_string(),
                        variant: vname.clone(),
                        chain: request.chain.clone(),
                    });
                }
                Some(existing) if existing != value => {
                    return Err(Error::ConcretizationConflict {
                        package: target.to_string(),
                        existing: render_state(target, state),
                        existing_chain: state.chain.clone(),
                        requested: request.spec.to_string(),
                        requested_chain: request.chain.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Pin a new node for `target` and collect the dependency requests its
    /// recipe produces under the pinned state.
    fn create_node(&self, target: &str, request: &Request) -> Result<(NodeState, Vec<Request>)> {
        let recipe = self.registry.get(target).ok_or_else(|| Error::NotFound {
            package: target.to_string(),
            chain: request.chain.clone(),
        })?;

        let decl = recipe
            .best_version(&request.spec.req)
            .ok_or_else(|| Error::Unsatisfiable {
                package: target.to_string(),
                constraint: request.spec.req.to_string(),
                chain: request.chain.clone(),
            })?;
        let version = decl.version.clone();

        let mut variants = recipe.default_variants();
        for (vname, value) in &request.spec.variants {
            match recipe.variant_decl(vname) {
                None => {
                    return Err(Error::UnknownVariant {
                        package: target.to_string(),
                        variant: vname.clone(),
                        chain: request.chain.clone(),
                    });
                }
                Some(decl) if !decl.allows(value) => {
                    return Err(Error::InvalidVariantValue {
                        package: target.to_string(),
                        variant: vname.clone(),
                        value: value.to_string(),
                        chain: request.chain.clone(),
                    });
                }
                Some(_) => {
                    variants.insert(vname.clone(), value.clone());
                }
            }
        }

        debug!("Pinned {} as {}@{}", request.spec, target, version);

        let mut deps = Vec::new();
        for dep in &recipe.dependencies {
            if dep.applies(&version, &variants) {
                let kinds = dep.effective_kinds();
                deps.push(Request {
                    spec: dep.spec.clone(),
                    kinds,
                    chain: request.chain.child(format!("{} ({})", dep.spec, kinds)),
                    requested_by: Some(target.to_string()),
                });
            } else {
                debug!(
                    "Skipping dependency {} of {}: condition not met at {}",
                    dep.spec.name, target, version
                );
            }
        }

        Ok((
            NodeState {
                version,
                variants,
                chain: request.chain.clone(),
                edges: Vec::new(),
            },
            deps,
        ))
    }

    /// Add or merge the edge `consumer -> target`. A new edge is first
    /// checked against the current graph so a cycle is reported the moment
    /// it would close, with the full cycle path.
    fn record_edge(
        nodes: &mut BTreeMap<String, NodeState>,
        consumer: &str,
        target: &str,
        request: &Request,
    ) -> Result<()> {
        let has_edge = nodes
            .get(consumer)
            .is_some_and(|s| s.edges.iter().any(|e| e.target == target));

        if has_edge {
            // Merging kinds into an existing edge cannot change reachability.
            if let Some(state) = nodes.get_mut(consumer) {
                if let Some(edge) = state.edges.iter_mut().find(|e| e.target == target) {
                    edge.kinds = edge.kinds.union(request.kinds);
                }
            }
            return Ok(());
        }

        if let Some(path) = find_path(nodes, target, consumer) {
            let mut cycle = vec![consumer.to_string()];
            cycle.extend(path);
            return Err(Error::DependencyCycle { cycle });
        }

        let via_virtual = if request.spec.name != target {
            Some(request.spec.name.clone())
        } else {
            None
        };
        if let Some(state) = nodes.get_mut(consumer) {
            state.edges.push(ResolvedEdge {
                target: target.to_string(),
                kinds: request.kinds,
                via_virtual,
            });
        }
        Ok(())
    }
}

fn render_state(name: &str, state: &NodeState) -> String {
    if state.variants.is_empty() {
        format!("{}@{}", name, state.version)
    } else {
        format!(
            "{}@{} {}",
            name,
            state.version,
            variant::format_map(&state.variants)
        )
    }
}

/// Breadth-first path from `from` to `to` along resolved edges, inclusive of
/// both endpoints. Used to detect the cycle a prospective edge would close.
fn find_path(
    nodes: &BTreeMap<String, NodeState>,
    from: &str,
    to: &str,
) -> Option<Vec<String>> {
    let mut parents: BTreeMap<String, String> = BTreeMap::new();
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    visited.insert(from.to_string());
    queue.push_back(from.to_string());

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut path = vec![current.clone()];
            let mut cursor = current;
            while let Some(parent) = parents.get(&cursor) {
                path.push(parent.clone());
                cursor = parent.clone();
            }
            path.reverse();
            return Some(path);
        }
        if let Some(state) = nodes.get(&current) {
            for edge in &state.edges {
                if visited.insert(edge.target.clone()) {
                    parents.insert(edge.target.clone(), current.clone());
                    queue.push_back(edge.target.clone());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parse_recipe;
    use crate::spec::DepKind;
    use crate::variant::VariantValue;

    fn registry(recipes: &[&str]) -> RecipeRegistry {
        let mut reg = RecipeRegistry::new();
        for content in recipes {
            reg.insert(parse_recipe(content).unwrap()).unwrap();
        }
        reg
    }

    fn spec(s: &str) -> PackageSpec {
        PackageSpec::parse(s).unwrap()
    }

    const LIBBSON: &str = r#"
[package]
name = "libbson"

[[version]]
version = "1.6.3"

[[version]]
version = "1.6.2"

[[version]]
version = "1.6.1"

[[dependency]]
spec = "autoconf"
kinds = ["build"]
when = "@1.6.1"

[[dependency]]
spec = "automake"
kinds = ["build"]
when = "@1.6.1"

[[dependency]]
spec = "libtool"
kinds = ["build"]
when = "@1.6.1"

[[dependency]]
spec = "m4"
kinds = ["build"]
when = "@1.6.1"

[build]
system = "autotools"
autoreconf_when = "@1.6.1"
"#;

    fn tool(name: &str) -> String {
        format!(
            r#"
[package]
name = "{}"

[[version]]
version = "1.0"

[build]
system = "autotools"
"#,
            name
        )
    }

    fn full_registry() -> RecipeRegistry {
        let autoconf = tool("autoconf");
        let automake = tool("automake");
        let libtool = tool("libtool");
        let m4 = tool("m4");
        registry(&[LIBBSON, &autoconf, &automake, &libtool, &m4])
    }

    #[test]
    fn test_concretize_picks_newest_version() {
        let reg = full_registry();
        let graph = Concretizer::new(&reg)
            .concretize(&[spec("libbson")])
            .unwrap();
        assert_eq!(graph.len(), 1);
        let node = graph.node("libbson").unwrap();
        assert_eq!(node.version, Version::parse("1.6.3").unwrap());
        assert!(node.edges.is_empty());
        assert_eq!(graph.roots(), ["libbson"]);
    }

    #[test]
    fn test_concretize_conditional_dependencies() {
        let reg = full_registry();
        let graph = Concretizer::new(&reg)
            .concretize(&[spec("libbson@1.6.1")])
            .unwrap();
        assert_eq!(graph.len(), 5);

        let node = graph.node("libbson").unwrap();
        let targets: Vec<&str> = node.edges.iter().map(|e| e.target.as_str()).collect();
        // Edges in declaration order
        assert_eq!(targets, ["autoconf", "automake", "libtool", "m4"]);
        for edge in &node.edges {
            assert!(edge.kinds.contains(DepKind::Build));
            assert!(!edge.kinds.contains(DepKind::Link));
            assert!(edge.via_virtual.is_none());
        }
    }

    #[test]
    fn test_concretize_not_found() {
        let reg = full_registry();
        let err = Concretizer::new(&reg)
            .concretize(&[spec("nosuchpkg")])
            .unwrap_err();
        match err {
            Error::NotFound { package, .. } => assert_eq!(package, "nosuchpkg"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_unsatisfiable() {
        let reg = full_registry();
        let err = Concretizer::new(&reg)
            .concretize(&[spec("libbson@1.9:")])
            .unwrap_err();
        match err {
            Error::Unsatisfiable { package, constraint, .. } => {
                assert_eq!(package, "libbson");
                assert_eq!(constraint, "1.9:");
            }
            other => panic!("expected Unsatisfiable, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_conflict_carries_both_chains() {
        let a = r#"
[package]
name = "a"

[[version]]
version = "1.0"

[[dependency]]
spec = "shared@1.0"

[build]
system = "script"
steps = [["true"]]
"#;
        let b = r#"
[package]
name = "b"

[[version]]
version = "1.0"

[[dependency]]
spec = "shared@2.0"

[build]
system = "script"
steps = [["true"]]
"#;
        let shared = r#"
[package]
name = "shared"

[[version]]
version = "2.0"

[[version]]
version = "1.0"

[build]
system = "script"
steps = [["true"]]
"#;
        let reg = registry(&[a, b, shared]);
        let err = Concretizer::new(&reg)
            .concretize(&[spec("a"), spec("b")])
            .unwrap_err();
        match err {
            Error::ConcretizationConflict {
                package,
                existing,
                existing_chain,
                requested,
                requested_chain,
            } => {
                assert_eq!(package, "shared");
                assert_eq!(existing, "shared@1.0");
                assert_eq!(requested, "shared@2.0");
                assert_eq!(
                    existing_chain.to_string(),
                    "a -> shared@1.0 (build, link)"
                );
                assert_eq!(
                    requested_chain.to_string(),
                    "b -> shared@2.0 (build, link)"
                );
            }
            other => panic!("expected ConcretizationConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_unknown_variant() {
        let reg = full_registry();
        let err = Concretizer::new(&reg)
            .concretize(&[spec("libbson+fancy")])
            .unwrap_err();
        match err {
            Error::UnknownVariant { package, variant, .. } => {
                assert_eq!(package, "libbson");
                assert_eq!(variant, "fancy");
            }
            other => panic!("expected UnknownVariant, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_invalid_variant_value() {
        let mpich = r#"
[package]
name = "mpich"

[[version]]
version = "3.2"

[[variant]]
name = "fabrics"
default = "tcp"
values = ["tcp", "verbs"]

[build]
system = "autotools"
"#;
        let reg = registry(&[mpich]);
        let err = Concretizer::new(&reg)
            .concretize(&[spec("mpich fabrics=psm")])
            .unwrap_err();
        match err {
            Error::InvalidVariantValue { variant, value, .. } => {
                assert_eq!(variant, "fabrics");
                assert_eq!(value, "psm");
            }
            other => panic!("expected InvalidVariantValue, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_variant_defaults_and_overrides() {
        let mpich = r#"
[package]
name = "mpich"

[[version]]
version = "3.2"

[[variant]]
name = "shared"
default = true

[[variant]]
name = "fabrics"
default = "tcp"
values = ["tcp", "verbs"]

[build]
system = "autotools"
"#;
        let reg = registry(&[mpich]);
        let graph = Concretizer::new(&reg)
            .concretize(&[spec("mpich fabrics=verbs")])
            .unwrap();
        let node = graph.node("mpich").unwrap();
        assert_eq!(node.variants["shared"], VariantValue::Bool(true));
        assert_eq!(node.variants["fabrics"], VariantValue::Str("verbs".into()));
        assert_eq!(node.render(), "mpich@3.2 fabrics=verbs +shared");
    }

    const MPICH: &str = r#"
[package]
name = "mpich"
provides = ["mpi"]

[[version]]
version = "3.2"

[build]
system = "autotools"
"#;

    const OPENMPI: &str = r#"
[package]
name = "openmpi"
provides = ["mpi"]

[[version]]
version = "2.0.2"

[build]
system = "autotools"
"#;

    const PANDA: &str = r#"
[package]
name = "panda"

[[version]]
version = "2016-03-07"

[[dependency]]
spec = "cmake"
kinds = ["build"]

[[dependency]]
spec = "mpi"

[build]
system = "cmake"
"#;

    const CMAKE: &str = r#"
[package]
name = "cmake"

[[version]]
version = "3.7.2"

[build]
system = "script"
steps = [["sh", "bootstrap.sh"]]
"#;

    #[test]
    fn test_concretize_virtual_first_provider_in_name_order() {
        let reg = registry(&[PANDA, CMAKE, MPICH, OPENMPI]);
        let graph = Concretizer::new(&reg)
            .concretize(&[spec("panda")])
            .unwrap();
        assert!(graph.contains("mpich"));
        assert!(!graph.contains("openmpi"));

        let panda = graph.node("panda").unwrap();
        let mpi_edge = panda.edges.iter().find(|e| e.target == "mpich").unwrap();
        assert_eq!(mpi_edge.via_virtual.as_deref(), Some("mpi"));
        // Unannotated dependency carries build and link
        assert_eq!(mpi_edge.kinds, DepKindSet::default_dependency());
    }

    #[test]
    fn test_concretize_virtual_prefers_existing_provider() {
        let reg = registry(&[PANDA, CMAKE, MPICH, OPENMPI]);
        let graph = Concretizer::new(&reg)
            .concretize(&[spec("openmpi"), spec("panda")])
            .unwrap();
        // openmpi is already in the graph, so the mpi request reuses it
        assert!(graph.contains("openmpi"));
        assert!(!graph.contains("mpich"));

        let panda = graph.node("panda").unwrap();
        let mpi_edge = panda.edges.iter().find(|e| e.target == "openmpi").unwrap();
        assert_eq!(mpi_edge.via_virtual.as_deref(), Some("mpi"));
    }

    #[test]
    fn test_concretize_no_provider() {
        let reg = registry(&[PANDA, CMAKE]);
        let err = Concretizer::new(&reg)
            .concretize(&[spec("panda")])
            .unwrap_err();
        match err {
            Error::NoProvider { virtual_name, .. } => assert_eq!(virtual_name, "mpi"),
            other => panic!("expected NoProvider, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_cycle_detected() {
        let a = r#"
[package]
name = "a"

[[version]]
version = "1.0"

[[dependency]]
spec = "b"

[build]
system = "script"
steps = [["true"]]
"#;
        let b = r#"
[package]
name = "b"

[[version]]
version = "1.0"

[[dependency]]
spec = "a"

[build]
system = "script"
steps = [["true"]]
"#;
        let reg = registry(&[a, b]);
        let err = Concretizer::new(&reg).concretize(&[spec("a")]).unwrap_err();
        match err {
            Error::DependencyCycle { cycle } => {
                assert_eq!(cycle.first(), cycle.last());
                assert!(cycle.contains(&"a".to_string()));
                assert!(cycle.contains(&"b".to_string()));
            }
            other => panic!("expected DependencyCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_concretize_merges_edge_kinds() {
        let top = r#"
[package]
name = "top"

[[version]]
version = "1.0"

[[dependency]]
spec = "base"
kinds = ["build"]

[[dependency]]
spec = "base"
kinds = ["run"]

[build]
system = "script"
steps = [["true"]]
"#;
        let base = r#"
[package]
name = "base"

[[version]]
version = "1.0"

[build]
system = "script"
steps = [["true"]]
"#;
        let reg = registry(&[top, base]);
        let graph = Concretizer::new(&reg).concretize(&[spec("top")]).unwrap();
        let node = graph.node("top").unwrap();
        assert_eq!(node.edges.len(), 1);
        assert!(node.edges[0].kinds.contains(DepKind::Build));
        assert!(node.edges[0].kinds.contains(DepKind::Run));
    }

    #[test]
    fn test_concretize_merged_roots_share_nodes() {
        let reg = registry(&[PANDA, CMAKE, MPICH, OPENMPI]);
        let graph = Concretizer::new(&reg)
            .concretize(&[spec("panda"), spec("mpich")])
            .unwrap();
        // mpich appears once, serving both the virtual and the root
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.roots(), ["panda", "mpich"]);
    }

    #[test]
    fn test_concretize_deterministic() {
        let reg = registry(&[PANDA, CMAKE, MPICH, OPENMPI]);
        let a = Concretizer::new(&reg)
            .concretize(&[spec("panda"), spec("mpich")])
            .unwrap();
        let b = Concretizer::new(&reg)
            .concretize(&[spec("panda"), spec("mpich")])
            .unwrap();
        assert_eq!(a, b);
    }
}
