// src/lib.rs

//! Cairn
//!
//! Deterministic dependency resolution and build planning for source
//! package collections.
//!
//! # Architecture
//!
//! - Recipes: declarative TOML package descriptions with checksummed
//!   versions, variants, conditional dependencies, and a tagged build system
//! - Registry: explicitly loaded, name-ordered index with virtual providers
//! - Concretizer: work-queue resolution pinning one node per package name,
//!   first error aborts
//! - Plan: topologically ordered build steps with install-prefix wiring

mod error;
pub mod plan;
pub mod recipe;
pub mod registry;
pub mod resolver;
pub mod spec;
pub mod variant;
pub mod version;

pub use error::{Error, RequestChain, Result};
pub use plan::{BuildPlan, BuildPlanBuilder, PlanNode, PlanOptions};
pub use recipe::{BuildStep, BuildSystem, Recipe, parse_recipe, validate_recipe};
pub use registry::RecipeRegistry;
pub use resolver::{ConcreteNode, Concretizer, ResolvedEdge, ResolvedGraph};
pub use spec::{Condition, DepKind, DepKindSet, PackageSpec};
pub use variant::{VariantMap, VariantValue};
pub use version::{Version, VersionReq};
