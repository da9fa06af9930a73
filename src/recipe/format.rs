// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe a package: its versions, variants,
//! dependencies, what virtuals it provides, and how it builds. Recipes are
//! pure data; all constraint strings are parsed into typed values at load
//! time so a loaded recipe needs no further string handling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spec::{Condition, DepKindSet, PackageSpec};
use crate::variant::{VariantMap, VariantValue};
use crate::version::{Version, VersionReq};

/// A complete package recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Declared versions, in file order
    #[serde(rename = "version", default)]
    pub versions: Vec<VersionDecl>,

    /// Variant declarations, in file order
    #[serde(rename = "variant", default)]
    pub variants: Vec<VariantDecl>,

    /// Dependency declarations, in file order
    #[serde(rename = "dependency", default)]
    pub dependencies: Vec<DependencyDecl>,

    /// Build instructions
    pub build: BuildSection,
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Declared versions from newest to oldest.
    pub fn sorted_versions(&self) -> Vec<&VersionDecl> {
        let mut decls: Vec<&VersionDecl> = self.versions.iter().collect();
        decls.sort_by(|a, b| b.version.cmp(&a.version));
        decls
    }

    /// The newest declared version satisfying `req`.
    pub fn best_version(&self, req: &VersionReq) -> Option<&VersionDecl> {
        self.sorted_versions()
            .into_iter()
            .find(|d| req.satisfies(&d.version))
    }

    pub fn version_decl(&self, version: &Version) -> Option<&VersionDecl> {
        self.versions.iter().find(|d| &d.version == version)
    }

    pub fn variant_decl(&self, name: &str) -> Option<&VariantDecl> {
        self.variants.iter().find(|d| d.name == name)
    }

    /// The complete variant assignment a fresh node starts from.
    pub fn default_variants(&self) -> VariantMap {
        self.variants
            .iter()
            .map(|d| (d.name.clone(), d.default.clone()))
            .collect()
    }

    /// Virtual package names this recipe provides.
    pub fn provides(&self) -> &[String] {
        &self.package.provides
    }

    /// Substitute `${version}` in a template string.
    pub fn substitute(&self, template: &str, version: &Version) -> String {
        template.replace("${version}", version.as_str())
    }

    /// The source archive URL for `version`: the per-version override when
    /// declared, otherwise the package URL template with `${version}` filled
    /// in.
    pub fn archive_url(&self, version: &Version) -> Option<String> {
        if let Some(decl) = self.version_decl(version) {
            if let Some(url) = &decl.url {
                return Some(url.clone());
            }
        }
        self.package
            .url
            .as_ref()
            .map(|u| self.substitute(u, version))
    }
}

/// The `[package]` section: identity and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub homepage: Option<String>,

    /// Archive URL template; `${version}` is substituted per version.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub license: Option<String>,

    /// Virtual package names this package provides.
    #[serde(default)]
    pub provides: Vec<String>,
}

/// One `[[version]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDecl {
    pub version: Version,

    /// Archive checksum in `algo:hex` form, e.g. `md5:4d6779...`.
    #[serde(default)]
    pub checksum: Option<String>,

    /// Full URL override for this version.
    #[serde(default)]
    pub url: Option<String>,
}

/// One `[[variant]]` entry: a build option the package exposes.
///
/// Boolean variants take `true`/`false` and list no values; string variants
/// may list their allowed values (an empty list leaves them unrestricted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDecl {
    pub name: String,

    pub default: VariantValue,

    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl VariantDecl {
    /// Whether `value` is acceptable for this variant.
    pub fn allows(&self, value: &VariantValue) -> bool {
        match (&self.default, value) {
            (VariantValue::Bool(_), VariantValue::Bool(_)) => true,
            (VariantValue::Str(_), VariantValue::Str(s)) => {
                self.values.is_empty() || self.values.iter().any(|v| v == s)
            }
            _ => false,
        }
    }
}

/// One `[[dependency]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyDecl {
    /// The requested package (possibly virtual) with its constraints.
    pub spec: PackageSpec,

    /// Dependency kinds; an absent field means build and link.
    #[serde(default)]
    pub kinds: Option<DepKindSet>,

    /// Condition on the owning package's resolved state; absent means the
    /// dependency always applies.
    #[serde(default)]
    pub when: Option<Condition>,
}

impl DependencyDecl {
    pub fn effective_kinds(&self) -> DepKindSet {
        self.kinds.unwrap_or(DepKindSet::default_dependency())
    }

    /// Whether this dependency applies to a node pinned to `version` with
    /// the given complete variant assignment.
    pub fn applies(&self, version: &Version, variants: &VariantMap) -> bool {
        self.when
            .as_ref()
            .is_none_or(|c| c.evaluate(version, variants))
    }
}

/// Which build system drives the package, written as the `system` key of the
/// `[build]` section. The set is closed; recipes cannot define new systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    Autotools,
    Cmake,
    Python,
    R,
    Script,
}

impl SystemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemKind::Autotools => "autotools",
            SystemKind::Cmake => "cmake",
            SystemKind::Python => "python",
            SystemKind::R => "r",
            SystemKind::Script => "script",
        }
    }
}

/// An extra build argument, optionally gated on the owning node's resolved
/// state. Written either as a bare string or as an inline table:
///
/// ```toml
/// configure_args = [
///     "--enable-fast",
///     { arg = "--enable-shared", when = "+shared" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildArg {
    Plain(String),

    Gated { arg: String, when: Condition },
}

impl BuildArg {
    pub fn arg(&self) -> &str {
        match self {
            BuildArg::Plain(arg) => arg,
            BuildArg::Gated { arg, .. } => arg,
        }
    }

    pub fn when(&self) -> Option<&Condition> {
        match self {
            BuildArg::Plain(_) => None,
            BuildArg::Gated { when, .. } => Some(when),
        }
    }

    /// Whether this argument applies under the given resolved state.
    pub fn applies(&self, version: &Version, variants: &VariantMap) -> bool {
        self.when().is_none_or(|c| c.evaluate(version, variants))
    }
}

/// The `[build]` section.
///
/// Only the fields that match `system` may be set; the cross-field rules are
/// enforced when the section is compiled into a
/// [`BuildSystem`](crate::recipe::BuildSystem).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    pub system: SystemKind,

    /// Extra `./configure` arguments (autotools only).
    #[serde(default)]
    pub configure_args: Vec<BuildArg>,

    /// Extra `cmake` arguments (cmake only).
    #[serde(default)]
    pub cmake_args: Vec<BuildArg>,

    /// Regenerate the build system first when this condition holds
    /// (autotools only).
    #[serde(default)]
    pub autoreconf_when: Option<Condition>,

    /// Explicit command list (script only).
    #[serde(default)]
    pub steps: Vec<Vec<String>>,

    /// Extra environment for every build step.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::DepKind;

    const SAMPLE_RECIPE: &str = r#"
[package]
name = "libbson"
description = "A library providing useful routines related to building, parsing, and iterating BSON documents."
homepage = "https://github.com/mongodb/libbson"
url = "https://github.com/mongodb/libbson/releases/download/${version}/libbson-${version}.tar.gz"

[[version]]
version = "1.6.3"
checksum = "md5:b7bdb314197106fcfb4af105a582d343"

[[version]]
version = "1.6.2"
checksum = "md5:c128a2ae3e35295e1176465be60f19db"

[[version]]
version = "1.6.1"
checksum = "md5:4d6779451bc5764a7d4982c01e7bd8c2"

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

    const PROVIDER_RECIPE: &str = r#"
[package]
name = "mpich"
description = "MPICH is a high performance implementation of the MPI standard."
provides = ["mpi"]

[[version]]
version = "3.2"

[[variant]]
name = "shared"
default = true
description = "Build shared libraries"

[[variant]]
name = "fabrics"
default = "tcp"
values = ["tcp", "verbs"]

[build]
system = "autotools"
configure_args = [
    { arg = "--enable-shared", when = "+shared" },
    { arg = "--disable-shared", when = "~shared" },
    { arg = "--with-ibverbs", when = "fabrics=verbs" },
]
"#;

    fn parse(content: &str) -> Recipe {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_recipe_parse_sections() {
        let recipe = parse(SAMPLE_RECIPE);
        assert_eq!(recipe.name(), "libbson");
        assert_eq!(recipe.versions.len(), 3);
        assert_eq!(recipe.dependencies.len(), 4);
        assert_eq!(recipe.build.system, SystemKind::Autotools);
        assert!(recipe.build.autoreconf_when.is_some());
    }

    #[test]
    fn test_recipe_sorted_versions() {
        let recipe = parse(SAMPLE_RECIPE);
        let sorted: Vec<&str> = recipe
            .sorted_versions()
            .iter()
            .map(|d| d.version.as_str())
            .collect();
        assert_eq!(sorted, ["1.6.3", "1.6.2", "1.6.1"]);
    }

    #[test]
    fn test_recipe_best_version() {
        let recipe = parse(SAMPLE_RECIPE);
        let any = VersionReq::any();
        assert_eq!(recipe.best_version(&any).unwrap().version.as_str(), "1.6.3");

        let pinned = VersionReq::parse("1.6.1").unwrap();
        assert_eq!(
            recipe.best_version(&pinned).unwrap().version.as_str(),
            "1.6.1"
        );

        let none = VersionReq::parse("1.7:").unwrap();
        assert!(recipe.best_version(&none).is_none());
    }

    #[test]
    fn test_recipe_dependency_kinds() {
        let recipe = parse(SAMPLE_RECIPE);
        let dep = &recipe.dependencies[0];
        assert_eq!(dep.spec.name, "autoconf");
        assert!(dep.effective_kinds().contains(DepKind::Build));
        assert!(!dep.effective_kinds().contains(DepKind::Link));
    }

    #[test]
    fn test_recipe_dependency_condition() {
        let recipe = parse(SAMPLE_RECIPE);
        let dep = &recipe.dependencies[0];
        let vars = VariantMap::new();
        assert!(dep.applies(&Version::parse("1.6.1").unwrap(), &vars));
        assert!(!dep.applies(&Version::parse("1.6.3").unwrap(), &vars));
    }

    #[test]
    fn test_recipe_unannotated_dependency_defaults() {
        let recipe: Recipe = toml::from_str(
            r#"
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
"#,
        )
        .unwrap();
        let mpi = &recipe.dependencies[1];
        assert_eq!(mpi.effective_kinds(), DepKindSet::default_dependency());
        assert!(mpi.applies(&Version::parse("2016-03-07").unwrap(), &VariantMap::new()));
    }

    #[test]
    fn test_recipe_provides_and_variants() {
        let recipe = parse(PROVIDER_RECIPE);
        assert_eq!(recipe.provides(), ["mpi"]);

        let defaults = recipe.default_variants();
        assert_eq!(defaults["shared"], VariantValue::Bool(true));
        assert_eq!(defaults["fabrics"], VariantValue::Str("tcp".into()));

        let fabrics = recipe.variant_decl("fabrics").unwrap();
        assert!(fabrics.allows(&VariantValue::Str("verbs".into())));
        assert!(!fabrics.allows(&VariantValue::Str("psm".into())));
        assert!(!fabrics.allows(&VariantValue::Bool(true)));

        let shared = recipe.variant_decl("shared").unwrap();
        assert!(shared.allows(&VariantValue::Bool(false)));
        assert!(!shared.allows(&VariantValue::Str("maybe".into())));
    }

    #[test]
    fn test_build_args_gated_on_variants() {
        let recipe = parse(PROVIDER_RECIPE);
        let args = &recipe.build.configure_args;
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].arg(), "--enable-shared");
        assert!(args[0].when().is_some());

        let version = Version::parse("3.2").unwrap();
        let mut variants = recipe.default_variants();
        assert!(args[0].applies(&version, &variants));
        assert!(!args[1].applies(&version, &variants));
        assert!(!args[2].applies(&version, &variants));

        variants.insert("fabrics".to_string(), VariantValue::Str("verbs".into()));
        assert!(args[2].applies(&version, &variants));
    }

    #[test]
    fn test_recipe_archive_url() {
        let recipe = parse(SAMPLE_RECIPE);
        let v = Version::parse("1.6.3").unwrap();
        assert_eq!(
            recipe.archive_url(&v).unwrap(),
            "https://github.com/mongodb/libbson/releases/download/1.6.3/libbson-1.6.3.tar.gz"
        );

        let recipe = parse(PROVIDER_RECIPE);
        assert!(recipe.archive_url(&Version::parse("3.2").unwrap()).is_none());
    }

    #[test]
    fn test_recipe_round_trip() {
        let recipe = parse(SAMPLE_RECIPE);
        let serialized = toml::to_string(&recipe).unwrap();
        let back: Recipe = toml::from_str(&serialized).unwrap();
        assert_eq!(back.name(), recipe.name());
        assert_eq!(back.versions.len(), recipe.versions.len());
        assert_eq!(back.dependencies.len(), recipe.dependencies.len());
    }
}
