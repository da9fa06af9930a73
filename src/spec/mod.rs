// src/spec/mod.rs

//! Package specs, conditions, and dependency kinds
//!
//! A spec names a package together with the constraints a consumer places on
//! it: a version requirement and explicitly set variants. Written form:
//!
//! ```text
//! libbson@1.6.1
//! py-pyparsing@2.1.4:
//! mpich@3.2:4 +shared~debug fabrics=verbs
//! ```
//!
//! Conditions use the same tokens without a package name and gate recipe
//! clauses (`when = "@1.6.1"`). They are evaluated only against the resolved
//! state of the node that owns the clause.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::variant::{self, VariantMap, VariantValue};
use crate::version::{Version, VersionReq};

/// How a dependency is used by its consumer. A single dependency edge can
/// carry several kinds at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepKind {
    /// Needed while building the consumer.
    Build,
    /// Linked into the consumer.
    Link,
    /// Needed when the consumer runs.
    Run,
    /// Needed only for the consumer's test suite.
    Test,
}

impl DepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepKind::Build => "build",
            DepKind::Link => "link",
            DepKind::Run => "run",
            DepKind::Test => "test",
        }
    }
}

impl fmt::Display for DepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-exclusive set of dependency kinds, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepKindSet(u8);

impl DepKindSet {
    const BUILD: u8 = 1 << 0;
    const LINK: u8 = 1 << 1;
    const RUN: u8 = 1 << 2;
    const TEST: u8 = 1 << 3;

    pub const fn empty() -> Self {
        DepKindSet(0)
    }

    /// The kinds an unannotated dependency carries: build and link.
    pub const fn default_dependency() -> Self {
        DepKindSet(Self::BUILD | Self::LINK)
    }

    pub fn from_kinds(kinds: &[DepKind]) -> Self {
        let mut set = Self::empty();
        for k in kinds {
            set.insert(*k);
        }
        set
    }

    pub fn insert(&mut self, kind: DepKind) {
        self.0 |= Self::bit(kind);
    }

    pub fn contains(self, kind: DepKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: DepKindSet) -> DepKindSet {
        DepKindSet(self.0 | other.0)
    }

    pub fn intersects(self, other: DepKindSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Iterate kinds in fixed build, link, run, test order.
    pub fn iter(self) -> impl Iterator<Item = DepKind> {
        [DepKind::Build, DepKind::Link, DepKind::Run, DepKind::Test]
            .into_iter()
            .filter(move |k| self.contains(*k))
    }

    fn bit(kind: DepKind) -> u8 {
        match kind {
            DepKind::Build => Self::BUILD,
            DepKind::Link => Self::LINK,
            DepKind::Run => Self::RUN,
            DepKind::Test => Self::TEST,
        }
    }
}

impl fmt::Display for DepKindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.iter().map(|k| k.as_str()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl Serialize for DepKindSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for DepKindSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let kinds = Vec::<DepKind>::deserialize(deserializer)?;
        Ok(DepKindSet::from_kinds(&kinds))
    }
}

/// An abstract package request: a name plus the constraints placed on it.
///
/// A spec may name a virtual package, in which case resolution replaces it
/// with a provider and the constraints apply to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub req: VersionReq,
    pub variants: VariantMap,
}

impl PackageSpec {
    /// A bare request for `name` with no constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            req: VersionReq::any(),
            variants: VariantMap::new(),
        }
    }

    /// Parse a spec string: a package name optionally followed by `@` and a
    /// version requirement and by variant tokens. Variant tokens may be
    /// juxtaposed (`+a~b`) or whitespace separated.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Parse("Empty package spec".to_string()));
        }

        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() && is_name_char(bytes[i]) {
            i += 1;
        }
        let name = &s[..i];
        if !is_valid_package_name(name) {
            return Err(Error::Parse(format!(
                "Invalid package name in spec '{}'",
                s
            )));
        }

        let mut spec = PackageSpec::new(name);
        let mut saw_req = false;
        parse_clauses(&s[i..], s, &mut |clause| match clause {
            Clause::Req(req) => {
                if saw_req {
                    return Err(Error::Parse(format!(
                        "Spec '{}' has more than one version requirement",
                        s
                    )));
                }
                saw_req = true;
                spec.req = req;
                Ok(())
            }
            Clause::Variant(name, value) => {
                if spec.variants.insert(name.clone(), value).is_some() {
                    return Err(Error::Parse(format!(
                        "Variant '{}' set twice in spec '{}'",
                        name, s
                    )));
                }
                Ok(())
            }
        })?;

        Ok(spec)
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.req.is_any() {
            write!(f, "@{}", self.req)?;
        }
        if !self.variants.is_empty() {
            write!(f, " {}", variant::format_map(&self.variants))?;
        }
        Ok(())
    }
}

impl FromStr for PackageSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PackageSpec::parse(s)
    }
}

impl Serialize for PackageSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PackageSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PackageSpec::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A predicate over the resolved state of a single node: an optional version
/// requirement plus variant equality checks. The empty condition always
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    pub req: Option<VersionReq>,
    pub variants: VariantMap,
}

impl Condition {
    /// The condition that always holds.
    pub fn always() -> Self {
        Self::default()
    }

    /// Parse a condition: the same tokens as a spec, without a package name.
    /// The empty string parses as the always-true condition.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut cond = Condition::always();
        parse_clauses(trimmed, trimmed, &mut |clause| match clause {
            Clause::Req(req) => {
                if cond.req.is_some() {
                    return Err(Error::Parse(format!(
                        "Condition '{}' has more than one version requirement",
                        trimmed
                    )));
                }
                cond.req = Some(req);
                Ok(())
            }
            Clause::Variant(name, value) => {
                if cond.variants.insert(name.clone(), value).is_some() {
                    return Err(Error::Parse(format!(
                        "Variant '{}' set twice in condition '{}'",
                        name, trimmed
                    )));
                }
                Ok(())
            }
        })?;
        Ok(cond)
    }

    pub fn is_always(&self) -> bool {
        self.req.is_none() && self.variants.is_empty()
    }

    /// Evaluate against a node's pinned version and complete variant
    /// assignment. A variant check against an option the node does not carry
    /// is false.
    pub fn evaluate(&self, version: &Version, variants: &VariantMap) -> bool {
        if let Some(req) = &self.req {
            if !req.satisfies(version) {
                return false;
            }
        }
        self.variants
            .iter()
            .all(|(name, value)| variants.get(name) == Some(value))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(req) = &self.req {
            parts.push(format!("@{}", req));
        }
        if !self.variants.is_empty() {
            parts.push(variant::format_map(&self.variants));
        }
        write!(f, "{}", parts.join(" "))
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Condition::parse(s)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Condition::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Package names are lowercase-friendly identifiers: alphanumeric plus `-`
/// and `_`, starting with an alphanumeric character.
pub fn is_valid_package_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

enum Clause {
    Req(VersionReq),
    Variant(String, VariantValue),
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Scan the clause part of a spec or condition, emitting each parsed clause.
///
/// `@` starts a version requirement running to the next `+`, `~`, or
/// whitespace. `+` and `~` start boolean variant tokens and may follow each
/// other without separators. Anything else must be a `name=value` token.
fn parse_clauses(
    rest: &str,
    full: &str,
    emit: &mut dyn FnMut(Clause) -> Result<()>,
) -> Result<()> {
    let bytes = rest.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
        } else if c == '@' {
            i += 1;
            let start = i;
            while i < bytes.len()
                && bytes[i] != b'+'
                && bytes[i] != b'~'
                && !bytes[i].is_ascii_whitespace()
            {
                i += 1;
            }
            emit(Clause::Req(VersionReq::parse(&rest[start..i])?))?;
        } else if c == '+' || c == '~' {
            let start = i;
            i += 1;
            while i < bytes.len() && is_name_char(bytes[i]) {
                i += 1;
            }
            let (name, value) = variant::parse_token(&rest[start..i])?;
            emit(Clause::Variant(name, value))?;
        } else if is_name_char(bytes[i]) {
            let start = i;
            while i < bytes.len()
                && bytes[i] != b'+'
                && bytes[i] != b'~'
                && bytes[i] != b'@'
                && !bytes[i].is_ascii_whitespace()
            {
                i += 1;
            }
            let tok = &rest[start..i];
            if !tok.contains('=') {
                return Err(Error::Parse(format!(
                    "Unexpected token '{}' in '{}'",
                    tok, full
                )));
            }
            let (name, value) = variant::parse_token(tok)?;
            emit(Clause::Variant(name, value))?;
        } else {
            return Err(Error::Parse(format!(
                "Unexpected character '{}' in '{}'",
                c, full
            )));
        }
    }
    Ok(())
}
