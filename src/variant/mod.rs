// src/variant/mod.rs

//! Variant values and assignments
//!
//! A variant is a named build option on a package: a boolean toggle such as
//! `+shared` / `~shared`, or a string choice such as `fabrics=verbs`. An
//! assignment maps option names to values; abstract specs carry only the
//! options they explicitly set, while concretized nodes carry a value for
//! every option the recipe declares.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The value of one variant option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantValue {
    Bool(bool),
    Str(String),
}

impl VariantValue {
    /// Parse a value written in a spec or recipe. The words `true` and
    /// `false` normalize to booleans so `shared=true` and `+shared` agree.
    pub fn parse(s: &str) -> Self {
        match s {
            "true" => VariantValue::Bool(true),
            "false" => VariantValue::Bool(false),
            _ => VariantValue::Str(s.to_string()),
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            VariantValue::Bool(_) => "boolean",
            VariantValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantValue::Bool(b) => write!(f, "{}", b),
            VariantValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// An assignment of variant options to values, ordered by option name.
pub type VariantMap = BTreeMap<String, VariantValue>;

/// Parse one variant token: `+name`, `~name`, or `name=value`.
pub fn parse_token(tok: &str) -> Result<(String, VariantValue)> {
    if let Some(name) = tok.strip_prefix('+') {
        check_name(name, tok)?;
        Ok((name.to_string(), VariantValue::Bool(true)))
    } else if let Some(name) = tok.strip_prefix('~') {
        check_name(name, tok)?;
        Ok((name.to_string(), VariantValue::Bool(false)))
    } else if let Some((name, value)) = tok.split_once('=') {
        check_name(name, tok)?;
        if value.is_empty() {
            return Err(Error::Parse(format!(
                "Variant token '{}' has an empty value",
                tok
            )));
        }
        Ok((name.to_string(), VariantValue::parse(value)))
    } else {
        Err(Error::Parse(format!(
            "Invalid variant token '{}' (expected +name, ~name, or name=value)",
            tok
        )))
    }
}

/// Whether two assignments agree on every option both explicitly set.
/// Options set by only one side do not constrain the other.
pub fn compatible(a: &VariantMap, b: &VariantMap) -> bool {
    a.iter()
        .all(|(name, value)| b.get(name).map_or(true, |other| other == value))
}

/// Render an assignment as spec tokens in option-name order, for example
/// `~debug fabrics=verbs +shared`. Empty assignments render as "".
pub fn format_map(map: &VariantMap) -> String {
    let tokens: Vec<String> = map
        .iter()
        .map(|(name, value)| match value {
            VariantValue::Bool(true) => format!("+{}", name),
            VariantValue::Bool(false) => format!("~{}", name),
            VariantValue::Str(s) => format!("{}={}", name, s),
        })
        .collect();
    tokens.join(" ")
}

fn check_name(name: &str, tok: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::Parse(format!(
            "Invalid variant name in token '{}'",
            tok
        )))
    }
}
