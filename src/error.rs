// src/error.rs

//! Central error type for cairn.
//!
//! Resolution errors carry the chain of requests that produced them, so a
//! failed concretization names every hop from the root spec down to the
//! request that could not be satisfied. Concretization aborts on the first
//! error; there is no partial result to report alongside these.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The path of requests that led to a resolution step, root request first.
///
/// Each link is a rendered request such as `libbson@1.6.1` for a root or
/// `autoconf (build)` for a dependency, joined with ` -> ` for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestChain {
    links: Vec<String>,
}

impl RequestChain {
    /// Start a chain at a root request.
    pub fn root(link: impl Into<String>) -> Self {
        Self {
            links: vec![link.into()],
        }
    }

    /// Extend the chain with one more request, leaving `self` untouched.
    pub fn child(&self, link: impl Into<String>) -> Self {
        let mut links = self.links.clone();
        links.push(link.into());
        Self { links }
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }
}

impl fmt::Display for RequestChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.links.join(" -> "))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Package not found: '{package}' (requested via {chain})")]
    NotFound { package: String, chain: RequestChain },

    #[error("No declared version of '{package}' satisfies '@{constraint}' (requested via {chain})")]
    Unsatisfiable {
        package: String,
        constraint: String,
        chain: RequestChain,
    },

    #[error(
        "Conflicting requirements for '{package}': pinned as '{existing}' via {existing_chain}, \
         but '{requested}' is required via {requested_chain}"
    )]
    ConcretizationConflict {
        package: String,
        existing: String,
        existing_chain: RequestChain,
        requested: String,
        requested_chain: RequestChain,
    },

    #[error("No provider of virtual package '{virtual_name}' satisfies '{constraint}' (requested via {chain})")]
    NoProvider {
        virtual_name: String,
        constraint: String,
        chain: RequestChain,
    },

    #[error("Dependency cycle: {}", .cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },

    #[error("Package '{package}' has no variant '{variant}' (requested via {chain})")]
    UnknownVariant {
        package: String,
        variant: String,
        chain: RequestChain,
    },

    #[error("Variant '{variant}' of '{package}' does not allow value '{value}' (requested via {chain})")]
    InvalidVariantValue {
        package: String,
        variant: String,
        value: String,
        chain: RequestChain,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid recipe '{path}': {message}")]
    Recipe { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
