// src/recipe/build.rs

//! Build systems and step rendering
//!
//! The `[build]` section of a recipe is compiled into a [`BuildSystem`], a
//! closed set of known build drivers. Each driver renders a fixed command
//! sequence; recipes tune it through declared fields (extra arguments, an
//! autoreconf condition, explicit script steps) rather than arbitrary hooks.
//!
//! Rendered steps substitute `${prefix}`, `${jobs}`, and `${version}` and
//! run in the unpacked source directory unless a step names a subdirectory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recipe::format::{BuildArg, BuildSection, SystemKind};
use crate::spec::Condition;
use crate::variant::VariantMap;
use crate::version::Version;

/// State a build step is rendered against.
pub struct BuildContext<'a> {
    /// Install prefix for the package being built.
    pub prefix: &'a str,
    /// Parallel job count for make-style builds.
    pub jobs: u32,
    /// The node's pinned version.
    pub version: &'a Version,
    /// The node's complete variant assignment.
    pub variants: &'a VariantMap,
}

/// One rendered build command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory relative to the source directory; `None` runs in
    /// the source directory itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl BuildStep {
    fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
            cwd: None,
        }
    }

    fn in_dir(program: &str, args: Vec<String>, cwd: &str) -> Self {
        Self {
            program: program.to_string(),
            args,
            cwd: Some(cwd.to_string()),
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cwd) = &self.cwd {
            write!(f, "cd {} && ", cwd)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A compiled build driver. Constructed from a recipe's `[build]` section
/// via [`BuildSystem::from_section`], which enforces that only the fields
/// matching the declared system are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSystem {
    Autotools {
        configure_args: Vec<BuildArg>,
        autoreconf_when: Option<Condition>,
    },
    Cmake {
        cmake_args: Vec<BuildArg>,
    },
    Python,
    R,
    Script {
        steps: Vec<Vec<String>>,
    },
}

impl BuildSystem {
    pub fn from_section(section: &BuildSection) -> Result<Self> {
        let kind = section.system;
        let reject = |field: &str| -> Result<()> {
            Err(Error::Parse(format!(
                "Build field '{}' is not valid for system '{}'",
                field,
                kind.as_str()
            )))
        };

        if !section.configure_args.is_empty() && kind != SystemKind::Autotools {
            reject("configure_args")?;
        }
        if section.autoreconf_when.is_some() && kind != SystemKind::Autotools {
            reject("autoreconf_when")?;
        }
        if !section.cmake_args.is_empty() && kind != SystemKind::Cmake {
            reject("cmake_args")?;
        }
        if !section.steps.is_empty() && kind != SystemKind::Script {
            reject("steps")?;
        }

        match kind {
            SystemKind::Autotools => Ok(BuildSystem::Autotools {
                configure_args: section.configure_args.clone(),
                autoreconf_when: section.autoreconf_when.clone(),
            }),
            SystemKind::Cmake => Ok(BuildSystem::Cmake {
                cmake_args: section.cmake_args.clone(),
            }),
            SystemKind::Python => Ok(BuildSystem::Python),
            SystemKind::R => Ok(BuildSystem::R),
            SystemKind::Script => {
                if section.steps.is_empty() {
                    return Err(Error::Parse(
                        "Build system 'script' requires at least one step".to_string(),
                    ));
                }
                for step in &section.steps {
                    if step.is_empty() {
                        return Err(Error::Parse(
                            "Build step must name a program".to_string(),
                        ));
                    }
                }
                Ok(BuildSystem::Script {
                    steps: section.steps.clone(),
                })
            }
        }
    }

    pub fn kind(&self) -> SystemKind {
        match self {
            BuildSystem::Autotools { .. } => SystemKind::Autotools,
            BuildSystem::Cmake { .. } => SystemKind::Cmake,
            BuildSystem::Python => SystemKind::Python,
            BuildSystem::R => SystemKind::R,
            BuildSystem::Script { .. } => SystemKind::Script,
        }
    }

    /// Render the command sequence for one node.
    pub fn render_steps(&self, ctx: &BuildContext<'_>) -> Vec<BuildStep> {
        match self {
            BuildSystem::Autotools {
                configure_args,
                autoreconf_when,
            } => {
                let mut steps = Vec::new();
                // Regenerate configure when the recipe says the shipped one
                // is unusable for this version.
                let regen = autoreconf_when
                    .as_ref()
                    .is_some_and(|c| c.evaluate(ctx.version, ctx.variants));
                if regen {
                    steps.push(BuildStep::new("autoreconf", vec!["-fiv".to_string()]));
                }
                let mut args = vec![format!("--prefix={}", ctx.prefix)];
                args.extend(render_args(configure_args, ctx));
                steps.push(BuildStep::new("./configure", args));
                steps.push(BuildStep::new("make", vec![format!("-j{}", ctx.jobs)]));
                steps.push(BuildStep::new("make", vec!["install".to_string()]));
                steps
            }
            BuildSystem::Cmake { cmake_args } => {
                let mut args = vec![
                    "..".to_string(),
                    format!("-DCMAKE_INSTALL_PREFIX={}", ctx.prefix),
                ];
                args.extend(render_args(cmake_args, ctx));
                vec![
                    BuildStep::in_dir("cmake", args, "build"),
                    BuildStep::in_dir("make", vec![format!("-j{}", ctx.jobs)], "build"),
                    BuildStep::in_dir("make", vec!["install".to_string()], "build"),
                ]
            }
            BuildSystem::Python => vec![BuildStep::new(
                "python",
                vec![
                    "setup.py".to_string(),
                    "install".to_string(),
                    format!("--prefix={}", ctx.prefix),
                ],
            )],
            BuildSystem::R => vec![BuildStep::new(
                "R",
                vec![
                    "CMD".to_string(),
                    "INSTALL".to_string(),
                    format!("--library={}/rlib/R/library", ctx.prefix),
                    ".".to_string(),
                ],
            )],
            BuildSystem::Script { steps } => steps
                .iter()
                .map(|words| {
                    let program = substitute(&words[0], ctx);
                    let args = words[1..].iter().map(|w| substitute(w, ctx)).collect();
                    BuildStep::new(&program, args)
                })
                .collect(),
        }
    }
}

/// Replace `${prefix}`, `${jobs}`, and `${version}` in a template string.
pub fn substitute(template: &str, ctx: &BuildContext<'_>) -> String {
    template
        .replace("${prefix}", ctx.prefix)
        .replace("${jobs}", &ctx.jobs.to_string())
        .replace("${version}", ctx.version.as_str())
}

/// Arguments whose conditions hold, substituted.
fn render_args(args: &[BuildArg], ctx: &BuildContext<'_>) -> Vec<String> {
    args.iter()
        .filter(|a| a.applies(ctx.version, ctx.variants))
        .map(|a| substitute(a.arg(), ctx))
        .collect()
}
