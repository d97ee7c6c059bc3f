use crate::config::ToolNames;
use crate::error::ExecError;
use crate::language::Language;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::trace;

/// Answers whether a compiler or interpreter is installed.
///
/// Absence is an ordinary answer, so lookups never fail.
pub trait ToolchainProbe: Send + Sync + fmt::Debug {
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    fn available(&self, tool: &str) -> bool {
        self.locate(tool).is_some()
    }
}

/// Searches the `PATH` of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathProbe;

impl ToolchainProbe for PathProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        let found = which::which(tool).ok();
        trace!(?tool, ?found, "probe");
        found
    }
}

/// A probe with a fixed answer set, for forcing a backend in tests.
#[derive(Debug, Default, Clone)]
pub struct FixedProbe {
    tools: HashMap<String, PathBuf>,
}

impl FixedProbe {
    /// Reports every tool as missing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(tool.into(), path.into());
        self
    }
}

impl ToolchainProbe for FixedProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools.get(tool).cloned()
    }
}

/// Resolved binaries for one request.
#[derive(Debug, Clone)]
pub struct Toolchain {
    language: Language,
    found: HashMap<&'static str, PathBuf>,
    /// Configured binary names per role, as shown to users.
    wanted: HashMap<&'static str, String>,
    missing: Vec<String>,
}

impl Toolchain {
    /// Probes every tool `language` needs, once.
    pub fn detect(probe: &dyn ToolchainProbe, names: &ToolNames, language: Language) -> Self {
        let mut found = HashMap::new();
        let mut wanted = HashMap::new();
        let mut missing = Vec::new();

        let mut resolve = |role: &'static str, candidates: &[&str]| {
            let shown = candidates.join(" or ");
            match candidates.iter().find_map(|name| probe.locate(name)) {
                Some(path) => {
                    found.insert(role, path);
                }
                None => missing.push(shown.clone()),
            }
            wanted.insert(role, shown);
        };

        match language {
            Language::C => resolve("cc", &[names.gcc.as_str()]),
            Language::Cpp => resolve("cxx", &[names.gxx.as_str()]),
            Language::Java => {
                resolve("javac", &[names.javac.as_str()]);
                resolve("java", &[names.java.as_str()]);
            }
            Language::Python if names.python.is_empty() => resolve("python", &["python3"]),
            Language::Python => {
                let candidates: Vec<&str> = names.python.iter().map(String::as_str).collect();
                resolve("python", &candidates)
            }
        }

        Self {
            language,
            found,
            wanted,
            missing,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// The first tool that could not be found, if any.
    pub fn first_missing(&self) -> Option<&str> {
        self.missing.first().map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The resolved binary for `role`, or `ToolUnavailable` naming the
    /// configured binary.
    pub fn require(&self, role: &str) -> Result<&Path, ExecError> {
        self.found
            .get(role)
            .map(PathBuf::as_path)
            .ok_or_else(|| ExecError::ToolUnavailable {
                tool: self
                    .wanted
                    .get(role)
                    .cloned()
                    .unwrap_or_else(|| role.to_owned()),
                language: self.language,
            })
    }
}
