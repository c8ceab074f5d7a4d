//! Architecture lint for the user registry backend.
//!
//! The backend keeps its hexagon at module level: `domain` holds the value
//! types, the entity, the ports and the registration service; `inbound` and
//! `outbound` hold the adapters. The lint parses every non-test source file
//! under those modules and enforces:
//!
//! - [`Rule::LayerDependency`]: the domain references no other backend
//!   module, and the two adapter sides never reference each other.
//! - [`Rule::FrameworkCrate`]: the domain uses no HTTP, storage or host
//!   crate; inbound adapters use no storage crate; outbound adapters use no
//!   HTTP crate.
//! - [`Rule::FrameworkAttribute`]: domain items carry no framework derive or
//!   helper attribute.
//! - [`Rule::FrameworkTrait`]: domain types implement no framework trait.
//! - [`Rule::DomainCycle`]: modules directly under `domain` do not depend on
//!   each other in a cycle.
//!
//! `#[cfg(test)]` items, `tests.rs` files and `*_tests.rs` files are exempt.
//!
//! Run it with `cargo run -p architecture-lint`.

mod cycles;
mod references;
mod rules;
mod source_tree;

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::cycles::DomainGraph;
use crate::references::{FileScan, module_path, scan_file};
pub use crate::rules::Rule;
use crate::rules::{Layer, check_file};
use crate::source_tree::{is_test_file, read_layer_sources};

/// Name the backend binaries use to import the library crate.
pub(crate) const BACKEND_CRATE: &str = "user_registry";

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: Utf8PathBuf,
    pub contents: String,
}

impl LintSource {
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// One broken rule in one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// Path relative to `backend/src`.
    pub file: Utf8PathBuf,
    pub rule: Rule,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.file, self.rule, self.message)
    }
}

/// Failures reported by the lint.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("cannot read backend sources: {0}")]
    Io(#[from] io::Error),
    #[error("{dir}: file name is not UTF-8: {name:?}")]
    NonUtf8Name { dir: Utf8PathBuf, name: OsString },
    #[error("cannot parse {file}: {source}")]
    Parse { file: Utf8PathBuf, source: syn::Error },
    #[error("{}", report(.0))]
    Violations(Vec<Violation>),
}

impl LintError {
    /// Violations carried by the error, empty for I/O and parse failures.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Violations(violations) => violations,
            _ => &[],
        }
    }
}

fn report(violations: &[Violation]) -> String {
    let mut text = format!("{} architecture violation(s):", violations.len());
    for violation in violations {
        text.push_str("\n  - ");
        text.push_str(&violation.to_string());
    }
    text
}

/// Lint the sources under `backend_dir/src`.
///
/// # Errors
/// Returns [`LintError::Violations`] when any rule is broken, or an I/O or
/// parse error when the tree cannot be read.
pub fn lint_backend_sources(backend_dir: &Utf8Path) -> Result<(), LintError> {
    let sources = read_layer_sources(&backend_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint in-memory sources. Files outside `domain`, `inbound` and `outbound`
/// are ignored.
///
/// # Errors
/// See [`lint_backend_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), LintError> {
    let mut scanned: Vec<(&Utf8Path, Vec<String>, Layer, FileScan)> = Vec::new();
    for source in sources {
        if is_test_file(&source.file) {
            continue;
        }
        let module = module_path(&source.file);
        let Some(layer) = Layer::of(&module) else {
            continue;
        };
        let parsed = syn::parse_file(&source.contents).map_err(|err| LintError::Parse {
            file: source.file.clone(),
            source: err,
        })?;
        let scan = scan_file(&module, &parsed);
        scanned.push((source.file.as_path(), module, layer, scan));
    }

    let mut violations = BTreeSet::new();
    let mut graph = DomainGraph::default();
    for (file, module, layer, scan) in &scanned {
        violations.extend(check_file(file, *layer, scan));
        if *layer == Layer::Domain {
            graph.declare(module, &scan.bindings);
        }
    }
    for (file, module, layer, scan) in &scanned {
        if *layer == Layer::Domain {
            graph.link(file, module, &scan.targets);
        }
    }
    violations.extend(graph.cycles());

    if violations.is_empty() {
        Ok(())
    } else {
        Err(LintError::Violations(violations.into_iter().collect()))
    }
}
