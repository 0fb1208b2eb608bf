//! Repo-local lint that keeps the loyalty backend's hexagon intact.
//!
//! The backend is split into `domain` (entities, services, ports),
//! `inbound` (HTTP adapters), and `outbound` (PostgreSQL, the in-memory
//! store, the accrual client, password hashing). This crate parses every
//! source file under those directories and reports:
//!
//! - `domain` code that reaches into an adapter module or an
//!   infrastructure crate
//! - `inbound` code that imports `outbound` modules or persistence and
//!   outbound-client crates
//! - `outbound` code that imports `inbound` modules or the web framework
//!
//! Run it with `cargo run -p architecture-lint` from anywhere in the
//! workspace.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name the backend library is imported under by its own doc tests and
/// binaries.
const BACKEND_CRATE: &str = "loyalty_backend";

/// A single boundary violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Which rule was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// A file could not be parsed or placed in a layer.
    #[error("failed to lint {}: {message}", .file.display())]
    Parse {
        /// Offending file, relative to `backend/src`.
        file: PathBuf,
        /// Parser or classification message.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("architecture boundary violations:\n{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint the backend sources on disk. `backend_dir` is the `backend/`
/// directory at the workspace root.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.dir());
        if dir.is_dir() {
            collect_sources(&src_dir, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint in-memory sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, inbound/, or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(layer.check(&source.file, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

const PERSISTENCE_CRATES: [&str; 5] = [
    "diesel",
    "diesel_async",
    "diesel_migrations",
    "postgres",
    "pg_embedded_setup_unpriv",
];

const WEB_CRATES: [&str; 4] = ["actix", "actix_web", "actix_session", "actix_service"];

const CLIENT_CRATES: [&str; 2] = ["reqwest", "argon2"];

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn of(relative: &Path) -> Option<Self> {
        let first = relative.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    fn forbidden_crates(self) -> BTreeSet<&'static str> {
        let groups: &[&[&str]] = match self {
            Self::Domain => &[&PERSISTENCE_CRATES, &WEB_CRATES, &CLIENT_CRATES],
            Self::Inbound => &[&PERSISTENCE_CRATES, &CLIENT_CRATES],
            Self::Outbound => &[&WEB_CRATES],
        };
        groups.iter().flat_map(|group| group.iter().copied()).collect()
    }

    fn check(self, file: &Path, parsed: &syn::File) -> Vec<Violation> {
        let mut collector = PathCollector::default();
        collector.visit_file(parsed);

        let modules = self.forbidden_modules();
        let crates = self.forbidden_crates();
        let mut messages = BTreeSet::new();
        for segments in &collector.paths {
            if let Some(module) = internal_root(segments).filter(|root| modules.contains(root)) {
                messages.insert(format!(
                    "{} code must not depend on crate::{module}",
                    self.dir()
                ));
            }
            if let Some(name) = external_root(segments).filter(|root| crates.contains(root)) {
                messages.insert(format!(
                    "{} code must not depend on external crate `{name}`",
                    self.dir()
                ));
            }
        }

        messages
            .into_iter()
            .map(|message| Violation {
                file: file.to_path_buf(),
                message,
            })
            .collect()
    }
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// The first module segment a path resolves to inside the backend crate.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if Layer::ALL.iter().any(|layer| layer.dir() == first) {
        return Some(first);
    }
    let start = if is_relative(first) {
        segments.iter().position(|segment| !is_relative(segment))?
    } else if first == BACKEND_CRATE {
        1
    } else {
        return None;
    };
    segments.get(start).map(String::as_str)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    (!is_relative(first) && first != BACKEND_CRATE).then_some(first)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_sources(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(src_root, &path, sources)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }
        let file = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource { file, contents });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
