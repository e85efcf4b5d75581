//! Loading every package a program needs before composition starts.
//!
//! Interface implementer sets and promoted methods are computed over the
//! whole program, so all packages are loaded (and the type universe built)
//! before any module text is emitted.

use std::collections::BTreeMap;

use gojs_ir::{CheckProblem, Package, ProblemKind, Program};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{LowerConfig, LowerError};

/// Importer named for the entry package in diagnostics.
pub const COMMAND_LINE: &str = "command-line-arguments";

/// Why a package could not be loaded.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum LoadFailure {
    #[error("package not found")]
    NotFound,
    /// The package exists but could not be read as a checked package.
    #[error("malformed package: {0}")]
    Malformed(String),
}

/// Source of checked packages, keyed by import path.
pub trait PackageLoader {
    fn load(&mut self, path: &str) -> Result<Package, LoadFailure>;
}

/// In-memory packages, keyed by import path.
impl PackageLoader for BTreeMap<String, Package> {
    fn load(&mut self, path: &str) -> Result<Package, LoadFailure> {
        self.get(path).cloned().ok_or(LoadFailure::NotFound)
    }
}

/// Load `entry` and everything it imports, depth-first.
///
/// Packages are collected in post-order, so each one follows its imports.
/// External packages are skipped. A malformed package is kept as a
/// placeholder carrying a syntax problem, which fails that package alone
/// during composition.
pub fn load_program(
    entry: &str,
    loader: &mut dyn PackageLoader,
    config: &LowerConfig,
) -> Result<Program, LowerError> {
    let mut walk = Walk {
        loader,
        config,
        visited: FxHashSet::default(),
        packages: Vec::new(),
    };
    walk.visit(entry, COMMAND_LINE)?;
    tracing::debug!(entry, packages = walk.packages.len(), "loaded program");
    Ok(Program::new(entry, walk.packages))
}

struct Walk<'l> {
    loader: &'l mut dyn PackageLoader,
    config: &'l LowerConfig,
    visited: FxHashSet<String>,
    packages: Vec<Package>,
}

impl Walk<'_> {
    fn visit(&mut self, path: &str, importer: &str) -> Result<(), LowerError> {
        if self.config.is_external(path) || !self.visited.insert(path.to_string()) {
            return Ok(());
        }
        let package = match self.loader.load(path) {
            Ok(package) => package,
            Err(LoadFailure::NotFound) => {
                return Err(LowerError::UnresolvedImport {
                    path: path.to_string(),
                    importer: importer.to_string(),
                })
            }
            Err(LoadFailure::Malformed(message)) => {
                tracing::debug!(path, %message, "malformed package");
                let name = path.rsplit('/').next().unwrap_or(path);
                let mut placeholder = Package::new(path, name);
                placeholder.problems.push(CheckProblem {
                    kind: ProblemKind::Syntax,
                    message,
                });
                self.packages.push(placeholder);
                return Ok(());
            }
        };
        tracing::trace!(path, imports = package.imports.len(), "loaded package");
        for import in &package.imports {
            self.visit(&import.path, path)?;
        }
        self.packages.push(package);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::PackageBuilder;
    use pretty_assertions::assert_eq;

    fn packages(list: Vec<Package>) -> BTreeMap<String, Package> {
        list.into_iter().map(|p| (p.path.clone(), p)).collect()
    }

    fn paths(program: &Program) -> Vec<&str> {
        program.packages().iter().map(|p| p.path.as_str()).collect()
    }

    #[test]
    fn test_post_order_with_diamond() {
        let mut loader = packages(vec![
            PackageBuilder::new("main").import("a").import("b").build(),
            PackageBuilder::new("a").import("base").build(),
            PackageBuilder::new("b").import("base").import("reflect").build(),
            PackageBuilder::new("base").build(),
        ]);
        let program = load_program("main", &mut loader, &LowerConfig::default())
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(paths(&program), vec!["base", "a", "b", "main"]);
        assert_eq!(program.entry(), "main");
    }

    #[test]
    fn test_missing_import_is_unresolved() {
        let mut loader = packages(vec![PackageBuilder::new("main").import("gone").build()]);
        let err = load_program("main", &mut loader, &LowerConfig::default()).err();
        assert_eq!(
            err,
            Some(LowerError::UnresolvedImport {
                path: "gone".to_string(),
                importer: "main".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_entry_names_command_line() {
        let mut loader = packages(vec![]);
        let err = load_program("main", &mut loader, &LowerConfig::default()).err();
        assert!(matches!(
            err,
            Some(LowerError::UnresolvedImport { ref importer, .. }) if importer == COMMAND_LINE
        ));
    }

    struct Broken;

    impl PackageLoader for Broken {
        fn load(&mut self, path: &str) -> Result<Package, LoadFailure> {
            Err(LoadFailure::Malformed(format!("bad file for {path}")))
        }
    }

    #[test]
    fn test_malformed_package_becomes_placeholder() {
        let program = load_program("x/y", &mut Broken, &LowerConfig::default())
            .unwrap_or_else(|err| panic!("{err}"));
        let package = &program.packages()[0];
        assert_eq!(package.name, "y");
        assert_eq!(
            package.problems,
            vec![CheckProblem {
                kind: ProblemKind::Syntax,
                message: "bad file for x/y".to_string(),
            }]
        );
    }

    #[test]
    fn test_import_cycle_loads_each_package_once() {
        let mut loader = packages(vec![
            PackageBuilder::new("a").import("b").build(),
            PackageBuilder::new("b").import("a").build(),
        ]);
        let program = load_program("a", &mut loader, &LowerConfig::default())
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(paths(&program), vec!["b", "a"]);
    }
}
