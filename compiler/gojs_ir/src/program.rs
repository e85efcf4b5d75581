//! A fully loaded program: every reachable package plus the type registry.

use rustc_hash::FxHashMap;

use crate::{Package, TypeUniverse};

/// Every package reachable from the entry, with the whole-program
/// [`TypeUniverse`] built from them.
#[derive(Clone, Debug)]
pub struct Program {
    packages: Vec<Package>,
    index: FxHashMap<String, usize>,
    entry: String,
    universe: TypeUniverse,
}

impl Program {
    /// Build a program. Later packages with a duplicate import path are ignored.
    pub fn new(entry: impl Into<String>, packages: Vec<Package>) -> Self {
        let mut index = FxHashMap::default();
        let mut unique = Vec::with_capacity(packages.len());
        for package in packages {
            if index.contains_key(&package.path) {
                continue;
            }
            index.insert(package.path.clone(), unique.len());
            unique.push(package);
        }
        let universe = TypeUniverse::from_packages(&unique);
        Program {
            packages: unique,
            index,
            entry: entry.into(),
            universe,
        }
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.index.get(path).map(|&i| &self.packages[i])
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Import path of the entry package.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn universe(&self) -> &TypeUniverse {
        &self.universe
    }
}
