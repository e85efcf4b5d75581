//! Filesystem package loader.
//!
//! Checked packages are JSON files. An import path `a/b` resolves to
//! `<root>/a/b/package.json` or `<root>/a/b.json`, trying each root in
//! order: the entry's parent directory first, then every `-I` directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gojs_diagnostic::{Diagnostic, ErrorCode};
use gojs_ir::Package;
use gojs_lower::{LoadFailure, PackageLoader};
use thiserror::Error;

/// Name of the package file inside a package directory.
pub const PACKAGE_FILE: &str = "package.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed package file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} declares package \"{found}\", expected \"{expected}\"", .path.display())]
    PathMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

impl LoadError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            LoadError::Io { .. } => ErrorCode::E5001,
            LoadError::Json { .. } | LoadError::PathMismatch { .. } => ErrorCode::E5002,
        };
        Diagnostic::error(code).with_message(self.to_string())
    }
}

/// Read and parse one package file.
pub fn read_package(path: &Path) -> Result<Package, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// The package file named by an entry argument: the file itself, or
/// `package.json` inside a directory.
pub fn entry_file(entry: &Path) -> PathBuf {
    if entry.is_dir() {
        entry.join(PACKAGE_FILE)
    } else {
        entry.to_path_buf()
    }
}

/// Loads packages from JSON files under a list of roots.
#[derive(Debug)]
pub struct FsLoader {
    roots: Vec<PathBuf>,
    entry: Option<Package>,
}

impl FsLoader {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        FsLoader { roots, entry: None }
    }

    /// Read the entry package and set up roots around it.
    ///
    /// Returns the loader and the entry's import path.
    pub fn for_entry(entry: &Path, include: &[PathBuf]) -> Result<(Self, String), LoadError> {
        let file = entry_file(entry);
        let package = read_package(&file)?;
        let base = if entry.is_dir() {
            entry.parent()
        } else {
            file.parent()
        };
        let mut roots = Vec::with_capacity(include.len() + 1);
        roots.push(match base {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        });
        roots.extend(include.iter().cloned());
        tracing::debug!(path = %package.path, roots = ?roots, "read entry package");
        let path = package.path.clone();
        Ok((
            FsLoader {
                roots,
                entry: Some(package),
            },
            path,
        ))
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First existing package file for `import_path`.
    pub fn locate(&self, import_path: &str) -> Option<PathBuf> {
        self.roots.iter().find_map(|root| {
            let dir = root.join(import_path);
            let candidates = [dir.join(PACKAGE_FILE), root.join(format!("{import_path}.json"))];
            candidates.into_iter().find(|file| file.is_file())
        })
    }

    fn read(&self, import_path: &str, file: &Path) -> Result<Package, LoadError> {
        let package = read_package(file)?;
        if package.path != import_path {
            return Err(LoadError::PathMismatch {
                path: file.to_path_buf(),
                expected: import_path.to_string(),
                found: package.path,
            });
        }
        Ok(package)
    }
}

impl PackageLoader for FsLoader {
    fn load(&mut self, path: &str) -> Result<Package, LoadFailure> {
        if let Some(entry) = self.entry.as_ref().filter(|p| p.path == path) {
            return Ok(entry.clone());
        }
        let Some(file) = self.locate(path) else {
            tracing::debug!(path, "package not found");
            return Err(LoadFailure::NotFound);
        };
        tracing::trace!(path, file = %file.display(), "reading package");
        self.read(path, &file)
            .map_err(|err| LoadFailure::Malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(path: &Path, package: &Package) {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap_or_else(|e| panic!("{e}"));
        }
        let text = serde_json::to_string(package).unwrap_or_else(|e| panic!("{e}"));
        fs::write(path, text).unwrap_or_else(|e| panic!("{e}"));
    }

    #[test]
    fn test_resolves_directory_and_file_forms() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let root = dir.path();
        write(&root.join("lib/a/package.json"), &Package::new("lib/a", "a"));
        write(&root.join("lib/b.json"), &Package::new("lib/b", "b"));

        let mut loader = FsLoader::new(vec![root.to_path_buf()]);
        assert_eq!(loader.load("lib/a").map(|p| p.name), Ok("a".to_string()));
        assert_eq!(loader.load("lib/b").map(|p| p.name), Ok("b".to_string()));
        assert_eq!(loader.load("lib/c"), Err(LoadFailure::NotFound));
    }

    #[test]
    fn test_later_roots_are_searched() {
        let first = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let second = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        write(&second.path().join("util.json"), &Package::new("util", "util"));

        let mut loader = FsLoader::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert!(loader.load("util").is_ok());
    }

    #[test]
    fn test_bad_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap_or_else(|e| panic!("{e}"));
        let mut loader = FsLoader::new(vec![dir.path().to_path_buf()]);
        assert!(matches!(loader.load("bad"), Err(LoadFailure::Malformed(_))));
    }

    #[test]
    fn test_declared_path_must_match() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        write(&dir.path().join("x.json"), &Package::new("y", "y"));
        let mut loader = FsLoader::new(vec![dir.path().to_path_buf()]);
        let Err(LoadFailure::Malformed(message)) = loader.load("x") else {
            panic!("expected a malformed package");
        };
        assert!(message.contains("declares package \"y\", expected \"x\""));
    }

    #[test]
    fn test_entry_directory_sets_parent_root() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        write(&dir.path().join("app/package.json"), &Package::new("app", "app"));
        let (mut loader, path) = FsLoader::for_entry(&dir.path().join("app"), &[])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(path, "app");
        assert_eq!(loader.roots(), &[dir.path().to_path_buf()]);
        assert!(loader.load("app").is_ok());
    }
}
