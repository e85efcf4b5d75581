//! Lowering configuration.

use std::collections::BTreeMap;

use crate::runtime;

/// Import paths provided by the host environment rather than translated.
pub const DEFAULT_EXTERNAL_PACKAGES: &[&str] = &["reflect", "go/doc"];

/// Configuration for one compilation run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LowerConfig {
    /// Runtime support text emitted before the first module.
    pub prelude: String,
    /// Emit `prelude` at the top of the output.
    pub emit_prelude: bool,
    /// Hand-written text appended to a package's module, keyed by import path.
    pub natives: BTreeMap<String, String>,
    /// Import paths that get a binding but are never loaded or translated.
    pub external_packages: Vec<String>,
}

impl Default for LowerConfig {
    fn default() -> Self {
        LowerConfig {
            prelude: runtime::PRELUDE.to_string(),
            emit_prelude: true,
            natives: BTreeMap::new(),
            external_packages: DEFAULT_EXTERNAL_PACKAGES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl LowerConfig {
    /// Configuration without a prelude (for testing).
    pub fn without_prelude() -> Self {
        LowerConfig {
            emit_prelude: false,
            ..Self::default()
        }
    }

    pub fn is_external(&self, path: &str) -> bool {
        self.external_packages.iter().any(|p| p == path)
    }

    #[must_use]
    pub fn with_natives(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.natives.insert(path.into(), text.into());
        self
    }
}
