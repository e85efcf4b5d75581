//! Per-package identifier allocation.
//!
//! Generated code shares one JavaScript scope per package module, so every
//! binding the compiler introduces has to avoid the target language's
//! reserved words, the runtime's global names, and every name handed out
//! before it.

use rustc_hash::FxHashSet;

/// Names no package-level binding or renamed local may take.
pub const RESERVED: &[&str] = &[
    // Runtime-sensitive words and runtime library constructors.
    "class",
    "delete",
    "eval",
    "export",
    "false",
    "implements",
    "in",
    "new",
    "static",
    "this",
    "true",
    "try",
    "packages",
    "Array",
    "Boolean",
    "Channel",
    "Float",
    "Integer",
    "Slice",
    "String",
    // Remaining ECMAScript reserved words.
    "await",
    "break",
    "case",
    "catch",
    "const",
    "continue",
    "debugger",
    "default",
    "do",
    "else",
    "enum",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "instanceof",
    "interface",
    "let",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "super",
    "switch",
    "throw",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    "arguments",
    "undefined",
    "NaN",
    "Infinity",
    // Runtime helpers and host globals the prelude relies on.
    "Complex",
    "Interface",
    "Function",
    "Object",
    "Error",
    "Math",
    "GoError",
    "Go$Map",
    "Go$Pointer",
    "Go$clear",
    "Go$fill",
    "Go$append",
    "Go$len",
    "Go$print",
    "Go$println",
    "Go$panic",
    "Go$stringToSlice",
    "_idCounter",
    "_Pointer",
    "Int8Array",
    "Uint8Array",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
];

/// Whether `name` is one of the [`RESERVED`] names.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Hands out identifiers that never repeat and never hit a reserved name.
///
/// One allocator lives for exactly one package's composition.
#[derive(Clone, Debug)]
pub struct NameAllocator {
    used: FxHashSet<String>,
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameAllocator {
    /// Create an allocator seeded with the [`RESERVED`] names.
    pub fn new() -> Self {
        NameAllocator {
            used: RESERVED.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Allocate `prefix` itself if free, otherwise `prefix1`, `prefix2`, ...
    pub fn allocate(&mut self, prefix: &str) -> String {
        let mut n = 0u32;
        loop {
            let name = if n == 0 {
                prefix.to_string()
            } else {
                format!("{prefix}{n}")
            };
            if !self.used.contains(&name) {
                self.used.insert(name.clone());
                return name;
            }
            n += 1;
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}
