//! Interface satisfaction.
//!
//! Assignability to an interface is structural, but the emitted check is
//! nominal: a predicate comparing a runtime type tag against the exhaustive
//! list of implementers. The list is computed over every named type in the
//! program, so it is complete no matter which package declares the
//! interface or its implementers.

use gojs_ir::{MethodSig, TypeRef, TypeUniverse};
use rustc_hash::FxHashMap;

use crate::emitter::js_string;
use crate::method_set::{method_set, MethodSet};
use crate::repr::Repr;

/// Computes implementer sets, caching method sets across interfaces.
pub struct InterfaceResolver<'u> {
    universe: &'u TypeUniverse,
    method_sets: FxHashMap<(TypeRef, bool), MethodSet>,
}

impl<'u> InterfaceResolver<'u> {
    pub fn new(universe: &'u TypeUniverse) -> Self {
        InterfaceResolver {
            universe,
            method_sets: FxHashMap::default(),
        }
    }

    fn satisfied_by(&mut self, r: &TypeRef, addressable: bool, methods: &[MethodSig]) -> bool {
        let universe = self.universe;
        self.method_sets
            .entry((r.clone(), addressable))
            .or_insert_with(|| method_set(universe, r, addressable))
            .satisfies(methods)
    }

    /// Runtime tags of every type implementing an interface with `methods`,
    /// deduplicated and in ascending lexical order.
    ///
    /// A struct and its pointer share one tag, so a struct implements when
    /// its pointer method set does. Other named types contribute their
    /// value tag and pointer-box tag separately.
    pub fn implementers(&mut self, methods: &[MethodSig]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        let universe = self.universe;
        for (r, named) in universe.iter() {
            let candidates = match Repr::of_underlying(&named.underlying) {
                Ok(Repr::Object) => vec![(true, r.tag())],
                Ok(Repr::Wrapped | Repr::Sequence | Repr::Dictionary) => {
                    vec![(false, r.tag()), (true, r.pointer_tag())]
                }
                Ok(Repr::Predicate) | Err(_) => continue,
            };
            for (addressable, tag) in candidates {
                if !self.satisfied_by(r, addressable, methods) {
                    continue;
                }
                if let Err(pos) = tags.binary_search(&tag) {
                    tags.insert(pos, tag);
                }
            }
        }
        tracing::debug!(methods = methods.len(), implementers = tags.len(), "resolved implementers");
        tags
    }

    /// Predicate function text for an interface with `methods`.
    pub fn predicate(&mut self, methods: &[MethodSig]) -> String {
        if methods.is_empty() {
            return "function(t) { return true; }".to_string();
        }
        let tags = self.implementers(methods);
        let condition = if tags.is_empty() {
            "false".to_string()
        } else {
            tags.iter()
                .map(|tag| format!("t === {}", js_string(tag)))
                .collect::<Vec<_>>()
                .join(" || ")
        };
        format!("function(t) {{ return {condition}; }}")
    }
}

#[cfg(test)]
mod tests;
