//! Method sets, including methods promoted through embedded fields.
//!
//! Lookup is breadth-first by embedding depth: a name found at a shallower
//! depth (a declared method, a field, or an earlier promotion) shadows the
//! same name deeper down. A method name promoted more than once at the
//! shallowest depth it appears is ambiguous and excluded from the set; a
//! method meeting a field of the same name at that depth is excluded too,
//! but only a selector that uses it is an error.
//!
//! Names are compared as [`MethodKey`]s, so unexported names from
//! different packages never meet.
//!
//! Embedded value fields are addressable whenever the outer value is, so the
//! pointer method set of a struct also promotes pointer-receiver methods of
//! its embedded value fields.

use gojs_ir::{
    identical_signatures, MethodKey, MethodSig, Signature, Type, TypeRef, TypeUniverse,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Where a method in a set comes from.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum MethodSource {
    /// Declared with a receiver of the named type `owner`.
    Declared {
        owner: TypeRef,
        pointer_receiver: bool,
    },
    /// Listed by an interface type; dispatched through the held value.
    Interface,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodEntry {
    pub name: String,
    /// Declaring package of an unexported name.
    pub package: Option<String>,
    pub signature: Signature,
    /// Embedded field names from the outer type down to the provider;
    /// empty for the type's own methods.
    pub path: SmallVec<[String; 2]>,
    /// Declared type of the outer struct's field at `path[0]`.
    pub via: Option<Type>,
    pub source: MethodSource,
}

impl MethodEntry {
    pub fn key(&self) -> MethodKey {
        MethodKey {
            package: self.package.clone(),
            name: self.name.clone(),
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_promoted(&self) -> bool {
        !self.path.is_empty()
    }

    /// Name of the outer struct's embedded field this method arrives through.
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn pointer_receiver(&self) -> bool {
        matches!(
            self.source,
            MethodSource::Declared {
                pointer_receiver: true,
                ..
            }
        )
    }
}

/// A name promoted by more than one embedded field at the same depth.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ambiguity {
    pub name: String,
    /// Dotted embedded-field paths that provide the name.
    pub fields: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MethodSet {
    entries: Vec<MethodEntry>,
    index: FxHashMap<MethodKey, usize>,
    ambiguous: Vec<Ambiguity>,
}

impl MethodSet {
    fn push(&mut self, entry: MethodEntry) {
        self.index.insert(entry.key(), self.entries.len());
        self.entries.push(entry);
    }

    pub fn get(&self, key: &MethodKey) -> Option<&MethodEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entry for an exported method name.
    pub fn lookup(&self, name: &str) -> Option<&MethodEntry> {
        self.get(&MethodKey::exported(name))
    }

    /// Entries in discovery order: own methods, then promoted methods by
    /// depth and field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodEntry> {
        self.entries.iter()
    }

    pub fn promoted(&self) -> impl Iterator<Item = &MethodEntry> {
        self.entries.iter().filter(|e| e.is_promoted())
    }

    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguous
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every interface method is present with an identical signature.
    ///
    /// Unexported interface methods must carry their declaring package and
    /// only match methods declared in that package.
    pub fn satisfies(&self, methods: &[MethodSig]) -> bool {
        methods.iter().all(|m| {
            self.get(&m.key())
                .is_some_and(|entry| identical_signatures(&entry.signature, &m.signature))
        })
    }
}

/// An embedded field queued for the next depth.
struct Embedded {
    path: SmallVec<[String; 2]>,
    via: Type,
    ty: Type,
    addressable: bool,
}

/// Method set of the named type `r`, or of `*r` when `addressable`.
pub fn method_set(universe: &TypeUniverse, r: &TypeRef, addressable: bool) -> MethodSet {
    let mut set = MethodSet::default();
    let Some(named) = universe.get(r) else {
        return set;
    };

    let mut blocked: FxHashSet<MethodKey> = FxHashSet::default();
    for m in &named.methods {
        blocked.insert(m.key());
        if addressable || !m.pointer_receiver {
            set.push(MethodEntry {
                name: m.name.clone(),
                package: m.package.clone(),
                signature: m.signature.clone(),
                path: SmallVec::new(),
                via: None,
                source: MethodSource::Declared {
                    owner: r.clone(),
                    pointer_receiver: m.pointer_receiver,
                },
            });
        }
    }

    let mut current = Vec::new();
    match &named.underlying {
        Type::Interface(methods) => {
            for m in methods {
                let key = m.key_in(&r.package);
                if blocked.insert(key.clone()) {
                    set.push(MethodEntry {
                        name: m.name.clone(),
                        package: key.package,
                        signature: m.signature.clone(),
                        path: SmallVec::new(),
                        via: None,
                        source: MethodSource::Interface,
                    });
                }
            }
        }
        Type::Struct(fields) => {
            for field in fields {
                blocked.insert(MethodKey::new(&r.package, &field.name));
                if field.embedded {
                    let mut path = SmallVec::new();
                    path.push(field.name.clone());
                    current.push(Embedded {
                        path,
                        via: field.ty.clone(),
                        ty: field.ty.clone(),
                        addressable,
                    });
                }
            }
        }
        _ => {}
    }

    let mut seen: FxHashSet<TypeRef> = FxHashSet::default();
    seen.insert(r.clone());

    while !current.is_empty() {
        let mut next = Vec::new();
        let mut level_types = Vec::new();
        // Name -> candidates found at this depth, in discovery order.
        let mut order: Vec<MethodKey> = Vec::new();
        let mut found: FxHashMap<MethodKey, Vec<MethodEntry>> = FxHashMap::default();
        let mut field_names: FxHashSet<MethodKey> = FxHashSet::default();

        let mut add = |entry: MethodEntry| {
            let key = entry.key();
            let slot = found.entry(key.clone()).or_default();
            if slot.is_empty() {
                order.push(key);
            }
            slot.push(entry);
        };

        for embedded in current {
            let (base, through_pointer) = match &embedded.ty {
                Type::Pointer(inner) => (inner.as_ref(), true),
                other => (other, false),
            };
            let Type::Named(tr) = base else {
                continue;
            };
            if seen.contains(tr) {
                continue;
            }
            level_types.push(tr.clone());
            let Some(inner) = universe.get(tr) else {
                continue;
            };
            let addressable = through_pointer || embedded.addressable;

            for m in &inner.methods {
                if addressable || !m.pointer_receiver {
                    add(MethodEntry {
                        name: m.name.clone(),
                        package: m.package.clone(),
                        signature: m.signature.clone(),
                        path: embedded.path.clone(),
                        via: Some(embedded.via.clone()),
                        source: MethodSource::Declared {
                            owner: tr.clone(),
                            pointer_receiver: m.pointer_receiver,
                        },
                    });
                }
            }
            match &inner.underlying {
                Type::Interface(methods) => {
                    for m in methods {
                        add(MethodEntry {
                            name: m.name.clone(),
                            package: m.key_in(&tr.package).package,
                            signature: m.signature.clone(),
                            path: embedded.path.clone(),
                            via: Some(embedded.via.clone()),
                            source: MethodSource::Interface,
                        });
                    }
                }
                Type::Struct(fields) => {
                    for field in fields {
                        field_names.insert(MethodKey::new(&tr.package, &field.name));
                        if field.embedded {
                            let mut path = embedded.path.clone();
                            path.push(field.name.clone());
                            next.push(Embedded {
                                path,
                                via: embedded.via.clone(),
                                ty: field.ty.clone(),
                                addressable,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        for key in order {
            if blocked.contains(&key) {
                continue;
            }
            let mut candidates = found.remove(&key).unwrap_or_default();
            if candidates.len() > 1 {
                set.ambiguous.push(Ambiguity {
                    name: key.name.clone(),
                    fields: candidates.iter().map(|c| c.path.join(".")).collect(),
                });
            } else if !field_names.contains(&key) {
                if let Some(entry) = candidates.pop() {
                    set.push(entry);
                }
            }
            blocked.insert(key);
        }
        blocked.extend(field_names);
        seen.extend(level_types);
        current = next;
    }

    set
}
