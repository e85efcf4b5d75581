//! Whole-program registry of named types.
//!
//! Built once from every loaded package before any text is emitted, so
//! interface implementer sets and promoted methods see the complete set of
//! named types rather than only those of the package being translated.

use std::collections::BTreeMap;

use crate::{MethodKey, Package, Signature, Type, TypeRef};

/// A method declared on a named type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodDecl {
    pub name: String,
    /// Declaring package of an unexported name.
    pub package: Option<String>,
    pub signature: Signature,
    pub pointer_receiver: bool,
}

impl MethodDecl {
    pub fn key(&self) -> MethodKey {
        MethodKey {
            package: self.package.clone(),
            name: self.name.clone(),
        }
    }
}

/// A declared named type with its methods, in declaration order.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedType {
    pub underlying: Type,
    pub methods: Vec<MethodDecl>,
}

impl NamedType {
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Registry of every named type in the program.
///
/// Keyed by [`TypeRef`] in a `BTreeMap` so iteration is deterministic
/// (import path, then name).
#[derive(Clone, Debug, Default)]
pub struct TypeUniverse {
    types: BTreeMap<TypeRef, NamedType>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the types and methods of every package.
    pub fn from_packages<'a>(packages: impl IntoIterator<Item = &'a Package>) -> Self {
        let mut universe = TypeUniverse::new();
        for package in packages {
            universe.add_package(package);
        }
        universe
    }

    /// Register one package's type declarations and attach its methods.
    ///
    /// Unexported method names, both declared and listed by interfaces, are
    /// attributed to `package`.
    pub fn add_package(&mut self, package: &Package) {
        for decl in &package.types {
            let mut underlying = decl.underlying.clone();
            underlying.qualify_methods(&package.path);
            self.types.insert(
                TypeRef::new(&package.path, &decl.name),
                NamedType {
                    underlying,
                    methods: Vec::new(),
                },
            );
        }
        for func in &package.funcs {
            let Some(receiver) = &func.receiver else {
                continue;
            };
            let key = TypeRef::new(&package.path, &receiver.base);
            if let Some(named) = self.types.get_mut(&key) {
                named.methods.push(MethodDecl {
                    name: func.name.clone(),
                    package: MethodKey::new(&package.path, &func.name).package,
                    signature: func.signature(),
                    pointer_receiver: receiver.pointer,
                });
            }
        }
    }

    pub fn get(&self, r: &TypeRef) -> Option<&NamedType> {
        self.types.get(r)
    }

    pub fn contains(&self, r: &TypeRef) -> bool {
        self.types.contains_key(r)
    }

    /// Underlying type of `ty`: itself unless it is a known named type.
    pub fn underlying<'a>(&'a self, ty: &'a Type) -> &'a Type {
        match ty {
            Type::Named(r) => self.types.get(r).map_or(ty, |named| &named.underlying),
            _ => ty,
        }
    }

    /// Whether `ty` is a named type whose underlying type is a struct.
    pub fn is_named_struct(&self, ty: &Type) -> bool {
        matches!(ty, Type::Named(_)) && matches!(self.underlying(ty), Type::Struct(_))
    }

    /// All named types in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &NamedType)> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
