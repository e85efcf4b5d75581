//! Type descriptors.
//!
//! A [`Type`] is an immutable tree handed over by the checker. Named types
//! are referenced nominally through [`TypeRef`]; their underlying
//! representation and methods live in the program-wide
//! [`TypeUniverse`](crate::TypeUniverse).

use std::fmt;

use crate::{is_exported, BasicKind};

/// Nominal reference to a declared type: its package import path and name.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeRef {
    pub package: String,
    pub name: String,
}

impl TypeRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Runtime tag of the value representation, `"<path>.<Name>"`.
    pub fn tag(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    /// Runtime tag of the pointer box, `"<path>.*<Name>"`.
    pub fn pointer_tag(&self) -> String {
        format!("{}.*{}", self.package, self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// A struct field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub ty: Type,
    /// Embedded (anonymous) field. `name` is then the type's own name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    pub fn embedded(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            embedded: true,
        }
    }
}

/// A function or method signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    pub params: Vec<Type>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub results: Vec<Type>,
    /// The last parameter is `...T`, stored as `[]T`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Type>, results: Vec<Type>) -> Self {
        Signature {
            params,
            results,
            variadic: false,
        }
    }

    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Element type of the variadic parameter, if the signature is variadic.
    pub fn variadic_elem(&self) -> Option<&Type> {
        if !self.variadic {
            return None;
        }
        match self.params.last() {
            Some(Type::Slice(elem)) => Some(elem),
            _ => None,
        }
    }

    fn qualify_methods(&mut self, package: &str) {
        for ty in self.params.iter_mut().chain(self.results.iter_mut()) {
            ty.qualify_methods(package);
        }
    }
}

/// A method name as method sets compare it.
///
/// Exported names match across packages. An unexported name carries the
/// import path of the package that declared it and only matches the same
/// name from that package.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct MethodKey {
    pub package: Option<String>,
    pub name: String,
}

impl MethodKey {
    /// Key of `name` as declared in `package`.
    pub fn new(package: &str, name: &str) -> Self {
        MethodKey {
            package: (!is_exported(name)).then(|| package.to_string()),
            name: name.to_string(),
        }
    }

    /// Key of an exported name.
    pub fn exported(name: &str) -> Self {
        MethodKey {
            package: None,
            name: name.to_string(),
        }
    }
}

/// An interface method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodSig {
    pub name: String,
    /// Declaring package of an unexported name.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub package: Option<String>,
    pub signature: Signature,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        MethodSig {
            name: name.into(),
            package: None,
            signature,
        }
    }

    /// Attribute an unexported name to `package` unless it already has one.
    #[must_use]
    pub fn qualified(mut self, package: &str) -> Self {
        if self.package.is_none() && !is_exported(&self.name) {
            self.package = Some(package.to_string());
        }
        self
    }

    pub fn key(&self) -> MethodKey {
        MethodKey {
            package: if is_exported(&self.name) {
                None
            } else {
                self.package.clone()
            },
            name: self.name.clone(),
        }
    }

    /// Key of this method as seen from `package`, which declares it when
    /// no package is recorded.
    pub fn key_in(&self, package: &str) -> MethodKey {
        match &self.package {
            Some(declared) => MethodKey::new(declared, &self.name),
            None => MethodKey::new(package, &self.name),
        }
    }
}

/// Channel direction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// Structural category of a type descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    Basic,
    Named,
    Struct,
    Array,
    Slice,
    Map,
    Interface,
    Pointer,
    Channel,
    Function,
    /// Multi-value results. Never valid as a declared type.
    Tuple,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Basic => "basic",
            Kind::Named => "named",
            Kind::Struct => "struct",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Interface => "interface",
            Kind::Pointer => "pointer",
            Kind::Channel => "channel",
            Kind::Function => "function",
            Kind::Tuple => "tuple",
        };
        f.write_str(s)
    }
}

/// A resolved type descriptor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Type {
    Basic(BasicKind),
    Named(TypeRef),
    Struct(Vec<Field>),
    Array { elem: Box<Type>, len: u64 },
    Slice(Box<Type>),
    Map { key: Box<Type>, value: Box<Type> },
    Interface(Vec<MethodSig>),
    Pointer(Box<Type>),
    Chan { elem: Box<Type>, dir: ChanDir },
    Func(Box<Signature>),
    Tuple(Vec<Type>),
}

impl Type {
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Named(TypeRef::new(package, name))
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn array(elem: Type, len: u64) -> Self {
        Type::Array {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(elem: Type) -> Self {
        Type::Chan {
            elem: Box::new(elem),
            dir: ChanDir::Both,
        }
    }

    pub fn func(signature: Signature) -> Self {
        Type::Func(Box::new(signature))
    }

    /// Attribute every unexported interface method name inside this type
    /// to `package`, leaving names that already record a package alone.
    pub fn qualify_methods(&mut self, package: &str) {
        match self {
            Type::Basic(_) | Type::Named(_) => {}
            Type::Struct(fields) => {
                for field in fields {
                    field.ty.qualify_methods(package);
                }
            }
            Type::Array { elem, .. }
            | Type::Slice(elem)
            | Type::Pointer(elem)
            | Type::Chan { elem, .. } => elem.qualify_methods(package),
            Type::Map { key, value } => {
                key.qualify_methods(package);
                value.qualify_methods(package);
            }
            Type::Interface(methods) => {
                for m in methods {
                    if m.package.is_none() && !is_exported(&m.name) {
                        m.package = Some(package.to_string());
                    }
                    m.signature.qualify_methods(package);
                }
            }
            Type::Func(sig) => sig.qualify_methods(package),
            Type::Tuple(types) => {
                for ty in types {
                    ty.qualify_methods(package);
                }
            }
        }
    }

    /// The empty interface, `interface{}`.
    pub fn any() -> Self {
        Type::Interface(Vec::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Basic(_) => Kind::Basic,
            Type::Named(_) => Kind::Named,
            Type::Struct(_) => Kind::Struct,
            Type::Array { .. } => Kind::Array,
            Type::Slice(_) => Kind::Slice,
            Type::Map { .. } => Kind::Map,
            Type::Interface(_) => Kind::Interface,
            Type::Pointer(_) => Kind::Pointer,
            Type::Chan { .. } => Kind::Channel,
            Type::Func(_) => Kind::Function,
            Type::Tuple(_) => Kind::Tuple,
        }
    }

    pub fn as_named(&self) -> Option<&TypeRef> {
        match self {
            Type::Named(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_basic(&self) -> Option<BasicKind> {
        match self {
            Type::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Pointer element, if this is a pointer type.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    /// Whether this is a string basic type (typed or untyped).
    pub fn is_string(&self) -> bool {
        self.as_basic().is_some_and(BasicKind::is_string)
    }
}

/// Structural type identity.
///
/// Named types are identical only to themselves. Interfaces compare their
/// method sets regardless of declaration order.
pub fn identical(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Basic(x), Type::Basic(y)) => x == y,
        (Type::Named(x), Type::Named(y)) => x == y,
        (Type::Struct(xs), Type::Struct(ys)) => {
            xs.len() == ys.len()
                && xs.iter().zip(ys).all(|(x, y)| {
                    x.name == y.name && x.embedded == y.embedded && identical(&x.ty, &y.ty)
                })
        }
        (Type::Array { elem: x, len: n }, Type::Array { elem: y, len: m }) => {
            n == m && identical(x, y)
        }
        (Type::Slice(x), Type::Slice(y)) | (Type::Pointer(x), Type::Pointer(y)) => identical(x, y),
        (Type::Map { key: kx, value: vx }, Type::Map { key: ky, value: vy }) => {
            identical(kx, ky) && identical(vx, vy)
        }
        (Type::Chan { elem: x, dir: dx }, Type::Chan { elem: y, dir: dy }) => {
            dx == dy && identical(x, y)
        }
        (Type::Func(x), Type::Func(y)) => identical_signatures(x, y),
        (Type::Interface(xs), Type::Interface(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|x| {
                    ys.iter()
                        .any(|y| x.key() == y.key() && identical_signatures(&x.signature, &y.signature))
                })
        }
        (Type::Tuple(xs), Type::Tuple(ys)) => identical_lists(xs, ys),
        _ => false,
    }
}

/// Signature identity: parameter and result types plus variadic-ness.
pub fn identical_signatures(a: &Signature, b: &Signature) -> bool {
    a.variadic == b.variadic
        && identical_lists(&a.params, &b.params)
        && identical_lists(&a.results, &b.results)
}

fn identical_lists(xs: &[Type], ys: &[Type]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| identical(x, y))
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(kind) => write!(f, "{kind}"),
            Type::Named(r) => write!(f, "{r}"),
            Type::Struct(fields) => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                }
                f.write_str("}")
            }
            Type::Array { elem, len } => write!(f, "[{len}]{elem}"),
            Type::Slice(elem) => write!(f, "[]{elem}"),
            Type::Map { key, value } => write!(f, "map[{key}]{value}"),
            Type::Interface(methods) => {
                f.write_str("interface{")?;
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", m.name)?;
                    write_signature(f, &m.signature)?;
                }
                f.write_str("}")
            }
            Type::Pointer(elem) => write!(f, "*{elem}"),
            Type::Chan { elem, dir } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Type::Func(sig) => {
                f.write_str("func")?;
                write_signature(f, sig)
            }
            Type::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
        }
    }
}

fn write_signature(f: &mut fmt::Formatter<'_>, sig: &Signature) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in sig.params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match param {
            Type::Slice(elem) if sig.variadic && i + 1 == sig.params.len() => {
                write!(f, "...{elem}")?;
            }
            _ => write!(f, "{param}")?,
        }
    }
    f.write_str(")")?;
    match sig.results.as_slice() {
        [] => Ok(()),
        [single] => write!(f, " {single}"),
        many => {
            f.write_str(" (")?;
            write_list(f, many)?;
            f.write_str(")")
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Type]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
