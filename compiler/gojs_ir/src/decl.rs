//! Package-level declarations of one checked package.

use crate::{Expr, Signature, Stmt, Type};

/// Whether an identifier is exported: its first character is an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Blank identifier `_`.
pub fn is_blank(name: &str) -> bool {
    name == "_"
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub path: String,
    /// Package name of the imported package.
    pub name: String,
}

/// A declared named type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDecl {
    pub name: String,
    pub underlying: Type,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receiver {
    /// Receiver identifier; `None` when unnamed or `_`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Name of the receiver's base type in the declaring package.
    pub base: String,
    /// `func (r *T)` rather than `func (r T)`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pointer: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: Some(name.into()),
            ty,
        }
    }
}

/// A function or method declaration.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub receiver: Option<Receiver>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<Param>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub results: Vec<Type>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variadic: bool,
    /// `None` for a declaration without a body, implemented natively.
    #[cfg_attr(feature = "serde", serde(default))]
    pub body: Option<Vec<Stmt>>,
}

impl FuncDecl {
    pub fn signature(&self) -> Signature {
        Signature {
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
            results: self.results.clone(),
            variadic: self.variadic,
        }
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    Const,
    Var,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueName {
    pub name: String,
    pub ty: Type,
}

impl ValueName {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        ValueName {
            name: name.into(),
            ty,
        }
    }
}

/// One `const`/`var` spec line: `var a, b T = x, y`.
///
/// `values` is empty (zero-initialized), one per name, or a single
/// multi-value expression shared by all names.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSpec {
    pub kind: ValueKind,
    pub names: Vec<ValueName>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<Expr>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProblemKind {
    Syntax,
    Type,
}

/// A problem the parser or checker reported for this package.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckProblem {
    pub kind: ProblemKind,
    pub message: String,
}

/// A checked package.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub path: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub imports: Vec<Import>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub types: Vec<TypeDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub funcs: Vec<FuncDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<ValueSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub problems: Vec<CheckProblem>,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Package {
            path: path.into(),
            name: name.into(),
            ..Package::default()
        }
    }

    /// Whether this package declares a top-level function `name`.
    pub fn declares_func(&self, name: &str) -> bool {
        self.funcs
            .iter()
            .any(|f| f.receiver.is_none() && f.name == name)
    }

    /// Methods declared on the type named `base`, in source order.
    pub fn methods_of<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a FuncDecl> + 'a {
        self.funcs
            .iter()
            .filter(move |f| f.receiver.as_ref().is_some_and(|r| r.base == base))
    }

    /// Top-level functions, in source order.
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.funcs.iter().filter(|f| f.receiver.is_none())
    }

    /// Every package-level name declared here, in no particular order.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        let types = self.types.iter().map(|t| t.name.as_str());
        let funcs = self.functions().map(|f| f.name.as_str());
        let values = self
            .values
            .iter()
            .flat_map(|spec| spec.names.iter().map(|n| n.name.as_str()));
        types.chain(funcs).chain(values)
    }
}
