//! Checked-tree input for the gojs compiler.
//!
//! Everything here is produced by the parsing and type-checking front end
//! and consumed read-only by declaration lowering:
//!
//! - [`Type`] descriptors with nominal [`TypeRef`]s for named types
//! - [`Package`] declarations: types, functions and methods, globals
//! - resolved [`Expr`]essions and [`Stmt`]atements
//! - the whole-program [`TypeUniverse`] and the [`Program`] that owns it
//!
//! With the `serde` feature, packages can be read from and written to disk.

mod basic;
mod decl;
mod expr;
mod program;
mod types;
mod universe;

pub use basic::{BasicInfo, BasicKind};
pub use decl::{
    is_blank, is_exported, CheckProblem, FuncDecl, Import, Package, Param, ProblemKind,
    Receiver, TypeDecl, ValueKind, ValueName, ValueSpec,
};
pub use expr::{BinaryOp, Builtin, ConstValue, Expr, ExprKind, ObjectRef, Stmt, UnaryOp};
pub use program::Program;
pub use types::{
    identical, identical_signatures, ChanDir, Field, Kind, MethodKey, MethodSig, Signature, Type,
    TypeRef,
};
pub use universe::{MethodDecl, NamedType, TypeUniverse};
