//! Gojs Lower - declaration lowering for the gojs compiler.
//!
//! Takes type-checked packages and emits one self-registering JavaScript
//! module per package, in import order.
//!
//! # Architecture
//!
//! - `load_program`: walks the import graph through a [`PackageLoader`]
//! - `CompilationContext`: composes each package once, after its imports
//! - `PackageComposer`: the module layout of a single package
//! - `compile_type` / `compile_methods` / `forward_embedded`: type
//!   representations, receiver dispatch, promoted methods
//! - `emit_globals`: dependency-ordered constants and variables
//! - [`Lowering`]: expression and statement lowering, swappable
//!
//! Package-scoped failures leave the rest of the program intact; run-scoped
//! failures abort with no output (see [`ErrorScope`]).

mod compose;
mod config;
mod context;
pub mod embed;
pub mod emitter;
mod error;
pub mod globals;
pub mod interfaces;
mod load;
pub mod lowering;
pub mod method_set;
pub mod methods;
pub mod names;
pub mod repr;
pub mod runtime;
mod stack;
pub mod types;
pub mod variadic;
pub mod zero;

#[cfg(test)]
mod test_helpers;

pub use compose::{compile, compile_with, CompilationContext, CompileOutput, PackageComposer};
pub use config::{LowerConfig, DEFAULT_EXTERNAL_PACKAGES};
pub use context::PackageCx;
pub use error::{ErrorScope, LowerError};
pub use interfaces::InterfaceResolver;
pub use load::{load_program, LoadFailure, PackageLoader, COMMAND_LINE};
pub use lowering::{BasicLowering, Lowering};
pub use method_set::{method_set, MethodSet};
pub use methods::MethodTable;
pub use names::NameAllocator;
pub use repr::Repr;
