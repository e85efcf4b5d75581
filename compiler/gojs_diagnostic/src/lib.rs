//! Diagnostic system for the gojs compiler.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - The package the problem was found in
//! - Notes with context
//!
//! Diagnostics flow through a [`DiagnosticQueue`], which drops exact
//! duplicates, and are rendered by a [`DiagnosticEmitter`].

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
