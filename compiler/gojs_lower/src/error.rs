//! Lowering errors.
//!
//! Every error knows how far it reaches: package-scoped errors abort the
//! package being composed while already composed packages stay valid;
//! run-scoped errors abort the whole run.

use gojs_diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

/// How much of the run an error aborts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorScope {
    Package,
    Run,
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum LowerError {
    /// Malformed input for a package.
    #[error("syntax error: {message}")]
    Syntax { package: String, message: String },

    /// A problem reported by the type checker.
    #[error("{message}")]
    TypeCheck { package: String, message: String },

    #[error("cannot find package \"{path}\" (imported by {importer})")]
    UnresolvedImport { path: String, importer: String },

    #[error("import cycle not allowed: {}", .cycle.join(" -> "))]
    ImportCycle { cycle: Vec<String> },

    /// A type or declaration shape that lowering does not know.
    #[error("unsupported {what} in package {package}: {detail}")]
    UnsupportedConstruct {
        package: String,
        what: String,
        detail: String,
    },

    #[error("initialization cycle in package {package}: {}", .cycle.join(" refers to "))]
    InitializerCycle { package: String, cycle: Vec<String> },

    #[error(
        "ambiguous selector {ty}.{method}: promoted by embedded fields {}",
        .fields.join(" and ")
    )]
    AmbiguousSelector {
        package: String,
        ty: String,
        method: String,
        fields: Vec<String>,
    },
}

impl LowerError {
    pub fn unsupported(
        package: impl Into<String>,
        what: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        LowerError::UnsupportedConstruct {
            package: package.into(),
            what: what.into(),
            detail: detail.into(),
        }
    }

    pub fn scope(&self) -> ErrorScope {
        match self {
            LowerError::Syntax { .. }
            | LowerError::TypeCheck { .. }
            | LowerError::AmbiguousSelector { .. } => ErrorScope::Package,
            LowerError::UnresolvedImport { .. }
            | LowerError::ImportCycle { .. }
            | LowerError::UnsupportedConstruct { .. }
            | LowerError::InitializerCycle { .. } => ErrorScope::Run,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LowerError::Syntax { .. } => ErrorCode::E1001,
            LowerError::TypeCheck { .. } => ErrorCode::E2001,
            LowerError::UnresolvedImport { .. } => ErrorCode::E3001,
            LowerError::ImportCycle { .. } => ErrorCode::E3002,
            LowerError::InitializerCycle { .. } => ErrorCode::E4001,
            LowerError::AmbiguousSelector { .. } => ErrorCode::E4002,
            LowerError::UnsupportedConstruct { .. } => ErrorCode::E9001,
        }
    }

    /// Import path of the package the error belongs to, if it has one.
    pub fn package(&self) -> Option<&str> {
        match self {
            LowerError::Syntax { package, .. }
            | LowerError::TypeCheck { package, .. }
            | LowerError::UnsupportedConstruct { package, .. }
            | LowerError::InitializerCycle { package, .. }
            | LowerError::AmbiguousSelector { package, .. } => Some(package),
            LowerError::UnresolvedImport { importer, .. } => Some(importer),
            LowerError::ImportCycle { .. } => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.to_string());
        if let Some(package) = self.package() {
            diag = diag.in_package(package);
        }
        match self {
            LowerError::UnsupportedConstruct { .. } => diag.with_note(
                "the checked input uses a construct this compiler version does not lower",
            ),
            LowerError::AmbiguousSelector { method, .. } => diag.with_note(format!(
                "declare `{method}` on the outer type to select one explicitly"
            )),
            _ => diag,
        }
    }
}

impl From<&LowerError> for Diagnostic {
    fn from(err: &LowerError) -> Self {
        err.to_diagnostic()
    }
}
