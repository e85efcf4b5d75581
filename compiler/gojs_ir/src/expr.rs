//! Resolved expressions and statements.
//!
//! The checker delivers every expression with its type and, for constants,
//! its value. Identifiers are already resolved to the object they denote.
//! Function bodies are opaque to declaration lowering; they are only handed
//! to the lowering service.

use std::fmt;

use crate::Type;

/// A compile-time constant value.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(n) => write!(f, "{n}"),
            ConstValue::Float(x) => write!(f, "{x}"),
            ConstValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Predeclared functions the checker resolves specially.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Builtin {
    Append,
    Cap,
    Copy,
    Delete,
    Len,
    Make,
    New,
    Panic,
    Print,
    Println,
    Recover,
}

impl Builtin {
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Append => "append",
            Builtin::Cap => "cap",
            Builtin::Copy => "copy",
            Builtin::Delete => "delete",
            Builtin::Len => "len",
            Builtin::Make => "make",
            Builtin::New => "new",
            Builtin::Panic => "panic",
            Builtin::Print => "print",
            Builtin::Println => "println",
            Builtin::Recover => "recover",
        }
    }
}

/// The object an identifier resolves to.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectRef {
    /// A package-level constant, variable, function, or type.
    Package { package: String, name: String },
    /// A parameter or block-local variable.
    Local(String),
    Builtin(Builtin),
    Nil,
}

impl ObjectRef {
    pub fn package(package: impl Into<String>, name: impl Into<String>) -> Self {
        ObjectRef::Package {
            package: package.into(),
            name: name.into(),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Target-runtime operator text.
    pub const fn js(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Eq => "===",
            BinaryOp::Ne => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    /// `&x`
    Addr,
    /// `*p`
    Deref,
}

/// Expression shapes.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExprKind {
    Ident(ObjectRef),
    Literal(ConstValue),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        /// The last argument is spread with `...`.
        #[cfg_attr(feature = "serde", serde(default))]
        ellipsis: bool,
    },
    Selector {
        base: Box<Expr>,
        name: String,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// Composite literal of `Expr::ty`; elements are positional.
    Composite {
        elements: Vec<Expr>,
    },
    /// Target text produced elsewhere, passed through unchanged.
    Raw(String),
}

/// A typed expression.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    /// Folded value when the expression is constant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub constant: Option<ConstValue>,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Expr {
            kind,
            ty,
            constant: None,
        }
    }

    /// A constant literal.
    pub fn literal(value: ConstValue, ty: Type) -> Self {
        Expr {
            kind: ExprKind::Literal(value.clone()),
            ty,
            constant: Some(value),
        }
    }

    pub fn ident(object: ObjectRef, ty: Type) -> Self {
        Expr::new(ExprKind::Ident(object), ty)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: Type) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn call(func: Expr, args: Vec<Expr>, ty: Type) -> Self {
        Expr::new(
            ExprKind::Call {
                func: Box::new(func),
                args,
                ellipsis: false,
            },
            ty,
        )
    }

    #[must_use]
    pub fn with_constant(mut self, value: ConstValue) -> Self {
        self.constant = Some(value);
        self
    }

    /// Visit every identifier reachable from this expression.
    ///
    /// Function literals are `Raw` text, so their bodies are not visited.
    pub fn for_each_ident(&self, f: &mut impl FnMut(&ObjectRef)) {
        match &self.kind {
            ExprKind::Ident(object) => f(object),
            ExprKind::Literal(_) | ExprKind::Raw(_) => {}
            ExprKind::Binary { left, right, .. } => {
                left.for_each_ident(f);
                right.for_each_ident(f);
            }
            ExprKind::Unary { operand, .. } => operand.for_each_ident(f),
            ExprKind::Call { func, args, .. } => {
                func.for_each_ident(f);
                for arg in args {
                    arg.for_each_ident(f);
                }
            }
            ExprKind::Selector { base, .. } => base.for_each_ident(f),
            ExprKind::Index { base, index } => {
                base.for_each_ident(f);
                index.for_each_ident(f);
            }
            ExprKind::Composite { elements } => {
                for element in elements {
                    element.for_each_ident(f);
                }
            }
        }
    }
}

/// Statements of a function body.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stmt {
    Expr(Expr),
    /// `a, b := x, y`
    Define { names: Vec<String>, values: Vec<Expr> },
    /// `a, b = x, y`
    Assign { targets: Vec<Expr>, values: Vec<Expr> },
    Return(Vec<Expr>),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        #[cfg_attr(feature = "serde", serde(default))]
        otherwise: Vec<Stmt>,
    },
    Raw(String),
}
