//! Expression and statement lowering.
//!
//! Declaration lowering treats function bodies and initializers as opaque:
//! it hands them to a [`Lowering`] service together with the type the
//! result is stored into. [`BasicLowering`] covers the resolved expression
//! and statement forms of the checked tree.

use gojs_ir::{
    is_blank, Builtin, ConstValue, Expr, ExprKind, ObjectRef, Stmt, Type, UnaryOp,
};

use crate::context::PackageCx;
use crate::emitter::js_string;
use crate::repr::{list_composite, pointer_box, Repr};
use crate::runtime::{APPEND, FILL, LEN, PANIC, POINTER, PRINT, PRINTLN, SLICE};
use crate::stack::ensure_sufficient_stack;
use crate::variadic::{pack_arguments, VariadicParam};
use crate::zero::{array_zero, zero_value};
use crate::LowerError;

/// Lowers expressions and statement lists to target text.
pub trait Lowering {
    /// Lower `expr`. `target` is the type of the destination the value is
    /// stored or passed into, when there is one.
    fn expr(
        &self,
        cx: &mut PackageCx<'_>,
        expr: &Expr,
        target: Option<&Type>,
    ) -> Result<String, LowerError>;

    /// Lower a statement list into the context's output at the current
    /// indentation.
    fn body(&self, cx: &mut PackageCx<'_>, stmts: &[Stmt]) -> Result<(), LowerError>;
}

/// Lowering for the expression and statement forms of the checked tree.
#[derive(Copy, Clone, Debug, Default)]
pub struct BasicLowering;

impl Lowering for BasicLowering {
    fn expr(
        &self,
        cx: &mut PackageCx<'_>,
        expr: &Expr,
        target: Option<&Type>,
    ) -> Result<String, LowerError> {
        ensure_sufficient_stack(|| {
            let text = match &expr.constant {
                Some(value) => constant(value),
                None => self.lower_kind(cx, expr)?,
            };
            convert(cx, text, &expr.ty, target)
        })
    }

    fn body(&self, cx: &mut PackageCx<'_>, stmts: &[Stmt]) -> Result<(), LowerError> {
        for stmt in stmts {
            ensure_sufficient_stack(|| self.stmt(cx, stmt))?;
        }
        Ok(())
    }
}

/// Text of a folded constant.
pub fn constant(value: &ConstValue) -> String {
    match value {
        ConstValue::Bool(b) => b.to_string(),
        ConstValue::Int(n) => n.to_string(),
        ConstValue::Float(f) => format!("{f:?}"),
        ConstValue::Str(s) => js_string(s),
    }
}

/// Wrap a raw value of a wrapped named type when it flows into an
/// interface, so the held value carries its type tag and methods.
fn convert(
    cx: &PackageCx<'_>,
    text: String,
    from: &Type,
    target: Option<&Type>,
) -> Result<String, LowerError> {
    let universe = cx.universe();
    let Some(target) = target else {
        return Ok(text);
    };
    if !matches!(universe.underlying(target), Type::Interface(_)) {
        return Ok(text);
    }
    match (from, Repr::of_named(universe, from)) {
        (Type::Named(r), Some(Repr::Wrapped)) => Ok(format!("new {}({text})", cx.type_name(r)?)),
        _ => Ok(text),
    }
}

fn is_container(cx: &PackageCx<'_>, ty: &Type) -> bool {
    matches!(
        cx.universe().underlying(ty),
        Type::Slice(_) | Type::Map { .. }
    )
}

/// Whether `ty` is a pointer whose target shares identity with the pointer.
fn points_to_object(cx: &PackageCx<'_>, ty: &Type) -> bool {
    ty.pointee()
        .is_some_and(|inner| matches!(cx.universe().underlying(inner), Type::Struct(_)))
}

/// Box constructor for pointers to values of `ty`.
fn box_constructor(cx: &PackageCx<'_>, ty: &Type) -> Result<String, LowerError> {
    match (ty, Repr::of_named(cx.universe(), ty)) {
        (Type::Named(r), Some(repr)) if repr.has_pointer_box() => {
            Ok(format!("{}._Pointer", cx.type_name(r)?))
        }
        _ => Ok(POINTER.to_string()),
    }
}

impl BasicLowering {
    fn lower_kind(&self, cx: &mut PackageCx<'_>, expr: &Expr) -> Result<String, LowerError> {
        match &expr.kind {
            ExprKind::Ident(object) => cx.object(object),
            ExprKind::Literal(value) => Ok(constant(value)),
            ExprKind::Binary { op, left, right } => {
                let left = self.expr(cx, left, None)?;
                let right = self.expr(cx, right, None)?;
                Ok(format!("({left} {} {right})", op.js()))
            }
            ExprKind::Unary { op, operand } => self.unary(cx, *op, operand),
            ExprKind::Call {
                func,
                args,
                ellipsis,
            } => self.call(cx, func, args, *ellipsis),
            ExprKind::Selector { base, name } => {
                Ok(format!("{}.{name}", self.expr(cx, base, None)?))
            }
            ExprKind::Index { base, index } => self.index(cx, base, index),
            ExprKind::Composite { elements } => self.composite(cx, &expr.ty, elements),
            ExprKind::Raw(text) => Ok(text.clone()),
        }
    }

    fn unary(
        &self,
        cx: &mut PackageCx<'_>,
        op: UnaryOp,
        operand: &Expr,
    ) -> Result<String, LowerError> {
        match op {
            UnaryOp::Neg => Ok(format!("(-{})", self.expr(cx, operand, None)?)),
            UnaryOp::Not => Ok(format!("(!{})", self.expr(cx, operand, None)?)),
            UnaryOp::BitNot => Ok(format!("(~{})", self.expr(cx, operand, None)?)),
            UnaryOp::Addr => self.address_of(cx, operand),
            UnaryOp::Deref => {
                let pointer = self.expr(cx, operand, None)?;
                if points_to_object(cx, &operand.ty) {
                    Ok(pointer)
                } else {
                    Ok(format!("{pointer}.get()"))
                }
            }
        }
    }

    /// `&x`: struct values are their own pointer; everything else is boxed
    /// over its location.
    fn address_of(&self, cx: &mut PackageCx<'_>, operand: &Expr) -> Result<String, LowerError> {
        if matches!(cx.universe().underlying(&operand.ty), Type::Struct(_)) {
            return self.expr(cx, operand, None);
        }
        let ctor = box_constructor(cx, &operand.ty)?;
        let (get, set) = self.location(cx, operand)?;
        Ok(pointer_box(&ctor, &get, |v| set(v)))
    }

    /// Getter text and setter builder for an assignable expression.
    #[allow(clippy::type_complexity)]
    fn location(
        &self,
        cx: &mut PackageCx<'_>,
        place: &Expr,
    ) -> Result<(String, Box<dyn Fn(&str) -> String>), LowerError> {
        match &place.kind {
            ExprKind::Index { base, index } if is_container(cx, &base.ty) => {
                let base = self.expr(cx, base, None)?;
                let index = self.expr(cx, index, None)?;
                let get = format!("{base}.get({index})");
                Ok((get, Box::new(move |v: &str| format!("{base}.set({index}, {v})"))))
            }
            ExprKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } if !points_to_object(cx, &operand.ty) => {
                let pointer = self.expr(cx, operand, None)?;
                let get = format!("{pointer}.get()");
                Ok((get, Box::new(move |v: &str| format!("{pointer}.set({v})"))))
            }
            _ => {
                let text = self.expr(cx, place, None)?;
                Ok((text.clone(), Box::new(move |v: &str| format!("{text} = {v}"))))
            }
        }
    }

    fn index(
        &self,
        cx: &mut PackageCx<'_>,
        base: &Expr,
        index: &Expr,
    ) -> Result<String, LowerError> {
        let universe = cx.universe();
        let container = self.expr(cx, base, None)?;
        let key = self.expr(cx, index, None)?;
        match universe.underlying(&base.ty) {
            Type::Slice(_) => Ok(format!("{container}.get({key})")),
            Type::Map { value, .. } => {
                let zero = zero_value(cx, value)?;
                Ok(format!("{container}.get({key}, {zero})"))
            }
            ty if ty.is_string() => Ok(format!("{container}.charCodeAt({key})")),
            _ => Ok(format!("{container}[{key}]")),
        }
    }

    fn composite(
        &self,
        cx: &mut PackageCx<'_>,
        ty: &Type,
        elements: &[Expr],
    ) -> Result<String, LowerError> {
        let universe = cx.universe();
        match universe.underlying(ty) {
            Type::Struct(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                for (i, field) in fields.iter().enumerate() {
                    values.push(match elements.get(i) {
                        Some(element) => self.expr(cx, element, Some(&field.ty))?,
                        None => zero_value(cx, &field.ty)?,
                    });
                }
                match ty {
                    Type::Named(r) => Ok(format!("new {}({})", cx.type_name(r)?, values.join(", "))),
                    _ => {
                        let entries: Vec<String> = fields
                            .iter()
                            .zip(&values)
                            .map(|(field, value)| format!("{}: {value}", field.name))
                            .collect();
                        Ok(format!("{{ {} }}", entries.join(", ")))
                    }
                }
            }
            Type::Slice(elem) => {
                let items = self.elements(cx, elem, elements)?;
                let ctor = match ty {
                    Type::Named(r) => cx.type_name(r)?,
                    _ => SLICE.to_string(),
                };
                Ok(format!("new {ctor}({})", list_composite(universe, elem, &items)))
            }
            Type::Array { elem, len } => {
                let items = self.elements(cx, elem, elements)?;
                if u64::try_from(items.len()).is_ok_and(|n| n == *len) {
                    return Ok(list_composite(universe, elem, &items));
                }
                // Only the listed elements are written; the rest stay zero.
                let buffer = array_zero(cx, elem, *len)?;
                if items.is_empty() {
                    Ok(buffer)
                } else {
                    Ok(format!("{FILL}({buffer}, [{}])", items.join(", ")))
                }
            }
            other => Err(LowerError::unsupported(
                cx.path(),
                "composite literal",
                format!("literal of kind {}", other.kind()),
            )),
        }
    }

    fn elements(
        &self,
        cx: &mut PackageCx<'_>,
        elem: &Type,
        elements: &[Expr],
    ) -> Result<Vec<String>, LowerError> {
        elements
            .iter()
            .map(|element| self.expr(cx, element, Some(elem)))
            .collect()
    }

    fn call(
        &self,
        cx: &mut PackageCx<'_>,
        func: &Expr,
        args: &[Expr],
        ellipsis: bool,
    ) -> Result<String, LowerError> {
        if let ExprKind::Ident(ObjectRef::Builtin(builtin)) = &func.kind {
            return self.builtin_call(cx, *builtin, args, ellipsis);
        }
        let universe = cx.universe();
        let signature = match universe.underlying(&func.ty) {
            Type::Func(signature) => Some(signature.as_ref()),
            _ => None,
        };
        let callee = match &func.kind {
            ExprKind::Selector { base, name } => self.method_callee(cx, base, name)?,
            _ => self.expr(cx, func, None)?,
        };
        let variadic = signature.and_then(VariadicParam::of_signature);
        let args = self.arguments(cx, args, ellipsis, variadic.as_ref(), |i| {
            signature.and_then(|s| s.params.get(i))
        })?;
        Ok(format!("{callee}({})", args.join(", ")))
    }

    /// Callee text for `base.name(...)`.
    ///
    /// Raw wrapped values get their constructor (or, for a pointer method,
    /// a box over their location) so the method's prototype is reachable.
    fn method_callee(
        &self,
        cx: &mut PackageCx<'_>,
        base: &Expr,
        name: &str,
    ) -> Result<String, LowerError> {
        let universe = cx.universe();
        let (holder, through_pointer) = match &base.ty {
            Type::Pointer(inner) => (inner.as_ref(), true),
            other => (other, false),
        };
        let declared = holder
            .as_named()
            .and_then(|r| Some((r, universe.get(r)?.method(name)?)));
        let Some((r, method)) = declared else {
            return Ok(format!("{}.{name}", self.expr(cx, base, None)?));
        };
        match Repr::of_named(universe, holder) {
            Some(repr) if !through_pointer && method.pointer_receiver && repr.has_pointer_box() => {
                let ctor = format!("{}._Pointer", cx.type_name(r)?);
                let (get, set) = self.location(cx, base)?;
                Ok(format!("{}.{name}", pointer_box(&ctor, &get, |v| set(v))))
            }
            Some(Repr::Wrapped) if !through_pointer => {
                let value = self.expr(cx, base, None)?;
                Ok(format!("new {}({value}).{name}", cx.type_name(r)?))
            }
            _ => Ok(format!("{}.{name}", self.expr(cx, base, None)?)),
        }
    }

    fn builtin_call(
        &self,
        cx: &mut PackageCx<'_>,
        builtin: Builtin,
        args: &[Expr],
        ellipsis: bool,
    ) -> Result<String, LowerError> {
        let callee = match builtin {
            Builtin::Append => APPEND,
            Builtin::Len => LEN,
            Builtin::Panic => PANIC,
            Builtin::Print => PRINT,
            Builtin::Println => PRINTLN,
            other => {
                return Err(LowerError::unsupported(
                    cx.path(),
                    "builtin call",
                    format!("`{}` is not lowered", other.name()),
                ))
            }
        };
        let variadic = VariadicParam::of_builtin(cx.universe(), builtin, args);
        let args = self.arguments(cx, args, ellipsis, variadic.as_ref(), |_| None)?;
        Ok(format!("{callee}({})", args.join(", ")))
    }

    /// Lower call arguments against their parameter types, then pack the
    /// variadic tail.
    fn arguments<'t>(
        &self,
        cx: &mut PackageCx<'_>,
        args: &[Expr],
        ellipsis: bool,
        variadic: Option<&'t VariadicParam>,
        param: impl Fn(usize) -> Option<&'t Type>,
    ) -> Result<Vec<String>, LowerError> {
        let mut lowered = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let target = match variadic {
                Some(v) if i >= v.index && !ellipsis => Some(&v.elem),
                _ => param(i),
            };
            lowered.push(self.expr(cx, arg, target)?);
        }
        let spread = if ellipsis {
            args.last().map(|arg| &arg.ty)
        } else {
            None
        };
        Ok(pack_arguments(cx.universe(), variadic, lowered, spread))
    }

    fn stmt(&self, cx: &mut PackageCx<'_>, stmt: &Stmt) -> Result<(), LowerError> {
        match stmt {
            Stmt::Expr(expr) => {
                let text = self.expr(cx, expr, None)?;
                cx.writeln(&format!("{text};"));
                Ok(())
            }
            Stmt::Define { names, values } => self.define(cx, names, values),
            Stmt::Assign { targets, values } => self.assign(cx, targets, values),
            Stmt::Return(values) => self.ret(cx, values),
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.expr(cx, cond, None)?;
                cx.writeln(&format!("if ({cond}) {{"));
                cx.indent();
                self.body(cx, then)?;
                cx.dedent();
                if !otherwise.is_empty() {
                    cx.writeln("} else {");
                    cx.indent();
                    self.body(cx, otherwise)?;
                    cx.dedent();
                }
                cx.writeln("}");
                Ok(())
            }
            Stmt::Raw(text) => {
                cx.out().write_block(text);
                Ok(())
            }
        }
    }

    fn define(
        &self,
        cx: &mut PackageCx<'_>,
        names: &[String],
        values: &[Expr],
    ) -> Result<(), LowerError> {
        if let ([value], [_, _, ..]) = (values, names) {
            let tuple = self.expr(cx, value, None)?;
            let temp = cx.fresh("_tuple");
            cx.writeln(&format!("var {temp} = {tuple};"));
            for (i, name) in names.iter().enumerate() {
                if !is_blank(name) {
                    let local = cx.local(name);
                    cx.writeln(&format!("var {local} = {temp}[{i}];"));
                }
            }
            return Ok(());
        }
        check_arity(cx, names.len(), values.len())?;
        for (name, value) in names.iter().zip(values) {
            let value = self.expr(cx, value, None)?;
            if is_blank(name) {
                cx.writeln(&format!("{value};"));
            } else {
                let local = cx.local(name);
                cx.writeln(&format!("var {local} = {value};"));
            }
        }
        Ok(())
    }

    fn assign(
        &self,
        cx: &mut PackageCx<'_>,
        targets: &[Expr],
        values: &[Expr],
    ) -> Result<(), LowerError> {
        match (targets, values) {
            ([target], [value]) => {
                let value = self.expr(cx, value, Some(&target.ty))?;
                self.store(cx, target, &value)
            }
            ([_, _, ..], [value]) => {
                let tuple = self.expr(cx, value, None)?;
                let temp = cx.fresh("_tuple");
                cx.writeln(&format!("var {temp} = {tuple};"));
                for (i, target) in targets.iter().enumerate() {
                    self.store(cx, target, &format!("{temp}[{i}]"))?;
                }
                Ok(())
            }
            _ => {
                check_arity(cx, targets.len(), values.len())?;
                // Every right-hand side is evaluated before any store.
                let mut temps = Vec::with_capacity(values.len());
                for (target, value) in targets.iter().zip(values) {
                    let value = self.expr(cx, value, Some(&target.ty))?;
                    let temp = cx.fresh("_tmp");
                    cx.writeln(&format!("var {temp} = {value};"));
                    temps.push(temp);
                }
                for (target, temp) in targets.iter().zip(&temps) {
                    self.store(cx, target, temp)?;
                }
                Ok(())
            }
        }
    }

    fn store(&self, cx: &mut PackageCx<'_>, target: &Expr, value: &str) -> Result<(), LowerError> {
        if let ExprKind::Ident(ObjectRef::Local(name)) = &target.kind {
            if is_blank(name) {
                cx.writeln(&format!("{value};"));
                return Ok(());
            }
        }
        let (_, set) = self.location(cx, target)?;
        cx.writeln(&format!("{};", set(value)));
        Ok(())
    }

    fn ret(&self, cx: &mut PackageCx<'_>, values: &[Expr]) -> Result<(), LowerError> {
        let results = cx.results().to_vec();
        let mut lowered = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            lowered.push(self.expr(cx, value, results.get(i))?);
        }
        match lowered.as_slice() {
            [] => cx.writeln("return;"),
            [value] => cx.writeln(&format!("return {value};")),
            _ => cx.writeln(&format!("return [{}];", lowered.join(", "))),
        }
        Ok(())
    }
}

fn check_arity(cx: &PackageCx<'_>, names: usize, values: usize) -> Result<(), LowerError> {
    if names == values {
        return Ok(());
    }
    Err(LowerError::unsupported(
        cx.path(),
        "assignment",
        format!("{names} operands for {values} values"),
    ))
}
