//! Zero values.
//!
//! Every declared-but-uninitialized global, missing struct literal field and
//! cleared buffer element needs the runtime text of its type's zero value.

use gojs_ir::{BasicKind, Type, TypeRef, TypeUniverse};

use crate::context::PackageCx;
use crate::repr::{typed_array, Repr};
use crate::runtime::CLEAR;
use crate::stack::ensure_sufficient_stack;
use crate::LowerError;

/// Zero value of `ty` as target text.
pub fn zero_value(cx: &PackageCx<'_>, ty: &Type) -> Result<String, LowerError> {
    ensure_sufficient_stack(|| match ty {
        Type::Basic(kind) => Ok(basic_zero(*kind).to_string()),
        Type::Array { elem, len } => array_zero(cx, elem, *len),
        Type::Named(r) => named_zero(cx, r),
        _ => Ok("null".to_string()),
    })
}

fn basic_zero(kind: BasicKind) -> &'static str {
    if kind.is_numeric() {
        "0"
    } else if kind.is_string() {
        "\"\""
    } else if kind.is_boolean() {
        "false"
    } else {
        "null"
    }
}

/// Zeroed buffer of `len` elements of type `elem`.
pub fn array_zero(cx: &PackageCx<'_>, elem: &Type, len: u64) -> Result<String, LowerError> {
    if let Some(array) = typed_array(cx.universe(), elem) {
        return Ok(format!("{CLEAR}(new {array}({len}))"));
    }
    let zero = zero_value(cx, elem)?;
    if shares_zero(cx.universe(), elem) {
        Ok(format!("{CLEAR}(new Array({len}), {zero})"))
    } else {
        // Each element needs its own object.
        Ok(format!(
            "{CLEAR}(new Array({len}), function() {{ return {zero}; }})"
        ))
    }
}

fn named_zero(cx: &PackageCx<'_>, r: &TypeRef) -> Result<String, LowerError> {
    let Some(named) = cx.universe().get(r) else {
        return Ok("null".to_string());
    };
    match Repr::of_underlying(&named.underlying) {
        Ok(Repr::Object) => {
            let Type::Struct(fields) = &named.underlying else {
                return Ok("null".to_string());
            };
            let zeros = fields
                .iter()
                .map(|field| zero_value(cx, &field.ty))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("new {}({})", cx.type_name(r)?, zeros.join(", ")))
        }
        Ok(Repr::Sequence) => {
            let Type::Slice(elem) = &named.underlying else {
                return Ok("null".to_string());
            };
            let buffer = match typed_array(cx.universe(), elem) {
                Some(array) => format!("new {array}(0)"),
                None => "[]".to_string(),
            };
            Ok(format!("new {}({buffer})", cx.type_name(r)?))
        }
        Ok(Repr::Dictionary) => Ok(format!("new {}(null)", cx.type_name(r)?)),
        Ok(Repr::Wrapped) => zero_value(cx, &named.underlying),
        Ok(Repr::Predicate) | Err(_) => Ok("null".to_string()),
    }
}

/// Whether the zero value of `ty` is immutable, so one value can fill a
/// whole buffer.
fn shares_zero(universe: &TypeUniverse, ty: &Type) -> bool {
    match ty {
        Type::Array { .. } => false,
        Type::Named(r) => match universe.get(r) {
            Some(named) => match Repr::of_underlying(&named.underlying) {
                Ok(Repr::Object | Repr::Sequence | Repr::Dictionary) => false,
                Ok(Repr::Wrapped) => shares_zero(universe, &named.underlying),
                Ok(Repr::Predicate) | Err(_) => true,
            },
            None => true,
        },
        _ => true,
    }
}

#[cfg(test)]
mod tests;
