//! Variadic argument packing.
//!
//! A call to `f(xs ...T)` passes its trailing arguments as one sequence.
//! Unless the call site already spreads a sequence with `...`, the
//! arguments from the variadic position onward are packed into a new
//! `Slice` over a typed buffer for sized numeric elements or a plain array
//! otherwise.

use gojs_ir::{Builtin, Expr, Signature, Type, TypeUniverse};

use crate::repr::list_composite;
use crate::runtime::{SLICE, STRING_TO_SLICE};

/// Variadic position of a callee and the element type packed there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariadicParam {
    pub index: usize,
    pub elem: Type,
}

impl VariadicParam {
    pub fn of_signature(sig: &Signature) -> Option<Self> {
        let elem = sig.variadic_elem()?;
        Some(VariadicParam {
            index: sig.params.len().saturating_sub(1),
            elem: elem.clone(),
        })
    }

    /// `append(s, xs...)` packs into `s`'s element type; `print` and
    /// `println` pack into a generic sequence.
    pub fn of_builtin(universe: &TypeUniverse, builtin: Builtin, args: &[Expr]) -> Option<Self> {
        match builtin {
            Builtin::Append => {
                let elem = args
                    .first()
                    .and_then(|slice| match universe.underlying(&slice.ty) {
                        Type::Slice(elem) => Some((**elem).clone()),
                        _ => None,
                    })
                    .unwrap_or_else(Type::any);
                Some(VariadicParam { index: 1, elem })
            }
            Builtin::Print | Builtin::Println => Some(VariadicParam {
                index: 0,
                elem: Type::any(),
            }),
            _ => None,
        }
    }
}

/// Rewrite already-lowered call arguments for the callee's variadic shape.
///
/// `spread` is the type of the last argument when the call site ends in
/// `...`; such a call is forwarded unchanged except that a string spread
/// into byte elements is converted to its byte sequence first.
pub fn pack_arguments(
    universe: &TypeUniverse,
    param: Option<&VariadicParam>,
    mut args: Vec<String>,
    spread: Option<&Type>,
) -> Vec<String> {
    if let Some(spread_ty) = spread {
        if universe.underlying(spread_ty).is_string() {
            if let Some(last) = args.last_mut() {
                *last = format!("{STRING_TO_SLICE}({last})");
            }
        }
        return args;
    }
    let Some(param) = param else {
        return args;
    };
    let rest = args.split_off(param.index.min(args.len()));
    args.push(format!(
        "new {SLICE}({})",
        list_composite(universe, &param.elem, &rest)
    ));
    args
}
