//! Forwarders for methods promoted through embedded fields.
//!
//! A struct's addressable method set includes every method promoted from
//! its embedded fields. Each promoted method becomes a forwarder on the
//! struct's prototype that reaches into the embedded field and calls the
//! method there, boxing the field when the method needs its address.

use gojs_ir::{Type, TypeRef};

use crate::context::PackageCx;
use crate::method_set::{method_set, MethodEntry};
use crate::methods::{InstalledMethod, MethodTable, Origin};
use crate::repr::{pointer_box, Repr};
use crate::LowerError;

/// Install forwarders for every method promoted into the struct `r`.
pub fn forward_embedded(
    cx: &mut PackageCx<'_>,
    r: &TypeRef,
    table: &mut MethodTable,
) -> Result<(), LowerError> {
    let set = method_set(cx.universe(), r, true);
    if let Some(ambiguity) = set.ambiguities().first() {
        return Err(LowerError::AmbiguousSelector {
            package: cx.path().to_string(),
            ty: r.name.clone(),
            method: ambiguity.name.clone(),
            fields: ambiguity.fields.clone(),
        });
    }

    let mut count = 0usize;
    for entry in set.promoted() {
        let (Some(field), Some(via)) = (entry.field(), &entry.via) else {
            continue;
        };
        let params: Vec<String> = (0..entry.signature.params.len())
            .map(|i| format!("p{i}"))
            .collect();
        let body = forwarder_body(cx, entry, field, via, &params.join(", "))?;
        let method = InstalledMethod {
            name: entry.name.clone(),
            params,
            body,
            origin: Origin::Forwarder {
                field: field.to_string(),
            },
        };
        table.install_forwarder(method).map_err(|existing| {
            LowerError::AmbiguousSelector {
                package: cx.path().to_string(),
                ty: r.name.clone(),
                method: entry.name.clone(),
                fields: vec![existing, field.to_string()],
            }
        })?;
        count += 1;
    }
    if count > 0 {
        tracing::debug!(ty = %r, forwarders = count, "synthesized promoted methods");
    }
    Ok(())
}

/// Body of the forwarder for `entry`, reached through the outer field
/// `field` of declared type `via`.
fn forwarder_body(
    cx: &PackageCx<'_>,
    entry: &MethodEntry,
    field: &str,
    via: &Type,
    args: &str,
) -> Result<String, LowerError> {
    let name = &entry.name;
    let direct = format!("return this.{field}.{name}({args});");
    // Pointer fields already hold a box or a shared struct.
    let Type::Named(inner) = via else {
        return Ok(direct);
    };
    match Repr::of_named(cx.universe(), via) {
        Some(Repr::Wrapped) if !entry.pointer_receiver() => Ok(format!(
            "return new {}(this.{field}).{name}({args});",
            cx.type_name(inner)?
        )),
        Some(repr) if repr.has_pointer_box() && entry.pointer_receiver() => {
            let location = format!("obj.{field}");
            let boxed = pointer_box(
                &format!("{}._Pointer", cx.type_name(inner)?),
                &location,
                |v| format!("{location} = {v}"),
            );
            Ok(format!("var obj = this;\nreturn {boxed}.{name}({args});"))
        }
        _ => Ok(direct),
    }
}

#[cfg(test)]
mod tests;
