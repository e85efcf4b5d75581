//! Runtime constructors and tags for declared types.

use gojs_ir::{is_blank, MethodSig, Type, TypeDecl, TypeRef};

use crate::context::PackageCx;
use crate::emitter::js_string;
use crate::interfaces::InterfaceResolver;
use crate::repr::Repr;
use crate::runtime::{MAP, SLICE};
use crate::LowerError;

/// Emit the constructor, type tag and pointer box of one named type.
///
/// Returns the type's representation so the caller knows which method
/// table shape to build.
pub fn compile_type(
    cx: &mut PackageCx<'_>,
    resolver: &mut InterfaceResolver<'_>,
    decl: &TypeDecl,
) -> Result<Repr, LowerError> {
    let r = TypeRef::new(cx.path(), &decl.name);
    let repr = Repr::of_underlying(&decl.underlying).map_err(|kind| {
        LowerError::unsupported(
            cx.path(),
            "named type",
            format!("`{}` has underlying kind {kind}", decl.name),
        )
    })?;
    let binding = cx.type_name(&r)?;

    match (&decl.underlying, repr) {
        (Type::Struct(fields), Repr::Object) => {
            let params: Vec<String> = fields
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    if is_blank(&field.name) {
                        format!("_{i}")
                    } else {
                        format!("{}_", field.name)
                    }
                })
                .collect();
            cx.writeln(&format!("var {binding} = function({}) {{", params.join(", ")));
            cx.indent();
            cx.writeln("this._id = _idCounter++;");
            for (field, param) in fields.iter().zip(&params) {
                if !is_blank(&field.name) {
                    cx.writeln(&format!("this.{} = {param};", field.name));
                }
            }
            cx.dedent();
            cx.writeln("};");
        }
        (_, Repr::Wrapped) => {
            cx.writeln(&format!("var {binding} = function(v) {{ this.v = v; }};"));
        }
        (_, Repr::Sequence | Repr::Dictionary) => {
            let base = if repr == Repr::Sequence { SLICE } else { MAP };
            cx.writeln(&format!(
                "var {binding} = function() {{ {base}.apply(this, arguments); }};"
            ));
            cx.writeln(&format!(
                "{binding}.prototype = Object.create({base}.prototype);"
            ));
            cx.writeln(&format!("{binding}.prototype.constructor = {binding};"));
        }
        (Type::Interface(methods), Repr::Predicate) => {
            let methods: Vec<MethodSig> = methods
                .iter()
                .map(|m| m.clone().qualified(cx.path()))
                .collect();
            let predicate = resolver.predicate(&methods);
            cx.writeln(&format!("var {binding} = {predicate};"));
        }
        (other, _) => {
            return Err(LowerError::unsupported(
                cx.path(),
                "named type",
                format!("`{}` has underlying kind {}", decl.name, other.kind()),
            ))
        }
    }

    cx.writeln(&format!("{binding}._tag = {};", js_string(&r.tag())));
    if repr.has_pointer_box() {
        cx.writeln(&format!(
            "{binding}._Pointer = function(getter, setter) {{ this.get = getter; this.set = setter; }};"
        ));
        cx.writeln(&format!(
            "{binding}._Pointer._tag = {};",
            js_string(&r.pointer_tag())
        ));
    }
    tracing::trace!(ty = %r, ?repr, "emitted type representation");
    Ok(repr)
}

#[cfg(test)]
mod tests;
