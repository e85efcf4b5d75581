//! Method tables and receiver dispatch.
//!
//! Every named type gets a [`MethodTable`] with two slots: the value
//! representation's prototype and the pointer box's prototype. Declared
//! methods go into the slot matching their receiver; a shim in the other
//! slot makes each method callable through both a value and a pointer.
//! Struct values share identity with their pointers, so struct types only
//! use the value slot.

use gojs_ir::{is_blank, TypeDecl, TypeRef};

use crate::context::PackageCx;
use crate::emitter::js_string;
use crate::lowering::Lowering;
use crate::repr::{pointer_box, Repr};
use crate::LowerError;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Slot {
    /// `T.prototype`
    Value,
    /// `T._Pointer.prototype`
    Pointer,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Origin {
    Declared,
    /// Calls a declared method through the other receiver form.
    Shim,
    /// Forwards to the embedded field `field`.
    Forwarder { field: String },
}

/// One function installed on a prototype.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InstalledMethod {
    pub name: String,
    pub params: Vec<String>,
    /// Body text, one statement per line, unindented.
    pub body: String,
    pub origin: Origin,
}

/// Compile-time method table of one named type, in install order.
#[derive(Clone, Debug, Default)]
pub struct MethodTable {
    value: Vec<InstalledMethod>,
    pointer: Vec<InstalledMethod>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: Slot) -> &[InstalledMethod] {
        match slot {
            Slot::Value => &self.value,
            Slot::Pointer => &self.pointer,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Vec<InstalledMethod> {
        match slot {
            Slot::Value => &mut self.value,
            Slot::Pointer => &mut self.pointer,
        }
    }

    pub fn get(&self, slot: Slot, name: &str) -> Option<&InstalledMethod> {
        self.slot(slot).iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.pointer.is_empty()
    }

    /// Install a declared method, replacing whatever held the name.
    pub fn install_declared(&mut self, slot: Slot, method: InstalledMethod) {
        let methods = self.slot_mut(slot);
        match methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => *existing = method,
            None => methods.push(method),
        }
    }

    /// Install a shim unless a declared method already holds the name.
    pub fn install_shim(&mut self, slot: Slot, method: InstalledMethod) {
        let methods = self.slot_mut(slot);
        match methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) if existing.origin == Origin::Declared => {}
            Some(existing) => *existing = method,
            None => methods.push(method),
        }
    }

    /// Install a promoted-method forwarder on the value slot.
    ///
    /// Declared methods shadow forwarders. A second forwarder for the same
    /// name is an ambiguous selector; the error carries the field that
    /// already provides it.
    pub fn install_forwarder(&mut self, method: InstalledMethod) -> Result<(), String> {
        let methods = self.slot_mut(Slot::Value);
        match methods.iter().find(|m| m.name == method.name) {
            Some(existing) => match &existing.origin {
                Origin::Forwarder { field } => Err(field.clone()),
                Origin::Declared | Origin::Shim => Ok(()),
            },
            None => {
                methods.push(method);
                Ok(())
            }
        }
    }

    /// Write every installed method, value slot first.
    pub fn emit(&self, cx: &mut PackageCx<'_>, binding: &str) {
        for (slot, methods) in [(Slot::Value, &self.value), (Slot::Pointer, &self.pointer)] {
            let prototype = match slot {
                Slot::Value => format!("{binding}.prototype"),
                Slot::Pointer => format!("{binding}._Pointer.prototype"),
            };
            for method in methods {
                cx.writeln(&format!(
                    "{prototype}.{} = function({}) {{",
                    method.name,
                    method.params.join(", ")
                ));
                cx.indent();
                cx.out().write_block(&method.body);
                cx.dedent();
                cx.writeln("};");
            }
        }
    }
}

/// Install every method declared on `decl`, plus its receiver-form shim.
pub fn compile_methods(
    cx: &mut PackageCx<'_>,
    lowering: &dyn Lowering,
    decl: &TypeDecl,
    repr: Repr,
    table: &mut MethodTable,
) -> Result<(), LowerError> {
    let package = cx.package;
    let binding = cx.type_name(&TypeRef::new(cx.path(), &decl.name))?;

    for method in package.methods_of(&decl.name) {
        let Some(receiver) = &method.receiver else {
            continue;
        };
        if repr == Repr::Predicate {
            return Err(LowerError::unsupported(
                cx.path(),
                "method receiver",
                format!("`{}.{}` is declared on an interface type", decl.name, method.name),
            ));
        }

        let params: Vec<String> = method
            .params
            .iter()
            .map(|p| cx.param(p.name.as_deref()))
            .collect();
        let body = cx.capture(|cx| {
            if let Some(name) = receiver.name.as_deref().filter(|n| !is_blank(n)) {
                let local = cx.local(name);
                let this = if repr.is_raw() && !receiver.pointer {
                    "this.v"
                } else {
                    "this"
                };
                cx.writeln(&format!("var {local} = {this};"));
            }
            match &method.body {
                Some(stmts) => cx.in_function(&method.results, |cx| lowering.body(cx, stmts)),
                None => {
                    let message = format!(
                        "Native function not implemented: {}.{}",
                        decl.name, method.name
                    );
                    cx.writeln(&format!("throw new GoError({});", js_string(&message)));
                    Ok(())
                }
            }
        })?;

        let slot = if receiver.pointer && repr.has_pointer_box() {
            Slot::Pointer
        } else {
            Slot::Value
        };
        table.install_declared(
            slot,
            InstalledMethod {
                name: method.name.clone(),
                params: params.clone(),
                body,
                origin: Origin::Declared,
            },
        );

        if !repr.has_pointer_box() {
            continue;
        }
        let args = params.join(", ");
        let (shim_slot, shim_body) = if receiver.pointer {
            // A value becomes addressable through a box over itself.
            let location = if repr.is_raw() { "obj.v" } else { "obj" };
            let boxed = pointer_box(&format!("{binding}._Pointer"), location, |v| {
                format!("{location} = {v}")
            });
            (
                Slot::Value,
                format!("var obj = this;\nreturn {boxed}.{}({args});", method.name),
            )
        } else {
            let value = if repr.is_raw() {
                format!("new {binding}(this.get())")
            } else {
                "this.get()".to_string()
            };
            (Slot::Pointer, format!("return {value}.{}({args});", method.name))
        };
        table.install_shim(
            shim_slot,
            InstalledMethod {
                name: method.name.clone(),
                params,
                body: shim_body,
                origin: Origin::Shim,
            },
        );
    }
    Ok(())
}
