//! Package-level constants and variables.
//!
//! Grouped declarations are flattened into units, one per name, or one per
//! group when several names share a single multi-value initializer. Units
//! are emitted in dependency order: a unit follows every unit whose names
//! its initializer refers to. Among ready units the earliest declared goes
//! first, so independent declarations keep their source order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use gojs_ir::{is_blank, Expr, ObjectRef, Package, ValueKind, ValueName};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::PackageCx;
use crate::lowering::Lowering;
use crate::zero::zero_value;
use crate::LowerError;

/// One scheduled declaration.
#[derive(Clone, Debug)]
pub struct GlobalUnit<'p> {
    pub kind: ValueKind,
    pub names: Vec<&'p ValueName>,
    /// `None` for a zero-initialized declaration.
    pub value: Option<&'p Expr>,
}

impl GlobalUnit<'_> {
    /// Several names destructured from one multi-value initializer.
    pub fn is_tuple(&self) -> bool {
        self.names.len() > 1
    }

    /// Name used for this unit in cycle reports.
    fn label(&self) -> &str {
        self.names
            .iter()
            .map(|n| n.name.as_str())
            .find(|n| !is_blank(n))
            .unwrap_or("_")
    }
}

/// Split every value spec of `package` into units, in declaration order.
pub fn flatten(package: &Package) -> Result<Vec<GlobalUnit<'_>>, LowerError> {
    let mut units = Vec::new();
    for spec in &package.values {
        match (spec.values.as_slice(), spec.names.len()) {
            ([], _) => units.extend(spec.names.iter().map(|name| GlobalUnit {
                kind: spec.kind,
                names: vec![name],
                value: None,
            })),
            ([value], n) if n > 1 => units.push(GlobalUnit {
                kind: spec.kind,
                names: spec.names.iter().collect(),
                value: Some(value),
            }),
            (values, n) if values.len() == n => {
                units.extend(spec.names.iter().zip(values).map(|(name, value)| GlobalUnit {
                    kind: spec.kind,
                    names: vec![name],
                    value: Some(value),
                }));
            }
            (values, n) => {
                return Err(LowerError::unsupported(
                    &package.path,
                    "value declaration",
                    format!("{n} names for {} values", values.len()),
                ))
            }
        }
    }
    Ok(units)
}

/// For each unit, the units its initializer refers to.
fn dependencies(package: &str, units: &[GlobalUnit<'_>]) -> Vec<Vec<usize>> {
    let mut owner: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, unit) in units.iter().enumerate() {
        for name in &unit.names {
            if !is_blank(&name.name) {
                owner.insert(name.name.as_str(), i);
            }
        }
    }
    units
        .iter()
        .map(|unit| {
            let mut deps: FxHashSet<usize> = FxHashSet::default();
            if let Some(value) = unit.value {
                value.for_each_ident(&mut |object| {
                    if let ObjectRef::Package { package: p, name } = object {
                        if p == package {
                            if let Some(&j) = owner.get(name.as_str()) {
                                deps.insert(j);
                            }
                        }
                    }
                });
            }
            let mut deps: Vec<usize> = deps.into_iter().collect();
            deps.sort_unstable();
            deps
        })
        .collect()
}

/// Order units so every unit follows its dependencies.
///
/// Fails with the dependency path of one cycle when no such order exists.
pub fn schedule(package: &str, units: &[GlobalUnit<'_>]) -> Result<Vec<usize>, LowerError> {
    let deps = dependencies(package, units);
    let mut pending: Vec<usize> = deps.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); units.len()];
    for (i, unit_deps) in deps.iter().enumerate() {
        for &j in unit_deps {
            dependents[j].push(i);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = pending
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n == 0)
        .map(|(i, _)| Reverse(i))
        .collect();
    let mut order = Vec::with_capacity(units.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        for &d in &dependents[i] {
            pending[d] -= 1;
            if pending[d] == 0 {
                ready.push(Reverse(d));
            }
        }
    }

    if order.len() < units.len() {
        let cycle = find_cycle(&deps, &pending)
            .into_iter()
            .map(|i| units[i].label().to_string())
            .collect();
        return Err(LowerError::InitializerCycle {
            package: package.to_string(),
            cycle,
        });
    }
    Ok(order)
}

/// Walk dependencies among unscheduled units until one repeats.
///
/// Every unscheduled unit depends on another unscheduled unit, so the walk
/// from the earliest one always closes a cycle.
fn find_cycle(deps: &[Vec<usize>], pending: &[usize]) -> Vec<usize> {
    let Some(start) = pending.iter().position(|&n| n > 0) else {
        return Vec::new();
    };
    let mut path = vec![start];
    let mut position: FxHashMap<usize, usize> = FxHashMap::default();
    position.insert(start, 0);
    let mut current = start;
    loop {
        let Some(&next) = deps[current].iter().find(|&&j| pending[j] > 0) else {
            return path;
        };
        if let Some(&at) = position.get(&next) {
            let mut cycle = path.split_off(at);
            cycle.push(next);
            return cycle;
        }
        position.insert(next, path.len());
        path.push(next);
        current = next;
    }
}

/// Emit every package-level constant and variable in dependency order.
pub fn emit_globals(cx: &mut PackageCx<'_>, lowering: &dyn Lowering) -> Result<(), LowerError> {
    let package = cx.package;
    let units = flatten(package)?;
    let order = schedule(&package.path, &units)?;
    tracing::debug!(
        order = ?order.iter().map(|&i| units[i].label()).collect::<Vec<_>>(),
        "scheduled globals"
    );

    for i in order {
        let unit = &units[i];
        match (unit.value, unit.names.as_slice()) {
            (Some(value), [name]) => {
                let text = lowering.expr(cx, value, Some(&name.ty))?;
                if is_blank(&name.name) {
                    cx.writeln(&format!("{text};"));
                } else {
                    let binding = cx.qualified(&package.path, &name.name)?;
                    cx.writeln(&format!("var {binding} = {text};"));
                }
            }
            (Some(value), names) => {
                let text = lowering.expr(cx, value, None)?;
                let temp = cx.fresh("_tuple");
                cx.writeln(&format!("var {temp} = {text};"));
                for (k, name) in names.iter().enumerate() {
                    if !is_blank(&name.name) {
                        let binding = cx.qualified(&package.path, &name.name)?;
                        cx.writeln(&format!("var {binding} = {temp}[{k}];"));
                    }
                }
            }
            (None, names) => {
                for name in names {
                    if !is_blank(&name.name) {
                        let zero = zero_value(cx, &name.ty)?;
                        let binding = cx.qualified(&package.path, &name.name)?;
                        cx.writeln(&format!("var {binding} = {zero};"));
                    }
                }
            }
        }
    }
    Ok(())
}
