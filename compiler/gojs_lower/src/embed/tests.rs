use super::*;
use crate::methods::Slot;
use crate::test_helpers::{int, named, program, string, PackageBuilder};
use gojs_ir::{Field, Param, Program};
use pretty_assertions::assert_eq;

fn forward(program: &Program, ty: &str) -> Result<MethodTable, LowerError> {
    let package = &program.packages()[0];
    let mut cx = PackageCx::new(program, package);
    cx.bind_declarations();
    let mut table = MethodTable::new();
    forward_embedded(&mut cx, &TypeRef::new("main", ty), &mut table)?;
    Ok(table)
}

fn body_of(table: &MethodTable, name: &str) -> String {
    table
        .get(Slot::Value, name)
        .map(|m| m.body.clone())
        .unwrap_or_else(|| panic!("no forwarder {name}"))
}

#[test]
fn test_struct_field_forwards_pointer_method_to_shared_field() {
    let package = PackageBuilder::new("main")
        .strukt("Inner", vec![Field::new("N", int())])
        .method("Inner", "M", true)
        .strukt("Outer", vec![Field::embedded("Inner", named("main", "Inner"))])
        .build();
    let table = forward(&program("main", vec![package]), "Outer")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(body_of(&table, "M"), "return this.Inner.M();");
    assert_eq!(
        table.get(Slot::Value, "M").map(|m| &m.origin),
        Some(&Origin::Forwarder {
            field: "Inner".to_string()
        })
    );
}

#[test]
fn test_wrapped_field_is_wrapped_or_boxed() {
    let package = PackageBuilder::new("main")
        .ty("Counter", int())
        .method("Counter", "Get", false)
        .method_with("Counter", "Add", true, vec![Param::new("n", int())], vec![])
        .strukt("Outer", vec![Field::embedded("Counter", named("main", "Counter"))])
        .build();
    let table = forward(&program("main", vec![package]), "Outer")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(body_of(&table, "Get"), "return new Counter(this.Counter).Get();");
    assert_eq!(
        body_of(&table, "Add"),
        "var obj = this;\n\
         return new Counter._Pointer(function() { return obj.Counter; }, function($v) { obj.Counter = $v; }).Add(p0);"
    );
    assert_eq!(
        table.get(Slot::Value, "Add").map(|m| m.params.clone()),
        Some(vec!["p0".to_string()])
    );
}

#[test]
fn test_pointer_field_calls_through_its_box() {
    let package = PackageBuilder::new("main")
        .ty("Counter", int())
        .method("Counter", "Inc", true)
        .strukt(
            "Outer",
            vec![Field::embedded("Counter", Type::pointer(named("main", "Counter")))],
        )
        .build();
    let table = forward(&program("main", vec![package]), "Outer")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(body_of(&table, "Inc"), "return this.Counter.Inc();");
}

#[test]
fn test_slice_field_value_method_calls_directly() {
    let package = PackageBuilder::new("main")
        .ty("Names", Type::slice(string()))
        .method("Names", "Len", false)
        .strukt("List", vec![Field::embedded("Names", named("main", "Names"))])
        .build();
    let table = forward(&program("main", vec![package]), "List")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(body_of(&table, "Len"), "return this.Names.Len();");
}

#[test]
fn test_same_depth_promotion_is_ambiguous() {
    let package = PackageBuilder::new("main")
        .strukt("A", vec![])
        .method("A", "M", false)
        .strukt("B", vec![])
        .method("B", "M", false)
        .strukt(
            "Outer",
            vec![
                Field::embedded("A", named("main", "A")),
                Field::embedded("B", named("main", "B")),
            ],
        )
        .build();
    let err = forward(&program("main", vec![package]), "Outer").err();
    assert_eq!(
        err,
        Some(LowerError::AmbiguousSelector {
            package: "main".to_string(),
            ty: "Outer".to_string(),
            method: "M".to_string(),
            fields: vec!["A".to_string(), "B".to_string()],
        })
    );
}

#[test]
fn test_declared_method_is_not_forwarded() {
    let package = PackageBuilder::new("main")
        .strukt("Inner", vec![])
        .method("Inner", "M", false)
        .method("Inner", "N", false)
        .strukt("Outer", vec![Field::embedded("Inner", named("main", "Inner"))])
        .method("Outer", "M", false)
        .build();
    let table = forward(&program("main", vec![package]), "Outer")
        .unwrap_or_else(|err| panic!("{err}"));
    assert!(table.get(Slot::Value, "M").is_none());
    assert_eq!(body_of(&table, "N"), "return this.Inner.N();");
}

#[test]
fn test_method_shadowed_by_field_at_same_depth_gets_no_forwarder() {
    let package = PackageBuilder::new("main")
        .strukt("A", vec![])
        .method("A", "Name", false)
        .strukt("B", vec![Field::new("Name", string())])
        .strukt(
            "Outer",
            vec![
                Field::embedded("A", named("main", "A")),
                Field::embedded("B", named("main", "B")),
            ],
        )
        .build();
    let table = forward(&program("main", vec![package]), "Outer")
        .unwrap_or_else(|err| panic!("{err}"));
    assert!(table.get(Slot::Value, "Name").is_none());
}
