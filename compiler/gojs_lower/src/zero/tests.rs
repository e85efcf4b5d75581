use super::*;
use crate::test_helpers::{int, named, program, string, PackageBuilder};
use gojs_ir::{BasicKind, Field, Program};
use pretty_assertions::assert_eq;

fn sample() -> Program {
    let package = PackageBuilder::new("main")
        .strukt("T", vec![Field::new("A", int()), Field::new("B", string())])
        .ty("Buf", Type::slice(Type::Basic(BasicKind::Uint8)))
        .ty("Names", Type::slice(string()))
        .ty("Celsius", Type::Basic(BasicKind::Float64))
        .ty("Index", Type::map(string(), int()))
        .ty("Shape", Type::any())
        .ty("Grid", Type::array(named("main", "T"), 2))
        .build();
    program("main", vec![package])
}

fn zero_of(program: &Program, ty: &Type) -> String {
    let package = &program.packages()[0];
    let mut cx = PackageCx::new(program, package);
    cx.bind_declarations();
    zero_value(&cx, ty).unwrap_or_else(|err| panic!("zero value failed: {err}"))
}

#[test]
fn test_basic_zeros() {
    let p = sample();
    assert_eq!(zero_of(&p, &int()), "0");
    assert_eq!(zero_of(&p, &Type::Basic(BasicKind::Complex128)), "0");
    assert_eq!(zero_of(&p, &string()), "\"\"");
    assert_eq!(zero_of(&p, &Type::Basic(BasicKind::Bool)), "false");
}

#[test]
fn test_struct_zero_calls_constructor_with_field_zeros() {
    let p = sample();
    assert_eq!(zero_of(&p, &named("main", "T")), "new T(0, \"\")");
}

#[test]
fn test_named_slice_zero_has_length_zero() {
    let p = sample();
    assert_eq!(zero_of(&p, &named("main", "Buf")), "new Buf(new Uint8Array(0))");
    assert_eq!(zero_of(&p, &named("main", "Names")), "new Names([])");
}

#[test]
fn test_wrapped_named_zero_is_raw() {
    let p = sample();
    assert_eq!(zero_of(&p, &named("main", "Celsius")), "0");
    assert_eq!(zero_of(&p, &named("main", "Index")), "new Index(null)");
    assert_eq!(zero_of(&p, &named("main", "Shape")), "null");
}

#[test]
fn test_array_zeros() {
    let p = sample();
    assert_eq!(
        zero_of(&p, &Type::array(Type::Basic(BasicKind::Int32), 4)),
        "Go$clear(new Int32Array(4))"
    );
    assert_eq!(
        zero_of(&p, &Type::array(string(), 3)),
        "Go$clear(new Array(3), \"\")"
    );
    assert_eq!(
        zero_of(&p, &named("main", "Grid")),
        "Go$clear(new Array(2), function() { return new T(0, \"\"); })"
    );
}

#[test]
fn test_other_kinds_are_null() {
    let p = sample();
    assert_eq!(zero_of(&p, &Type::slice(int())), "null");
    assert_eq!(zero_of(&p, &Type::pointer(named("main", "T"))), "null");
    assert_eq!(zero_of(&p, &Type::chan(int())), "null");
    assert_eq!(zero_of(&p, &named("main", "Unknown")), "null");
}
