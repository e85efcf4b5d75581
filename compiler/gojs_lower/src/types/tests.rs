use super::*;
use crate::test_helpers::{int, interface, named, program, string, PackageBuilder};
use gojs_ir::{BasicKind, Field, Kind, Program};
use pretty_assertions::assert_eq;

fn sample() -> Program {
    let package = PackageBuilder::new("main")
        .strukt("T", vec![Field::new("A", int()), Field::new("B", string())])
        .ty("Celsius", Type::Basic(BasicKind::Float64))
        .ty("Buf", Type::slice(Type::Basic(BasicKind::Uint8)))
        .ty("Index", Type::map(string(), int()))
        .ty("Stringer", interface(&["String"]))
        .method("Celsius", "String", false)
        .ty("Any", Type::any())
        .ty("P", Type::pointer(int()))
        .build();
    program("main", vec![package])
}

fn compile(program: &Program, name: &str) -> Result<String, LowerError> {
    let package = &program.packages()[0];
    let decl = package
        .types
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("no type {name}"));
    let mut cx = PackageCx::new(program, package);
    cx.bind_declarations();
    let mut resolver = InterfaceResolver::new(program.universe());
    cx.capture(|cx| compile_type(cx, &mut resolver, decl))
}

fn compile_ok(program: &Program, name: &str) -> String {
    compile(program, name).unwrap_or_else(|err| panic!("compile failed: {err}"))
}

#[test]
fn test_struct_constructor_assigns_id_and_fields() {
    let expected = "\
var T = function(A_, B_) {
    this._id = _idCounter++;
    this.A = A_;
    this.B = B_;
};
T._tag = \"main.T\";
";
    assert_eq!(compile_ok(&sample(), "T"), expected);
}

#[test]
fn test_wrapped_type_gets_wrapper_and_pointer_box() {
    let expected = "\
var Celsius = function(v) { this.v = v; };
Celsius._tag = \"main.Celsius\";
Celsius._Pointer = function(getter, setter) { this.get = getter; this.set = setter; };
Celsius._Pointer._tag = \"main.*Celsius\";
";
    assert_eq!(compile_ok(&sample(), "Celsius"), expected);
}

#[test]
fn test_slice_and_map_subclass_runtime_bases() {
    let buf = compile_ok(&sample(), "Buf");
    assert!(buf.starts_with(
        "var Buf = function() { Slice.apply(this, arguments); };\n\
         Buf.prototype = Object.create(Slice.prototype);\n\
         Buf.prototype.constructor = Buf;\n"
    ));
    assert!(buf.contains("Buf._Pointer._tag = \"main.*Buf\";"));

    let index = compile_ok(&sample(), "Index");
    assert!(index.contains("Object.create(Go$Map.prototype)"));
}

#[test]
fn test_interface_predicates() {
    let stringer = compile_ok(&sample(), "Stringer");
    assert!(stringer.starts_with(
        "var Stringer = function(t) { return t === \"main.*Celsius\" || t === \"main.Celsius\"; };\n"
    ));
    let any = compile_ok(&sample(), "Any");
    assert!(any.starts_with("var Any = function(t) { return true; };\n"));
}

#[test]
fn test_pointer_underlying_is_unsupported() {
    let err = compile(&sample(), "P");
    match err {
        Err(LowerError::UnsupportedConstruct { detail, .. }) => {
            assert!(detail.contains(&Kind::Pointer.to_string()), "{detail}");
        }
        other => panic!("expected unsupported construct, got {other:?}"),
    }
}

#[test]
fn test_blank_struct_fields_are_not_assigned() {
    let package = PackageBuilder::new("main")
        .strukt("Pad", vec![Field::new("_", int()), Field::new("X", named("main", "Pad"))])
        .build();
    let p = program("main", vec![package]);
    let text = compile_ok(&p, "Pad");
    assert!(text.starts_with("var Pad = function(_0, X_) {\n"));
    assert!(!text.contains("this._ ="));
}
