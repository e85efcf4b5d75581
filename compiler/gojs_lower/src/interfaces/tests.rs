use super::*;
use crate::test_helpers::{int, interface, named, PackageBuilder};
use gojs_ir::{Field, Signature, Type};
use pretty_assertions::assert_eq;

fn methods(names: &[&str]) -> Vec<MethodSig> {
    names
        .iter()
        .map(|n| MethodSig::new(*n, Signature::default()))
        .collect()
}

#[test]
fn test_predicate_accepts_only_implementers() {
    let package = PackageBuilder::new("main")
        .ty("I", interface(&["M"]))
        .strukt("A", vec![])
        .method("A", "M", false)
        .strukt("B", vec![])
        .build();
    let universe = TypeUniverse::from_packages([&package]);
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(
        resolver.predicate(&methods(&["M"])),
        "function(t) { return t === \"main.A\"; }"
    );
}

#[test]
fn test_empty_interface_accepts_everything() {
    let universe = TypeUniverse::new();
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(resolver.predicate(&[]), "function(t) { return true; }");
}

#[test]
fn test_no_implementers_is_false() {
    let package = PackageBuilder::new("main").strukt("B", vec![]).build();
    let universe = TypeUniverse::from_packages([&package]);
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(
        resolver.predicate(&methods(&["M"])),
        "function(t) { return false; }"
    );
}

#[test]
fn test_struct_implements_through_pointer_methods() {
    let package = PackageBuilder::new("main")
        .strukt("S", vec![])
        .method("S", "M", true)
        .build();
    let universe = TypeUniverse::from_packages([&package]);
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(resolver.implementers(&methods(&["M"])), vec!["main.S"]);
}

#[test]
fn test_non_struct_contributes_value_and_pointer_tags() {
    let package = PackageBuilder::new("main")
        .ty("Value", int())
        .method("Value", "M", false)
        .ty("Ptr", int())
        .method("Ptr", "M", true)
        .build();
    let universe = TypeUniverse::from_packages([&package]);
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(
        resolver.implementers(&methods(&["M"])),
        vec!["main.*Ptr", "main.*Value", "main.Value"]
    );
}

#[test]
fn test_implementers_span_packages_and_promotion() {
    let lib = PackageBuilder::new("lib")
        .strukt("Base", vec![])
        .method("Base", "Close", false)
        .build();
    let app = PackageBuilder::new("app")
        .import("lib")
        .strukt("File", vec![Field::embedded("Base", named("lib", "Base"))])
        .ty("Closer", interface(&["Close"]))
        .build();
    let universe = TypeUniverse::from_packages([&lib, &app]);
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(
        resolver.implementers(&methods(&["Close"])),
        vec!["app.File", "lib.Base"]
    );
}

#[test]
fn test_interfaces_are_not_implementers() {
    let package = PackageBuilder::new("main")
        .ty("I", interface(&["M"]))
        .ty("J", Type::Interface(methods(&["M", "N"])))
        .build();
    let universe = TypeUniverse::from_packages([&package]);
    let mut resolver = InterfaceResolver::new(&universe);
    assert!(resolver.implementers(&methods(&["M"])).is_empty());
}

#[test]
fn test_unexported_methods_only_match_their_own_package() {
    let a = PackageBuilder::new("a")
        .ty("I", interface(&["m"]))
        .strukt("S", vec![])
        .method("S", "m", false)
        .build();
    let b = PackageBuilder::new("b")
        .import("a")
        .strukt("T", vec![])
        .method("T", "m", false)
        .build();
    let universe = TypeUniverse::from_packages([&a, &b]);
    let Some(Type::Interface(sealed)) = universe
        .get(&TypeRef::new("a", "I"))
        .map(|named| named.underlying.clone())
    else {
        panic!("a.I is not an interface");
    };
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(resolver.implementers(&sealed), vec!["a.S"]);

    let from_b: Vec<MethodSig> = methods(&["m"])
        .into_iter()
        .map(|m| m.qualified("b"))
        .collect();
    assert_eq!(resolver.implementers(&from_b), vec!["b.T"]);
}

#[test]
fn test_unexported_methods_promote_across_packages() {
    let a = PackageBuilder::new("a")
        .ty("I", interface(&["m"]))
        .strukt("Base", vec![])
        .method("Base", "m", false)
        .build();
    let b = PackageBuilder::new("b")
        .import("a")
        .strukt("Derived", vec![Field::embedded("Base", named("a", "Base"))])
        .build();
    let universe = TypeUniverse::from_packages([&a, &b]);
    let sealed: Vec<MethodSig> = methods(&["m"])
        .into_iter()
        .map(|m| m.qualified("a"))
        .collect();
    let mut resolver = InterfaceResolver::new(&universe);
    assert_eq!(resolver.implementers(&sealed), vec!["a.Base", "b.Derived"]);
}
