use super::*;
use crate::test_helpers::{int, interface, named, program, PackageBuilder};
use gojs_diagnostic::ErrorCode;
use gojs_ir::{CheckProblem, Field, MethodSig, Param, Signature, Stmt, Type};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Stdio};

fn compile_text(program: &Program) -> String {
    let output = compile(program, &LowerConfig::without_prelude());
    assert!(!output.has_errors(), "unexpected errors: {:?}", output.diagnostics);
    output.text
}

fn module_count(text: &str, path: &str) -> usize {
    text.matches(&format!("packages[\"{path}\"] = (function() {{")).count()
}

#[test]
fn test_entry_module_layout() {
    let package = PackageBuilder::new("main")
        .strukt("Point", vec![Field::new("X", int())])
        .method_with(
            "Point",
            "Move",
            true,
            vec![Param::new("dx", int())],
            vec![Stmt::Raw("r.X += dx;".to_string())],
        )
        .func("init", vec![], Some(vec![Stmt::Raw("ready = true;".to_string())]))
        .func("main", vec![], Some(vec![]))
        .var("Origin", named("main", "Point"))
        .build();
    let expected = "\
packages[\"main\"] = (function() {
    var Point = function(X_) {
        this._id = _idCounter++;
        this.X = X_;
    };
    Point._tag = \"main.Point\";
    Point.prototype.Move = function(dx) {
        var r = this;
        r.X += dx;
    };
    var init = function() {
        ready = true;
    };
    var main = function() {
    };
    var Origin = new Point(0);
    init();
    main();
    return {
        Origin: Origin,
        Point: Point
    };
})();
";
    assert_eq!(compile_text(&program("main", vec![package])), expected);
}

#[test]
fn test_output_is_deterministic() {
    let build = || {
        program(
            "main",
            vec![
                PackageBuilder::new("lib")
                    .ty("Shape", interface(&["Area"]))
                    .strukt("Square", vec![])
                    .method("Square", "Area", false)
                    .strukt("Circle", vec![])
                    .method("Circle", "Area", true)
                    .build(),
                PackageBuilder::new("main").import("lib").func("main", vec![], Some(vec![])).build(),
            ],
        )
    };
    let first = compile(&build(), &LowerConfig::default());
    let second = compile(&build(), &LowerConfig::default());
    assert_eq!(first.text, second.text);
    assert!(first.text.starts_with("var packages = {};"));
}

#[test]
fn test_diamond_import_is_composed_once() {
    let p = program(
        "main",
        vec![
            PackageBuilder::new("base").build(),
            PackageBuilder::new("a").import("base").build(),
            PackageBuilder::new("b").import("base").build(),
            PackageBuilder::new("main").import("a").import("b").build(),
        ],
    );
    let output = compile(&p, &LowerConfig::without_prelude());
    assert_eq!(output.packages, vec!["base", "a", "b", "main"]);
    assert_eq!(module_count(&output.text, "base"), 1);
    assert!(output.text.contains("    var base = packages[\"base\"];\n"));
}

#[test]
fn test_external_packages_are_bound_but_not_composed() {
    let p = program(
        "main",
        vec![PackageBuilder::new("main").import("reflect").build()],
    );
    let text = compile_text(&p);
    assert!(text.contains("var reflect = packages[\"reflect\"];"));
    assert_eq!(module_count(&text, "reflect"), 0);
}

#[test]
fn test_main_runs_only_in_entry_package() {
    let p = program(
        "main",
        vec![
            PackageBuilder::new("lib").func("main", vec![], Some(vec![])).build(),
            PackageBuilder::new("main").import("lib").build(),
        ],
    );
    let text = compile_text(&p);
    assert!(!text.contains("main();"));
}

#[test]
fn test_natives_replace_missing_bodies() {
    let p = program(
        "main",
        vec![PackageBuilder::new("main")
            .func("Now", vec![], None)
            .build()],
    );
    let config = LowerConfig::without_prelude().with_natives("main", "Now = function() { return Date.now(); };");
    let output = compile(&p, &config);
    let stub = "    var Now = function() {\n        throw new GoError(\"Native function not implemented: Now\");\n    };\n";
    let native = "Now = function() { return Date.now(); };\n";
    let stub_at = output.text.find(stub).unwrap_or_else(|| panic!("no stub in {}", output.text));
    let native_at = output.text.find(native).unwrap_or_else(|| panic!("no natives in {}", output.text));
    assert!(stub_at < native_at);
}

#[test]
fn test_exports_use_allocated_bindings() {
    let p = program(
        "main",
        vec![PackageBuilder::new("main")
            .ty("String", int())
            .func("helper", vec![], Some(vec![]))
            .build()],
    );
    let text = compile_text(&p);
    assert!(text.contains("var String1 = function(v) { this.v = v; };"));
    assert!(text.contains("    return {\n        String: String1\n    };\n"));
    assert!(!text.contains("helper: "));
}

#[test]
fn test_implementers_from_importing_package_are_included() {
    let p = program(
        "main",
        vec![
            PackageBuilder::new("lib").ty("Shape", interface(&["Area"])).build(),
            PackageBuilder::new("main")
                .import("lib")
                .strukt("Square", vec![])
                .method("Square", "Area", false)
                .build(),
        ],
    );
    let text = compile_text(&p);
    assert!(text.contains("var Shape = function(t) { return t === \"main.Square\"; };"));
}

#[test]
fn test_package_failure_keeps_importers() {
    let lib = PackageBuilder::new("lib")
        .strukt("A", vec![])
        .method("A", "M", false)
        .strukt("B", vec![])
        .method("B", "M", false)
        .strukt(
            "Both",
            vec![
                Field::embedded("A", named("lib", "A")),
                Field::embedded("B", named("lib", "B")),
            ],
        )
        .build();
    let main = PackageBuilder::new("main").import("lib").build();
    let output = compile(&program("main", vec![lib, main]), &LowerConfig::without_prelude());
    assert_eq!(output.packages, vec!["main"]);
    assert_eq!(module_count(&output.text, "lib"), 0);
    assert!(output.fatal.is_none());
    assert!(output.has_errors());
    let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E4002]);
}

#[test]
fn test_check_problems_are_deduplicated() {
    let mut lib = PackageBuilder::new("lib").build();
    for _ in 0..3 {
        lib.problems.push(CheckProblem {
            kind: ProblemKind::Type,
            message: "undefined: x".to_string(),
        });
    }
    let main = PackageBuilder::new("main").import("lib").build();
    let output = compile(&program("main", vec![lib, main]), &LowerConfig::without_prelude());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E2001);
    assert_eq!(output.diagnostics[0].message, "undefined: x");
    assert_eq!(output.packages, vec!["main"]);
}

#[test]
fn test_import_cycle_aborts_run() {
    let p = program(
        "a",
        vec![
            PackageBuilder::new("a").import("b").build(),
            PackageBuilder::new("b").import("a").build(),
        ],
    );
    let output = compile(&p, &LowerConfig::default());
    assert_eq!(
        output.fatal,
        Some(LowerError::ImportCycle {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        })
    );
    assert!(output.text.is_empty());
    assert_eq!(output.diagnostics.len(), 1);
}

#[test]
fn test_missing_import_aborts_run() {
    let p = program("main", vec![PackageBuilder::new("main").import("gone").build()]);
    let output = compile(&p, &LowerConfig::default());
    assert!(matches!(
        output.fatal,
        Some(LowerError::UnresolvedImport { ref path, ref importer }) if path == "gone" && importer == "main"
    ));
}

/// Run `text` under node and return its stdout, or `None` without node.
fn run_node(text: &str) -> Option<String> {
    let available = Command::new("node")
        .arg("--version")
        .stdout(Stdio::null())
        .status()
        .is_ok_and(|status| status.success());
    if !available {
        eprintln!("node not found; skipping execution check");
        return None;
    }
    let mut child = Command::new("node")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("{e}"));
    child
        .stdin
        .take()
        .unwrap_or_else(|| panic!("node stdin is not piped"))
        .write_all(text.as_bytes())
        .unwrap_or_else(|e| panic!("{e}"));
    let output = child.wait_with_output().unwrap_or_else(|e| panic!("{e}"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "node failed:\n{stderr}");
    Some(String::from_utf8(output.stdout).unwrap_or_else(|e| panic!("{e}")))
}

#[test]
fn test_pointer_boxes_round_trip_under_node() {
    let adder = Type::Interface(vec![MethodSig::new(
        "Add",
        Signature::new(vec![int()], vec![]),
    )]);
    let package = PackageBuilder::new("main")
        .ty("Counter", int())
        .method_with(
            "Counter",
            "Add",
            true,
            vec![Param::new("n", int())],
            vec![Stmt::Raw("r.set(r.get() + n);".to_string())],
        )
        .method_with("Counter", "Get", false, vec![], vec![Stmt::Raw("return r;".to_string())])
        .strukt("Holder", vec![Field::embedded("Counter", named("main", "Counter"))])
        .ty("Adder", adder)
        .func(
            "main",
            vec![],
            Some(vec![
                Stmt::Raw("var c = new Counter(7);".to_string()),
                Stmt::Raw("c.Add(1);".to_string()),
                Stmt::Raw("var h = new Holder(0);".to_string()),
                Stmt::Raw("h.Add(2);".to_string()),
                Stmt::Raw("h.Add(3);".to_string()),
                Stmt::Raw("console.log(c.v, c.Get(), h.Counter, h.Get());".to_string()),
                Stmt::Raw(
                    "console.log(Adder(Holder._tag), Adder(Counter._tag), Adder(Counter._Pointer._tag));"
                        .to_string(),
                ),
            ]),
        )
        .build();
    let output = compile(&program("main", vec![package]), &LowerConfig::default());
    assert!(!output.has_errors(), "unexpected errors: {:?}", output.diagnostics);
    let Some(stdout) = run_node(&output.text) else {
        return;
    };
    assert_eq!(stdout, "8 8 5 5\ntrue false true\n");
}
