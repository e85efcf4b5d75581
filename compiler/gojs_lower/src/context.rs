//! Per-package composition state.
//!
//! A `PackageCx` lives for exactly one package: it owns that package's
//! [`NameAllocator`], its table of package-level bindings, its import
//! bindings, and the output buffer the module text is written into.

use gojs_ir::{is_blank, ObjectRef, Package, Program, Type, TypeRef, TypeUniverse};
use rustc_hash::FxHashMap;

use crate::emitter::{js_string, Emitter};
use crate::names::{is_reserved, NameAllocator};
use crate::LowerError;

pub struct PackageCx<'a> {
    pub program: &'a Program,
    pub package: &'a Package,
    names: NameAllocator,
    /// Go name of a package-level object -> its binding in the module scope.
    bindings: FxHashMap<String, String>,
    /// Import path -> binding of the imported module.
    imports: FxHashMap<String, String>,
    /// Locals that collide with reserved names -> their replacement.
    renamed_locals: FxHashMap<String, String>,
    /// Result types of the function whose body is being lowered.
    results: Vec<Type>,
    out: Emitter,
}

impl<'a> PackageCx<'a> {
    pub fn new(program: &'a Program, package: &'a Package) -> Self {
        PackageCx {
            program,
            package,
            names: NameAllocator::new(),
            bindings: FxHashMap::default(),
            imports: FxHashMap::default(),
            renamed_locals: FxHashMap::default(),
            results: Vec::new(),
            out: Emitter::new(),
        }
    }

    pub fn universe(&self) -> &'a TypeUniverse {
        self.program.universe()
    }

    /// Import path of the package being composed.
    pub fn path(&self) -> &'a str {
        &self.package.path
    }

    /// Allocate a fresh module-scope name.
    pub fn fresh(&mut self, prefix: &str) -> String {
        self.names.allocate(prefix)
    }

    /// Allocate every package-level binding up front, so declarations can
    /// refer to each other regardless of emission order.
    ///
    /// Order: imports, types, functions, globals. Each `init` function gets
    /// its own fresh binding; those are returned in declaration order.
    pub fn bind_declarations(&mut self) -> Vec<String> {
        let package = self.package;
        for import in &package.imports {
            self.bind_import(&import.path, &import.name);
        }
        for decl in &package.types {
            self.bind(&decl.name);
        }
        let mut inits = Vec::new();
        for func in package.functions() {
            if func.name == "init" {
                inits.push(self.fresh("init"));
            } else {
                self.bind(&func.name);
            }
        }
        for spec in &package.values {
            for value in &spec.names {
                if !is_blank(&value.name) {
                    self.bind(&value.name);
                }
            }
        }
        tracing::trace!(
            path = %package.path,
            bindings = self.bindings.len(),
            "allocated package bindings"
        );
        inits
    }

    /// Allocate and record the binding for package-level object `name`.
    pub fn bind(&mut self, name: &str) -> String {
        let binding = self.names.allocate(name);
        self.bindings.insert(name.to_string(), binding.clone());
        binding
    }

    /// Allocate and record the binding for an imported package.
    pub fn bind_import(&mut self, path: &str, name: &str) -> String {
        let binding = self.names.allocate(name);
        self.imports.insert(path.to_string(), binding.clone());
        binding
    }

    /// Binding of a package-level object declared in this package.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Binding of an imported package, if imported directly.
    pub fn import_binding(&self, path: &str) -> Option<&str> {
        self.imports.get(path).map(String::as_str)
    }

    /// Name a parameter or local variable gets in generated code.
    ///
    /// Names that hit a reserved word are renamed, consistently for the
    /// whole package.
    pub fn local(&mut self, name: &str) -> String {
        if !is_reserved(name) {
            return name.to_string();
        }
        if let Some(renamed) = self.renamed_locals.get(name) {
            return renamed.clone();
        }
        let renamed = self.names.allocate(name);
        self.renamed_locals.insert(name.to_string(), renamed.clone());
        renamed
    }

    /// Generated name for an optional parameter name; blank or missing
    /// parameters get a fresh `param` name.
    pub fn param(&mut self, name: Option<&str>) -> String {
        match name {
            Some(name) if !is_blank(name) => self.local(name),
            _ => self.fresh("param"),
        }
    }

    /// Reference to a package-level object of `package` from this module.
    pub fn qualified(&self, package: &str, name: &str) -> Result<String, LowerError> {
        if package == self.package.path {
            return self.binding(name).map(str::to_string).ok_or_else(|| {
                LowerError::unsupported(
                    self.path(),
                    "identifier",
                    format!("`{name}` is not declared in this package"),
                )
            });
        }
        Ok(match self.import_binding(package) {
            Some(binding) => format!("{binding}.{name}"),
            None => format!("packages[{}].{name}", js_string(package)),
        })
    }

    /// Constructor expression for a named type.
    pub fn type_name(&self, r: &TypeRef) -> Result<String, LowerError> {
        self.qualified(&r.package, &r.name)
    }

    /// Text of an identifier reference.
    pub fn object(&mut self, object: &ObjectRef) -> Result<String, LowerError> {
        match object {
            ObjectRef::Package { package, name } => self.qualified(package, name),
            ObjectRef::Local(name) => Ok(self.local(name)),
            ObjectRef::Builtin(builtin) => Ok(builtin.name().to_string()),
            ObjectRef::Nil => Ok("null".to_string()),
        }
    }

    /// Run `f` with `results` as the enclosing function's result types.
    pub fn in_function<T>(
        &mut self,
        results: &[Type],
        f: impl FnOnce(&mut Self) -> Result<T, LowerError>,
    ) -> Result<T, LowerError> {
        let saved = std::mem::replace(&mut self.results, results.to_vec());
        let result = f(self);
        self.results = saved;
        result
    }

    pub fn results(&self) -> &[Type] {
        &self.results
    }

    pub fn out(&mut self) -> &mut Emitter {
        &mut self.out
    }

    pub fn writeln(&mut self, s: &str) {
        self.out.writeln(s);
    }

    pub fn indent(&mut self) {
        self.out.indent();
    }

    pub fn dedent(&mut self) {
        self.out.dedent();
    }

    /// Run `f` against a fresh buffer and return what it wrote.
    pub fn capture<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, LowerError>,
    ) -> Result<String, LowerError> {
        let saved = std::mem::take(&mut self.out);
        let result = f(self);
        let captured = std::mem::replace(&mut self.out, saved).take_output();
        result.map(|_| captured)
    }

    pub fn take_output(&mut self) -> String {
        self.out.take_output()
    }
}
