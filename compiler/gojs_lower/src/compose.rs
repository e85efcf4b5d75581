//! Package composition.
//!
//! [`CompilationContext`] walks the import graph from the entry package,
//! composing each package after its imports and exactly once. A
//! [`PackageComposer`] turns one package into one module block:
//!
//! ```text
//! packages["path"] = (function() {
//!     imports, types and methods, functions, globals, natives,
//!     init and main calls
//!     return { Exported: binding, ... };
//! })();
//! ```

use gojs_diagnostic::{Diagnostic, DiagnosticQueue};
use gojs_ir::{is_exported, FuncDecl, Package, ProblemKind, Program, TypeRef};
use rustc_hash::FxHashMap;

use crate::context::PackageCx;
use crate::embed::forward_embedded;
use crate::emitter::{js_string, Emitter};
use crate::globals::emit_globals;
use crate::interfaces::InterfaceResolver;
use crate::load::COMMAND_LINE;
use crate::lowering::{BasicLowering, Lowering};
use crate::methods::{compile_methods, MethodTable};
use crate::repr::Repr;
use crate::types::compile_type;
use crate::{ErrorScope, LowerConfig, LowerError};

/// Result of one compilation run.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// Prelude followed by one module per composed package, imports first.
    /// Empty when the run was aborted.
    pub text: String,
    /// Import paths of the composed packages, in output order.
    pub packages: Vec<String>,
    /// Deduplicated diagnostics, in the order they were reported.
    pub diagnostics: Vec<Diagnostic>,
    /// The error that aborted the whole run, if any.
    pub fatal: Option<LowerError>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.fatal.is_some() || self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Compile `program` with the basic lowering service.
pub fn compile(program: &Program, config: &LowerConfig) -> CompileOutput {
    compile_with(program, config, &BasicLowering)
}

/// Compile `program`, lowering bodies and initializers with `lowering`.
pub fn compile_with(
    program: &Program,
    config: &LowerConfig,
    lowering: &dyn Lowering,
) -> CompileOutput {
    let mut cx = CompilationContext::new(program, config, lowering);
    let result = cx.compose(program.entry(), COMMAND_LINE);
    cx.finish(result.err())
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum PackageState {
    InProgress,
    Composed,
    Failed,
}

/// State of one compilation run, threaded through the import walk.
pub struct CompilationContext<'a> {
    program: &'a Program,
    config: &'a LowerConfig,
    lowering: &'a dyn Lowering,
    resolver: InterfaceResolver<'a>,
    states: FxHashMap<String, PackageState>,
    /// Packages being composed, outermost first.
    stack: Vec<String>,
    modules: Vec<String>,
    packages: Vec<String>,
    diagnostics: DiagnosticQueue,
}

impl<'a> CompilationContext<'a> {
    pub fn new(program: &'a Program, config: &'a LowerConfig, lowering: &'a dyn Lowering) -> Self {
        CompilationContext {
            program,
            config,
            lowering,
            resolver: InterfaceResolver::new(program.universe()),
            states: FxHashMap::default(),
            stack: Vec::new(),
            modules: Vec::new(),
            packages: Vec::new(),
            diagnostics: DiagnosticQueue::new(),
        }
    }

    /// Compose `path` after everything it imports.
    ///
    /// Package-scoped failures are recorded as diagnostics and leave the
    /// package out of the output; run-scoped failures are returned.
    pub fn compose(&mut self, path: &str, importer: &str) -> Result<(), LowerError> {
        if self.config.is_external(path) {
            return Ok(());
        }
        match self.states.get(path) {
            Some(PackageState::InProgress) => {
                let start = self.stack.iter().position(|p| p == path).unwrap_or(0);
                let mut cycle = self.stack[start..].to_vec();
                cycle.push(path.to_string());
                return Err(LowerError::ImportCycle { cycle });
            }
            Some(state) => {
                tracing::trace!(path, ?state, "package already visited");
                return Ok(());
            }
            None => {}
        }
        let program = self.program;
        let package = program
            .package(path)
            .ok_or_else(|| LowerError::UnresolvedImport {
                path: path.to_string(),
                importer: importer.to_string(),
            })?;

        let span = tracing::debug_span!("compose_package", path);
        let _guard = span.enter();

        self.states.insert(path.to_string(), PackageState::InProgress);
        self.stack.push(path.to_string());
        for import in &package.imports {
            self.compose(&import.path, path)?;
        }
        self.stack.pop();

        let problems = problems_of(package);
        if !problems.is_empty() {
            self.diagnostics
                .extend(problems.iter().map(LowerError::to_diagnostic));
            tracing::debug!(path, problems = problems.len(), "package has check problems");
            self.states.insert(path.to_string(), PackageState::Failed);
            return Ok(());
        }

        let composer = PackageComposer {
            program,
            config: self.config,
            lowering: self.lowering,
            package,
        };
        match composer.compose(&mut self.resolver) {
            Ok(module) => {
                tracing::debug!(path, bytes = module.len(), "composed package");
                self.modules.push(module);
                self.packages.push(path.to_string());
                self.states.insert(path.to_string(), PackageState::Composed);
                Ok(())
            }
            Err(err) if err.scope() == ErrorScope::Package => {
                tracing::debug!(path, %err, "package failed");
                self.diagnostics.add(err.to_diagnostic());
                self.states.insert(path.to_string(), PackageState::Failed);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Assemble the output. A `fatal` error discards the text.
    pub fn finish(mut self, fatal: Option<LowerError>) -> CompileOutput {
        if let Some(err) = &fatal {
            self.diagnostics.add(err.to_diagnostic());
        }
        let text = if fatal.is_some() {
            String::new()
        } else {
            let mut out = Emitter::new();
            if self.config.emit_prelude {
                out.write_verbatim(&self.config.prelude);
            }
            for module in &self.modules {
                out.write_verbatim(module);
            }
            out.take_output()
        };
        CompileOutput {
            text,
            packages: self.packages,
            diagnostics: self.diagnostics.flush(),
            fatal,
        }
    }
}

/// Problems the front end reported for `package`, as errors.
fn problems_of(package: &Package) -> Vec<LowerError> {
    package
        .problems
        .iter()
        .map(|problem| match problem.kind {
            ProblemKind::Syntax => LowerError::Syntax {
                package: package.path.clone(),
                message: problem.message.clone(),
            },
            ProblemKind::Type => LowerError::TypeCheck {
                package: package.path.clone(),
                message: problem.message.clone(),
            },
        })
        .collect()
}

/// Emits the module block of one package.
pub struct PackageComposer<'a> {
    pub program: &'a Program,
    pub config: &'a LowerConfig,
    pub lowering: &'a dyn Lowering,
    pub package: &'a Package,
}

impl<'a> PackageComposer<'a> {
    pub fn compose(&self, resolver: &mut InterfaceResolver<'_>) -> Result<String, LowerError> {
        let package = self.package;
        let mut cx = PackageCx::new(self.program, package);
        let inits = cx.bind_declarations();

        cx.writeln(&format!(
            "packages[{}] = (function() {{",
            js_string(&package.path)
        ));
        cx.indent();

        for import in &package.imports {
            if let Some(binding) = cx.import_binding(&import.path) {
                let line = format!("var {binding} = packages[{}];", js_string(&import.path));
                cx.writeln(&line);
            }
        }

        for decl in &package.types {
            let repr = compile_type(&mut cx, resolver, decl)?;
            if repr == Repr::Predicate {
                continue;
            }
            let r = TypeRef::new(&package.path, &decl.name);
            let mut table = MethodTable::new();
            compile_methods(&mut cx, self.lowering, decl, repr, &mut table)?;
            if repr == Repr::Object {
                forward_embedded(&mut cx, &r, &mut table)?;
            }
            let binding = cx.type_name(&r)?;
            table.emit(&mut cx, &binding);
        }

        let mut init_bindings = inits.iter();
        for func in package.functions() {
            let binding = if func.name == "init" {
                init_bindings.next().cloned()
            } else {
                cx.binding(&func.name).map(str::to_string)
            };
            let Some(binding) = binding else {
                return Err(LowerError::unsupported(
                    &package.path,
                    "function",
                    format!("`{}` has no binding", func.name),
                ));
            };
            self.function(&mut cx, func, &binding)?;
        }

        emit_globals(&mut cx, self.lowering)?;

        if let Some(natives) = self.config.natives.get(&package.path) {
            cx.out().write_verbatim(natives);
        }

        for init in &inits {
            cx.writeln(&format!("{init}();"));
        }
        if package.path == self.program.entry() && package.declares_func("main") {
            let main = cx.qualified(&package.path, "main")?;
            cx.writeln(&format!("{main}();"));
        }

        self.exports(&mut cx)?;
        cx.dedent();
        cx.writeln("})();");
        Ok(cx.take_output())
    }

    fn function(
        &self,
        cx: &mut PackageCx<'_>,
        func: &FuncDecl,
        binding: &str,
    ) -> Result<(), LowerError> {
        let params: Vec<String> = func
            .params
            .iter()
            .map(|p| cx.param(p.name.as_deref()))
            .collect();
        cx.writeln(&format!(
            "var {binding} = function({}) {{",
            params.join(", ")
        ));
        cx.indent();
        match &func.body {
            Some(stmts) => cx.in_function(&func.results, |cx| self.lowering.body(cx, stmts))?,
            None => {
                let message = format!("Native function not implemented: {}", func.name);
                cx.writeln(&format!("throw new GoError({});", js_string(&message)));
            }
        }
        cx.dedent();
        cx.writeln("};");
        Ok(())
    }

    /// `return { Name: binding, ... };` over the exported names, sorted.
    fn exports(&self, cx: &mut PackageCx<'_>) -> Result<(), LowerError> {
        let package = self.package;
        let mut names: Vec<&str> = package
            .declared_names()
            .filter(|name| is_exported(name))
            .collect();
        names.sort_unstable();
        names.dedup();
        if names.is_empty() {
            cx.writeln("return {};");
            return Ok(());
        }
        let entries = names
            .iter()
            .map(|name| Ok(format!("{name}: {}", cx.qualified(&package.path, name)?)))
            .collect::<Result<Vec<_>, LowerError>>()?;
        cx.writeln("return {");
        cx.indent();
        let last = entries.len() - 1;
        for (i, entry) in entries.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            cx.writeln(&format!("{entry}{separator}"));
        }
        cx.dedent();
        cx.writeln("};");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
