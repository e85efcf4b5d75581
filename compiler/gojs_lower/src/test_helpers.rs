//! Builders for checked packages used across the unit tests.

use gojs_ir::{
    BasicKind, ConstValue, Expr, Field, FuncDecl, Import, ObjectRef, Package, Param, Program,
    Receiver, Signature, Stmt, Type, TypeDecl, ValueKind, ValueName, ValueSpec,
};

pub fn int() -> Type {
    Type::Basic(BasicKind::Int)
}

pub fn int32() -> Type {
    Type::Basic(BasicKind::Int32)
}

pub fn string() -> Type {
    Type::Basic(BasicKind::String)
}

pub fn named(package: &str, name: &str) -> Type {
    Type::named(package, name)
}

pub fn int_lit(n: i64) -> Expr {
    Expr::literal(ConstValue::Int(n), Type::Basic(BasicKind::UntypedInt))
}

pub fn global_ref(package: &str, name: &str, ty: Type) -> Expr {
    Expr::ident(ObjectRef::package(package, name), ty)
}

/// Fluent builder over [`Package`].
pub struct PackageBuilder {
    package: Package,
}

impl PackageBuilder {
    pub fn new(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        PackageBuilder {
            package: Package::new(path, name),
        }
    }

    pub fn import(mut self, path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        self.package.imports.push(Import {
            path: path.to_string(),
            name,
        });
        self
    }

    pub fn ty(mut self, name: &str, underlying: Type) -> Self {
        self.package.types.push(TypeDecl {
            name: name.to_string(),
            underlying,
        });
        self
    }

    pub fn strukt(self, name: &str, fields: Vec<Field>) -> Self {
        self.ty(name, Type::Struct(fields))
    }

    /// Method with no parameters and an empty body.
    pub fn method(self, base: &str, name: &str, pointer: bool) -> Self {
        self.method_with(base, name, pointer, Vec::new(), Vec::new())
    }

    pub fn method_with(
        mut self,
        base: &str,
        name: &str,
        pointer: bool,
        params: Vec<Param>,
        body: Vec<Stmt>,
    ) -> Self {
        self.package.funcs.push(FuncDecl {
            name: name.to_string(),
            receiver: Some(Receiver {
                name: Some("r".to_string()),
                base: base.to_string(),
                pointer,
            }),
            params,
            results: Vec::new(),
            variadic: false,
            body: Some(body),
        });
        self
    }

    pub fn func(mut self, name: &str, params: Vec<Param>, body: Option<Vec<Stmt>>) -> Self {
        self.package.funcs.push(FuncDecl {
            name: name.to_string(),
            receiver: None,
            params,
            results: Vec::new(),
            variadic: false,
            body,
        });
        self
    }

    pub fn value(mut self, kind: ValueKind, names: &[(&str, Type)], values: Vec<Expr>) -> Self {
        self.package.values.push(ValueSpec {
            kind,
            names: names
                .iter()
                .map(|(name, ty)| ValueName::new(*name, ty.clone()))
                .collect(),
            values,
        });
        self
    }

    pub fn constant(self, name: &str, ty: Type, value: Expr) -> Self {
        self.value(ValueKind::Const, &[(name, ty)], vec![value])
    }

    pub fn var(self, name: &str, ty: Type) -> Self {
        self.value(ValueKind::Var, &[(name, ty)], Vec::new())
    }

    pub fn build(self) -> Package {
        self.package
    }
}

/// An interface type with parameterless methods.
pub fn interface(methods: &[&str]) -> Type {
    Type::Interface(
        methods
            .iter()
            .map(|m| gojs_ir::MethodSig::new(*m, Signature::default()))
            .collect(),
    )
}

pub fn program(entry: &str, packages: Vec<Package>) -> Program {
    Program::new(entry, packages)
}
