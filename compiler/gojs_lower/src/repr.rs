//! Runtime representation of named types.
//!
//! Struct-shaped types are plain objects whose pointer shares the value's
//! identity. Everything else gets a pointer box, and among those, basic,
//! array, function and channel values are stored raw and only wrapped in
//! their one-field constructor at method-call and interface boundaries.

use gojs_ir::{BasicKind, Kind, Type, TypeUniverse};

/// How values of a named type are represented at runtime.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Repr {
    /// Struct: an object built by the type's constructor.
    Object,
    /// Basic, array, function, channel: a raw value, `new T(v)` when wrapped.
    Wrapped,
    /// Slice: an object subclassing the runtime sequence.
    Sequence,
    /// Map: an object subclassing the runtime dictionary.
    Dictionary,
    /// Interface: a predicate over runtime type tags.
    Predicate,
}

impl Repr {
    /// Classify an underlying type. Returns the offending kind for shapes
    /// a named type cannot have.
    pub fn of_underlying(underlying: &Type) -> Result<Repr, Kind> {
        match underlying {
            Type::Struct(_) => Ok(Repr::Object),
            Type::Basic(_) | Type::Array { .. } | Type::Func(_) | Type::Chan { .. } => {
                Ok(Repr::Wrapped)
            }
            Type::Slice(_) => Ok(Repr::Sequence),
            Type::Map { .. } => Ok(Repr::Dictionary),
            Type::Interface(_) => Ok(Repr::Predicate),
            Type::Named(_) | Type::Pointer(_) | Type::Tuple(_) => Err(underlying.kind()),
        }
    }

    /// Representation of `ty` if it is a known named type.
    pub fn of_named(universe: &TypeUniverse, ty: &Type) -> Option<Repr> {
        let r = ty.as_named()?;
        let named = universe.get(r)?;
        Repr::of_underlying(&named.underlying).ok()
    }

    /// Every non-struct named type carries a pointer box.
    pub fn has_pointer_box(self) -> bool {
        self != Repr::Object
    }

    /// Values are stored without their constructor.
    pub fn is_raw(self) -> bool {
        self == Repr::Wrapped
    }
}

/// Typed-array constructor holding elements of `ty`, for sized numeric kinds.
///
/// Named types with a numeric underlying type are stored raw, so they map
/// to the same buffers as their underlying kind.
pub fn typed_array(universe: &TypeUniverse, ty: &Type) -> Option<&'static str> {
    let kind = universe.underlying(ty).as_basic()?;
    let name = match kind {
        BasicKind::Int8 => "Int8Array",
        BasicKind::Uint8 => "Uint8Array",
        BasicKind::Int16 => "Int16Array",
        BasicKind::Uint16 => "Uint16Array",
        BasicKind::Int | BasicKind::Int32 | BasicKind::Int64 | BasicKind::UntypedInt
        | BasicKind::UntypedRune => "Int32Array",
        BasicKind::Uint | BasicKind::Uint32 | BasicKind::Uint64 | BasicKind::Uintptr => {
            "Uint32Array"
        }
        BasicKind::Float32 => "Float32Array",
        BasicKind::Float64
        | BasicKind::Complex64
        | BasicKind::Complex128
        | BasicKind::UntypedFloat
        | BasicKind::UntypedComplex => "Float64Array",
        _ => return None,
    };
    Some(name)
}

/// A pointer box over an assignable location.
///
/// `get` reads the location; `set` receives the setter's parameter name and
/// returns the statement storing it.
pub fn pointer_box(ctor: &str, get: &str, set: impl FnOnce(&str) -> String) -> String {
    format!(
        "new {ctor}(function() {{ return {get}; }}, function($v) {{ {}; }})",
        set("$v")
    )
}

/// Build a sequence buffer literal from element texts.
pub fn list_composite(universe: &TypeUniverse, elem: &Type, elements: &[String]) -> String {
    let items = elements.join(", ");
    match typed_array(universe, elem) {
        Some(array) => format!("new {array}([{items}])"),
        None => format!("[{items}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gojs_ir::{Field, Package, TypeDecl};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification() {
        let int = Type::Basic(BasicKind::Int);
        assert_eq!(Repr::of_underlying(&Type::Struct(vec![])), Ok(Repr::Object));
        assert_eq!(Repr::of_underlying(&int), Ok(Repr::Wrapped));
        assert_eq!(Repr::of_underlying(&Type::array(int.clone(), 4)), Ok(Repr::Wrapped));
        assert_eq!(Repr::of_underlying(&Type::slice(int.clone())), Ok(Repr::Sequence));
        assert_eq!(Repr::of_underlying(&Type::any()), Ok(Repr::Predicate));
        assert_eq!(Repr::of_underlying(&Type::pointer(int)), Err(Kind::Pointer));
        assert!(!Repr::Object.has_pointer_box());
        assert!(Repr::Predicate.has_pointer_box());
    }

    #[test]
    fn test_typed_arrays_follow_underlying() {
        let mut package = Package::new("main", "main");
        package.types.push(TypeDecl {
            name: "Celsius".to_string(),
            underlying: Type::Basic(BasicKind::Float32),
        });
        package.types.push(TypeDecl {
            name: "P".to_string(),
            underlying: Type::Struct(vec![Field::new("X", Type::Basic(BasicKind::Int))]),
        });
        let universe = TypeUniverse::from_packages([&package]);
        assert_eq!(
            typed_array(&universe, &Type::named("main", "Celsius")),
            Some("Float32Array")
        );
        assert_eq!(typed_array(&universe, &Type::Basic(BasicKind::Int64)), Some("Int32Array"));
        assert_eq!(typed_array(&universe, &Type::Basic(BasicKind::String)), None);
        assert_eq!(typed_array(&universe, &Type::named("main", "P")), None);
    }

    #[test]
    fn test_pointer_box_text() {
        assert_eq!(
            pointer_box("T._Pointer", "obj.v", |v| format!("obj.v = {v}")),
            "new T._Pointer(function() { return obj.v; }, function($v) { obj.v = $v; })"
        );
    }

    #[test]
    fn test_list_composite() {
        let universe = TypeUniverse::new();
        let items = vec!["1".to_string(), "2".to_string()];
        assert_eq!(
            list_composite(&universe, &Type::Basic(BasicKind::Uint8), &items),
            "new Uint8Array([1, 2])"
        );
        assert_eq!(
            list_composite(&universe, &Type::any(), &items),
            "[1, 2]"
        );
    }
}
