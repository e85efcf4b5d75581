//! Basic (predeclared) types and their classification flags.
//!
//! Mirrors the checker's notion of basic kinds: every sized and unsized
//! integer, floats, complexes, strings, booleans, and the untyped constant
//! kinds that only appear on constant expressions.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Properties of a basic kind, queried instead of matching on kinds.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct BasicInfo: u16 {
        const BOOLEAN = 1 << 0;
        const INTEGER = 1 << 1;
        const UNSIGNED = 1 << 2;
        const FLOAT = 1 << 3;
        const COMPLEX = 1 << 4;
        const STRING = 1 << 5;
        const UNTYPED = 1 << 6;

        const NUMERIC = Self::INTEGER.bits() | Self::FLOAT.bits() | Self::COMPLEX.bits();
        const ORDERED = Self::INTEGER.bits() | Self::FLOAT.bits() | Self::STRING.bits();
        const CONST_TYPE = Self::BOOLEAN.bits() | Self::NUMERIC.bits() | Self::STRING.bits();
    }
}

/// A predeclared basic type.
///
/// `byte` and `rune` are aliases and resolve to `Uint8` and `Int32`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,

    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    /// Classification flags for this kind.
    pub const fn info(self) -> BasicInfo {
        match self {
            BasicKind::Bool => BasicInfo::BOOLEAN,
            BasicKind::Int
            | BasicKind::Int8
            | BasicKind::Int16
            | BasicKind::Int32
            | BasicKind::Int64 => BasicInfo::INTEGER,
            BasicKind::Uint
            | BasicKind::Uint8
            | BasicKind::Uint16
            | BasicKind::Uint32
            | BasicKind::Uint64
            | BasicKind::Uintptr => BasicInfo::INTEGER.union(BasicInfo::UNSIGNED),
            BasicKind::Float32 | BasicKind::Float64 => BasicInfo::FLOAT,
            BasicKind::Complex64 | BasicKind::Complex128 => BasicInfo::COMPLEX,
            BasicKind::String => BasicInfo::STRING,
            BasicKind::UnsafePointer | BasicKind::UntypedNil => BasicInfo::empty(),
            BasicKind::UntypedBool => BasicInfo::BOOLEAN.union(BasicInfo::UNTYPED),
            BasicKind::UntypedInt | BasicKind::UntypedRune => {
                BasicInfo::INTEGER.union(BasicInfo::UNTYPED)
            }
            BasicKind::UntypedFloat => BasicInfo::FLOAT.union(BasicInfo::UNTYPED),
            BasicKind::UntypedComplex => BasicInfo::COMPLEX.union(BasicInfo::UNTYPED),
            BasicKind::UntypedString => BasicInfo::STRING.union(BasicInfo::UNTYPED),
        }
    }

    pub fn is_numeric(self) -> bool {
        self.info().intersects(BasicInfo::NUMERIC)
    }

    pub fn is_integer(self) -> bool {
        self.info().contains(BasicInfo::INTEGER)
    }

    pub fn is_string(self) -> bool {
        self.info().contains(BasicInfo::STRING)
    }

    pub fn is_boolean(self) -> bool {
        self.info().contains(BasicInfo::BOOLEAN)
    }

    /// Source-level spelling of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedComplex => "untyped complex",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_kinds_are_integers() {
        for kind in [BasicKind::Uint8, BasicKind::Uint64, BasicKind::Uintptr] {
            assert!(kind.is_integer(), "{kind} should be an integer");
            assert!(kind.info().contains(BasicInfo::UNSIGNED));
        }
        assert!(!BasicKind::Int32.info().contains(BasicInfo::UNSIGNED));
    }

    #[test]
    fn numeric_covers_float_and_complex() {
        assert!(BasicKind::Float32.is_numeric());
        assert!(BasicKind::Complex128.is_numeric());
        assert!(BasicKind::UntypedRune.is_numeric());
        assert!(!BasicKind::String.is_numeric());
        assert!(!BasicKind::Bool.is_numeric());
    }

    #[test]
    fn untyped_string_is_string() {
        assert!(BasicKind::UntypedString.is_string());
        assert!(BasicKind::UntypedString.info().contains(BasicInfo::UNTYPED));
        assert!(BasicKind::UntypedNil.info().is_empty());
    }
}
