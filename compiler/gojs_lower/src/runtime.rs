//! Runtime support text.
//!
//! Generated modules refer to these constructors and helpers by fixed
//! names (see [`crate::names::RESERVED`]). A different runtime can be
//! supplied through [`LowerConfig::prelude`](crate::LowerConfig) as long
//! as it defines the same names.

/// Name of the base constructor for sequences.
pub const SLICE: &str = "Slice";
/// Name of the base constructor for maps.
pub const MAP: &str = "Go$Map";
/// Buffer-clearing helper used by array zero values.
pub const CLEAR: &str = "Go$clear";
/// Writes the leading elements of an array literal over a zeroed buffer.
pub const FILL: &str = "Go$fill";
/// Converts a string to its byte sequence when spread into a variadic call.
pub const STRING_TO_SLICE: &str = "Go$stringToSlice";
/// Pointer box for locations whose type has no box of its own.
pub const POINTER: &str = "Go$Pointer";
pub const APPEND: &str = "Go$append";
pub const LEN: &str = "Go$len";
pub const PANIC: &str = "Go$panic";
pub const PRINT: &str = "Go$print";
pub const PRINTLN: &str = "Go$println";

pub const PRELUDE: &str = r#"var packages = {};
var _idCounter = 0;

var GoError = function(message) {
    this.message = message;
    this.stack = (new Error(message)).stack;
};
GoError.prototype = Object.create(Error.prototype);
GoError.prototype.name = "GoError";

var Go$clear = function(array, zero) {
    if (zero === undefined) {
        zero = 0;
    }
    for (var i = 0; i < array.length; i++) {
        array[i] = typeof zero === "function" ? zero() : zero;
    }
    return array;
};

var Integer = function(v) { this.v = v; };
Integer._tag = "int";
var Float = function(v) { this.v = v; };
Float._tag = "float64";
var Complex = function(real, imag) { this.real = real; this.imag = imag; };
Complex._tag = "complex128";
Boolean._tag = "bool";
String._tag = "string";

var Go$Pointer = function(getter, setter) { this.get = getter; this.set = setter; };
Go$Pointer._tag = "*";

var Slice = function(data, length, capacity) {
    if (data === undefined) {
        data = [];
    }
    this.array = data;
    this.offset = 0;
    this.length = length === undefined ? data.length : length;
    this.capacity = capacity === undefined ? data.length : capacity;
};
Slice.prototype.get = function(index) {
    if (index < 0 || index >= this.length) {
        throw new GoError("index out of range");
    }
    return this.array[this.offset + index];
};
Slice.prototype.set = function(index, value) {
    if (index < 0 || index >= this.length) {
        throw new GoError("index out of range");
    }
    this.array[this.offset + index] = value;
};
Slice.prototype.subslice = function(begin, end) {
    var s = new this.constructor(this.array);
    s.offset = this.offset + begin;
    s.length = (end === undefined ? this.length : end) - begin;
    s.capacity = this.capacity - begin;
    return s;
};
Slice.prototype.toArray = function() {
    var result = [];
    for (var i = 0; i < this.length; i++) {
        result.push(this.array[this.offset + i]);
    }
    return result;
};

var Go$fill = function(array, items) {
    for (var i = 0; i < items.length; i++) {
        array[i] = items[i];
    }
    return array;
};

var Go$stringToSlice = function(s) {
    var bytes = new Uint8Array(s.length);
    for (var i = 0; i < s.length; i++) {
        bytes[i] = s.charCodeAt(i) & 0xff;
    }
    return new Slice(bytes);
};

var Go$Map = function(data) {
    this.data = data || {};
};
Go$Map.prototype.get = function(key, zero) {
    var entry = this.data[key];
    return entry === undefined ? zero : entry.v;
};
Go$Map.prototype.set = function(key, value) {
    this.data[key] = { k: key, v: value };
};
Go$Map.prototype.remove = function(key) {
    delete this.data[key];
};

var Channel = function(capacity) {
    this.capacity = capacity || 0;
    this.buffer = [];
};

var Go$len = function(v) {
    if (v === null || v === undefined) {
        return 0;
    }
    if (v instanceof Go$Map) {
        return Object.keys(v.data).length;
    }
    return v.length;
};

var Go$append = function(slice, items) {
    var data = slice === null ? [] : slice.toArray();
    var extra = items.toArray();
    var result = Array.prototype.slice.call(data).concat(Array.prototype.slice.call(extra));
    var constructor = slice === null ? Slice : slice.constructor;
    return new constructor(result);
};

var Go$panic = function(value) {
    throw new GoError(String(value));
};

var Go$print = function(args) {
    if (typeof process !== "undefined") {
        process.stderr.write(args.toArray().join(""));
    }
};

var Go$println = function(args) {
    console.log(args.toArray().join(" "));
};
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::is_reserved;

    #[test]
    fn test_prelude_defines_fixed_names() {
        for name in [SLICE, "GoError", "_idCounter", "Channel", "Integer"] {
            assert!(is_reserved(name), "{name} is not reserved");
        }
        for name in [
            SLICE, MAP, CLEAR, FILL, STRING_TO_SLICE, POINTER, APPEND, LEN, PANIC, PRINT, PRINTLN,
            "GoError", "_idCounter", "Channel",
        ] {
            assert!(
                PRELUDE.contains(&format!("var {name} = ")),
                "prelude does not define {name}"
            );
        }
    }
}
