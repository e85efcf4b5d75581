//! Indented output buffer for generated text.

use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Append-only text buffer with an indentation level.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    indent: usize,
    output: String,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write multi-line text, indenting every line at the current level.
    ///
    /// Relative indentation inside `text` is kept. Empty lines stay empty.
    pub fn write_block(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.output.push('\n');
            } else {
                self.writeln(line);
            }
        }
    }

    /// Append text exactly as given, ending it with a newline if it lacks one.
    pub fn write_verbatim(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.output.push_str(text);
        if !text.ends_with('\n') {
            self.output.push('\n');
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

/// Quote `s` as a double-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indent_dedent() {
        let mut out = Emitter::new();
        out.writeln("a {");
        out.indent();
        out.writeln("b;");
        out.dedent();
        out.writeln("}");
        assert_eq!(out.take_output(), "a {\n    b;\n}\n");
    }

    #[test]
    fn test_write_block_keeps_relative_indent() {
        let mut out = Emitter::new();
        out.indent();
        out.write_block("f = function() {\n    return 1;\n\n};");
        assert_eq!(
            out.take_output(),
            "    f = function() {\n        return 1;\n\n    };\n"
        );
    }

    #[test]
    fn test_write_verbatim_adds_newline() {
        let mut out = Emitter::new();
        out.indent();
        out.write_verbatim("raw");
        out.write_verbatim("");
        assert_eq!(out.take_output(), "raw\n");
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string("plain"), "\"plain\"");
        assert_eq!(js_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
        assert_eq!(js_string("\u{1}"), "\"\\u0001\"");
    }
}
