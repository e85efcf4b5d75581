//! Command-line options.

use std::path::PathBuf;

use gojs_diagnostic::ColorMode;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: gojsc <entry> [options]

<entry> is a checked package file (.json) or a directory holding package.json.

Options:
  -o <file>              Write output to <file> instead of stdout
  -I <dir>               Also resolve imports under <dir> (repeatable)
  --prelude <file>       Use <file> as the runtime prelude
  --no-prelude           Do not emit a runtime prelude
  --natives <dir>        Append <dir>/<import path>.js to each package's module
  --color=<mode>         Diagnostic colors: auto, always, never";

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum OptionsError {
    #[error("missing entry package")]
    MissingEntry,
    #[error("option `{0}` requires a value")]
    MissingValue(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
    #[error("{0}")]
    InvalidColor(String),
}

/// Parsed `gojsc` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub entry: PathBuf,
    pub output: Option<PathBuf>,
    /// Extra import roots, searched after the entry's parent directory.
    pub include: Vec<PathBuf>,
    pub prelude: Option<PathBuf>,
    pub no_prelude: bool,
    pub natives: Option<PathBuf>,
    pub color: ColorMode,
}

impl Options {
    /// Parse the arguments following the program name.
    pub fn parse(args: &[String]) -> Result<Self, OptionsError> {
        let mut entry = None;
        let mut output = None;
        let mut include = Vec::new();
        let mut prelude = None;
        let mut no_prelude = false;
        let mut natives = None;
        let mut color = ColorMode::Auto;

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .map(PathBuf::from)
                    .ok_or_else(|| OptionsError::MissingValue(flag.to_string()))
            };
            match arg.as_str() {
                "-o" => output = Some(value("-o")?),
                "-I" => include.push(value("-I")?),
                "--prelude" => prelude = Some(value("--prelude")?),
                "--natives" => natives = Some(value("--natives")?),
                "--no-prelude" => no_prelude = true,
                other => {
                    if let Some(mode) = other.strip_prefix("--color=") {
                        color = mode.parse().map_err(OptionsError::InvalidColor)?;
                    } else if let Some(dir) = other.strip_prefix("-I").filter(|d| !d.is_empty()) {
                        include.push(PathBuf::from(dir));
                    } else if other.starts_with('-') {
                        return Err(OptionsError::UnknownOption(other.to_string()));
                    } else if entry.is_none() {
                        entry = Some(PathBuf::from(other));
                    } else {
                        return Err(OptionsError::UnexpectedArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Options {
            entry: entry.ok_or(OptionsError::MissingEntry)?,
            output,
            include,
            prelude,
            no_prelude,
            natives,
            color,
        })
    }
}
