//! Gojsc - the gojs compiler driver.
//!
//! Reads checked packages from disk, lowers them with `gojs_lower`, and
//! writes the runtime prelude plus one module per package to stdout or a
//! file. Diagnostics go to the diagnostic emitter (stderr from the CLI).

pub mod loader;
pub mod options;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use gojs_diagnostic::{Diagnostic, DiagnosticEmitter};
use gojs_lower::{load_program, CompileOutput, LowerConfig};

pub use loader::{FsLoader, LoadError};
pub use options::{Options, OptionsError, USAGE};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=gojs_lower=debug`
/// or `RUST_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(io::stderr)
                        .with_targets(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn read_text(path: &Path) -> Result<String, Diagnostic> {
    fs::read_to_string(path).map_err(|source| {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
        .to_diagnostic()
    })
}

/// Load the entry's program and lower it.
///
/// Errors that stop the driver before lowering starts (an unreadable
/// entry, a missing import, an unreadable prelude) come back as a single
/// diagnostic.
pub fn compile_entry(options: &Options) -> Result<CompileOutput, Diagnostic> {
    let (mut loader, entry) = FsLoader::for_entry(&options.entry, &options.include)
        .map_err(|err| err.to_diagnostic())?;

    let mut config = LowerConfig::default();
    if options.no_prelude {
        config.emit_prelude = false;
    } else if let Some(prelude) = &options.prelude {
        config.prelude = read_text(prelude)?;
    }

    let program =
        load_program(&entry, &mut loader, &config).map_err(|err| err.to_diagnostic())?;

    if let Some(dir) = &options.natives {
        for package in program.packages() {
            let file = dir.join(format!("{}.js", package.path));
            if file.is_file() {
                tracing::debug!(path = %package.path, file = %file.display(), "natives");
                config
                    .natives
                    .insert(package.path.clone(), read_text(&file)?);
            }
        }
    }

    Ok(gojs_lower::compile(&program, &config))
}

/// Run one compilation, writing the program to `-o` or `stdout`.
///
/// Returns `true` when the run produced no errors.
pub fn run(
    options: &Options,
    stdout: &mut dyn Write,
    emitter: &mut dyn DiagnosticEmitter,
) -> bool {
    let output = match compile_entry(options) {
        Ok(output) => output,
        Err(diag) => {
            emitter.emit(&diag);
            emitter.emit_summary(1, 0);
            emitter.flush();
            return false;
        }
    };

    emitter.emit_all(&output.diagnostics);
    let mut errors = output.diagnostics.iter().filter(|d| d.is_error()).count();

    if output.fatal.is_none() {
        let written = match &options.output {
            Some(path) => fs::write(path, &output.text).map_err(|source| (path.clone(), source)),
            None => stdout
                .write_all(output.text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| (PathBuf::from("<stdout>"), source)),
        };
        if let Err((path, source)) = written {
            emitter.emit(&LoadError::Io { path, source }.to_diagnostic());
            errors += 1;
        }
    }

    if errors > 0 {
        emitter.emit_summary(errors, 0);
    }
    emitter.flush();
    errors == 0 && !output.has_errors()
}
