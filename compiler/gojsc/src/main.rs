//! Gojs Compiler CLI

use gojs_diagnostic::TerminalEmitter;
use gojsc::{init_tracing, run, Options, USAGE};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }

    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), options.color, is_tty);
    let mut stdout = std::io::stdout().lock();
    if !run(&options, &mut stdout, &mut emitter) {
        std::process::exit(1);
    }
}
