//! # CLI
//!
//! Entry point of the `parsley-json` binary: reads a JSON document, evaluates it with the
//! combinator grammar from [`crate::json`] and prints the value back as JSON.

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::engine::evaluate_with_history;
use crate::parser::History;
use crate::text::{File, ReaderOptions};
use crate::ParsleyError;

// ============================================================================
// CLI ARGUMENTS
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "parsley-json",
    version,
    about = "Parse a JSON document with a combinator grammar and print the evaluated value."
)]
pub struct JsonArgs {
    /// The JSON file to read. Reads standard input when omitted.
    pub file: Option<PathBuf>,

    /// Treat whitespace as significant instead of skipping it between tokens.
    #[arg(long)]
    pub keep_whitespace: bool,

    /// Report the number of parser calls on standard error.
    #[arg(long)]
    pub calls: bool,
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

pub fn run() {
    let args = JsonArgs::parse();
    process::exit(execute(&args));
}

/// Runs one invocation and returns the process exit code.
pub fn execute(args: &JsonArgs) -> i32 {
    let file = match read_input(args.file.as_ref()) {
        Ok(file) => file,
        Err(message) => {
            eprintln!("error: {}", message);
            return 1;
        }
    };

    let grammar = match crate::json::grammar() {
        Ok(grammar) => grammar,
        Err(e) => {
            print_error(&file, e);
            return 1;
        }
    };

    let options = ReaderOptions {
        ignore_whitespace: !args.keep_whitespace,
    };
    let mut history = History::new();
    let result = evaluate_with_history(&grammar, &mut history, &file.reader(options), &());
    if args.calls {
        eprintln!("parser calls: {}", history.call_count());
    }

    let value = match result {
        Ok(value) => value,
        Err(e) => {
            print_error(&file, e);
            return 1;
        }
    };

    match serde_json::to_string_pretty(&value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("error: cannot serialize value: {}", e);
            1
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn print_error(file: &File, err: ParsleyError) {
    let trailing = matches!(err, ParsleyError::TrailingInput { .. });
    let mut diagnostic = file.diagnostic(err);
    if trailing {
        diagnostic = diagnostic.with_help("a JSON document holds exactly one value");
    }
    let report = miette::Report::new(diagnostic);
    eprintln!("{report:?}");
}

fn read_input(path: Option<&PathBuf>) -> Result<File, String> {
    match path {
        Some(path) => File::read(path).map_err(|e| format!("cannot read {}: {}", path.display(), e)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("cannot read standard input: {}", e))?;
            Ok(File::new("<stdin>", text))
        }
    }
}
