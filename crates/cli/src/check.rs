use std::path::Path;
use std::process;

use astgen_core::{parser, Definition, ParseHandler};

use crate::{report_error, report_syntax_error, OutputFormat};

/// Counts constructs without generating anything.
#[derive(Default)]
struct CountingHandler {
    commands: usize,
    definitions: usize,
}

impl ParseHandler for CountingHandler {
    fn handle_command(&mut self, _name: &str, _value: &str) {
        self.commands += 1;
    }

    fn handle_definition(&mut self, _def: Definition) {
        self.definitions += 1;
    }
}

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let src = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            report_error(
                &format!("error reading '{}': {}", file.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };
    let filename = file.display().to_string();

    let mut handler = CountingHandler::default();
    match parser::parse(&src, &filename, &mut handler) {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!(
                        "{}: ok ({} definitions, {} commands)",
                        filename, handler.definitions, handler.commands
                    ),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::json!({
                            "file": filename,
                            "definitions": handler.definitions,
                            "commands": handler.commands,
                        })
                    ),
                }
            }
        }
        Err(e) => {
            report_syntax_error(&e, output, quiet);
            process::exit(1);
        }
    }
}
