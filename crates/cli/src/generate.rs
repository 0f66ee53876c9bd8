use std::path::Path;
use std::process;

use astgen_codegen::{ArtifactSink, DirectorySink, Generator, StreamSink};
use astgen_core::parser;

use crate::{report_error, report_syntax_error, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_generate(
    file: &Path,
    out_dir: &Path,
    debug: bool,
    source: Option<String>,
    message: Option<String>,
    output: OutputFormat,
    quiet: bool,
) {
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

    let mut sink: Box<dyn ArtifactSink> = if debug {
        Box::new(StreamSink::new(std::io::stdout()))
    } else {
        Box::new(DirectorySink::new(out_dir))
    };

    let mut gen = Generator::new(sink.as_mut());
    if let Some(s) = &source {
        gen.set_source(s);
    }
    if let Some(m) = &message {
        gen.set_message(m);
    }

    if let Err(e) = parser::parse(&src, &filename, &mut gen) {
        // Artifacts emitted before the failure stay where they are.
        report_syntax_error(&e, output, quiet);
        process::exit(1);
    }
    gen.finish();

    for w in gen.warnings() {
        eprintln!("Warning: {}", w);
    }
    let failed = !gen.emit_failures().is_empty();
    for f in gen.emit_failures() {
        eprintln!("Error: {}", f);
    }

    if !quiet && !debug {
        match output {
            OutputFormat::Text => println!("Generated classes in {}", out_dir.display()),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({ "out_dir": out_dir.display().to_string() })
            ),
        }
    }
    if failed {
        process::exit(1);
    }
}
