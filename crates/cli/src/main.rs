mod check;
mod generate;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// AST class generator.
#[derive(Parser)]
#[command(
    name = "astgen",
    version,
    about = "Generate Visitor-pattern Java classes from AST node definitions"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Java classes from a definitions file
    Generate {
        /// Path to the definitions file
        file: PathBuf,

        /// Directory generated files are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Write every artifact to stdout instead of files
        #[arg(long)]
        debug: bool,

        /// Source label recorded in generated file banners
        #[arg(long)]
        source: Option<String>,

        /// Extra banner line prepended to every generated file
        #[arg(long)]
        message: Option<String>,
    },

    /// Parse a definitions file and report problems without generating
    Check {
        /// Path to the definitions file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            file,
            out_dir,
            debug,
            source,
            message,
        } => generate::cmd_generate(&file, &out_dir, debug, source, message, cli.output, cli.quiet),
        Commands::Check { file } => check::cmd_check(&file, cli.output, cli.quiet),
    }
}

/// Report a plain error message per the selected output format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", msg);
            }
        }
    }
}

/// Report a lex/parse error per the selected output format.
pub(crate) fn report_syntax_error(
    e: &astgen_core::SyntaxError,
    output: OutputFormat,
    quiet: bool,
) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", e);
            }
        }
    }
}
