//! The Classy compiler CLI.
//!
//! Provides the `classyc` command with the following subcommand:
//!
//! - `classyc check <FILE>` - lex, parse, and type-check a source file
//!
//! Options:
//! - `--pretty` - print the indented AST dump before the verdict line
//! - `--json` - dump the token stream as JSON instead of parsing
//! - `--plain` - render diagnostics as plain text instead of via ariadne

use std::path::{Path, PathBuf};
use std::process;

use ariadne::{Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};

use classy_lexer::Lexer;
use classy_parser::error::ParseError;
use classy_typeck::{Checker, TypeError};

#[derive(Parser)]
#[command(name = "classyc", version, about = "The Classy compiler front end")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex, parse, and type-check a Classy source file
    Check {
        /// Path to the `.classy` source file
        file: PathBuf,

        /// Print the indented AST dump before the verdict line
        #[arg(long)]
        pretty: bool,

        /// Dump the token stream as JSON instead of parsing
        #[arg(long)]
        json: bool,

        /// Render diagnostics as plain text instead of via ariadne
        #[arg(long)]
        plain: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            file,
            pretty,
            json,
            plain,
        } => {
            if let Err(()) = check(&file, pretty, json, plain) {
                process::exit(1);
            }
        }
    }
}

/// Run the `check` subcommand: read `file` and lex/parse/type-check it.
///
/// Returns `Err(())` once a diagnostic has already been printed to stderr;
/// the caller just needs to know whether to set a non-zero exit code.
fn check(file: &Path, pretty: bool, json: bool, plain: bool) -> Result<(), ()> {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: failed to read '{}': {e}", file.display());
            return Err(());
        }
    };

    if json {
        let tokens = Lexer::tokenize(&source);
        match serde_json::to_string_pretty(&tokens) {
            Ok(dump) => {
                println!("{dump}");
                return Ok(());
            }
            Err(e) => {
                eprintln!("error: failed to serialize tokens: {e}");
                return Err(());
            }
        }
    }

    let program = match classy_parser::parse(&source) {
        Ok(program) => program,
        Err(err) => {
            report_parse_error(&err, &source, plain);
            return Err(());
        }
    };

    if pretty {
        print!("{}", classy_parser::printer::print_program(&program));
    }

    if let Err(err) = Checker::check_program(&program) {
        report_type_error(&err, plain);
        return Err(());
    }

    println!("Type checking passed.");
    Ok(())
}

/// Render a parse error, preferring an ariadne source-highlighted report
/// unless `--plain` was passed.
fn report_parse_error(err: &ParseError, source: &str, plain: bool) {
    if plain {
        eprintln!("{err}");
        return;
    }

    let span = err.span();
    let start = span.start as usize;
    let end = (span.end as usize).max(start + 1);

    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_message(err.to_string())
        .with_label(Label::new(start..end).with_message(err.to_string()))
        .finish()
        .eprint(Source::from(source));
}

/// Render a type error. `TypeError` carries no span, so `--plain` and the
/// default both print the same plain-text form (the "ariadne cannot render
/// because the span is missing" fallback).
fn report_type_error(err: &TypeError, _plain: bool) {
    eprintln!("{err}");
}
