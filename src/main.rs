//! CLI tool to dump and check the tokens of SQL files.

use std::fs::File;
use std::process::ExitCode;

use sqlscan::{Lexer, TokenKind, TokenStream};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: sqlscan <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  tokens  Print every token of the file(s)");
        eprintln!("  check   Check that the file(s) scan without errors");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  sqlscan tokens query.sql");
        eprintln!("  RUST_LOG=sqlscan=trace sqlscan check schema.sql");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if !matches!(command, "tokens" | "check") {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let ok = match command {
            "tokens" => print_tokens(path),
            _ => check(path),
        };
        had_error |= !ok;
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_tokens(path: &str) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{path}: {e}");
            return false;
        }
    };

    let stream = match TokenStream::from_reader(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{path}: {e}");
            return false;
        }
    };

    let mut ok = true;
    for token in stream {
        println!("{}\t{}\t{:?}", token.span.offset, token.kind, token.text);
        if token.kind == TokenKind::Error {
            ok = false;
        }
    }
    ok
}

fn check(path: &str) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{path}: {e}");
            return false;
        }
    };

    let mut lexer = Lexer::from_reader(file);
    let mut count = 0;
    let mut unknown = 0;
    for token in lexer.by_ref().filter(|t| t.kind != TokenKind::Error) {
        count += 1;
        if token.kind == TokenKind::Unknown {
            unknown += 1;
        }
    }

    match lexer.take_error() {
        Some(e) => {
            eprintln!("{path}: {e}");
            false
        }
        None => {
            eprintln!("{path}: ok ({count} token(s), {unknown} unknown)");
            true
        }
    }
}
