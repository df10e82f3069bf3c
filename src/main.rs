use std::fs::read_to_string;
use std::io::Write;
use std::path::Path;
use std::process::exit;
use std::{env, io};

use thiserror::Error;

use crate::scanner::tokenize;

mod scanner;
mod token;

#[derive(Debug, Error)]
enum CLIError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("file does not seem to exist {0}")]
    FileDoesNotExist(String),
}

fn main() -> Result<(), color_eyre::eyre::Error> {
    color_eyre::install()?;

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        println!("Too many arguments received ({})", args.len());
        println!("Usage: lox-lexer [script]");
        exit(64);
    }
    if args.len() == 2 {
        run_file(&args[1])?;
    } else {
        run_prompt()?;
    }
    Ok(())
}

fn run_file(path_string: &str) -> Result<(), CLIError> {
    let path = Path::new(path_string);
    if !path.try_exists()? {
        return Err(CLIError::FileDoesNotExist(path_string.to_string()));
    }
    let content = read_to_string(path)?;
    let had_error = run(&content);
    if had_error {
        // the scan itself completed, the source was just not clean
        exit(65);
    }
    Ok(())
}

fn run_prompt() -> Result<(), CLIError> {
    fn prompt() {
        print!("> ");
        io::stdout().flush().unwrap();
    }

    let lines = io::stdin().lines();
    prompt();
    for line in lines {
        // errors are reported and forgotten, the next line starts clean
        run(&line?);
        prompt();
    }
    Ok(())
}

/// scan one source text, report diagnostics, print tokens.
/// Returns whether any diagnostic came up.
fn run(source: &str) -> bool {
    let (tokens, errors) = tokenize(source);
    for error in &errors {
        report(error.get_line(), "", &format!("{error}"));
    }
    for token in tokens {
        println!("{token:?}");
    }
    !errors.is_empty()
}

fn report(line: usize, location: &str, message: &str) {
    println!("[line {line}] Error {location}: {message}")
}
