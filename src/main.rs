use std::{env, fs, process};

use marlin::desugar::eliminate_structure;
use marlin::fmt;
use marlin::interpreter;
use marlin::lexer::Token;
use marlin::parser::{ParseState, parse};
use marlin::types::infer::infer_structure;

fn main() -> anyhow::Result<()> {
    let mut path = None;
    let mut show_lowered = false;
    let mut run = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--lower" => show_lowered = true,
            "--run" => run = true,
            _ => path = Some(arg),
        }
    }

    let Some(path) = path else {
        eprintln!("usage: marlin <file> [--lower] [--run]");
        process::exit(2);
    };

    let source = fs::read_to_string(&path)?;
    let tokens = Token::lex(&source)?;
    let mut state = ParseState::new(tokens);

    let structure = match parse(&mut state) {
        Ok(structure) => structure,
        Err(e) => {
            println!("{e}");
            process::exit(1);
        }
    };

    match infer_structure(&structure) {
        Ok(bindings) => print!("{}", fmt::types::val_bindings(&bindings)),
        Err(e) => {
            println!("{e}");
            process::exit(1);
        }
    }

    if show_lowered || run {
        let lowered = eliminate_structure(&structure);
        if show_lowered {
            print!("{}", fmt::core::format_structure(&lowered));
        }
        if run {
            match interpreter::run_lowered(&lowered) {
                Ok(output) => print!("{output}"),
                Err(e) => {
                    println!("{e}");
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}
