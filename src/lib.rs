pub mod util;
pub mod interpreter;

use std::path::PathBuf;
use clap::Parser as ClapParser;
use crate::interpreter::evaluator::Interpreter;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(default_value = "main.turtle", help = "Turtle program to run")]
    pub input: PathBuf,

    #[clap(long, help = "Emit the negated angle for both turn directions, like the original implementation")]
    pub legacy_turns: bool,

    #[clap(short, long, help = "Print the parsed program to stderr before running it")]
    pub verbose: bool,
}

pub fn run() -> Result<(), std::io::Error> {
    let config: Config = Config::parse();

    let source = std::fs::read_to_string(config.input)?;

    let lexer = Lexer::new(&source);
    let mut parser = Parser::new(lexer);

    let statements = match parser.parse() {
        Ok(statements) => statements,
        Err(err) => {
            eprintln!("{}", err);
            return Err(std::io::Error::from(std::io::ErrorKind::InvalidData));
        },
    };

    if config.verbose {
        for statement in &statements {
            eprintln!("{:?}", statement);
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut interpreter = Interpreter::new(config.legacy_turns);

    if let Err(err) = interpreter.interpret(&statements, &mut out) {
        eprintln!("{}", err);
        return Err(std::io::Error::from(std::io::ErrorKind::InvalidData));
    }

    Ok(())
}
