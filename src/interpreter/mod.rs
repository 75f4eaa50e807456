pub mod ast;
pub mod lexer;
pub mod parser;
pub mod environment;
pub mod evaluator;
