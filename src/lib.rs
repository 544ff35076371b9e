pub mod backend;
pub mod compiler;
pub mod driver;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod logger;
pub mod options;
pub mod parser;
pub mod span;
mod table;
pub mod token;
