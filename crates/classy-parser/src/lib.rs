//! Recursive-descent parser for the Classy language.
//!
//! Folds a [`classy_lexer::Lexer`] token stream into a closed tagged-union
//! AST (see [`ast`]), following the grammar in one token of lookahead.

pub mod ast;
pub mod error;
mod parser;
pub mod printer;

pub use error::ParseError;
pub use parser::parse;
