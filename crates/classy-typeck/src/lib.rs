//! Static type checker for the Classy language.
//!
//! [`Checker::check_program`] is the single entry point: it runs the three
//! passes described in [`checker`] over a parsed [`classy_parser::ast::Program`]
//! and returns the first [`TypeError`] encountered, if any.

pub mod checker;
pub mod env;
pub mod error;
pub mod ty;

pub use checker::Checker;
pub use error::TypeError;
pub use ty::Type;
