//! Shared types for the Classy compiler front end (tokens, spans).

pub mod span;
pub mod token;

pub use span::{LineIndex, Span};
pub use token::{keyword_from_str, Token, TokenKind};
