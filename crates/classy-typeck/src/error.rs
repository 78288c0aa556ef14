//! Type error type for the Classy type checker.

use std::fmt;

/// A type error identifying the offending AST node and a human-readable
/// cause. The checker aborts on the first error.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    /// The offending node's label: its kind name for compound forms
    /// (`"Assign"`, `"If"`, ...), or the literal text for leaf expressions
    /// (a variable name, an operator symbol, `"this"`).
    pub label: String,
    pub cause: String,
}

impl TypeError {
    pub fn new(label: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type error at '{}': {}", self.label, self.cause)
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_form() {
        let err = TypeError::new("Println", "argument must be Int but found Boolean");
        assert_eq!(
            err.to_string(),
            "Type error at 'Println': argument must be Int but found Boolean"
        );
    }
}
