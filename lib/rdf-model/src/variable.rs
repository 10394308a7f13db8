use std::fmt;

/// A SPARQL variable.
///
/// Variables only ever appear inside query ASTs — the predicate-position
/// constraint on [`crate::Quad`] is the only place `Term::Variable` is
/// accepted outside a query; stored quads never contain one.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Builds a variable, rejecting an empty name.
    pub fn new(name: impl Into<String>) -> Result<Self, VariableNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(VariableNameError);
        }
        Ok(Self { name })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// A variable was built from an empty name.
#[derive(Debug, Eq, PartialEq, Clone, Copy, thiserror::Error)]
#[error("variable names must not be empty")]
pub struct VariableNameError;
