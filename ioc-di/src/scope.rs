//! Bean scopes

use std::fmt::{self, Display, Formatter};

/// Describes how many instances of a bean the container hands out
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Single instance for the entire container lifetime
    #[default]
    Singleton,

    /// New, independently owned instance per retrieval
    Prototype,
}

impl Display for Scope {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => f.write_str("singleton"),
            Scope::Prototype => f.write_str("prototype"),
        }
    }
}
