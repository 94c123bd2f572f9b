//! Value identifiers.
//!
//! Every value computed inside a function is identified by a [`ValueId`].
//! Values are in single-assignment form: each identifier is defined by
//! exactly one instruction and may be used by any number of instructions.

use std::fmt;

/// Identifier for a value within a function.
///
/// Identifiers are dense indices allocated by
/// [`Function::fresh_value`](crate::ir::Function::fresh_value) and are only
/// meaningful within their owning function.
///
/// # Examples
///
/// ```rust
/// use nullelide::ir::ValueId;
///
/// let v = ValueId::new(3);
/// assert_eq!(v.index(), 3);
/// assert_eq!(format!("{v}"), "v3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(usize);

impl ValueId {
    /// Creates a value identifier from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this identifier.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
