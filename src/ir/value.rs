//! Constant values.
//!
//! Constants are materialized as explicit [`Op::Const`](crate::ir::Op::Const)
//! instructions; there are no inline immediate operands. A pass that wants to
//! know whether an operand is a particular constant resolves the operand's
//! defining instruction and inspects its payload.

use std::fmt;

/// A constant payload carried by a `Const` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstValue {
    /// Boolean constant.
    Bool(bool),
    /// 32-bit integer constant.
    I32(i32),
    /// 64-bit integer constant.
    I64(i64),
    /// The null pointer constant.
    Null,
}

impl ConstValue {
    /// Returns `true` if this is the null pointer constant.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is the boolean constant `false`.
    #[must_use]
    pub const fn is_false(&self) -> bool {
        matches!(self, Self::Bool(false))
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_classification() {
        assert!(ConstValue::Null.is_null());
        assert!(!ConstValue::I32(0).is_null());
        assert!(!ConstValue::Bool(false).is_null());
    }

    #[test]
    fn test_false_classification() {
        assert!(ConstValue::Bool(false).is_false());
        assert!(!ConstValue::Bool(true).is_false());
        assert!(!ConstValue::Null.is_false());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ConstValue::Bool(true)), "true");
        assert_eq!(format!("{}", ConstValue::Bool(false)), "false");
        assert_eq!(format!("{}", ConstValue::I32(-7)), "-7");
        assert_eq!(format!("{}", ConstValue::I64(1 << 40)), "1099511627776");
        assert_eq!(format!("{}", ConstValue::Null), "null");
    }
}
