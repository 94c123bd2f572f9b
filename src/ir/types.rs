//! The IR type system.
//!
//! A deliberately small, closed set of first-class types: the integer
//! widths the allocator signatures need, a boolean produced by
//! comparisons, and nestable pointers. Allocation routines return the
//! opaque byte pointer [`Type::opaque_ptr`]; typed views of an allocation
//! are produced by pointer casts.

use std::fmt;

/// A first-class IR type.
///
/// # Examples
///
/// ```rust
/// use nullelide::ir::Type;
///
/// let p = Type::opaque_ptr();
/// assert!(p.is_pointer());
/// assert_eq!(format!("{p}"), "i8*");
///
/// let pp = Type::Ptr(Box::new(Type::Ptr(Box::new(Type::I32))));
/// assert_eq!(format!("{pp}"), "i32**");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value. Only valid as a function return type.
    Void,
    /// Single-bit boolean, the result type of comparisons.
    Bool,
    /// 8-bit integer.
    I8,
    /// 16-bit integer.
    I16,
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// Pointer to a value of the inner type.
    Ptr(Box<Type>),
}

impl Type {
    /// The opaque byte pointer, `i8*`.
    ///
    /// This is the return type of every recognized allocation routine and
    /// the parameter type of every recognized deallocation routine.
    #[must_use]
    pub fn opaque_ptr() -> Self {
        Self::Ptr(Box::new(Self::I8))
    }

    /// Returns `true` if this is a pointer type.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(self, Self::Ptr(_))
    }

    /// Returns `true` if this is an integer type.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns the pointee type if this is a pointer.
    #[must_use]
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Self::Ptr(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "i1"),
            Self::I8 => write!(f, "i8"),
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::Ptr(inner) => write!(f, "{inner}*"),
        }
    }
}
