//! IR operations.
//!
//! This module defines [`Op`], the closed operation representation in
//! `result = op(operands)` form.
//!
//! # Design Goals
//!
//! - **Single assignment**: Each operation produces at most one result
//! - **Explicit operands**: All data dependencies are explicit value identifiers
//! - **Pattern matching**: Enum variants enable easy pattern matching for passes
//!
//! Passes dispatch on operations by matching variants; there is no visitor
//! machinery. A pass that cares about two variants writes a two-arm match and
//! ignores the rest.
//!
//! # Field Documentation
//!
//! The struct fields in this module follow a consistent naming convention:
//! - `dest`: The destination value for the operation result
//! - `left`, `right`: Binary operands (left and right hand side)
//! - `operand`: Unary operand
//! - `value`: A value being stored or returned
//! - `addr`: Address for memory operations
//! - `target`, `true_target`, `false_target`: Branch targets (block indices)

#![allow(missing_docs)]

use std::fmt;

use strum::{EnumCount, EnumIter};

use super::types::Type;
use super::value::ConstValue;
use super::ValueId;

/// Comparison predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum Predicate {
    /// Equality: `left == right`
    Eq,
    /// Inequality: `left != right`
    Ne,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "eq"),
            Self::Ne => write!(f, "ne"),
        }
    }
}

/// A single IR operation.
///
/// Each variant represents one operation with explicit inputs and outputs.
///
/// # Conventions
///
/// - For operations that produce a result, the first `ValueId` is the destination
/// - Optional results use `Option<ValueId>` (calls to void functions)
/// - Block terminators are `Branch`, `Jump` and `Return`
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Load a constant value.
    ///
    /// `dest = const value`
    Const { dest: ValueId, value: ConstValue },

    /// Call a declared or defined function: `dest = callee(args...)`
    ///
    /// `dest` is `None` for calls to void functions.
    Call {
        dest: Option<ValueId>,
        callee: String,
        args: Vec<ValueId>,
    },

    /// Pointer-preserving cast: `dest = (target)operand`
    ///
    /// The destination refers to the same object as the operand; only the
    /// static type changes.
    PtrCast {
        dest: ValueId,
        operand: ValueId,
        target: Type,
    },

    /// Comparison: `dest = (left pred right) ? true : false`
    Cmp {
        dest: ValueId,
        pred: Predicate,
        left: ValueId,
        right: ValueId,
    },

    /// Load through pointer: `dest = *addr`
    Load {
        dest: ValueId,
        addr: ValueId,
        ty: Type,
    },

    /// Store through pointer: `*addr = value`
    Store {
        addr: ValueId,
        value: ValueId,
        ty: Type,
    },

    /// Conditional branch: if condition is true, go to true_target, else false_target.
    Branch {
        condition: ValueId,
        true_target: usize,
        false_target: usize,
    },

    /// Unconditional jump to a block.
    Jump { target: usize },

    /// Return from function with optional value.
    Return { value: Option<ValueId> },
}

impl Op {
    /// Returns the destination value if this operation produces one.
    #[must_use]
    pub fn dest(&self) -> Option<ValueId> {
        match self {
            Self::Const { dest, .. }
            | Self::PtrCast { dest, .. }
            | Self::Cmp { dest, .. }
            | Self::Load { dest, .. } => Some(*dest),

            Self::Call { dest, .. } => *dest,

            Self::Store { .. } | Self::Branch { .. } | Self::Jump { .. } | Self::Return { .. } => {
                None
            }
        }
    }

    /// Returns all values used by this operation.
    #[must_use]
    pub fn uses(&self) -> Vec<ValueId> {
        match self {
            Self::Const { .. } | Self::Jump { .. } => vec![],

            Self::Call { args, .. } => args.clone(),

            Self::PtrCast { operand, .. } => vec![*operand],

            Self::Cmp { left, right, .. } => vec![*left, *right],

            Self::Load { addr, .. } => vec![*addr],
            Self::Store { addr, value, .. } => vec![*addr, *value],

            Self::Branch { condition, .. } => vec![*condition],
            Self::Return { value } => value.iter().copied().collect(),
        }
    }

    /// Returns `true` if this operation is a terminator (ends a basic block).
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::Branch { .. } | Self::Jump { .. } | Self::Return { .. }
        )
    }

    /// Returns `true` if this operation is pure (has no side effects).
    ///
    /// Pure operations can be eliminated if their result is unused.
    #[must_use]
    pub const fn is_pure(&self) -> bool {
        matches!(
            self,
            Self::Const { .. } | Self::PtrCast { .. } | Self::Cmp { .. }
        )
    }

    /// Returns the successor blocks if this operation is a terminator.
    #[must_use]
    pub fn successors(&self) -> Vec<usize> {
        match self {
            Self::Branch {
                true_target,
                false_target,
                ..
            } => vec![*true_target, *false_target],
            Self::Jump { target } => vec![*target],
            _ => vec![],
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const { dest, value } => write!(f, "{dest} = {value}"),
            Self::Call { dest, callee, args } => {
                if let Some(d) = dest {
                    write!(f, "{d} = ")?;
                }
                write!(f, "call {callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::PtrCast {
                dest,
                operand,
                target,
            } => write!(f, "{dest} = ptrcast {operand} to {target}"),
            Self::Cmp {
                dest,
                pred,
                left,
                right,
            } => write!(f, "{dest} = cmp {pred} {left}, {right}"),
            Self::Load { dest, addr, ty } => write!(f, "{dest} = load {ty}, {addr}"),
            Self::Store { addr, value, ty } => write!(f, "store {ty} {value}, {addr}"),
            Self::Branch {
                condition,
                true_target,
                false_target,
            } => write!(f, "branch {condition}, B{true_target}, B{false_target}"),
            Self::Jump { target } => write!(f, "jump B{target}"),
            Self::Return { value: Some(v) } => write!(f, "ret {v}"),
            Self::Return { value: None } => write!(f, "ret"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount as _, IntoEnumIterator};

    #[test]
    fn test_dest_extraction() {
        let op = Op::Cmp {
            dest: ValueId::new(2),
            pred: Predicate::Eq,
            left: ValueId::new(0),
            right: ValueId::new(1),
        };
        assert_eq!(op.dest(), Some(ValueId::new(2)));

        let op = Op::Jump { target: 1 };
        assert_eq!(op.dest(), None);

        let op = Op::Call {
            dest: Some(ValueId::new(5)),
            callee: "malloc".to_string(),
            args: vec![ValueId::new(0)],
        };
        assert_eq!(op.dest(), Some(ValueId::new(5)));

        let op = Op::Call {
            dest: None,
            callee: "free".to_string(),
            args: vec![ValueId::new(5)],
        };
        assert_eq!(op.dest(), None);
    }

    #[test]
    fn test_uses_extraction() {
        let op = Op::Cmp {
            dest: ValueId::new(2),
            pred: Predicate::Eq,
            left: ValueId::new(0),
            right: ValueId::new(1),
        };
        assert_eq!(op.uses(), vec![ValueId::new(0), ValueId::new(1)]);

        let op = Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::I32(42),
        };
        assert!(op.uses().is_empty());

        let op = Op::PtrCast {
            dest: ValueId::new(1),
            operand: ValueId::new(0),
            target: Type::Ptr(Box::new(Type::I32)),
        };
        assert_eq!(op.uses(), vec![ValueId::new(0)]);

        let op = Op::Return {
            value: Some(ValueId::new(3)),
        };
        assert_eq!(op.uses(), vec![ValueId::new(3)]);

        let op = Op::Return { value: None };
        assert!(op.uses().is_empty());
    }

    #[test]
    fn test_is_terminator() {
        assert!(Op::Jump { target: 1 }.is_terminator());
        assert!(Op::Branch {
            condition: ValueId::new(0),
            true_target: 1,
            false_target: 2
        }
        .is_terminator());
        assert!(Op::Return { value: None }.is_terminator());

        assert!(!Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::Null
        }
        .is_terminator());
        assert!(!Op::Call {
            dest: None,
            callee: "free".to_string(),
            args: vec![]
        }
        .is_terminator());
    }

    #[test]
    fn test_is_pure() {
        assert!(Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::I32(42)
        }
        .is_pure());
        assert!(Op::Cmp {
            dest: ValueId::new(2),
            pred: Predicate::Ne,
            left: ValueId::new(0),
            right: ValueId::new(1)
        }
        .is_pure());

        // Not pure: has side effects
        assert!(!Op::Store {
            addr: ValueId::new(0),
            value: ValueId::new(1),
            ty: Type::I32
        }
        .is_pure());
        assert!(!Op::Call {
            dest: Some(ValueId::new(0)),
            callee: "malloc".to_string(),
            args: vec![ValueId::new(1)]
        }
        .is_pure());
    }

    #[test]
    fn test_successors() {
        let op = Op::Branch {
            condition: ValueId::new(0),
            true_target: 1,
            false_target: 2,
        };
        assert_eq!(op.successors(), vec![1, 2]);
        assert_eq!(Op::Jump { target: 4 }.successors(), vec![4]);
        assert!(Op::Return { value: None }.successors().is_empty());
    }

    #[test]
    fn test_predicate_enum_shape() {
        assert_eq!(Predicate::COUNT, 2);
        let rendered: Vec<String> = Predicate::iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["eq", "ne"]);
    }

    #[test]
    fn test_display() {
        let op = Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::Null,
        };
        assert_eq!(format!("{op}"), "v0 = null");

        let op = Op::Call {
            dest: Some(ValueId::new(2)),
            callee: "malloc".to_string(),
            args: vec![ValueId::new(1)],
        };
        assert_eq!(format!("{op}"), "v2 = call malloc(v1)");

        let op = Op::PtrCast {
            dest: ValueId::new(3),
            operand: ValueId::new(2),
            target: Type::Ptr(Box::new(Type::I32)),
        };
        assert_eq!(format!("{op}"), "v3 = ptrcast v2 to i32*");

        let op = Op::Cmp {
            dest: ValueId::new(4),
            pred: Predicate::Eq,
            left: ValueId::new(3),
            right: ValueId::new(0),
        };
        assert_eq!(format!("{op}"), "v4 = cmp eq v3, v0");

        let op = Op::Branch {
            condition: ValueId::new(4),
            true_target: 1,
            false_target: 2,
        };
        assert_eq!(format!("{op}"), "branch v4, B1, B2");
    }
}
