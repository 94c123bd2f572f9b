//! IR instructions.
//!
//! An [`Instruction`] wraps a single [`Op`]. Passes rewrite code by swapping
//! the operation of an existing instruction in place with
//! [`Instruction::set_op`]; instructions are never spliced out of their
//! block, which keeps block layout and every recorded
//! [`Location`](crate::ir::Location) stable across a rewrite.

use std::fmt;

use super::{Op, ValueId};

/// A single instruction within a basic block.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    op: Op,
}

impl Instruction {
    /// Creates an instruction from an operation.
    #[must_use]
    pub fn new(op: Op) -> Self {
        Self { op }
    }

    /// Returns the operation of this instruction.
    #[must_use]
    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Replaces the operation of this instruction in place.
    ///
    /// A replacement that defines the same destination as the old operation
    /// redirects every consumer of that destination without touching the
    /// consumers themselves.
    pub fn set_op(&mut self, op: Op) {
        self.op = op;
    }

    /// Returns the value defined by this instruction, if any.
    #[must_use]
    pub fn def(&self) -> Option<ValueId> {
        self.op.dest()
    }

    /// Returns all values used by this instruction.
    #[must_use]
    pub fn uses(&self) -> Vec<ValueId> {
        self.op.uses()
    }

    /// Returns `true` if this instruction terminates its block.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        self.op.is_terminator()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstValue, Predicate};

    #[test]
    fn test_def_and_uses() {
        let instr = Instruction::new(Op::Cmp {
            dest: ValueId::new(2),
            pred: Predicate::Eq,
            left: ValueId::new(0),
            right: ValueId::new(1),
        });
        assert_eq!(instr.def(), Some(ValueId::new(2)));
        assert_eq!(instr.uses(), vec![ValueId::new(0), ValueId::new(1)]);
        assert!(!instr.is_terminator());
    }

    #[test]
    fn test_set_op_preserves_nothing_but_identity() {
        let mut instr = Instruction::new(Op::Cmp {
            dest: ValueId::new(2),
            pred: Predicate::Eq,
            left: ValueId::new(0),
            right: ValueId::new(1),
        });

        instr.set_op(Op::Const {
            dest: ValueId::new(2),
            value: ConstValue::Bool(false),
        });

        assert_eq!(instr.def(), Some(ValueId::new(2)));
        assert!(instr.uses().is_empty());
        assert_eq!(format!("{instr}"), "v2 = false");
    }
}
