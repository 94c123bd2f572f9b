//! Basic blocks.
//!
//! A block is a sequence of instructions with a single entry at the top.
//! A well-formed block ends with exactly one terminator (`branch`, `jump`
//! or `ret`) as its last instruction.

use std::fmt;

use super::{Instruction, ValueId};

/// A basic block: an indexed, ordered list of instructions.
///
/// # Examples
///
/// ```rust
/// use nullelide::ir::{BasicBlock, Instruction, Op};
///
/// let mut block = BasicBlock::new(0);
/// block.add_instruction(Instruction::new(Op::Return { value: None }));
/// assert_eq!(block.instruction_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Block index within the owning function.
    id: usize,

    /// Instructions in execution order.
    instructions: Vec<Instruction>,
}

impl BasicBlock {
    /// Creates a new empty block with the given index.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            instructions: Vec::new(),
        }
    }

    /// Returns the block index.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Returns the instructions in this block.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns a mutable reference to the instructions.
    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if this block has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Adds an instruction to the end of this block.
    pub fn add_instruction(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Gets an instruction by index.
    #[must_use]
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Gets a mutable instruction by index.
    pub fn instruction_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(index)
    }

    /// Returns the terminator of this block, if the last instruction is one.
    #[must_use]
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|i| i.is_terminator())
    }

    /// Returns the successor block indices, derived from the terminator.
    #[must_use]
    pub fn successors(&self) -> Vec<usize> {
        self.terminator()
            .map(|t| t.op().successors())
            .unwrap_or_default()
    }

    /// Returns all values defined in this block.
    pub fn defined_values(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.instructions.iter().filter_map(Instruction::def)
    }

    /// Returns all values used in this block.
    pub fn used_values(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.instructions.iter().flat_map(|i| i.uses().into_iter())
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "B{}:", self.id)?;
        for instr in &self.instructions {
            writeln!(f, "  {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstValue, Op, Predicate};

    fn ret() -> Instruction {
        Instruction::new(Op::Return { value: None })
    }

    #[test]
    fn test_block_creation() {
        let block = BasicBlock::new(5);
        assert_eq!(block.id(), 5);
        assert!(block.is_empty());
        assert!(block.terminator().is_none());
        assert!(block.successors().is_empty());
    }

    #[test]
    fn test_instruction_access() {
        let mut block = BasicBlock::new(0);
        block.add_instruction(Instruction::new(Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::I32(1),
        }));
        block.add_instruction(ret());

        assert_eq!(block.instruction_count(), 2);
        assert!(block.instruction(0).is_some());
        assert!(block.instruction(1).is_some());
        assert!(block.instruction(2).is_none());
    }

    #[test]
    fn test_terminator_and_successors() {
        let mut block = BasicBlock::new(0);
        block.add_instruction(Instruction::new(Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::Bool(true),
        }));
        block.add_instruction(Instruction::new(Op::Branch {
            condition: ValueId::new(0),
            true_target: 1,
            false_target: 2,
        }));

        assert!(block.terminator().is_some());
        assert_eq!(block.successors(), vec![1, 2]);
    }

    #[test]
    fn test_terminator_requires_last_position() {
        let mut block = BasicBlock::new(0);
        // Last instruction is not a terminator.
        block.add_instruction(Instruction::new(Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::I32(3),
        }));
        assert!(block.terminator().is_none());
    }

    #[test]
    fn test_defined_and_used_values() {
        let mut block = BasicBlock::new(0);
        block.add_instruction(Instruction::new(Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::Null,
        }));
        block.add_instruction(Instruction::new(Op::Cmp {
            dest: ValueId::new(1),
            pred: Predicate::Eq,
            left: ValueId::new(0),
            right: ValueId::new(0),
        }));
        block.add_instruction(ret());

        let defs: Vec<_> = block.defined_values().collect();
        assert_eq!(defs, vec![ValueId::new(0), ValueId::new(1)]);

        let uses: Vec<_> = block.used_values().collect();
        assert_eq!(uses, vec![ValueId::new(0), ValueId::new(0)]);
    }

    #[test]
    fn test_display() {
        let mut block = BasicBlock::new(1);
        block.add_instruction(Instruction::new(Op::Const {
            dest: ValueId::new(0),
            value: ConstValue::I32(42),
        }));
        block.add_instruction(ret());

        let display = format!("{block}");
        assert!(display.contains("B1:"));
        assert!(display.contains("v0 = 42"));
        assert!(display.contains("ret"));
    }
}
