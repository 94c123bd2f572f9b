//! Functions.
//!
//! A [`Function`] owns its basic blocks and allocates the value identifiers
//! used inside it. It also answers the two queries every dataflow pass asks:
//! where is a value defined ([`Function::definition_of`]) and where is it
//! used ([`Function::uses_of`]).
//!
//! # Use-list snapshots
//!
//! `uses_of` scans the function and returns a fresh snapshot each time it is
//! called. A pass that rewrites an instruction mid-walk re-queries instead of
//! iterating a list the rewrite may have invalidated.

use std::fmt;

use super::{BasicBlock, Instruction, Op, ValueId};

/// The position of an instruction within a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Index of the containing block.
    pub block: usize,
    /// Index of the instruction within the block.
    pub instruction: usize,
}

impl Location {
    /// Creates a location from block and instruction indices.
    #[must_use]
    pub const fn new(block: usize, instruction: usize) -> Self {
        Self { block, instruction }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}[{}]", self.block, self.instruction)
    }
}

/// A function: named, with basic blocks and a value identifier allocator.
#[derive(Debug, Clone)]
pub struct Function {
    /// Function name, unique within its module.
    name: String,

    /// Basic blocks, indexed by their position.
    blocks: Vec<BasicBlock>,

    /// Next value identifier to hand out.
    next_value: usize,
}

impl Function {
    /// Creates a new empty function.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            next_value: 0,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocates a fresh value identifier.
    pub fn fresh_value(&mut self) -> ValueId {
        let id = ValueId::new(self.next_value);
        self.next_value += 1;
        id
    }

    /// Returns the number of value identifiers allocated so far.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.next_value
    }

    /// Adds a block to this function.
    pub fn add_block(&mut self, block: BasicBlock) {
        self.blocks.push(block);
    }

    /// Returns the blocks of this function.
    #[must_use]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Returns a mutable reference to the blocks.
    pub fn blocks_mut(&mut self) -> &mut Vec<BasicBlock> {
        &mut self.blocks
    }

    /// Gets a block by index.
    #[must_use]
    pub fn block(&self, index: usize) -> Option<&BasicBlock> {
        self.blocks.get(index)
    }

    /// Gets a mutable block by index.
    pub fn block_mut(&mut self, index: usize) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(index)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the total number of instructions across all blocks.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(BasicBlock::instruction_count).sum()
    }

    /// Returns the instruction at a location.
    #[must_use]
    pub fn instruction_at(&self, loc: Location) -> Option<&Instruction> {
        self.blocks.get(loc.block)?.instruction(loc.instruction)
    }

    /// Returns a mutable reference to the instruction at a location.
    pub fn instruction_at_mut(&mut self, loc: Location) -> Option<&mut Instruction> {
        self.blocks
            .get_mut(loc.block)?
            .instruction_mut(loc.instruction)
    }

    /// Returns the operation at a location.
    #[must_use]
    pub fn op_at(&self, loc: Location) -> Option<&Op> {
        self.instruction_at(loc).map(Instruction::op)
    }

    /// Finds the location of the instruction defining `value`.
    ///
    /// Each value has at most one defining instruction.
    #[must_use]
    pub fn definition_of(&self, value: ValueId) -> Option<Location> {
        for (block_idx, block) in self.blocks.iter().enumerate() {
            for (instr_idx, instr) in block.instructions().iter().enumerate() {
                if instr.def() == Some(value) {
                    return Some(Location::new(block_idx, instr_idx));
                }
            }
        }
        None
    }

    /// Returns the locations of every instruction that uses `value`.
    ///
    /// An instruction appears at most once even if it uses `value` in more
    /// than one operand position. The returned vector is a snapshot; call
    /// again after mutating the function.
    #[must_use]
    pub fn uses_of(&self, value: ValueId) -> Vec<Location> {
        let mut uses = Vec::new();
        for (block_idx, block) in self.blocks.iter().enumerate() {
            for (instr_idx, instr) in block.instructions().iter().enumerate() {
                if instr.uses().contains(&value) {
                    uses.push(Location::new(block_idx, instr_idx));
                }
            }
        }
        uses
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fn {}:", self.name)?;
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        Ok(())
    }
}
