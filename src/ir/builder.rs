//! Programmatic function construction.
//!
//! The crate has no textual parser; functions are assembled through
//! [`FunctionBuilder`]. Each call to [`FunctionBuilder::block`] opens a block
//! and hands a [`BlockBuilder`] to a closure that emits instructions into it.
//!
//! # Usage
//!
//! ```rust
//! use nullelide::ir::FunctionBuilder;
//!
//! let mut f = FunctionBuilder::new("example");
//! f.block(0, |b| {
//!     let size = b.const_i64(16);
//!     let p = b.call("malloc", &[size]);
//!     let null = b.const_null();
//!     let cond = b.cmp_eq(p, null);
//!     b.branch(cond, 1, 2);
//! });
//! f.block(1, |b| b.ret());
//! f.block(2, |b| b.ret());
//! let function = f.finish();
//! assert_eq!(function.block_count(), 3);
//! ```

use super::{BasicBlock, ConstValue, Function, Instruction, Op, Predicate, Type, ValueId};

/// Builder for assembling a [`Function`] block by block.
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Function,
}

impl FunctionBuilder {
    /// Creates a builder for a function with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            function: Function::new(name),
        }
    }

    /// Opens a block with the given index and populates it via the closure.
    ///
    /// Block indices are the caller's responsibility; branch targets refer
    /// to them directly.
    pub fn block<F>(&mut self, id: usize, build: F) -> &mut Self
    where
        F: FnOnce(&mut BlockBuilder<'_>),
    {
        self.function.add_block(BasicBlock::new(id));
        let block = self.function.block_count() - 1;
        let mut builder = BlockBuilder {
            function: &mut self.function,
            block,
        };
        build(&mut builder);
        self
    }

    /// Consumes the builder and returns the finished function.
    #[must_use]
    pub fn finish(self) -> Function {
        self.function
    }
}

/// Emits instructions into one block of a function under construction.
#[derive(Debug)]
pub struct BlockBuilder<'a> {
    function: &'a mut Function,
    block: usize,
}

impl BlockBuilder<'_> {
    fn emit(&mut self, op: Op) {
        if let Some(block) = self.function.block_mut(self.block) {
            block.add_instruction(Instruction::new(op));
        }
    }

    fn emit_with_dest(&mut self, make: impl FnOnce(ValueId) -> Op) -> ValueId {
        let dest = self.function.fresh_value();
        let op = make(dest);
        self.emit(op);
        dest
    }

    /// Emits a boolean constant.
    pub fn const_bool(&mut self, value: bool) -> ValueId {
        self.emit_with_dest(|dest| Op::Const {
            dest,
            value: ConstValue::Bool(value),
        })
    }

    /// Emits a 32-bit integer constant.
    pub fn const_i32(&mut self, value: i32) -> ValueId {
        self.emit_with_dest(|dest| Op::Const {
            dest,
            value: ConstValue::I32(value),
        })
    }

    /// Emits a 64-bit integer constant.
    pub fn const_i64(&mut self, value: i64) -> ValueId {
        self.emit_with_dest(|dest| Op::Const {
            dest,
            value: ConstValue::I64(value),
        })
    }

    /// Emits the null pointer constant.
    pub fn const_null(&mut self) -> ValueId {
        self.emit_with_dest(|dest| Op::Const {
            dest,
            value: ConstValue::Null,
        })
    }

    /// Emits a value-returning call.
    pub fn call(&mut self, callee: &str, args: &[ValueId]) -> ValueId {
        self.emit_with_dest(|dest| Op::Call {
            dest: Some(dest),
            callee: callee.to_string(),
            args: args.to_vec(),
        })
    }

    /// Emits a call to a void function.
    pub fn call_void(&mut self, callee: &str, args: &[ValueId]) {
        self.emit(Op::Call {
            dest: None,
            callee: callee.to_string(),
            args: args.to_vec(),
        });
    }

    /// Emits a pointer-preserving cast.
    pub fn ptr_cast(&mut self, operand: ValueId, target: Type) -> ValueId {
        self.emit_with_dest(|dest| Op::PtrCast {
            dest,
            operand,
            target,
        })
    }

    /// Emits a comparison.
    pub fn cmp(&mut self, pred: Predicate, left: ValueId, right: ValueId) -> ValueId {
        self.emit_with_dest(|dest| Op::Cmp {
            dest,
            pred,
            left,
            right,
        })
    }

    /// Emits an equality comparison.
    pub fn cmp_eq(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.cmp(Predicate::Eq, left, right)
    }

    /// Emits an inequality comparison.
    pub fn cmp_ne(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.cmp(Predicate::Ne, left, right)
    }

    /// Emits a load through a pointer.
    pub fn load(&mut self, addr: ValueId, ty: Type) -> ValueId {
        self.emit_with_dest(|dest| Op::Load { dest, addr, ty })
    }

    /// Emits a store through a pointer.
    pub fn store(&mut self, addr: ValueId, value: ValueId, ty: Type) {
        self.emit(Op::Store { addr, value, ty });
    }

    /// Emits a conditional branch terminator.
    pub fn branch(&mut self, condition: ValueId, true_target: usize, false_target: usize) {
        self.emit(Op::Branch {
            condition,
            true_target,
            false_target,
        });
    }

    /// Emits an unconditional jump terminator.
    pub fn jump(&mut self, target: usize) {
        self.emit(Op::Jump { target });
    }

    /// Emits a void return terminator.
    pub fn ret(&mut self) {
        self.emit(Op::Return { value: None });
    }

    /// Emits a value return terminator.
    pub fn ret_value(&mut self, value: ValueId) {
        self.emit(Op::Return { value: Some(value) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_build() {
        let mut f = FunctionBuilder::new("t");
        f.block(0, |b| {
            let size = b.const_i64(8);
            let p = b.call("malloc", &[size]);
            let null = b.const_null();
            let cond = b.cmp_eq(p, null);
            b.ret_value(cond);
        });
        let func = f.finish();

        assert_eq!(func.block_count(), 1);
        assert_eq!(func.instruction_count(), 5);
        assert_eq!(func.value_count(), 4);

        let block = func.block(0).unwrap();
        assert!(block.terminator().is_some());
        assert!(matches!(
            block.instruction(1).unwrap().op(),
            Op::Call { callee, .. } if callee == "malloc"
        ));
    }

    #[test]
    fn test_multi_block_build() {
        let mut f = FunctionBuilder::new("t");
        f.block(0, |b| {
            let cond = b.const_bool(true);
            b.branch(cond, 1, 2);
        });
        f.block(1, |b| b.jump(2));
        f.block(2, |b| b.ret());
        let func = f.finish();

        assert_eq!(func.block_count(), 3);
        assert_eq!(func.block(0).unwrap().successors(), vec![1, 2]);
        assert_eq!(func.block(1).unwrap().successors(), vec![2]);
        assert!(func.block(2).unwrap().successors().is_empty());
    }

    #[test]
    fn test_values_are_unique_across_blocks() {
        let mut f = FunctionBuilder::new("t");
        let mut first = None;
        let mut second = None;
        f.block(0, |b| {
            first = Some(b.const_i32(1));
            b.jump(1);
        });
        f.block(1, |b| {
            second = Some(b.const_i32(2));
            b.ret();
        });
        assert_ne!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn test_cast_helper_types() {
        let mut f = FunctionBuilder::new("t");
        f.block(0, |b| {
            let size = b.const_i32(4);
            let p = b.call("malloc", &[size]);
            let q = b.ptr_cast(p, Type::Ptr(Box::new(Type::I32)));
            let v = b.load(q, Type::I32);
            b.store(q, v, Type::I32);
            b.ret();
        });
        let func = f.finish();
        assert!(matches!(
            func.block(0).unwrap().instruction(2).unwrap().op(),
            Op::PtrCast { target, .. } if *target == Type::Ptr(Box::new(Type::I32))
        ));
    }
}
