//! Curated re-exports of the most commonly used types.

pub use crate::ir::{
    BasicBlock, BlockBuilder, ConstValue, DeclAttrs, FuncDecl, Function, FunctionBuilder,
    Instruction, Location, Module, Op, Predicate, SymbolTable, Type, ValueId,
};
pub use crate::passes::{
    AllocRecognizer, FunctionPass, MallocNonNullPass, PassManager, PassStatistics, ALLOC_SYMBOLS,
    DEALLOC_SYMBOLS,
};
pub use crate::{Error, Result};
