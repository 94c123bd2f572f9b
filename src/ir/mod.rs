//! The intermediate representation.
//!
//! A minimal typed IR in single-assignment style: each value is defined by
//! exactly one instruction, instructions are grouped into indexed basic
//! blocks, and blocks form a function's control-flow graph through their
//! terminators.
//!
//! # Architecture
//!
//! The IR module is organized into focused sub-modules:
//!
//! - `variable` - Value identifiers ([`ValueId`])
//! - `types` - The closed type system ([`Type`])
//! - `value` - Constant payloads ([`ConstValue`])
//! - `ops` - The closed operation enum ([`Op`], [`Predicate`])
//! - `instruction` - Instruction wrapper with in-place rewriting
//! - `block` - Basic blocks
//! - `function` - Functions, def/use queries, [`Location`]
//! - `module` - Modules, declarations, symbol tables
//! - `builder` - Closure-style construction API
//!
//! # Constants
//!
//! Constants are materialized as `Const` instructions rather than inline
//! immediates. Analyses resolve an operand to a constant by looking up its
//! defining instruction.
//!
//! # Usage
//!
//! ```rust
//! use nullelide::ir::{FunctionBuilder, Module, Op};
//!
//! let mut f = FunctionBuilder::new("answer");
//! f.block(0, |b| {
//!     let v = b.const_i32(42);
//!     b.ret_value(v);
//! });
//! let function = f.finish();
//!
//! let mut module = Module::new("demo");
//! module.add_function(function)?;
//! assert!(module.function("answer").is_some());
//! # Ok::<(), nullelide::Error>(())
//! ```

mod block;
mod builder;
mod function;
mod instruction;
mod module;
mod ops;
mod types;
mod value;
mod variable;

// Re-export primary types at module level
pub use block::BasicBlock;
pub use builder::{BlockBuilder, FunctionBuilder};
pub use function::{Function, Location};
pub use instruction::Instruction;
pub use module::{DeclAttrs, FuncDecl, Module, SymbolTable};
pub use ops::{Op, Predicate};
pub use types::Type;
pub use value::ConstValue;
pub use variable::ValueId;
