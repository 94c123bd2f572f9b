//! Null-check elision for non-null allocators.
//!
//! Standard allocation entry points either return a valid pointer or abort;
//! they never return null. Front ends still emit the defensive
//! `if (p == null)` checks, and this pass removes them: every `eq`
//! comparison between null and a value that is (transitively, through
//! pointer casts) the result of a recognized allocation call is folded to
//! constant `false`.
//!
//! # Algorithm
//!
//! 1. Scan the function for calls the [`AllocRecognizer`] accepts and
//!    collect their results as roots.
//! 2. For each root, walk a FIFO worklist of tracked values. A pointer cast
//!    of a tracked value makes the cast result tracked; an `eq` comparison
//!    of a tracked value against the null constant is rewritten in place to
//!    `false`. After every rewrite the use list of the current value is
//!    re-queried, since the snapshot being iterated is stale.
//!
//! Each value is enqueued at most once, so cast chains of any length are
//! walked in linear time. Inequality comparisons and all other uses are
//! left untouched, and the control-flow graph is never modified.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::ir::{
    ConstValue, FuncDecl, Function, Location, Op, Predicate, SymbolTable, Type, ValueId,
};
use crate::passes::{FunctionPass, PassStatistics};
use crate::Result;

/// Symbols treated as guaranteed-non-null allocation routines.
///
/// The mangled names cover the four Itanium C++ ABI `operator new`
/// variants: scalar and array forms, each with a 32-bit or 64-bit size
/// parameter.
pub const ALLOC_SYMBOLS: &[&str] = &["malloc", "my_malloc", "_Znwj", "_Znwm", "_Znaj", "_Znam"];

/// Symbols treated as deallocation routines.
///
/// The mangled names are the Itanium C++ ABI `operator delete` and
/// `operator delete[]`.
pub const DEALLOC_SYMBOLS: &[&str] = &["free", "my_free", "_ZdlPv", "_ZdaPv"];

/// Decides whether a call targets a recognized allocator or deallocator.
///
/// Recognition is conservative: the callee name must be on the list and the
/// module's declaration must match the expected external signature exactly.
/// Anything else is simply not recognized; no mismatch is an error.
pub struct AllocRecognizer<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> AllocRecognizer<'a> {
    /// Creates a recognizer over a module's declarations.
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Returns `true` if `op` is a call to a guaranteed-non-null allocator.
    ///
    /// Requires a value-producing call to a listed symbol declared as
    /// `i8* name(iN)` with `N` 32 or 64, body-less and non-variadic.
    #[must_use]
    pub fn is_nonnull_alloc(&self, op: &Op) -> bool {
        let Op::Call {
            dest: Some(_),
            callee,
            ..
        } = op
        else {
            return false;
        };
        if !ALLOC_SYMBOLS.contains(&callee.as_str()) {
            return false;
        }
        self.symbols
            .decl(callee)
            .is_some_and(Self::alloc_signature_matches)
    }

    /// Returns `true` if `op` is a call to a recognized deallocator.
    ///
    /// Requires a call to a listed symbol declared as `void name(i8*)`,
    /// body-less and non-variadic. Nothing in the elision pass consults
    /// this; it exists for passes that pair allocations with releases.
    #[must_use]
    pub fn is_dealloc(&self, op: &Op) -> bool {
        let Op::Call { callee, .. } = op else {
            return false;
        };
        if !DEALLOC_SYMBOLS.contains(&callee.as_str()) {
            return false;
        }
        self.symbols
            .decl(callee)
            .is_some_and(Self::dealloc_signature_matches)
    }

    fn alloc_signature_matches(decl: &FuncDecl) -> bool {
        decl.is_declaration()
            && !decl.is_vararg()
            && *decl.ret() == Type::opaque_ptr()
            && decl.param_count() == 1
            && matches!(decl.params()[0], Type::I32 | Type::I64)
    }

    fn dealloc_signature_matches(decl: &FuncDecl) -> bool {
        decl.is_declaration()
            && !decl.is_vararg()
            && *decl.ret() == Type::Void
            && decl.param_count() == 1
            && decl.params()[0] == Type::opaque_ptr()
    }
}

/// Maps each value to the location of its defining instruction.
///
/// Built once per function. Rewrites performed by this pass keep every
/// destination in place, so the cache stays valid across them.
struct DefinitionCache {
    defs: HashMap<ValueId, Location>,
}

impl DefinitionCache {
    fn new(function: &Function) -> Self {
        let mut defs = HashMap::new();
        for (block_idx, block) in function.blocks().iter().enumerate() {
            for (instr_idx, instr) in block.instructions().iter().enumerate() {
                if let Some(dest) = instr.def() {
                    defs.insert(dest, Location::new(block_idx, instr_idx));
                }
            }
        }
        Self { defs }
    }

    /// Returns `true` if `value` is defined by a null constant.
    fn is_null_constant(&self, function: &Function, value: ValueId) -> bool {
        self.defs
            .get(&value)
            .and_then(|loc| function.op_at(*loc))
            .is_some_and(|op| matches!(op, Op::Const { value, .. } if value.is_null()))
    }
}

/// Folds every `eq`-against-null comparison reachable from `root` through
/// pointer casts. Returns the number of comparisons elided.
fn elide_null_checks(
    function: &mut Function,
    defs: &DefinitionCache,
    root: ValueId,
) -> Result<u64> {
    let mut worklist = VecDeque::new();
    let mut seen = HashSet::new();
    seen.insert(root);
    worklist.push_back(root);

    let mut elided = 0u64;

    while let Some(current) = worklist.pop_front() {
        'rescan: loop {
            for loc in function.uses_of(current) {
                let op = match function.op_at(loc) {
                    Some(op) => op.clone(),
                    None => continue,
                };
                match op {
                    Op::PtrCast { dest, .. } => {
                        if seen.insert(dest) {
                            worklist.push_back(dest);
                        }
                    }
                    Op::Cmp {
                        dest,
                        pred,
                        left,
                        right,
                    } => {
                        if pred != Predicate::Eq {
                            continue;
                        }
                        // Canonicalize: the tracked value goes on the left.
                        let other = if left == current {
                            right
                        } else if right == current {
                            left
                        } else {
                            return Err(crate::Error::BrokenUseChain {
                                value: current,
                                block: loc.block,
                                instruction: loc.instruction,
                            });
                        };
                        if defs.is_null_constant(function, other) {
                            if let Some(instr) = function.instruction_at_mut(loc) {
                                instr.set_op(Op::Const {
                                    dest,
                                    value: ConstValue::Bool(false),
                                });
                            }
                            elided += 1;
                            // The snapshot being iterated is stale now.
                            continue 'rescan;
                        }
                    }
                    _ => {}
                }
            }
            break;
        }
    }

    Ok(elided)
}

/// The null-check elision pass.
///
/// # Examples
///
/// ```rust
/// use nullelide::ir::{DeclAttrs, FuncDecl, FunctionBuilder, Module, Type};
/// use nullelide::passes::{MallocNonNullPass, PassManager};
///
/// let mut module = Module::new("m");
/// module.declare(FuncDecl::new(
///     "malloc",
///     Type::opaque_ptr(),
///     vec![Type::I64],
///     DeclAttrs::DECLARATION,
/// ))?;
///
/// let mut f = FunctionBuilder::new("f");
/// f.block(0, |b| {
///     let size = b.const_i64(8);
///     let p = b.call("malloc", &[size]);
///     let null = b.const_null();
///     let cond = b.cmp_eq(p, null);
///     b.ret_value(cond);
/// });
/// module.add_function(f.finish())?;
///
/// let mut manager = PassManager::new();
/// manager.add_pass(MallocNonNullPass::new());
/// assert!(manager.run(&mut module)?);
/// assert_eq!(manager.statistics().comparisons_elided(), 1);
/// # Ok::<(), nullelide::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MallocNonNullPass;

impl MallocNonNullPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FunctionPass for MallocNonNullPass {
    fn name(&self) -> &'static str {
        "mallocs-nonnull"
    }

    fn description(&self) -> &'static str {
        "Use the fact that malloc() doesn't return NULL"
    }

    fn run_on_function(
        &self,
        function: &mut Function,
        symbols: &SymbolTable,
        stats: &PassStatistics,
    ) -> Result<bool> {
        let recognizer = AllocRecognizer::new(symbols);

        // Roots are collected up front; rewrites never add or remove calls,
        // so the set cannot change mid-pass.
        let mut roots = Vec::new();
        for block in function.blocks() {
            for instr in block.instructions() {
                if recognizer.is_nonnull_alloc(instr.op()) {
                    if let Some(dest) = instr.def() {
                        roots.push(dest);
                    }
                }
            }
        }

        let defs = DefinitionCache::new(function);
        let mut elided = 0u64;
        for root in roots {
            elided += elide_null_checks(function, &defs, root)?;
        }

        stats.add_comparisons_elided(elided);
        Ok(elided > 0)
    }
}
