//! Pass infrastructure.
//!
//! This module defines the [`FunctionPass`] trait, the [`PassManager`] that
//! drives passes over every function of a module, and the
//! [`PassStatistics`] accumulator passes report into.
//!
//! # Control-flow preservation
//!
//! Every pass run by the manager must preserve control-flow structure:
//! block identity and successor sets. Instead of trusting a declaration to
//! that effect, the manager snapshots the control-flow shape of each
//! function around every pass invocation and fails with
//! [`crate::Error::CfgModified`] on any difference.

mod nonnull;

pub use nonnull::{AllocRecognizer, MallocNonNullPass, ALLOC_SYMBOLS, DEALLOC_SYMBOLS};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ir::{Function, Module, SymbolTable};
use crate::Result;

/// An optimization pass that operates on one function at a time.
///
/// Passes are `Send + Sync` and take `&self`; any counters they maintain go
/// through the shared [`PassStatistics`]. Execution itself is
/// single-threaded: the manager visits functions in order, one at a time.
pub trait FunctionPass: Send + Sync {
    /// Unique name for logging and debugging.
    fn name(&self) -> &'static str;

    /// Get a description of what this pass does.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Should this pass run on a specific function?
    ///
    /// Called before `run_on_function`. Override to skip functions that
    /// don't need this pass.
    fn should_run(&self, _function: &Function, _symbols: &SymbolTable) -> bool {
        true
    }

    /// Run the pass on a single function.
    ///
    /// Returns `true` if any changes were made, `false` otherwise.
    /// Counters should be recorded directly into `stats`.
    ///
    /// # Arguments
    ///
    /// * `function` - The function to transform.
    /// * `symbols` - The module's declaration table, for signature lookups.
    /// * `stats` - The shared statistics accumulator.
    ///
    /// # Errors
    ///
    /// Returns an error if the pass fails to process the function.
    fn run_on_function(
        &self,
        function: &mut Function,
        symbols: &SymbolTable,
        stats: &PassStatistics,
    ) -> Result<bool>;
}

/// Accumulated counters from pass execution.
///
/// Counters are explicit state owned by the manager, handed to passes by
/// reference. Atomics keep the recording side `&self` without interior
/// `Mutex` plumbing; there is no cross-thread contention to worry about.
#[derive(Debug, Default)]
pub struct PassStatistics {
    comparisons_elided: AtomicU64,
}

impl PassStatistics {
    /// Creates a zeroed statistics accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `n` elided comparisons.
    pub fn add_comparisons_elided(&self, n: u64) {
        self.comparisons_elided.fetch_add(n, Ordering::Relaxed);
    }

    /// Number of comparisons elided so far.
    #[must_use]
    pub fn comparisons_elided(&self) -> u64 {
        self.comparisons_elided.load(Ordering::Relaxed)
    }
}

/// Shape of a function's control-flow graph: block ids with successor sets.
fn cfg_shape(function: &Function) -> Vec<(usize, Vec<usize>)> {
    function
        .blocks()
        .iter()
        .map(|b| (b.id(), b.successors()))
        .collect()
}

/// Runs registered passes over every function of a module.
///
/// # Examples
///
/// ```rust
/// use nullelide::passes::{MallocNonNullPass, PassManager};
/// use nullelide::ir::Module;
///
/// let mut module = Module::new("empty");
/// let mut manager = PassManager::new();
/// manager.add_pass(MallocNonNullPass::new());
/// let changed = manager.run(&mut module)?;
/// assert!(!changed);
/// # Ok::<(), nullelide::Error>(())
/// ```
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn FunctionPass>>,
    stats: PassStatistics,
}

impl PassManager {
    /// Creates a manager with no registered passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pass. Passes run in registration order.
    pub fn add_pass<P: FunctionPass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    /// Returns the number of registered passes.
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Returns the statistics accumulated so far.
    #[must_use]
    pub fn statistics(&self) -> &PassStatistics {
        &self.stats
    }

    /// Runs every registered pass over every function of the module.
    ///
    /// Returns `true` if any pass changed any function.
    ///
    /// # Errors
    ///
    /// Propagates pass failures, and returns
    /// [`crate::Error::CfgModified`] if a pass changed a function's
    /// control-flow shape.
    pub fn run(&self, module: &mut Module) -> Result<bool> {
        let (symbols, functions) = module.split_mut();
        let mut changed = false;

        for function in functions.iter_mut() {
            for pass in &self.passes {
                if !pass.should_run(function, symbols) {
                    continue;
                }

                let shape_before = cfg_shape(function);
                let modified = pass.run_on_function(function, symbols, &self.stats)?;
                if cfg_shape(function) != shape_before {
                    return Err(crate::Error::CfgModified {
                        pass: pass.name(),
                        function: function.name().to_string(),
                    });
                }

                changed |= modified;
            }
        }

        Ok(changed)
    }
}
