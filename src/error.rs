use thiserror::Error;

use crate::ir::ValueId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure conditions that can occur while building IR modules and
/// running optimization passes. Recognition failures inside passes are never errors; a pass
/// that cannot prove a fact simply leaves the code alone. Errors are reserved for broken
/// structural invariants.
///
/// # Error Categories
///
/// ## IR Construction Errors
/// - [`Error::Malformed`] - Inconsistent or invalid IR structure
/// - [`Error::DuplicateSymbol`] - A symbol declared more than once in a module
///
/// ## Pass Execution Errors
/// - [`Error::BrokenUseChain`] - A use site did not reference the value it was indexed under
/// - [`Error::CfgModified`] - A pass changed control-flow structure it promised to preserve
///
/// # Examples
///
/// ```rust
/// use nullelide::{Error, ir::{FuncDecl, DeclAttrs, Module, Type}};
///
/// let mut module = Module::new("demo");
/// let decl = FuncDecl::new("malloc", Type::opaque_ptr(), vec![Type::I64], DeclAttrs::DECLARATION);
/// module.declare(decl.clone()).unwrap();
///
/// match module.declare(decl) {
///     Err(Error::DuplicateSymbol(name)) => {
///         eprintln!("already declared: {}", name);
///     }
///     other => panic!("expected a duplicate symbol error, got {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The IR is structurally inconsistent.
    ///
    /// This error indicates that a module or function violates a structural
    /// requirement, such as a block reference to a non-existent block. The error
    /// includes the source location where the inconsistency was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A symbol was declared more than once in the same module.
    ///
    /// Declarations are keyed by name; a second declaration under the same
    /// name would make signature lookups ambiguous.
    #[error("symbol '{0}' is already declared in this module")]
    DuplicateSymbol(String),

    /// A use site did not reference the value it was indexed under.
    ///
    /// The propagation engine looks up the use sites of a tracked value and
    /// then inspects each using instruction. If a comparison reported as a
    /// use references neither operand equal to the tracked value, the
    /// function's def-use information is corrupt and continuing would fold
    /// comparisons based on stale data. This is fatal.
    #[error("use chain for {value} is inconsistent at B{block}, instruction {instruction}")]
    BrokenUseChain {
        /// The value whose use list was inconsistent
        value: ValueId,
        /// The block containing the offending instruction
        block: usize,
        /// The index of the offending instruction within its block
        instruction: usize,
    },

    /// A pass modified control-flow structure it promised to preserve.
    ///
    /// Every pass run by the [`crate::passes::PassManager`] must leave block
    /// identity and successor structure untouched. The manager snapshots the
    /// control-flow shape around each pass invocation and raises this error
    /// on any difference.
    #[error("pass '{pass}' modified the control flow graph of '{function}'")]
    CfgModified {
        /// The name of the offending pass
        pass: &'static str,
        /// The function whose control flow changed
        function: String,
    },
}
