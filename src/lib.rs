// Copyright 2025 The nullelide developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # nullelide
//!
//! A middle-end optimization framework built around null-check elision:
//! comparisons of guaranteed-non-null allocation results against null are
//! folded to constant `false`, across chains of pointer-preserving casts.
//!
//! ## Features
//!
//! - **Typed IR** - A small single-assignment IR with explicit def/use
//!   queries and materialized constants
//! - **Closure-style builder** - Assemble functions programmatically,
//!   block by block
//! - **Pass infrastructure** - A `FunctionPass` trait, a manager that
//!   enforces control-flow preservation structurally, and explicit
//!   statistics accumulation
//! - **The `mallocs-nonnull` pass** - Recognizes `malloc`-family and
//!   `operator new` symbols by exact declaration signature and elides
//!   null checks on their results
//!
//! ## Quick Start
//!
//! ```rust
//! use nullelide::prelude::*;
//!
//! let mut module = Module::new("demo");
//! module.declare(FuncDecl::new(
//!     "malloc",
//!     Type::opaque_ptr(),
//!     vec![Type::I64],
//!     DeclAttrs::DECLARATION,
//! ))?;
//!
//! let mut f = FunctionBuilder::new("check");
//! f.block(0, |b| {
//!     let size = b.const_i64(64);
//!     let p = b.call("malloc", &[size]);
//!     let null = b.const_null();
//!     let cond = b.cmp_eq(p, null);
//!     b.branch(cond, 1, 2);
//! });
//! f.block(1, |b| b.ret());
//! f.block(2, |b| b.ret());
//! module.add_function(f.finish())?;
//!
//! let mut manager = PassManager::new();
//! manager.add_pass(MallocNonNullPass::new());
//! let changed = manager.run(&mut module)?;
//!
//! assert!(changed);
//! assert_eq!(manager.statistics().comparisons_elided(), 1);
//! # Ok::<(), nullelide::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - The intermediate representation: values, types, operations,
//!   blocks, functions, modules, and the builder
//! - [`passes`] - Pass trait, pass manager, statistics, and the
//!   null-check elision pass itself
//!
//! Recognition is deliberately conservative: a symbol with the right name
//! but the wrong declared signature is never treated as non-null. Passes
//! run single-threaded, and the pass manager verifies after every pass
//! invocation that block identity and successor structure are unchanged.

#[macro_use]
pub(crate) mod error;

pub mod ir;
pub mod passes;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use nullelide::prelude::*;
///
/// let mut module = Module::new("m");
/// let mut manager = PassManager::new();
/// manager.add_pass(MallocNonNullPass::new());
/// let changed = manager.run(&mut module)?;
/// assert!(!changed);
/// # Ok::<(), nullelide::Error>(())
/// ```
pub mod prelude;

pub use error::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
