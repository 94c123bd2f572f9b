//! Modules and external symbol declarations.
//!
//! A [`Module`] is a set of function bodies plus a [`SymbolTable`] of
//! declarations. Declarations carry the signature facts recognition logic
//! depends on: return type, parameter types, and whether the symbol is a
//! body-less external declaration.

use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;

use super::{Function, Type};
use crate::Result;

bitflags! {
    /// Attributes of a function declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeclAttrs: u8 {
        /// The symbol is declared but has no body in this module.
        const DECLARATION = 1 << 0;
        /// The function accepts additional variadic arguments.
        const VARARG = 1 << 1;
    }
}

/// A function declaration: the signature facts known about a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    name: String,
    ret: Type,
    params: Vec<Type>,
    attrs: DeclAttrs,
}

impl FuncDecl {
    /// Creates a declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, ret: Type, params: Vec<Type>, attrs: DeclAttrs) -> Self {
        Self {
            name: name.into(),
            ret,
            params,
            attrs,
        }
    }

    /// Returns the declared symbol name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared return type.
    #[must_use]
    pub fn ret(&self) -> &Type {
        &self.ret
    }

    /// Returns the declared parameter types.
    #[must_use]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// Returns the number of declared (fixed) parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the symbol has no body in this module.
    #[must_use]
    pub const fn is_declaration(&self) -> bool {
        self.attrs.contains(DeclAttrs::DECLARATION)
    }

    /// Returns `true` if the function is variadic.
    #[must_use]
    pub const fn is_vararg(&self) -> bool {
        self.attrs.contains(DeclAttrs::VARARG)
    }
}

impl fmt::Display for FuncDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "declare {} {}(", self.ret, self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        if self.is_vararg() {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

/// Name-indexed registry of function declarations.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    decls: Vec<FuncDecl>,
    by_name: HashMap<String, usize>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateSymbol`] if the name is already
    /// registered.
    pub fn insert(&mut self, decl: FuncDecl) -> Result<()> {
        if self.by_name.contains_key(decl.name()) {
            return Err(crate::Error::DuplicateSymbol(decl.name().to_string()));
        }
        self.by_name.insert(decl.name().to_string(), self.decls.len());
        self.decls.push(decl);
        Ok(())
    }

    /// Looks up a declaration by name.
    #[must_use]
    pub fn decl(&self, name: &str) -> Option<&FuncDecl> {
        self.by_name.get(name).map(|&idx| &self.decls[idx])
    }

    /// Returns all declarations in registration order.
    #[must_use]
    pub fn decls(&self) -> &[FuncDecl] {
        &self.decls
    }

    /// Returns the number of registered declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns `true` if no declarations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// A module: declarations plus function bodies.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    symbols: SymbolTable,
    functions: Vec<Function>,
}

impl Module {
    /// Creates a new empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: SymbolTable::new(),
            functions: Vec::new(),
        }
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers an external declaration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateSymbol`] if the name is already
    /// declared.
    pub fn declare(&mut self, decl: FuncDecl) -> Result<()> {
        self.symbols.insert(decl)
    }

    /// Returns the symbol table of this module.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Adds a function body to this module.
    ///
    /// Every non-empty block must end with a terminator whose targets refer
    /// to existing blocks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if a block is missing its
    /// terminator or branches out of range.
    pub fn add_function(&mut self, function: Function) -> Result<()> {
        let block_count = function.block_count();
        for block in function.blocks() {
            if block.terminator().is_none() {
                return Err(malformed_error!(
                    "block B{} of '{}' does not end with a terminator",
                    block.id(),
                    function.name()
                ));
            }
            for target in block.successors() {
                if target >= block_count {
                    return Err(malformed_error!(
                        "block B{} of '{}' branches to non-existent block B{}",
                        block.id(),
                        function.name(),
                        target
                    ));
                }
            }
        }
        self.functions.push(function);
        Ok(())
    }

    /// Returns the function bodies of this module.
    #[must_use]
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Looks up a function body by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Splits the module into its symbol table and mutable function bodies.
    ///
    /// Passes receive the function they transform mutably and the symbol
    /// table they query immutably; this borrow split makes both available
    /// at once.
    pub fn split_mut(&mut self) -> (&SymbolTable, &mut [Function]) {
        (&self.symbols, &mut self.functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BasicBlock, Instruction, Op};
    use crate::Error;

    fn malloc_decl() -> FuncDecl {
        FuncDecl::new(
            "malloc",
            Type::opaque_ptr(),
            vec![Type::I64],
            DeclAttrs::DECLARATION,
        )
    }

    #[test]
    fn test_decl_accessors() {
        let decl = malloc_decl();
        assert_eq!(decl.name(), "malloc");
        assert_eq!(decl.ret(), &Type::opaque_ptr());
        assert_eq!(decl.param_count(), 1);
        assert!(decl.is_declaration());
        assert!(!decl.is_vararg());
    }

    #[test]
    fn test_decl_display() {
        assert_eq!(format!("{}", malloc_decl()), "declare i8* malloc(i64)");

        let printf = FuncDecl::new(
            "printf",
            Type::I32,
            vec![Type::opaque_ptr()],
            DeclAttrs::DECLARATION | DeclAttrs::VARARG,
        );
        assert_eq!(format!("{printf}"), "declare i32 printf(i8*, ...)");
    }

    #[test]
    fn test_symbol_table_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        table.insert(malloc_decl()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.decl("malloc").is_some());
        assert!(table.decl("free").is_none());
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut module = Module::new("m");
        module.declare(malloc_decl()).unwrap();
        match module.declare(malloc_decl()) {
            Err(Error::DuplicateSymbol(name)) => assert_eq!(name, "malloc"),
            other => panic!("expected DuplicateSymbol, got {other:?}"),
        }
    }

    #[test]
    fn test_add_function_requires_terminators() {
        let mut module = Module::new("m");

        let mut f = Function::new("broken");
        let v0 = f.fresh_value();
        let mut b0 = BasicBlock::new(0);
        b0.add_instruction(Instruction::new(Op::Const {
            dest: v0,
            value: crate::ir::ConstValue::I32(0),
        }));
        f.add_block(b0);

        assert!(matches!(
            module.add_function(f),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_add_function_rejects_out_of_range_branch() {
        let mut module = Module::new("m");

        let mut f = Function::new("broken");
        let mut b0 = BasicBlock::new(0);
        b0.add_instruction(Instruction::new(Op::Jump { target: 3 }));
        f.add_block(b0);

        assert!(matches!(
            module.add_function(f),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_function_lookup() {
        let mut module = Module::new("m");

        let mut f = Function::new("main");
        let mut b0 = BasicBlock::new(0);
        b0.add_instruction(Instruction::new(Op::Return { value: None }));
        f.add_block(b0);
        module.add_function(f).unwrap();

        assert!(module.function("main").is_some());
        assert!(module.function("other").is_none());
        assert_eq!(module.functions().len(), 1);
    }
}
