//! Symbol records produced by name analysis.
//!
//! Symbols live in a [`Symbols`] arena and are referred to by [`SymId`];
//! the AST itself is never mutated. An identifier node is tied to its symbol
//! through the `uses` side table of [`crate::sema::resolver::Resolution`].

use std::collections::HashMap;

use crate::sema::types::Ty;

/// Index of a symbol in the [`Symbols`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// An `int` or `bool` variable or formal. `offset` is the `$fp`-relative
    /// location for locals and formals; globals are addressed by label and
    /// keep the sentinel `-1`.
    Var {
        ty: Ty,
        offset: i32,
        is_global: bool,
    },
    Fn {
        ret: Ty,
        params: Vec<Ty>,
        /// Bytes of formals, `4 * params.len()`.
        param_size: i32,
        /// Bytes of locals in the function body.
        local_size: i32,
    },
    /// A variable of some declared struct type.
    StructInstance {
        /// The `StructDef` symbol of the declared type.
        def: SymId,
        is_global: bool,
    },
    /// A struct declaration, owning the symbol table of its fields.
    StructDef { fields: HashMap<String, SymId> },
}

#[derive(Debug, Clone, Default)]
pub struct Symbols {
    arena: Vec<Symbol>,
}

impl Symbols {
    pub fn new() -> Self {
        Symbols::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymId {
        let id = SymId(self.arena.len() as u32);
        self.arena.push(symbol);
        id
    }

    pub fn get(&self, id: SymId) -> &Symbol {
        &self.arena[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymId) -> &mut Symbol {
        &mut self.arena[id.0 as usize]
    }

    /// The type a use of this symbol has in an expression.
    pub fn ty_of(&self, id: SymId) -> Ty {
        match self.get(id) {
            Symbol::Var { ty, .. } => ty.clone(),
            Symbol::Fn { ret, params, .. } => Ty::Fn {
                params: params.clone(),
                ret: Box::new(ret.clone()),
            },
            Symbol::StructInstance { def, .. } => Ty::Struct(*def),
            Symbol::StructDef { .. } => Ty::StructDef(id),
        }
    }

    /// Whether this symbol is addressed by label rather than frame offset.
    pub fn is_global(&self, id: SymId) -> bool {
        match self.get(id) {
            Symbol::Var { is_global, .. } | Symbol::StructInstance { is_global, .. } => *is_global,
            Symbol::Fn { .. } | Symbol::StructDef { .. } => true,
        }
    }

    /// The `$fp`-relative offset of a local or formal.
    pub fn offset_of(&self, id: SymId) -> i32 {
        match self.get(id) {
            Symbol::Var { offset, .. } => *offset,
            _ => 0,
        }
    }
}
