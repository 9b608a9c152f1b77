//! The checker's type lattice.

use std::fmt;

use crate::sema::symbol::SymId;

/// The type of an expression or declaration. Struct types are identified by
/// the symbol of their declaration, so two structs with the same field list
/// are still distinct types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Int,
    Bool,
    Void,
    Str,
    /// An instance of the struct declared by the given symbol.
    Struct(SymId),
    /// The struct name itself — a type, not a value.
    StructDef(SymId),
    Fn {
        params: Vec<Ty>,
        ret: Box<Ty>,
    },
    /// Sentinel for an already-reported error; suppresses cascades.
    Error,
}

impl Ty {
    pub fn is_int(&self) -> bool {
        matches!(self, Ty::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Ty::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Ty::Void)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Ty::Str)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Ty::Struct(_))
    }

    pub fn is_struct_def(&self) -> bool {
        matches!(self, Ty::StructDef(_))
    }

    pub fn is_fn(&self) -> bool {
        matches!(self, Ty::Fn { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Bool => write!(f, "bool"),
            Ty::Void => write!(f, "void"),
            Ty::Str => write!(f, "string"),
            Ty::Struct(_) => write!(f, "struct"),
            Ty::StructDef(_) => write!(f, "struct name"),
            Ty::Fn { params, ret } => {
                let params: Vec<String> = params.iter().map(Ty::to_string).collect();
                write!(f, "{} -> {}", params.join(", "), ret)
            }
            Ty::Error => write!(f, "error"),
        }
    }
}
