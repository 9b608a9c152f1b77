//! Diagnostics raised by name analysis and type checking.

use thiserror::Error;

use crate::syntax::lexer::SourceLoc;

/// An error raised as part of either name analysis or type checking. Every
/// variant carries the source position the message is reported at; the
/// variants with no usable position (a missing `main`, a bare `return`)
/// use `0:0`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    // Name analysis
    #[error("{location} Undeclared identifier")]
    Undeclared { location: SourceLoc },

    #[error("{location} Multiply declared identifier")]
    MultiplyDeclared { location: SourceLoc },

    #[error("{location} Non-function declared void")]
    NonFnDeclaredVoid { location: SourceLoc },

    #[error("{location} Invalid name of struct type")]
    InvalidStructType { location: SourceLoc },

    #[error("{location} Dot-access of non-struct type")]
    DotAccessOfNonStruct { location: SourceLoc },

    #[error("{location} Invalid struct field name")]
    InvalidStructField { location: SourceLoc },

    #[error("{location} No main function")]
    NoMain { location: SourceLoc },

    // Operators
    #[error("{location} Arithmetic operator applied to non-numeric operand")]
    ArithmeticOnNonNumeric { location: SourceLoc },

    #[error("{location} Logical operator applied to non-bool operand")]
    LogicalOnNonBool { location: SourceLoc },

    #[error("{location} Relational operator applied to non-numeric operand")]
    RelationalOnNonNumeric { location: SourceLoc },

    #[error("{location} Type mismatch")]
    TypeMismatch { location: SourceLoc },

    // Equality and assignment on unsupported kinds
    #[error("{location} Equality operator applied to void functions")]
    EqualityOnVoid { location: SourceLoc },

    #[error("{location} Equality operator applied to functions")]
    EqualityOnFns { location: SourceLoc },

    #[error("{location} Equality operator applied to struct names")]
    EqualityOnStructNames { location: SourceLoc },

    #[error("{location} Equality operator applied to struct variables")]
    EqualityOnStructVars { location: SourceLoc },

    #[error("{location} Function assignment")]
    FnAssignment { location: SourceLoc },

    #[error("{location} Struct name assignment")]
    StructNameAssignment { location: SourceLoc },

    #[error("{location} Struct variable assignment")]
    StructVarAssignment { location: SourceLoc },

    // I/O
    #[error("{location} Attempt to read a function")]
    ReadFn { location: SourceLoc },

    #[error("{location} Attempt to read a struct name")]
    ReadStructName { location: SourceLoc },

    #[error("{location} Attempt to read a struct variable")]
    ReadStructVar { location: SourceLoc },

    #[error("{location} Attempt to write a function")]
    WriteFn { location: SourceLoc },

    #[error("{location} Attempt to write a struct name")]
    WriteStructName { location: SourceLoc },

    #[error("{location} Attempt to write a struct variable")]
    WriteStructVar { location: SourceLoc },

    #[error("{location} Attempt to write void")]
    WriteVoid { location: SourceLoc },

    // Conditions
    #[error("{location} Non-bool expression used as an if condition")]
    NonBoolIfCond { location: SourceLoc },

    #[error("{location} Non-bool expression used as a while condition")]
    NonBoolWhileCond { location: SourceLoc },

    #[error("{location} Non-integer expression used as a repeat clause")]
    NonIntRepeatClause { location: SourceLoc },

    // Calls
    #[error("{location} Attempt to call a non-function")]
    CallNonFn { location: SourceLoc },

    #[error("{location} Function call with wrong number of args")]
    WrongArgCount { location: SourceLoc },

    #[error("{location} Type of actual does not match type of formal")]
    ActualFormalMismatch { location: SourceLoc },

    // Returns
    #[error("{location} Return with a value in a void function")]
    ReturnValueInVoidFn { location: SourceLoc },

    #[error("{location} Missing return value")]
    MissingReturnValue { location: SourceLoc },

    #[error("{location} Bad return value")]
    BadReturnValue { location: SourceLoc },
}

impl SemanticError {
    pub fn location(&self) -> SourceLoc {
        match self {
            SemanticError::Undeclared { location }
            | SemanticError::MultiplyDeclared { location }
            | SemanticError::NonFnDeclaredVoid { location }
            | SemanticError::InvalidStructType { location }
            | SemanticError::DotAccessOfNonStruct { location }
            | SemanticError::InvalidStructField { location }
            | SemanticError::NoMain { location }
            | SemanticError::ArithmeticOnNonNumeric { location }
            | SemanticError::LogicalOnNonBool { location }
            | SemanticError::RelationalOnNonNumeric { location }
            | SemanticError::TypeMismatch { location }
            | SemanticError::EqualityOnVoid { location }
            | SemanticError::EqualityOnFns { location }
            | SemanticError::EqualityOnStructNames { location }
            | SemanticError::EqualityOnStructVars { location }
            | SemanticError::FnAssignment { location }
            | SemanticError::StructNameAssignment { location }
            | SemanticError::StructVarAssignment { location }
            | SemanticError::ReadFn { location }
            | SemanticError::ReadStructName { location }
            | SemanticError::ReadStructVar { location }
            | SemanticError::WriteFn { location }
            | SemanticError::WriteStructName { location }
            | SemanticError::WriteStructVar { location }
            | SemanticError::WriteVoid { location }
            | SemanticError::NonBoolIfCond { location }
            | SemanticError::NonBoolWhileCond { location }
            | SemanticError::NonIntRepeatClause { location }
            | SemanticError::CallNonFn { location }
            | SemanticError::WrongArgCount { location }
            | SemanticError::ActualFormalMismatch { location }
            | SemanticError::ReturnValueInVoidFn { location }
            | SemanticError::MissingReturnValue { location }
            | SemanticError::BadReturnValue { location } => *location,
        }
    }
}
