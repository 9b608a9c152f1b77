//! Lexical analysis pass using the `logos` crate.

use std::fmt;
use std::iter::Peekable;

use logos::{Logos, SpannedIter};
use serde::{Deserialize, Serialize};

/// A position in the source text, 1-based. `0:0` marks diagnostics with no
/// usable position (e.g. a missing `main` function).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Logos)]
pub enum TokenKind {
    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    #[token("<<")]
    WriteOp,
    #[token(">>")]
    ReadOp,

    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("&&")]
    DoubleAnd,
    #[token("||")]
    DoubleOr,
    #[token("=")]
    Equal,
    #[token("==")]
    DoubleEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,

    // Keywords
    #[token("bool")]
    KwBool,
    #[token("int")]
    KwInt,
    #[token("void")]
    KwVoid,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("struct")]
    KwStruct,
    #[token("cin")]
    KwCin,
    #[token("cout")]
    KwCout,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("repeat")]
    KwRepeat,
    #[token("return")]
    KwReturn,

    // Literals
    #[regex(r"[_a-zA-Z][_0-9a-zA-Z]*")]
    Ident,
    #[regex(r"[0-9]+")]
    IntLit,
    #[regex(r#""(\\[nt'"?\\]|[^"\\\n])*""#)]
    StrLit,

    // Comments run to the end of the line
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    // We ignore whitespace in the lexer
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,
}

/// The binary operators of the expression grammar.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl BinOp {
    pub fn to_str(&self) -> &str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
        }
    }
}

impl UnOp {
    pub fn to_str(&self) -> &str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub location: SourceLoc,
    pub literal: &'a str,
}

// Alias type for TokenIter to be more typing-friendly
pub type LexerIter<'a> = Peekable<Box<TokenIter<'a>>>;

pub struct TokenIter<'a> {
    inner: SpannedIter<'a, TokenKind>,
    src: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> TokenIter<'a> {
    fn locate(&self, byte: usize) -> SourceLoc {
        let line = self.line_starts.partition_point(|&start| start <= byte);
        let col = byte - self.line_starts[line - 1] + 1;
        SourceLoc {
            line: line as u32,
            col: col as u32,
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().and_then(|(kind, span)| {
            Some(Token {
                kind: kind.ok()?,
                location: self.locate(span.start),
                literal: &self.src[span],
            })
        })
    }
}

/// Return an iterator over the tokens in the source string
pub fn lex_tokens(src: &str) -> LexerIter {
    let mut line_starts = vec![0];
    line_starts.extend(src.match_indices('\n').map(|(idx, _)| idx + 1));

    let iter = TokenIter {
        inner: TokenKind::lexer(src).spanned(),
        src,
        line_starts,
    };

    Box::new(iter).peekable()
}
