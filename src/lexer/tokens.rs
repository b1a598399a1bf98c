use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("fn", TokenKind::Fn);
        map.insert("return", TokenKind::Return);
        map.insert("continue", TokenKind::Continue);
        map.insert("if", TokenKind::If);
        map.insert("break", TokenKind::Break);
        map.insert("string", TokenKind::RawType);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    EOF,
    Newline,

    Identifier,
    Integer,
    Float,
    String,
    RawType, // int32, string

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Colon,
    Semicolon,
    Comma,

    PlusPlus,
    MinusMinus,
    Tilde,

    Plus,
    Dash,
    Star,
    Slash,

    // Reserved
    Var,
    Fn,
    Return,
    Continue,
    If,
    Break,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// `;`, a new line or the end of input all close a statement.
    pub fn is_terminator(&self) -> bool {
        self.is_one_of_many(&[TokenKind::Semicolon, TokenKind::Newline, TokenKind::EOF])
    }

    pub fn debug(&self) {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::RawType,
            TokenKind::Illegal,
        ]) {
            log::trace!("{} ({}) at {}", self.kind, self.value, self.position);
        } else {
            log::trace!("{} () at {}", self.kind, self.position);
        }
    }
}
