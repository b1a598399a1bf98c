use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Position, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Builds a token from the matched text, or returns `None` to skip it.
pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(pattern).expect("lexer patterns are valid regular expressions"),
            handler,
        }
    }
}

lazy_static! {
    // Order matters: the first pattern matching at the cursor wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("^\n", MK_DEFAULT_HANDLER!(TokenKind::Newline, "\n")),
        RegexPattern::new("^[ \t\r]+", skip_handler),
        RegexPattern::new("^int32\\b", MK_DEFAULT_HANDLER!(TokenKind::RawType, "int32")),
        RegexPattern::new("^[a-zA-Z]+", symbol_handler),
        RegexPattern::new("^[0-9]+(\\.[0-9]*)?", number_handler),
        RegexPattern::new("^\"(\\\\.|[^\"\\\\\n])*\"", string_handler),
        RegexPattern::new("^\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        RegexPattern::new("^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        RegexPattern::new("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        RegexPattern::new("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        RegexPattern::new("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        RegexPattern::new("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        RegexPattern::new("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        RegexPattern::new("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        RegexPattern::new("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        RegexPattern::new("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        RegexPattern::new("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        RegexPattern::new("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        RegexPattern::new("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        RegexPattern::new("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        RegexPattern::new("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
    ];
}

/// A lazy token source over one source text.
///
/// Tokens are scanned on demand by [`Iterator::next`]. The stream ends with
/// exactly one `EOF` token, after which the lexer is exhausted and keeps
/// returning `None`.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
    exhausted: bool,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 0,
            file: file_name,
            exhausted: false,
        }
    }

    /// Position of the next unread character.
    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(&self.file))
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance_over(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }

        self.pos += text.len();
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }

        while !self.at_eof() {
            let remainder = self.remainder();
            let matched = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|found| (pattern.handler, found.as_str().to_string()))
            });

            match matched {
                Some((handler, text)) => {
                    let token = handler(self, &text);
                    self.advance_over(&text);

                    if token.is_some() {
                        return token;
                    }
                }
                None => {
                    // Unclassifiable input is handed to the parser rather than failing here.
                    let Some(ch) = remainder.chars().next() else {
                        break;
                    };
                    let text = ch.to_string();
                    let token = MK_TOKEN!(TokenKind::Illegal, text.clone(), self.current_position());
                    self.advance_over(&text);

                    return Some(token);
                }
            }
        }

        self.exhausted = true;
        Some(MK_TOKEN!(TokenKind::EOF, String::new(), self.current_position()))
    }
}

fn skip_handler(_lexer: &mut Lexer, _matched: &str) -> Option<Token> {
    None
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    Some(MK_TOKEN!(kind, matched.to_string(), lexer.current_position()))
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();

                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if byte.is_ascii() => result.push(char::from(byte)),
                    // Literals are stored as UTF-8, a lone byte above 0x7F has no encoding.
                    Ok(_) => {
                        return Some(MK_TOKEN!(
                            TokenKind::Illegal,
                            matched.to_string(),
                            lexer.current_position()
                        ))
                    }
                    Err(_) => result.push_str("\\x"),
                }
            }
            _ => result.push(ch), // Keep the backslash
        }
    }

    Some(MK_TOKEN!(TokenKind::String, result, lexer.current_position()))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    Some(MK_TOKEN!(kind, matched.to_string(), lexer.current_position()))
}

/// Scans a whole source text eagerly, including the trailing `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    Lexer::new(source, file).collect()
}
