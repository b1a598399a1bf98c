//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the entry point. The
//! parser looks at two tokens at a time (`current` and `peek`) and pulls
//! new tokens lazily from its token source.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! and the symbol tables used to resolve names while parsing.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{ast::Program, types::Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    resolver::{CallSite, FnSignature, PendingCalls},
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The token source, pulled one token at a time
    tokens: Box<dyn Iterator<Item = Token>>,
    /// Set once the token source returned nothing; it is never pulled again
    exhausted: bool,
    /// The token being looked at
    current: Token,
    /// One token of lookahead
    peek: Token,
    /// Literal of the last consumed token, for diagnostics
    previous_value: String,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    // TODO: scope variables per function; every variable is global from the
    // parser's point of view, so locals of different functions alias.
    variables: HashMap<String, Type>,
    /// Declared functions, including the one whose body is being parsed
    functions: HashMap<String, FnSignature>,
    /// Calls to functions that are not declared yet
    pending_calls: PendingCalls,
}

impl Parser {
    /// Creates a new Parser instance and fills the two-token window.
    ///
    /// # Arguments
    ///
    /// * `tokens` - The token source, usually a `Lexer`
    /// * `file` - Reference-counted string containing the source file name
    pub fn new<I>(tokens: I, file: Rc<String>) -> Self
    where
        I: IntoIterator<Item = Token>,
        I::IntoIter: 'static,
    {
        let placeholder = MK_TOKEN!(
            TokenKind::EOF,
            String::new(),
            Position::new(1, 0, file)
        );

        let mut parser = Parser {
            tokens: Box::new(tokens.into_iter()),
            exhausted: false,
            current: placeholder.clone(),
            peek: placeholder,
            previous_value: String::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            variables: HashMap::new(),
            functions: HashMap::new(),
            pending_calls: PendingCalls::default(),
        };

        parser.peek = parser.pull();
        parser.advance();

        parser
    }

    /// Takes the next token from the source, or an `EOF` once it ran dry.
    fn pull(&mut self) -> Token {
        if !self.exhausted {
            if let Some(token) = self.tokens.next() {
                token.debug();
                return token;
            }

            self.exhausted = true;
        }

        MK_TOKEN!(TokenKind::EOF, String::new(), self.peek.position.clone())
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns the token after the current one.
    pub fn peek_token(&self) -> &Token {
        &self.peek
    }

    /// Returns the kind of the token after the current one.
    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    /// Advances to the next token and returns the previous current token.
    ///
    /// Once `EOF` has been reached the window stays on it.
    pub fn advance(&mut self) -> Token {
        let next = if self.peek.kind == TokenKind::EOF {
            self.peek.clone()
        } else {
            self.pull()
        };

        let previous = std::mem::replace(&mut self.current, std::mem::replace(&mut self.peek, next));
        self.previous_value = previous.value.clone();

        previous
    }

    /// The error reported for a token no rule expected.
    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current.value.clone(),
            },
            self.get_position(),
        )
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current.kind == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) => Err(error),
            None if self.current.kind == TokenKind::Illegal => Err(self.unexpected()),
            None => Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: expected_kind,
                    received: self.current.kind,
                },
                self.get_position(),
            )),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the end of a statement: `;` or a new line. `EOF` also ends a
    /// statement but is left in place.
    pub fn expect_terminator(&mut self) -> Result<(), Error> {
        if self.current.is_terminator() {
            if self.current.kind != TokenKind::EOF {
                self.advance();
            }

            return Ok(());
        }

        if self.current.kind == TokenKind::Illegal {
            return Err(self.unexpected());
        }

        Err(Error::new(
            ErrorImpl::ExpectedEndOfStatement {
                after: self.previous_value.clone(),
            },
            self.get_position(),
        ))
    }

    /// Skips new line tokens between statements.
    pub fn skip_newlines(&mut self) {
        while self.current.kind == TokenKind::Newline {
            self.advance();
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.position.clone()
    }

    /// Binds (or rebinds) a variable name to its declared type.
    pub fn declare_variable(&mut self, name: String, var_type: Type) {
        log::trace!("variable `{}` bound as {}", name, var_type);
        self.variables.insert(name, var_type);
    }

    pub fn get_variable(&self, name: &str) -> Option<Type> {
        self.variables.get(name).copied()
    }

    pub fn get_function(&self, name: &str) -> Option<&FnSignature> {
        self.functions.get(name)
    }

    pub fn declare_function(&mut self, signature: FnSignature) {
        log::debug!(
            "function `{}` declared with {} arguments, returning {}",
            signature.name,
            signature.arg_types.len(),
            signature.return_type
        );
        self.functions.insert(signature.name.clone(), signature);
    }

    pub fn get_pending_calls(&self) -> &PendingCalls {
        &self.pending_calls
    }

    pub fn get_pending_calls_mut(&mut self) -> &mut PendingCalls {
        &mut self.pending_calls
    }

    /// Records a call to a function that has not been declared yet.
    pub fn record_pending_call(&mut self, name: &str, call_site: CallSite) -> Result<(), Error> {
        log::debug!(
            "forward reference to `{}` with {} arguments at {}",
            name,
            call_site.arguments.len(),
            call_site.position
        );
        self.pending_calls.record(name, call_site)
    }
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses all statements until EOF. The
/// first error aborts the whole parse.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with its symbol tables after parsing)
/// - Result containing either the Program or an Error
pub fn parse<I>(tokens: I, file: Rc<String>) -> (Parser, Result<Program, Error>)
where
    I: IntoIterator<Item = Token>,
    I::IntoIter: 'static,
{
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let program = parse_program(&mut parser);

    (parser, program)
}

fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let mut statements = vec![];

    loop {
        parser.skip_newlines();
        if !parser.has_tokens() {
            break;
        }

        statements.push(parse_stmt(parser, Type::Void)?);
    }

    if let Some((name, call_site)) = parser.get_pending_calls().first_unresolved() {
        return Err(Error::new(
            ErrorImpl::FunctionNotDefined {
                function: name.clone(),
            },
            call_site.position.clone(),
        ));
    }

    Ok(Program { statements })
}
