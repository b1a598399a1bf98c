//! Type annotation parsing.
//!
//! Annotations are a single raw type keyword (`int32` or `string`) after a
//! colon, in variable declarations, argument lists and return types.

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Consumes a raw type token and maps it to a `Type`.
pub fn parse_raw_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::RawType)?;

    Type::from_raw(&token.value).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownType {
                type_: token.value.clone(),
            },
            token.position.clone(),
        )
    })
}

/// Parses `: type` when the current token is a colon.
///
/// Returns `None` when there is no annotation.
pub fn parse_type_annotation(parser: &mut Parser) -> Result<Option<Type>, Error> {
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(None);
    }

    parser.advance();
    parse_raw_type(parser).map(Some)
}
