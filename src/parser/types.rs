//! Type parsing implementation.
//!
//! This module handles parsing of type specifiers. It supports:
//!
//! - Built-in types (`void`, `bool`, `char`, `int`, `double`)
//! - Pointer types (`T*`)
//! - Array types (`T[N]`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers, so suffixes chain left to right: `int*[4]` is an
//! array of four pointers to int.

use crate::{
    ast::types::{BuiltInType, TypeSpecifier},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    lookups::{BindingPower, PrattTable},
    parser::Parser,
};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeSpecifier, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler =
    fn(&mut Parser, TypeSpecifier, BindingPower) -> Result<TypeSpecifier, Error>;

pub type TypeLookup = PrattTable<TypeNUDHandler, TypeLEDHandler>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Void, parse_built_in_type);
    parser.type_nud(TokenKind::Bool, parse_built_in_type);
    parser.type_nud(TokenKind::Char, parse_built_in_type);
    parser.type_nud(TokenKind::Int, parse_built_in_type);
    parser.type_nud(TokenKind::Double, parse_built_in_type);
    parser.type_led(TokenKind::Star, BindingPower::Call, parse_pointer_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_array_type);
}

pub fn parse_built_in_type(parser: &mut Parser) -> Result<TypeSpecifier, Error> {
    let token = parser.advance().clone();
    let ty = match token.kind {
        TokenKind::Void => BuiltInType::Void,
        TokenKind::Bool => BuiltInType::Bool,
        TokenKind::Char => BuiltInType::Char,
        TokenKind::Int => BuiltInType::Int,
        TokenKind::Double => BuiltInType::Double,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(TypeSpecifier::built_in(ty, token.span))
}

pub fn parse_pointer_type(
    parser: &mut Parser,
    left: TypeSpecifier,
    _bp: BindingPower,
) -> Result<TypeSpecifier, Error> {
    let star = parser.expect(TokenKind::Star)?;
    let span = Span {
        start: left.span.start.clone(),
        end: star.span.end,
    };

    Ok(left.pointer_to(span))
}

pub fn parse_array_type(
    parser: &mut Parser,
    left: TypeSpecifier,
    _bp: BindingPower,
) -> Result<TypeSpecifier, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected array size"),
        },
        parser.get_position(),
    );
    let size_token = parser.expect_error(TokenKind::Number, Some(error))?;
    let size = size_token.value.parse::<u32>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: size_token.value.clone(),
            },
            size_token.span.start.clone(),
        )
    })?;

    let close = parser.expect(TokenKind::CloseBracket)?;
    let span = Span {
        start: left.span.start.clone(),
        end: close.span.end,
    };

    Ok(left.array_of(size, span))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeSpecifier, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.get_type_lookup().nud.get(&token_kind) {
        Some(nud_fn) => *nud_fn,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected a type"),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = *parser
            .get_type_lookup()
            .binding_power
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let led_fn = match parser.get_type_lookup().led.get(&token_kind) {
            Some(led_fn) => *led_fn,
            None => break,
        };

        left = led_fn(parser, left, token_bp)?;
    }

    Ok(left)
}
