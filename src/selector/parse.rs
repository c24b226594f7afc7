// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Expression grammar for label selectors
//!
//! ```text
//! selector    ::= requirement ( "," requirement )*
//! requirement ::= "!" KEY
//!               | KEY ( "=" | "==" | "!=" ) VALUE?
//!               | KEY ( "in" | "notin" ) "(" values ")"
//!               | KEY
//! values      ::= VALUE? ( "," VALUE? )*
//! ```
//!
//! Whitespace between tokens is ignored and `==` is an alias for `=`. An
//! empty expression compiles to the unrestricted selector. A value may be
//! empty (`env=` and `env in (a,)` are both legal) but a value list may
//! not. Malformed input is rejected, never ignored.

use std::collections::BTreeSet;
use std::iter::Peekable;

use super::validation::{validate_label_key, validate_label_value};
use super::{Requirement, Selector};
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    In,
    NotIn,
    Equals,
    NotEquals,
    Not,
    OpenParen,
    CloseParen,
    Comma,
}

type Tokens = Peekable<std::vec::IntoIter<Token>>;

/// Textual form of a token for error reporting.
fn describe(token: &Token) -> String {
    match token {
        Token::Ident(ident) => ident.clone(),
        Token::In => "in".to_string(),
        Token::NotIn => "notin".to_string(),
        Token::Equals => "=".to_string(),
        Token::NotEquals => "!=".to_string(),
        Token::Not => "!".to_string(),
        Token::OpenParen => "(".to_string(),
        Token::CloseParen => ")".to_string(),
        Token::Comma => ",".to_string(),
    }
}

/// Split an expression into tokens.
///
/// Tokenizing never fails: anything that is not a special character or
/// whitespace is collected into an identifier, and identifiers are
/// validated as keys or values during parsing.
fn tokenize(expression: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '(' => {
                chars.next();
                tokens.push(Token::OpenParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::CloseParen);
            }
            '=' => {
                chars.next();
                // "==" is an alias for "="
                if chars.peek() == Some(&'=') {
                    chars.next();
                }
                tokens.push(Token::Equals);
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::NotEquals);
                } else {
                    tokens.push(Token::Not);
                }
            }
            _ => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, ',' | '(' | ')' | '=' | '!') {
                        break;
                    }
                    ident.push(c);
                    chars.next();
                }
                let token = if ident == "in" {
                    Token::In
                } else if ident == "notin" {
                    Token::NotIn
                } else {
                    Token::Ident(ident)
                };
                tokens.push(token);
            }
        }
    }

    tokens
}

pub(super) fn parse(expression: &str) -> Result<Selector, ParseError> {
    let mut tokens = tokenize(expression).into_iter().peekable();

    if tokens.peek().is_none() {
        return Ok(Selector::everything());
    }

    let mut requirements = Vec::new();
    loop {
        requirements.push(parse_requirement(&mut tokens)?);
        match tokens.next() {
            None => break,
            Some(Token::Comma) => continue,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    found: describe(&other),
                    expected: "',' or end of selector",
                });
            }
        }
    }

    Ok(Selector::new(requirements))
}

fn parse_requirement(tokens: &mut Tokens) -> Result<Requirement, ParseError> {
    match tokens.next() {
        Some(Token::Not) => {
            let key = expect_key(tokens)?;
            Ok(Requirement::DoesNotExist { key })
        }
        Some(Token::Ident(key)) => {
            validate_label_key(&key)?;
            match tokens.peek() {
                None | Some(Token::Comma) => Ok(Requirement::Exists { key }),
                Some(Token::Equals) => {
                    tokens.next();
                    let value = parse_value(tokens, &key)?;
                    Ok(Requirement::Equals { key, value })
                }
                Some(Token::NotEquals) => {
                    tokens.next();
                    let value = parse_value(tokens, &key)?;
                    Ok(Requirement::NotEquals { key, value })
                }
                Some(Token::In) => {
                    tokens.next();
                    let values = parse_values(tokens, &key, "in")?;
                    Ok(Requirement::In { key, values })
                }
                Some(Token::NotIn) => {
                    tokens.next();
                    let values = parse_values(tokens, &key, "notin")?;
                    Ok(Requirement::NotIn { key, values })
                }
                Some(other) => Err(ParseError::UnexpectedToken {
                    found: describe(other),
                    expected: "operator, ',' or end of selector",
                }),
            }
        }
        Some(other) => Err(ParseError::UnexpectedToken {
            found: describe(&other),
            expected: "label key or '!'",
        }),
        None => Err(ParseError::UnexpectedEof {
            expected: "label key or '!'",
        }),
    }
}

fn expect_key(tokens: &mut Tokens) -> Result<String, ParseError> {
    match tokens.next() {
        Some(Token::Ident(key)) => {
            validate_label_key(&key)?;
            Ok(key)
        }
        Some(other) => Err(ParseError::UnexpectedToken {
            found: describe(&other),
            expected: "label key",
        }),
        None => Err(ParseError::UnexpectedEof {
            expected: "label key",
        }),
    }
}

/// Value of an equality requirement. A missing identifier after the
/// operator denotes the empty value, so `env=` parses.
fn parse_value(tokens: &mut Tokens, key: &str) -> Result<String, ParseError> {
    let value = match tokens.peek() {
        Some(Token::Ident(value)) => {
            let value = value.clone();
            tokens.next();
            value
        }
        _ => String::new(),
    };
    validate_label_value(key, &value)?;
    Ok(value)
}

/// Parenthesized value list of a set requirement. The list must be
/// non-empty; individual values may be empty (`(a,)` reads as `a` and the
/// empty value).
fn parse_values(
    tokens: &mut Tokens,
    key: &str,
    operator: &str,
) -> Result<BTreeSet<String>, ParseError> {
    match tokens.next() {
        Some(Token::OpenParen) => {}
        Some(other) => {
            return Err(ParseError::UnexpectedToken {
                found: describe(&other),
                expected: "'('",
            });
        }
        None => {
            return Err(ParseError::UnexpectedEof { expected: "'('" });
        }
    }

    if tokens.peek() == Some(&Token::CloseParen) {
        return Err(ParseError::MissingValues {
            key: key.to_string(),
            operator: operator.to_string(),
        });
    }

    let mut values = BTreeSet::new();
    loop {
        let value = match tokens.peek() {
            Some(Token::Ident(value)) => {
                let value = value.clone();
                tokens.next();
                value
            }
            _ => String::new(),
        };
        validate_label_value(key, &value)?;
        values.insert(value);

        match tokens.next() {
            Some(Token::CloseParen) => break,
            Some(Token::Comma) => continue,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    found: describe(&other),
                    expected: "',' or ')'",
                });
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "',' or ')'",
                });
            }
        }
    }

    Ok(values)
}
