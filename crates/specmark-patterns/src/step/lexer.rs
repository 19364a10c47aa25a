//! Step lexer converting step text into literal and parameter tokens.

use crate::errors::StepSyntaxError;

use super::Token;
use super::parameter::{parse_angle, parse_static};

/// Split step text into tokens, left to right.
///
/// `"..."` opens a static parameter and `<...>` a dynamic or special one. A
/// backslash outside a parameter makes the next character literal, so `\<`
/// and `\"` can appear in plain text. A stray `>` is literal text.
///
/// # Errors
/// Returns [`StepSyntaxError`] when the text is blank or a parameter is left
/// unterminated or unnamed.
///
/// # Examples
/// ```
/// use specmark_patterns::{Token, lex_step};
/// let tokens = lex_step("greet <user>").unwrap_or_default();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens.first(), Some(&Token::Text("greet ".into())));
/// ```
pub fn lex_step(text: &str) -> Result<Vec<Token>, StepSyntaxError> {
    if text.trim().is_empty() {
        return Err(StepSyntaxError::Empty);
    }

    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    let flush_literal = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Text(std::mem::take(literal)));
        }
    };

    while let Some(ch) = text.get(pos..).and_then(|rest| rest.chars().next()) {
        match ch {
            '\\' => {
                match text.get(pos + 1..).and_then(|rest| rest.chars().next()) {
                    Some(next) => {
                        literal.push(next);
                        pos += 1 + next.len_utf8();
                    }
                    None => {
                        literal.push('\\');
                        pos += 1;
                    }
                }
            }
            '"' => {
                flush_literal(&mut literal, &mut tokens);
                let (next_pos, token) = parse_static(text, pos)?;
                tokens.push(token);
                pos = next_pos;
            }
            '<' => {
                flush_literal(&mut literal, &mut tokens);
                let (next_pos, token) = parse_angle(text, pos)?;
                tokens.push(token);
                pos = next_pos;
            }
            _ => {
                literal.push(ch);
                pos += ch.len_utf8();
            }
        }
    }

    flush_literal(&mut literal, &mut tokens);
    Ok(tokens)
}
