//! Parameter parsing utilities used by the lexer.

use crate::errors::{ParameterSyntax, StepSyntaxError};
use crate::special::SpecialKind;

use super::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DelimitedSpec {
    pub content: String,
    pub start: usize,
    pub end: usize,
}

/// Read from the opening delimiter at `start` up to its closing partner.
///
/// A backslash escapes the following character, so `\"` inside a static
/// parameter and `\>` inside a dynamic one are kept as content.
fn read_delimited(
    text: &str,
    start: usize,
    syntax: ParameterSyntax,
) -> Result<DelimitedSpec, StepSyntaxError> {
    let close = syntax.closing();
    let mut chars = text.get(start..).unwrap_or_default().char_indices().skip(1);
    let mut content = String::new();
    while let Some((offset, ch)) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some((_, escaped)) => content.push(escaped),
                None => content.push('\\'),
            }
            continue;
        }
        if ch == close {
            return Ok(DelimitedSpec {
                content,
                start,
                end: start + offset + ch.len_utf8(),
            });
        }
        content.push(ch);
    }
    Err(StepSyntaxError::Unterminated {
        syntax,
        start,
        partial: content,
    })
}

pub(crate) fn parse_static(text: &str, start: usize) -> Result<(usize, Token), StepSyntaxError> {
    let spec = read_delimited(text, start, ParameterSyntax::Quoted)?;
    Ok((
        spec.end,
        Token::Static {
            start: spec.start,
            value: spec.content,
        },
    ))
}

pub(crate) fn parse_angle(text: &str, start: usize) -> Result<(usize, Token), StepSyntaxError> {
    let spec = read_delimited(text, start, ParameterSyntax::Angled)?;
    let name = spec.content.trim();
    if name.is_empty() {
        return Err(StepSyntaxError::EmptyName { start });
    }

    let special = name.split_once(':').and_then(|(prefix, reference)| {
        SpecialKind::from_prefix(prefix.trim()).map(|kind| (kind, reference.trim()))
    });
    let token = match special {
        Some((kind, "")) => return Err(StepSyntaxError::MissingReference { kind, start }),
        Some((kind, reference)) => Token::Special {
            start: spec.start,
            kind,
            reference: reference.to_string(),
        },
        None => Token::Dynamic {
            start: spec.start,
            name: name.to_string(),
        },
    };
    Ok((spec.end, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::test_support::{parse_angle_err, parse_angle_ok};

    #[test]
    fn parses_basic_dynamic_parameter() {
        let text = "<user>";
        let (next, token) = parse_angle_ok(text);
        assert_eq!(next, text.len());
        assert_eq!(
            token,
            Token::Dynamic {
                start: 0,
                name: "user".into()
            }
        );
    }

    #[test]
    fn parses_special_file_parameter() {
        let (_, token) = parse_angle_ok("<file: notes/a.txt >");
        assert_eq!(
            token,
            Token::Special {
                start: 0,
                kind: SpecialKind::File,
                reference: "notes/a.txt".into(),
            }
        );
    }

    #[test]
    fn unknown_prefix_stays_dynamic() {
        let (_, token) = parse_angle_ok("<env:HOME>");
        assert_eq!(
            token,
            Token::Dynamic {
                start: 0,
                name: "env:HOME".into()
            }
        );
    }

    #[test]
    fn errors_on_missing_closing_bracket() {
        let err = parse_angle_err("<user");
        assert_eq!(
            err,
            StepSyntaxError::Unterminated {
                syntax: ParameterSyntax::Angled,
                start: 0,
                partial: "user".into(),
            }
        );
    }

    #[test]
    fn errors_on_empty_name() {
        assert_eq!(parse_angle_err("< >"), StepSyntaxError::EmptyName { start: 0 });
    }

    #[test]
    fn errors_on_special_without_reference() {
        assert_eq!(
            parse_angle_err("<table:>"),
            StepSyntaxError::MissingReference {
                kind: SpecialKind::Table,
                start: 0,
            }
        );
    }

    #[test]
    fn static_value_keeps_escaped_quotes() {
        let text = r#""say \"hi\"""#;
        let (next, token) = parse_static(text, 0)
            .unwrap_or_else(|err| panic!("static parameter should parse: {err}"));
        assert_eq!(next, text.len());
        assert_eq!(
            token,
            Token::Static {
                start: 0,
                value: "say \"hi\"".into()
            }
        );
    }

    #[test]
    fn static_value_may_be_empty() {
        let (_, token) = parse_static("\"\"", 0)
            .unwrap_or_else(|err| panic!("empty static parameter should parse: {err}"));
        assert_eq!(
            token,
            Token::Static {
                start: 0,
                value: String::new()
            }
        );
    }
}
