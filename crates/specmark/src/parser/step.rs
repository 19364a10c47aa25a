//! Turn the text of a step line into a [`Step`].

use specmark_patterns::{Token, lex_step, normalise};

use crate::error::ParseError;
use crate::model::{Fragment, Step, StepArg};

/// Build a step from its text, resolving each parameter token with `resolve`.
///
/// Literal tokens become text fragments; every parameter token becomes a
/// parameter fragment and an argument, in that order.
pub(crate) fn build_step<F>(text: &str, line: usize, mut resolve: F) -> Result<Step, ParseError>
where
    F: FnMut(&Token) -> Result<StepArg, ParseError>,
{
    let text = text.trim();
    let tokens = lex_step(text).map_err(|source| ParseError::StepSyntax { line, source })?;
    let mut fragments = Vec::with_capacity(tokens.len());
    let mut args = Vec::new();
    for token in &tokens {
        if let Token::Text(literal) = token {
            fragments.push(Fragment::Text(literal.clone()));
        } else {
            let arg = resolve(token)?;
            fragments.push(Fragment::Parameter(arg.clone()));
            args.push(arg);
        }
    }
    Step::new(text, normalise(&tokens), fragments, args, line)
}

/// Map a static or dynamic token to its argument.
///
/// Returns `None` for literal text and special references, which need a
/// resource reader to resolve.
pub(crate) fn plain_arg(token: &Token) -> Option<StepArg> {
    match token {
        Token::Static { value, .. } => Some(StepArg::Static {
            value: value.clone(),
        }),
        Token::Dynamic { name, .. } => Some(StepArg::Dynamic { name: name.clone() }),
        Token::Text(_) | Token::Special { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Result<Step, ParseError> {
        build_step(text, 3, |token| {
            plain_arg(token).ok_or_else(|| ParseError::SpecialParameter {
                line: 3,
                reference: token.display_name(),
                reason: "unsupported".into(),
            })
        })
    }

    #[test]
    fn builds_fragments_in_source_order() {
        let step = plain("  log in as \"alice\" with <password> ")
            .unwrap_or_else(|e| panic!("step should build: {e}"));
        assert_eq!(step.line_text(), "log in as \"alice\" with <password>");
        assert_eq!(step.value(), "log in as {} with {}");
        assert_eq!(
            step.fragments(),
            &[
                Fragment::Text("log in as ".into()),
                Fragment::Parameter(StepArg::Static {
                    value: "alice".into()
                }),
                Fragment::Text(" with ".into()),
                Fragment::Parameter(StepArg::Dynamic {
                    name: "password".into()
                }),
            ]
        );
        assert_eq!(step.line(), 3);
    }

    #[test]
    fn reports_syntax_errors_with_line() {
        let err = plain("open \"door")
            .err()
            .unwrap_or_else(|| panic!("unterminated quote should fail"));
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err, ParseError::StepSyntax { .. }));
    }

    #[test]
    fn resolver_failures_propagate() {
        let err = plain("load <file:a.txt>")
            .err()
            .unwrap_or_else(|| panic!("special parameter should be refused"));
        assert!(matches!(err, ParseError::SpecialParameter { .. }));
    }
}
