//! Render lexed tokens into the keyed forms of a step.

use super::{Segment, Token};

/// Marker standing in for each parameter in a normalised step value.
pub const PARAMETER_MARKER: &str = "{}";

/// Build the normalised value of a step from its tokens.
///
/// Every parameter becomes [`PARAMETER_MARKER`]; runs of whitespace in
/// literal text collapse to one space and the result is trimmed, so
/// `say  "hi"` and `say <greeting>` both normalise to `say {}`. Literal
/// braces are doubled, which keeps a step written as `print {} literally`
/// apart from `print <x> literally`.
///
/// # Examples
/// ```
/// use specmark_patterns::{lex_step, normalise};
/// let tokens = lex_step("log in as  \"alice\"").unwrap_or_default();
/// assert_eq!(normalise(&tokens), "log in as {}");
/// let tokens = lex_step("print {} literally").unwrap_or_default();
/// assert_eq!(normalise(&tokens), "print {{}} literally");
/// ```
#[must_use]
pub fn normalise(tokens: &[Token]) -> String {
    let mut rendered = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => {
                for ch in text.chars() {
                    if matches!(ch, '{' | '}') {
                        rendered.push(ch);
                    }
                    rendered.push(ch);
                }
            }
            _ => rendered.push_str(PARAMETER_MARKER),
        }
    }
    collapse_whitespace(&rendered)
}

/// Build the parameterised value of a step, naming each parameter.
///
/// Each parameter renders as `<label>`; whitespace collapses as in
/// [`normalise`].
///
/// # Examples
/// ```
/// use specmark_patterns::{Token, lex_step, parameterise};
/// let tokens = lex_step("log in as \"alice\" with <password>").unwrap_or_default();
/// assert_eq!(
///     parameterise(tokens.iter().map(Token::segment)),
///     "log in as <alice> with <password>"
/// );
/// ```
#[must_use]
pub fn parameterise<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = Segment<'a>>,
{
    let mut rendered = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => rendered.push_str(text),
            Segment::Parameter(label) => {
                rendered.push('<');
                rendered.push_str(&label);
                rendered.push('>');
            }
        }
    }
    collapse_whitespace(&rendered)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
