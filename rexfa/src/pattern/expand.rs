//! Expands the extended surface syntax into the canonical pattern grammar consumed by
//! [`crate::pattern::parse`].
//!
//! Supported extended sequences:
//! * `[abc]`, single choice, expands to `(a|b|c)`
//! * `[0-5]`, range choice, expands to `(0|1|2|3|4|5)`; ranges may be mixed with single chars,
//!   e.g. `[3-6b-d]`
//! * `.`, alias for `Σ`
//! * `?`, alias for `ε`
//! * `\s`, any whitespace, expands to `( |\n|\r|\t)`
//! * `\d`, any digit, equivalent to `[0-9]`
//! * `\w`, any word character, equivalent to `[a-zA-Z0-9_]`

use crate::error::{PatternError, Snippet};
use crate::pattern::escape;

/// Expands `pattern`'s extended syntax into the canonical grammar.
pub fn expand(pattern: &str) -> Result<String, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    if let Some(expansion) = shorthand(next) {
                        out.push_str(&expansion);
                        i += 2;
                        continue;
                    }
                    out.push('\\');
                    out.push(next);
                    i += 2;
                } else {
                    return Err(PatternError::TrailingEscape(Snippet::new(pattern, i)));
                }
            }
            '.' => {
                out.push('Σ');
                i += 1;
            }
            '?' => {
                out.push('ε');
                i += 1;
            }
            '[' => {
                let (expansion, consumed) = expand_class(&chars, i + 1, pattern)?;
                out.push('(');
                out.push_str(&expansion);
                out.push(')');
                i = consumed;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

fn shorthand(c: char) -> Option<String> {
    match c {
        's' => Some("( |\\n|\\r|\\t)".to_string()),
        'd' => Some(expand("[0-9]").expect("literal digit class always expands")),
        'w' => Some(expand("[a-zA-Z0-9_]").expect("literal word class always expands")),
        _ => None,
    }
}

/// Expands the body of a `[...]` class starting right after the `[`. Returns the expansion
/// (without the surrounding parens) and the index right after the closing `]`.
fn expand_class(
    chars: &[char],
    start: usize,
    pattern: &str,
) -> Result<(String, usize), PatternError> {
    let mut members: Vec<String> = Vec::new();
    let mut i = start;
    loop {
        match chars.get(i) {
            None => return Err(PatternError::UnterminatedClass(Snippet::new(pattern, start))),
            Some(']') => return Ok((members.join("|"), i + 1)),
            Some('\\') => {
                let escaped = chars
                    .get(i + 1)
                    .copied()
                    .ok_or_else(|| PatternError::TrailingEscape(Snippet::new(pattern, i)))?;
                members.push(escape(&escaped.to_string()));
                i += 2;
            }
            Some(&lo) => {
                if chars.get(i + 1) == Some(&'-') && chars.get(i + 2).is_some_and(|&c| c != ']') {
                    let hi = chars[i + 2];
                    if lo > hi {
                        return Err(PatternError::InvalidRange(Snippet::new(pattern, i)));
                    }
                    for code in lo as u32..=hi as u32 {
                        if let Some(c) = char::from_u32(code) {
                            members.push(escape(&c.to_string()));
                        }
                    }
                    i += 3;
                } else {
                    members.push(escape(&lo.to_string()));
                    i += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_single_choice() {
        assert_eq!(expand("[abc]").unwrap(), "(a|b|c)");
    }

    #[test]
    fn expands_range() {
        assert_eq!(expand("[0-3]").unwrap(), "(0|1|2|3)");
    }

    #[test]
    fn expands_mixed_class() {
        assert_eq!(expand("[3-5b]").unwrap(), "(3|4|5|b)");
    }

    #[test]
    fn dot_and_question_are_aliases() {
        assert_eq!(expand(".").unwrap(), "Σ");
        assert_eq!(expand("?").unwrap(), "ε");
    }

    #[test]
    fn whitespace_shorthand() {
        assert_eq!(expand(r"\s").unwrap(), "( |\\n|\\r|\\t)");
    }

    #[test]
    fn unterminated_class_is_an_error() {
        assert!(matches!(
            expand("[abc"),
            Err(PatternError::UnterminatedClass(_))
        ));
    }

    #[test]
    fn reversed_range_is_an_error() {
        assert!(matches!(expand("[9-0]"), Err(PatternError::InvalidRange(_))));
    }
}
