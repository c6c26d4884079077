//! nom-based recursive-descent parser for the canonical pattern grammar:
//!
//! ```text
//! regex    := alt
//! alt      := concat ('|' concat)*
//! concat   := atom*
//! atom     := ('\' CHAR | 'Σ' | 'ε' | CHAR | '(' alt ')') '*'?
//! ```

use crate::error::{PatternError, Snippet};
use crate::pattern::{Pattern, PatternChar, PatternTree};
use nom::branch::alt as nom_alt;
use nom::bytes::complete::take;
use nom::character::complete::char;
use nom::combinator::{map, opt, value, verify};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, preceded};
use nom::{Finish, IResult};

/// Parses the whole of `input` as a canonical pattern, trimming no whitespace (every character,
/// including spaces, is significant).
pub fn parse(input: &str) -> Result<Pattern, PatternError> {
    match nom::combinator::all_consuming(expression)(input).finish() {
        Ok((_, tree)) => Ok(Pattern { tree }),
        Err(_) => {
            let index = find_error_index(input);
            Err(classify_error(input, index))
        }
    }
}

/// nom's `Err` doesn't carry enough positional detail for our purposes across every failure
/// path, so on any parse failure we re-scan for the first structural problem to produce a
/// precise, human-meaningful error.
fn find_error_index(input: &str) -> usize {
    let chars: Vec<char> = input.chars().collect();
    let mut depth: i64 = 0;
    // Tracks whether the position we're at could take a '*': true right after something that
    // completes an atom (a literal, Σ, ε, a closing ')', or an escape), false at the start of the
    // pattern, right after '(' or '|', or right after a '*' already consumed (atom allows at most
    // one star).
    let mut can_star = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 == chars.len() => return i,
            '\\' => {
                i += 2;
                can_star = true;
            }
            '(' => {
                depth += 1;
                i += 1;
                can_star = false;
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return i;
                }
                i += 1;
                can_star = true;
            }
            '|' => {
                i += 1;
                can_star = false;
            }
            '*' => {
                if !can_star {
                    return i;
                }
                i += 1;
                can_star = false;
            }
            _ => {
                i += 1;
                can_star = true;
            }
        }
    }
    if depth != 0 {
        return chars.len().saturating_sub(1);
    }
    chars.len().saturating_sub(1)
}

fn classify_error(input: &str, index: usize) -> PatternError {
    let chars: Vec<char> = input.chars().collect();
    let snippet = Snippet::new(input, index);
    match chars.get(index) {
        Some(')') => PatternError::UnmatchedParen(snippet),
        Some('*') => PatternError::DanglingStar(snippet),
        Some('\\') => PatternError::TrailingEscape(snippet),
        _ if chars.iter().filter(|&&c| c == '(').count()
            != chars.iter().filter(|&&c| c == ')').count() =>
        {
            PatternError::UnmatchedParen(snippet)
        }
        _ => PatternError::Malformed(snippet),
    }
}

fn expression(input: &str) -> IResult<&str, PatternTree> {
    alternation(input)
}

fn alternation(input: &str) -> IResult<&str, PatternTree> {
    map(separated_list1(char('|'), concatenation), wrap_multiple(PatternTree::Alt))(input)
}

fn concatenation(input: &str) -> IResult<&str, PatternTree> {
    map(many0(atom), wrap_sequence)(input)
}

fn wrap_sequence(mut items: Vec<PatternTree>) -> PatternTree {
    if items.len() == 1 {
        items.remove(0)
    } else {
        PatternTree::Sequence(items)
    }
}

fn wrap_multiple(f: impl Fn(Vec<PatternTree>) -> PatternTree) -> impl Fn(Vec<PatternTree>) -> PatternTree {
    move |mut items| {
        if items.len() == 1 {
            items.remove(0)
        } else {
            f(items)
        }
    }
}

fn atom(input: &str) -> IResult<&str, PatternTree> {
    map(nom_alt((group, single_char)).and(opt(char('*'))), apply_star)(input)
}

fn apply_star((tree, star): (PatternTree, Option<char>)) -> PatternTree {
    match star {
        Some(_) => PatternTree::Repeat(Box::new(tree)),
        None => tree,
    }
}

fn group(input: &str) -> IResult<&str, PatternTree> {
    delimited(char('('), expression, char(')'))(input)
}

fn single_char(input: &str) -> IResult<&str, PatternTree> {
    map(pattern_char, PatternTree::Char)(input)
}

fn pattern_char(input: &str) -> IResult<&str, PatternChar> {
    nom_alt((sigma, epsilon, escaped_char, normal_char))(input)
}

fn sigma(input: &str) -> IResult<&str, PatternChar> {
    value(PatternChar::Sigma, char('Σ'))(input)
}

fn epsilon(input: &str) -> IResult<&str, PatternChar> {
    value(PatternChar::Epsilon, char('ε'))(input)
}

fn escaped_char(input: &str) -> IResult<&str, PatternChar> {
    map(preceded(char('\\'), take(1usize)), one_literal_char)(input)
}

fn normal_char(input: &str) -> IResult<&str, PatternChar> {
    verify(
        map(take(1usize), one_literal_char),
        |pc: &PatternChar| match pc {
            PatternChar::Literal(c) => !is_reserved(*c),
            _ => unreachable!("one_literal_char only yields PatternChar::Literal"),
        },
    )(input)
}

fn one_literal_char(s: &str) -> PatternChar {
    PatternChar::Literal(s.chars().next().expect("take(1) always yields one char"))
}

fn is_reserved(c: char) -> bool {
    matches!(c, '(' | ')' | 'ε' | '|' | '*' | '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_sequence() {
        let p = parse("abc").unwrap();
        assert_eq!(
            p.tree,
            PatternTree::Sequence(vec![
                PatternTree::Char(PatternChar::Literal('a')),
                PatternTree::Char(PatternChar::Literal('b')),
                PatternTree::Char(PatternChar::Literal('c')),
            ])
        );
    }

    #[test]
    fn parses_alternation_and_star() {
        let p = parse("(a|b)*").unwrap();
        match p.tree {
            PatternTree::Repeat(inner) => match *inner {
                PatternTree::Alt(items) => assert_eq!(items.len(), 2),
                other => panic!("expected Alt, got {other:?}"),
            },
            other => panic!("expected Repeat, got {other:?}"),
        }
    }

    #[test]
    fn escaped_star_is_literal() {
        let p = parse(r"\**").unwrap();
        match p.tree {
            PatternTree::Repeat(inner) => {
                assert_eq!(*inner, PatternTree::Char(PatternChar::Literal('*')));
            }
            other => panic!("expected Repeat, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_paren_errors() {
        assert!(matches!(parse("(ab"), Err(PatternError::UnmatchedParen(_))));
    }

    #[test]
    fn dangling_star_errors() {
        assert!(matches!(parse("*a"), Err(PatternError::DanglingStar(_))));
    }

    #[test]
    fn interior_dangling_star_errors_at_the_right_index() {
        match parse("a**b") {
            Err(PatternError::DanglingStar(snippet)) => assert_eq!(snippet.index, 2),
            other => panic!("expected a DanglingStar at index 2, got {other:?}"),
        }
    }

    #[test]
    fn empty_pattern_is_sequence_of_nothing() {
        let p = parse("").unwrap();
        assert_eq!(p.tree, PatternTree::Sequence(vec![]));
    }
}
