use std::{iter::Peekable, str::CharIndices};

use super::span::Span;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
/// A single atom of an expression.
pub struct Token {
    /// The span of the token in the source code.
    pub span: Span,
    /// The type of the token.
    pub token_type: TokenType,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
/// The kind of a token.
pub enum TokenType {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// Any whitespace delimited word, such as an operator or a numeric literal.
    Word,
}

impl Token {
    /// Returns the text of the token.
    pub fn text(self, source: &str) -> &str {
        self.span.text(source)
    }
}

/// Splits `source` into tokens.
///
/// Parentheses are always tokens of their own, even when they touch a word, so `3)` yields `3`
/// followed by `)`. Everything else is split on whitespace. No validation happens here.
pub fn tokenize(source: &str) -> impl '_ + Iterator<Item = Token> {
    let mut source_iter = source.char_indices().peekable();
    std::iter::from_fn(move || {
        loop {
            let (idx, ch) = source_iter.peek().cloned()?;
            match ch {
                ch if ch.is_whitespace() => {
                    source_iter.next();
                }
                '(' | ')' => {
                    source_iter.next();
                    let token_type = if ch == '(' {
                        TokenType::OpenParen
                    } else {
                        TokenType::CloseParen
                    };
                    return Some(Token {
                        span: Span::at(idx, 1),
                        token_type,
                    });
                }
                _ => return Some(parse_word(idx, &mut source_iter)),
            }
        }
    })
}

/// Consumes characters up to the next whitespace or parenthesis.
fn parse_word(start: usize, source_iter: &mut Peekable<CharIndices>) -> Token {
    let mut end = start;
    while let Some((idx, ch)) = source_iter.peek().cloned() {
        if ch.is_whitespace() || ch == '(' || ch == ')' {
            break;
        }
        end = idx + ch.len_utf8();
        source_iter.next();
    }
    Token {
        span: Span::at(start, end - start),
        token_type: TokenType::Word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_to_vec(source: &str) -> Vec<(&str, TokenType)> {
        tokenize(source)
            .map(|t| (t.text(source), t.token_type))
            .collect()
    }

    #[test]
    fn empty_str_is_empty() {
        assert_eq!(tokenize_to_vec(""), Vec::<_>::new());
    }

    #[test]
    fn whitespace_is_empty() {
        assert_eq!(tokenize_to_vec(" \n\t  "), Vec::<_>::new());
    }

    #[test]
    fn words_are_split_on_whitespace() {
        assert_eq!(
            tokenize_to_vec("quotient  mod\t-5 12"),
            vec![
                ("quotient", TokenType::Word),
                ("mod", TokenType::Word),
                ("-5", TokenType::Word),
                ("12", TokenType::Word),
            ]
        );
    }

    #[test]
    fn close_paren_is_split_from_abutting_word() {
        assert_eq!(
            tokenize_to_vec("3)"),
            vec![("3", TokenType::Word), (")", TokenType::CloseParen)]
        );
    }

    #[test]
    fn expressions_are_tokenized() {
        assert_eq!(
            tokenize_to_vec("(* (+ 2 4) 7)"),
            vec![
                ("(", TokenType::OpenParen),
                ("*", TokenType::Word),
                ("(", TokenType::OpenParen),
                ("+", TokenType::Word),
                ("2", TokenType::Word),
                ("4", TokenType::Word),
                (")", TokenType::CloseParen),
                ("7", TokenType::Word),
                (")", TokenType::CloseParen),
            ]
        );
    }

    #[test]
    fn spans_point_into_source() {
        assert_eq!(
            tokenize("(+ 10 2)").collect::<Vec<_>>()[2],
            Token {
                span: Span { start: 3, end: 5 },
                token_type: TokenType::Word,
            }
        );
    }
}
