use std::collections::VecDeque;

use compact_str::CompactString;

use crate::machine::{self, ArithmeticError};

use super::{
    span::Span,
    tokenizer::{Token, TokenType, tokenize},
};

/// An arithmetic expression tree.
///
/// Every child is owned by exactly one parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// An integer literal.
    Constant(i64),
    /// Unary negation, written `- x`.
    Negation(Box<Expr>),
    /// A binary operation, written `(op left right)`.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// The operator of a binary expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Sum,
    /// `-`
    Difference,
    /// `*`
    Product,
    /// `quotient`
    Quotient,
    /// `mod`
    Modulus,
}

impl BinaryOp {
    /// Returns the operator written as `keyword`, if any.
    pub fn from_keyword(keyword: &str) -> Option<BinaryOp> {
        match keyword {
            "+" => Some(BinaryOp::Sum),
            "-" => Some(BinaryOp::Difference),
            "*" => Some(BinaryOp::Product),
            "quotient" => Some(BinaryOp::Quotient),
            "mod" => Some(BinaryOp::Modulus),
            _ => None,
        }
    }

    /// The source keyword of the operator.
    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOp::Sum => "+",
            BinaryOp::Difference => "-",
            BinaryOp::Product => "*",
            BinaryOp::Quotient => "quotient",
            BinaryOp::Modulus => "mod",
        }
    }

    /// The machine instruction that implements the operator.
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Sum => "add",
            BinaryOp::Difference => "sub",
            BinaryOp::Product => "mul",
            BinaryOp::Quotient => "div",
            BinaryOp::Modulus => "mod",
        }
    }
}

impl Expr {
    /// Builds a binary expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds a negation.
    pub fn negation(operand: Expr) -> Expr {
        Expr::Negation(Box::new(operand))
    }

    /// Parses a single expression that must cover all of `source`.
    pub fn with_source(source: &str) -> Result<Expr, ParseError> {
        let mut tokens: VecDeque<Token> = tokenize(source).collect();
        let expr = parse_prefix(source, &mut tokens)?;
        if !tokens.is_empty() {
            let leftover = tokens
                .iter()
                .map(|t| CompactString::new(t.text(source)))
                .collect();
            return Err(ParseError::TrailingInput(leftover));
        }
        Ok(expr)
    }

    /// Evaluates the tree directly, with the same arithmetic as the machine.
    pub fn eval(&self) -> Result<i64, ArithmeticError> {
        match self {
            Expr::Constant(value) => Ok(*value),
            Expr::Negation(operand) => machine::negate(operand.eval()?),
            Expr::Binary { op, left, right } => machine::apply(*op, left.eval()?, right.eval()?),
        }
    }

    /// The number of nodes in the tree, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Constant(_) => 1,
            Expr::Negation(operand) => 1 + operand.node_count(),
            Expr::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// The length of the longest path from this node to a leaf, counting both ends.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Constant(_) => 1,
            Expr::Negation(operand) => 1 + operand.depth(),
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Negation(operand) => write!(f, "-{operand}"),
            Expr::Binary { op, left, right } => {
                write!(f, "({left} {op} {right})", op = op.keyword())
            }
        }
    }
}

/// The deepest nesting of negations and binary operations the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// Parses one expression from the front of `tokens`.
///
/// Only the tokens that make up the expression are removed; anything after it stays in `tokens`
/// for the caller.
pub fn parse_prefix(source: &str, tokens: &mut VecDeque<Token>) -> Result<Expr, ParseError> {
    parse_nested(source, tokens, 1)
}

fn parse_nested(
    source: &str,
    tokens: &mut VecDeque<Token>,
    depth: usize,
) -> Result<Expr, ParseError> {
    let Some(token) = tokens.pop_front() else {
        return Err(ParseError::MissingExpression(Span::at(source.len(), 0)));
    };
    let is_operation = match token.token_type {
        TokenType::OpenParen => true,
        TokenType::Word => token.text(source) == "-",
        TokenType::CloseParen => false,
    };
    if is_operation && depth > MAX_DEPTH {
        return Err(ParseError::TooDeep { span: token.span });
    }
    match token.token_type {
        TokenType::OpenParen => parse_binary(source, token, tokens, depth),
        TokenType::CloseParen => Err(ParseError::unexpected("expression", token, source)),
        TokenType::Word => match token.text(source) {
            "-" => Ok(Expr::negation(parse_nested(source, tokens, depth + 1)?)),
            text => text
                .parse()
                .map(Expr::Constant)
                .map_err(|_| ParseError::InvalidLiteral {
                    literal: CompactString::new(text),
                    span: token.span,
                }),
        },
    }
}

/// Parses the rest of `(op left right)` after the open parenthesis.
fn parse_binary(
    source: &str,
    open: Token,
    tokens: &mut VecDeque<Token>,
    depth: usize,
) -> Result<Expr, ParseError> {
    let operator = tokens
        .pop_front()
        .ok_or(ParseError::UnclosedParen(open.span))?;
    if operator.token_type != TokenType::Word {
        return Err(ParseError::unexpected("operator", operator, source));
    }
    let keyword = operator.text(source);
    let op = BinaryOp::from_keyword(keyword).ok_or_else(|| ParseError::UnrecognizedOperator {
        operator: CompactString::new(keyword),
        span: operator.span,
    })?;
    let left = parse_nested(source, tokens, depth + 1)?;
    let right = parse_nested(source, tokens, depth + 1)?;
    match tokens.pop_front() {
        None => Err(ParseError::UnclosedParen(open.span)),
        Some(close) if close.token_type == TokenType::CloseParen => {
            Ok(Expr::binary(op, left, right))
        }
        Some(other) => Err(ParseError::unexpected(")", other, source)),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An error that can occur while parsing an expression.
pub enum ParseError {
    /// The input ended where an expression was required.
    MissingExpression(Span),
    /// A token other than the one required was found.
    UnexpectedToken {
        expected: &'static str,
        found: CompactString,
        span: Span,
    },
    /// The word after `(` is not a known operator.
    UnrecognizedOperator { operator: CompactString, span: Span },
    /// A complete expression was followed by more tokens.
    TrailingInput(Vec<CompactString>),
    /// A word in literal position is not an integer.
    InvalidLiteral { literal: CompactString, span: Span },
    /// The input ended before the parenthesis at the span was closed.
    UnclosedParen(Span),
    /// The operation at the span is nested more than `MAX_DEPTH` levels deep.
    TooDeep { span: Span },
}

impl ParseError {
    fn unexpected(expected: &'static str, token: Token, source: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: CompactString::new(token.text(source)),
            span: token.span,
        }
    }

    pub fn with_context(self, source: &str) -> ParseErrorWithContext<'_> {
        ParseErrorWithContext { err: self, source }
    }
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingExpression(_) => write!(f, "missing expression"),
            ParseError::UnexpectedToken {
                expected,
                found,
                span,
            } => write!(f, "expected {expected}, but found {found:?} at {span}"),
            ParseError::UnrecognizedOperator { operator, span } => {
                write!(f, "unrecognized binary operator {operator:?} at {span}")
            }
            ParseError::TrailingInput(leftover) => {
                write!(f, "extra junk at end of input: {leftover:?}")
            }
            ParseError::InvalidLiteral { literal, span } => {
                write!(f, "invalid integer literal {literal:?} at {span}")
            }
            ParseError::UnclosedParen(span) => {
                write!(f, "unclosed parenthesis encountered at {span}")
            }
            ParseError::TooDeep { span } => write!(
                f,
                "expression at {span} is nested more than {MAX_DEPTH} levels deep"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseErrorWithContext<'a> {
    err: ParseError,
    source: &'a str,
}

impl std::error::Error for ParseErrorWithContext<'_> {}

impl std::fmt::Display for ParseErrorWithContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.err {
            ParseError::MissingExpression(_) => {
                write!(f, "missing expression after {:?}", self.source.trim_end())
            }
            ParseError::UnclosedParen(span) => write!(
                f,
                "unclosed parenthesis encountered at {span}: {text}",
                text = &self.source[span.start as usize..]
            ),
            err => write!(f, "{err}"),
        }
    }
}
