//! Turns the text typed into the function field into an [`Expr`].
//!
//! Grammar, loosest binding first:
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := number | ident '(' expr ')' | ident | '(' expr ')'
//! ```
//! `-x**2` parses as `-(x**2)` and `2**3**2` as `2**(3**2)`. Juxtaposition is
//! not multiplication: `2x` is rejected, write `2*x`.
//!
//! Input is limited to [`MAX_TOKENS`] tokens and [`MAX_NESTING`] levels of
//! nested `unary` rules, so every tree handed to the recursive passes
//! (simplify, diff, display) stays shallow.
//!
//! # Example
//! ```
//! use graphique::symbolic::symbolic_engine::Expr;
//! let f = Expr::parse_expression_checked("3*x**2 + 2*x - 4").unwrap();
//! assert_eq!(f.to_string(), "3*x**2 + 2*x - 4");
//! ```

use crate::error::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::{E, PI};
use std::fmt;

/// Longest accepted input, in tokens.
pub const MAX_TOKENS: usize = 500;
/// Deepest accepted nesting of parentheses, signs and exponents.
pub const MAX_NESTING: usize = 50;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Power => write!(f, "**"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Splits the input into tokens paired with their character offsets.
fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => tokens.push((Token::Plus, start)),
            '-' => tokens.push((Token::Minus, start)),
            '/' => tokens.push((Token::Slash, start)),
            '^' => tokens.push((Token::Power, start)),
            '(' => tokens.push((Token::LParen, start)),
            ')' => tokens.push((Token::RParen, start)),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push((Token::Power, start));
                    i += 1;
                } else {
                    tokens.push((Token::Star, start));
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = i;
                while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.') {
                    end += 1;
                }
                // optional exponent, only taken when digits follow
                if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
                    let mut after_e = end + 1;
                    if after_e < chars.len() && (chars[after_e] == '+' || chars[after_e] == '-') {
                        after_e += 1;
                    }
                    if after_e < chars.len() && chars[after_e].is_ascii_digit() {
                        end = after_e;
                        while end < chars.len() && chars[end].is_ascii_digit() {
                            end += 1;
                        }
                    }
                }
                let text: String = chars[start..end].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::new(start, format!("malformed number '{}'", text)))?;
                tokens.push((Token::Num(value), start));
                i = end;
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = i;
                while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();
                tokens.push((Token::Ident(name), start));
                i = end;
                continue;
            }
            other => {
                return Err(ParseError::new(
                    start,
                    format!("unexpected character '{}'", other),
                ));
            }
        }
        i += 1;
    }
    Ok(tokens)
}

/// Maps a function name to the constructor of its tree node.
fn function_node(name: &str) -> Option<fn(Box<Expr>) -> Expr> {
    let node: fn(Box<Expr>) -> Expr = match name {
        "exp" => Expr::Exp,
        "ln" | "log" => Expr::Ln,
        "sqrt" => |arg| Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        "sin" => Expr::sin,
        "cos" => Expr::cos,
        "tan" | "tg" => Expr::tg,
        "cot" | "ctg" => Expr::ctg,
        "asin" | "arcsin" => Expr::arcsin,
        "acos" | "arccos" => Expr::arccos,
        "atan" | "arctan" | "arctg" => Expr::arctg,
        "acot" | "arccot" | "arcctg" => Expr::arcctg,
        _ => return None,
    };
    Some(node)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    input_len: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, offset)| *offset)
            .unwrap_or(self.input_len)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self) -> ParseError {
        match self.current() {
            Some(Token::RParen) => ParseError::new(self.offset(), "unbalanced parenthesis ')'"),
            Some(token) => ParseError::new(self.offset(), format!("unexpected token '{}'", token)),
            None => ParseError::new(self.input_len, "unexpected end of input"),
        }
    }

    fn expect_closing(&mut self, opened_at: usize) -> Result<(), ParseError> {
        match self.current() {
            Some(Token::RParen) => {
                self.advance();
                Ok(())
            }
            None => Err(ParseError::new(
                opened_at,
                "unbalanced parenthesis: '(' is never closed",
            )),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            match self.current() {
                Some(Token::Plus) => {
                    self.advance();
                    left = left + self.parse_term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    left = left - self.parse_term()?;
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.current() {
                Some(Token::Star) => {
                    self.advance();
                    left = left * self.parse_unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    left = left / self.parse_unary()?;
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                self.offset(),
                format!("expression nested deeper than {} levels", MAX_NESTING),
            ));
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr, ParseError> {
        match self.current() {
            Some(Token::Plus) => {
                self.advance();
                self.parse_unary()
            }
            Some(Token::Minus) => {
                self.advance();
                match self.parse_unary()? {
                    Expr::Const(c) => Ok(Expr::Const(-c)),
                    operand => Ok(-operand),
                }
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if let Some(Token::Power) = self.current() {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.offset();
        match self.current().cloned() {
            Some(Token::Num(value)) => {
                self.advance();
                Ok(Expr::Const(value))
            }
            Some(Token::Ident(name)) => {
                self.advance();
                if let Some(Token::LParen) = self.current() {
                    let opened_at = self.offset();
                    let node = function_node(&name).ok_or_else(|| {
                        ParseError::new(start, format!("unknown function '{}'", name))
                    })?;
                    self.advance();
                    let argument = self.parse_expr()?;
                    self.expect_closing(opened_at)?;
                    return Ok(node(Box::new(argument)));
                }
                Ok(match name.as_str() {
                    "pi" => Expr::Const(PI),
                    "E" => Expr::Const(E),
                    _ => Expr::Var(name),
                })
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_closing(start)?;
                Ok(inner)
            }
            _ => Err(self.unexpected()),
        }
    }
}

/// Parses function text into an expression tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new(0, "empty expression"));
    }
    if let Some((_, offset)) = tokens.get(MAX_TOKENS) {
        return Err(ParseError::new(
            *offset,
            format!("expression longer than {} tokens", MAX_TOKENS),
        ));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.chars().count(),
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    if parser.current().is_some() {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

impl Expr {
    /// Parses a mathematical expression, reporting malformed input.
    pub fn parse_expression_checked(input: &str) -> Result<Expr, ParseError> {
        parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse("1.5e-3").unwrap(), Expr::Const(1.5e-3));
        assert_eq!(parse(".5").unwrap(), Expr::Const(0.5));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse("x").unwrap(), var("x"));
    }

    #[test]
    fn test_parse_addition_is_left_associative() {
        let expr = parse("x - 2 + 1").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Sub(Box::new(var("x")), Box::new(Expr::Const(2.0)))),
                Box::new(Expr::Const(1.0))
            )
        );
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse("2*x**2 + 4*x + 1").unwrap();
        let expected = Expr::Const(2.0) * var("x").pow(Expr::Const(2.0))
            + Expr::Const(4.0) * var("x")
            + Expr::Const(1.0);
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_caret_is_power() {
        assert_eq!(parse("x^3").unwrap(), parse("x**3").unwrap());
    }

    #[test]
    fn test_parse_power_right_associative() {
        let expr = parse("2**3**2").unwrap();
        assert_eq!(
            expr,
            Expr::Const(2.0).pow(Expr::Const(3.0).pow(Expr::Const(2.0)))
        );
    }

    #[test]
    fn test_parse_unary_minus_binds_looser_than_power() {
        let expr = parse("-x**2").unwrap();
        assert_eq!(expr, -(var("x").pow(Expr::Const(2.0))));
        assert_eq!(parse("-3").unwrap(), Expr::Const(-3.0));
        assert_eq!(parse("x**-1").unwrap(), var("x").pow(Expr::Const(-1.0)));
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(parse("exp(x)").unwrap(), Expr::Exp(Box::new(var("x"))));
        assert_eq!(parse("log(x)").unwrap(), Expr::Ln(Box::new(var("x"))));
        assert_eq!(parse("tan(x)").unwrap(), Expr::tg(Box::new(var("x"))));
        assert_eq!(parse("arctg(x)").unwrap(), Expr::arctg(Box::new(var("x"))));
        assert_eq!(
            parse("sqrt(x)").unwrap(),
            var("x").pow(Expr::Const(0.5))
        );
        assert_eq!(
            parse("sin(2*x + 1)").unwrap(),
            Expr::sin(Box::new(Expr::Const(2.0) * var("x") + Expr::Const(1.0)))
        );
    }

    #[test]
    fn test_parse_constants() {
        assert_eq!(parse("pi").unwrap(), Expr::Const(PI));
        assert_eq!(parse("E").unwrap(), Expr::Const(E));
    }

    #[test]
    fn test_parse_nested_parentheses() {
        let expr = parse("((x + 1))*(x - 1)").unwrap();
        assert_eq!(
            expr,
            (var("x") + Expr::Const(1.0)) * (var("x") - Expr::Const(1.0))
        );
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["3*x**2 + 2*x - 4", "sin(x)/x", "exp(-x**2)", "(x + 1)**(1/2)"] {
            let parsed = parse(text).unwrap();
            assert_eq!(parse(&parsed.to_string()).unwrap(), parsed, "{}", text);
        }
    }

    #[test]
    fn test_parse_error_double_operator() {
        let err = parse("x +* 2").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("'*'"));
    }

    #[test]
    fn test_parse_error_empty() {
        assert_eq!(parse("").unwrap_err().message, "empty expression");
        assert_eq!(parse("   ").unwrap_err().position, 0);
    }

    #[test]
    fn test_parse_error_unbalanced() {
        let err = parse("(x + 1").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("never closed"));

        let err = parse("x + 1)").unwrap_err();
        assert_eq!(err.position, 5);
        assert!(err.message.contains("unbalanced"));
    }

    #[test]
    fn test_parse_error_implicit_multiplication() {
        let err = parse("2x").unwrap_err();
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_parse_error_unknown_function_and_character() {
        let err = parse("foo(x)").unwrap_err();
        assert!(err.message.contains("unknown function 'foo'"));

        let err = parse("x $ 2").unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_parse_error_deep_nesting() {
        let deep = format!("{}x{}", "(".repeat(20000), ")".repeat(20000));
        let err = parse(&deep).unwrap_err();
        assert!(err.message.contains("tokens"), "{}", err.message);

        let nested = format!("{}x{}", "(".repeat(60), ")".repeat(60));
        let err = parse(&nested).unwrap_err();
        assert!(err.message.contains("nested deeper"), "{}", err.message);
        assert_eq!(err.position, MAX_NESTING);

        let signs = format!("{}x", "-".repeat(60));
        assert!(parse(&signs).unwrap_err().message.contains("nested deeper"));

        let fine = format!("{}x{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(parse(&fine).unwrap(), var("x"));
        assert!(parse("sin(cos(exp(ln(sqrt(x**2 + 1)))))").is_ok());
    }

    #[test]
    fn test_parse_error_too_many_tokens() {
        let long_sum = vec!["x"; 20000].join("+");
        let err = parse(&long_sum).unwrap_err();
        assert!(err.message.contains("longer than"), "{}", err.message);
        assert_eq!(err.position, MAX_TOKENS);

        let fits = vec!["x"; 200].join("+");
        assert!(parse(&fits).is_ok());
    }

    #[test]
    fn test_parse_error_trailing_operator() {
        let err = parse("x +").unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
        assert_eq!(err.position, 3);
    }
}
