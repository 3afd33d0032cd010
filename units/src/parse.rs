//! Unit expression parser.
//!
//! Grammar (whitespace is insignificant except as a factor separator):
//!
//! ```text
//! expr     := "" | "(dimensionless)" | factor (sep? factor)*
//! sep      := "*" | "/"
//! factor   := SYMBOL (pow exponent)? | "1"
//! pow      := "^" | "**"
//! exponent := "(" signed ")" | signed
//! signed   := ("+" | "-")? NUMBER ("/" NUMBER)?
//! ```
//!
//! `/` inverts only the factor that follows it: `g cm**3 / pc * s**-3` has
//! `pc` in the denominator and `s**-3` back in the numerator.

use logos::Logos;
use num_traits::{CheckedDiv, One, Zero};

use crate::dimension::Exponent;
use crate::error::{Result, UnitError};
use crate::expr::UnitExpr;
use crate::table::Lookup;
use crate::unit::Unit;

/// Largest denominator of a rational standing in for a float exponent.
pub const MAX_DENOMINATOR: i64 = 1_000_000;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token {
    #[token("**")]
    #[token("^")]
    Pow,
    #[token("*")]
    Times,
    #[token("/")]
    Over,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Symbol,
}

/// Parse `expr` against the static symbol table.
pub fn parse(expr: &str) -> Result<Unit> { parse_with(expr, &crate::table::Static) }

/// Parse `expr`, resolving symbols through `table`.
pub fn parse_with(expr: &str, table: &(impl Lookup + ?Sized)) -> Result<Unit> {
    let trimmed = expr.trim();
    if trimmed.is_empty() || trimmed == "(dimensionless)" {
        return Ok(Unit::dimensionless());
    }
    let tokens = lex(trimmed)?;
    let mut parser = Parser { source: trimmed, tokens, pos: 0 };
    let mut product = UnitExpr::one();
    // `None` is the literal `1`, which contributes nothing
    for (symbol, power) in parser.factors()? {
        if let Some(symbol) = symbol {
            let (scale, dimension) = table.lookup(symbol)?;
            product.push(symbol, scale, dimension, power)?;
        }
    }
    let unit = Unit::from_expr(product)?;
    tracing::trace!(expr, %unit, scale = unit.scale(), "parsed unit expression");
    Ok(unit)
}

fn lex(source: &str) -> Result<Vec<(Token, &str)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = vec![];
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.slice())),
            Err(_) => return Err(malformed(source, format!(
                "unexpected character {:?} at position {}", lexer.slice(), lexer.span().start
            ))),
        }
    }
    Ok(tokens)
}

fn malformed(expr: &str, reason: impl Into<String>) -> UnitError {
    UnitError::MalformedExpression { expr: expr.to_string(), reason: reason.into() }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Token, &'a str)>,
    pos: usize,
}

impl<'a> Parser<'a> {

    fn peek(&self) -> Option<Token> { self.tokens.get(self.pos).map(|(t, _)| *t) }

    fn next(&mut self) -> Option<(Token, &'a str)> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    fn expect(&mut self, wanted: Token, context: &str) -> Result<&'a str> {
        match self.next() {
            Some((token, text)) if token == wanted => Ok(text),
            Some((_, text)) => Err(malformed(self.source, format!("expected {context}, found `{text}`"))),
            None            => Err(malformed(self.source, format!("expected {context}, found end of input"))),
        }
    }

    /// All factors, as `(symbol, power)`; `None` stands for the literal `1`.
    fn factors(&mut self) -> Result<Vec<(Option<&'a str>, Exponent)>> {
        let mut factors = vec![];
        let mut invert = false;
        loop {
            let (symbol, power) = self.factor()?;
            factors.push((symbol, if invert { -power } else { power }));
            invert = match self.peek() {
                None               => break,
                Some(Token::Times) => { self.pos += 1; false }
                Some(Token::Over)  => { self.pos += 1; true }
                Some(_)            => false,
            };
        }
        Ok(factors)
    }

    fn factor(&mut self) -> Result<(Option<&'a str>, Exponent)> {
        match self.next() {
            Some((Token::Symbol, symbol)) => {
                let power = if self.peek() == Some(Token::Pow) {
                    self.pos += 1;
                    self.exponent()?
                } else {
                    Exponent::one()
                };
                Ok((Some(symbol), power))
            }
            Some((Token::Number, "1")) => Ok((None, Exponent::one())),
            Some((Token::Number, n))   => Err(UnitError::UnknownUnitSymbol(n.to_string())),
            Some((_, text)) => Err(malformed(self.source, format!("expected a unit symbol, found `{text}`"))),
            None            => Err(malformed(self.source, "expected a unit symbol, found end of input")),
        }
    }

    fn exponent(&mut self) -> Result<Exponent> {
        if self.peek() == Some(Token::LParen) {
            self.pos += 1;
            let power = self.signed(true)?;
            self.expect(Token::RParen, "`)`")?;
            Ok(power)
        } else {
            self.signed(false)
        }
    }

    /// Signed integer, decimal or fraction. Outside parentheses a `/` only
    /// belongs to the exponent when a number follows it.
    fn signed(&mut self, parenthesized: bool) -> Result<Exponent> {
        let negative = match self.peek() {
            Some(Token::Minus) => { self.pos += 1; true  }
            Some(Token::Plus)  => { self.pos += 1; false }
            _ => false,
        };
        let numerator = literal(self.source, self.expect(Token::Number, "an exponent")?)?;
        let followed_by_number = matches!(self.tokens.get(self.pos + 1), Some((Token::Number, _)));
        let value = if self.peek() == Some(Token::Over) && (parenthesized || followed_by_number) {
            self.pos += 1;
            let denominator = literal(self.source, self.expect(Token::Number, "a denominator")?)?;
            if denominator.is_zero() {
                return Err(UnitError::InvalidExponent(format!("zero denominator in `{}`", self.source)));
            }
            numerator.checked_div(&denominator)
                .ok_or_else(|| UnitError::InvalidExponent(format!("`{}` overflows", self.source)))?
        } else {
            numerator
        };
        Ok(if negative { -value } else { value })
    }
}

fn literal(source: &str, text: &str) -> Result<Exponent> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Exponent::from_integer(n));
    }
    let value = text.parse::<f64>()
        .map_err(|_| malformed(source, format!("cannot use `{text}` as an exponent")))?;
    exponent_from_f64(value)
}

/// Rational approximation of a float exponent, with denominator at most
/// [`MAX_DENOMINATOR`].
///
/// Walks the continued fraction of `power`, keeping the last convergent whose
/// denominator fits.
pub fn exponent_from_f64(power: f64) -> Result<Exponent> {
    let invalid = |why: &str| UnitError::InvalidExponent(format!("{power} {why}"));
    if !power.is_finite() {
        return Err(invalid("is not finite"));
    }
    if power.abs() >= i64::MAX as f64 {
        return Err(invalid("is too large"));
    }
    // Convergents h/k, seeded with h(-1)/k(-1) = 1/0 and h(-2)/k(-2) = 0/1
    let (mut h, mut h_prev) = (1_i64, 0_i64);
    let (mut k, mut k_prev) = (0_i64, 1_i64);
    let mut x = power.abs();
    loop {
        let a = x.floor();
        let next = (a as i64).checked_mul(h).and_then(|ah| ah.checked_add(h_prev))
            .zip((a as i64).checked_mul(k).and_then(|ak| ak.checked_add(k_prev)));
        let Some((h_next, k_next)) = next else { break };
        if k_next > MAX_DENOMINATOR { break }
        (h_prev, h) = (h, h_next);
        (k_prev, k) = (k, k_next);
        let remainder = x - a;
        let close_enough = (h as f64 / k as f64 - power.abs()).abs() <= f64::EPSILON * power.abs().max(1.0);
        if remainder == 0.0 || close_enough { break }
        x = remainder.recip();
    }
    if k == 0 {
        return Err(invalid("has no rational approximation"));
    }
    let approximation = Exponent::new(h, k);
    Ok(if power < 0.0 { -approximation } else { approximation })
}
