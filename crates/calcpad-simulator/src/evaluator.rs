//! Arithmetic expression evaluation for the simulator
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! sum     = product (("+" | "-") product)*
//! product = unary (("*" | "/") unary)*
//! unary   = ("-" | "+") unary | power
//! power   = postfix ("^" unary)?
//! postfix = primary "%"*
//! primary = number | "(" sum ")"
//! ```
//!
//! `^` is right-associative and binds tighter than a leading minus, so
//! `-2^2` is `-4`. A postfix `%` divides by one hundred. Signs and
//! parentheses nest at most [`MAX_DEPTH`] deep.

use calcpad_core::services::{EvalError, Evaluator};

/// Deepest run of nested signs and parentheses the parser will follow.
pub const MAX_DEPTH: usize = 64;

/// Recursive-descent evaluator over `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl Evaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        evaluate(expression)
    }
}

pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let mut parser = Parser {
        chars: expression.chars().collect(),
        pos: 0,
        depth: 0,
    };

    let value = parser.sum()?;
    if let Some(found) = parser.peek() {
        return Err(EvalError::Unexpected {
            found,
            position: parser.pos,
        });
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NotFinite)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Next non-whitespace character, without consuming it.
    fn peek(&mut self) -> Option<char> {
        while let Some(&c) = self.chars.get(self.pos) {
            if !c.is_whitespace() {
                return Some(c);
            }
            self.pos += 1;
        }
        None
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&mut self) -> EvalError {
        match self.peek() {
            Some(found) => EvalError::Unexpected {
                found,
                position: self.pos,
            },
            None => EvalError::UnexpectedEnd,
        }
    }

    /// Run `inner` one nesting level deeper.
    fn nested(
        &mut self,
        inner: impl FnOnce(&mut Self) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::Other("Expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    fn sum(&mut self) -> Result<f64, EvalError> {
        let mut value = self.product()?;
        loop {
            if self.eat('+') {
                value += self.product()?;
            } else if self.eat('-') {
                value -= self.product()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn product(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            if self.eat('*') {
                value *= self.unary()?;
            } else if self.eat('/') {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value /= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        if self.eat('-') {
            Ok(-self.nested(Self::unary)?)
        } else if self.eat('+') {
            self.nested(Self::unary)
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.postfix()?;
        if self.eat('^') {
            let exponent = self.unary()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn postfix(&mut self) -> Result<f64, EvalError> {
        let mut value = self.primary()?;
        while self.eat('%') {
            value /= 100.0;
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.nested(Self::sum)?;
                if self.eat(')') {
                    Ok(value)
                } else {
                    Err(self.unexpected())
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            _ => Err(self.unexpected()),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        let mut seen_point = false;
        while let Some(&c) = self.chars.get(self.pos) {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else if c == '.' && !seen_point {
                seen_point = true;
                self.pos += 1;
            } else {
                break;
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>().map_err(|_| EvalError::Unexpected {
            found: self.chars[start],
            position: start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
        assert_eq!(evaluate("2^3^2"), Ok(512.0));
        assert_eq!(evaluate("-2^2"), Ok(-4.0));
        assert_eq!(evaluate("2^-1"), Ok(0.5));
        assert_eq!(evaluate("10-4-3"), Ok(3.0));
        assert_eq!(evaluate("8/4/2"), Ok(1.0));
    }

    #[test]
    fn test_percent_and_whitespace() {
        assert_eq!(evaluate("50%"), Ok(0.5));
        assert_eq!(evaluate("200 * 10%"), Ok(20.0));
        assert_eq!(evaluate(" 1 + 2 "), Ok(3.0));
        assert_eq!(evaluate(".5+1."), Ok(1.5));
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("2+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate(""), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(1+2"), Err(EvalError::UnexpectedEnd));
        assert_eq!(
            evaluate("2+*3"),
            Err(EvalError::Unexpected {
                found: '*',
                position: 2
            })
        );
        assert_eq!(
            evaluate("1.5.2"),
            Err(EvalError::Unexpected {
                found: '.',
                position: 3
            })
        );
        assert_eq!(
            evaluate("."),
            Err(EvalError::Unexpected {
                found: '.',
                position: 0
            })
        );
        assert_eq!(evaluate("9^999"), Err(EvalError::NotFinite));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let too_deep = EvalError::Other("Expression nested too deeply".to_string());

        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(evaluate(&parens), Err(too_deep.clone()));
        let signs = format!("{}1", "-".repeat(10_000));
        assert_eq!(evaluate(&signs), Err(too_deep));

        let fits = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(evaluate(&fits), Ok(1.0));
        assert_eq!(evaluate(&"-".repeat(MAX_DEPTH)), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("--2"), Ok(2.0));
    }

    #[test]
    fn test_trait_object() {
        let evaluator: &dyn Evaluator = &ExpressionEvaluator;
        assert_eq!(evaluator.evaluate("6*7"), Ok(42.0));
    }
}
