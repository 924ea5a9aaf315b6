//! # Keypad Calculator
//!
//! The display string is the whole state. Keys edit it; `=` evaluates it
//! with a small recursive-descent parser over exact decimals.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key        display before   display after                              │
//! │  ───        ──────────────   ─────────────                              │
//! │  7          "0"              "7"          digits replace a lone 0       │
//! │  +          "7"              "7+"                                       │
//! │  *          "7+"             "7*"         operator replaces operator    │
//! │  .          "7*2.5"          "7*2.5"      one point per operand         │
//! │  =          "7*2.5"          "17.5"                                     │
//! │  =          "1/0"            "Error"                                    │
//! │  +          "Error"          "0+"                                       │
//! │  ⌫          "5"              "0"                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::iter::Peekable;
use std::str::{Chars, FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// Shown when evaluation fails.
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Sub),
            '*' | '×' | 'x' => Some(Operator::Mul),
            '/' | '÷' => Some(Operator::Div),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Point,
    Op(Operator),
    Delete,
    Clear,
    Equals,
}

impl FromStr for Key {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let mut chars = key.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };

        match (key.to_ascii_lowercase().as_str(), single) {
            (_, Some(c)) if c.is_ascii_digit() => Ok(Key::Digit(c)),
            (_, Some('.')) | (_, Some(',')) => Ok(Key::Point),
            (_, Some('=')) => Ok(Key::Equals),
            ("c" | "clear" | "ac", _) => Ok(Key::Clear),
            ("del" | "delete" | "backspace" | "⌫", _) => Ok(Key::Delete),
            (_, Some(c)) if Operator::from_char(c).is_some() => {
                Operator::from_char(c).map(Key::Op).ok_or_else(|| unknown_key(key))
            }
            _ => Err(unknown_key(key)),
        }
    }
}

fn unknown_key(key: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "key".to_string(),
        reason: format!("unknown calculator key '{}'", key),
    }
}

/// Calculator display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Calculator {
    display: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator {
            display: "0".to_string(),
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a display a client kept. Blank means `0`.
    pub fn with_display(display: impl Into<String>) -> Self {
        let display = display.into();
        if display.trim().is_empty() {
            return Self::default();
        }
        Calculator { display }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => {
                if self.display == "0" || self.is_error() {
                    self.display = d.to_string();
                } else {
                    self.display.push(d);
                }
            }
            Key::Point => {
                if self.is_error() {
                    self.display = "0.".to_string();
                    return;
                }
                let operand = self
                    .display
                    .rsplit(|c: char| Operator::from_char(c).is_some())
                    .next()
                    .unwrap_or_default();
                if !operand.contains('.') {
                    self.display.push('.');
                }
            }
            Key::Op(op) => {
                if self.is_error() {
                    self.display = format!("0{}", op.symbol());
                    return;
                }
                let replace = self
                    .display
                    .chars()
                    .last()
                    .is_some_and(|c| c == '.' || Operator::from_char(c).is_some());
                if replace {
                    self.display.pop();
                }
                self.display.push(op.symbol());
            }
            Key::Delete => {
                if self.display.chars().count() <= 1 || self.is_error() {
                    self.display = "0".to_string();
                } else {
                    self.display.pop();
                }
            }
            Key::Clear => self.display = "0".to_string(),
            Key::Equals => {
                self.display = match evaluate(&self.display) {
                    Some(value) => format_result(value),
                    None => ERROR_DISPLAY.to_string(),
                };
            }
        }
    }

    pub fn press_all<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        for key in keys {
            self.press(key);
        }
    }
}

fn format_result(value: Decimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalize().to_string()
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluates `+ - * /` with the usual precedence.
///
/// `None` on malformed input, division by zero or overflow.
pub fn evaluate(expression: &str) -> Option<Decimal> {
    let mut parser = Parser {
        chars: expression.chars().peekable(),
    };
    let value = parser.expr()?;
    parser.skip_spaces();
    match parser.chars.peek() {
        None => Some(value),
        Some(_) => None,
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn skip_spaces(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn next_operator(&mut self, allowed: &[Operator]) -> Option<Operator> {
        self.skip_spaces();
        let op = self.chars.peek().copied().and_then(Operator::from_char)?;
        if allowed.contains(&op) {
            self.chars.next();
            Some(op)
        } else {
            None
        }
    }

    fn expr(&mut self) -> Option<Decimal> {
        let mut acc = self.term()?;
        while let Some(op) = self.next_operator(&[Operator::Add, Operator::Sub]) {
            let rhs = self.term()?;
            acc = match op {
                Operator::Add => acc.checked_add(rhs)?,
                _ => acc.checked_sub(rhs)?,
            };
        }
        Some(acc)
    }

    fn term(&mut self) -> Option<Decimal> {
        let mut acc = self.factor()?;
        while let Some(op) = self.next_operator(&[Operator::Mul, Operator::Div]) {
            let rhs = self.factor()?;
            acc = match op {
                Operator::Mul => acc.checked_mul(rhs)?,
                _ => acc.checked_div(rhs)?,
            };
        }
        Some(acc)
    }

    /// Leading signs are folded in a loop; only the count of `-` matters.
    fn factor(&mut self) -> Option<Decimal> {
        let mut negative = false;
        while let Some(op) = self.next_operator(&[Operator::Add, Operator::Sub]) {
            if op == Operator::Sub {
                negative = !negative;
            }
        }
        let value = self.number()?;
        Some(if negative { -value } else { value })
    }

    fn number(&mut self) -> Option<Decimal> {
        self.skip_spaces();
        let mut text = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_ascii_digit() || *c == '.') {
            text.push(c);
        }
        if text.is_empty() || text == "." || text.matches('.').count() > 1 {
            return None;
        }
        if text.starts_with('.') {
            text.insert(0, '0');
        }
        if text.ends_with('.') {
            text.pop();
        }
        Decimal::from_str(&text).ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: &str, keys: &str) -> String {
        let mut calc = Calculator::with_display(start);
        for k in keys.split_whitespace() {
            calc.press(k.parse().unwrap());
        }
        calc.display().to_string()
    }

    #[test]
    fn test_digits_replace_zero_and_error() {
        assert_eq!(run("0", "7"), "7");
        assert_eq!(run("Error", "3"), "3");
        assert_eq!(run("12", "3"), "123");
    }

    #[test]
    fn test_point_once_per_operand() {
        assert_eq!(run("2.5", "."), "2.5");
        assert_eq!(run("2.5+1", "."), "2.5+1.");
        assert_eq!(run("Error", "."), "0.");
    }

    #[test]
    fn test_operator_replacement() {
        assert_eq!(run("7+", "*"), "7*");
        assert_eq!(run("7.", "-"), "7-");
        assert_eq!(run("Error", "+"), "0+");
    }

    #[test]
    fn test_delete_and_clear() {
        assert_eq!(run("5", "del"), "0");
        assert_eq!(run("Error", "del"), "0");
        assert_eq!(run("123", "del"), "12");
        assert_eq!(run("123", "C"), "0");
    }

    #[test]
    fn test_equals() {
        assert_eq!(run("7*2.5", "="), "17.5");
        assert_eq!(run("2+3*4", "="), "14");
        assert_eq!(run("10-4/2", "="), "8");
        assert_eq!(run("0.1+0.2", "="), "0.3");
        assert_eq!(run("1/0", "="), "Error");
        assert_eq!(run("5+", "="), "Error");
        assert_eq!(run("0-5", "= * 2 ="), "-10");
    }

    #[test]
    fn test_evaluate_forms() {
        assert_eq!(evaluate(".5*2"), Some(Decimal::ONE));
        assert_eq!(evaluate("3."), Some(Decimal::from(3)));
        assert_eq!(evaluate("1..2"), None);
        assert_eq!(evaluate(""), None);
    }

    #[test]
    fn test_long_sign_runs_fold() {
        let minus = format!("{}1", "-".repeat(200_001));
        assert_eq!(evaluate(&minus), Some(Decimal::NEGATIVE_ONE));

        let mixed = format!("2*{}3", "+-".repeat(100_000));
        assert_eq!(evaluate(&mixed), Some(Decimal::from(6)));

        let dangling = "-".repeat(200_000);
        assert_eq!(evaluate(&dangling), None);
        assert_eq!(run(&dangling, "="), "Error");
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("×".parse::<Key>().unwrap(), Key::Op(Operator::Mul));
        assert_eq!("backspace".parse::<Key>().unwrap(), Key::Delete);
        assert!("%".parse::<Key>().is_err());
    }
}
