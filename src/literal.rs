//! A small literal-grammar parser for user-edited raw values.
//!
//! Recognizes integers, floats, booleans, quoted strings, and bracketed
//! list/tuple/dict literals of the same forms. This is deliberately not a
//! general expression evaluator: the input is untrusted free text, and
//! anything outside the grammar is rejected so the caller can fall back to
//! treating it as a string.

use smol_str::SmolStr;

use crate::value::{Dict, Value};

/// Parse `input` as a single literal. The whole input must be consumed;
/// `None` means "not a literal".
pub(crate) fn parse(input: &str) -> Option<Value> {
    let mut parser = Parser::new(input);
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.at_end() {
        Some(value)
    } else {
        None
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Option<Value> {
        match self.peek()? {
            '[' => self.sequence(']').map(Value::Array),
            '(' => self.sequence(')').map(Value::Tuple),
            '{' => self.dict().map(Value::Dict),
            '"' | '\'' => self.string().map(Value::Str),
            _ => self.scalar(),
        }
    }

    fn sequence(&mut self, close: char) -> Option<Vec<Value>> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            if !self.eat(',') && self.peek() != Some(close) {
                return None;
            }
        }
    }

    fn dict(&mut self) -> Option<Dict> {
        self.bump();
        let mut entries = Dict::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Some(entries);
            }
            let key = match self.peek()? {
                '"' | '\'' => self.string()?,
                _ => self.bare_key()?,
            };
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
            self.skip_ws();
            let value = self.value()?;
            entries.insert(SmolStr::from(key), value);
            self.skip_ws();
            if !self.eat(',') && self.peek() != Some('}') {
                return None;
            }
        }
    }

    fn bare_key(&mut self) -> Option<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => out.push(match self.bump()? {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                }),
                c => out.push(c),
            }
        }
    }

    fn scalar(&mut self) -> Option<Value> {
        let start = self.pos;
        while matches!(self.peek(),
            Some(c) if !c.is_whitespace() && !matches!(c, ',' | ']' | ')' | '}' | ':'))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        match token.as_str() {
            "true" | "True" => return Some(Value::Bool(true)),
            "false" | "False" => return Some(Value::Bool(false)),
            _ => {}
        }
        // Only digit-shaped tokens are numbers; this keeps "inf" and "nan"
        // out of the grammar so they degrade to strings instead.
        if !token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            return None;
        }
        if let Ok(n) = token.parse::<i64>() {
            return Some(Value::Int(n));
        }
        token
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Value::Float)
    }
}
