use crate::{bail, Result};

/// A property expression, parsed but not yet resolved against a type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expression {
    pub(crate) steps: Vec<PathStep>,

    /// The raw inner expression of a trailing `{...}` element selector.
    pub(crate) element: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathStep {
    /// `name`
    Field(String),

    /// `[0]`, `["key"]`
    Subscript(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Text(String),
    Integer(i64),
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

pub(crate) fn parse(input: &str) -> Result<Expression> {
    let mut parser = Parser { input, pos: 0 };
    parser.expression()
}

impl Parser<'_> {
    fn expression(&mut self) -> Result<Expression> {
        if self.input.trim().is_empty() {
            bail!("empty property expression");
        }

        let mut steps = vec![];
        let mut element = None;

        loop {
            steps.push(PathStep::Field(self.ident()?));

            while self.peek() == Some('[') {
                steps.push(PathStep::Subscript(self.subscript()?));
            }

            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                }
                Some('{') => {
                    element = Some(self.element()?);
                    if let Some(c) = self.peek() {
                        bail!(
                            "`{}`: element selector must be the last segment, found `{c}` at {}",
                            self.input,
                            self.pos
                        );
                    }
                    break;
                }
                None => break,
                Some(c) => bail!(
                    "`{}`: unexpected `{c}` at {}",
                    self.input,
                    self.pos
                ),
            }
        }

        Ok(Expression { steps, element })
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            let valid = if self.pos == start {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || c == '_'
            };
            if !valid {
                break;
            }
            self.pos += c.len_utf8();
        }

        if start == self.pos {
            bail!("`{}`: expected a property name at {start}", self.input);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn subscript(&mut self) -> Result<Literal> {
        self.expect('[')?;

        let literal = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut text = String::new();
                loop {
                    match self.next() {
                        Some('\\') => match self.next() {
                            Some(c) => text.push(c),
                            None => break,
                        },
                        Some(c) if c == quote => break,
                        Some(c) => text.push(c),
                        None => bail!("`{}`: unterminated string key", self.input),
                    }
                }
                Literal::Text(text)
            }
            _ => {
                let start = self.pos;
                if self.peek() == Some('-') {
                    self.pos += 1;
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits = &self.input[start..self.pos];
                match digits.parse() {
                    Ok(n) => Literal::Integer(n),
                    Err(_) => bail!(
                        "`{}`: expected an index or a quoted key at {start}",
                        self.input
                    ),
                }
            }
        };

        self.expect(']')?;
        Ok(literal)
    }

    /// Reads a balanced `{...}` group, returning its trimmed contents.
    fn element(&mut self) -> Result<String> {
        self.expect('{')?;
        let start = self.pos;
        let mut depth = 1;

        while let Some(c) = self.next() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.input[start..self.pos - 1].trim().to_string());
                    }
                }
                _ => {}
            }
        }

        bail!("`{}`: unbalanced `{{`", self.input)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => bail!(
                "`{}`: expected `{expected}`, found `{c}` at {}",
                self.input,
                self.pos - c.len_utf8()
            ),
            None => bail!("`{}`: expected `{expected}`, found end of input", self.input),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}
