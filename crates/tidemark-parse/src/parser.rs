use crate::document::{Declaration, Diagnostic, Document, Value};
use crate::tokenizer::{self, Token, TokenKind};

type ParseResult<T> = Result<T, String>;

/// Parse token-source text into a [`Document`].
///
/// Only `const`/`let`/`var` declarations and bare `NAME = value` assignments
/// are read; everything else (imports, functions, types) is skipped one token
/// at a time. A declaration
/// that fails to parse is recorded as a diagnostic and scanning resumes at the
/// point of failure, so one malformed palette never hides the ones after it.
///
/// # Example
/// ```
/// let doc = tidemark_parse::parse("export const DEEP_CURRENT = { 500: '#08A4BD' } as const;");
/// let palette = doc.palette("DEEP_CURRENT").unwrap();
/// assert_eq!(palette.shade(500), Some("#08A4BD"));
/// ```
pub fn parse(source: &str) -> Document {
    let tokens = tokenizer::tokenize(source);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        diagnostics: Vec::new(),
    };
    let mut declarations = Vec::new();

    while !parser.at_end() {
        let start = parser.pos;
        match parser.declaration() {
            Some(Ok(decl)) => declarations.push(decl),
            Some(Err(message)) => {
                parser.report(tokens[start].line, message);
                parser.pos = parser.pos.max(start + 1);
            }
            None => parser.pos = start + 1,
        }
    }

    Document {
        declarations,
        diagnostics: parser.diagnostics,
        ..Document::default()
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|t| t.is_punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> ParseResult<()> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(format!("expected `{c}`, found {}", self.found()))
        }
    }

    fn report(&mut self, line: usize, message: String) {
        tracing::debug!(line, "Skipping malformed token source entry: {message}");
        self.diagnostics.push(Diagnostic { line, message });
    }

    fn found(&self) -> String {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Str => format!("string '{}'", t.text),
            Some(t) => format!("`{}`", t.text),
            None => "end of input".into(),
        }
    }

    /// `None` if the current token does not start a declaration.
    fn declaration(&mut self) -> Option<ParseResult<Declaration>> {
        let first = self.peek()?;

        // Bare `NAME = value` assignment.
        if first.kind == TokenKind::Ident
            && self.peek_at(1).is_some_and(|t| t.is_punct('='))
            && !self
                .peek_at(2)
                .is_some_and(|t| t.is_punct('=') || t.text == ">")
            && !self
                .previous()
                .is_some_and(|t| t.is_punct('.') || t.is_ident("type"))
        {
            self.pos += 1;
            return Some(self.declaration_body(first.text.clone(), first.line));
        }

        let keyword_offset = usize::from(first.is_ident("export"));
        let keyword = self.peek_at(keyword_offset)?;
        if !(keyword.is_ident("const") || keyword.is_ident("let") || keyword.is_ident("var")) {
            return None;
        }
        // `export const enum` and friends are not value declarations.
        let name = self.peek_at(keyword_offset + 1)?;
        if name.kind != TokenKind::Ident || name.is_ident("enum") {
            return None;
        }

        let line = first.line;
        self.pos += keyword_offset + 2;
        Some(self.declaration_body(name.text.clone(), line))
    }

    fn declaration_body(&mut self, name: String, line: usize) -> ParseResult<Declaration> {
        if self.eat_punct(':') {
            self.skip_type_annotation()?;
        }
        self.expect_punct('=')?;
        let value = self.value()?;

        // `as const`, `satisfies Palette`
        if self
            .peek()
            .is_some_and(|t| t.is_ident("as") || t.is_ident("satisfies"))
            && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::Ident)
        {
            self.pos += 2;
        }
        self.eat_punct(';');

        Ok(Declaration { name, value, line })
    }

    /// Skip `: Type<...>` up to the `=` at bracket depth zero.
    fn skip_type_annotation(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            let Some(token) = self.peek() else {
                return Err("unterminated type annotation".into());
            };
            match token.text.as_str() {
                "=" if depth == 0 && token.kind == TokenKind::Punct => return Ok(()),
                ";" if token.kind == TokenKind::Punct => {
                    return Err("declaration without initializer".into())
                }
                "{" | "[" | "(" | "<" => depth += 1,
                "}" | "]" | ")" | ">" => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn value(&mut self) -> ParseResult<Value> {
        let Some(token) = self.peek() else {
            return Err("expected a value, found end of input".into());
        };
        match token.kind {
            TokenKind::Punct if token.is_punct('{') => self.object(),
            TokenKind::Str => {
                self.pos += 1;
                Ok(Value::Str(token.text.clone()))
            }
            TokenKind::Number => {
                self.pos += 1;
                Ok(Value::Number(token.text.clone()))
            }
            TokenKind::Ident => self.reference(),
            _ => Err(format!("expected a value, found {}", self.found())),
        }
    }

    /// An object literal. An entry that cannot be read is reported and
    /// skipped; the rest of the object is kept.
    fn object(&mut self) -> ParseResult<Value> {
        self.expect_punct('{')?;
        let mut entries = Vec::new();

        loop {
            if self.eat_punct('}') {
                return Ok(Value::Object(entries));
            }
            let Some(line) = self.peek().map(|t| t.line) else {
                return Err("unterminated object".into());
            };
            match self.entry() {
                Ok(entry) => entries.push(entry),
                Err(message) => {
                    self.report(line, message);
                    self.skip_entry();
                }
            }

            if !self.eat_punct(',') {
                self.expect_punct('}')?;
                return Ok(Value::Object(entries));
            }
        }
    }

    fn entry(&mut self) -> ParseResult<(String, Value)> {
        let key = match self.peek() {
            Some(t) if matches!(t.kind, TokenKind::Ident | TokenKind::Str | TokenKind::Number) => {
                self.pos += 1;
                t.text.clone()
            }
            _ => return Err(format!("expected an object key, found {}", self.found())),
        };
        let value = self
            .entry_value()
            .map_err(|message| format!("{key}: {message}"))?;
        Ok((key, value))
    }

    fn entry_value(&mut self) -> ParseResult<Value> {
        self.expect_punct(':')?;
        let value = self.value()?;
        if self.peek().is_some_and(|t| t.is_punct(',') || t.is_punct('}')) {
            Ok(value)
        } else {
            Err(format!("expected `,` or `}}`, found {}", self.found()))
        }
    }

    /// Advance to the `,` or `}` that ends the current entry.
    fn skip_entry(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Punct {
                match token.text.as_str() {
                    "," | "}" if depth == 0 => return,
                    "{" | "[" | "(" => depth += 1,
                    "}" | "]" | ")" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.pos += 1;
        }
    }

    /// `NAME`, `NAME.key`, `NAME[500]`, `NAME['key']`.
    fn reference(&mut self) -> ParseResult<Value> {
        let mut path = Vec::new();
        match self.next() {
            Some(t) if t.kind == TokenKind::Ident => path.push(t.text.clone()),
            _ => return Err("expected an identifier".into()),
        }

        loop {
            if self.eat_punct('.') {
                match self.next() {
                    Some(t) if t.kind == TokenKind::Ident => path.push(t.text.clone()),
                    _ => return Err("expected a property name after `.`".into()),
                }
            } else if self.eat_punct('[') {
                match self.next() {
                    Some(t) if matches!(t.kind, TokenKind::Number | TokenKind::Str) => {
                        path.push(t.text.clone())
                    }
                    _ => return Err("expected a number or string index".into()),
                }
                self.expect_punct(']')?;
            } else {
                return Ok(Value::Reference(path));
            }
        }
    }
}
