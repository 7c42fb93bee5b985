/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword: `export`, `DEEP_CURRENT`, `focus`.
    Ident,
    /// Numeric literal: `500`, `0.5`.
    Number,
    /// Quoted string with the quotes removed: `'#08A4BD'` → `#08A4BD`.
    Str,
    /// Structural punctuation: `{ } [ ] ( ) : , = ; .`
    Punct,
    /// Any other character. Kept so the parser can skip over it.
    Other,
}

/// A single token from a token source file.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line the token starts on.
    pub line: usize,
}

impl Token {
    /// Whether this is the punctuation token `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == 1 && self.text.starts_with(c)
    }

    /// Whether this is the identifier/keyword `word`.
    pub fn is_ident(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }
}

fn is_punct(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '(' | ')' | ':' | ',' | '=' | ';' | '.')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize token-source text.
///
/// Handles:
/// - `//` line comments and `/* */` block comments (skipped)
/// - `'…'`, `"…"` and `` `…` `` strings with backslash escapes
/// - identifiers, integer and decimal numbers
/// - single-character punctuation
///
/// Never fails: an unterminated string or comment runs to end of input.
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\n' {
            line += 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Comments.
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }
            i = (i + 2).min(chars.len());
            continue;
        }

        // Strings.
        if matches!(c, '\'' | '"' | '`') {
            let start_line = line;
            let quote = c;
            let mut text = String::new();
            i += 1;
            while i < chars.len() && chars[i] != quote {
                match chars[i] {
                    '\\' if i + 1 < chars.len() => {
                        text.push(chars[i + 1]);
                        i += 2;
                    }
                    ch => {
                        if ch == '\n' {
                            line += 1;
                        }
                        text.push(ch);
                        i += 1;
                    }
                }
            }
            if i < chars.len() {
                i += 1; // closing quote
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                text,
                line: start_line,
            });
            continue;
        }

        // Numbers. A dot followed by a digit stays inside the literal.
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_digit()
                    || chars[i] == '_'
                    || (chars[i] == '.'
                        && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())))
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().filter(|&&ch| ch != '_').collect();
            tokens.push(Token {
                kind: TokenKind::Number,
                text,
                line,
            });
            continue;
        }

        if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                text: chars[start..i].iter().collect(),
                line,
            });
            continue;
        }

        tokens.push(Token {
            kind: if is_punct(c) {
                TokenKind::Punct
            } else {
                TokenKind::Other
            },
            text: c.to_string(),
            line,
        });
        i += 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_declaration() {
        let tokens = tokenize("export const DEEP_CURRENT = { 500: '#08A4BD' } as const;");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "export",
                "const",
                "DEEP_CURRENT",
                "=",
                "{",
                "500",
                ":",
                "#08A4BD",
                "}",
                "as",
                "const",
                ";"
            ]
        );
        assert_eq!(tokens[5].kind, TokenKind::Number);
        assert_eq!(tokens[7].kind, TokenKind::Str);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("// header\n/* block\n comment */ A // trailing\n");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "A");
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn test_string_quotes_and_escapes() {
        let tokens = tokenize(r#"'a\'b' "c" `d`"#);
        assert_eq!(kinds(&tokens), vec![TokenKind::Str; 3]);
        assert_eq!(tokens[0].text, "a'b");
        assert_eq!(tokens[1].text, "c");
        assert_eq!(tokens[2].text, "d");
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let tokens = tokenize("x = '#08A4BD");
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some("#08A4BD"));
    }

    #[test]
    fn test_member_access_and_numbers() {
        let tokens = tokenize("DEEP_CURRENT[500] 0.5 1_000 a.b");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["DEEP_CURRENT", "[", "500", "]", "0.5", "1000", "a", ".", "b"]
        );
    }

    #[test]
    fn test_unknown_characters_are_other() {
        let tokens = tokenize("a => b");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::Other,
                TokenKind::Ident
            ]
        );
    }
}
