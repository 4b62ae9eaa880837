//! A small tokenizer for JavaScript/TypeScript source.
//!
//! It only knows enough to tell code from comments and string literals, so
//! transforms can edit import specifiers and class strings without touching
//! look-alike text elsewhere. Tokens cover the input exactly: concatenating
//! every token's text gives back the source.

/// Kind of a source token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    /// `'...'` or `"..."`
    Str,
    /// `` `...` ``, including any `${}` substitutions
    Template,
    /// Identifiers, keywords, and numbers
    Ident,
    /// Any other single character
    Punct,
}

/// A token as a byte range into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Contents of a string literal without its quotes.
    pub fn inner<'a>(&self, source: &'a str) -> &'a str {
        match self.kind {
            TokenKind::Str | TokenKind::Template if self.end - self.start >= 2 => {
                &source[self.start + 1..self.end - 1]
            }
            _ => self.text(source),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    pub fn is_ident(&self, source: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == word
    }

    pub fn is_punct(&self, source: &str, ch: char) -> bool {
        self.kind == TokenKind::Punct && self.text(source).starts_with(ch)
    }
}

/// Split `source` into tokens.
///
/// Never fails: an unterminated string literal stops at the end of its line
/// and its opening quote becomes punctuation.
pub fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let b = bytes[i];
        let kind = match b {
            b if b.is_ascii_whitespace() => {
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                TokenKind::Whitespace
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                TokenKind::LineComment
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match source[i + 2..].find("*/") {
                    Some(off) => i + 2 + off + 2,
                    None => bytes.len(),
                };
                TokenKind::BlockComment
            }
            b'\'' | b'"' => match scan_string(bytes, i) {
                Some(end) => {
                    i = end;
                    TokenKind::Str
                }
                None => {
                    i += 1;
                    TokenKind::Punct
                }
            },
            b'`' => {
                i = scan_template(bytes, i);
                TokenKind::Template
            }
            b if is_ident_byte(b) => {
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
                TokenKind::Ident
            }
            _ => {
                i += utf8_len(b);
                TokenKind::Punct
            }
        };
        tokens.push(Token {
            kind,
            start,
            end: i.min(bytes.len()),
        });
    }

    tokens
}

/// Indices of the tokens that are not whitespace or comments.
pub fn significant(tokens: &[Token]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_trivia())
        .map(|(i, _)| i)
        .collect()
}

/// Apply byte-range replacements. Ranges must not overlap.
pub fn splice(source: &str, mut edits: Vec<(usize, usize, String)>) -> String {
    edits.sort_by_key(|(start, _, _)| *start);
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (start, end, replacement) in edits {
        out.push_str(&source[cursor..start]);
        out.push_str(&replacement);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

fn scan_string(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn scan_template(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'$' if depth == 0 && bytes.get(i + 1) == Some(&b'{') => {
                depth = 1;
                i += 2;
                continue;
            }
            b'{' if depth > 0 => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'`' if depth == 0 => return i + 1,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn utf8_len(b: u8) -> usize {
    match b {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}
