use crate::error::CompileError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    Operator(&'static str),
    LParen,
    RParen,
    Comma,
    Dot,
    Question,
    Colon,
    Arrow,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Str(s) => write!(f, "'{}'", s),
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Question => write!(f, "?"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Arrow => write!(f, "=>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source expression.
    pub position: usize,
}

// Longest symbols first so that `===` is not read as `==` followed by `=`.
const SYMBOLS: &[&str] = &[
    "===", "!==", "**", "<=", ">=", "==", "!=", "&&", "||", "+", "-", "*", "/", "%", "<", ">",
    "!",
];

/// Splits an expression into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos] as char;
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let single = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            '.' => Some(TokenKind::Dot),
            '?' => Some(TokenKind::Question),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token {
                kind,
                position: start,
            });
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() {
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let number = source[start..pos].parse::<f64>().map_err(|_| {
                CompileError::UnexpectedCharacter {
                    found: c,
                    position: start,
                }
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(number),
                position: start,
            });
            continue;
        }

        if c == '\'' || c == '"' {
            let (text, next) = read_string(source, start, c)?;
            tokens.push(Token {
                kind: TokenKind::Str(text),
                position: start,
            });
            pos = next;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            while pos < bytes.len()
                && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_' || bytes[pos] == b'$')
            {
                pos += 1;
            }
            let kind = match &source[start..pos] {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "null" => TokenKind::Null,
                word => TokenKind::Ident(word.to_string()),
            };
            tokens.push(Token {
                kind,
                position: start,
            });
            continue;
        }

        let rest = &source[start..];
        if rest.starts_with("=>") {
            tokens.push(Token {
                kind: TokenKind::Arrow,
                position: start,
            });
            pos += 2;
            continue;
        }
        if let Some(symbol) = SYMBOLS.iter().find(|s| rest.starts_with(**s)) {
            tokens.push(Token {
                kind: TokenKind::Operator(*symbol),
                position: start,
            });
            pos += symbol.len();
            continue;
        }

        let found = rest.chars().next().unwrap_or(c);
        return Err(CompileError::UnexpectedCharacter {
            found,
            position: start,
        });
    }

    Ok(tokens)
}

/// Reads a quoted string starting at `start`, returning its text and the
/// offset just past the closing quote.
fn read_string(source: &str, start: usize, quote: char) -> Result<(String, usize), CompileError> {
    let mut text = String::new();
    let mut chars = source[start + 1..].char_indices();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            ch if ch == quote => return Ok((text, start + 1 + offset + 1)),
            ch => text.push(ch),
        }
    }
    Err(CompileError::UnterminatedString { position: start })
}
