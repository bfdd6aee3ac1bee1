// SPDX-License-Identifier: Apache-2.0

//! Line-oriented token scanner for the structural netlist subset.
//!
//! The format is processed one physical line at a time, so the scanner
//! produces the tokens of a single line. The only state carried from one line
//! to the next is whether we are inside a `/* ... */` block comment.
//!
//! Scanning never fails: characters that are not part of the subset come out
//! as [`TokenPayload::Other`] and the consumer decides whether that matters
//! where it occurs.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub lineno: u32,
    pub colno: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lineno, self.colno)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Module,
    Endmodule,
    Input,
    Output,
    Inout,
    Wire,
}

impl Keyword {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "module" => Some(Keyword::Module),
            "endmodule" => Some(Keyword::Endmodule),
            "input" => Some(Keyword::Input),
            "output" => Some(Keyword::Output),
            "inout" => Some(Keyword::Inout),
            "wire" => Some(Keyword::Wire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPayload {
    Identifier(String),
    Keyword(Keyword),
    /// Unsized decimal digits, e.g. the `3` in `[3:0]`.
    Number(String),
    /// Based literal kept as written, e.g. `4'b0101` or `'h_F`.
    Literal(String),
    OParen,
    CParen,
    OBrack,
    CBrack,
    Colon,
    Semi,
    Comma,
    Dot,
    Other(char),
}

impl fmt::Display for TokenPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPayload::Identifier(s) | TokenPayload::Number(s) | TokenPayload::Literal(s) => {
                write!(f, "{}", s)
            }
            TokenPayload::Keyword(Keyword::Module) => write!(f, "module"),
            TokenPayload::Keyword(Keyword::Endmodule) => write!(f, "endmodule"),
            TokenPayload::Keyword(Keyword::Input) => write!(f, "input"),
            TokenPayload::Keyword(Keyword::Output) => write!(f, "output"),
            TokenPayload::Keyword(Keyword::Inout) => write!(f, "inout"),
            TokenPayload::Keyword(Keyword::Wire) => write!(f, "wire"),
            TokenPayload::OParen => write!(f, "("),
            TokenPayload::CParen => write!(f, ")"),
            TokenPayload::OBrack => write!(f, "["),
            TokenPayload::CBrack => write!(f, "]"),
            TokenPayload::Colon => write!(f, ":"),
            TokenPayload::Semi => write!(f, ";"),
            TokenPayload::Comma => write!(f, ","),
            TokenPayload::Dot => write!(f, "."),
            TokenPayload::Other(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub payload: TokenPayload,
    pub pos: Pos,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_literal_body(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '?'
}

#[derive(Debug, Default)]
pub struct LineScanner {
    in_block_comment: bool,
}

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Tokenizes one physical line. Comments produce no tokens, so blank and
    /// comment-only lines come back empty.
    pub fn scan_line(&mut self, lineno: u32, line: &str) -> Vec<Token> {
        let chars: Vec<char> = line.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if self.in_block_comment {
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            let pos = Pos {
                lineno,
                colno: (i + 1) as u32,
            };
            if c == '/' && chars.get(i + 1) == Some(&'/') {
                break;
            }
            if c == '/' && chars.get(i + 1) == Some(&'*') {
                self.in_block_comment = true;
                i += 2;
                continue;
            }
            let start = i;
            let payload = if is_ident_start(c) {
                while i < chars.len() && is_ident_continue(chars[i]) {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                match Keyword::from_str(&ident) {
                    Some(kw) => TokenPayload::Keyword(kw),
                    None => TokenPayload::Identifier(ident),
                }
            } else if c.is_ascii_digit() || c == '\'' {
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if chars.get(i) == Some(&'\'') {
                    // Based literal: size'[s]base digits
                    i += 1;
                    while i < chars.len() && is_literal_body(chars[i]) {
                        i += 1;
                    }
                    TokenPayload::Literal(chars[start..i].iter().collect())
                } else {
                    TokenPayload::Number(chars[start..i].iter().collect())
                }
            } else {
                i += 1;
                match c {
                    '(' => TokenPayload::OParen,
                    ')' => TokenPayload::CParen,
                    '[' => TokenPayload::OBrack,
                    ']' => TokenPayload::CBrack,
                    ':' => TokenPayload::Colon,
                    ';' => TokenPayload::Semi,
                    ',' => TokenPayload::Comma,
                    '.' => TokenPayload::Dot,
                    other => TokenPayload::Other(other),
                }
            };
            tokens.push(Token { payload, pos });
        }
        log::trace!("scan_line: line {} -> {} token(s)", lineno, tokens.len());
        tokens
    }
}

/// Peek/pop access over the tokens of one line.
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        TokenCursor { tokens, index: 0 }
    }

    pub fn peekt(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    /// Looks `n` tokens past the current one (`peek_nth(0) == peekt()`).
    pub fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.index + n)
    }

    pub fn popt(&mut self) -> Option<&'t Token> {
        let tok = self.tokens.get(self.index);
        if tok.is_some() {
            self.index += 1;
        }
        tok
    }

    pub fn peek_is(&self, payload: &TokenPayload) -> bool {
        self.peekt().map(|t| &t.payload == payload).unwrap_or(false)
    }

    /// Pops the next token if it is an identifier.
    pub fn pop_identifier(&mut self) -> Option<&'t str> {
        match self.peekt() {
            Some(Token {
                payload: TokenPayload::Identifier(s),
                ..
            }) => {
                self.index += 1;
                Some(s.as_str())
            }
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Column of the next token, or one past the last token at end of line.
    pub fn pos_or_end(&self, lineno: u32) -> Pos {
        match self.peekt() {
            Some(tok) => tok.pos,
            None => match self.tokens.last() {
                Some(last) => Pos {
                    lineno,
                    colno: last.pos.colno + last.payload.to_string().chars().count() as u32,
                },
                None => Pos { lineno, colno: 1 },
            },
        }
    }

    /// Skips an unrecognized statement: always consumes at least one token,
    /// then stops after a `;`, before a `module`/`endmodule` keyword, or at
    /// end of line.
    pub fn skip_statement(&mut self) {
        let first = self.popt();
        if matches!(first, Some(t) if t.payload == TokenPayload::Semi) {
            return;
        }
        while let Some(tok) = self.peekt() {
            match &tok.payload {
                TokenPayload::Semi => {
                    self.index += 1;
                    return;
                }
                TokenPayload::Keyword(Keyword::Module) | TokenPayload::Keyword(Keyword::Endmodule) => {
                    return;
                }
                _ => self.index += 1,
            }
        }
    }
}
