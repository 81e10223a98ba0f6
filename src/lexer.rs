// File: src/lexer.rs
//
// Lexical analyzer for Nix expressions.
// Converts source text into a stream of tokens, pulled one at a time
// with `next_token`. Tracks line and column positions for diagnostics.
//
// Recognizes:
// - Keywords: if, then, else, let, in, with, assert, or, and, not, rec, inherit
// - Identifiers, integer and float literals
// - String literals with backslash escapes (decoded here)
// - Path literals (/absolute, ./relative, name/relative)
// - Operators: + - * / == != < > <= >= && || -> ++ // ? . = ... @
// - Punctuation: ; : , ( ) { } [ ]
// - Comments: # to end of line, /* ... */ (not nested)

use std::fmt;

/// Classification of a lexical token.
///
/// `true`, `false`, and `null` are lexed as ordinary identifiers and
/// reinterpreted by the parser. `&` and `|` on their own are `Illegal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Illegal,

    // Literals
    Int,
    Float,
    Str,
    PathLit,
    Ident,

    // Keywords
    If,
    Then,
    Else,
    Let,
    In,
    With,
    Assert,
    Or,
    And,
    Not,
    Rec,
    Inherit,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    AndAnd,
    OrOr,
    Implies,
    Concat,
    Update,
    Question,
    Dot,
    Ellipsis,
    At,

    // Delimiters
    Semicolon,
    Colon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Illegal => "illegal character",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Str => "string",
            TokenKind::PathLit => "path",
            TokenKind::Ident => "identifier",
            TokenKind::If => "'if'",
            TokenKind::Then => "'then'",
            TokenKind::Else => "'else'",
            TokenKind::Let => "'let'",
            TokenKind::In => "'in'",
            TokenKind::With => "'with'",
            TokenKind::Assert => "'assert'",
            TokenKind::Or => "'or'",
            TokenKind::And => "'and'",
            TokenKind::Not => "'not'",
            TokenKind::Rec => "'rec'",
            TokenKind::Inherit => "'inherit'",
            TokenKind::Assign => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Eq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Implies => "'->'",
            TokenKind::Concat => "'++'",
            TokenKind::Update => "'//'",
            TokenKind::Question => "'?'",
            TokenKind::Dot => "'.'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::At => "'@'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
        };
        f.write_str(name)
    }
}

/// A single lexical unit: its kind, the source text it covers (escape
/// sequences already decoded for strings), and where it starts.
/// Lines are 1-based, columns 0-based within the line.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "let" => TokenKind::Let,
        "in" => TokenKind::In,
        "with" => TokenKind::With,
        "assert" => TokenKind::Assert,
        "or" => TokenKind::Or,
        "and" => TokenKind::And,
        "not" => TokenKind::Not,
        "rec" => TokenKind::Rec,
        "inherit" => TokenKind::Inherit,
        _ => TokenKind::Ident,
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_char(ch: u8) -> bool {
    is_letter(ch) || ch.is_ascii_digit() || ch == b'-'
}

fn is_path_char(ch: u8) -> bool {
    is_letter(ch) || ch.is_ascii_digit() || ch == b'/' || ch == b'.' || ch == b'-'
}

/// Single-pass scanner over a UTF-8 source string.
///
/// The scanner works on bytes; multi-byte characters only occur inside
/// strings and comments, where they are passed through untouched.
pub struct Lexer {
    input: Vec<u8>,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer {
            input: input.as_bytes().to_vec(),
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        // Prime the scanner with the first character
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied().unwrap_or(0);
        self.position = self.read_position;
        self.read_position += 1;
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    fn peek_char(&self) -> u8 {
        self.input.get(self.read_position).copied().unwrap_or(0)
    }

    fn peek_char2(&self) -> u8 {
        self.input.get(self.read_position + 1).copied().unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }

    fn skip_comment(&mut self) {
        if self.ch == b'#' {
            while self.ch != b'\n' && self.ch != 0 {
                self.read_char();
            }
        } else if self.ch == b'/' && self.peek_char() == b'*' {
            self.read_char();
            self.read_char();
            while self.ch != 0 {
                if self.ch == b'*' && self.peek_char() == b'/' {
                    self.read_char();
                    self.read_char();
                    break;
                }
                self.read_char();
            }
        }
    }

    /// Reads an identifier using maximal munch, continuing as a path
    /// literal if a `/` immediately follows the identifier characters.
    fn read_identifier_or_path(&mut self) -> (String, TokenKind) {
        let start = self.position;
        while is_ident_char(self.ch) {
            self.read_char();
        }
        if self.ch == b'/' {
            while is_path_char(self.ch) {
                self.read_char();
            }
            let text = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
            return (text, TokenKind::PathLit);
        }
        let text = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
        let kind = lookup_ident(&text);
        (text, kind)
    }

    /// Reads an integer, upgrading to a float when a decimal point is
    /// followed by a digit. A bare `.` after digits is left for the
    /// selection operator.
    fn read_number(&mut self) -> (String, TokenKind) {
        let start = self.position;
        let mut kind = TokenKind::Int;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        if self.ch == b'.' && self.peek_char().is_ascii_digit() {
            kind = TokenKind::Float;
            self.read_char();
            while self.ch.is_ascii_digit() {
                self.read_char();
            }
        }
        let text = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
        (text, kind)
    }

    /// Reads a double-quoted string, decoding escape sequences.
    /// An unterminated string ends silently at EOF.
    fn read_string(&mut self) -> String {
        let mut buf = Vec::new();
        loop {
            self.read_char();
            match self.ch {
                b'"' | 0 => break,
                b'\\' => {
                    self.read_char();
                    match self.ch {
                        b'n' => buf.push(b'\n'),
                        b't' => buf.push(b'\t'),
                        b'r' => buf.push(b'\r'),
                        0 => break,
                        other => buf.push(other),
                    }
                }
                other => buf.push(other),
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn read_path(&mut self) -> String {
        let start = self.position;
        while is_path_char(self.ch) {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    /// Returns the next token from the input. Emits `Eof` repeatedly once
    /// the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if self.ch == b'#' || (self.ch == b'/' && self.peek_char() == b'*') {
                self.skip_comment();
            } else {
                break;
            }
        }

        let line = self.line;
        let column = self.column;
        let token = |kind: TokenKind, literal: &str| Token {
            kind,
            literal: literal.to_string(),
            line,
            column,
        };

        let tok = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    token(TokenKind::Eq, "==")
                } else {
                    token(TokenKind::Assign, "=")
                }
            }
            b'+' => {
                if self.peek_char() == b'+' {
                    self.read_char();
                    token(TokenKind::Concat, "++")
                } else {
                    token(TokenKind::Plus, "+")
                }
            }
            b'-' => {
                if self.peek_char() == b'>' {
                    self.read_char();
                    token(TokenKind::Implies, "->")
                } else {
                    token(TokenKind::Minus, "-")
                }
            }
            b'*' => token(TokenKind::Star, "*"),
            b'/' => {
                if self.peek_char() == b'/' {
                    self.read_char();
                    token(TokenKind::Update, "//")
                } else if self.peek_char().is_ascii_alphabetic() {
                    // Absolute path literal rather than division
                    let text = self.read_path();
                    return Token { kind: TokenKind::PathLit, literal: text, line, column };
                } else {
                    token(TokenKind::Slash, "/")
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    token(TokenKind::NotEq, "!=")
                } else {
                    token(TokenKind::Not, "!")
                }
            }
            b'<' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    token(TokenKind::Le, "<=")
                } else {
                    token(TokenKind::Lt, "<")
                }
            }
            b'>' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    token(TokenKind::Ge, ">=")
                } else {
                    token(TokenKind::Gt, ">")
                }
            }
            b'&' => {
                if self.peek_char() == b'&' {
                    self.read_char();
                    token(TokenKind::AndAnd, "&&")
                } else {
                    token(TokenKind::Illegal, "&")
                }
            }
            b'|' => {
                if self.peek_char() == b'|' {
                    self.read_char();
                    token(TokenKind::OrOr, "||")
                } else {
                    token(TokenKind::Illegal, "|")
                }
            }
            b'?' => token(TokenKind::Question, "?"),
            b'.' => {
                if self.peek_char() == b'/' {
                    // Relative path literal such as ./file.nix
                    let text = self.read_path();
                    return Token { kind: TokenKind::PathLit, literal: text, line, column };
                } else if self.peek_char() == b'.' {
                    if self.peek_char2() == b'.' {
                        self.read_char();
                        self.read_char();
                        token(TokenKind::Ellipsis, "...")
                    } else {
                        self.read_char();
                        token(TokenKind::Illegal, "..")
                    }
                } else {
                    token(TokenKind::Dot, ".")
                }
            }
            b'@' => token(TokenKind::At, "@"),
            b';' => token(TokenKind::Semicolon, ";"),
            b':' => token(TokenKind::Colon, ":"),
            b',' => token(TokenKind::Comma, ","),
            b'(' => token(TokenKind::LParen, "("),
            b')' => token(TokenKind::RParen, ")"),
            b'{' => token(TokenKind::LBrace, "{"),
            b'}' => token(TokenKind::RBrace, "}"),
            b'[' => token(TokenKind::LBracket, "["),
            b']' => token(TokenKind::RBracket, "]"),
            b'"' => {
                let text = self.read_string();
                Token { kind: TokenKind::Str, literal: text, line, column }
            }
            0 => Token { kind: TokenKind::Eof, literal: String::new(), line, column },
            ch => {
                if is_letter(ch) {
                    let (text, kind) = self.read_identifier_or_path();
                    return Token { kind, literal: text, line, column };
                } else if ch.is_ascii_digit() {
                    let (text, kind) = self.read_number();
                    return Token { kind, literal: text, line, column };
                } else {
                    token(TokenKind::Illegal, &(ch as char).to_string())
                }
            }
        };

        self.read_char();
        tok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push((tok.kind, tok.literal));
            if done {
                break;
            }
        }
        out
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex_all(input).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            kinds("= + - * / ? . ; : , ( ) { } [ ] @"),
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Question,
                TokenKind::Dot,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::At,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(
            kinds("== != <= >= && || -> ++ // ..."),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Implies,
                TokenKind::Concat,
                TokenKind::Update,
                TokenKind::Ellipsis,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lone_ampersand_and_pipe_are_illegal() {
        assert_eq!(kinds("&"), vec![TokenKind::Illegal, TokenKind::Eof]);
        assert_eq!(kinds("|"), vec![TokenKind::Illegal, TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        let toks = lex_all("let foo-bar = if x then rec else inherit; in with assert or and not");
        let expected = vec![
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "foo-bar"),
            (TokenKind::Assign, "="),
            (TokenKind::If, "if"),
            (TokenKind::Ident, "x"),
            (TokenKind::Then, "then"),
            (TokenKind::Rec, "rec"),
            (TokenKind::Else, "else"),
            (TokenKind::Inherit, "inherit"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::In, "in"),
            (TokenKind::With, "with"),
            (TokenKind::Assert, "assert"),
            (TokenKind::Or, "or"),
            (TokenKind::And, "and"),
            (TokenKind::Not, "not"),
            (TokenKind::Eof, ""),
        ];
        let expected: Vec<(TokenKind, String)> =
            expected.into_iter().map(|(k, s)| (k, s.to_string())).collect();
        assert_eq!(toks, expected);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            lex_all("42 3.14 0 1.0"),
            vec![
                (TokenKind::Int, "42".to_string()),
                (TokenKind::Float, "3.14".to_string()),
                (TokenKind::Int, "0".to_string()),
                (TokenKind::Float, "1.0".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn dot_after_number_is_selection() {
        assert_eq!(
            kinds("1.x"),
            vec![TokenKind::Int, TokenKind::Dot, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn strings_decode_escapes() {
        assert_eq!(
            lex_all(r#""hello" "a\"b" "tab\there" "line\n""#),
            vec![
                (TokenKind::Str, "hello".to_string()),
                (TokenKind::Str, "a\"b".to_string()),
                (TokenKind::Str, "tab\there".to_string()),
                (TokenKind::Str, "line\n".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn paths() {
        assert_eq!(
            lex_all("/bin/sh ./file.nix src/main.rs"),
            vec![
                (TokenKind::PathLit, "/bin/sh".to_string()),
                (TokenKind::PathLit, "./file.nix".to_string()),
                (TokenKind::PathLit, "src/main.rs".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn slash_with_spaces_is_division() {
        assert_eq!(
            kinds("6 / 2"),
            vec![TokenKind::Int, TokenKind::Slash, TokenKind::Int, TokenKind::Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("1 # a comment\n+ /* block\ncomment */ 2"),
            vec![TokenKind::Int, TokenKind::Plus, TokenKind::Int, TokenKind::Eof]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut lexer = Lexer::new("a\n  b");
        let a = lexer.next_token();
        assert_eq!((a.line, a.column), (1, 1));
        let b = lexer.next_token();
        assert_eq!((b.line, b.column), (2, 3));
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        lexer.next_token();
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}
