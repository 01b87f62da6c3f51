use std::{char, fmt, iter::Peekable, str::CharIndices};

use derive_more::with_trait::{Display, Error};

use crate::parser::{SourcePosition, Spanning};

/// Tokenizer for GraphQL request documents.
///
/// Walks the source lazily and yields one [`Token`] per [`Iterator::next`]
/// call. Whitespace, commas, the byte-order mark and comments are skipped.
#[derive(Debug)]
pub struct Lexer<'a> {
    iterator: Peekable<CharIndices<'a>>,
    source: &'a str,
    length: usize,
    position: SourcePosition,
    last_was_cr: bool,
    has_reached_eof: bool,
}

/// A single token in the input source.
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    Name(&'a str),
    Int(i32),
    Float(f64),
    String(String),
    BlockString(String),
    ExclamationMark,
    Dollar,
    Amp,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    CurlyOpen,
    CurlyClose,
    Ellipsis,
    Colon,
    Equals,
    At,
    Pipe,
    EndOfFile,
}

/// Error while tokenizing the input source.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum LexerError {
    /// An unknown character was found.
    ///
    /// Unknown characters are characters that do not occur anywhere in the
    /// GraphQL language, such as `?` or `%`.
    #[display("Unknown character \"{_0}\"")]
    UnknownCharacter(#[error(not(source))] char),

    /// An unexpected character was found.
    ///
    /// Unexpected characters are characters that _do_ exist in the GraphQL
    /// language, but are not expected at the current position in the document.
    #[display("Unexpected character \"{_0}\"")]
    UnexpectedCharacter(#[error(not(source))] char),

    /// An unterminated string literal was found.
    ///
    /// Apart from forgetting the ending `"`, terminating a string within a
    /// Unicode escape sequence or having a line break in a single-quoted
    /// string also causes this error.
    #[display("Unterminated string literal")]
    UnterminatedString,

    /// An invalid source character was found inside a string literal, such as
    /// an ASCII control character.
    #[display("Unknown character \"{_0}\" in string literal")]
    UnknownCharacterInString(#[error(not(source))] char),

    /// An unknown escape sequence in a string literal was found.
    ///
    /// Only a limited set of escape sequences are supported; this is emitted
    /// when e.g. `"\l"` is scanned.
    #[display("Unknown escape sequence \"{_0}\" in string")]
    UnknownEscapeSequence(#[error(not(source))] String),

    /// The input source was unexpectedly terminated.
    ///
    /// Emitted when the current token requires a succeeding character, but
    /// the source has reached EOF, e.g. when scanning `"1."`.
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,

    /// An invalid number literal was found.
    #[display("Invalid number literal")]
    InvalidNumber,
}

pub type LexerResult<'a> = Result<Spanning<Token<'a>>, Spanning<LexerError>>;

impl<'a> Lexer<'a> {
    #[doc(hidden)]
    pub fn new(source: &'a str) -> Self {
        Self {
            iterator: source.char_indices().peekable(),
            source,
            length: source.len(),
            position: SourcePosition::new_origin(),
            last_was_cr: false,
            has_reached_eof: false,
        }
    }

    fn peek_char(&mut self) -> Option<(usize, char)> {
        debug_assert!(self.position.index() <= self.length);
        debug_assert!(!self.has_reached_eof);

        self.iterator.peek().copied()
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        debug_assert!(self.position.index() <= self.length);
        debug_assert!(!self.has_reached_eof);

        let next = self.iterator.next();

        if let Some((_, ch)) = next {
            match ch {
                '\n' if self.last_was_cr => {
                    // `\r\n` counts as the line break already recorded for
                    // the `\r`.
                    self.position.advance_col();
                }
                '\n' | '\r' => self.position.advance_line(),
                _ => self.position.advance_col_by(ch.len_utf8()),
            }
            self.last_was_cr = ch == '\r';
        }

        next
    }

    fn emit_single_char(&mut self, t: Token<'a>) -> Spanning<Token<'a>> {
        let start_pos = self.position;

        self.next_char()
            .expect("internal lexer error: emit_single_char reached EOF");

        Spanning::single_width(start_pos, t)
    }

    fn scan_over_whitespace(&mut self) {
        while let Some((_, ch)) = self.peek_char() {
            if ch == '\t' || ch == ' ' || ch == '\n' || ch == '\r' || ch == ',' || ch == '\u{feff}'
            {
                self.next_char();
            } else if ch == '#' {
                self.next_char();

                while let Some((_, ch)) = self.peek_char() {
                    if ch == '\n' || ch == '\r' {
                        break;
                    }
                    self.next_char();
                }
            } else {
                break;
            }
        }
    }

    fn scan_ellipsis(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;

        for _ in 0..3 {
            let (_, ch) = self.next_char().ok_or_else(|| {
                Spanning::zero_width(self.position, LexerError::UnexpectedEndOfFile)
            })?;
            if ch != '.' {
                return Err(Spanning::zero_width(
                    start_pos,
                    LexerError::UnexpectedCharacter('.'),
                ));
            }
        }

        Ok(Spanning::start_end(
            start_pos,
            self.position,
            Token::Ellipsis,
        ))
    }

    fn scan_name(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, start_ch) = self
            .next_char()
            .ok_or_else(|| Spanning::zero_width(self.position, LexerError::UnexpectedEndOfFile))?;
        debug_assert!(is_name_start(start_ch));

        let mut end_idx = start_idx;

        while let Some((idx, ch)) = self.peek_char() {
            if is_name_cont(ch) {
                self.next_char();
                end_idx = idx;
            } else {
                break;
            }
        }

        Ok(Spanning::start_end(
            start_pos,
            self.position,
            Token::Name(&self.source[start_idx..=end_idx]),
        ))
    }

    fn scan_string(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, start_ch) = self
            .next_char()
            .ok_or_else(|| Spanning::zero_width(self.position, LexerError::UnexpectedEndOfFile))?;
        debug_assert!(start_ch == '"');

        if self.source[start_idx..].starts_with(r#"""""#) {
            // Opening quote of a `"""` block string; consume the remaining
            // two quotes and hand over.
            self.next_char();
            self.next_char();
            return self.scan_block_string(start_pos);
        }

        let mut acc = String::new();

        while let Some((_, ch)) = self.peek_char() {
            if ch == '"' {
                self.next_char();
                return Ok(Spanning::start_end(
                    start_pos,
                    self.position,
                    Token::String(acc),
                ));
            } else if ch == '\\' {
                self.next_char();
                acc.push(self.scan_escape_sequence()?);
            } else if ch == '\n' || ch == '\r' {
                return Err(Spanning::zero_width(
                    self.position,
                    LexerError::UnterminatedString,
                ));
            } else if !is_source_char(ch) {
                return Err(Spanning::zero_width(
                    self.position,
                    LexerError::UnknownCharacterInString(ch),
                ));
            } else {
                self.next_char();
                acc.push(ch);
            }
        }

        Err(Spanning::zero_width(
            self.position,
            LexerError::UnterminatedString,
        ))
    }

    fn scan_escape_sequence(&mut self) -> Result<char, Spanning<LexerError>> {
        match self.peek_char() {
            Some((_, '"')) => {
                self.next_char();
                Ok('"')
            }
            Some((_, '\\')) => {
                self.next_char();
                Ok('\\')
            }
            Some((_, '/')) => {
                self.next_char();
                Ok('/')
            }
            Some((_, 'b')) => {
                self.next_char();
                Ok('\u{0008}')
            }
            Some((_, 'f')) => {
                self.next_char();
                Ok('\u{000c}')
            }
            Some((_, 'n')) => {
                self.next_char();
                Ok('\n')
            }
            Some((_, 'r')) => {
                self.next_char();
                Ok('\r')
            }
            Some((_, 't')) => {
                self.next_char();
                Ok('\t')
            }
            Some((_, 'u')) => {
                let start_pos = self.position;
                self.next_char();
                self.scan_escaped_unicode(start_pos)
            }
            Some((_, ch)) => {
                let mut s = String::from("\\");
                s.push(ch);

                Err(Spanning::zero_width(
                    self.position,
                    LexerError::UnknownEscapeSequence(s),
                ))
            }
            None => Err(Spanning::zero_width(
                self.position,
                LexerError::UnterminatedString,
            )),
        }
    }

    fn scan_escaped_unicode(
        &mut self,
        start_pos: SourcePosition,
    ) -> Result<char, Spanning<LexerError>> {
        let (start_idx, _) = self
            .peek_char()
            .ok_or_else(|| Spanning::zero_width(self.position, LexerError::UnterminatedString))?;
        let mut end_idx = start_idx;
        let mut len = 0;

        for _ in 0..4 {
            let (idx, ch) = self.next_char().ok_or_else(|| {
                Spanning::zero_width(self.position, LexerError::UnterminatedString)
            })?;

            if !ch.is_ascii_hexdigit() {
                break;
            }

            end_idx = idx;
            len += 1;
        }

        let escape = &self.source[start_idx..=end_idx];

        if len != 4 {
            return Err(Spanning::zero_width(
                start_pos,
                LexerError::UnknownEscapeSequence(format!("\\u{escape}")),
            ));
        }

        let code_point = u32::from_str_radix(escape, 16).map_err(|_| {
            Spanning::zero_width(
                start_pos,
                LexerError::UnknownEscapeSequence(format!("\\u{escape}")),
            )
        })?;

        char::from_u32(code_point).ok_or_else(|| {
            Spanning::zero_width(
                start_pos,
                LexerError::UnknownEscapeSequence(format!("\\u{escape}")),
            )
        })
    }

    fn scan_block_string(&mut self, start_pos: SourcePosition) -> LexerResult<'a> {
        let mut raw = String::new();

        loop {
            let Some((idx, ch)) = self.peek_char() else {
                return Err(Spanning::zero_width(
                    self.position,
                    LexerError::UnterminatedString,
                ));
            };

            if ch == '"' && self.source[idx..].starts_with(r#"""""#) {
                self.next_char();
                self.next_char();
                self.next_char();
                return Ok(Spanning::start_end(
                    start_pos,
                    self.position,
                    Token::BlockString(dedent_block_string(&raw)),
                ));
            } else if ch == '\\' && self.source[idx..].starts_with(r#"\""""#) {
                self.next_char();
                self.next_char();
                self.next_char();
                self.next_char();
                raw.push_str(r#"""""#);
            } else if ch == '\t' || ch == '\n' || ch == '\r' || is_source_char(ch) {
                self.next_char();
                raw.push(ch);
            } else {
                return Err(Spanning::zero_width(
                    self.position,
                    LexerError::UnknownCharacterInString(ch),
                ));
            }
        }
    }

    fn scan_number(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, _) = self
            .peek_char()
            .ok_or_else(|| Spanning::zero_width(self.position, LexerError::UnexpectedEndOfFile))?;

        self.scan_integer_part()?;
        let mut is_float = false;

        if let Some((_, '.')) = self.peek_char() {
            self.next_char();
            self.scan_digits()?;
            is_float = true;
        }

        if let Some((_, ch)) = self.peek_char() {
            if ch == 'e' || ch == 'E' {
                self.next_char();

                if let Some((_, ch)) = self.peek_char() {
                    if ch == '-' || ch == '+' {
                        self.next_char();
                    }
                }
                self.scan_digits()?;
                is_float = true;
            }
        }

        let text = &self.source[start_idx..self.position.index()];

        let token = if is_float {
            Token::Float(
                text.parse::<f64>()
                    .map_err(|_| Spanning::zero_width(start_pos, LexerError::InvalidNumber))?,
            )
        } else {
            Token::Int(
                text.parse::<i32>()
                    .map_err(|_| Spanning::zero_width(start_pos, LexerError::InvalidNumber))?,
            )
        };

        Ok(Spanning::start_end(start_pos, self.position, token))
    }

    fn scan_integer_part(&mut self) -> Result<(), Spanning<LexerError>> {
        if let Some((_, '-')) = self.peek_char() {
            self.next_char();
        }

        let (_, ch) = self
            .peek_char()
            .ok_or_else(|| Spanning::zero_width(self.position, LexerError::UnexpectedEndOfFile))?;

        if ch == '0' {
            self.next_char();

            match self.peek_char() {
                Some((_, c)) if c.is_ascii_digit() => Err(Spanning::zero_width(
                    self.position,
                    LexerError::UnexpectedCharacter(c),
                )),
                _ => Ok(()),
            }
        } else {
            self.scan_digits()
        }
    }

    fn scan_digits(&mut self) -> Result<(), Spanning<LexerError>> {
        let (_, ch) = self
            .peek_char()
            .ok_or_else(|| Spanning::zero_width(self.position, LexerError::UnexpectedEndOfFile))?;

        if !ch.is_ascii_digit() {
            return Err(Spanning::zero_width(
                self.position,
                LexerError::UnexpectedCharacter(ch),
            ));
        }

        while let Some((_, ch)) = self.peek_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.next_char();
        }

        Ok(())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexerResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_reached_eof {
            return None;
        }

        self.scan_over_whitespace();

        let ch = self.iterator.peek().map(|&(_, ch)| ch);

        Some(match ch {
            Some('!') => Ok(self.emit_single_char(Token::ExclamationMark)),
            Some('$') => Ok(self.emit_single_char(Token::Dollar)),
            Some('&') => Ok(self.emit_single_char(Token::Amp)),
            Some('(') => Ok(self.emit_single_char(Token::ParenOpen)),
            Some(')') => Ok(self.emit_single_char(Token::ParenClose)),
            Some('[') => Ok(self.emit_single_char(Token::BracketOpen)),
            Some(']') => Ok(self.emit_single_char(Token::BracketClose)),
            Some('{') => Ok(self.emit_single_char(Token::CurlyOpen)),
            Some('}') => Ok(self.emit_single_char(Token::CurlyClose)),
            Some(':') => Ok(self.emit_single_char(Token::Colon)),
            Some('=') => Ok(self.emit_single_char(Token::Equals)),
            Some('@') => Ok(self.emit_single_char(Token::At)),
            Some('|') => Ok(self.emit_single_char(Token::Pipe)),
            Some('.') => self.scan_ellipsis(),
            Some('"') => self.scan_string(),
            Some(ch) => {
                if is_number_start(ch) {
                    self.scan_number()
                } else if is_name_start(ch) {
                    self.scan_name()
                } else {
                    Err(Spanning::zero_width(
                        self.position,
                        LexerError::UnknownCharacter(ch),
                    ))
                }
            }
            None => {
                self.has_reached_eof = true;
                Ok(Spanning::zero_width(self.position, Token::EndOfFile))
            }
        })
    }
}

/// Strips the common indentation and blank surrounding lines from a raw block
/// string body.
fn dedent_block_string(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut common_indent: Option<usize> = None;
    for line in lines.iter().skip(1) {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        if indent < line.len() {
            common_indent = Some(match common_indent {
                Some(ci) => ci.min(indent),
                None => indent,
            });
        }
    }

    let mut out: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                *line
            } else {
                let ci = common_indent.unwrap_or(0);
                if line.len() >= ci { &line[ci..] } else { "" }
            }
        })
        .collect();

    while out
        .first()
        .is_some_and(|l| l.trim_matches([' ', '\t']).is_empty())
    {
        out.remove(0);
    }
    while out
        .last()
        .is_some_and(|l| l.trim_matches([' ', '\t']).is_empty())
    {
        out.pop();
    }

    out.join("\n")
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => write!(f, "{name}"),
            Token::Int(i) => write!(f, "{i}"),
            Token::Float(v) => write!(f, "{v}"),
            Token::String(s) | Token::BlockString(s) => {
                write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Token::ExclamationMark => write!(f, "!"),
            Token::Dollar => write!(f, "$"),
            Token::Amp => write!(f, "&"),
            Token::ParenOpen => write!(f, "("),
            Token::ParenClose => write!(f, ")"),
            Token::BracketOpen => write!(f, "["),
            Token::BracketClose => write!(f, "]"),
            Token::CurlyOpen => write!(f, "{{"),
            Token::CurlyClose => write!(f, "}}"),
            Token::Ellipsis => write!(f, "..."),
            Token::Colon => write!(f, ":"),
            Token::Equals => write!(f, "="),
            Token::At => write!(f, "@"),
            Token::Pipe => write!(f, "|"),
            Token::EndOfFile => write!(f, "End of file"),
        }
    }
}

fn is_source_char(c: char) -> bool {
    c == '\t' || c == '\n' || c == '\r' || c >= ' '
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_cont(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

fn is_number_start(c: char) -> bool {
    c == '-' || c.is_ascii_digit()
}
