//! Single-pass tokenizer (C2).

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

pub const KEYWORDS: &[&str] = &[
  "law",
  "target",
  "end_law",
  "end_target",
  "Event",
  "GROUP",
  "start_date",
  "period",
  "key",
  "dictionnary",
  "at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Identifier,
  String,
  Date,
  Time,
  Number,
  DottedNumber,
  Keyword,
  Punct,
  Eof,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      TokenKind::Identifier => "identifier",
      TokenKind::String => "string",
      TokenKind::Date => "date",
      TokenKind::Time => "time",
      TokenKind::Number => "number",
      TokenKind::DottedNumber => "dotted_number",
      TokenKind::Keyword => "keyword",
      TokenKind::Punct => "punctuation",
      TokenKind::Eof => "eof",
    };
    write!(f, "{}", s)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub lexeme: String,
  pub line: usize,
  pub column: usize,
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} `{}` ({}:{})", self.kind, self.lexeme, self.line, self.column)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
  UnterminatedString { line: usize, column: usize },
  UnexpectedChar { c: char, line: usize, column: usize },
}

impl fmt::Display for LexError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LexError::UnterminatedString { line, column } => {
        write!(f, "unterminated string at {}:{}", line, column)
      }
      LexError::UnexpectedChar { c, line, column } => {
        write!(f, "unexpected character `{}` at {}:{}", c, line, column)
      }
    }
  }
}

impl std::error::Error for LexError {}

pub struct Lexer<'a> {
  stream: Peekable<Chars<'a>>,
  line: usize,
  column: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(content: &'a str) -> Self {
    Lexer { stream: content.chars().peekable(), line: 1, column: 1 }
  }

  fn current(&mut self) -> Option<char> {
    self.stream.peek().copied()
  }

  fn advance(&mut self) -> Option<char> {
    let c = self.stream.next()?;
    if c == '\n' {
      self.line += 1;
      self.column = 1;
    } else {
      self.column += 1;
    }
    Some(c)
  }

  fn skip_while<F: Fn(char) -> bool>(&mut self, pred: F) {
    while let Some(c) = self.current() {
      if pred(c) {
        self.advance();
      } else {
        break;
      }
    }
  }

  fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
    let mut out = String::new();
    while let Some(c) = self.current() {
      if pred(c) {
        out.push(c);
        self.advance();
      } else {
        break;
      }
    }
    out
  }

  fn skip_trivia(&mut self) {
    loop {
      self.skip_while(|c| c.is_whitespace());
      if self.current() == Some('#') {
        self.skip_while(|c| c != '\n');
      } else {
        break;
      }
    }
  }

  fn try_date_lexeme(&mut self) -> Option<String> {
    let mut probe = self.stream.clone();
    let y = scan_digits(&mut probe, 4)?;
    if probe.next() != Some('-') {
      return None;
    }
    let m = scan_digits(&mut probe, 2)?;
    if probe.next() != Some('-') {
      return None;
    }
    let d = scan_digits(&mut probe, 2)?;
    if matches!(probe.peek(), Some(c) if c.is_ascii_digit()) {
      return None;
    }
    let lexeme = format!("{}-{}-{}", y, m, d);
    self.commit(probe, lexeme.len());
    Some(lexeme)
  }

  fn try_time_lexeme(&mut self) -> Option<String> {
    let mut probe = self.stream.clone();
    let h = scan_digits(&mut probe, 2)?;
    if probe.next() != Some(':') {
      return None;
    }
    let min = scan_digits(&mut probe, 2)?;

    let mut with_seconds = probe.clone();
    if with_seconds.next() == Some(':') {
      if let Some(sec) = scan_digits(&mut with_seconds, 2) {
        if !matches!(with_seconds.peek(), Some(c) if c.is_ascii_digit()) {
          let lexeme = format!("{}:{}:{}", h, min, sec);
          self.commit(with_seconds, lexeme.len());
          return Some(lexeme);
        }
      }
    }

    if matches!(probe.peek(), Some(c) if c.is_ascii_digit()) {
      return None;
    }
    let lexeme = format!("{}:{}", h, min);
    self.commit(probe, lexeme.len());
    Some(lexeme)
  }

  /// Replays `len` chars of advance-tracking (line/column) against the real
  /// stream, then swaps in the already-advanced probe.
  fn commit(&mut self, probe: Peekable<Chars<'a>>, len: usize) {
    for _ in 0..len {
      self.advance();
    }
    self.stream = probe;
  }

  pub fn next_token(&mut self) -> Result<Token, LexError> {
    self.skip_trivia();
    let (line, column) = (self.line, self.column);

    let c = match self.current() {
      Some(c) => c,
      None => {
        return Ok(Token { kind: TokenKind::Eof, lexeme: String::new(), line, column });
      }
    };

    if c.is_ascii_digit() {
      if let Some(lexeme) = self.try_date_lexeme() {
        return Ok(Token { kind: TokenKind::Date, lexeme, line, column });
      }
      if let Some(lexeme) = self.try_time_lexeme() {
        return Ok(Token { kind: TokenKind::Time, lexeme, line, column });
      }
      let lexeme = self.take_while(|c| c.is_ascii_digit() || c == '.');
      let kind = if lexeme.contains('.') { TokenKind::DottedNumber } else { TokenKind::Number };
      return Ok(Token { kind, lexeme, line, column });
    }

    if c == '"' {
      self.advance();
      let mut out = String::new();
      loop {
        match self.current() {
          None => return Err(LexError::UnterminatedString { line, column }),
          Some('"') => {
            self.advance();
            break;
          }
          Some('\\') => {
            self.advance();
            match self.current() {
              Some('"') => {
                out.push('"');
                self.advance();
              }
              Some(other) => {
                out.push('\\');
                out.push(other);
                self.advance();
              }
              None => return Err(LexError::UnterminatedString { line, column }),
            }
          }
          Some(other) => {
            out.push(other);
            self.advance();
          }
        }
      }
      return Ok(Token { kind: TokenKind::String, lexeme: out, line, column });
    }

    if c.is_alphabetic() || c == '_' {
      let lexeme = self.take_while(|c| c.is_alphanumeric() || c == '_');
      let kind = if KEYWORDS.contains(&lexeme.as_str()) { TokenKind::Keyword } else { TokenKind::Identifier };
      return Ok(Token { kind, lexeme, line, column });
    }

    if matches!(c, ':' | '^' | '-' | '(' | ')' | '[' | ']') {
      self.advance();
      return Ok(Token { kind: TokenKind::Punct, lexeme: c.to_string(), line, column });
    }

    Err(LexError::UnexpectedChar { c, line, column })
  }

  pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
    let mut out = Vec::new();
    loop {
      let tok = self.next_token()?;
      let is_eof = tok.kind == TokenKind::Eof;
      out.push(tok);
      if is_eof {
        break;
      }
    }
    Ok(out)
  }
}

fn scan_digits(it: &mut Peekable<Chars>, n: usize) -> Option<String> {
  let mut s = String::new();
  for _ in 0..n {
    match it.peek() {
      Some(c) if c.is_ascii_digit() => {
        s.push(*c);
        it.next();
      }
      _ => return None,
    }
  }
  Some(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
  }

  #[test]
  fn recognizes_date_and_time() {
    let toks = Lexer::new("2025-01-01 00:00:30").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Date);
    assert_eq!(toks[0].lexeme, "2025-01-01");
    assert_eq!(toks[1].kind, TokenKind::Time);
    assert_eq!(toks[1].lexeme, "00:00:30");
  }

  #[test]
  fn distinguishes_number_and_dotted_number() {
    let toks = Lexer::new("30 0.1.30").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Number);
    assert_eq!(toks[1].kind, TokenKind::DottedNumber);
    assert_eq!(toks[1].lexeme, "0.1.30");
  }

  #[test]
  fn recognizes_keywords_case_sensitively() {
    let toks = Lexer::new("law Event GROUP target").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Keyword);
    assert_eq!(toks[1].kind, TokenKind::Keyword);
    assert_eq!(toks[2].kind, TokenKind::Keyword);
    assert_eq!(toks[3].kind, TokenKind::Keyword);
  }

  #[test]
  fn strings_and_punctuation() {
    let toks = Lexer::new(r#"A:"x" GROUP:(A 1.0^0)"#).tokenize().unwrap();
    assert_eq!(kinds(r#""hi""#), vec![TokenKind::String, TokenKind::Eof]);
    assert!(toks.iter().any(|t| t.kind == TokenKind::Punct && t.lexeme == "^"));
    assert!(toks.iter().any(|t| t.kind == TokenKind::Punct && t.lexeme == "("));
  }

  #[test]
  fn skips_comments_and_whitespace() {
    let toks = Lexer::new("# a comment\n  law").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Keyword);
    assert_eq!(toks[0].lexeme, "law");
  }

  #[test]
  fn unterminated_string_errors() {
    assert!(matches!(
      Lexer::new("\"abc").tokenize(),
      Err(LexError::UnterminatedString { .. })
    ));
  }

  #[test]
  fn unexpected_char_errors() {
    assert!(matches!(
      Lexer::new("@").tokenize(),
      Err(LexError::UnexpectedChar { c: '@', .. })
    ));
  }

  #[test]
  fn negative_point_is_dash_then_number() {
    let toks = Lexer::new("-1.30").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Punct);
    assert_eq!(toks[0].lexeme, "-");
    assert_eq!(toks[1].kind, TokenKind::DottedNumber);
    assert_eq!(toks[1].lexeme, "1.30");
  }
}
