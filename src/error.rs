//! Top-level error aggregation. Every component owns its own small error
//! enum; `ZenithError` threads them into one type the CLI can match on once,
//! mirroring the reference crate's `TaggyCmdError: From<TimeError>` pattern.

use crate::corpus::CorpusError;
use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::point::date::DateError;
use crate::point::dotted::PointError;

#[derive(Debug)]
pub enum ZenithError {
  Io(std::io::Error),
  Lex(LexError),
  Parse(ParseError),
  Date(DateError),
  Point(PointError),
  Corpus(CorpusError),
  /// Parse/validate succeeded but no such law/target exists for the
  /// requested context.
  UnknownContext(String),
}

impl std::fmt::Display for ZenithError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ZenithError::Io(e) => write!(f, "I/O error: {e}"),
      ZenithError::Lex(e) => write!(f, "lexical error: {e}"),
      ZenithError::Parse(e) => write!(f, "syntax error: {e}"),
      ZenithError::Date(e) => write!(f, "calendar error: {e}"),
      ZenithError::Point(e) => write!(f, "point error: {e}"),
      ZenithError::Corpus(e) => write!(f, "corpus error: {e}"),
      ZenithError::UnknownContext(s) => write!(f, "no such law or target: `{s}`"),
    }
  }
}

impl std::error::Error for ZenithError {}

impl From<std::io::Error> for ZenithError {
  fn from(value: std::io::Error) -> Self {
    ZenithError::Io(value)
  }
}

impl From<LexError> for ZenithError {
  fn from(value: LexError) -> Self {
    ZenithError::Lex(value)
  }
}

impl From<ParseError> for ZenithError {
  fn from(value: ParseError) -> Self {
    ZenithError::Parse(value)
  }
}

impl From<DateError> for ZenithError {
  fn from(value: DateError) -> Self {
    ZenithError::Date(value)
  }
}

impl From<PointError> for ZenithError {
  fn from(value: PointError) -> Self {
    ZenithError::Point(value)
  }
}

impl From<CorpusError> for ZenithError {
  fn from(value: CorpusError) -> Self {
    ZenithError::Corpus(value)
  }
}

impl ZenithError {
  /// Exit codes per the CLI's error-handling contract: `0` success, `1` I/O
  /// or argument error, `2` parse error, `3` validation error, `4` runtime
  /// analysis error.
  pub fn exit_code(&self) -> i32 {
    match self {
      ZenithError::Io(_) => 1,
      ZenithError::Lex(_) | ZenithError::Parse(_) => 2,
      ZenithError::Corpus(_) => 3,
      ZenithError::Date(_) | ZenithError::Point(_) | ZenithError::UnknownContext(_) => 4,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exit_codes_match_contract() {
    assert_eq!(ZenithError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")).exit_code(), 1);
    assert_eq!(ZenithError::Lex(LexError::UnexpectedChar { c: '?', line: 1, column: 1 }).exit_code(), 2);
    assert_eq!(ZenithError::UnknownContext("T".into()).exit_code(), 4);
  }
}
