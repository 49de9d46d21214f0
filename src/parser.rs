//! Recursive-descent parser (C3), built over an arbitrary-depth peek buffer
//! in the same shape as the reference crate's ICS parser.

use std::collections::VecDeque;
use std::fmt;

use crate::ast::{Ast, DictEntry, EventDecl, GroupTerm, Law, Node, Span, Target};
use crate::lexer::{LexError, Lexer, Token, TokenKind};
use crate::point::dotted::{point_to_minutes, Point};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  Lex(LexError),
  UnexpectedToken { expected: String, found: Token },
  BadPoint { lexeme: String, reason: String },
  ResourceLimit(String),
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParseError::Lex(e) => write!(f, "{}", e),
      ParseError::UnexpectedToken { expected, found } => {
        write!(f, "expected {}, found {}", expected, found)
      }
      ParseError::BadPoint { lexeme, reason } => write!(f, "bad point `{}`: {}", lexeme, reason),
      ParseError::ResourceLimit(msg) => write!(f, "resource limit exceeded: {}", msg),
    }
  }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
  fn from(e: LexError) -> Self {
    ParseError::Lex(e)
  }
}

/// Resource limits enforced while descending, per the concurrency & resource
/// model: a configurable maximum AST depth and maximum token count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
  pub max_depth: usize,
  pub max_tokens: usize,
}

impl Default for ParserConfig {
  fn default() -> Self {
    ParserConfig {
      max_depth: crate::const_params::MAX_AST_DEPTH,
      max_tokens: crate::const_params::MAX_TOKEN_COUNT,
    }
  }
}

struct TokenStream<'a> {
  buf: VecDeque<Token>,
  lex: Lexer<'a>,
  consumed: usize,
  max_tokens: usize,
}

impl<'a> TokenStream<'a> {
  fn new(lex: Lexer<'a>, max_tokens: usize) -> Self {
    TokenStream { buf: VecDeque::new(), lex, consumed: 0, max_tokens }
  }

  fn fill(&mut self, n: usize) -> Result<(), ParseError> {
    while self.buf.len() <= n {
      if self.consumed >= self.max_tokens {
        return Err(ParseError::ResourceLimit(format!("more than {} tokens", self.max_tokens)));
      }
      let tok = self.lex.next_token()?;
      self.consumed += 1;
      self.buf.push_back(tok);
    }
    Ok(())
  }

  fn peek(&mut self, n: usize) -> Result<&Token, ParseError> {
    self.fill(n)?;
    Ok(self.buf.get(n).expect("filled above"))
  }

  fn next(&mut self) -> Result<Token, ParseError> {
    self.fill(0)?;
    Ok(self.buf.pop_front().expect("filled above"))
  }
}

pub struct Parser<'a> {
  ts: TokenStream<'a>,
  config: ParserConfig,
}

impl<'a> Parser<'a> {
  pub fn new(source: &'a str, config: ParserConfig) -> Self {
    Parser { ts: TokenStream::new(Lexer::new(source), config.max_tokens), config }
  }

  fn span_of(tok: &Token) -> Span {
    Span { line: tok.line, column: tok.column }
  }

  fn expect_kind(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
    let tok = self.ts.next()?;
    if tok.kind == kind {
      Ok(tok)
    } else {
      Err(ParseError::UnexpectedToken { expected: kind.to_string(), found: tok })
    }
  }

  fn expect_keyword(&mut self, kw: &str) -> Result<Token, ParseError> {
    let tok = self.ts.next()?;
    if tok.kind == TokenKind::Keyword && tok.lexeme == kw {
      Ok(tok)
    } else {
      Err(ParseError::UnexpectedToken { expected: format!("keyword `{}`", kw), found: tok })
    }
  }

  fn expect_punct(&mut self, c: char) -> Result<Token, ParseError> {
    let tok = self.ts.next()?;
    if tok.kind == TokenKind::Punct && tok.lexeme == c.to_string() {
      Ok(tok)
    } else {
      Err(ParseError::UnexpectedToken { expected: format!("`{}`", c), found: tok })
    }
  }

  fn peek_is_keyword(&mut self, kw: &str) -> Result<bool, ParseError> {
    let tok = self.ts.peek(0)?;
    Ok(tok.kind == TokenKind::Keyword && tok.lexeme == kw)
  }

  fn peek_is_punct(&mut self, c: char) -> Result<bool, ParseError> {
    let tok = self.ts.peek(0)?;
    Ok(tok.kind == TokenKind::Punct && tok.lexeme == c.to_string())
  }

  fn peek_is_identifier(&mut self) -> Result<bool, ParseError> {
    Ok(self.ts.peek(0)?.kind == TokenKind::Identifier)
  }

  fn parse_point(&mut self) -> Result<Point, ParseError> {
    let negative = self.peek_is_punct('-')?;
    if negative {
      self.ts.next()?;
    }
    let tok = self.ts.next()?;
    if tok.kind != TokenKind::Number && tok.kind != TokenKind::DottedNumber {
      return Err(ParseError::UnexpectedToken { expected: "point".to_string(), found: tok });
    }
    let lexeme = if negative { format!("-{}", tok.lexeme) } else { tok.lexeme.clone() };
    let minutes = point_to_minutes(&lexeme)
      .map_err(|e| ParseError::BadPoint { lexeme, reason: e.to_string() })?;
    Ok(Point(minutes))
  }

  fn parse_optional_tag(&mut self) -> Result<Option<String>, ParseError> {
    if self.peek_is_punct('[')? {
      self.ts.next()?;
      let tag = self.expect_kind(TokenKind::Identifier)?;
      self.expect_punct(']')?;
      Ok(Some(tag.lexeme))
    } else {
      Ok(None)
    }
  }

  fn parse_event_decl(&mut self) -> Result<EventDecl, ParseError> {
    let name_tok = self.expect_kind(TokenKind::Identifier)?;
    let span = Self::span_of(&name_tok);
    let tag = self.parse_optional_tag()?;
    self.expect_punct(':')?;
    let desc = self.expect_kind(TokenKind::String)?;
    Ok(EventDecl { name: name_tok.lexeme, tag, description: desc.lexeme, span })
  }

  fn parse_dict_entry(&mut self) -> Result<DictEntry, ParseError> {
    let key_tok = self.expect_kind(TokenKind::Identifier)?;
    let span = Self::span_of(&key_tok);
    let parent_ref = self.parse_optional_tag()?;
    self.expect_punct(':')?;
    let desc = self.expect_kind(TokenKind::String)?;
    Ok(DictEntry { local_key: key_tok.lexeme, parent_ref, description: desc.lexeme, span })
  }

  fn parse_group_term(&mut self) -> Result<GroupTerm, ParseError> {
    let ident = self.expect_kind(TokenKind::Identifier)?;
    let span = Self::span_of(&ident);
    let coherence = self.parse_point()?;
    self.expect_punct('^')?;
    let dispersal = self.parse_point()?;
    Ok(GroupTerm { event_ref: ident.lexeme, coherence, dispersal, span })
  }

  fn parse_law(&mut self, depth: usize) -> Result<Node, ParseError> {
    if depth > self.config.max_depth {
      return Err(ParseError::ResourceLimit(format!("AST depth exceeds {}", self.config.max_depth)));
    }
    let law_tok = self.expect_keyword("law")?;
    let span = Self::span_of(&law_tok);
    let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
    self.expect_punct(':')?;

    self.expect_keyword("start_date")?;
    self.expect_punct(':')?;
    let start_date = self.expect_kind(TokenKind::Date)?.lexeme;
    self.expect_keyword("at")?;
    let start_time = self.expect_kind(TokenKind::Time)?.lexeme;

    self.expect_keyword("period")?;
    self.expect_punct(':')?;
    let period = self.parse_point()?;

    self.expect_keyword("Event")?;
    self.expect_punct(':')?;
    let mut events = Vec::new();
    while self.peek_is_identifier()? {
      events.push(self.parse_event_decl()?);
    }

    self.expect_keyword("GROUP")?;
    self.expect_punct(':')?;
    self.expect_punct('(')?;
    let mut group = vec![self.parse_group_term()?];
    while self.peek_is_punct('-')? {
      self.ts.next()?;
      group.push(self.parse_group_term()?);
    }
    self.expect_punct(')')?;

    self.expect_keyword("end_law")?;

    Ok(Node::Law(Law { name, start_date, start_time, period, events, group, span }))
  }

  fn parse_target(&mut self, depth: usize) -> Result<Node, ParseError> {
    if depth > self.config.max_depth {
      return Err(ParseError::ResourceLimit(format!("AST depth exceeds {}", self.config.max_depth)));
    }
    let target_tok = self.expect_keyword("target")?;
    let span = Self::span_of(&target_tok);
    let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
    self.expect_punct(':')?;

    self.expect_keyword("key")?;
    self.expect_punct(':')?;
    let key = self.expect_kind(TokenKind::String)?.lexeme;

    self.expect_keyword("dictionnary")?;
    self.expect_punct(':')?;
    let mut dictionary = Vec::new();
    while self.peek_is_identifier()? {
      dictionary.push(self.parse_dict_entry()?);
    }

    let mut children = Vec::new();
    loop {
      if self.peek_is_keyword("law")? {
        children.push(self.parse_law(depth + 1)?);
      } else if self.peek_is_keyword("target")? {
        children.push(self.parse_target(depth + 1)?);
      } else {
        break;
      }
    }

    self.expect_keyword("end_target")?;

    Ok(Node::Target(Target { name, key, dictionary, children, span }))
  }

  pub fn parse_corpus(&mut self) -> Result<Ast, ParseError> {
    let mut roots = Vec::new();
    loop {
      let tok = self.ts.peek(0)?;
      match (tok.kind, tok.lexeme.as_str()) {
        (TokenKind::Keyword, "law") => roots.push(self.parse_law(1)?),
        (TokenKind::Keyword, "target") => roots.push(self.parse_target(1)?),
        (TokenKind::Eof, _) => break,
        _ => {
          let tok = self.ts.next()?;
          return Err(ParseError::UnexpectedToken {
            expected: "`law` or `target`".to_string(),
            found: tok,
          });
        }
      }
    }
    Ok(Ast { roots })
  }
}

pub fn parse(source: &str, config: ParserConfig) -> Result<Ast, ParseError> {
  Parser::new(source, config).parse_corpus()
}
