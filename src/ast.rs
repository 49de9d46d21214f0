//! AST node types (C3 data model). A tagged sum type per node kind, matching
//! the law/target/event/group-term shape of the grammar; one variant per
//! kind rather than a dynamic attribute bag.

use serde::{Deserialize, Serialize};

use crate::point::dotted::Point;

/// Byte-offset-free source location: line/column of the node's leading token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
  pub line: usize,
  pub column: usize,
}

/// `PartialEq`/`Eq` deliberately ignore `span`: the unparser's canonical
/// layout relocates every node, so two ASTs describing the same program
/// compare equal across a parse/unparse/reparse round trip regardless of
/// where their tokens happened to land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDecl {
  pub name: String,
  pub tag: Option<String>,
  pub description: String,
  pub span: Span,
}

impl PartialEq for EventDecl {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name && self.tag == other.tag && self.description == other.description
  }
}

impl Eq for EventDecl {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTerm {
  pub event_ref: String,
  #[serde(with = "point_as_i64")]
  pub coherence: Point,
  #[serde(with = "point_as_i64")]
  pub dispersal: Point,
  pub span: Span,
}

impl PartialEq for GroupTerm {
  fn eq(&self, other: &Self) -> bool {
    self.event_ref == other.event_ref
      && self.coherence == other.coherence
      && self.dispersal == other.dispersal
  }
}

impl Eq for GroupTerm {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictEntry {
  pub local_key: String,
  pub parent_ref: Option<String>,
  pub description: String,
  pub span: Span,
}

impl PartialEq for DictEntry {
  fn eq(&self, other: &Self) -> bool {
    self.local_key == other.local_key
      && self.parent_ref == other.parent_ref
      && self.description == other.description
  }
}

impl Eq for DictEntry {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Law {
  pub name: String,
  pub start_date: String,
  pub start_time: String,
  #[serde(with = "point_as_i64")]
  pub period: Point,
  pub events: Vec<EventDecl>,
  pub group: Vec<GroupTerm>,
  pub span: Span,
}

impl PartialEq for Law {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
      && self.start_date == other.start_date
      && self.start_time == other.start_time
      && self.period == other.period
      && self.events == other.events
      && self.group == other.group
  }
}

impl Eq for Law {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
  pub name: String,
  pub key: String,
  pub dictionary: Vec<DictEntry>,
  pub children: Vec<Node>,
  pub span: Span,
}

impl PartialEq for Target {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
      && self.key == other.key
      && self.dictionary == other.dictionary
      && self.children == other.children
  }
}

impl Eq for Target {}

/// A top-level or nested declaration: either a `Law` or a `Target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
  #[serde(rename = "law")]
  Law(Law),
  #[serde(rename = "target")]
  Target(Target),
}

impl Node {
  pub fn name(&self) -> &str {
    match self {
      Node::Law(l) => &l.name,
      Node::Target(t) => &t.name,
    }
  }

  pub fn span(&self) -> Span {
    match self {
      Node::Law(l) => l.span,
      Node::Target(t) => t.span,
    }
  }
}

/// A parsed corpus: the ordered top-level declarations. Indices over this
/// tree (by-name lookup, generation, parent chains) are built separately by
/// `corpus::Corpus` rather than stored on the AST itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ast {
  pub roots: Vec<Node>,
}

mod point_as_i64 {
  use crate::point::dotted::Point;
  use serde::{Deserialize, Deserializer, Serialize, Serializer};

  pub fn serialize<S: Serializer>(p: &Point, s: S) -> Result<S::Ok, S::Error> {
    p.minutes().serialize(s)
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
    Ok(Point(i64::deserialize(d)?))
  }
}
