//! Corpus model and validator (C5): name-based indices over a parsed AST,
//! plus the structural diagnostics a law/target tree must satisfy before
//! simulation is attempted.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::ast::{Ast, Law, Node, Span, Target};

#[derive(Debug)]
pub enum CorpusError {
  DoubleInsert(String),
}

impl fmt::Display for CorpusError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CorpusError::DoubleInsert(name) => write!(f, "name `{}` already registered", name),
    }
  }
}

impl std::error::Error for CorpusError {}

/// A wrapper around `HashMap<String, T>` that rejects duplicate insertions.
#[derive(Debug, Default)]
pub struct NameMap<T> {
  contents: HashMap<String, T>,
}

impl<T> NameMap<T> {
  pub fn new() -> Self {
    NameMap { contents: HashMap::new() }
  }

  pub fn contains(&self, key: &str) -> bool {
    self.contents.contains_key(key)
  }

  pub fn unique_insert(&mut self, key: &str, val: T) -> Result<(), CorpusError> {
    if self.contains(key) {
      Err(CorpusError::DoubleInsert(key.to_string()))
    } else {
      self.contents.insert(key.to_string(), val);
      Ok(())
    }
  }

  pub fn get(&self, key: &str) -> Option<&T> {
    self.contents.get(key)
  }

  pub fn iter(&self) -> std::collections::hash_map::Iter<String, T> {
    self.contents.iter()
  }

  pub fn len(&self) -> usize {
    self.contents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.contents.is_empty()
  }
}

#[derive(Debug, Clone)]
pub struct LawEntry {
  pub law: Law,
  /// Depth of the law's direct enclosing target chain; `0` for a law
  /// declared at the corpus root, outside any target.
  pub generation: usize,
  pub target_chain: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TargetEntry {
  pub generation: usize,
  pub parent: Option<String>,
}

pub struct Corpus {
  pub roots: Vec<Node>,
  pub laws: Vec<LawEntry>,
  pub by_law_name: NameMap<usize>,
  pub by_target_name: NameMap<TargetEntry>,
}

impl Corpus {
  /// Builds the corpus indices from a parsed AST. Never hard-fails: a
  /// duplicate name is reported as a diagnostic, with the first occurrence
  /// winning in the indices so the remaining pipeline stages can still run.
  pub fn build(ast: Ast) -> (Corpus, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut laws = Vec::new();
    let mut by_law_name = NameMap::new();
    let mut by_target_name = NameMap::new();

    walk(&ast.roots, &[], &mut laws, &mut by_law_name, &mut by_target_name, &mut diagnostics);

    (Corpus { roots: ast.roots, laws, by_law_name, by_target_name }, diagnostics)
  }

  pub fn law(&self, name: &str) -> Option<&Law> {
    let idx = *self.by_law_name.get(name)?;
    Some(&self.laws[idx].law)
  }

  pub fn law_entry(&self, name: &str) -> Option<&LawEntry> {
    let idx = *self.by_law_name.get(name)?;
    Some(&self.laws[idx])
  }

  fn find_target<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Target> {
    for node in nodes {
      match node {
        Node::Target(t) if t.name == name => return Some(t),
        Node::Target(t) => {
          if let Some(found) = Self::find_target(&t.children, name) {
            return Some(found);
          }
        }
        Node::Law(_) => {}
      }
    }
    None
  }

  pub fn target(&self, name: &str) -> Option<&Target> {
    Self::find_target(&self.roots, name)
  }

  /// All laws reachable by descending from the named target, depth-first,
  /// preserving declaration order. Since `laws` is itself built by a
  /// depth-first pre-order walk, filtering by ancestor-chain membership
  /// preserves that order without re-walking the tree.
  pub fn law_entries_for_target(&self, name: &str) -> Vec<&LawEntry> {
    if self.target(name).is_none() {
      return Vec::new();
    }
    self
      .laws
      .iter()
      .filter(|entry| entry.target_chain.iter().any(|t| t == name))
      .collect()
  }

  pub fn laws_for_target(&self, name: &str) -> Vec<&Law> {
    self.law_entries_for_target(name).into_iter().map(|e| &e.law).collect()
  }

  /// Union of laws belonging to targets with `generation <= p` (`p >= 1`);
  /// `p == 0` returns laws declared at the corpus root, outside any target;
  /// `p == -1` means "maximum observed generation" (every law inside any
  /// target, regardless of depth).
  pub fn law_entries_for_population(&self, p: i64) -> Vec<&LawEntry> {
    self
      .laws
      .iter()
      .filter(|entry| match p {
        0 => entry.generation == 0,
        -1 => entry.generation >= 1,
        p if p >= 1 => entry.generation >= 1 && entry.generation as i64 <= p,
        _ => false,
      })
      .collect()
  }

  pub fn laws_for_population(&self, p: i64) -> Vec<&Law> {
    self.law_entries_for_population(p).into_iter().map(|e| &e.law).collect()
  }

  pub fn max_generation(&self) -> usize {
    self.laws.iter().map(|e| e.generation).max().unwrap_or(0)
  }
}

fn walk(
  nodes: &[Node],
  chain: &[String],
  laws: &mut Vec<LawEntry>,
  by_law_name: &mut NameMap<usize>,
  by_target_name: &mut NameMap<TargetEntry>,
  diagnostics: &mut Vec<Diagnostic>,
) {
  for node in nodes {
    match node {
      Node::Law(law) => {
        let idx = laws.len();
        laws.push(LawEntry { law: law.clone(), generation: chain.len(), target_chain: chain.to_vec() });
        if by_law_name.unique_insert(&law.name, idx).is_err() {
          diagnostics.push(Diagnostic::error(
            DiagnosticKind::DuplicateName,
            format!("duplicate law name `{}`", law.name),
            Some(law.span),
          ));
        }
      }
      Node::Target(t) => {
        let entry = TargetEntry { generation: chain.len() + 1, parent: chain.last().cloned() };
        if by_target_name.unique_insert(&t.name, entry).is_err() {
          diagnostics.push(Diagnostic::error(
            DiagnosticKind::DuplicateName,
            format!("duplicate target name `{}`", t.name),
            Some(t.span),
          ));
        }
        let mut next_chain = chain.to_vec();
        next_chain.push(t.name.clone());
        walk(&t.children, &next_chain, laws, by_law_name, by_target_name, diagnostics);
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
  Warning,
  Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
  DuplicateName,
  StructuralError,
  UnresolvedTag,
  DurationMismatch,
  InvalidPeriod,
  InvalidDateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub severity: Severity,
  pub kind: DiagnosticKind,
  pub message: String,
  pub span: Option<Span>,
}

impl Diagnostic {
  pub fn error(kind: DiagnosticKind, message: String, span: Option<Span>) -> Self {
    Diagnostic { severity: Severity::Error, kind, message, span }
  }

  pub fn warning(kind: DiagnosticKind, message: String, span: Option<Span>) -> Self {
    Diagnostic { severity: Severity::Warning, kind, message, span }
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sev = match self.severity {
      Severity::Warning => "warning",
      Severity::Error => "error",
    };
    write!(f, "{}: {}", sev, self.message)
  }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
  pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
  pub fn error_count(&self) -> usize {
    self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
  }

  pub fn warning_count(&self) -> usize {
    self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
  }

  /// Whether the report should be treated as failing. In strict mode,
  /// warnings are promoted to errors.
  pub fn has_errors(&self, strict: bool) -> bool {
    self.error_count() > 0 || (strict && self.warning_count() > 0)
  }
}

pub struct Validator {
  pub strict: bool,
}

impl Validator {
  pub fn new(strict: bool) -> Self {
    Validator { strict }
  }

  pub fn validate(&self, corpus: &Corpus, mut diagnostics: Vec<Diagnostic>) -> ValidationReport {
    for entry in &corpus.laws {
      let law = &entry.law;

      let event_names: std::collections::HashSet<&str> =
        law.events.iter().map(|e| e.name.as_str()).collect();
      for term in &law.group {
        if !event_names.contains(term.event_ref.as_str()) {
          diagnostics.push(Diagnostic::error(
            DiagnosticKind::StructuralError,
            format!(
              "GROUP term references undeclared event `{}` in law `{}`",
              term.event_ref, law.name
            ),
            Some(term.span),
          ));
        }
      }

      for event in &law.events {
        if let Some(tag) = &event.tag {
          let resolved = entry.target_chain.iter().any(|target_name| {
            corpus
              .target(target_name)
              .map(|t| t.dictionary.iter().any(|d| d.local_key == *tag))
              .unwrap_or(false)
          });
          if !resolved {
            diagnostics.push(Diagnostic::error(
              DiagnosticKind::UnresolvedTag,
              format!(
                "event `{}` in law `{}` references unresolved dictionary tag `{}`",
                event.name, law.name, tag
              ),
              Some(event.span),
            ));
          }
        }
      }

      let sum: i64 = law.group.iter().map(|t| t.coherence.minutes() + t.dispersal.minutes()).sum();
      if sum != law.period.minutes() {
        diagnostics.push(Diagnostic::warning(
          DiagnosticKind::DurationMismatch,
          format!(
            "law `{}`: sum of group durations ({}) does not equal period ({})",
            law.name, sum, law.period.minutes()
          ),
          Some(law.span),
        ));
      }

      if law.period.minutes() <= 0 {
        diagnostics.push(Diagnostic::error(
          DiagnosticKind::InvalidPeriod,
          format!("law `{}`: period must be positive, got {}", law.name, law.period),
          Some(law.span),
        ));
      }

      if crate::point::date::Date::parse(&law.start_date, &law.start_time).is_err() {
        diagnostics.push(Diagnostic::error(
          DiagnosticKind::InvalidDateRange,
          format!(
            "law `{}`: start date/time `{} {}` is outside the supported calendar range",
            law.name, law.start_date, law.start_time
          ),
          Some(law.span),
        ));
      }
    }

    ValidationReport { diagnostics }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::{parse, ParserConfig};

  fn build(src: &str) -> (Corpus, ValidationReport) {
    let ast = parse(src, ParserConfig::default()).unwrap();
    let (corpus, diags) = Corpus::build(ast);
    let report = Validator::new(false).validate(&corpus, diags);
    (corpus, report)
  }

  #[test]
  fn flags_structural_error_on_undeclared_event() {
    let (_corpus, report) = build(
      r#"law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"a" GROUP:(B 1.0^0) end_law"#,
    );
    assert!(report.diagnostics.iter().any(|d| d.kind == DiagnosticKind::StructuralError));
    assert!(report.has_errors(false));
  }

  #[test]
  fn duration_mismatch_is_warning_not_error_by_default() {
    let (_corpus, report) =
      build(r#"law L: start_date:2025-01-01 at 00:00 period:5.0 Event: A:"a" GROUP:(A 1.0^0) end_law"#);
    assert!(report.diagnostics.iter().any(|d| d.kind == DiagnosticKind::DurationMismatch));
    assert!(!report.has_errors(false));
    assert!(report.has_errors(true));
  }

  #[test]
  fn population_resolution_matches_worked_example() {
    let src = r#"target T1: key:"t1" dictionnary: target T2: key:"t2" dictionnary: law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law end_target end_target"#;
    let (corpus, _report) = build(src);
    assert_eq!(corpus.laws_for_population(1).len(), 0);
    assert_eq!(corpus.laws_for_population(2).len(), 1);
  }

  #[test]
  fn root_laws_are_population_zero() {
    let (corpus, _report) =
      build(r#"law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"a" GROUP:(A 1.0^0) end_law"#);
    assert_eq!(corpus.laws_for_population(0).len(), 1);
    assert_eq!(corpus.laws_for_population(1).len(), 0);
    assert_eq!(corpus.laws_for_population(-1).len(), 0);
  }

  #[test]
  fn duplicate_law_name_is_diagnosed() {
    let src = r#"law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"a" GROUP:(A 1.0^0) end_law law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"a" GROUP:(A 1.0^0) end_law"#;
    let (_corpus, report) = build(src);
    assert!(report.diagnostics.iter().any(|d| d.kind == DiagnosticKind::DuplicateName));
  }
}
