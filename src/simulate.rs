//! Law simulator (C6): turns a law's declared `GROUP` sequence into concrete,
//! timestamped events. Pure function of the law's AST and its enclosing
//! target chain; no I/O, no clock access.

use crate::ast::Law;
use crate::point::date::{Date, DateError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedEvent {
  pub event_name: String,
  pub tag: Option<String>,
  pub description: String,
  pub start: Date,
  pub end: Date,
  pub duration_minutes: i64,
  pub coherence_minutes: i64,
  pub dispersal_minutes: i64,
  pub law_name: String,
  pub target_chain: Vec<String>,
}

/// Simulates a single law, advancing a cursor through its `GROUP` terms in
/// declared order. Returns an error if the law's own `start_date`/`start_time`
/// do not parse to a valid calendar instant (a condition the validator
/// reports separately as `InvalidDateRange`, but the simulator must still
/// fail safely if invoked directly on an unvalidated law).
pub fn simulate_law(law: &Law, target_chain: &[String]) -> Result<Vec<SimulatedEvent>, DateError> {
  let start = Date::parse(&law.start_date, &law.start_time)?;
  let mut cursor = start.to_min_instant();
  let mut out = Vec::with_capacity(law.group.len());

  for term in &law.group {
    let event_decl = law.events.iter().find(|e| e.name == term.event_ref);
    let (description, tag) = match event_decl {
      Some(e) => (e.description.clone(), e.tag.clone()),
      None => (String::new(), None),
    };

    let coherence = term.coherence.minutes();
    let dispersal = term.dispersal.minutes();
    let duration = coherence + dispersal;

    let event_start = Date::from_min_instant(cursor)?;
    let event_end = Date::from_min_instant(cursor.add_minutes(duration))?;

    out.push(SimulatedEvent {
      event_name: term.event_ref.clone(),
      tag,
      description,
      start: event_start,
      end: event_end,
      duration_minutes: duration,
      coherence_minutes: coherence,
      dispersal_minutes: dispersal,
      law_name: law.name.clone(),
      target_chain: target_chain.to_vec(),
    });

    cursor = cursor.add_minutes(duration);
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::{parse, ParserConfig};
  use crate::ast::Node;

  fn law_from(src: &str) -> Law {
    let ast = parse(src, ParserConfig::default()).unwrap();
    match ast.roots.into_iter().next().unwrap() {
      Node::Law(l) => l,
      _ => panic!("expected law"),
    }
  }

  #[test]
  fn single_event_matches_worked_example() {
    let law = law_from(
      r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law"#,
    );
    let events = simulate_law(&law, &[]).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(format!("{}", events[0].start), "2025-01-01T00:00");
    assert_eq!(format!("{}", events[0].end), "2025-01-01T01:00");
    assert_eq!(events[0].duration_minutes, 60);
    assert_eq!(events[0].coherence_minutes, 60);
    assert_eq!(events[0].dispersal_minutes, 0);
  }

  #[test]
  fn two_term_sequence_matches_worked_example() {
    let law = law_from(
      r#"law L: start_date:2025-12-25 at 15:45 period:1.30 Event: A:"a" B:"b" GROUP:(A 30^0 - B 45^15) end_law"#,
    );
    let events = simulate_law(&law, &[]).unwrap();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].event_name, "A");
    assert_eq!(format!("{}", events[0].start), "2025-12-25T15:45");
    assert_eq!(format!("{}", events[0].end), "2025-12-25T16:15");
    assert_eq!(events[0].duration_minutes, 30);

    assert_eq!(events[1].event_name, "B");
    assert_eq!(format!("{}", events[1].start), "2025-12-25T16:15");
    assert_eq!(format!("{}", events[1].end), "2025-12-25T17:15");
    assert_eq!(events[1].duration_minutes, 60);
    assert_eq!(events[1].coherence_minutes, 45);
    assert_eq!(events[1].dispersal_minutes, 15);
  }

  #[test]
  fn target_chain_is_carried_through() {
    let law = law_from(
      r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law"#,
    );
    let chain = vec!["T1".to_string(), "T2".to_string()];
    let events = simulate_law(&law, &chain).unwrap();
    assert_eq!(events[0].target_chain, chain);
  }
}
