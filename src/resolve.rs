//! Target resolver (C7): turns a named target or a population threshold into
//! a concrete, ordered list of simulated events, aggregated across laws.

use crate::corpus::{Corpus, LawEntry};
use crate::point::date::DateError;
use crate::simulate::{simulate_law, SimulatedEvent};

fn simulate_entries(entries: &[&LawEntry]) -> Result<Vec<SimulatedEvent>, DateError> {
  let mut out = Vec::new();
  for entry in entries {
    out.extend(simulate_law(&entry.law, &entry.target_chain)?);
  }
  Ok(out)
}

/// Simulates a single named law in isolation. Returns an empty list if no
/// such law exists (the CLI surfaces that as an unknown-context error).
pub fn simulate_law_by_name(corpus: &Corpus, name: &str) -> Result<Vec<SimulatedEvent>, DateError> {
  match corpus.law_entry(name) {
    Some(entry) => simulate_law(&entry.law, &entry.target_chain),
    None => Ok(Vec::new()),
  }
}

/// Simulates every law reachable by descending from the named target,
/// concatenating per-law simulations in declaration order. No re-sorting by
/// start time: the analyst observes the planned sequence, not a merged
/// timeline.
pub fn simulate_target(corpus: &Corpus, name: &str) -> Result<Vec<SimulatedEvent>, DateError> {
  let entries = corpus.law_entries_for_target(name);
  simulate_entries(&entries)
}

/// Simulates the union of laws belonging to a population threshold (see
/// `Corpus::laws_for_population` for the `p` convention), concatenated in
/// declaration order.
pub fn simulate_population(corpus: &Corpus, p: i64) -> Result<Vec<SimulatedEvent>, DateError> {
  let entries = corpus.law_entries_for_population(p);
  simulate_entries(&entries)
}
