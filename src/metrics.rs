//! Metrics engine (C8): temporal statistics, rhythm, density, event
//! frequency, and sequence complexity over a simulated event sequence.
//! All outputs are real-valued and defined to be `0` on empty input unless
//! noted; divisions by zero yield `0` throughout.

use std::collections::HashMap;

use serde::Serialize;

use crate::simulate::SimulatedEvent;

/// Count/duration statistics over a simulated sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
  pub count: usize,
  pub total_duration: i64,
  pub mean: f64,
  pub median: f64,
  /// Population standard deviation (divide by `n`, not `n - 1`).
  pub std: f64,
  pub min: i64,
  pub max: i64,
  pub coherence_total: i64,
  pub dispersal_total: i64,
  pub coherence_ratio: f64,
}

/// Gap statistics between consecutive event starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhythmStats {
  pub mean_gap: f64,
  pub std_gap: f64,
  /// `1 / (1 + std_gap / mean_gap)`, on `[0, 1]`.
  pub regularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityStats {
  pub span_minutes: i64,
  pub events_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityScore {
  pub transition_variety: f64,
  pub unique_ratio: f64,
  pub entropy_normalized: f64,
  /// `0.4 * transition_variety + 0.3 * unique_ratio + 0.3 * entropy_normalized`,
  /// scaled to `[0, 100]`.
  pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
  pub temporal: TemporalStats,
  pub rhythm: RhythmStats,
  pub density: DensityStats,
  pub event_frequency: HashMap<String, usize>,
  pub complexity: ComplexityScore,
  pub entropy: f64,
}

fn mean_of(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

fn population_std(xs: &[f64], mean: f64) -> f64 {
  if xs.is_empty() {
    return 0.0;
  }
  let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64;
  variance.sqrt()
}

fn median_of(xs: &[i64]) -> f64 {
  if xs.is_empty() {
    return 0.0;
  }
  let mut sorted = xs.to_vec();
  sorted.sort_unstable();
  let n = sorted.len();
  if n % 2 == 1 {
    sorted[n / 2] as f64
  } else {
    (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
  }
}

/// Base-2 Shannon entropy of the event-name distribution. `0` on empty input.
pub fn shannon_entropy(events: &[SimulatedEvent]) -> f64 {
  if events.is_empty() {
    return 0.0;
  }
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for e in events {
    *counts.entry(e.event_name.as_str()).or_insert(0) += 1;
  }
  let n = events.len() as f64;
  -counts
    .values()
    .map(|&c| {
      let p = c as f64 / n;
      p * p.log2()
    })
    .sum::<f64>()
}

fn temporal_stats(events: &[SimulatedEvent]) -> TemporalStats {
  let durations: Vec<i64> = events.iter().map(|e| e.duration_minutes).collect();
  let durations_f: Vec<f64> = durations.iter().map(|&d| d as f64).collect();

  let count = events.len();
  let total_duration: i64 = durations.iter().sum();
  let mean = mean_of(&durations_f);
  let median = median_of(&durations);
  let std = population_std(&durations_f, mean);
  let min = durations.iter().copied().min().unwrap_or(0);
  let max = durations.iter().copied().max().unwrap_or(0);
  let coherence_total: i64 = events.iter().map(|e| e.coherence_minutes).sum();
  let dispersal_total: i64 = events.iter().map(|e| e.dispersal_minutes).sum();
  let coherence_ratio = if total_duration == 0 { 0.0 } else { coherence_total as f64 / total_duration as f64 };

  TemporalStats { count, total_duration, mean, median, std, min, max, coherence_total, dispersal_total, coherence_ratio }
}

fn rhythm_stats(events: &[SimulatedEvent]) -> RhythmStats {
  if events.len() < 2 {
    return RhythmStats { mean_gap: 0.0, std_gap: 0.0, regularity: 0.0 };
  }
  let starts: Vec<i64> = events.iter().map(|e| e.start.to_min_instant().raw()).collect();
  let gaps: Vec<f64> = starts.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
  let mean_gap = mean_of(&gaps);
  let std_gap = population_std(&gaps, mean_gap);
  let regularity = if mean_gap == 0.0 { 0.0 } else { 1.0 / (1.0 + std_gap / mean_gap) };
  RhythmStats { mean_gap, std_gap, regularity }
}

fn density_stats(events: &[SimulatedEvent]) -> DensityStats {
  if events.is_empty() {
    return DensityStats { span_minutes: 0, events_per_hour: 0.0 };
  }
  let first_start = events.first().unwrap().start.to_min_instant().raw();
  let last_end = events.last().unwrap().end.to_min_instant().raw();
  let span_minutes = last_end - first_start;
  let events_per_hour = if span_minutes == 0 { 0.0 } else { events.len() as f64 / (span_minutes as f64 / 60.0) };
  DensityStats { span_minutes, events_per_hour }
}

fn event_frequency(events: &[SimulatedEvent]) -> HashMap<String, usize> {
  let mut out = HashMap::new();
  for e in events {
    *out.entry(e.event_name.clone()).or_insert(0) += 1;
  }
  out
}

fn complexity_score(events: &[SimulatedEvent], entropy: f64) -> ComplexityScore {
  let count = events.len();
  if count == 0 {
    return ComplexityScore { transition_variety: 0.0, unique_ratio: 0.0, entropy_normalized: 0.0, score: 0.0 };
  }

  let transition_variety = if count < 2 {
    0.0
  } else {
    let pairs: std::collections::HashSet<(&str, &str)> = events
      .windows(2)
      .map(|w| (w[0].event_name.as_str(), w[1].event_name.as_str()))
      .collect();
    pairs.len() as f64 / (count - 1) as f64
  };

  let distinct_names: std::collections::HashSet<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
  let distinct_count = distinct_names.len();
  let unique_ratio = distinct_count as f64 / count as f64;
  let entropy_normalized = if distinct_count <= 1 { 0.0 } else { entropy / (distinct_count as f64).log2() };

  let score = 100.0 * (0.4 * transition_variety + 0.3 * unique_ratio + 0.3 * entropy_normalized);

  ComplexityScore { transition_variety, unique_ratio, entropy_normalized, score }
}

pub fn compute_metrics(events: &[SimulatedEvent]) -> MetricsReport {
  let entropy = shannon_entropy(events);
  MetricsReport {
    temporal: temporal_stats(events),
    rhythm: rhythm_stats(events),
    density: density_stats(events),
    event_frequency: event_frequency(events),
    complexity: complexity_score(events, entropy),
    entropy,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::corpus::Corpus;
  use crate::parser::{parse, ParserConfig};
  use crate::resolve::simulate_target;

  fn events_from(src: &str) -> Vec<SimulatedEvent> {
    let ast = parse(src, ParserConfig::default()).unwrap();
    let (corpus, _) = Corpus::build(ast);
    simulate_target(&corpus, "T").unwrap_or_default()
  }

  #[test]
  fn empty_input_is_all_zero() {
    let report = compute_metrics(&[]);
    assert_eq!(report.temporal.count, 0);
    assert_eq!(report.temporal.mean, 0.0);
    assert_eq!(report.rhythm.regularity, 0.0);
    assert_eq!(report.density.events_per_hour, 0.0);
    assert_eq!(report.complexity.score, 0.0);
    assert_eq!(report.entropy, 0.0);
  }

  #[test]
  fn basic_temporal_stats() {
    let src = r#"target T: key:"t" dictionnary:
      law L: start_date:2025-01-01 at 00:00 period:1.30 Event: A:"a" B:"b" GROUP:(A 30^0 - B 45^15) end_law
    end_target"#;
    let events = events_from(src);
    let report = compute_metrics(&events);
    assert_eq!(report.temporal.count, 2);
    assert_eq!(report.temporal.total_duration, 90);
    assert_eq!(report.temporal.min, 30);
    assert_eq!(report.temporal.max, 60);
    assert_eq!(report.temporal.coherence_total, 75);
    assert_eq!(report.temporal.dispersal_total, 15);
  }

  #[test]
  fn single_event_is_maximally_regular_zero_gap() {
    let src = r#"target T: key:"t" dictionnary:
      law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"a" GROUP:(A 1.0^0) end_law
    end_target"#;
    let events = events_from(src);
    let report = compute_metrics(&events);
    assert_eq!(report.rhythm.mean_gap, 0.0);
    assert_eq!(report.rhythm.regularity, 0.0);
  }

  #[test]
  fn entropy_is_zero_for_single_repeated_name() {
    let src = r#"target T: key:"t" dictionnary:
      law L: start_date:2025-01-01 at 00:00 period:0.0 Event: A:"a" GROUP:(A 10^0 - A 10^0) end_law
    end_target"#;
    let events = events_from(src);
    assert_eq!(shannon_entropy(&events), 0.0);
  }
}
