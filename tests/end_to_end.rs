//! Black-box integration tests for the concrete end-to-end scenarios and
//! universal properties.

use zenith::corpus::Corpus;
use zenith::metrics::compute_metrics;
use zenith::motif::{mine_motifs, MotifConfig};
use zenith::parser::{parse, ParserConfig};
use zenith::pipeline::{load_corpus_file, run_pipeline, PipelineState, RunConfig, SimulationTarget};
use zenith::point::dotted::{minutes_to_point, point_to_minutes};
use zenith::resolve::{simulate_population, simulate_target};
use zenith::unparser::unparse;

#[test]
fn point_round_trip_holds_over_a_wide_range() {
  for n in [-1_000_000_000_i64, -518_400, -1, 0, 1, 59, 60, 1_439, 1_440, 43_199, 43_200, 518_400, 1_000_000_000] {
    let text = minutes_to_point(n);
    assert_eq!(point_to_minutes(&text).unwrap(), n, "round-trip failed for {n}");
  }
}

#[test]
fn parse_unparse_round_trip_is_stable() {
  let src = r#"target T: key:"objective" dictionnary: focus:"deep work"
    law L: start_date:2025-06-01 at 09:00 period:2.0 Event: write[focus]:"writing session" GROUP:(write 1.0^1.0) end_law
  end_target"#;
  let ast1 = parse(src, ParserConfig::default()).unwrap();
  let rendered = unparse(&ast1);
  let ast2 = parse(&rendered, ParserConfig::default()).unwrap();
  assert_eq!(ast1, ast2);
}

#[test]
fn minimal_law_simulation_matches_worked_example() {
  let src = r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law"#;
  let ast = parse(src, ParserConfig::default()).unwrap();
  let (corpus, _) = Corpus::build(ast);
  let events = simulate_population(&corpus, 0).unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(format!("{}", events[0].start), "2025-01-01T00:00");
  assert_eq!(format!("{}", events[0].end), "2025-01-01T01:00");
  assert_eq!(events[0].duration_minutes, 60);
}

#[test]
fn population_resolution_matches_worked_example() {
  let src = r#"target T1: key:"t1" dictionnary:
    target T2: key:"t2" dictionnary:
      law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law
    end_target
  end_target"#;
  let ast = parse(src, ParserConfig::default()).unwrap();
  let (corpus, _) = Corpus::build(ast);
  assert!(simulate_population(&corpus, 1).unwrap().is_empty());
  assert_eq!(simulate_population(&corpus, 2).unwrap().len(), 1);
}

#[test]
fn population_monotonicity_holds_across_thresholds() {
  let src = r#"target T1: key:"t1" dictionnary:
    law L1: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law
    target T2: key:"t2" dictionnary:
      law L2: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law
    end_target
  end_target"#;
  let ast = parse(src, ParserConfig::default()).unwrap();
  let (corpus, _) = Corpus::build(ast);
  let at_1 = simulate_population(&corpus, 1).unwrap().len();
  let at_2 = simulate_population(&corpus, 2).unwrap().len();
  assert!(at_1 <= at_2);
}

#[test]
fn simulation_contiguity_and_duration_sum_hold() {
  let src = r#"law L: start_date:2025-12-25 at 15:45 period:1.30 Event: A:"a" B:"b" GROUP:(A 30^0 - B 45^15) end_law"#;
  let ast = parse(src, ParserConfig::default()).unwrap();
  let (corpus, _) = Corpus::build(ast);
  let events = simulate_target(&corpus, "does-not-exist").unwrap();
  assert!(events.is_empty());

  let events = simulate_population(&corpus, 0).unwrap();
  for pair in events.windows(2) {
    assert_eq!(pair[0].end, pair[1].start);
  }
  let total: i64 = events.iter().map(|e| e.duration_minutes).sum();
  assert_eq!(total, 30 + 60);
}

#[test]
fn metric_outputs_stay_within_documented_bounds() {
  let src = r#"law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"a" B:"b" GROUP:(A 10^0 - B 20^0 - A 10^0 - B 20^0) end_law"#;
  let ast = parse(src, ParserConfig::default()).unwrap();
  let (corpus, _) = Corpus::build(ast);
  let events = simulate_population(&corpus, 0).unwrap();
  let report = compute_metrics(&events);
  assert!(report.complexity.score >= 0.0 && report.complexity.score <= 100.0);
  assert!(report.rhythm.regularity >= 0.0 && report.rhythm.regularity <= 1.0);
  assert!(report.entropy >= 0.0);
}

#[test]
fn pattern_miner_excludes_single_event_and_non_contiguous_motifs() {
  let names: Vec<String> = ["A", "B", "A", "B", "A", "B", "C"].iter().map(|s| s.to_string()).collect();
  let outcome = mine_motifs(&names, &MotifConfig::default());
  assert!(outcome.motifs.iter().all(|m| m.length >= 2));
}

#[test]
fn pipeline_loader_rejects_unrecognized_extensions() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("corpus.ics");
  std::fs::write(&path, "law M: end_law").unwrap();
  assert!(load_corpus_file(&path).is_err());
}

#[test]
fn full_pipeline_reaches_analyzed_for_a_well_formed_corpus() {
  let src = r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law"#;
  let config = RunConfig { target: SimulationTarget::Population(0), ..RunConfig::default() };
  let outcome = run_pipeline(src, &config).unwrap();
  assert_eq!(outcome.reached, PipelineState::Analyzed);
  assert!(outcome.metrics.is_some());
  assert!(outcome.motifs.is_some());
}
