//! Pipeline / loader (C11, ambient): corpus file loading and the
//! `Raw -> Tokenized -> Parsed -> Validated -> Simulated -> Analyzed` state
//! machine that sequences C2-C9 and turns a stage failure into a terminal
//! diagnostic list.

use std::path::Path;

use crate::corpus::{Corpus, Diagnostic, Validator};
use crate::error::ZenithError;
use crate::metrics::{compute_metrics, MetricsReport};
use crate::motif::{mine_motifs, MiningOutcome, MotifConfig};
use crate::parser::{parse, ParserConfig};
use crate::resolve::{simulate_law_by_name, simulate_population, simulate_target};
use crate::simulate::SimulatedEvent;
use crate::util::path2string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
  Raw,
  Tokenized,
  Parsed,
  Validated,
  Simulated,
  Analyzed,
}

/// Which context to simulate: a single named law, a named target's
/// population, a population threshold, or (default) population `-1`
/// ("maximum observed generation").
#[derive(Debug, Clone)]
pub enum SimulationTarget {
  Law(String),
  Target(String),
  Population(i64),
}

impl Default for SimulationTarget {
  fn default() -> Self {
    SimulationTarget::Population(-1)
  }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
  pub strict: bool,
  pub target: SimulationTarget,
  pub motif: MotifConfig,
}

impl Default for RunConfig {
  fn default() -> Self {
    RunConfig { strict: false, target: SimulationTarget::default(), motif: MotifConfig::default() }
  }
}

#[derive(Debug)]
pub struct PipelineOutcome {
  pub reached: PipelineState,
  pub diagnostics: Vec<Diagnostic>,
  pub events: Vec<SimulatedEvent>,
  pub metrics: Option<MetricsReport>,
  pub motifs: Option<MiningOutcome>,
}

/// Runs the full `Raw -> ... -> Analyzed` state machine over source text.
/// Stops at the first stage producing diagnostics that should be fatal for
/// that stage (lex/parse errors abort outright; validation and per-law
/// simulation failures are recorded and the pipeline continues as far as it
/// can).
pub fn run_pipeline(source: &str, config: &RunConfig) -> Result<PipelineOutcome, ZenithError> {
  log::debug!("pipeline: state=Raw, {} bytes", source.len());

  log::trace!("pipeline: state=Tokenized");
  let ast = parse(source, ParserConfig::default())?;
  log::debug!("pipeline: state=Parsed, {} root declarations", ast.roots.len());

  let (corpus, build_diagnostics) = Corpus::build(ast);
  let report = Validator::new(config.strict).validate(&corpus, build_diagnostics);
  log::debug!(
    "pipeline: state=Validated, {} error(s), {} warning(s)",
    report.error_count(),
    report.warning_count()
  );

  if report.has_errors(config.strict) {
    for d in &report.diagnostics {
      log::warn!("{d}");
    }
    return Ok(PipelineOutcome {
      reached: PipelineState::Validated,
      diagnostics: report.diagnostics,
      events: Vec::new(),
      metrics: None,
      motifs: None,
    });
  }

  let events = match &config.target {
    SimulationTarget::Law(name) => simulate_law_by_name(&corpus, name)?,
    SimulationTarget::Target(name) => simulate_target(&corpus, name)?,
    SimulationTarget::Population(p) => simulate_population(&corpus, *p)?,
  };
  log::debug!("pipeline: state=Simulated, {} event(s)", events.len());

  let metrics = compute_metrics(&events);
  let names: Vec<String> = events.iter().map(|e| e.event_name.clone()).collect();
  let motifs = mine_motifs(&names, &config.motif);
  log::debug!("pipeline: state=Analyzed, {} motif(s) found", motifs.motifs.len());

  Ok(PipelineOutcome {
    reached: PipelineState::Analyzed,
    diagnostics: report.diagnostics,
    events,
    metrics: Some(metrics),
    motifs: Some(motifs),
  })
}

/// Loads a corpus file: rejects any extension other than `.zenith`, `.zth`,
/// or `.znth`, then strips a leading UTF-8 BOM if present.
pub fn load_corpus_file<P: AsRef<Path>>(path: P) -> Result<String, ZenithError> {
  let path = path.as_ref();
  let ext_ok = path
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| crate::const_params::CORPUS_FILE_EXTENSIONS.contains(&e))
    .unwrap_or(false);

  if !ext_ok {
    return Err(ZenithError::Io(std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!(
        "`{}` does not have a recognized corpus extension ({})",
        path2string(path),
        crate::const_params::CORPUS_FILE_EXTENSIONS.join(", ")
      ),
    )));
  }

  let raw = std::fs::read_to_string(path)?;
  Ok(raw.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(raw))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn strips_bom_and_accepts_known_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.zenith");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all("\u{feff}law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:\"x\" GROUP:(A 1.0^0) end_law".as_bytes()).unwrap();
    drop(f);

    let text = load_corpus_file(&path).unwrap();
    assert!(!text.starts_with('\u{feff}'));
    assert!(text.starts_with("law M:"));
  }

  #[test]
  fn rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.txt");
    std::fs::write(&path, "law M: end_law").unwrap();
    assert!(load_corpus_file(&path).is_err());
  }

  #[test]
  fn run_pipeline_reaches_analyzed_on_valid_corpus() {
    let src = r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law"#;
    let outcome = run_pipeline(src, &RunConfig { target: SimulationTarget::Population(0), ..RunConfig::default() }).unwrap();
    assert_eq!(outcome.reached, PipelineState::Analyzed);
    assert_eq!(outcome.events.len(), 1);
    assert!(outcome.metrics.is_some());
  }

  #[test]
  fn run_pipeline_stops_at_validated_on_structural_error() {
    let src = r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(B 1.0^0) end_law"#;
    let outcome = run_pipeline(src, &RunConfig::default()).unwrap();
    assert_eq!(outcome.reached, PipelineState::Validated);
    assert!(outcome.events.is_empty());
    assert!(outcome.diagnostics.iter().any(|d| d.severity == crate::corpus::Severity::Error));
  }

  #[test]
  fn run_pipeline_aborts_outright_on_syntax_error() {
    let src = "law M: start_date:2025-01-01 at 00:00 end_law";
    assert!(run_pipeline(src, &RunConfig::default()).is_err());
  }
}
