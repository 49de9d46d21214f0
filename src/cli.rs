//! CLI driver (C12): dispatches `ZenithCmd` variants to library calls and
//! formats their results, in the style of the reference crate's
//! `TaggyCmd::handle`. Contains no domain logic of its own.

use colored::Colorize;
use serde::Serialize;

use crate::args::ZenithCmd;
use crate::corpus::{Corpus, Diagnostic, Severity, Validator};
use crate::error::ZenithError;
use crate::json_ast::{ast_to_json_string, json_string_to_ast};
use crate::parser::{parse, ParserConfig};
use crate::pipeline::{load_corpus_file, run_pipeline, PipelineState, RunConfig, SimulationTarget};
use crate::simulate::SimulatedEvent;
use crate::unparser::unparse;

/// A JSON-friendly projection of `SimulatedEvent`; the domain type itself
/// stays free of serde so the simulator has no serialization concerns.
#[derive(Serialize)]
struct EventDto {
  event_name: String,
  tag: Option<String>,
  description: String,
  start: String,
  end: String,
  duration_minutes: i64,
  coherence_minutes: i64,
  dispersal_minutes: i64,
  law_name: String,
  target_chain: Vec<String>,
}

impl From<&SimulatedEvent> for EventDto {
  fn from(e: &SimulatedEvent) -> Self {
    EventDto {
      event_name: e.event_name.clone(),
      tag: e.tag.clone(),
      description: e.description.clone(),
      start: e.start.to_string(),
      end: e.end.to_string(),
      duration_minutes: e.duration_minutes,
      coherence_minutes: e.coherence_minutes,
      dispersal_minutes: e.dispersal_minutes,
      law_name: e.law_name.clone(),
      target_chain: e.target_chain.clone(),
    }
  }
}

#[derive(Serialize)]
struct AnalyzeReport {
  reached: String,
  diagnostics: Vec<Diagnostic>,
  events: Vec<EventDto>,
  metrics: Option<crate::metrics::MetricsReport>,
  motifs: Option<Vec<crate::motif::Motif>>,
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
  for d in diagnostics {
    let line = format!("{d}");
    match d.severity {
      Severity::Error => eprintln!("{}", line.red()),
      Severity::Warning => eprintln!("{}", line.yellow()),
    }
  }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), ZenithError> {
  let text = if pretty {
    serde_json::to_string_pretty(value)
  } else {
    serde_json::to_string(value)
  }
  .expect("report types are always representable as JSON");
  println!("{text}");
  Ok(())
}

fn state_name(state: PipelineState) -> &'static str {
  match state {
    PipelineState::Raw => "raw",
    PipelineState::Tokenized => "tokenized",
    PipelineState::Parsed => "parsed",
    PipelineState::Validated => "validated",
    PipelineState::Simulated => "simulated",
    PipelineState::Analyzed => "analyzed",
  }
}

fn resolve_target(law: &Option<String>, target: &Option<String>, population: &Option<i64>) -> SimulationTarget {
  if let Some(name) = law {
    SimulationTarget::Law(name.clone())
  } else if let Some(name) = target {
    SimulationTarget::Target(name.clone())
  } else if let Some(p) = population {
    SimulationTarget::Population(*p)
  } else {
    SimulationTarget::default()
  }
}

impl ZenithCmd {
  pub fn handle(&self) -> Result<(), ZenithError> {
    match self {
      ZenithCmd::Analyze { file, law, target, population, pretty } => {
        let source = load_corpus_file(file)?;
        let config = RunConfig { strict: false, target: resolve_target(law, target, population), ..RunConfig::default() };
        let outcome = run_pipeline(&source, &config)?;
        print_diagnostics(&outcome.diagnostics);
        let reached = outcome.reached;

        let report = AnalyzeReport {
          reached: state_name(reached).to_string(),
          diagnostics: outcome.diagnostics,
          events: outcome.events.iter().map(EventDto::from).collect(),
          metrics: outcome.metrics,
          motifs: outcome.motifs.map(|m| m.motifs),
        };
        print_json(&report, *pretty)?;

        if reached != PipelineState::Analyzed {
          return Err(ZenithError::UnknownContext("analysis stopped before completion".into()));
        }
        Ok(())
      }

      ZenithCmd::Validate { file, strict } => {
        let source = load_corpus_file(file)?;
        let ast = parse(&source, ParserConfig::default())?;
        let (corpus, diagnostics) = Corpus::build(ast);
        let report = Validator::new(*strict).validate(&corpus, diagnostics);
        print_diagnostics(&report.diagnostics);
        println!(
          "[zenith] {} error(s), {} warning(s)",
          report.error_count(),
          report.warning_count()
        );
        if report.has_errors(*strict) {
          Err(ZenithError::UnknownContext("validation failed".into()))
        } else {
          Ok(())
        }
      }

      ZenithCmd::Metrics { file, metric_type, law, population } => {
        let source = load_corpus_file(file)?;
        let config = RunConfig { target: resolve_target(law, &None, population), ..RunConfig::default() };
        let outcome = run_pipeline(&source, &config)?;
        print_diagnostics(&outcome.diagnostics);

        let Some(metrics) = outcome.metrics else {
          return Err(ZenithError::UnknownContext("no metrics: pipeline stopped early".into()));
        };

        match metric_type.as_deref() {
          Some("temporal") => print_json(&metrics.temporal, true)?,
          Some("rhythm") => print_json(&metrics.rhythm, true)?,
          Some("density") => print_json(&metrics.density, true)?,
          Some("complexity") => print_json(&metrics.complexity, true)?,
          Some("entropy") => print_json(&metrics.entropy, true)?,
          Some("frequency") => print_json(&metrics.event_frequency, true)?,
          Some("motifs") => print_json(&outcome.motifs.map(|m| m.motifs), true)?,
          _ => print_json(&metrics, true)?,
        }
        Ok(())
      }

      ZenithCmd::Unparse { ast_json } => {
        let text = std::fs::read_to_string(ast_json)?;
        let ast = json_string_to_ast(&text).map_err(|e| {
          ZenithError::UnknownContext(format!("malformed AST json: {e}"))
        })?;
        println!("{}", unparse(&ast));
        Ok(())
      }

      ZenithCmd::Convert { input, output, from, to } => {
        let from_fmt = from.clone().unwrap_or_else(|| infer_format(input));
        let to_fmt = to.clone().unwrap_or_else(|| infer_format(output));

        let ast = match from_fmt.as_str() {
          "json" => json_string_to_ast(&std::fs::read_to_string(input)?)
            .map_err(|e| ZenithError::UnknownContext(format!("malformed AST json: {e}")))?,
          _ => parse(&load_corpus_file(input)?, ParserConfig::default())?,
        };

        let rendered = match to_fmt.as_str() {
          "json" => ast_to_json_string(&ast, true)
            .map_err(|e| ZenithError::UnknownContext(format!("failed to encode AST json: {e}")))?,
          _ => unparse(&ast),
        };

        std::fs::write(output, rendered)?;
        println!("[zenith] wrote {}", output.display());
        Ok(())
      }

      ZenithCmd::Export { file, formats, zip } => {
        let source = load_corpus_file(file)?;
        let outcome = run_pipeline(&source, &RunConfig::default())?;
        print_diagnostics(&outcome.diagnostics);

        let wanted: Vec<String> = formats
          .as_deref()
          .map(|s| s.split(',').map(|f| f.trim().to_string()).collect())
          .unwrap_or_else(|| vec!["json".into(), "metrics".into(), "motifs".into()]);

        if *zip {
          log::warn!("export --zip is not implemented in this build; writing loose files instead");
        }

        for fmt in &wanted {
          match fmt.as_str() {
            "json" => print_json(&outcome.events.iter().map(EventDto::from).collect::<Vec<_>>(), true)?,
            "metrics" => {
              if let Some(m) = &outcome.metrics {
                print_json(m, true)?;
              }
            }
            "motifs" => {
              if let Some(m) = &outcome.motifs {
                print_json(&m.motifs, true)?;
              }
            }
            other => log::warn!("unknown export format `{other}`, skipping"),
          }
        }
        Ok(())
      }

      ZenithCmd::Compare { files, labels } => {
        let label_list: Vec<String> = labels
          .as_deref()
          .map(|s| s.split(',').map(|l| l.trim().to_string()).collect())
          .unwrap_or_default();

        for (i, file) in files.iter().enumerate() {
          let label = label_list.get(i).cloned().unwrap_or_else(|| file.display().to_string());
          let source = load_corpus_file(file)?;
          let outcome = run_pipeline(&source, &RunConfig::default())?;
          println!("--- {label} ---");
          print_diagnostics(&outcome.diagnostics);
          if let Some(metrics) = &outcome.metrics {
            print_json(metrics, true)?;
          }
        }
        Ok(())
      }
    }
  }
}

fn infer_format(path: &std::path::Path) -> String {
  match path.extension().and_then(|e| e.to_str()) {
    Some("json") => "json".to_string(),
    _ => "zenith".to_string(),
  }
}
