use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stores information parsed from commandline args.
#[derive(Parser)]
#[command(about = "zenith: a time-organized objectives and sessions DSL")]
pub struct CliInfo {
  #[command(subcommand)]
  pub cmd: ZenithCmd,
}

#[derive(Subcommand)]
pub enum ZenithCmd {
  /// Parse, validate, simulate; emit a JSON report.
  Analyze {
    /// Path to a `.zenith`/`.zth`/`.znth` corpus file.
    file: PathBuf,

    /// Simulate the named law only.
    #[arg(long)]
    law: Option<String>,

    /// Simulate the named target's population.
    #[arg(long)]
    target: Option<String>,

    /// Simulate the population up to this generation (`-1` = maximum observed).
    #[arg(long)]
    population: Option<i64>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
  },

  /// Parse and validate only.
  Validate {
    file: PathBuf,

    /// Treat validation warnings as errors.
    #[arg(long)]
    strict: bool,
  },

  /// Parse, simulate, and compute metrics.
  Metrics {
    file: PathBuf,

    /// Restrict output to one metric family (`temporal`, `rhythm`, `density`,
    /// `complexity`, `entropy`, `frequency`, `motifs`). Defaults to all.
    #[arg(long = "type")]
    metric_type: Option<String>,

    #[arg(long)]
    law: Option<String>,

    #[arg(long)]
    population: Option<i64>,
  },

  /// Render a JSON AST file back to canonical Zenith source text.
  Unparse {
    /// Path to a JSON-encoded AST (see `convert`).
    ast_json: PathBuf,
  },

  /// Convert between Zenith source and its JSON AST encoding.
  Convert {
    input: PathBuf,
    output: PathBuf,

    /// Input format (`zenith` or `json`); inferred from the extension if omitted.
    #[arg(long)]
    from: Option<String>,

    /// Output format (`zenith` or `json`); inferred from the extension if omitted.
    #[arg(long)]
    to: Option<String>,
  },

  /// Bundle a JSON report plus derived artifacts for a corpus.
  Export {
    file: PathBuf,

    /// Comma-separated artifact list (`json`, `metrics`, `motifs`). Defaults to all.
    #[arg(long)]
    formats: Option<String>,

    /// Emit a single zip archive instead of separate files.
    #[arg(long)]
    zip: bool,
  },

  /// Side-by-side analyses of multiple corpus files.
  Compare {
    files: Vec<PathBuf>,

    /// Comma-separated labels, one per file, for the comparison report.
    #[arg(long)]
    labels: Option<String>,
  },
}
