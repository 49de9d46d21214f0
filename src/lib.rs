//! zenith: a time-organized objectives-and-sessions DSL. Parses a textual
//! corpus into an AST (`lexer`/`parser`), resolves the hierarchy of targets
//! and laws (`corpus`), simulates each law into a timestamped event sequence
//! (`simulate`/`resolve`), and computes analytic metrics over the result
//! (`metrics`/`motif`).

pub mod args;
pub mod ast;
pub mod cli;
pub mod const_params;
pub mod corpus;
pub mod error;
pub mod json_ast;
pub mod lexer;
pub mod metrics;
pub mod motif;
pub mod parser;
pub mod pipeline;
pub mod point;
pub mod resolve;
pub mod simulate;
pub mod unparser;
pub mod util;
