//! Tagged JSON AST codec (C10). `Ast` already derives `Serialize`/`Deserialize`
//! via the `#[serde(tag = "kind")]` discriminant on `Node`; this module owns
//! the public encode/decode entry points and their error type.

use serde_json::Value;

use crate::ast::Ast;

#[derive(Debug)]
pub enum JsonAstError {
  Serialize(serde_json::Error),
  Deserialize(serde_json::Error),
}

impl std::fmt::Display for JsonAstError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      JsonAstError::Serialize(e) => write!(f, "failed to serialize AST to JSON: {e}"),
      JsonAstError::Deserialize(e) => write!(f, "failed to deserialize AST from JSON: {e}"),
    }
  }
}

impl std::error::Error for JsonAstError {}

/// Encodes an `Ast` as a `serde_json::Value`.
pub fn ast_to_json(ast: &Ast) -> Result<Value, JsonAstError> {
  serde_json::to_value(ast).map_err(JsonAstError::Serialize)
}

/// Decodes an `Ast` from a `serde_json::Value`.
pub fn json_to_ast(value: &Value) -> Result<Ast, JsonAstError> {
  serde_json::from_value(value.clone()).map_err(JsonAstError::Deserialize)
}

/// Encodes an `Ast` as a JSON string, pretty-printed when `pretty` is set.
pub fn ast_to_json_string(ast: &Ast, pretty: bool) -> Result<String, JsonAstError> {
  if pretty {
    serde_json::to_string_pretty(ast).map_err(JsonAstError::Serialize)
  } else {
    serde_json::to_string(ast).map_err(JsonAstError::Serialize)
  }
}

/// Decodes an `Ast` from a JSON string.
pub fn json_string_to_ast(s: &str) -> Result<Ast, JsonAstError> {
  serde_json::from_str(s).map_err(JsonAstError::Deserialize)
}
