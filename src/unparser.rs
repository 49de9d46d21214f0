//! Canonical, deterministic re-rendering of an AST back to source text (C4).
//! One declaration per line, four-space indents per nesting level, `GROUP`
//! on a single parenthesized line with ` - ` separators.

use crate::ast::{Ast, DictEntry, EventDecl, GroupTerm, Law, Node, Target};

fn escape(s: &str) -> String {
  s.replace('"', "\\\"")
}

fn indent(level: usize) -> String {
  "    ".repeat(level)
}

fn render_tag(tag: &Option<String>) -> String {
  match tag {
    Some(t) => format!("[{}]", t),
    None => String::new(),
  }
}

fn render_event_decl(out: &mut String, level: usize, e: &EventDecl) {
  out.push_str(&format!(
    "{}{}{}:\"{}\"\n",
    indent(level),
    e.name,
    render_tag(&e.tag),
    escape(&e.description)
  ));
}

fn render_dict_entry(out: &mut String, level: usize, d: &DictEntry) {
  out.push_str(&format!(
    "{}{}{}:\"{}\"\n",
    indent(level),
    d.local_key,
    render_tag(&d.parent_ref),
    escape(&d.description)
  ));
}

fn render_group_term(t: &GroupTerm) -> String {
  format!("{} {}^{}", t.event_ref, t.coherence, t.dispersal)
}

fn render_law(out: &mut String, level: usize, law: &Law) {
  out.push_str(&format!("{}law {}:\n", indent(level), law.name));
  out.push_str(&format!(
    "{}start_date:{} at {}\n",
    indent(level + 1),
    law.start_date,
    law.start_time
  ));
  out.push_str(&format!("{}period:{}\n", indent(level + 1), law.period));
  out.push_str(&format!("{}Event:\n", indent(level + 1)));
  for e in &law.events {
    render_event_decl(out, level + 2, e);
  }
  let terms: Vec<String> = law.group.iter().map(render_group_term).collect();
  out.push_str(&format!("{}GROUP:({})\n", indent(level + 1), terms.join(" - ")));
  out.push_str(&format!("{}end_law\n", indent(level)));
}

fn render_target(out: &mut String, level: usize, target: &Target) {
  out.push_str(&format!("{}target {}:\n", indent(level), target.name));
  out.push_str(&format!("{}key:\"{}\"\n", indent(level + 1), escape(&target.key)));
  out.push_str(&format!("{}dictionnary:\n", indent(level + 1)));
  for d in &target.dictionary {
    render_dict_entry(out, level + 2, d);
  }
  for child in &target.children {
    render_node(out, level + 1, child);
  }
  out.push_str(&format!("{}end_target\n", indent(level)));
}

fn render_node(out: &mut String, level: usize, node: &Node) {
  match node {
    Node::Law(l) => render_law(out, level, l),
    Node::Target(t) => render_target(out, level, t),
  }
}

pub fn unparse(ast: &Ast) -> String {
  let mut out = String::new();
  for node in &ast.roots {
    render_node(&mut out, 0, node);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::{parse, ParserConfig};

  fn roundtrip(src: &str) {
    let ast = parse(src, ParserConfig::default()).unwrap();
    let rendered = unparse(&ast);
    let reparsed = parse(&rendered, ParserConfig::default()).unwrap();
    assert_eq!(ast, reparsed, "roundtrip mismatch:\n{}", rendered);
  }

  #[test]
  fn roundtrips_minimal_law() {
    roundtrip(r#"law M: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"x" GROUP:(A 1.0^0) end_law"#);
  }

  #[test]
  fn roundtrips_two_term_group() {
    roundtrip(
      r#"law L: start_date:2025-12-25 at 15:45 period:1.15 Event: A:"a" B:"b" GROUP:(A 30^0 - B 45^15) end_law"#,
    );
  }

  #[test]
  fn roundtrips_nested_target_with_tags() {
    roundtrip(
      r#"target T1: key:"t1" dictionnary: d[p]:"root" target T2: key:"t2" dictionnary: law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A[d]:"x" GROUP:(A 1.0^0) end_law end_target end_target"#,
    );
  }

  #[test]
  fn roundtrips_escaped_quotes_in_strings() {
    roundtrip(
      r#"law L: start_date:2025-01-01 at 00:00 period:1.0 Event: A:"say \"hi\"" GROUP:(A 1.0^0) end_law"#,
    );
  }

  #[test]
  fn roundtrips_negative_point() {
    roundtrip(r#"law L: start_date:2025-01-01 at 00:00 period:0.0 Event: A:"a" GROUP:(A -1.30^1.30) end_law"#);
  }
}
