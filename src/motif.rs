//! Pattern miner (C9): suffix array + Kasai's LCP algorithm over an
//! event-name sequence, extracting contiguous repeated motifs.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Motif {
  pub sequence: Vec<String>,
  pub length: usize,
  pub frequency: usize,
}

/// Configuration for motif mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifConfig {
  /// Minimum motif length to report.
  pub min_len: usize,
  /// Maximum number of motifs returned, ranked by `(length desc, frequency desc)`.
  pub top_k: usize,
  /// Sequences longer than this are truncated (with a diagnostic) rather
  /// than mined, bounding the suffix array's `O(n log n)` work.
  pub max_sequence_length: usize,
}

impl Default for MotifConfig {
  fn default() -> Self {
    MotifConfig {
      min_len: crate::const_params::DEFAULT_MOTIF_MIN_LEN,
      top_k: crate::const_params::DEFAULT_MOTIF_TOP_K,
      max_sequence_length: crate::const_params::MAX_MOTIF_SEQUENCE_LENGTH,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiningOutcome {
  pub motifs: Vec<Motif>,
  /// `Some(n)` when the input sequence was longer than `max_sequence_length`
  /// and was truncated to its first `n` elements before mining.
  pub truncated_to: Option<usize>,
}

fn rank_sequence(names: &[String]) -> Vec<u32> {
  let mut next_rank: u32 = 0;
  let mut seen: HashMap<&str, u32> = HashMap::new();
  names
    .iter()
    .map(|n| {
      *seen.entry(n.as_str()).or_insert_with(|| {
        let r = next_rank;
        next_rank += 1;
        r
      })
    })
    .collect()
}

/// Builds a suffix array over `ranks` with the doubling algorithm: `O(log n)`
/// rounds of a radix-style comparison sort.
fn build_suffix_array(ranks: &[i64]) -> Vec<usize> {
  let n = ranks.len();
  if n == 0 {
    return Vec::new();
  }

  let mut sa: Vec<usize> = (0..n).collect();
  let mut rank: Vec<i64> = ranks.to_vec();
  let mut tmp = vec![0i64; n];
  let mut k = 1;

  let key = |rank: &[i64], i: usize, k: usize| -> (i64, i64) {
    let second = if i + k < n { rank[i + k] } else { -1 };
    (rank[i], second)
  };

  loop {
    sa.sort_by_key(|&i| key(&rank, i, k));

    tmp[sa[0]] = 0;
    for i in 1..n {
      let prev_key = key(&rank, sa[i - 1], k);
      let cur_key = key(&rank, sa[i], k);
      tmp[sa[i]] = tmp[sa[i - 1]] + if cur_key > prev_key { 1 } else { 0 };
    }
    rank.copy_from_slice(&tmp);

    if rank[sa[n - 1]] as usize == n - 1 || k >= n {
      break;
    }
    k *= 2;
  }

  sa
}

/// Kasai's `O(n)` LCP construction. `lcp[i]` is the common prefix length of
/// the suffixes at `sa[i - 1]` and `sa[i]`; `lcp[0]` is always `0`.
fn kasai_lcp(ranks: &[i64], sa: &[usize]) -> Vec<usize> {
  let n = sa.len();
  if n == 0 {
    return Vec::new();
  }

  let mut rank_of = vec![0usize; n];
  for (i, &s) in sa.iter().enumerate() {
    rank_of[s] = i;
  }

  let mut lcp = vec![0usize; n];
  let mut h = 0usize;
  for i in 0..n {
    if rank_of[i] > 0 {
      let j = sa[rank_of[i] - 1];
      while i + h < n && j + h < n && ranks[i + h] == ranks[j + h] {
        h += 1;
      }
      lcp[rank_of[i]] = h;
      if h > 0 {
        h -= 1;
      }
    } else {
      h = 0;
    }
  }
  lcp
}

/// Extracts contiguous repeated motifs of length `>= min_len` by sweeping
/// maximal runs of qualifying LCP entries: a run's motif length is the
/// minimum LCP within the run, and its occurrence count is `run.len() + 1`
/// (the suffixes bracketing the run all share that common prefix).
fn extract_motifs(names: &[String], sa: &[usize], lcp: &[usize], min_len: usize) -> Vec<Motif> {
  let mut by_text: HashMap<Vec<String>, Motif> = HashMap::new();
  let n = sa.len();
  let mut i = 1;
  while i < n {
    if lcp[i] >= min_len {
      let run_start = i;
      let mut run_min = lcp[i];
      while i < n && lcp[i] >= min_len {
        run_min = run_min.min(lcp[i]);
        i += 1;
      }
      let run_len = i - run_start;
      let length = run_min;
      let occurrence_count = run_len + 1;

      if length >= 2 {
        let start = sa[run_start];
        let text: Vec<String> = names[start..start + length].to_vec();
        by_text
          .entry(text.clone())
          .and_modify(|m| m.frequency = m.frequency.max(occurrence_count))
          .or_insert(Motif { sequence: text, length, frequency: occurrence_count });
      }
    } else {
      i += 1;
    }
  }

  let mut motifs: Vec<Motif> = by_text.into_values().collect();
  motifs.sort_by(|a, b| b.length.cmp(&a.length).then(b.frequency.cmp(&a.frequency)).then(a.sequence.cmp(&b.sequence)));
  motifs
}

/// Mines contiguous repeated motifs from an event-name sequence.
pub fn mine_motifs(names: &[String], config: &MotifConfig) -> MiningOutcome {
  let truncated_to = if names.len() > config.max_sequence_length {
    Some(config.max_sequence_length)
  } else {
    None
  };
  let working: &[String] = match truncated_to {
    Some(n) => &names[..n],
    None => names,
  };

  if working.len() < 2 {
    return MiningOutcome { motifs: Vec::new(), truncated_to };
  }

  let ranks_u32 = rank_sequence(working);
  let ranks: Vec<i64> = ranks_u32.iter().map(|&r| r as i64).collect();
  let sa = build_suffix_array(&ranks);
  let lcp = kasai_lcp(&ranks, &sa);
  let mut motifs = extract_motifs(working, &sa, &lcp, config.min_len.max(2));
  motifs.truncate(config.top_k);

  MiningOutcome { motifs, truncated_to }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(s: &[&str]) -> Vec<String> {
    s.iter().map(|x| x.to_string()).collect()
  }

  #[test]
  fn finds_ab_motif_in_worked_example() {
    let seq = names(&["A", "B", "A", "B", "A", "B", "C"]);
    let outcome = mine_motifs(&seq, &MotifConfig::default());
    let ab = outcome
      .motifs
      .iter()
      .find(|m| m.sequence == vec!["A".to_string(), "B".to_string()])
      .expect("AB motif present");
    assert_eq!(ab.length, 2);
    assert_eq!(ab.frequency, 3);
  }

  #[test]
  fn empty_and_singleton_sequences_yield_no_motifs() {
    assert!(mine_motifs(&[], &MotifConfig::default()).motifs.is_empty());
    assert!(mine_motifs(&names(&["A"]), &MotifConfig::default()).motifs.is_empty());
  }

  #[test]
  fn no_repeats_yields_no_motifs() {
    let seq = names(&["A", "B", "C", "D"]);
    assert!(mine_motifs(&seq, &MotifConfig::default()).motifs.is_empty());
  }

  #[test]
  fn truncates_long_sequences_with_diagnostic() {
    let seq: Vec<String> = (0..10).map(|i| format!("E{}", i % 3)).collect();
    let config = MotifConfig { min_len: 2, top_k: 10, max_sequence_length: 5 };
    let outcome = mine_motifs(&seq, &config);
    assert_eq!(outcome.truncated_to, Some(5));
  }

  #[test]
  fn sorts_by_length_then_frequency_descending() {
    let seq = names(&["A", "B", "A", "B", "A", "B", "C"]);
    let outcome = mine_motifs(&seq, &MotifConfig::default());
    for pair in outcome.motifs.windows(2) {
      let (a, b) = (&pair[0], &pair[1]);
      assert!(a.length > b.length || (a.length == b.length && a.frequency >= b.frequency));
    }
  }

  #[test]
  fn respects_top_k() {
    let seq = names(&["A", "B", "C", "A", "B", "C", "A", "B", "C", "D", "E"]);
    let config = MotifConfig { min_len: 2, top_k: 1, max_sequence_length: 1 << 17 };
    let outcome = mine_motifs(&seq, &config);
    assert!(outcome.motifs.len() <= 1);
  }
}
