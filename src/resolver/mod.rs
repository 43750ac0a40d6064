//! Categorical value resolution
//!
//! Maps an arbitrary, possibly malformed user-supplied string for a
//! categorical field to the single matching entry in that field's
//! vocabulary, so the trained encoders can transform it. Strategies are
//! tried in a fixed ladder: exact, substring containment in either
//! direction (first match in stored order wins), then a small alias table.
//!
//! Matching is deliberately heuristic: short inputs can substring-match
//! unintended entries. That behavior is load-bearing for callers and is
//! kept as-is.

mod vocabulary;

pub use vocabulary::{normalize, CategoricalVocabulary};

use crate::error::{MotormartError, Result};
use serde::Serialize;
use tracing::debug;

/// How a resolution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Partial,
    Alias,
    /// Leasing-only soft fallback to the dataset's most frequent value.
    Fallback,
}

/// A categorical input paired with the vocabulary entry it matched.
/// Produced per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Matched entry, original casing as the encoder was fit on it.
    pub entry: String,
    /// Integer code of the entry in its vocabulary.
    pub code: usize,
    pub method: MatchMethod,
}

/// Spelling variants seen in the wild, mapped onto vocabulary terms.
/// An alias only applies when the target is itself in the vocabulary.
const ALIASES: &[(&str, &str)] = &[
    ("petrol", "gasoline"),
    ("gasoline", "petrol"),
    ("manual", "manual"),
    ("automatic", "auto"),
    ("auto", "automatic"),
    ("used", "used"),
    ("new", "new"),
    ("brand new", "new"),
    ("no", "no leasing"),
    ("yes", "leasing"),
    ("leasing", "leasing"),
    ("no leasing", "no leasing"),
    ("ongoing lease", "ongoing lease"),
    ("no lease", "no leasing"),
];

fn alias_of(input: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(from, _)| *from == input)
        .map(|(_, to)| *to)
}

fn resolution_at(vocab: &CategoricalVocabulary, idx: usize, method: MatchMethod) -> Resolution {
    Resolution {
        entry: vocab.entries()[idx].clone(),
        code: idx,
        method,
    }
}

/// Resolve `input` against `vocab`. Returns `None` when every strategy
/// fails or the vocabulary is empty.
pub fn resolve(input: &str, vocab: &CategoricalVocabulary) -> Option<Resolution> {
    if vocab.is_empty() {
        debug!(field = vocab.field(), "empty vocabulary, nothing to match");
        return None;
    }

    let input = normalize(input);

    if let Some(idx) = vocab.position_of_normalized(&input) {
        debug!(field = vocab.field(), entry = %vocab.entries()[idx], "exact match");
        return Some(resolution_at(vocab, idx, MatchMethod::Exact));
    }

    // First match in stored order wins; a reordered vocabulary would change
    // observable behavior, hence the stable sort in CategoricalVocabulary.
    for (idx, entry) in vocab.normalized().iter().enumerate() {
        if entry.contains(&input) || input.contains(entry.as_str()) {
            debug!(
                field = vocab.field(),
                input = %input,
                entry = %vocab.entries()[idx],
                "partial match"
            );
            return Some(resolution_at(vocab, idx, MatchMethod::Partial));
        }
    }

    if let Some(alias) = alias_of(&input) {
        if let Some(idx) = vocab.position_of_normalized(alias) {
            debug!(
                field = vocab.field(),
                input = %input,
                alias = alias,
                entry = %vocab.entries()[idx],
                "alias match"
            );
            return Some(resolution_at(vocab, idx, MatchMethod::Alias));
        }
    }

    debug!(field = vocab.field(), input = %input, "no match");
    None
}

/// Number of valid values returned alongside a failed resolution.
pub const ERROR_SAMPLE_SIZE: usize = 10;

/// Resolve a field where failure is a hard validation error. The error
/// carries a non-empty sample of valid values.
pub fn resolve_required(input: &str, vocab: &CategoricalVocabulary) -> Result<Resolution> {
    resolve(input, vocab).ok_or_else(|| MotormartError::Resolution {
        field: vocab.field().to_string(),
        input: input.to_string(),
        sample: vocab.sample(ERROR_SAMPLE_SIZE),
    })
}

/// Resolve the leasing field. Unlike every other field, an unmatched input
/// soft-falls-back to the dataset's most frequent value (or the first
/// vocabulary entry when no dataset is available) — downstream consumers
/// depend on leasing always resolving. An empty vocabulary still fails.
pub fn resolve_leasing(
    input: &str,
    vocab: &CategoricalVocabulary,
    modal_value: Option<&str>,
) -> Result<Resolution> {
    if vocab.is_empty() {
        return Err(MotormartError::Resolution {
            field: vocab.field().to_string(),
            input: input.to_string(),
            sample: Vec::new(),
        });
    }

    if let Some(resolution) = resolve(input, vocab) {
        return Ok(resolution);
    }

    let fallback = modal_value
        .map(normalize)
        .unwrap_or_else(|| vocab.normalized()[0].clone());

    let idx = vocab.position_of_normalized(&fallback).unwrap_or(0);
    debug!(input = %input, fallback = %vocab.entries()[idx], "leasing fallback");
    Ok(resolution_at(vocab, idx, MatchMethod::Fallback))
}
