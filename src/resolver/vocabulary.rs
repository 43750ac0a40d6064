//! Categorical vocabularies
//!
//! A vocabulary is the fixed, ordered set of string values a trained
//! encoder recognizes for one categorical field. Order comes from a stable
//! sort of the unique values, matching the order the encoders were fit
//! with; the integer code of an entry is its position in that order.

use std::collections::HashMap;

/// Lowercase and trim an input for comparison.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Ordered set of known values for one categorical field.
///
/// Entries keep their original casing (the encoders were fit on original
/// casing); all membership tests go through the normalized forms.
#[derive(Debug, Clone)]
pub struct CategoricalVocabulary {
    field: String,
    entries: Vec<String>,
    normalized: Vec<String>,
    by_normalized: HashMap<String, usize>,
}

impl CategoricalVocabulary {
    /// Build a vocabulary from raw values. Values are sorted and
    /// de-duplicated so the stored order is stable across rebuilds.
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<String> = values.into_iter().map(Into::into).collect();
        entries.sort();
        entries.dedup();

        let normalized: Vec<String> = entries.iter().map(|e| normalize(e)).collect();
        let mut by_normalized = HashMap::with_capacity(normalized.len());
        for (idx, norm) in normalized.iter().enumerate() {
            // First entry wins when two entries normalize identically.
            by_normalized.entry(norm.clone()).or_insert(idx);
        }

        Self {
            field: field.into(),
            entries,
            normalized,
            by_normalized,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in stored order, original casing.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Normalized entries, parallel to `entries`.
    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    /// Position of an already-normalized value, if present.
    pub fn position_of_normalized(&self, norm: &str) -> Option<usize> {
        self.by_normalized.get(norm).copied()
    }

    /// Integer code of an original-cased entry.
    pub fn encode(&self, entry: &str) -> Option<usize> {
        self.entries.binary_search_by(|e| e.as_str().cmp(entry)).ok()
    }

    /// Up to `n` entries, for error messages.
    pub fn sample(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_dedup_order() {
        let vocab = CategoricalVocabulary::new("make", ["toyota", "bmw", "toyota", "audi"]);
        assert_eq!(vocab.entries(), &["audi", "bmw", "toyota"]);
        assert_eq!(vocab.encode("bmw"), Some(1));
    }

    #[test]
    fn test_normalized_lookup_keeps_original_casing() {
        let vocab = CategoricalVocabulary::new("gear", ["Automatic", "Manual"]);
        let idx = vocab.position_of_normalized("automatic").unwrap();
        assert_eq!(vocab.entries()[idx], "Automatic");
    }

    #[test]
    fn test_encode_unknown() {
        let vocab = CategoricalVocabulary::new("fuel", ["diesel", "petrol"]);
        assert_eq!(vocab.encode("hydrogen"), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Brand NEW "), "brand new");
    }
}
