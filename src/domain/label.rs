// ============================================================
// Layer 3 — Label Set Domain Type
// ============================================================
// The ordered list of class names the model can predict.
// Index position corresponds to the model's output index,
// so the ordering is load-bearing: it must be identical
// between training and inference. The set is immutable after
// construction — there are no mutators.

use serde::{Deserialize, Serialize};

/// An ordered, fixed sequence of class names.
///
/// The length of a LabelSet equals the output dimensionality
/// of the model trained against it. The ordering comes from the
/// sorted corpus subdirectory names (or an explicit override)
/// and is persisted alongside the checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    /// Build a LabelSet from an ordered list of names.
    /// Accepts anything iterable over string-likes so callers
    /// can pass Vec<String>, &[&str], or an iterator directly.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Class name at a model output index, or None if out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Output index for a class name, or None if unknown.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// All names in output-index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}
