use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Controls the closeness/quantity of returned spelling suggestions.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Verbosity {
    /// Top suggestion with the highest term frequency of the suggestions of
    /// smallest edit distance found.
    Top,
    /// All suggestions of smallest edit distance found, suggestions ordered
    /// by term frequency.
    Closest,
    /// All suggestions within max_edit_distance, suggestions ordered by edit
    /// distance, then by term frequency (slower, no early termination).
    All,
}

/// Spelling suggestion returned from lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested correctly spelled word.
    pub term: String,
    /// Edit distance between searched for word and suggestion.
    pub distance: i64,
    /// Frequency of suggestion in the dictionary (a measure of how common
    /// the word is).
    pub count: u64,
}

impl Suggestion {
    pub fn empty() -> Suggestion {
        Suggestion {
            term: String::new(),
            distance: 0,
            count: 0,
        }
    }

    pub fn new(term: impl Into<String>, distance: i64, count: u64) -> Suggestion {
        Suggestion {
            term: term.into(),
            distance,
            count,
        }
    }
}

// Order by distance ascending, then by frequency count descending, then by
// term ascending. The term tie-break keeps result ordering deterministic
// regardless of bucket insertion order.
impl Ord for Suggestion {
    fn cmp(&self, other: &Suggestion) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| self.term.cmp(&other.term))
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Suggestion) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Suggestion) -> bool {
        self.term == other.term && self.distance == other.distance && self.count == other.count
    }
}

impl Eq for Suggestion {}
