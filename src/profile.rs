//! Per-message linguistic category profiling.
//!
//! Maps the scrubbed content's tokens onto dictionary categories and counts
//! how often each category occurs across the whole message. The resulting
//! profile is ordered by descending count; categories with equal counts keep
//! the order in which they were first encountered during counting.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::dictionary::CategoryDictionary;

/// Frequency-ranked category counts for one message.
///
/// Serializes as a JSON object whose keys appear in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryProfile(Vec<(String, u64)>);

impl CategoryProfile {
    /// Number of distinct categories attributed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category matched at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The count for a category, zero when absent.
    pub fn count(&self, category: &str) -> u64 {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Iterates `(category, count)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl Serialize for CategoryProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, count) in &self.0 {
            map.serialize_entry(category, count)?;
        }
        map.end()
    }
}

/// Counts category occurrences across a token sequence.
///
/// Each token contributes every category the dictionary attributes to it.
/// An empty token sequence yields an empty profile.
pub fn profile<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
    dictionary: &CategoryDictionary,
) -> CategoryProfile {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for token in tokens {
        for category in dictionary.categories_for_token(token) {
            match counts.iter_mut().find(|(name, _)| *name == category) {
                Some((_, count)) => *count += 1,
                None => counts.push((category, 1)),
            }
        }
    }
    // stable sort: ties keep first-encountered order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    CategoryProfile(counts)
}
