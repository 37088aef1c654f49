//! Category dictionary loading and lookup.
//!
//! The linguistic dictionary is a CSV file whose header row lists category
//! names and whose body rows list, column by column, the terms belonging to
//! each category. A term is either an exact word (`happy`) or a prefix
//! pattern marked with a trailing wildcard (`happi.*`); prefix patterns are
//! reduced to their linguistic stem before indexing so that lookup can match
//! any token sharing the stem.
//!
//! The dictionary is loaded once per run, before any message processing, and
//! is immutable afterwards. A missing or empty header row is fatal — no
//! message can be profiled without category names.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_stemmers::{Algorithm, Stemmer};

use crate::error::{Result, ScrubError};

/// Wildcard marker on prefix terms.
const PREFIX_MARKER: &str = ".*";

/// Immutable word/category index built from a dictionary CSV.
///
/// Two lookup structures are kept: exact term → categories and stemmed
/// prefix → categories. [`categories_for_token`](Self::categories_for_token)
/// unions both match types.
///
/// # Example
///
/// ```rust,no_run
/// use chatscrub::dictionary::CategoryDictionary;
///
/// let dictionary = CategoryDictionary::load("liwc2007dictionary.csv")?;
/// let cats = dictionary.categories_for_token("happy");
/// # Ok::<(), chatscrub::ScrubError>(())
/// ```
pub struct CategoryDictionary {
    exact: std::collections::HashMap<String, Vec<String>>,
    prefixes: std::collections::HashMap<String, Vec<String>>,
    stemmer: Stemmer,
}

impl CategoryDictionary {
    /// Loads the dictionary from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file).map_err(|err| match err {
            // Attach the path to format errors for a usable message.
            ScrubError::DictionaryFormat { message, .. } => {
                ScrubError::dictionary_format(message, Some(path.to_path_buf()))
            }
            other => other,
        })
    }

    /// Builds the dictionary from any CSV source.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header: Vec<String> = csv_reader
            .headers()
            .map_err(|_| ScrubError::dictionary_format("missing header row", None))?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        if header.is_empty() || header.iter().all(String::is_empty) {
            return Err(ScrubError::dictionary_format("empty header row", None));
        }

        let stemmer = Stemmer::create(Algorithm::English);
        let mut exact = std::collections::HashMap::new();
        let mut prefixes = std::collections::HashMap::new();

        for row in csv_reader.records() {
            let row = row?;
            for (category, cell) in header.iter().zip(row.iter()) {
                let term = cell.trim().to_lowercase();
                if term.is_empty() || category.is_empty() {
                    continue;
                }
                if term.contains(PREFIX_MARKER) {
                    let prefix = term.replace(PREFIX_MARKER, "");
                    let stem = stemmer.stem(&prefix).to_string();
                    prefixes
                        .entry(stem)
                        .or_insert_with(Vec::new)
                        .push(category.clone());
                } else {
                    exact
                        .entry(term)
                        .or_insert_with(Vec::new)
                        .push(category.clone());
                }
            }
        }

        Ok(Self {
            exact,
            prefixes,
            stemmer,
        })
    }

    /// Returns the categories a token belongs to.
    ///
    /// Exact matches come first, then stem matches against prefix terms;
    /// duplicates are removed preserving first occurrence. Tokens matching
    /// nothing yield an empty list.
    pub fn categories_for_token(&self, token: &str) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        if let Some(cats) = self.exact.get(token) {
            categories.extend(cats.iter().cloned());
        }
        let stem = self.stemmer.stem(token);
        if let Some(cats) = self.prefixes.get(stem.as_ref()) {
            categories.extend(cats.iter().cloned());
        }
        let mut seen = std::collections::HashSet::new();
        categories.retain(|cat| seen.insert(cat.clone()));
        categories
    }

    /// Number of exact terms indexed.
    pub fn exact_terms(&self) -> usize {
        self.exact.len()
    }

    /// Number of stemmed prefix terms indexed.
    pub fn prefix_terms(&self) -> usize {
        self.prefixes.len()
    }
}

impl fmt::Debug for CategoryDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryDictionary")
            .field("exact", &self.exact.len())
            .field("prefixes", &self.prefixes.len())
            .finish_non_exhaustive()
    }
}
