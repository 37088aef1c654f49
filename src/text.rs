//! Text normalization for message content.
//!
//! [`Normalizer`] rewrites raw message text into the canonical lowercase,
//! sentinel-tokenized form the rest of the pipeline operates on. The rewrite
//! runs in a fixed order — later steps assume the canonical forms produced by
//! earlier ones:
//!
//! 1. Non-breaking spaces, carriage returns and tabs become plain spaces
//! 2. The whole string is lowercased
//! 3. Per word: contractions are expanded (`it's` → `it is`), the word is
//!    re-lowercased, and known abbreviations are rewritten (`e.g` → `example`,
//!    `vs` → `versus`, `i.e` → `that is`)
//! 4. Digit runs become the sentinel `NUM`
//! 5. Runs of `?`, `!`, `.` become the sentinel `SENT_END`
//! 6. `é`/`è` become `e`
//! 7. Any remaining non-alphabetic run becomes a single space
//!
//! Abbreviation rewriting is whole-word: a token like `vsat` is left alone.
//!
//! [`Normalizer::collapse_repeats`] is the second pass applied while fragments
//! are aggregated: it collapses whitespace, drops ordinal suffixes after `NUM`
//! (`NUM th` → `NUM`) and folds runs of repeated sentinels into one.

use std::collections::HashMap;

use regex::Regex;

/// Sentinel standing in for any digit run.
pub const NUM: &str = "NUM";

/// Sentinel standing in for any sentence-ending punctuation run.
pub const SENT_END: &str = "SENT_END";

/// Internal spelling of [`SENT_END`] used between steps 5 and 8.
///
/// The non-alphabetic sweep in step 7 would split `SENT_END` at the
/// underscore, so the sentinel travels as `SENTEND` until the final rename.
const SENT_END_RAW: &str = "SENTEND";

/// Word-level contraction expansions.
///
/// Matched against a word after lowercasing, with surrounding punctuation
/// stripped. Irregular forms only; regular `n't`/`'re`/... endings are
/// handled by suffix rules.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "are not"),
    ("can't", "cannot"),
    ("cannot've", "cannot have"),
    ("can't've", "cannot have"),
    ("'cause", "because"),
    ("gonna", "going to"),
    ("gotta", "got to"),
    ("let's", "let us"),
    ("ma'am", "madam"),
    ("o'clock", "of the clock"),
    ("shan't", "shall not"),
    ("wanna", "want to"),
    ("won't", "will not"),
    ("won't've", "will not have"),
    ("y'all", "you all"),
];

/// Regular contraction endings, tried longest-first.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("n't've", " not have"),
    ("n't", " not"),
    ("'re", " are"),
    ("'ve", " have"),
    ("'ll", " will"),
    ("'d", " would"),
    ("'m", " am"),
    ("'s", " is"),
];

/// Whole-word abbreviation rewrites applied after contraction expansion.
const ABBREVIATIONS: &[(&str, &str)] = &[("e.g", "example"), ("vs", "versus"), ("i.e", "that is")];

/// Stateless (per input) multi-stage text rewriter.
///
/// Compiling the pattern set is not free, so build one `Normalizer` and reuse
/// it for a whole channel; it is cheap to share immutably across threads.
///
/// # Example
///
/// ```rust
/// use chatscrub::text::Normalizer;
///
/// let normalizer = Normalizer::new();
/// let cleaned = normalizer.normalize("I'm happy!! 2 times");
/// assert_eq!(normalizer.collapse_repeats(&cleaned), "i am happy SENT_END NUM times");
/// ```
pub struct Normalizer {
    contractions: HashMap<&'static str, &'static str>,
    digits: Regex,
    sentence_end: Regex,
    non_alpha: Regex,
    whitespace: Regex,
    num_run: Regex,
    sent_end_run: Regex,
    newline_run: Regex,
}

impl Normalizer {
    /// Builds a normalizer with its pattern set compiled.
    pub fn new() -> Self {
        Self {
            contractions: CONTRACTIONS.iter().copied().collect(),
            digits: Regex::new(r"[0-9]+").unwrap(),
            sentence_end: Regex::new(r"[?!.]+").unwrap(),
            non_alpha: Regex::new(r"[^A-Za-z]+").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            num_run: Regex::new(r"(NUM *)+").unwrap(),
            sent_end_run: Regex::new(r"(SENT_END *)+").unwrap(),
            newline_run: Regex::new(r"(\n *)+").unwrap(),
        }
    }

    /// Rewrites raw text into canonical sentinel-tokenized form.
    ///
    /// Never fails; the worst case is an empty string.
    pub fn normalize(&self, raw: &str) -> String {
        let text = raw.replace(['\u{a0}', '\r', '\t'], " ");
        let text = text.to_lowercase();

        // Word-wise rewrite: contractions first, then abbreviations.
        let text = text
            .split_whitespace()
            .map(|word| self.rewrite_word(word))
            .collect::<Vec<_>>()
            .join(" ");

        let text = self.digits.replace_all(&text, " NUM ");
        let text = self.sentence_end.replace_all(&text, " SENTEND ");
        let text = text.replace(['é', 'è'], "e");
        let text = self.non_alpha.replace_all(&text, " ");

        text.replace(SENT_END_RAW, SENT_END)
    }

    /// Collapses whitespace, ordinal suffixes and repeated sentinel runs.
    ///
    /// Applied cumulatively while fragments are concatenated, so sentinel
    /// runs never grow unbounded across leaves, and once more over the final
    /// aggregate.
    pub fn collapse_repeats(&self, text: &str) -> String {
        let text = self.whitespace.replace_all(text, " ");

        // Ordinals directly after the number sentinel carry no content.
        let text = text
            .replace("NUM th", NUM)
            .replace("NUM st", NUM)
            .replace("NUM nd", NUM);

        let text = self.num_run.replace_all(&text, " NUM ");
        let text = self.sent_end_run.replace_all(&text, " SENT_END ");
        let text = self.newline_run.replace_all(&text, " \n ");

        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    /// Expands one whitespace-delimited word.
    ///
    /// The word is split into a trailing punctuation shell and a core; only
    /// the core is rewritten. Expansion may reintroduce mixed case, so the
    /// result is lowercased again.
    fn rewrite_word(&self, word: &str) -> String {
        let normalized = word.replace('\u{2019}', "'");
        let core_end = normalized
            .rfind(|c: char| c.is_ascii_alphabetic())
            .map_or(0, |i| i + 1);
        let (core, tail) = normalized.split_at(core_end);

        let expanded = self.expand_contraction(core).to_lowercase();
        let substituted = substitute_abbreviation(&expanded);

        format!("{substituted}{tail}")
    }

    /// Looks up the contraction table, then the suffix rules.
    fn expand_contraction(&self, core: &str) -> String {
        if let Some(expansion) = self.contractions.get(core) {
            return (*expansion).to_string();
        }
        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = core.strip_suffix(suffix) {
                if !stem.is_empty() {
                    return format!("{stem}{replacement}");
                }
            }
        }
        core.to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrites a word core that is a known abbreviation.
///
/// Whole-word comparison after stripping a single trailing dot; superstrings
/// like `vsat` are left alone.
fn substitute_abbreviation(word: &str) -> String {
    let bare = word.strip_suffix('.').unwrap_or(word);
    for (abbrev, replacement) in ABBREVIATIONS {
        if bare == *abbrev {
            return (*replacement).to_string();
        }
    }
    word.to_string()
}
