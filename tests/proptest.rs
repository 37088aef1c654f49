//! Property-based tests for chatscrub.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;

use chatscrub::pseudonym::{contains_sentinel, keyed_digest, pseudonymize, HashRegistry};
use chatscrub::text::Normalizer;

/// Generate a random raw message text using fast strategies (no regex!)
fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "hello".to_string(),
            "I'm".to_string(),
            "can't".to_string(),
            "really?!".to_string(),
            "42".to_string(),
            "2nd".to_string(),
            "e.g.".to_string(),
            "vs".to_string(),
            "café".to_string(),
            "NUM".to_string(),
            "...".to_string(),
            "a+b=c".to_string(),
            "Привет".to_string(),
            "🎉🔥".to_string(),
            String::new(),
            "   ".to_string(),
        ]),
        0..12,
    )
    .prop_map(|words| words.join(" "))
}

/// Generate text whose normalization introduces no sentinel tokens
/// (no digits, no sentence punctuation). Normalize is only idempotent on
/// sentinel-clean text: a second pass would lowercase `NUM` / `SENT_END`.
fn arb_sentinel_free_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "hello".to_string(),
            "I'm".to_string(),
            "can't".to_string(),
            "vs".to_string(),
            "café".to_string(),
            "a+b=c".to_string(),
            "Привет".to_string(),
            "🎉🔥".to_string(),
            String::new(),
        ]),
        0..12,
    )
    .prop_map(|words| words.join(" "))
}

/// Generate a seed string.
fn arb_seed() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "s1".to_string(),
        "seed-2021".to_string(),
        "0".to_string(),
        String::new(),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // NORMALIZER PROPERTIES
    // ============================================

    /// Normalized + collapsed output only ever contains lowercase ascii
    /// letters, spaces and the uppercase sentinels.
    #[test]
    fn normalize_output_alphabet(text in arb_text()) {
        let n = Normalizer::new();
        let out = n.collapse_repeats(&n.normalize(&text));
        for token in out.split_whitespace() {
            prop_assert!(
                token == "NUM"
                    || token == "SENT_END"
                    || token.chars().all(|c| c.is_ascii_lowercase()),
                "unexpected token {token:?} in {out:?}"
            );
        }
    }

    /// Digits never survive normalization.
    #[test]
    fn normalize_removes_digits(text in arb_text()) {
        let n = Normalizer::new();
        let out = n.normalize(&text);
        prop_assert!(!out.chars().any(|c| c.is_ascii_digit()));
    }

    /// A second normalize + collapse pass is a no-op on sentinel-clean text.
    #[test]
    fn normalize_collapse_idempotent(text in arb_sentinel_free_text()) {
        let n = Normalizer::new();
        let once = n.collapse_repeats(&n.normalize(&text));
        let twice = n.collapse_repeats(&n.normalize(&once));
        prop_assert_eq!(once, twice);
    }

    /// collapse_repeats alone is idempotent.
    #[test]
    fn collapse_repeats_idempotent(text in arb_text()) {
        let n = Normalizer::new();
        let once = n.collapse_repeats(&text);
        prop_assert_eq!(n.collapse_repeats(&once), once.clone());
    }

    /// Collapsed output never carries sentinel runs.
    #[test]
    fn no_sentinel_runs_after_collapse(text in arb_text()) {
        let n = Normalizer::new();
        let out = n.collapse_repeats(&n.normalize(&text));
        prop_assert!(!out.contains("NUM NUM"));
        prop_assert!(!out.contains("SENT_END SENT_END"));
    }

    // ============================================
    // PSEUDONYMIZER PROPERTIES
    // ============================================

    /// Same token + same seed -> same digest, always.
    #[test]
    fn digest_deterministic(text in arb_text(), seed in arb_seed()) {
        let n = Normalizer::new();
        let content = n.collapse_repeats(&n.normalize(&text));

        let mut reg_a = HashRegistry::new();
        let mut reg_b = HashRegistry::new();
        let out_a = pseudonymize(&content, &mut reg_a, &seed);
        let out_b = pseudonymize(&content, &mut reg_b, &seed);

        prop_assert_eq!(out_a.hashed, out_b.hashed);
        prop_assert_eq!(reg_a, reg_b);
    }

    /// Sentinel-bearing tokens are never registered (never hashed).
    #[test]
    fn sentinels_never_hashed(text in arb_text(), seed in arb_seed()) {
        let n = Normalizer::new();
        let content = n.collapse_repeats(&n.normalize(&text));

        let mut registry = HashRegistry::new();
        pseudonymize(&content, &mut registry, &seed);

        for (token, _) in registry.iter() {
            prop_assert!(!contains_sentinel(token));
        }
    }

    /// Every registered digest is 8 lowercase hex characters and matches a
    /// fresh computation.
    #[test]
    fn digests_are_eight_hex(text in arb_text(), seed in arb_seed()) {
        let n = Normalizer::new();
        let content = n.collapse_repeats(&n.normalize(&text));

        let mut registry = HashRegistry::new();
        pseudonymize(&content, &mut registry, &seed);

        for (token, digest) in registry.iter() {
            prop_assert_eq!(digest.len(), 8);
            prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
            prop_assert_eq!(digest, keyed_digest(token, &seed));
        }
    }

    /// The registry only ever grows and existing digests never change.
    #[test]
    fn registry_monotonic(texts in prop::collection::vec(arb_text(), 1..6), seed in arb_seed()) {
        let n = Normalizer::new();
        let mut registry = HashRegistry::new();
        let mut snapshot: Vec<(String, String)> = Vec::new();

        for text in texts {
            let content = n.collapse_repeats(&n.normalize(&text));
            pseudonymize(&content, &mut registry, &seed);

            // every previously seen entry is still there, unchanged
            for (token, digest) in &snapshot {
                prop_assert_eq!(registry.digest_for(token), Some(digest.as_str()));
            }
            prop_assert!(registry.len() >= snapshot.len());

            snapshot = registry
                .iter()
                .map(|(t, d)| (t.to_string(), d.to_string()))
                .collect();
        }
    }

    /// The anonymized output never contains a registered raw token.
    #[test]
    fn raw_tokens_absent_from_output(text in arb_text(), seed in arb_seed()) {
        let n = Normalizer::new();
        let content = n.collapse_repeats(&n.normalize(&text));

        let mut registry = HashRegistry::new();
        let out = pseudonymize(&content, &mut registry, &seed);
        let emitted: Vec<&str> = out.hashed.split_whitespace().collect();

        for (token, _) in registry.iter() {
            prop_assert!(!emitted.contains(&token));
        }
    }

    // ============================================
    // MERGE PROPERTIES
    // ============================================

    /// Merging registries built from the same seed is order-independent.
    #[test]
    fn merge_commutative_for_fixed_seed(
        text_a in arb_text(),
        text_b in arb_text(),
        seed in arb_seed(),
    ) {
        let n = Normalizer::new();
        let content_a = n.collapse_repeats(&n.normalize(&text_a));
        let content_b = n.collapse_repeats(&n.normalize(&text_b));

        let mut reg_a = HashRegistry::new();
        let mut reg_b = HashRegistry::new();
        pseudonymize(&content_a, &mut reg_a, &seed);
        pseudonymize(&content_b, &mut reg_b, &seed);

        let mut ab = reg_a.clone();
        ab.merge(reg_b.clone());
        let mut ba = reg_b;
        ba.merge(reg_a);

        prop_assert_eq!(ab, ba);
    }
}
