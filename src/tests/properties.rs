use crate::{Counter, Error, Grammar};
use proptest::prelude::*;
use std::collections::HashMap;

type Definitions = Vec<(String, Vec<Vec<String>>)>;

const NONTERMINALS: usize = 3;

/// A terminal from a small alphabet, or a reference to one of the generated nonterminals.
fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(vec!["a", "b", "ab", "ba", "c"]).prop_map(String::from),
        2 => (0..NONTERMINALS).prop_map(|i| format!("<n{i}>")),
    ]
}

/// Exactly `NONTERMINALS` definitions, each with 1..4 rules of 0..4 tokens.
fn definitions() -> impl Strategy<Value = Definitions> {
    prop::collection::vec(
        prop::collection::vec(prop::collection::vec(token(), 0..4), 1..4),
        NONTERMINALS,
    )
    .prop_map(|defs| {
        defs.into_iter()
            .enumerate()
            .map(|(i, rules)| (format!("<n{i}>"), rules))
            .collect()
    })
}

fn sorted(mut strings: Vec<String>) -> Vec<String> {
    strings.sort();
    strings
}

fn sentence_grammar() -> Grammar {
    Grammar::from_rules([
        ("<start>", vec![vec!["<sentence>"]]),
        ("<sentence>", vec![vec!["<noun_phrase>", "<verb>"]]),
        ("<noun_phrase>", vec![vec!["<article>", "<noun>"]]),
        ("<noun>", vec![vec!["horse"], vec!["dog"], vec!["hamster"]]),
        ("<article>", vec![vec!["a"], vec!["the"]]),
        ("<verb>", vec![vec!["stands"], vec!["walks"], vec!["jumps"]]),
    ])
    .unwrap()
}

proptest! {
    /// Property 1: Count agrees with exhaustive expansion
    /// Duplicates from ambiguous grammars are counted on both sides.
    #[test]
    fn prop_count_matches_expansion(defs in definitions(), length in 0usize..7) {
        // Generated grammars with same-length cycles are rejected at construction
        let Ok(grammar) = Grammar::from_rules(defs) else { return Ok(()); };
        let mut counter = Counter::new(&grammar);

        let count = counter.count("<n0>", length).unwrap();
        match counter.all_strings("<n0>", length) {
            Ok(all) => {
                prop_assert_eq!(all.len() as u128, count);
            }
            Err(Error::TooManyStrings { .. }) => {}
            Err(e) => {
                prop_assert!(false, "unexpected error {}", e);
            }
        }
    }

    /// Property 2: Every extracted string has exactly the requested length
    #[test]
    fn prop_extracted_length(defs in definitions(), length in 0usize..8) {
        let Ok(grammar) = Grammar::from_rules(defs) else { return Ok(()); };
        let mut counter = Counter::new(&grammar);

        let key = counter.resolve("<n0>", length).unwrap();
        for s in counter.strings(key).unwrap().take(200) {
            prop_assert_eq!(s.chars().count(), length);
        }
    }

    /// Property 3: Indexed extraction is a bijection onto the expansion
    /// Compared as multisets, and also as sequences since both walk the same order.
    #[test]
    fn prop_bijection(defs in definitions(), length in 0usize..6) {
        let Ok(grammar) = Grammar::from_rules(defs) else { return Ok(()); };
        let mut counter = Counter::new(&grammar);

        let Ok(all) = counter.all_strings("<n0>", length) else { return Ok(()); };
        let count = counter.count("<n0>", length).unwrap();
        let indexed: Vec<String> = (0..count)
            .map(|i| counter.string_at("<n0>", length, i).unwrap())
            .collect();

        prop_assert_eq!(sorted(indexed.clone()), sorted(all.clone()));
        prop_assert_eq!(indexed, all);
    }

    /// Property 4: Cache transparency
    /// A counter warmed on other lengths and symbols answers like a fresh one.
    #[test]
    fn prop_warm_cache_matches_fresh(defs in definitions(), length in 0usize..7) {
        let Ok(grammar) = Grammar::from_rules(defs) else { return Ok(()); };

        let mut fresh = Counter::new(&grammar);
        let fresh_count = fresh.count("<n0>", length).unwrap();

        let mut warm = Counter::new(&grammar);
        for other in 0..8 {
            for symbol in ["<n1>", "<n2>", "<n0>"] {
                warm.count(symbol, other).unwrap();
            }
        }
        prop_assert_eq!(warm.count("<n0>", length).unwrap(), fresh_count);

        for i in (0..fresh_count).take(50) {
            prop_assert_eq!(
                warm.string_at("<n0>", length, i).unwrap(),
                fresh.string_at("<n0>", length, i).unwrap()
            );
        }
    }

    /// Property 5: Out-of-range indices always fail, never return a value
    #[test]
    fn prop_out_of_range(defs in definitions(), length in 0usize..7, extra in 0u128..1000) {
        let Ok(grammar) = Grammar::from_rules(defs) else { return Ok(()); };
        let mut counter = Counter::new(&grammar);

        let count = counter.count("<n0>", length).unwrap();
        let result = counter.string_at("<n0>", length, count + extra);
        if count == 0 {
            let is_no_derivation = matches!(result, Err(Error::NoDerivation { .. }));
            prop_assert!(is_no_derivation);
        } else {
            let is_out_of_range = matches!(result, Err(Error::OutOfRange { .. }));
            prop_assert!(is_out_of_range);
        }
    }

    /// Property 6: Samples are drawn from the expansion
    #[test]
    fn prop_sample_in_language(defs in definitions(), length in 1usize..6, seed in any::<u64>()) {
        use rand::SeedableRng;

        let Ok(grammar) = Grammar::from_rules(defs) else { return Ok(()); };
        let mut counter = Counter::new(&grammar);
        let Ok(all) = counter.all_strings("<n0>", length) else { return Ok(()); };

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        match counter.sample("<n0>", length, &mut rng) {
            Ok(s) => {
                prop_assert!(all.contains(&s));
            }
            Err(Error::NoDerivation { .. }) => {
                prop_assert!(all.is_empty());
            }
            Err(e) => {
                prop_assert!(false, "unexpected error {}", e);
            }
        }
    }
}

/// Bolero fuzz test: No panics on arbitrary length and index
#[cfg(test)]
#[test]
fn fuzz_no_panic() {
    let grammar = sentence_grammar();
    bolero::check!()
        .with_type::<(u8, u64)>()
        .for_each(|&(length, index)| {
            let mut counter = Counter::new(&grammar);
            let length = length as usize;
            let index = index as u128;

            let count = counter.count("<start>", length).unwrap();
            match counter.string_at("<start>", length, index) {
                Ok(s) => {
                    assert!(index < count);
                    assert_eq!(s.chars().count(), length);
                }
                Err(Error::OutOfRange { .. }) => assert!(count > 0 && index >= count),
                Err(Error::NoDerivation { .. }) => assert_eq!(count, 0),
                Err(e) => panic!("unexpected error {e}"),
            }
        });
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Splits a sentence back into article + noun + verb.
    fn decompose(s: &str) -> Option<(&str, &str, &str)> {
        let articles = ["a", "the"];
        let nouns = ["horse", "dog", "hamster"];
        let verbs = ["stands", "walks", "jumps"];

        for article in articles {
            let Some(rest) = s.strip_prefix(article) else { continue };
            for noun in nouns {
                let Some(verb) = rest.strip_prefix(noun) else { continue };
                if verbs.contains(&verb) {
                    return Some((article, noun, verb));
                }
            }
        }
        None
    }

    #[test]
    fn test_sentences_of_length_eleven_decompose() {
        let grammar = sentence_grammar();
        let mut counter = Counter::new(&grammar);
        let count = counter.count("<start>", 11).unwrap();
        assert!(count > 0);

        for i in 0..count {
            let s = counter.string_at("<start>", 11, i).unwrap();
            assert_eq!(s.len(), 11);
            assert!(decompose(&s).is_some(), "{s} does not decompose");
        }
    }

    #[test]
    fn test_every_length_matches_brute_force() {
        let grammar = sentence_grammar();
        let mut counter = Counter::new(&grammar);

        // Brute force over the 18 sentences
        let mut by_length: HashMap<usize, u128> = HashMap::new();
        for article in ["a", "the"] {
            for noun in ["horse", "dog", "hamster"] {
                for verb in ["stands", "walks", "jumps"] {
                    *by_length
                        .entry(article.len() + noun.len() + verb.len())
                        .or_default() += 1;
                }
            }
        }

        for length in 0..20 {
            let expected = by_length.get(&length).copied().unwrap_or(0);
            assert_eq!(counter.count("<start>", length).unwrap(), expected, "length {length}");
        }
        let total: u128 = (0..20).map(|l| counter.count("<start>", l).unwrap()).sum();
        assert_eq!(total, 18);
    }

    #[test]
    fn test_ambiguous_grammar_repeats_strings() {
        // `<e> <e>` splits "xxx" two ways
        let grammar = Grammar::from_rules([
            ("<s>", vec![vec!["<e>", "<e>"]]),
            ("<e>", vec![vec!["x"], vec!["x", "<e>"]]),
        ])
        .unwrap();
        let mut counter = Counter::new(&grammar);
        assert_eq!(counter.count("<s>", 3).unwrap(), 2);
        assert_eq!(counter.all_strings("<s>", 3).unwrap(), vec!["xxx", "xxx"]);
    }
}
