//! # lencount - Length-Indexed Derivation Counting
//!
//! Counts the derivations of exactly `n` characters a context-free grammar
//! admits from a symbol, and maps any index in `[0, count)` back to its
//! string, without enumerating the language.
//!
//! This is what makes length-constrained grammar fuzzing uniform: draw an
//! index at random, extract it, and every derivation of that length is
//! equally likely.
//!
//! ## Example
//!
//! ```
//! use lencount_rs::{Counter, Grammar};
//!
//! let grammar = Grammar::from_rules([
//!     ("<sentence>", vec![vec!["<noun_phrase>", "<verb>"]]),
//!     ("<noun_phrase>", vec![vec!["<article>", "<noun>"]]),
//!     ("<article>", vec![vec!["a"], vec!["the"]]),
//!     ("<noun>", vec![vec!["horse"], vec!["dog"], vec!["hamster"]]),
//!     ("<verb>", vec![vec!["stands"], vec!["walks"], vec!["jumps"]]),
//! ])
//! .unwrap();
//!
//! let mut counter = Counter::new(&grammar);
//! let count = counter.count("<sentence>", 11).unwrap();
//! assert_eq!(count, 4);
//!
//! let s = counter.string_at("<sentence>", 11, 2).unwrap();
//! assert_eq!(s, "thedogwalks");
//!
//! let sampled = counter.sample("<sentence>", 11, &mut rand::rng()).unwrap();
//! assert_eq!(sampled.len(), 11);
//! ```
//!
//! ## Semantics
//!
//! - Lengths are measured in `char`s.
//! - Derivations, not distinct strings, are counted. An ambiguous grammar
//!   yields the same string at several indices.
//! - Empty rules derive the empty string at length 0.
//! - Any terminal text can be counted, even one the grammar never uses.
//!
//! ## Performance
//!
//! - O(grammar size x length) symbol nodes, O(grammar size x length^2)
//!   partition nodes per top-level request, all memoized
//! - Extraction is proportional to the number of tokens in the derivation
//! - Nodes live in slot-map arenas and are shared as a DAG

mod config;
mod counter;
mod error;
#[cfg(any(test, feature = "exhaustive"))]
mod exhaustive;
mod extract;
mod grammar;
mod interner;
mod iter;
mod node;
mod token;

#[cfg(test)]
mod tests;

pub use config::CounterConfig;
pub use counter::{CacheStats, Counter};
pub use error::{Error, Result};
pub use grammar::{Grammar, RuleRef, Rules};
pub use interner::TokenId;
pub use iter::DerivationIter;
pub use node::{SymbolKey, SymbolNode};
pub use token::{Classifier, Delimited, TokenKind};
