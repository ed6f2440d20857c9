//! Full cross-product expansion, for checking the indexed extractor.
//!
//! Output size is the derivation count, which is exponential in length for
//! most grammars. Only compiled for tests or with the `exhaustive` feature.

use crate::counter::Counter;
use crate::error::{Error, Result};
use crate::node::{RuleKey, SymbolKey};
use crate::token::Classifier;

impl<'g, C: Classifier> Counter<'g, C> {
    /// Expands every derivation of `symbol` at `length`.
    ///
    /// Strings come out in the same order as `string_at(symbol, length, i)`
    /// for `i` in `0..count`, duplicates included.
    ///
    /// # Errors
    ///
    /// `TooManyStrings` if the count exceeds the configured exhaustive limit.
    pub fn all_strings(&mut self, symbol: &str, length: usize) -> Result<Vec<String>> {
        let key = self.resolve(symbol, length)?;
        let count = self.symbols[key].count;
        let limit = self.config.exhaustive_limit;
        if count > limit {
            return Err(Error::TooManyStrings { count, limit });
        }
        Ok(self.expand_symbol(key))
    }
}

impl<'g, C> Counter<'g, C> {
    fn expand_symbol(&self, key: SymbolKey) -> Vec<String> {
        let node = &self.symbols[key];
        if node.count == 0 {
            return Vec::new();
        }
        if node.contributions.is_empty() {
            return vec![self.token_text(node.token).to_owned()];
        }
        node.contributions
            .iter()
            .flat_map(|&rule| self.expand_rule(rule))
            .collect()
    }

    fn expand_rule(&self, rule: RuleKey) -> Vec<String> {
        let mut strings = Vec::new();
        for &key in &self.rules[rule].partitions {
            let partition = &self.partitions[key];
            let heads = partition
                .head
                .map_or_else(|| vec![String::new()], |head| self.expand_symbol(head));
            let tails = partition
                .tail
                .map_or_else(|| vec![String::new()], |tail| self.expand_rule(tail));
            for head in &heads {
                for tail in &tails {
                    strings.push(format!("{head}{tail}"));
                }
            }
        }
        strings
    }
}
