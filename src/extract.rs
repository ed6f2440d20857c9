use crate::counter::Counter;
use crate::error::{Error, Result};
use crate::node::{RuleKey, SymbolKey};
use crate::token::Classifier;
use rand::Rng;

impl<'g, C: Classifier> Counter<'g, C> {
    /// Returns derivation number `index` of `symbol` at `length`.
    ///
    /// Derivations are numbered by rule in declared order, then by head length
    /// in increasing order, then head-major: within one split, consecutive
    /// indices walk the tail first.
    ///
    /// # Errors
    ///
    /// - `NoDerivation` if the symbol has no derivation of that length.
    /// - `OutOfRange` if `index >= count`.
    pub fn string_at(&mut self, symbol: &str, length: usize, index: u128) -> Result<String> {
        let key = self.resolve(symbol, length)?;
        self.extract(key, index)
    }

    /// Draws one derivation of `symbol` at `length` uniformly at random.
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        symbol: &str,
        length: usize,
        rng: &mut R,
    ) -> Result<String> {
        let key = self.resolve(symbol, length)?;
        let node = &self.symbols[key];
        if node.count == 0 {
            return Err(Error::NoDerivation {
                symbol: symbol.to_owned(),
                length,
            });
        }
        let index = rng.random_range(0..node.count);
        self.extract(key, index)
    }
}

impl<'g, C> Counter<'g, C> {
    /// Read-only extraction from an already resolved node.
    ///
    /// Cost is proportional to the number of tokens in the chosen derivation.
    pub fn extract(&self, key: SymbolKey, index: u128) -> Result<String> {
        let node = self.node(key)?;
        if node.count == 0 {
            return Err(Error::NoDerivation {
                symbol: self.token_text(node.token).to_owned(),
                length: node.length,
            });
        }
        if index >= node.count {
            return Err(Error::OutOfRange {
                index,
                count: node.count,
            });
        }

        let mut out = String::with_capacity(node.length);
        self.write_symbol(key, index, &mut out);
        Ok(out)
    }

    fn write_symbol(&self, key: SymbolKey, index: u128, out: &mut String) {
        let node = &self.symbols[key];
        if node.contributions.is_empty() {
            // Terminal with a matching width
            debug_assert_eq!(index, 0);
            out.push_str(self.token_text(node.token));
            return;
        }

        let mut offset = 0;
        for &rule in &node.contributions {
            let count = self.rules[rule].count;
            if index < offset + count {
                self.write_rule(rule, index - offset, out);
                return;
            }
            offset += count;
        }
        unreachable!("index {index} not covered by symbol contributions");
    }

    fn write_rule(&self, rule: RuleKey, index: u128, out: &mut String) {
        let mut offset = 0;
        for &key in &self.rules[rule].partitions {
            let partition = &self.partitions[key];
            if index < offset + partition.count {
                let local = index - offset;
                let tail_count = partition.tail.map_or(1, |tail| self.rules[tail].count);
                if let Some(head) = partition.head {
                    let start = out.len();
                    self.write_symbol(head, local / tail_count, out);
                    debug_assert_eq!(out[start..].chars().count(), partition.head_len);
                }
                if let Some(tail) = partition.tail {
                    self.write_rule(tail, local % tail_count, out);
                }
                return;
            }
            offset += partition.count;
        }
        unreachable!("index {index} not covered by rule partitions");
    }
}
