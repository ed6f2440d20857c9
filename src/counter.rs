use crate::config::CounterConfig;
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::interner::{Interner, TokenId};
use crate::node::{PartitionKey, PartitionNode, RuleKey, RuleNode, SymbolKey, SymbolNode};
use crate::token::{Classifier, Delimited, TokenKind};
use ahash::AHashMap as HashMap;
use slotmap::SlotMap;

/// Memoized derivation counter over one grammar.
///
/// Every (symbol, length) and (rule suffix, length) pair is computed once and
/// kept in slot-map arenas for the lifetime of the counter. Results form a
/// DAG: a node is shared by every parent that needs it. There is no eviction;
/// drop the counter (or call [`Counter::clear`]) when done with a grammar.
///
/// Counting takes `&mut self`. Once a result has been resolved, extraction
/// only needs `&self`, so a populated counter can serve any number of
/// concurrent readers.
///
/// Derivations are counted, not distinct strings: in an ambiguous grammar a
/// string reachable through two parses is counted (and indexed) twice.
///
/// # Example
///
/// ```
/// use lencount_rs::{Counter, Grammar};
///
/// let digits = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
/// let grammar = Grammar::from_rules([
///     ("<pair>", vec![vec!["<digit>", "<digit>"]]),
///     ("<digit>", digits.iter().map(|d| vec![*d]).collect()),
/// ])
/// .unwrap();
///
/// let mut counter = Counter::new(&grammar);
/// assert_eq!(counter.count("<pair>", 2).unwrap(), 100);
/// assert_eq!(counter.string_at("<pair>", 2, 42).unwrap(), "42");
/// ```
pub struct Counter<'g, C = Delimited> {
    pub(crate) grammar: &'g Grammar<C>,
    pub(crate) config: CounterConfig,

    pub(crate) symbols: SlotMap<SymbolKey, SymbolNode>,
    pub(crate) rules: SlotMap<RuleKey, RuleNode>,
    pub(crate) partitions: SlotMap<PartitionKey, PartitionNode>,

    /// (symbol, length) -> node, including zero-count nodes.
    symbol_memo: HashMap<(TokenId, usize), SymbolKey>,

    /// length -> rule suffix -> breakdown. `None` caches "no derivations".
    rule_memo: HashMap<usize, HashMap<Box<[TokenId]>, Option<RuleKey>>>,

    /// Terminals asked about that never occur in the grammar. Ids continue
    /// after the grammar's own.
    extra_terminals: Option<Interner>,
}

impl<'g, C: Classifier> Counter<'g, C> {
    pub fn new(grammar: &'g Grammar<C>) -> Self {
        Self::with_config(grammar, CounterConfig::default())
    }

    pub fn with_config(grammar: &'g Grammar<C>, config: CounterConfig) -> Self {
        Self {
            grammar,
            config,
            symbols: SlotMap::with_key(),
            rules: SlotMap::with_key(),
            partitions: SlotMap::with_key(),
            symbol_memo: HashMap::new(),
            rule_memo: HashMap::new(),
            extra_terminals: None,
        }
    }

    /// Computes (or fetches) the derivations of `symbol` at `length` and
    /// returns a handle to the cached node.
    ///
    /// `symbol` may be any nonterminal of the grammar or any terminal text,
    /// whether or not it occurs in a rule. A terminal has one derivation at
    /// its own length.
    pub fn resolve(&mut self, symbol: &str, length: usize) -> Result<SymbolKey> {
        if let Some(max) = self.config.max_length {
            if length > max {
                return Err(Error::LengthLimit { length, max });
            }
        }
        if symbol.is_empty() {
            return Err(Error::InvalidToken);
        }
        let key = match self.grammar.token_id(symbol) {
            Some(id) => self.count_ascending(id, length)?,
            None if self.grammar.is_nonterminal(symbol)? => {
                return Err(Error::UndefinedSymbol(symbol.to_owned()));
            }
            None => self.count_extra_terminal(symbol, length)?,
        };
        log::debug!(
            "{} at length {}: {} derivations ({} symbol nodes cached)",
            symbol,
            length,
            self.symbols[key].count,
            self.symbols.len()
        );
        Ok(key)
    }

    /// Number of derivations of `symbol` at exactly `length` characters.
    pub fn count(&mut self, symbol: &str, length: usize) -> Result<u128> {
        let key = self.resolve(symbol, length)?;
        Ok(self.symbols[key].count)
    }

    /// Drops every cached result. Handles issued before become unknown.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.rules.clear();
        self.partitions.clear();
        self.symbol_memo.clear();
        self.rule_memo.clear();
        self.extra_terminals = None;
    }

    /// Counts `id` at every length up to `length`, shortest first.
    ///
    /// Recursion only reaches lengths that are not cached yet, so filling
    /// bottom-up keeps the stack depth bounded by rule sizes instead of
    /// growing with `length`.
    fn count_ascending(&mut self, id: TokenId, length: usize) -> Result<SymbolKey> {
        if let Some(&key) = self.symbol_memo.get(&(id, length)) {
            return Ok(key);
        }
        if !self.grammar.kind(id).is_nonterminal() {
            return self.count_symbol(id, length);
        }
        for shorter in 0..length {
            match self.count_symbol(id, shorter) {
                // Overflow below `length` only matters if `length` needs it
                Ok(_) | Err(Error::CountOverflow { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        self.count_symbol(id, length)
    }

    fn count_extra_terminal(&mut self, symbol: &str, length: usize) -> Result<SymbolKey> {
        let extra = match self.extra_terminals.take() {
            Some(extra) => extra,
            None => Interner::starting_at(self.grammar.token_count())?,
        };
        let id = self.extra_terminals.insert(extra).intern(symbol)?;
        if let Some(&key) = self.symbol_memo.get(&(id, length)) {
            return Ok(key);
        }

        let node = SymbolNode::terminal(id, length, symbol.chars().count() == length);
        let key = self.symbols.insert(node);
        self.symbol_memo.insert((id, length), key);
        Ok(key)
    }

    /// Counts one symbol at one length.
    pub(crate) fn count_symbol(&mut self, id: TokenId, length: usize) -> Result<SymbolKey> {
        if let Some(&key) = self.symbol_memo.get(&(id, length)) {
            return Ok(key);
        }
        log::trace!("count {} at {}", self.grammar.token_text(id), length);

        let grammar = self.grammar;
        let node = match grammar.kind(id) {
            TokenKind::Terminal { width } => SymbolNode::terminal(id, length, width == length),
            TokenKind::Nonterminal { index } => {
                let mut count: u128 = 0;
                let mut contributions = Vec::new();
                for rule in grammar.rules_at(index) {
                    let Some(rule_key) = self.count_rule(rule, length)? else {
                        continue;
                    };
                    count = count
                        .checked_add(self.rules[rule_key].count)
                        .ok_or_else(|| self.overflow(id, length))?;
                    contributions.push(rule_key);
                }
                SymbolNode::nonterminal(id, length, count, contributions)
            }
        };

        let key = self.symbols.insert(node);
        self.symbol_memo.insert((id, length), key);
        Ok(key)
    }

    /// Counts one rule suffix at one length.
    ///
    /// Returns `None` when the suffix has no derivation of that length.
    pub(crate) fn count_rule(
        &mut self,
        rule: &'g [TokenId],
        length: usize,
    ) -> Result<Option<RuleKey>> {
        if let Some(&cached) = self.rule_memo.get(&length).and_then(|m| m.get(rule)) {
            return Ok(cached);
        }

        let result = match rule {
            [] => {
                if length == 0 {
                    let partition = self.partitions.insert(PartitionNode::empty());
                    Some(self.rules.insert(RuleNode {
                        count: 1,
                        partitions: vec![partition],
                    }))
                } else {
                    None
                }
            }
            [only] => {
                let head = self.count_symbol(*only, length)?;
                let count = self.symbols[head].count;
                if count == 0 {
                    None
                } else {
                    let partition = self
                        .partitions
                        .insert(PartitionNode::new(head, length, None, count));
                    Some(self.rules.insert(RuleNode {
                        count,
                        partitions: vec![partition],
                    }))
                }
            }
            [first, tail @ ..] => self.count_splits(*first, tail, length)?,
        };

        self.rule_memo
            .entry(length)
            .or_default()
            .insert(rule.into(), result);
        Ok(result)
    }

    /// Enumerates every split of `length` between `head` and `tail`.
    ///
    /// A terminal head only takes its own width. A nonterminal head gets `p`
    /// characters for `p` in `1..=length`, and also `p = 0` when it can
    /// derive the empty string. A split where the tail would get zero
    /// characters is only tried if the tail is nullable.
    fn count_splits(
        &mut self,
        head: TokenId,
        tail: &'g [TokenId],
        length: usize,
    ) -> Result<Option<RuleKey>> {
        let grammar = self.grammar;
        let head_nullable = grammar.token_nullable(head);
        let tail_nullable = tail.iter().all(|&t| grammar.token_nullable(t));
        let (shortest, longest) = match grammar.kind(head) {
            TokenKind::Terminal { width } => (width, width.min(length)),
            TokenKind::Nonterminal { .. } => (0, length),
        };

        let mut count: u128 = 0;
        let mut splits = Vec::new();
        for p in shortest..=longest {
            if p == 0 && !head_nullable {
                continue;
            }
            if p == length && !tail_nullable {
                continue;
            }

            let head_key = self.count_symbol(head, p)?;
            let head_count = self.symbols[head_key].count;
            if head_count == 0 {
                continue;
            }
            let Some(tail_key) = self.count_rule(tail, length - p)? else {
                continue;
            };

            let split = head_count
                .checked_mul(self.rules[tail_key].count)
                .ok_or_else(|| self.overflow(head, length))?;
            count = count
                .checked_add(split)
                .ok_or_else(|| self.overflow(head, length))?;
            splits.push(PartitionNode::new(head_key, p, Some(tail_key), split));
        }

        if splits.is_empty() {
            return Ok(None);
        }
        let partitions = splits
            .into_iter()
            .map(|split| self.partitions.insert(split))
            .collect();
        Ok(Some(self.rules.insert(RuleNode { count, partitions })))
    }
}

impl<'g, C> Counter<'g, C> {
    pub fn grammar(&self) -> &'g Grammar<C> {
        self.grammar
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Looks up a node returned by [`Counter::resolve`].
    pub fn node(&self, key: SymbolKey) -> Result<&SymbolNode> {
        self.symbols.get(key).ok_or(Error::UnknownNode)
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            symbol_nodes: self.symbols.len(),
            rule_nodes: self.rules.len(),
            partition_nodes: self.partitions.len(),
            rule_memo_entries: self.rule_memo.values().map(|m| m.len()).sum(),
        }
    }

    /// Text of a grammar token or of a terminal only this counter has seen.
    pub(crate) fn token_text(&self, id: TokenId) -> &str {
        match &self.extra_terminals {
            Some(extra) if extra.owns(id) => extra.resolve(id),
            _ => self.grammar.token_text(id),
        }
    }

    fn overflow(&self, id: TokenId, length: usize) -> Error {
        Error::CountOverflow {
            symbol: self.grammar.token_text(id).to_owned(),
            length,
        }
    }
}

/// Sizes of a counter's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Cached (symbol, length) results, zero-count ones included
    pub symbol_nodes: usize,
    /// Nonzero rule-suffix breakdowns
    pub rule_nodes: usize,
    /// Individual head/tail splits
    pub partition_nodes: usize,
    /// Memoized rule-suffix lookups, empty results included
    pub rule_memo_entries: usize,
}

impl CacheStats {
    /// Total nodes held in the arenas.
    pub fn total_nodes(&self) -> usize {
        self.symbol_nodes + self.rule_nodes + self.partition_nodes
    }
}
