use crate::interner::TokenId;

slotmap::new_key_type! {
    /// Stable handle to a memoized (symbol, length) result inside a `Counter`.
    pub struct SymbolKey;

    /// Handle to the nonzero breakdown of one rule suffix at one length.
    pub(crate) struct RuleKey;

    /// Handle to a single head/tail split of a rule suffix.
    pub(crate) struct PartitionKey;
}

/// Derivations of one symbol at one length.
///
/// A count of zero is a cached "unreachable" answer, not a missing one.
/// Terminal nodes never have contributions; nonterminal nodes list the
/// nonzero results of their rules in declared order, and their count is the
/// sum of those.
#[derive(Debug, Clone)]
pub struct SymbolNode {
    pub(crate) token: TokenId,
    pub(crate) length: usize,
    pub(crate) count: u128,
    pub(crate) contributions: Vec<RuleKey>,
}

impl SymbolNode {
    pub(crate) fn terminal(token: TokenId, length: usize, matches: bool) -> Self {
        Self {
            token,
            length,
            count: u128::from(matches),
            contributions: Vec::new(),
        }
    }

    pub(crate) fn nonterminal(
        token: TokenId,
        length: usize,
        count: u128,
        contributions: Vec<RuleKey>,
    ) -> Self {
        Self {
            token,
            length,
            count,
            contributions,
        }
    }

    #[inline]
    pub fn token(&self) -> TokenId {
        self.token
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of derivations (not distinct strings) of this symbol at this length.
    #[inline]
    pub fn count(&self) -> u128 {
        self.count
    }

    /// Number of rules with at least one derivation at this length.
    #[inline]
    pub fn contributing_rules(&self) -> usize {
        self.contributions.len()
    }
}

/// All nonzero splits of a rule suffix at one length, in increasing head length.
#[derive(Debug, Clone)]
pub(crate) struct RuleNode {
    pub count: u128,
    pub partitions: Vec<PartitionKey>,
}

/// One split of a rule suffix: the head token gets `head_len` characters and
/// the tail suffix gets the rest.
///
/// `head == None` is the empty rule (one derivation, the empty string).
/// `tail == None` means the head is the last token of the rule.
#[derive(Debug, Clone)]
pub(crate) struct PartitionNode {
    pub head: Option<SymbolKey>,
    pub head_len: usize,
    pub tail: Option<RuleKey>,
    pub count: u128,
}

impl PartitionNode {
    pub(crate) fn new(
        head: SymbolKey,
        head_len: usize,
        tail: Option<RuleKey>,
        count: u128,
    ) -> Self {
        assert!(count > 0, "partition nodes must carry at least one derivation");
        Self {
            head: Some(head),
            head_len,
            tail,
            count,
        }
    }

    /// The single derivation of an empty rule.
    pub(crate) fn empty() -> Self {
        Self {
            head: None,
            head_len: 0,
            tail: None,
            count: 1,
        }
    }
}
