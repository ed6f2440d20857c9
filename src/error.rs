use thiserror::Error;

/// Errors raised while building a grammar or counting and extracting derivations.
///
/// None of these leave a `Counter` in an inconsistent state: a failed request
/// never writes a partial node, so the cache stays valid for unrelated keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An empty token (or definition name) was found.
    #[error("invalid token: tokens must be non-empty")]
    InvalidToken,

    /// A rule references a nonterminal that has no definition.
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// The grammar is structurally unusable.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// `index` is outside `[0, count)`.
    #[error("index {index} out of range for {count} derivations")]
    OutOfRange { index: u128, count: u128 },

    /// Extraction was requested for a (symbol, length) pair with no derivations.
    #[error("{symbol} has no derivation of length {length}")]
    NoDerivation { symbol: String, length: usize },

    /// The number of derivations does not fit in a `u128`.
    #[error("derivation count of {symbol} at length {length} overflows u128")]
    CountOverflow { symbol: String, length: usize },

    /// The requested length is above the configured ceiling.
    #[error("length {length} exceeds the configured maximum of {max}")]
    LengthLimit { length: usize, max: usize },

    /// Exhaustive expansion was refused because the output would be too large.
    #[error("refusing to expand {count} strings (limit {limit})")]
    TooManyStrings { count: u128, limit: u128 },

    /// A `SymbolKey` that does not belong to this counter (or was cleared).
    #[error("unknown node handle")]
    UnknownNode,
}

pub type Result<T> = std::result::Result<T, Error>;
