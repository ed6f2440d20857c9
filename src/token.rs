/// Token classes in a grammar.
///
/// Terminals carry their width (in `char`s) so counting never has to look at
/// the text again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A literal character sequence of the given width.
    Terminal { width: usize },

    /// A symbol expanded through the rules of definition `index`.
    Nonterminal { index: usize },
}

impl TokenKind {
    #[inline]
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, TokenKind::Nonterminal { .. })
    }
}

/// Decides whether a (non-empty) token names a nonterminal.
///
/// The grammar only consults the classifier while it is being built; empty
/// tokens are rejected before the classifier sees them.
pub trait Classifier {
    fn is_nonterminal(&self, token: &str) -> bool;
}

/// Default classifier: a token is a nonterminal iff it starts with `open`
/// and ends with `close`, e.g. `<digit>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimited {
    pub open: char,
    pub close: char,
}

impl Delimited {
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

impl Default for Delimited {
    fn default() -> Self {
        Self::new('<', '>')
    }
}

impl Classifier for Delimited {
    #[inline]
    fn is_nonterminal(&self, token: &str) -> bool {
        let mut chars = token.chars();
        match (chars.next(), chars.next_back()) {
            (Some(first), Some(last)) => first == self.open && last == self.close,
            _ => false,
        }
    }
}

impl<F: Fn(&str) -> bool> Classifier for F {
    #[inline]
    fn is_nonterminal(&self, token: &str) -> bool {
        self(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_default() {
        let c = Delimited::default();
        assert!(c.is_nonterminal("<digit>"));
        assert!(c.is_nonterminal("<>"));
        assert!(!c.is_nonterminal("digit"));
        assert!(!c.is_nonterminal("<digit"));
        assert!(!c.is_nonterminal("digit>"));
    }

    #[test]
    fn test_single_char_is_terminal() {
        let c = Delimited::default();
        assert!(!c.is_nonterminal("<"));
        assert!(!c.is_nonterminal(">"));
    }

    #[test]
    fn test_custom_delimiters() {
        let c = Delimited::new('{', '}');
        assert!(c.is_nonterminal("{expr}"));
        assert!(!c.is_nonterminal("<expr>"));
    }

    #[test]
    fn test_closure_classifier() {
        let upper = |t: &str| t.chars().all(|c| c.is_ascii_uppercase());
        assert!(upper.is_nonterminal("EXPR"));
        assert!(!upper.is_nonterminal("expr"));
    }

    #[test]
    fn test_token_kind() {
        assert!(TokenKind::Nonterminal { index: 0 }.is_nonterminal());
        assert!(!TokenKind::Terminal { width: 3 }.is_nonterminal());
    }
}
