use crate::error::{Error, Result};
use crate::interner::{Interner, TokenId};
use crate::token::{Classifier, Delimited, TokenKind};
use ahash::AHashMap as HashMap;

/// One nonterminal definition: its name and its rules in declared order.
#[derive(Debug, Clone)]
struct Definition {
    name: TokenId,
    rules: Vec<Box<[TokenId]>>,
}

/// An immutable context-free grammar.
///
/// Built once from a list of `(nonterminal, rules)` definitions and validated
/// up front, so counting over it never meets an undefined symbol, an empty
/// token, or a cycle that would recurse without consuming length.
///
/// Definition order and rule order are preserved: they fix the order in which
/// derivations are numbered.
///
/// # Example
///
/// ```
/// use lencount_rs::Grammar;
///
/// let grammar = Grammar::from_rules([
///     ("<pair>", vec![vec!["<bit>", "<bit>"]]),
///     ("<bit>", vec![vec!["0"], vec!["1"]]),
/// ])
/// .unwrap();
///
/// assert!(grammar.is_nonterminal("<bit>").unwrap());
/// assert_eq!(grammar.rules_of("<bit>").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Grammar<C = Delimited> {
    classifier: C,
    interner: Interner,

    /// Kind of every interned token, indexed by `TokenId`.
    kinds: Vec<TokenKind>,

    definitions: Vec<Definition>,

    /// Whether each definition can derive the empty string.
    nullable: Vec<bool>,
}

impl Grammar<Delimited> {
    /// Builds a grammar whose nonterminals are written `<name>`.
    pub fn from_rules<I, N, R, T>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, R)>,
        N: AsRef<str>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self::with_classifier(Delimited::default(), definitions)
    }
}

impl<C: Classifier> Grammar<C> {
    /// Builds a grammar using `classifier` to tell nonterminals from terminals.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` for an empty token or definition name.
    /// - `InvalidGrammar` if a definition name is not a nonterminal, a
    ///   nonterminal is defined twice, or a nonterminal can reach itself
    ///   without consuming any length.
    /// - `UndefinedSymbol` if a rule uses a nonterminal with no definition.
    pub fn with_classifier<I, N, R, T>(classifier: C, definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, R)>,
        N: AsRef<str>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut interner = Interner::new();
        let mut defs = Vec::new();
        let mut defined: HashMap<TokenId, usize> = HashMap::new();

        for (name, rules) in definitions {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(Error::InvalidToken);
            }
            if !classifier.is_nonterminal(name) {
                return Err(Error::InvalidGrammar(format!(
                    "definition name {name} is not a nonterminal"
                )));
            }

            let head = interner.intern(name)?;
            if defined.insert(head, defs.len()).is_some() {
                return Err(Error::InvalidGrammar(format!(
                    "{name} is defined more than once"
                )));
            }

            let mut body = Vec::new();
            for rule in rules {
                let tokens = rule
                    .into_iter()
                    .map(|token| {
                        let token = token.as_ref();
                        if token.is_empty() {
                            Err(Error::InvalidToken)
                        } else {
                            interner.intern(token)
                        }
                    })
                    .collect::<Result<Box<[TokenId]>>>()?;
                body.push(tokens);
            }

            defs.push(Definition { name: head, rules: body });
        }

        let kinds = interner
            .ids()
            .map(|id| {
                let text = interner.resolve(id);
                if classifier.is_nonterminal(text) {
                    defined
                        .get(&id)
                        .map(|&index| TokenKind::Nonterminal { index })
                        .ok_or_else(|| Error::UndefinedSymbol(text.to_owned()))
                } else {
                    Ok(TokenKind::Terminal {
                        width: text.chars().count(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let nullable = nullable_definitions(&defs, &kinds);

        let grammar = Self {
            classifier,
            interner,
            kinds,
            definitions: defs,
            nullable,
        };
        grammar.check_same_length_cycles()?;

        log::debug!(
            "grammar built: {} nonterminals, {} distinct tokens, {} nullable",
            grammar.definitions.len(),
            grammar.interner.len(),
            grammar.nullable.iter().filter(|&&n| n).count()
        );

        Ok(grammar)
    }

    /// Classifies `token`.
    ///
    /// Works for any token text, whether or not it occurs in the grammar.
    pub fn is_nonterminal(&self, token: &str) -> Result<bool> {
        if token.is_empty() {
            return Err(Error::InvalidToken);
        }
        Ok(self.classifier.is_nonterminal(token))
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<C> Grammar<C> {
    /// Returns the rules of `symbol` in declared order.
    pub fn rules_of(&self, symbol: &str) -> Result<Rules<'_>> {
        if symbol.is_empty() {
            return Err(Error::InvalidToken);
        }
        let index = self
            .token_id(symbol)
            .and_then(|id| match self.kind(id) {
                TokenKind::Nonterminal { index } => Some(index),
                TokenKind::Terminal { .. } => None,
            })
            .ok_or_else(|| Error::UndefinedSymbol(symbol.to_owned()))?;

        Ok(Rules {
            interner: &self.interner,
            inner: self.definitions[index].rules.iter(),
        })
    }

    /// Nonterminal names in definition order.
    pub fn nonterminals(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.definitions
            .iter()
            .map(move |def| self.interner.resolve(def.name))
    }

    /// Terminal texts in the order they first appear in the grammar.
    pub fn terminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.interner
            .ids()
            .filter(move |&id| !self.kind(id).is_nonterminal())
            .map(move |id| self.interner.resolve(id))
    }

    /// Whether the nonterminal `symbol` can derive the empty string.
    pub fn is_nullable(&self, symbol: &str) -> Result<bool> {
        let id = self
            .token_id(symbol)
            .ok_or_else(|| Error::UndefinedSymbol(symbol.to_owned()))?;
        Ok(self.token_nullable(id))
    }

    #[inline]
    pub fn token_id(&self, text: &str) -> Option<TokenId> {
        self.interner.get(text)
    }

    #[inline]
    pub fn token_text(&self, id: TokenId) -> &str {
        self.interner.resolve(id)
    }

    #[inline]
    pub fn token_kind(&self, id: TokenId) -> TokenKind {
        self.kind(id)
    }

    /// Number of distinct token texts, terminals included.
    #[inline]
    pub(crate) fn token_count(&self) -> usize {
        self.interner.len()
    }

    /// Number of nonterminal definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    #[inline]
    pub(crate) fn kind(&self, id: TokenId) -> TokenKind {
        self.kinds[id.index()]
    }

    #[inline]
    pub(crate) fn rules_at(&self, index: usize) -> &[Box<[TokenId]>] {
        &self.definitions[index].rules
    }

    #[inline]
    pub(crate) fn token_nullable(&self, id: TokenId) -> bool {
        is_nullable_token(&self.kinds, &self.nullable, id)
    }

    /// Rejects grammars where a nonterminal can reach itself while every
    /// sibling token in the rules along the way derives the empty string.
    ///
    /// Counting such a symbol at length `L` needs its own count at length `L`.
    fn check_same_length_cycles(&self) -> Result<()> {
        let edges: Vec<Vec<usize>> = self
            .definitions
            .iter()
            .map(|def| {
                let mut targets = Vec::new();
                for rule in &def.rules {
                    for (pos, &id) in rule.iter().enumerate() {
                        let TokenKind::Nonterminal { index } = self.kind(id) else {
                            continue;
                        };
                        let others_nullable = rule
                            .iter()
                            .enumerate()
                            .all(|(other, &t)| other == pos || self.token_nullable(t));
                        if others_nullable && !targets.contains(&index) {
                            targets.push(index);
                        }
                    }
                }
                targets
            })
            .collect();

        // 0 = unvisited, 1 = on the DFS stack, 2 = done
        let mut state = vec![0u8; edges.len()];
        for start in 0..edges.len() {
            if state[start] != 0 {
                continue;
            }
            state[start] = 1;
            let mut stack = vec![(start, 0usize)];
            while let Some(top) = stack.last_mut() {
                let node = top.0;
                if let Some(&target) = edges[node].get(top.1) {
                    top.1 += 1;
                    match state[target] {
                        0 => {
                            state[target] = 1;
                            stack.push((target, 0));
                        }
                        1 => {
                            let name = self.interner.resolve(self.definitions[target].name);
                            return Err(Error::InvalidGrammar(format!(
                                "unguarded zero-length cycle through {name}"
                            )));
                        }
                        _ => {}
                    }
                } else {
                    state[node] = 2;
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}

/// Iterator over the rules of one nonterminal.
#[derive(Debug, Clone)]
pub struct Rules<'g> {
    interner: &'g Interner,
    inner: std::slice::Iter<'g, Box<[TokenId]>>,
}

impl<'g> Iterator for Rules<'g> {
    type Item = RuleRef<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        let ids = self.inner.next()?;
        Some(RuleRef {
            interner: self.interner,
            ids,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rules<'_> {}

/// Read-only view of a single rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleRef<'g> {
    interner: &'g Interner,
    ids: &'g [TokenId],
}

impl<'g> RuleRef<'g> {
    /// Token texts in declared order.
    pub fn tokens(&self) -> impl ExactSizeIterator<Item = &'g str> + 'g {
        let interner = self.interner;
        self.ids.iter().map(move |&id| interner.resolve(id))
    }

    pub fn ids(&self) -> &'g [TokenId] {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[inline]
fn is_nullable_token(kinds: &[TokenKind], nullable: &[bool], id: TokenId) -> bool {
    match kinds[id.index()] {
        TokenKind::Nonterminal { index } => nullable[index],
        TokenKind::Terminal { .. } => false,
    }
}

/// Least fixpoint of "some rule consists only of nullable tokens".
fn nullable_definitions(defs: &[Definition], kinds: &[TokenKind]) -> Vec<bool> {
    let mut nullable = vec![false; defs.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for (index, def) in defs.iter().enumerate() {
            if nullable[index] {
                continue;
            }
            let derives_empty = def.rules.iter().any(|rule| {
                rule.iter()
                    .all(|&id| is_nullable_token(kinds, &nullable, id))
            });
            if derives_empty {
                nullable[index] = true;
                changed = true;
            }
        }
    }
    nullable
}
