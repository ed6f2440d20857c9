use crate::error::{Error, Result};
use ahash::AHashMap as HashMap;

/// Opaque handle for a token text interned in a grammar.
///
/// Ids are dense and assigned in first-seen order, so they double as a stable
/// numbering for anything that re-encodes the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub(crate) u32);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Assigns `TokenId`s to token texts, reusing the id of a text seen before.
#[derive(Debug, Default, Clone)]
pub(crate) struct Interner {
    base: u32,
    texts: Vec<Box<str>>,
    ids: HashMap<Box<str>, TokenId>,
}

impl Interner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An interner whose first id is `base`, for ids that must not collide
    /// with another interner's `0..base`.
    pub(crate) fn starting_at(base: usize) -> Result<Self> {
        Ok(Self {
            base: u32::try_from(base).map_err(|_| too_many_tokens())?,
            ..Self::default()
        })
    }

    /// Returns the id of `text`, allocating the next one if it is new.
    pub(crate) fn intern(&mut self, text: &str) -> Result<TokenId> {
        if let Some(&id) = self.ids.get(text) {
            return Ok(id);
        }
        let id = u32::try_from(self.texts.len())
            .ok()
            .and_then(|n| n.checked_add(self.base))
            .map(TokenId)
            .ok_or_else(too_many_tokens)?;
        self.texts.push(text.into());
        self.ids.insert(text.into(), id);
        Ok(id)
    }

    #[inline]
    pub(crate) fn get(&self, text: &str) -> Option<TokenId> {
        self.ids.get(text).copied()
    }

    #[inline]
    pub(crate) fn resolve(&self, id: TokenId) -> &str {
        &self.texts[id.index() - self.base as usize]
    }

    /// Whether `id` was allocated by this interner.
    #[inline]
    pub(crate) fn owns(&self, id: TokenId) -> bool {
        (self.base..self.next_id()).contains(&id.0)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.texts.len()
    }

    /// All ids in allocation order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        (self.base..self.next_id()).map(TokenId)
    }

    fn next_id(&self) -> u32 {
        self.base + self.texts.len() as u32
    }
}

fn too_many_tokens() -> Error {
    Error::InvalidGrammar("more than u32::MAX distinct tokens".to_owned())
}
