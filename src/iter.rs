use crate::counter::Counter;
use crate::error::Result;
use crate::node::SymbolKey;

/// Lazily yields every derivation of a resolved node, in index order.
///
/// Each step is one [`Counter::extract`]; nothing is expanded ahead of time,
/// so iterating a prefix of a huge count is cheap.
pub struct DerivationIter<'a, 'g, C> {
    counter: &'a Counter<'g, C>,
    key: SymbolKey,
    next: u128,
    end: u128,
}

impl<'a, 'g, C> Iterator for DerivationIter<'a, 'g, C> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        // The range was checked against the node's count when the iterator was built
        self.counter.extract(self.key, index).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<'a, 'g, C> DoubleEndedIterator for DerivationIter<'a, 'g, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        self.counter.extract(self.key, self.end).ok()
    }
}

impl<'g, C> Counter<'g, C> {
    /// Iterates over all derivations of a resolved node.
    pub fn strings(&self, key: SymbolKey) -> Result<DerivationIter<'_, 'g, C>> {
        let end = self.node(key)?.count;
        Ok(DerivationIter {
            counter: self,
            key,
            next: 0,
            end,
        })
    }
}
