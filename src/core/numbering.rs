/// Monotonic id generator for product codes and invoice numbers.
///
/// Owned by the [`Ledger`](super::Ledger) rather than shared globally, so
/// every ledger numbers independently and deterministically. Ids start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSequence {
    /// Create a new sequence starting at 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a sequence continuing from a given id.
    pub fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    /// Create a sequence that resumes above the highest of `existing`.
    pub fn after<I: IntoIterator<Item = u64>>(existing: I) -> Self {
        let mut seq = Self::new();
        for id in existing {
            seq.observe(id);
        }
        seq
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Preview the next id without consuming it.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Record an id assigned from outside the sequence, so it is never reissued.
    pub fn observe(&mut self, id: u64) {
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
    }
}
