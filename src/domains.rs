use bit_set::BitSet;

use crate::{SlotId, WordId};

/// The live candidate sets for every slot, plus a trail of removals so that speculative narrowing
/// can be undone on backtrack.
///
/// Removals are only logged while at least one checkpoint is open. `rollback` reinserts everything
/// removed since the most recent checkpoint; `commit` drops the checkpoint but keeps its removals
/// on the trail, so an enclosing checkpoint can still undo them.
#[derive(Debug, Clone)]
pub struct Domains {
    sets: Vec<BitSet>,
    trail: Vec<(SlotId, WordId)>,
    checkpoints: Vec<usize>,
}

impl Domains {
    /// Seed every slot's domain with the whole vocabulary.
    pub fn new(slot_count: usize, vocabulary_len: usize) -> Domains {
        let full: BitSet = (0..vocabulary_len).collect();

        Domains {
            sets: (0..slot_count).map(|_| full.clone()).collect(),
            trail: vec![],
            checkpoints: vec![],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.sets.len()
    }

    /// Number of candidates remaining for a slot.
    pub fn len(&self, slot_id: SlotId) -> usize {
        self.sets[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.sets[slot_id].is_empty()
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.sets[slot_id].contains(word_id)
    }

    /// Candidates for a slot, in ascending word id order.
    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item=WordId> + '_ {
        self.sets[slot_id].iter()
    }

    /// Is any slot out of candidates?
    pub fn any_empty(&self) -> bool {
        self.sets.iter().any(|set| set.is_empty())
    }

    /// Remove a word from a slot's domain, returning whether it was present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        if !self.sets[slot_id].remove(word_id) {
            return false;
        }
        if !self.checkpoints.is_empty() {
            self.trail.push((slot_id, word_id));
        }
        true
    }

    /// Narrow a slot's domain down to a single word. The word doesn't have to be in the domain
    /// already; if it isn't, it's added back untrailed, which only happens when domains were left
    /// narrowed by an earlier branch that didn't roll back.
    pub fn restrict_to(&mut self, slot_id: SlotId, word_id: WordId) {
        let others: Vec<WordId> = self.sets[slot_id].iter().filter(|&w| w != word_id).collect();
        for other in others {
            self.remove(slot_id, other);
        }
        self.sets[slot_id].insert(word_id);
    }

    /// Open a checkpoint; later removals can be undone with `rollback`.
    pub fn checkpoint(&mut self) {
        self.checkpoints.push(self.trail.len());
    }

    /// Undo every removal made since the most recent checkpoint, and close it.
    pub fn rollback(&mut self) {
        let Some(mark) = self.checkpoints.pop() else {
            return;
        };
        for (slot_id, word_id) in self.trail.drain(mark..) {
            self.sets[slot_id].insert(word_id);
        }
    }

    /// Close the most recent checkpoint, keeping its removals.
    pub fn commit(&mut self) {
        self.checkpoints.pop();
        if self.checkpoints.is_empty() {
            self.trail.clear();
        }
    }

    /// How many checkpoints are open.
    pub fn depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Snapshot of every domain as sorted word ids, mostly useful for comparing states.
    pub fn to_vecs(&self) -> Vec<Vec<WordId>> {
        self.sets.iter().map(|set| set.iter().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::Domains;

    #[test]
    fn test_new_domains_hold_whole_vocabulary() {
        let domains = Domains::new(2, 4);

        assert_eq!(domains.slot_count(), 2);
        assert_eq!(domains.to_vecs(), vec![vec![0, 1, 2, 3], vec![0, 1, 2, 3]]);
        assert!(!domains.any_empty());
    }

    #[test]
    fn test_rollback_restores_removals_since_checkpoint() {
        let mut domains = Domains::new(2, 4);
        domains.remove(0, 3);

        domains.checkpoint();
        assert!(domains.remove(0, 1));
        assert!(!domains.remove(0, 1));
        domains.restrict_to(1, 2);
        assert_eq!(domains.to_vecs(), vec![vec![0, 2], vec![2]]);

        domains.rollback();
        assert_eq!(domains.to_vecs(), vec![vec![0, 1, 2], vec![0, 1, 2, 3]]);
        assert_eq!(domains.depth(), 0);
    }

    #[test]
    fn test_nested_commit_is_undone_by_outer_rollback() {
        let mut domains = Domains::new(1, 3);

        domains.checkpoint();
        domains.remove(0, 0);
        domains.checkpoint();
        domains.remove(0, 1);
        domains.commit();
        assert_eq!(domains.to_vecs(), vec![vec![2]]);

        domains.rollback();
        assert_eq!(domains.to_vecs(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_outermost_commit_makes_removals_permanent() {
        let mut domains = Domains::new(1, 3);

        domains.checkpoint();
        domains.remove(0, 0);
        domains.commit();
        domains.rollback();

        assert_eq!(domains.to_vecs(), vec![vec![1, 2]]);
        assert!(!domains.is_empty(0));
        assert!(domains.contains(0, 1));
        assert!(!domains.contains(0, 0));
    }
}
